#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas for the thermal camera stack.
//!
//! `Config` and sub-structs are deserialized from TOML and validated before
//! any device interaction; a bad value is reported by field path.
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SensorCfg {
    /// 7-bit i2c address of the sensor.
    pub i2c_addr: u8,
    /// Refresh rate in frames per second: 1, 2, 4, 8, 16, 32 or 64.
    pub refresh_hz: u32,
    /// ADC resolution code 0..=3 (16-bit .. 19-bit).
    pub resolution: u8,
    /// Surface emissivity in [0.1, 1.0].
    pub emissivity: f32,
    /// Interpolate noise-prone pixels in raw space before conversion.
    pub interpolate_outliers: bool,
    /// Repair defective pixels after conversion to temperatures.
    pub correct_bad_pixels: bool,
    /// Per-capture acquisition budget (ms); 0 uses the session default of
    /// four refresh intervals.
    pub acquire_timeout_ms: u64,
}

impl Default for SensorCfg {
    fn default() -> Self {
        Self {
            i2c_addr: 0x33,
            refresh_hz: 16,
            resolution: 3,
            emissivity: 1.0,
            interpolate_outliers: true,
            correct_bad_pixels: true,
            acquire_timeout_ms: 0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SchemeKind {
    #[default]
    Inferno,
    Threshold,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayCfg {
    /// Low end of the color window (°C).
    pub min_c: f32,
    /// High end of the color window (°C).
    pub max_c: f32,
    /// Terminal cells per pixel column (each cell prints two spaces).
    pub scale: u8,
    /// Color strategy: "inferno" (continuous) or "threshold" (buckets).
    pub scheme: SchemeKind,
}

impl Default for DisplayCfg {
    fn default() -> Self {
        Self {
            min_c: 18.0,
            max_c: 38.0,
            scale: 1,
            scheme: SchemeKind::Inferno,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub sensor: SensorCfg,
    pub display: DisplayCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Sensor
        if !matches!(self.sensor.refresh_hz, 1 | 2 | 4 | 8 | 16 | 32 | 64) {
            eyre::bail!("sensor.refresh_hz must be one of 1, 2, 4, 8, 16, 32, 64");
        }
        if self.sensor.resolution > 3 {
            eyre::bail!("sensor.resolution must be in 0..=3");
        }
        if !(0.1..=1.0).contains(&self.sensor.emissivity) {
            eyre::bail!("sensor.emissivity must be in [0.1, 1.0]");
        }
        if self.sensor.acquire_timeout_ms > 60_000 {
            eyre::bail!("sensor.acquire_timeout_ms is unreasonably large (>60s)");
        }

        // Display
        if !self.display.min_c.is_finite() || !self.display.max_c.is_finite() {
            eyre::bail!("display.min_c and display.max_c must be finite");
        }
        if self.display.max_c <= self.display.min_c {
            eyre::bail!("display.max_c must be greater than display.min_c");
        }
        if self.display.scale == 0 || self.display.scale > 4 {
            eyre::bail!("display.scale must be in 1..=4");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref() {
            if !matches!(rot, "never" | "daily" | "hourly") {
                eyre::bail!("logging.rotation must be one of never, daily, hourly");
            }
        }
        if let Some(level) = self.logging.level.as_deref() {
            if !matches!(level, "error" | "warn" | "info" | "debug" | "trace") {
                eyre::bail!("logging.level must be a valid tracing level");
            }
        }
        Ok(())
    }
}
