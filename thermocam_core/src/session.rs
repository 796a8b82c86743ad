//! Sensor session: configuration state, initialization ordering, capture.

use std::time::Duration;

use eyre::WrapErr;
use thermocam_traits::{EE_WORDS, EepromImage, FRAME_WORDS, PIXELS, RawFrame, SensorDriver, TemperatureField};
use tracing::{debug, info};

use crate::corrector::FrameCorrector;
use crate::error::{CameraError, Report, Result};

/// Refresh rates the device supports, with their 3-bit register codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshRate {
    Hz1,
    Hz2,
    Hz4,
    Hz8,
    Hz16,
    Hz32,
    Hz64,
}

impl RefreshRate {
    pub fn from_fps(fps: u32) -> Option<Self> {
        match fps {
            1 => Some(Self::Hz1),
            2 => Some(Self::Hz2),
            4 => Some(Self::Hz4),
            8 => Some(Self::Hz8),
            16 => Some(Self::Hz16),
            32 => Some(Self::Hz32),
            64 => Some(Self::Hz64),
            _ => None,
        }
    }

    pub fn fps(self) -> u32 {
        match self {
            Self::Hz1 => 1,
            Self::Hz2 => 2,
            Self::Hz4 => 4,
            Self::Hz8 => 8,
            Self::Hz16 => 16,
            Self::Hz32 => 32,
            Self::Hz64 => 64,
        }
    }

    /// Device register code (0b001 = 1 Hz .. 0b111 = 64 Hz).
    pub fn code(self) -> u8 {
        match self {
            Self::Hz1 => 0b001,
            Self::Hz2 => 0b010,
            Self::Hz4 => 0b011,
            Self::Hz8 => 0b100,
            Self::Hz16 => 0b101,
            Self::Hz32 => 0b110,
            Self::Hz64 => 0b111,
        }
    }

    /// Interval between fresh frames at this rate.
    pub fn period(self) -> Duration {
        Duration::from_millis(1_000 / u64::from(self.fps()))
    }
}

/// ADC resolution codes (0 = 16-bit .. 3 = 19-bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Adc16Bit,
    Adc17Bit,
    Adc18Bit,
    Adc19Bit,
}

impl Resolution {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Adc16Bit),
            1 => Some(Self::Adc17Bit),
            2 => Some(Self::Adc18Bit),
            3 => Some(Self::Adc19Bit),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Adc16Bit => 0,
            Self::Adc17Bit => 1,
            Self::Adc18Bit => 2,
            Self::Adc19Bit => 3,
        }
    }

    pub fn bits(self) -> u8 {
        16 + self.code()
    }
}

/// Session lifecycle as an explicit tagged state.
///
/// Calibration parameters, the corrector, and subpage bookkeeping only exist
/// once initialization has succeeded, so they live inside the variant rather
/// than as loose optional fields.
enum SessionState<P> {
    Uninitialized,
    Initialized {
        params: P,
        corrector: FrameCorrector,
        subpage: Option<u8>,
    },
}

/// One thermal camera session over a driver.
///
/// Owns the device configuration and the fixed-size raw/temperature buffers;
/// every capture rewrites them in place, so no allocation happens on the
/// capture path. `capture` returns a borrow of the internal field that ends
/// at the next `&mut self` call, which makes "the field is valid until the
/// next capture" a compile-time rule rather than documentation.
///
/// The session performs no internal locking: every device-touching method
/// takes `&mut self`, so concurrent captures against one session are ruled
/// out in safe Rust. Sharing a session across threads requires a caller-side
/// `Mutex`.
pub struct Camera<D: SensorDriver> {
    driver: D,
    state: SessionState<D::Params>,
    refresh: RefreshRate,
    resolution: Resolution,
    emissivity: f32,
    acquire_timeout: Option<Duration>,
    eeprom: EepromImage,
    frame: RawFrame,
    field: TemperatureField,
}

impl<D: SensorDriver> Camera<D> {
    /// Create an uninitialized session with device defaults (16 Hz, 19-bit
    /// ADC, emissivity 1.0).
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            state: SessionState::Uninitialized,
            refresh: RefreshRate::Hz16,
            resolution: Resolution::Adc19Bit,
            emissivity: 1.0,
            acquire_timeout: None,
            eeprom: [0; EE_WORDS],
            frame: [0; FRAME_WORDS],
            field: [0.0; PIXELS],
        }
    }

    /// Override the per-capture acquisition budget. Defaults to four refresh
    /// intervals, which tolerates a missed subpage without hanging forever.
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = Some(timeout);
        self
    }

    /// Bring the device up. The sequence is order-dependent: all
    /// configuration-register writes must complete before the configuration
    /// blob is read, because calibration extraction assumes a settled device.
    ///
    /// On any failure the session stays uninitialized; there is no partial
    /// rollback and later operations keep rejecting with `NotInitialized`.
    pub fn initialize(&mut self) -> Result<()> {
        self.state = SessionState::Uninitialized;

        self.driver
            .set_device_mode(0)
            .map_err(|e| Report::new(configuration_error("set device mode", &*e)))?;
        self.driver
            .set_subpage_repeat(false)
            .map_err(|e| Report::new(configuration_error("disable subpage repeat", &*e)))?;
        self.driver
            .set_refresh_rate(self.refresh.code())
            .map_err(|e| Report::new(configuration_error("set refresh rate", &*e)))?;
        self.driver
            .set_chess_mode()
            .map_err(|e| Report::new(configuration_error("enable chess mode", &*e)))?;
        self.driver
            .set_resolution(self.resolution.code())
            .map_err(|e| Report::new(configuration_error("set resolution", &*e)))?;

        self.driver
            .dump_eeprom(&mut self.eeprom)
            .map_err(|e| Report::new(configuration_error("read configuration blob", &*e)))?;
        let params = self
            .driver
            .extract_params(&self.eeprom)
            .map_err(|e| Report::new(configuration_error("extract calibration", &*e)))?;

        let defects = self.driver.defective_pixels(&params);
        let corrector = FrameCorrector::new(defects)
            .map_err(Report::new)
            .wrap_err("validate defective-pixel lists")?;

        info!(
            fps = self.refresh.fps(),
            resolution_bits = self.resolution.bits(),
            broken = corrector.broken().len(),
            outliers = corrector.outlier().len(),
            "camera initialized"
        );
        self.state = SessionState::Initialized {
            params,
            corrector,
            subpage: None,
        };
        Ok(())
    }

    /// Drop back to the uninitialized state. Idempotent.
    pub fn cleanup(&mut self) {
        self.state = SessionState::Uninitialized;
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, SessionState::Initialized { .. })
    }

    /// Set the refresh rate in frames per second. Validated before any
    /// device interaction; rates of 16 Hz and above additionally assume a
    /// 1 MHz bus clock on the wiring side.
    pub fn set_refresh_rate(&mut self, fps: u32) -> Result<()> {
        let rate = RefreshRate::from_fps(fps).ok_or_else(|| {
            Report::new(CameraError::InvalidArgument(format!(
                "refresh rate {fps} Hz; must be 1, 2, 4, 8, 16, 32, or 64"
            )))
        })?;
        if self.is_initialized() {
            self.driver
                .set_refresh_rate(rate.code())
                .map_err(|e| Report::new(configuration_error("set refresh rate", &*e)))?;
        }
        self.refresh = rate;
        Ok(())
    }

    /// Set the ADC resolution code (0..=3).
    pub fn set_resolution(&mut self, code: u8) -> Result<()> {
        let resolution = Resolution::from_code(code).ok_or_else(|| {
            Report::new(CameraError::InvalidArgument(format!(
                "resolution code {code}; must be 0 (16-bit) through 3 (19-bit)"
            )))
        })?;
        if self.is_initialized() {
            self.driver
                .set_resolution(resolution.code())
                .map_err(|e| Report::new(configuration_error("set resolution", &*e)))?;
        }
        self.resolution = resolution;
        Ok(())
    }

    /// Set emissivity in [0.1, 1.0]. Pure session state; takes effect at the
    /// next capture without touching the device.
    pub fn set_emissivity(&mut self, value: f32) -> Result<()> {
        if !(0.1..=1.0).contains(&value) {
            return Err(Report::new(CameraError::InvalidArgument(format!(
                "emissivity {value}; must be within 0.1..=1.0"
            ))));
        }
        self.emissivity = value;
        Ok(())
    }

    pub fn refresh_rate(&self) -> u32 {
        self.refresh.fps()
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn emissivity(&self) -> f32 {
        self.emissivity
    }

    /// Subpage populated by the most recent capture; `None` before the first
    /// one. In chess mode consecutive captures alternate 0, 1, 0, 1, ...
    pub fn current_subpage(&self) -> Option<u8> {
        match &self.state {
            SessionState::Initialized { subpage, .. } => *subpage,
            SessionState::Uninitialized => None,
        }
    }

    /// Capture one corrected frame.
    ///
    /// Blocks until the device's refresh interval elapses and fresh data is
    /// ready; the output rate is paced by the hardware, not by a software
    /// sleep. On failure the previously captured field is left intact as the
    /// last-known-good value and retrying is the caller's decision.
    pub fn capture(
        &mut self,
        interpolate_outliers: bool,
        correct_bad_pixels: bool,
    ) -> Result<&TemperatureField> {
        let timeout = self
            .acquire_timeout
            .unwrap_or_else(|| self.refresh.period().saturating_mul(4));
        let SessionState::Initialized {
            params,
            corrector,
            subpage,
        } = &mut self.state
        else {
            return Err(Report::new(CameraError::NotInitialized));
        };

        self.driver
            .acquire_frame(&mut self.frame, timeout)
            .map_err(|e| Report::new(capture_error(&*e)))
            .wrap_err("acquire raw frame")?;

        if interpolate_outliers {
            corrector.interpolate_raw(&mut self.frame);
        }

        let ambient = self.driver.ambient_temperature(&self.frame, params);
        self.driver.to_temperatures(
            &self.frame,
            params,
            self.emissivity,
            ambient,
            &mut self.field,
        );

        if correct_bad_pixels {
            corrector.correct(&mut self.field);
        }

        let sp = self.driver.subpage_of(&self.frame);
        *subpage = (sp >= 0).then_some((sp & 1) as u8);
        debug!(subpage = sp, ambient_c = ambient, "frame captured");
        Ok(&self.field)
    }
}

fn configuration_error(step: &str, e: &(dyn std::error::Error + 'static)) -> CameraError {
    CameraError::Configuration(format!("{step}: {e}"))
}

// Map a driver error to the capture taxonomy, with typed handling of
// hardware errors when the backend crate is linked in.
fn capture_error(e: &(dyn std::error::Error + 'static)) -> CameraError {
    #[cfg(feature = "hardware-errors")]
    if let Some(hw) = e.downcast_ref::<thermocam_hw::error::HwError>() {
        use thermocam_hw::error::HwError;
        return match hw {
            HwError::DataReadyTimeout => CameraError::Capture(
                "data-ready timeout; no fresh frame within the acquire budget".to_string(),
            ),
            other => CameraError::Capture(other.to_string()),
        };
    }
    let s = e.to_string();
    if s.to_lowercase().contains("timeout") {
        CameraError::Capture(format!("timeout: {s}"))
    } else {
        CameraError::Capture(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_codes_match_register_layout() {
        let cases = [
            (1, 0b001),
            (2, 0b010),
            (4, 0b011),
            (8, 0b100),
            (16, 0b101),
            (32, 0b110),
            (64, 0b111),
        ];
        for (fps, code) in cases {
            let rate = RefreshRate::from_fps(fps).unwrap();
            assert_eq!(rate.code(), code);
            assert_eq!(rate.fps(), fps);
        }
        assert_eq!(RefreshRate::from_fps(3), None);
        assert_eq!(RefreshRate::from_fps(0), None);
        assert_eq!(RefreshRate::from_fps(128), None);
    }

    #[test]
    fn resolution_codes_round_trip() {
        for code in 0..=3u8 {
            let r = Resolution::from_code(code).unwrap();
            assert_eq!(r.code(), code);
            assert_eq!(r.bits(), 16 + code);
        }
        assert_eq!(Resolution::from_code(4), None);
    }

    #[test]
    fn refresh_period_matches_rate() {
        assert_eq!(RefreshRate::Hz16.period(), Duration::from_millis(62));
        assert_eq!(RefreshRate::Hz1.period(), Duration::from_millis(1_000));
    }
}
