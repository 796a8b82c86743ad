//! Sensor backends for the thermal camera stack.
//!
//! Ships a deterministic [`SimulatedSensor`] that implements the full
//! `SensorDriver` capability interface without hardware. The real device
//! driver (bus I/O, EEPROM extraction, temperature physics) is an external
//! vendor subsystem; anything implementing `thermocam_traits::SensorDriver`
//! plugs into the session unchanged.

pub mod error;
pub mod util;

use std::time::Duration;

use thermocam_traits::{
    COLS, Clock, DefectivePixels, DriverError, EE_WORDS, EepromImage, FRAME_WORDS, MonotonicClock,
    PIXELS, RawFrame, SensorDriver, TemperatureField,
};
use tracing::trace;

use crate::error::HwError;

/// Aux word carrying the subpage number of the most recent frame read.
const SUBPAGE_WORD: usize = FRAME_WORDS - 1;
/// Aux word carrying the frame counter (stands in for the control register).
const COUNTER_WORD: usize = FRAME_WORDS - 2;

/// Raw count written at broken-pixel positions (saturated ADC reading).
const BROKEN_POISON: u16 = u16::MAX;
/// Centi-degree spike added at outlier-pixel positions.
const OUTLIER_SPIKE: u16 = 1_500;

fn fps_of_code(code: u8) -> u32 {
    // 0b001 = 1 Hz doubling up to 0b111 = 64 Hz; code 0 is the slowest rate.
    1u32 << code.clamp(1, 7).saturating_sub(1)
}

/// Calibration parameters produced by the simulated sensor.
///
/// Real parameters are an opaque coefficient set; the simulation only needs
/// the defective-pixel lists and an ambient baseline.
#[derive(Debug, Clone)]
pub struct SimParams {
    pub broken: Vec<u16>,
    pub outlier: Vec<u16>,
    pub ambient_c: f32,
}

/// Deterministic in-process stand-in for the thermal sensor.
///
/// Behaves like the device in alternating ("chess") mode: each acquisition
/// blocks for one refresh interval, then updates the checkerboard half of the
/// pixel array matching the current subpage. A slowly pulsing warm blob over
/// an ambient baseline gives frames realistic structure, and configured
/// defective pixels are poisoned in raw space so the correction stages have
/// something to repair.
pub struct SimulatedSensor<C: Clock = MonotonicClock> {
    clock: C,
    eeprom: EepromImage,
    refresh_code: u8,
    device_mode: u8,
    subpage_repeat: bool,
    chess_mode: bool,
    resolution_code: u8,
    next_subpage: u8,
    tick: u32,
    pixels: [u16; PIXELS],
    broken: Vec<u16>,
    outlier: Vec<u16>,
    ambient_c: f32,
    // Fault injection for error-path tests.
    fail_control_at: Option<u32>,
    control_calls: u32,
    fail_acquire: bool,
}

impl SimulatedSensor<MonotonicClock> {
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }
}

impl Default for SimulatedSensor<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> SimulatedSensor<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            eeprom: default_eeprom(),
            refresh_code: 0b101, // 16 Hz, device default used by the demo
            device_mode: 0,
            subpage_repeat: false,
            chess_mode: false,
            resolution_code: 3,
            next_subpage: 0,
            tick: 0,
            pixels: [0; PIXELS],
            broken: Vec::new(),
            outlier: Vec::new(),
            ambient_c: 22.0,
            fail_control_at: None,
            control_calls: 0,
            fail_acquire: false,
        }
    }

    /// Flag pixels as defective; indices end up in the extracted parameters.
    /// Out-of-range indices are kept as-is so callers can exercise the
    /// corrupted-calibration path.
    pub fn with_defects(mut self, broken: Vec<u16>, outlier: Vec<u16>) -> Self {
        self.broken = broken;
        self.outlier = outlier;
        self
    }

    pub fn with_ambient(mut self, ambient_c: f32) -> Self {
        self.ambient_c = ambient_c;
        self
    }

    /// Replace the EEPROM image with all-zero words (factory-blank device).
    pub fn with_blank_eeprom(mut self) -> Self {
        self.eeprom = [0; EE_WORDS];
        self
    }

    /// Fail the n-th device-control write (1-based) with an i2c nak.
    pub fn fail_control_call(mut self, n: u32) -> Self {
        self.fail_control_at = Some(n);
        self
    }

    /// Make every subsequent acquisition time out.
    pub fn fail_acquire(mut self) -> Self {
        self.fail_acquire = true;
        self
    }

    fn control_write(&mut self) -> Result<(), DriverError> {
        self.control_calls += 1;
        if self.fail_control_at == Some(self.control_calls) {
            return Err(Box::new(HwError::Nak(-1)));
        }
        Ok(())
    }

    /// Scene temperature in centi-°C at a pixel: pulsing warm blob near the
    /// frame center over the ambient baseline.
    fn scene_counts(&self, row: usize, col: usize) -> u16 {
        let dy = row as f32 - 11.5;
        let dx = col as f32 - 15.5;
        let d2 = dx * dx + dy * dy;
        let pulse = 1.0 + 0.25 * ((self.tick as f32) * 0.05).sin();
        let t = self.ambient_c + 12.0 * pulse * (-d2 / 40.0).exp();
        (t * 100.0) as u16
    }

    fn refresh_period(&self) -> Duration {
        Duration::from_millis(1_000 / u64::from(fps_of_code(self.refresh_code)))
    }
}

fn default_eeprom() -> EepromImage {
    // Deterministic non-zero pattern; content is opaque to everything above
    // the driver, only "all zero" (blank device) is special.
    core::array::from_fn(|i| 0xA33Cu16 ^ (i as u16).wrapping_mul(31))
}

impl<C: Clock> SensorDriver for SimulatedSensor<C> {
    type Params = SimParams;

    fn set_device_mode(&mut self, mode: u8) -> Result<(), DriverError> {
        self.control_write()?;
        self.device_mode = mode;
        Ok(())
    }

    fn set_subpage_repeat(&mut self, enabled: bool) -> Result<(), DriverError> {
        self.control_write()?;
        self.subpage_repeat = enabled;
        Ok(())
    }

    fn set_refresh_rate(&mut self, code: u8) -> Result<(), DriverError> {
        self.control_write()?;
        self.refresh_code = code;
        Ok(())
    }

    fn set_chess_mode(&mut self) -> Result<(), DriverError> {
        self.control_write()?;
        self.chess_mode = true;
        Ok(())
    }

    fn set_resolution(&mut self, code: u8) -> Result<(), DriverError> {
        self.control_write()?;
        self.resolution_code = code;
        Ok(())
    }

    fn dump_eeprom(&mut self, eeprom: &mut EepromImage) -> Result<(), DriverError> {
        self.control_write()?;
        eeprom.copy_from_slice(&self.eeprom);
        Ok(())
    }

    fn extract_params(&mut self, eeprom: &EepromImage) -> Result<Self::Params, DriverError> {
        // A factory-blank blob carries no calibration; extraction reports a
        // non-zero status rather than inventing coefficients.
        if eeprom.iter().all(|&w| w == 0) {
            return Err(Box::new(HwError::Bus("blank eeprom image".into())));
        }
        Ok(SimParams {
            broken: self.broken.clone(),
            outlier: self.outlier.clone(),
            ambient_c: self.ambient_c,
        })
    }

    fn defective_pixels(&self, params: &Self::Params) -> DefectivePixels {
        DefectivePixels {
            broken: params.broken.clone(),
            outlier: params.outlier.clone(),
        }
    }

    fn acquire_frame(
        &mut self,
        frame: &mut RawFrame,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        if self.fail_acquire {
            return Err(Box::new(HwError::DataReadyTimeout));
        }
        let period = self.refresh_period();
        if timeout < period {
            // Data cannot become ready within the caller's budget.
            return Err(Box::new(HwError::DataReadyTimeout));
        }
        // Self-paced: block until the device would have fresh data.
        self.clock.sleep(period);
        self.tick = self.tick.wrapping_add(1);

        let subpage = self.next_subpage;
        if self.chess_mode && !self.subpage_repeat {
            self.next_subpage ^= 1;
        }

        // Chess mode populates only the checkerboard half for this subpage;
        // the other half keeps its previous counts.
        for row in 0..thermocam_traits::ROWS {
            for col in 0..COLS {
                if (row + col) % 2 == subpage as usize || !self.chess_mode {
                    self.pixels[row * COLS + col] = self.scene_counts(row, col);
                }
            }
        }
        for &i in &self.broken {
            if (i as usize) < PIXELS {
                self.pixels[i as usize] = BROKEN_POISON;
            }
        }
        for &i in &self.outlier {
            if (i as usize) < PIXELS {
                self.pixels[i as usize] = self.pixels[i as usize].saturating_add(OUTLIER_SPIKE);
            }
        }

        frame[..PIXELS].copy_from_slice(&self.pixels);
        frame[PIXELS..].fill(0);
        frame[COUNTER_WORD] = self.tick as u16;
        frame[SUBPAGE_WORD] = u16::from(subpage);
        trace!(subpage, tick = self.tick, "simulated frame acquired");
        Ok(())
    }

    fn ambient_temperature(&self, _frame: &RawFrame, params: &Self::Params) -> f32 {
        params.ambient_c
    }

    fn to_temperatures(
        &self,
        frame: &RawFrame,
        _params: &Self::Params,
        emissivity: f32,
        ambient: f32,
        out: &mut TemperatureField,
    ) {
        // Counts are centi-°C of the observed surface; lower emissivity means
        // the true object temperature sits further from ambient.
        for (i, t) in out.iter_mut().enumerate() {
            let observed = f32::from(frame[i]) / 100.0;
            *t = ambient + (observed - ambient) / emissivity;
        }
    }

    fn subpage_of(&self, frame: &RawFrame) -> i32 {
        i32::from(frame[SUBPAGE_WORD] & 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_sim(sim: &mut SimulatedSensor) {
        sim.set_device_mode(0).unwrap();
        sim.set_subpage_repeat(false).unwrap();
        sim.set_refresh_rate(0b111).unwrap();
        sim.set_chess_mode().unwrap();
    }

    #[test]
    fn subpages_alternate_in_chess_mode() {
        let mut sim = SimulatedSensor::new();
        init_sim(&mut sim);
        let mut frame = [0u16; FRAME_WORDS];
        let mut seen = Vec::new();
        for _ in 0..4 {
            sim.acquire_frame(&mut frame, Duration::from_secs(1)).unwrap();
            seen.push(sim.subpage_of(&frame));
        }
        assert_eq!(seen, vec![0, 1, 0, 1]);
    }

    #[test]
    fn acquire_times_out_when_budget_below_refresh_period() {
        let mut sim = SimulatedSensor::new();
        init_sim(&mut sim);
        sim.set_refresh_rate(0b001).unwrap(); // 1 Hz
        let mut frame = [0u16; FRAME_WORDS];
        let err = sim
            .acquire_frame(&mut frame, Duration::from_millis(10))
            .expect_err("timeout expected");
        assert!(err.to_string().contains("data-ready timeout"));
    }

    #[test]
    fn blank_eeprom_fails_extraction() {
        let mut sim = SimulatedSensor::new().with_blank_eeprom();
        let mut ee = [0u16; EE_WORDS];
        sim.dump_eeprom(&mut ee).unwrap();
        assert!(sim.extract_params(&ee).is_err());
    }
}
