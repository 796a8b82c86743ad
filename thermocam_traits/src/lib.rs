pub mod clock;

pub use clock::{Clock, MonotonicClock};

use std::time::Duration;

/// Pixel rows in one frame.
pub const ROWS: usize = 24;
/// Pixel columns in one frame.
pub const COLS: usize = 32;
/// Pixels per frame (row-major, `pixel = row * 32 + col`).
pub const PIXELS: usize = ROWS * COLS;
/// Words in one raw frame read: 768 pixel samples plus auxiliary/status data.
pub const FRAME_WORDS: usize = 834;
/// Words in the device configuration blob (EEPROM image).
pub const EE_WORDS: usize = 832;

/// One raw sensor read (pixel counts + aux words). Transient, overwritten per capture.
pub type RawFrame = [u16; FRAME_WORDS];
/// Opaque device configuration blob, read once at initialization.
pub type EepromImage = [u16; EE_WORDS];
/// Per-pixel temperatures in °C, row-major 24x32.
pub type TemperatureField = [f32; PIXELS];

pub type DriverError = Box<dyn std::error::Error + Send + Sync>;

/// Pixel indices flagged unreliable at calibration time.
///
/// `broken` pixels are dead; `outlier` pixels are noise-prone. The two lists
/// are expected to be disjoint and within `0..PIXELS`; the core treats a
/// violation as corrupted calibration data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefectivePixels {
    pub broken: Vec<u16>,
    pub outlier: Vec<u16>,
}

/// Capability interface over the sensor driver / calibration subsystem.
///
/// The session core only orders calls through this trait; it never
/// reimplements the physics of raw-to-temperature conversion. Device-control
/// primitives report failure through `Err` (a non-zero driver status), the
/// pure functions (`ambient_temperature`, `to_temperatures`, `subpage_of`)
/// are deterministic over their inputs.
pub trait SensorDriver {
    /// Device-specific calibration coefficient set, opaque to the core.
    type Params;

    /// Set measurement mode (0 = continuous).
    fn set_device_mode(&mut self, mode: u8) -> Result<(), DriverError>;
    /// Enable/disable repeating a single subpage instead of alternating.
    fn set_subpage_repeat(&mut self, enabled: bool) -> Result<(), DriverError>;
    /// Write the 3-bit refresh-rate code (0b001 = 1 Hz .. 0b111 = 64 Hz).
    fn set_refresh_rate(&mut self, code: u8) -> Result<(), DriverError>;
    /// Select alternating checkerboard ("chess") acquisition mode.
    fn set_chess_mode(&mut self) -> Result<(), DriverError>;
    /// Write the 2-bit ADC resolution code (0 = 16-bit .. 3 = 19-bit).
    fn set_resolution(&mut self, code: u8) -> Result<(), DriverError>;

    /// Read the full configuration blob. Only valid after device configuration
    /// has settled.
    fn dump_eeprom(&mut self, eeprom: &mut EepromImage) -> Result<(), DriverError>;
    /// One-time extraction of calibration parameters from the blob.
    fn extract_params(&mut self, eeprom: &EepromImage) -> Result<Self::Params, DriverError>;
    /// Defective-pixel lists recorded in the calibration parameters.
    fn defective_pixels(&self, params: &Self::Params) -> DefectivePixels;

    /// Acquire one raw frame. Blocks until the device's refresh interval
    /// elapses and fresh data is ready, or `timeout` expires.
    fn acquire_frame(&mut self, frame: &mut RawFrame, timeout: Duration)
    -> Result<(), DriverError>;

    /// Ambient temperature estimate for a raw frame (°C).
    fn ambient_temperature(&self, frame: &RawFrame, params: &Self::Params) -> f32;
    /// Convert a raw frame into per-pixel object temperatures (°C).
    fn to_temperatures(
        &self,
        frame: &RawFrame,
        params: &Self::Params,
        emissivity: f32,
        ambient: f32,
        out: &mut TemperatureField,
    );
    /// Which checkerboard half (0 or 1) a raw frame belongs to; negative if
    /// the frame carries no subpage information.
    fn subpage_of(&self, frame: &RawFrame) -> i32;
}
