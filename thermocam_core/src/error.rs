use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("camera not initialized; call initialize() first")]
    NotInitialized,
    #[error("device configuration failed: {0}")]
    Configuration(String),
    #[error("frame capture failed: {0}")]
    Capture(String),
    #[error("corrupted calibration data: {0}")]
    CorruptedCalibration(String),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
