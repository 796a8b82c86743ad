use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("i2c nak (status {0})")]
    Nak(i32),
    #[error("bus error: {0}")]
    Bus(String),
    #[error("sensor data-ready timeout")]
    DataReadyTimeout,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
