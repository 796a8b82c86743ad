//! Human-readable error descriptions and structured JSON error formatting.

use thermocam_core::CameraError;

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(ce) = err.downcast_ref::<CameraError>() {
        return match ce {
            CameraError::InvalidArgument(msg) => format!(
                "What happened: A setting was rejected ({msg}).\nLikely causes: Out-of-range value on the command line or in the TOML.\nHow to fix: Use a supported refresh rate (1|2|4|8|16|32|64), resolution 0..=3, emissivity 0.1..=1.0."
            ),
            CameraError::NotInitialized => {
                "What happened: A capture was requested before the sensor was initialized.\nLikely causes: initialize() failed earlier or was skipped.\nHow to fix: Check the log for the initialization failure and resolve it first.".to_string()
            }
            CameraError::Configuration(msg) => format!(
                "What happened: Device configuration failed ({msg}).\nLikely causes: Sensor not present on the bus, wrong i2c address, or a factory-blank calibration blob.\nHow to fix: Verify wiring and sensor.i2c_addr in the config, then retry."
            ),
            CameraError::Capture(msg) => format!(
                "What happened: Frame capture failed ({msg}).\nLikely causes: Acquisition timed out or the bus dropped mid-read.\nHow to fix: Retry; if it persists, lower sensor.refresh_hz or raise sensor.acquire_timeout_ms."
            ),
            CameraError::CorruptedCalibration(msg) => format!(
                "What happened: Calibration data is corrupted ({msg}).\nLikely causes: Damaged EEPROM content or a bad blob read.\nHow to fix: Power-cycle the sensor and retry; a persistent failure means the module needs replacing."
            ),
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("timeout") {
        return "What happened: The sensor did not produce data within the configured timeout.\nLikely causes: Refresh rate too high for the bus, or timeout configured too low.\nHow to fix: Raise sensor.acquire_timeout_ms or lower sensor.refresh_hz in the config.".to_string();
    }

    if lower.contains("sensor.") || lower.contains("display.") || lower.contains("logging.") {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nLikely causes: Out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/thermocam.toml for a sample."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Map typed camera errors to stable exit codes; anything else returns 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<CameraError>() {
        Some(CameraError::InvalidArgument(_)) => 2,
        Some(CameraError::NotInitialized) => 3,
        Some(CameraError::Configuration(_)) => 4,
        Some(CameraError::Capture(_)) => 5,
        Some(CameraError::CorruptedCalibration(_)) => 6,
        None => 1,
    }
}

fn error_kind(err: &eyre::Report) -> &'static str {
    match err.downcast_ref::<CameraError>() {
        Some(CameraError::InvalidArgument(_)) => "InvalidArgument",
        Some(CameraError::NotInitialized) => "NotInitialized",
        Some(CameraError::Configuration(_)) => "Configuration",
        Some(CameraError::Capture(_)) => "Capture",
        Some(CameraError::CorruptedCalibration(_)) => "CorruptedCalibration",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": error_kind(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}
