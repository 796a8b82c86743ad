//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "thermocam", version, about = "Thermal camera CLI")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/thermocam.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Color strategy selectable from the command line; overrides the config.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemeArg {
    /// Continuous Inferno gradient (needs a truecolor terminal)
    Inferno,
    /// Discrete temperature buckets
    Threshold,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render live frames to the terminal until Ctrl-C
    Live {
        /// Stop after this many frames (default: run until Ctrl-C)
        #[arg(long, value_name = "N")]
        frames: Option<u64>,
        /// Override refresh rate in Hz (1|2|4|8|16|32|64)
        #[arg(long, value_name = "HZ")]
        refresh_hz: Option<u32>,
        /// Override the color scheme from the config
        #[arg(long, value_enum, value_name = "SCHEME")]
        scheme: Option<SchemeArg>,
        /// Print a frames-per-second counter under the image
        #[arg(long, action = ArgAction::SetTrue)]
        fps: bool,
    },
    /// Capture frames and emit their temperatures as JSON
    Capture {
        /// Number of frames to capture
        #[arg(long, value_name = "N", default_value_t = 1)]
        frames: u64,
        /// Write JSON here instead of stdout
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Include the full 24x32 temperature grid per frame
        #[arg(long, action = ArgAction::SetTrue)]
        grid: bool,
    },
    /// Quick health check (sensor init + two captures)
    SelfCheck,
}
