#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core thermal-camera pipeline (hardware-agnostic).
//!
//! This crate turns raw sensor frames into corrected temperature fields and
//! colors. All device interaction goes through the
//! `thermocam_traits::SensorDriver` trait.
//!
//! ## Architecture
//!
//! - **Session**: device lifecycle, configuration, blocking capture (`session`)
//! - **Correction**: defective-pixel interpolation and repair (`corrector`)
//! - **Color**: Inferno gradient and threshold palettes (`colormap`)
//! - **Stats**: per-frame min/max/mean summaries (`stats`)

pub mod colormap;
pub mod corrector;
pub mod error;
pub mod session;
pub mod stats;

pub use colormap::{ColorScheme, InfernoScheme, Rgb, ThresholdScheme, inferno};
pub use corrector::FrameCorrector;
pub use error::{CameraError, Report, Result};
pub use session::{Camera, RefreshRate, Resolution};
pub use stats::{FrameStats, frame_stats};

pub use thermocam_traits::{
    COLS, DefectivePixels, PIXELS, ROWS, SensorDriver, TemperatureField,
};
