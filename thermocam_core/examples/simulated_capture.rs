//! Capture a few frames from the simulated sensor and print summaries.
//!
//! Run with: cargo run -p thermocam_core --example simulated_capture

use thermocam_core::{Camera, frame_stats};
use thermocam_hw::SimulatedSensor;

fn main() -> thermocam_core::Result<()> {
    let mut cam = Camera::new(SimulatedSensor::new());
    cam.set_refresh_rate(8)?;
    cam.set_emissivity(0.95)?;
    cam.initialize()?;

    for n in 1..=8 {
        let field = cam.capture(true, true)?;
        let stats = frame_stats(field);
        println!(
            "frame {n}: subpage {:?} min {:.1} C max {:.1} C mean {:.1} C",
            cam.current_subpage(),
            stats.min_c,
            stats.max_c,
            stats.mean_c
        );
    }

    cam.cleanup();
    Ok(())
}
