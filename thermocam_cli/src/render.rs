//! Terminal rendering and JSON frame serialization.

use thermocam_core::{ColorScheme, FrameStats, frame_stats};
use thermocam_traits::{COLS, ROWS, TemperatureField};

/// ANSI cursor-home so successive frames overdraw in place.
pub const CURSOR_HOME: &str = "\x1b[H";
/// Clear screen once before the first frame.
pub const CLEAR_SCREEN: &str = "\x1b[2J";

/// Render one frame as truecolor background cells.
///
/// The sensor scans bottom-up relative to its usual mounting, so display row
/// `y` shows field row `ROWS - 1 - y`. Each pixel becomes `scale` cells of
/// two spaces, and each row is repeated `scale` times to keep the aspect
/// ratio roughly square.
pub fn render_frame(field: &TemperatureField, scheme: &dyn ColorScheme, scale: u8) -> String {
    let scale = usize::from(scale.max(1));
    // 19 bytes of escape codes per cell is a comfortable upper bound.
    let mut out = String::with_capacity(ROWS * COLS * scale * scale * 24);
    for y in 0..ROWS {
        let row = ROWS - 1 - y;
        let mut line = String::with_capacity(COLS * scale * 24);
        for col in 0..COLS {
            let c = scheme.color(field[row * COLS + col]);
            line.push_str(&format!("\x1b[48;2;{};{};{}m", c.0, c.1, c.2));
            for _ in 0..scale {
                line.push_str("  ");
            }
        }
        line.push_str("\x1b[0m\n");
        for _ in 0..scale {
            out.push_str(&line);
        }
    }
    out
}

/// One-line summary printed under the live image.
pub fn status_line(stats: &FrameStats, fps: Option<f32>) -> String {
    let mut s = format!(
        "min {:5.1} C  max {:5.1} C  mean {:5.1} C",
        stats.min_c, stats.max_c, stats.mean_c
    );
    if let Some(fps) = fps {
        s.push_str(&format!("  {fps:4.1} fps"));
    }
    s
}

/// Serialize a captured frame for `capture --output`.
pub fn frame_to_json(
    field: &TemperatureField,
    subpage: Option<u8>,
    include_grid: bool,
) -> serde_json::Value {
    let stats = frame_stats(field);
    let mut obj = serde_json::json!({
        "subpage": subpage,
        "min_c": stats.min_c,
        "max_c": stats.max_c,
        "mean_c": stats.mean_c,
    });
    if include_grid {
        let rows: Vec<Vec<f32>> = (0..ROWS)
            .map(|r| field[r * COLS..(r + 1) * COLS].to_vec())
            .collect();
        obj["grid"] = serde_json::json!(rows);
    }
    obj
}
