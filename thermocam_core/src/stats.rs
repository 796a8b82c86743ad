use thermocam_traits::TemperatureField;

/// Per-frame summary printed by the demo loops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub min_c: f32,
    pub max_c: f32,
    pub mean_c: f32,
}

/// Min/max/mean over a temperature field. NaN samples are skipped; an
/// all-NaN field (which a healthy pipeline never produces) reports zeros.
pub fn frame_stats(field: &TemperatureField) -> FrameStats {
    let mut min_c = f32::INFINITY;
    let mut max_c = f32::NEG_INFINITY;
    let mut sum = 0.0f64;
    let mut n = 0u32;
    for &t in field {
        if t.is_nan() {
            continue;
        }
        min_c = min_c.min(t);
        max_c = max_c.max(t);
        sum += f64::from(t);
        n += 1;
    }
    if n == 0 {
        return FrameStats {
            min_c: 0.0,
            max_c: 0.0,
            mean_c: 0.0,
        };
    }
    FrameStats {
        min_c,
        max_c,
        mean_c: (sum / f64::from(n)) as f32,
    }
}
