//! Temperature-to-color mapping.
//!
//! Two interchangeable strategies share the [`ColorScheme`] contract: the
//! perceptually-ordered [`InfernoScheme`] (piecewise-linear interpolation
//! over fixed control points) and the lower-fidelity [`ThresholdScheme`]
//! (discrete buckets over fixed temperature breakpoints).

/// 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Inferno control points at positions 0, 1/8, ..., 1. Channel values in
/// [0, 1]; the table is monotonic in perceptual lightness.
const CONTROL_POINTS: [[f32; 3]; 9] = [
    [0.001_462, 0.000_466, 0.013_866], // dark purple/black
    [0.087_411, 0.044_556, 0.224_813],
    [0.258_234, 0.038_571, 0.406_485],
    [0.416_331, 0.090_203, 0.432_943],
    [0.645_581, 0.133_503, 0.392_508],
    [0.798_216, 0.280_197, 0.469_538],
    [0.924_870, 0.517_763, 0.295_662],
    [0.987_622, 0.809_330, 0.145_357],
    [0.988_362, 0.998_364, 0.644_924], // bright yellow
];

/// Map a normalized scalar to an Inferno color.
///
/// Values outside [0, 1] saturate to the endpoint colors; NaN maps to the
/// coldest color. Per-channel linear interpolation between the two
/// neighboring control points, scaled to [0, 255] and truncated.
pub fn inferno(normalized: f32) -> Rgb {
    let v = if normalized.is_nan() {
        0.0
    } else {
        normalized.clamp(0.0, 1.0)
    };
    let scaled = v * (CONTROL_POINTS.len() - 1) as f32;
    let lower = scaled as usize;
    let upper = (lower + 1).min(CONTROL_POINTS.len() - 1);
    let frac = scaled - lower as f32;
    let channel = |c: usize| {
        let a = CONTROL_POINTS[lower][c];
        let b = CONTROL_POINTS[upper][c];
        ((a + (b - a) * frac) * 255.0) as u8
    };
    Rgb(channel(0), channel(1), channel(2))
}

/// A rendering strategy from temperature to display color.
pub trait ColorScheme {
    fn color(&self, temp_c: f32) -> Rgb;
}

/// Continuous Inferno mapping over a configured temperature window.
#[derive(Debug, Clone, Copy)]
pub struct InfernoScheme {
    pub min_c: f32,
    pub max_c: f32,
}

impl InfernoScheme {
    pub fn new(min_c: f32, max_c: f32) -> Self {
        Self { min_c, max_c }
    }
}

impl ColorScheme for InfernoScheme {
    fn color(&self, temp_c: f32) -> Rgb {
        let span = self.max_c - self.min_c;
        let normalized = if span > 0.0 {
            (temp_c - self.min_c) / span
        } else {
            0.0
        };
        inferno(normalized)
    }
}

/// Discrete bucketing over fixed breakpoints. Coarser than
/// [`InfernoScheme`] but readable on terminals without truecolor support.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdScheme;

impl ColorScheme for ThresholdScheme {
    fn color(&self, temp_c: f32) -> Rgb {
        if temp_c > 32.0 {
            Rgb(255, 0, 255) // magenta
        } else if temp_c > 29.0 {
            Rgb(255, 0, 0) // red
        } else if temp_c > 26.0 {
            Rgb(255, 255, 0) // yellow
        } else if temp_c > 20.0 {
            Rgb(0, 0, 0) // neutral band renders black
        } else if temp_c > 17.0 {
            Rgb(0, 255, 0) // green
        } else if temp_c > 10.0 {
            Rgb(0, 255, 255) // cyan
        } else {
            Rgb(0, 0, 255) // blue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaled(point: [f32; 3]) -> Rgb {
        Rgb(
            (point[0] * 255.0) as u8,
            (point[1] * 255.0) as u8,
            (point[2] * 255.0) as u8,
        )
    }

    #[test]
    fn endpoints_hit_first_and_last_control_points() {
        assert_eq!(inferno(0.0), scaled(CONTROL_POINTS[0]));
        assert_eq!(inferno(1.0), scaled(CONTROL_POINTS[8]));
    }

    #[test]
    fn out_of_range_inputs_saturate() {
        assert_eq!(inferno(-5.0), inferno(0.0));
        assert_eq!(inferno(5.0), inferno(1.0));
        assert_eq!(inferno(f32::NAN), inferno(0.0));
    }

    #[test]
    fn midpoints_hit_interior_control_points() {
        for (i, point) in CONTROL_POINTS.iter().enumerate() {
            let v = i as f32 / 8.0;
            assert_eq!(inferno(v), scaled(*point), "control point {i}");
        }
    }
}
