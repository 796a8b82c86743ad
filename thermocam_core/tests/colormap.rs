//! Color mapping behavior observable through the public scheme trait.

use rstest::rstest;
use thermocam_core::{ColorScheme, InfernoScheme, Rgb, ThresholdScheme, inferno};

#[test]
fn gradient_endpoints_are_near_black_and_pale_yellow() {
    let lo = inferno(0.0);
    let hi = inferno(1.0);
    assert!(lo.0 < 5 && lo.1 < 5 && lo.2 < 10, "low end not dark: {lo:?}");
    assert!(hi.0 > 245 && hi.1 > 245, "high end not bright: {hi:?}");
}

#[test]
fn out_of_range_inputs_saturate() {
    assert_eq!(inferno(-3.0), inferno(0.0));
    assert_eq!(inferno(7.5), inferno(1.0));
    assert_eq!(inferno(f32::NAN), inferno(0.0));
}

#[test]
fn inferno_scheme_normalizes_against_its_window() {
    let scheme = InfernoScheme {
        min_c: 20.0,
        max_c: 30.0,
    };
    assert_eq!(scheme.color(20.0), inferno(0.0));
    assert_eq!(scheme.color(30.0), inferno(1.0));
    assert_eq!(scheme.color(25.0), inferno(0.5));
    // Outside the window saturates rather than panicking.
    assert_eq!(scheme.color(-40.0), inferno(0.0));
    assert_eq!(scheme.color(300.0), inferno(1.0));
}

#[test]
fn degenerate_window_collapses_to_the_low_end() {
    let scheme = InfernoScheme {
        min_c: 25.0,
        max_c: 25.0,
    };
    assert_eq!(scheme.color(24.0), inferno(0.0));
    assert_eq!(scheme.color(26.0), inferno(0.0));
}

#[rstest]
#[case(35.0, Rgb(255, 0, 255))]
#[case(30.0, Rgb(255, 0, 0))]
#[case(27.0, Rgb(255, 255, 0))]
#[case(22.0, Rgb(0, 0, 0))]
#[case(18.0, Rgb(0, 255, 0))]
#[case(12.0, Rgb(0, 255, 255))]
#[case(5.0, Rgb(0, 0, 255))]
fn threshold_scheme_buckets(#[case] temp_c: f32, #[case] expected: Rgb) {
    assert_eq!(ThresholdScheme.color(temp_c), expected);
}

#[test]
fn threshold_boundaries_are_exclusive() {
    // Exactly 32 falls into the next bucket down.
    assert_eq!(ThresholdScheme.color(32.0), Rgb(255, 0, 0));
    assert_eq!(ThresholdScheme.color(10.0), Rgb(0, 0, 255));
}

#[test]
fn schemes_are_interchangeable_behind_the_trait() {
    let schemes: Vec<Box<dyn ColorScheme>> = vec![
        Box::new(InfernoScheme {
            min_c: 0.0,
            max_c: 40.0,
        }),
        Box::new(ThresholdScheme),
    ];
    for s in &schemes {
        let _ = s.color(21.5);
    }
}
