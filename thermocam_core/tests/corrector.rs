//! Defective-pixel repair: list validation and pass ordering.

use thermocam_core::{CameraError, FrameCorrector, PIXELS, TemperatureField};
use thermocam_traits::DefectivePixels;

fn field_of(value: f32) -> TemperatureField {
    [value; PIXELS]
}

#[test]
fn out_of_range_index_is_corrupted_calibration() {
    let defects = DefectivePixels {
        broken: vec![PIXELS as u16],
        outlier: vec![],
    };
    let err = FrameCorrector::new(defects).unwrap_err();
    assert!(matches!(err, CameraError::CorruptedCalibration(_)));
}

#[test]
fn index_in_both_lists_is_corrupted_calibration() {
    let defects = DefectivePixels {
        broken: vec![40],
        outlier: vec![40],
    };
    let err = FrameCorrector::new(defects).unwrap_err();
    assert!(matches!(err, CameraError::CorruptedCalibration(_)));
}

#[test]
fn broken_pixels_are_replaced_by_neighbor_mean() {
    // Pixel 33 sits one row down, one column in; all four neighbors valid.
    let corrector = FrameCorrector::new(DefectivePixels {
        broken: vec![33],
        outlier: vec![],
    })
    .unwrap();

    let mut field = field_of(20.0);
    field[33] = 900.0;
    corrector.correct(&mut field);
    assert_eq!(field[33], 20.0);
}

#[test]
fn defective_neighbors_are_excluded_until_repaired() {
    // 33 and 34 are horizontally adjacent. Repairing 33 first must ignore
    // the still-bogus 34; repairing 34 afterwards may use the fixed 33.
    let mut field = field_of(10.0);
    field[33] = 500.0;
    field[34] = 900.0;
    // Give 34 asymmetric valid neighbors so the order is visible.
    field[2] = 40.0; // above 34
    field[66] = 40.0; // below 34
    field[35] = 10.0;

    let corrector = FrameCorrector::new(DefectivePixels {
        broken: vec![33],
        outlier: vec![34],
    })
    .unwrap();
    corrector.correct(&mut field);

    // 33 from its three valid neighbors (1, 32, 65), all 10.0.
    assert_eq!(field[33], 10.0);
    // 34 from above (40), below (40), right (10) and the freshly repaired
    // left neighbor (10): mean 25.
    assert_eq!(field[34], 25.0);
}

#[test]
fn reversed_list_roles_change_the_result() {
    // Same geometry with the roles swapped: 34 is now repaired first and
    // must not see 33, so it averages only 40, 40, 10.
    let mut field = field_of(10.0);
    field[33] = 500.0;
    field[34] = 900.0;
    field[2] = 40.0;
    field[66] = 40.0;
    field[35] = 10.0;

    let corrector = FrameCorrector::new(DefectivePixels {
        broken: vec![34],
        outlier: vec![33],
    })
    .unwrap();
    corrector.correct(&mut field);

    assert_eq!(field[34], 30.0);
    // 33 then averages 10, 10, 10 and the repaired 34 at 30: mean 15.
    assert_eq!(field[33], 15.0);
}

#[test]
fn pixel_with_no_valid_neighbors_is_left_alone() {
    // Corner pixel 0 with both of its neighbors defective too.
    let corrector = FrameCorrector::new(DefectivePixels {
        broken: vec![0],
        outlier: vec![1, 32],
    })
    .unwrap();

    let mut field = field_of(15.0);
    field[0] = 999.0;
    corrector.correct(&mut field);
    // 0 is repaired first and neither neighbor has been fixed yet.
    assert_eq!(field[0], 999.0);
}

#[test]
fn raw_interpolation_touches_only_outlier_indices() {
    let corrector = FrameCorrector::new(DefectivePixels {
        broken: vec![100],
        outlier: vec![200],
    })
    .unwrap();

    let mut frame = [1_000u16; thermocam_traits::FRAME_WORDS];
    frame[100] = 60_000;
    frame[200] = 60_000;
    corrector.interpolate_raw(&mut frame);

    assert_eq!(frame[100], 60_000);
    assert_eq!(frame[200], 1_000);
}
