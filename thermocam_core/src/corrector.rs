//! Defective-pixel repair for raw frames and temperature fields.

use thermocam_traits::{COLS, DefectivePixels, PIXELS, ROWS, RawFrame, TemperatureField};

use crate::error::CameraError;

/// Up/down/left/right neighbors of a pixel, in-bounds only.
fn neighbors(idx: usize) -> impl Iterator<Item = usize> {
    let row = idx / COLS;
    let col = idx % COLS;
    [
        (col > 0).then(|| idx - 1),
        (col + 1 < COLS).then(|| idx + 1),
        (row > 0).then(|| idx - COLS),
        (row + 1 < ROWS).then(|| idx + COLS),
    ]
    .into_iter()
    .flatten()
}

/// Repairs pixels flagged at calibration time.
///
/// Holds the two index lists fixed for the session lifetime. Construction
/// validates the calibration contract (indices in range, lists disjoint);
/// a violation means the calibration data itself is corrupt and the session
/// must not come up.
#[derive(Debug, Clone)]
pub struct FrameCorrector {
    broken: Vec<u16>,
    outlier: Vec<u16>,
}

impl FrameCorrector {
    pub fn new(defects: DefectivePixels) -> Result<Self, CameraError> {
        for &i in defects.broken.iter().chain(defects.outlier.iter()) {
            if usize::from(i) >= PIXELS {
                return Err(CameraError::CorruptedCalibration(format!(
                    "defective pixel index {i} outside 0..{PIXELS}"
                )));
            }
        }
        if let Some(&i) = defects
            .broken
            .iter()
            .find(|i| defects.outlier.contains(i))
        {
            return Err(CameraError::CorruptedCalibration(format!(
                "pixel {i} listed as both broken and outlier"
            )));
        }
        Ok(Self {
            broken: defects.broken,
            outlier: defects.outlier,
        })
    }

    pub fn broken(&self) -> &[u16] {
        &self.broken
    }

    pub fn outlier(&self) -> &[u16] {
        &self.outlier
    }

    fn is_defective(&self, idx: usize) -> bool {
        let idx = idx as u16;
        self.broken.contains(&idx) || self.outlier.contains(&idx)
    }

    /// Substitute outlier pixels in raw space, before temperature conversion.
    /// Each flagged sample becomes the mean of its non-defective neighbors;
    /// a sample with no usable neighbor keeps its count.
    pub fn interpolate_raw(&self, frame: &mut RawFrame) {
        for &i in &self.outlier {
            let idx = usize::from(i);
            let mut sum: u32 = 0;
            let mut n: u32 = 0;
            for nb in neighbors(idx) {
                if !self.is_defective(nb) {
                    sum += u32::from(frame[nb]);
                    n += 1;
                }
            }
            if n > 0 {
                frame[idx] = (sum / n) as u16;
            }
        }
    }

    /// Repair the temperature field: every broken pixel first, THEN every
    /// outlier pixel, each against the current field state. A pixel repaired
    /// earlier in the same pass becomes a usable neighbor for later repairs,
    /// which is why the order is load-bearing.
    pub fn correct(&self, field: &mut TemperatureField) {
        let mut repaired = [false; PIXELS];
        for &i in self.broken.iter().chain(self.outlier.iter()) {
            let idx = usize::from(i);
            let mut sum = 0.0f32;
            let mut n = 0u32;
            for nb in neighbors(idx) {
                if !self.is_defective(nb) || repaired[nb] {
                    sum += field[nb];
                    n += 1;
                }
            }
            if n > 0 {
                field[idx] = sum / n as f32;
                repaired[idx] = true;
            }
        }
    }
}
