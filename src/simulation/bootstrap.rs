//! Bootstrap index matrix generation
//!
//! Pure resampling with replacement: every (month, sample) cell is an
//! independent uniform draw over the dataset rows. No block structure and
//! no temporal correlation is modeled.

use rand::Rng;

/// A `[horizon_months][nboot]` grid of dataset row indices
///
/// Generated once per run and consumed read-only by the simulator, so the
/// entire stochastic content of a run is fixed up front.
#[derive(Debug, Clone)]
pub struct BootstrapMatrix {
    horizon_months: usize,
    samples: usize,
    indices: Vec<u32>,
}

impl BootstrapMatrix {
    /// Draw a fresh matrix from the process RNG
    ///
    /// `dataset_len` must be positive; the runner validates this before
    /// generation.
    pub fn generate(horizon_months: usize, samples: usize, dataset_len: usize) -> Self {
        assert!(dataset_len > 0, "cannot resample an empty dataset");
        let mut rng = rand::thread_rng();
        let indices = (0..horizon_months * samples)
            .map(|_| rng.gen_range(0..dataset_len as u32))
            .collect();
        Self {
            horizon_months,
            samples,
            indices,
        }
    }

    /// Wrap an explicit index grid, row-major by month
    ///
    /// Used by tests and replays where determinism matters.
    pub fn from_indices(horizon_months: usize, samples: usize, indices: Vec<u32>) -> Self {
        assert_eq!(
            indices.len(),
            horizon_months * samples,
            "index grid does not match {horizon_months} months x {samples} samples"
        );
        Self {
            horizon_months,
            samples,
            indices,
        }
    }

    /// Dataset row index drawn for the given month of the given sample
    pub fn draw(&self, month: usize, sample: usize) -> usize {
        self.indices[month * self.samples + sample] as usize
    }

    pub fn horizon_months(&self) -> usize {
        self.horizon_months
    }

    pub fn samples(&self) -> usize {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_dimensions_and_bounds() {
        let matrix = BootstrapMatrix::generate(24, 50, 7);
        assert_eq!(matrix.horizon_months(), 24);
        assert_eq!(matrix.samples(), 50);
        for month in 0..24 {
            for sample in 0..50 {
                assert!(matrix.draw(month, sample) < 7);
            }
        }
    }

    #[test]
    fn test_from_indices_layout() {
        let matrix = BootstrapMatrix::from_indices(2, 3, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(matrix.draw(0, 0), 0);
        assert_eq!(matrix.draw(0, 2), 2);
        assert_eq!(matrix.draw(1, 0), 3);
        assert_eq!(matrix.draw(1, 2), 5);
    }

    #[test]
    #[should_panic]
    fn test_from_indices_rejects_bad_shape() {
        BootstrapMatrix::from_indices(2, 3, vec![0, 1]);
    }
}
