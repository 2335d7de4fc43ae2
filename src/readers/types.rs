use std::fmt;

use ndarray::{Array2, Array3, Axis};
use thiserror::Error;

/// Source of named raster layers.
pub trait LayerReader {
    fn read_layer(&self, name: &str) -> Result<Raster, ReadError>;
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Can't open {name}: {message}")]
    Open { name: String, message: String },
    #[error("Failed to read {name}: {message}")]
    Read { name: String, message: String },
    #[error("{name} has no raster bands")]
    Empty { name: String },
    #[error("{name} has {bands} bands where a single band was expected")]
    NotSingleBand { name: String, bands: usize },
}

/// Every sample of a raster layer, shaped (bands, rows, columns).
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    samples: Array3<i32>,
}

impl Raster {
    pub fn new(samples: Array3<i32>) -> Self {
        Self { samples }
    }

    /// A raster holding a single band.
    pub fn single(band: Array2<i32>) -> Self {
        Self {
            samples: band.insert_axis(Axis(0)),
        }
    }

    pub fn band_count(&self) -> usize {
        self.samples.len_of(Axis(0))
    }

    /// Grid size as (rows, columns).
    pub fn grid_size(&self) -> (usize, usize) {
        let (_, rows, cols) = self.samples.dim();
        (rows, cols)
    }

    pub fn samples(&self) -> &Array3<i32> {
        &self.samples
    }

    pub fn into_samples(self) -> Array3<i32> {
        self.samples
    }

    /// The only band of a single band layer.
    pub fn into_single_band(self, name: &str) -> Result<Array2<i32>, ReadError> {
        match self.band_count() {
            1 => Ok(self.samples.index_axis_move(Axis(0), 0)),
            bands => Err(ReadError::NotSingleBand {
                name: name.to_string(),
                bands,
            }),
        }
    }
}

impl fmt::Display for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.grid_size();
        let min_value = self.samples.iter().min().copied().unwrap_or_default();
        let max_value = self.samples.iter().max().copied().unwrap_or_default();

        write!(
            f,
            "Bands: {}\nRows: {}\nColumns: {}\nMin value: {}\nMax value: {}",
            self.band_count(),
            rows,
            cols,
            min_value,
            max_value,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_single_band_round_trip() {
        let band = array![[1, 2, 3], [4, 5, 6]];
        let raster = Raster::single(band.clone());

        assert_eq!(raster.band_count(), 1);
        assert_eq!(raster.grid_size(), (2, 3));
        assert_eq!(raster.into_single_band("snow").unwrap(), band);
    }

    #[test]
    fn test_display() {
        let raster = Raster::single(array![[-3, 7]]);
        assert_eq!(
            raster.to_string(),
            "Bands: 1\nRows: 1\nColumns: 2\nMin value: -3\nMax value: 7"
        );
    }

    #[test]
    fn test_multi_band_is_not_single() {
        let raster = Raster::new(Array3::zeros((3, 2, 2)));

        assert_eq!(raster.grid_size(), (2, 2));
        assert!(matches!(
            raster.into_single_band("params"),
            Err(ReadError::NotSingleBand { bands: 3, .. })
        ));
    }
}
