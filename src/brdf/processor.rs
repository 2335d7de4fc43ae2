use std::path::Path;

use log::debug;
use ndarray::{Array, Array2, Array3, Dimension, Zip};
use thiserror::Error;

use super::layers::BrdfLayer;
use crate::granules::Product;
use crate::readers::{LayerReader, ReadError};
use crate::sat_bands::Band;

/// Fill value of the int16 MCD43 science datasets.
pub const FILL_VALUE: i32 = 32767;
/// Divisor turning stored integers into physical units.
pub const SCALE_FACTOR: f32 = 1000.0;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error("{layer} is {found:?} but the kernels grid is {expected:?}")]
    GridMismatch {
        layer: BrdfLayer,
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("grids of {found:?} and {expected:?} cannot be combined")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

/// Scaled kernel weights and the mask of pixels worth using.
#[derive(Debug, Clone)]
pub struct MaskedKernels {
    /// (kernel, row, column); NaN where the retrieval is missing.
    pub kernels: Array3<f32>,
    /// True where the pixel is snow free land with best or good quality.
    pub mask: Array2<bool>,
    pub uncertainty: Array2<f32>,
}

/// Raw layers of one granule pair, one field per science dataset.
struct BrdfLayers {
    parameters: Array3<i32>,
    snow: Array2<i32>,
    land_water: Array2<i32>,
    uncertainty: Array2<i32>,
    quality: Array2<i32>,
}

impl BrdfLayers {
    fn read<R: LayerReader + ?Sized>(
        reader: &R,
        band: Band,
        a1_granule: &Path,
        a2_granule: &Path,
    ) -> Result<Self, ProcessError> {
        let subdataset = |layer: BrdfLayer| match layer.product() {
            Product::A1 => layer.subdataset(a1_granule),
            Product::A2 => layer.subdataset(a2_granule),
        };
        let single = |layer: BrdfLayer| -> Result<Array2<i32>, ProcessError> {
            let name = subdataset(layer);
            Ok(reader.read_layer(&name)?.into_single_band(&name)?)
        };

        let parameters = reader
            .read_layer(&subdataset(BrdfLayer::Parameters(band)))?
            .into_samples();

        Ok(Self {
            parameters,
            snow: single(BrdfLayer::Snow)?,
            land_water: single(BrdfLayer::LandWaterType)?,
            uncertainty: single(BrdfLayer::Uncertainty)?,
            quality: single(BrdfLayer::Quality(band))?,
        })
    }

    fn check_grids(&self, band: Band) -> Result<(), ProcessError> {
        let (_, rows, cols) = self.parameters.dim();
        let expected = (rows, cols);

        for (layer, grid) in [
            (BrdfLayer::Snow, &self.snow),
            (BrdfLayer::LandWaterType, &self.land_water),
            (BrdfLayer::Uncertainty, &self.uncertainty),
            (BrdfLayer::Quality(band), &self.quality),
        ] {
            if grid.dim() != expected {
                return Err(ProcessError::GridMismatch {
                    layer,
                    expected,
                    found: grid.dim(),
                });
            }
        }

        Ok(())
    }
}

/// Applies the fill value and scale factor, yielding NaN for missing samples.
pub fn scale_samples<D: Dimension>(raw: &Array<i32, D>) -> Array<f32, D> {
    raw.mapv(|value| {
        if value == FILL_VALUE {
            f32::NAN
        } else {
            value as f32 / SCALE_FACTOR
        }
    })
}

/// True where the snow flag reports a snow free retrieval.
pub fn snow_free(snow: &Array2<i32>) -> Array2<bool> {
    snow.mapv(|flag| flag == 0)
}

/// True over land only (shallow and deep water, coasts etc. are excluded).
pub fn land(land_water: &Array2<i32>) -> Array2<bool> {
    land_water.mapv(|flag| flag == 1)
}

/// True for best (0) and good (1) quality full inversions.
pub fn good_quality(quality: &Array2<i32>) -> Array2<bool> {
    quality.mapv(|flag| flag <= 1)
}

/// Errors with [`ProcessError::ShapeMismatch`] unless `other` has the `expected` grid.
pub fn check_shape<A>(expected: (usize, usize), other: &Array2<A>) -> Result<(), ProcessError> {
    if other.dim() != expected {
        return Err(ProcessError::ShapeMismatch {
            expected,
            found: other.dim(),
        });
    }
    Ok(())
}

/// Pixels passing all three tests; the grids must share one shape.
pub fn combine_masks(
    snow_free: &Array2<bool>,
    land: &Array2<bool>,
    quality: &Array2<bool>,
) -> Result<Array2<bool>, ProcessError> {
    check_shape(snow_free.dim(), land)?;
    check_shape(snow_free.dim(), quality)?;

    Ok(Zip::from(snow_free)
        .and(land)
        .and(quality)
        .map_collect(|&snow_free, &land, &quality| snow_free && land && quality))
}

/// Reads the five layers of `band` from an A1/A2 granule pair and builds the
/// scaled kernels and their validity mask. Nothing is cached between calls.
pub fn process_masked_kernels<R: LayerReader + ?Sized>(
    reader: &R,
    band: Band,
    a1_granule: &Path,
    a2_granule: &Path,
) -> Result<MaskedKernels, ProcessError> {
    let layers = BrdfLayers::read(reader, band, a1_granule, a2_granule)?;
    layers.check_grids(band)?;

    let kernels = scale_samples(&layers.parameters);
    let uncertainty = scale_samples(&layers.uncertainty);
    let mask = combine_masks(
        &snow_free(&layers.snow),
        &land(&layers.land_water),
        &good_quality(&layers.quality),
    )?;

    debug!(
        "{}: {} of {} pixels usable",
        band,
        mask.iter().filter(|&&usable| usable).count(),
        mask.len()
    );

    Ok(MaskedKernels {
        kernels,
        mask,
        uncertainty,
    })
}
