use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::info;
use ndarray::{Array2, Array3};
use thiserror::Error;

use super::processor::{MaskedKernels, ProcessError, process_masked_kernels};
use crate::granules::{GranuleError, GranuleIndex, Product, find_granules};
use crate::readers::{GdalReader, LayerReader};
use crate::sat_bands::{Band, BandError};
use crate::timestamp::{TimeInput, TimestampError};

#[derive(Debug, Error)]
pub enum RetrieverError {
    #[error("mcd43{} directory {} does not exist", .product.code().to_lowercase(), .path.display())]
    MissingDirectory { product: Product, path: PathBuf },
    #[error(
        "A1 and A2 product files do not overlap: only A1 on {only_a1:?}, only A2 on {only_a2:?}"
    )]
    Inconsistent {
        only_a1: Vec<NaiveDate>,
        only_a2: Vec<NaiveDate>,
    },
    #[error("No MCD43{product} granule indexed for {date}")]
    DateNotIndexed { product: Product, date: NaiveDate },
    #[error(transparent)]
    Timestamp(#[from] TimestampError),
    #[error(transparent)]
    Granule(#[from] GranuleError),
    #[error(transparent)]
    Band(#[from] BandError),
    #[error(transparent)]
    Process(#[from] ProcessError),
}

/// Serves BRDF descriptors for one MODIS tile over a period.
///
/// The MCD43A1 and MCD43A2 granules are indexed once, when the retriever is
/// built, and both products must cover exactly the same dates. Each query
/// reads its layers from disk again.
#[derive(Debug)]
pub struct BrdfRetriever<R = GdalReader> {
    tile: String,
    mcd43a1_dir: PathBuf,
    mcd43a2_dir: PathBuf,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    a1_granules: GranuleIndex,
    a2_granules: GranuleIndex,
    reader: R,
}

impl BrdfRetriever<GdalReader> {
    /// Indexes the granules of `tile` from `start_time` onwards, with the A1
    /// and A2 granules both below `mcd43a1_dir`.
    pub fn new(
        tile: &str,
        mcd43a1_dir: impl AsRef<Path>,
        start_time: impl Into<TimeInput>,
    ) -> Result<Self, RetrieverError> {
        Self::builder(tile, mcd43a1_dir, start_time).build()
    }

    /// Starts a retriever whose end date, A2 directory or layer reader can be
    /// chosen before the granules are indexed.
    pub fn builder(
        tile: &str,
        mcd43a1_dir: impl AsRef<Path>,
        start_time: impl Into<TimeInput>,
    ) -> RetrieverBuilder {
        RetrieverBuilder {
            reader: GdalReader,
            tile: tile.to_string(),
            mcd43a1_dir: mcd43a1_dir.as_ref().to_path_buf(),
            start_time: start_time.into(),
            end_time: None,
            mcd43a2_dir: None,
        }
    }
}

/// Construction parameters of a [`BrdfRetriever`].
#[derive(Debug, Clone)]
pub struct RetrieverBuilder<R = GdalReader> {
    reader: R,
    tile: String,
    mcd43a1_dir: PathBuf,
    start_time: TimeInput,
    end_time: Option<TimeInput>,
    mcd43a2_dir: Option<PathBuf>,
}

impl<R> RetrieverBuilder<R> {
    /// Last date to index, inclusive.
    pub fn end_time(mut self, end_time: impl Into<TimeInput>) -> Self {
        self.end_time = Some(end_time.into());
        self
    }

    /// Where the A2 granules are; defaults to the A1 directory.
    pub fn mcd43a2_dir(mut self, mcd43a2_dir: impl AsRef<Path>) -> Self {
        self.mcd43a2_dir = Some(mcd43a2_dir.as_ref().to_path_buf());
        self
    }

    pub fn reader<S: LayerReader>(self, reader: S) -> RetrieverBuilder<S> {
        RetrieverBuilder {
            reader,
            tile: self.tile,
            mcd43a1_dir: self.mcd43a1_dir,
            start_time: self.start_time,
            end_time: self.end_time,
            mcd43a2_dir: self.mcd43a2_dir,
        }
    }
}

impl<R: LayerReader> RetrieverBuilder<R> {
    /// Checks the directories, indexes both products and makes sure they
    /// cover the same dates.
    pub fn build(self) -> Result<BrdfRetriever<R>, RetrieverError> {
        let start_date = self.start_time.to_date()?;
        let end_date = self.end_time.map(|t| t.to_date()).transpose()?;
        let tile = self.tile;

        let mcd43a1_dir = existing_dir(&self.mcd43a1_dir, Product::A1)?;
        let a1_granules = find_granules(&mcd43a1_dir, &tile, Product::A1, start_date, end_date)?;

        let mcd43a2_dir = match self.mcd43a2_dir {
            Some(dir) => existing_dir(&dir, Product::A2)?,
            None => mcd43a1_dir.clone(),
        };
        let a2_granules = find_granules(&mcd43a2_dir, &tile, Product::A2, start_date, end_date)?;

        check_overlap(&a1_granules, &a2_granules)?;

        info!(
            "Indexed {} MCD43 granule pairs for tile {} from {}",
            a1_granules.len(),
            tile,
            start_date
        );

        Ok(BrdfRetriever {
            tile,
            mcd43a1_dir,
            mcd43a2_dir,
            start_date,
            end_date,
            a1_granules,
            a2_granules,
            reader: self.reader,
        })
    }
}

impl<R: LayerReader> BrdfRetriever<R> {
    pub fn tile(&self) -> &str {
        &self.tile
    }

    pub fn mcd43a1_dir(&self) -> &Path {
        &self.mcd43a1_dir
    }

    pub fn mcd43a2_dir(&self) -> &Path {
        &self.mcd43a2_dir
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn a1_granules(&self) -> &GranuleIndex {
        &self.a1_granules
    }

    pub fn a2_granules(&self) -> &GranuleIndex {
        &self.a2_granules
    }

    /// Dates with a granule pair, oldest first.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.a1_granules.keys().copied()
    }

    /// Scaled kernel weights of band `band_no` (1 to 7) on `date` and the mask
    /// of snow free, best or good quality land pixels.
    pub fn get_brdf_descriptors(
        &self,
        band_no: u8,
        date: impl Into<TimeInput>,
    ) -> Result<(Array3<f32>, Array2<bool>), RetrieverError> {
        let MaskedKernels { kernels, mask, .. } = self.get_masked_kernels(band_no, date)?;
        Ok((kernels, mask))
    }

    /// Like [`get_brdf_descriptors`](Self::get_brdf_descriptors), keeping the
    /// scaled uncertainty as well.
    pub fn get_masked_kernels(
        &self,
        band_no: u8,
        date: impl Into<TimeInput>,
    ) -> Result<MaskedKernels, RetrieverError> {
        let band = Band::new(band_no)?;
        let date = date.into().to_date()?;

        let a1_granule = lookup(&self.a1_granules, Product::A1, date)?;
        let a2_granule = lookup(&self.a2_granules, Product::A2, date)?;

        Ok(process_masked_kernels(
            &self.reader,
            band,
            a1_granule,
            a2_granule,
        )?)
    }
}

fn existing_dir(dir: &Path, product: Product) -> Result<PathBuf, RetrieverError> {
    if dir.exists() {
        Ok(dir.to_path_buf())
    } else {
        Err(RetrieverError::MissingDirectory {
            product,
            path: dir.to_path_buf(),
        })
    }
}

fn check_overlap(a1: &GranuleIndex, a2: &GranuleIndex) -> Result<(), RetrieverError> {
    let a1_dates: BTreeSet<NaiveDate> = a1.keys().copied().collect();
    let a2_dates: BTreeSet<NaiveDate> = a2.keys().copied().collect();

    if a1_dates == a2_dates {
        return Ok(());
    }

    Err(RetrieverError::Inconsistent {
        only_a1: a1_dates.difference(&a2_dates).copied().collect(),
        only_a2: a2_dates.difference(&a1_dates).copied().collect(),
    })
}

fn lookup(index: &GranuleIndex, product: Product, date: NaiveDate) -> Result<&Path, RetrieverError> {
    index
        .get(&date)
        .map(PathBuf::as_path)
        .ok_or(RetrieverError::DateNotIndexed { product, date })
}
