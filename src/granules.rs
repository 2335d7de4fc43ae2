//! Discovery of MCD43 granules on disk.
//!
//! Granules follow the LP DAAC naming scheme
//! `MCD43<product>.A<YYYYDDD>.<tile>.<collection>.<production time>.hdf`
//! and may sit anywhere below the directory that is searched.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use glob::Pattern;
use log::{debug, warn};
use thiserror::Error;
use walkdir::WalkDir;

use crate::timestamp::parse_julian;

/// Date → granule path for one product and tile.
pub type GranuleIndex = BTreeMap<NaiveDate, PathBuf>;

#[derive(Debug, Error)]
pub enum GranuleError {
    #[error("Couldn't find any MCD43{product} files for tile {tile} in {}", .dir.display())]
    NotFound {
        product: Product,
        tile: String,
        dir: PathBuf,
    },
    #[error("Invalid file name pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Product {
    /// BRDF/albedo model parameters
    A1,
    /// BRDF/albedo quality and ancillary flags
    A2,
}

impl Product {
    pub fn code(&self) -> &'static str {
        match self {
            Product::A1 => "A1",
            Product::A2 => "A2",
        }
    }

    /// fnmatch-style pattern matching this product's file names for `tile`.
    pub fn file_pattern(&self, tile: &str) -> String {
        format!("MCD43{}.A*.{}.*.hdf", self.code(), tile)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Every file below `root_dir` whose name matches `pattern`.
///
/// Entries the walk cannot read are logged and skipped.
pub fn locate(root_dir: &Path, pattern: &Pattern) -> Vec<PathBuf> {
    WalkDir::new(root_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|res| match res {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry below {}: {}", root_dir.display(), e);
                None
            }
        })
        .filter(|entry| {
            entry.file_type().is_file() && pattern.matches(&entry.file_name().to_string_lossy())
        })
        .map(|entry| entry.into_path())
        .collect()
}

/// Acquisition date encoded in a granule file name (`MCD43A1.A2016001.h20v11...`).
pub fn granule_date(path: &Path) -> Option<NaiveDate> {
    let fname = path.file_name()?.to_str()?;
    let field = fname.split('.').nth(1)?;
    parse_julian(field.strip_prefix('A')?)
}

/// Collection number of a granule (`006`, `061`...), the fourth file name field.
pub fn granule_collection(path: &Path) -> Option<&str> {
    path.file_name()?.to_str()?.split('.').nth(3)
}

// Ordering used to pick one granule among several for the same date: highest
// collection first, then the file name (production time).
fn granule_rank(path: &Path) -> (Option<&str>, Option<&std::ffi::OsStr>) {
    (granule_collection(path), path.file_name())
}

/// Index the `product` granules for `tile` below `dir` falling in `[start, end]`.
///
/// Fails with [`GranuleError::NotFound`] only when no file matches at all; a
/// window that excludes every granule gives an empty index.
pub fn find_granules(
    dir: &Path,
    tile: &str,
    product: Product,
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> Result<GranuleIndex, GranuleError> {
    let pattern = Pattern::new(&product.file_pattern(tile))?;
    let granules = locate(dir, &pattern);

    if granules.is_empty() {
        return Err(GranuleError::NotFound {
            product,
            tile: tile.to_string(),
            dir: dir.to_path_buf(),
        });
    }

    let mut index = GranuleIndex::new();
    for granule in granules {
        let Some(date) = granule_date(&granule) else {
            warn!("Skipping {}: no date in file name", granule.display());
            continue;
        };

        if date < start || end.is_some_and(|end| date > end) {
            continue;
        }

        match index.get(&date) {
            Some(kept) => {
                let (newest, ignored) = if granule_rank(&granule) > granule_rank(kept) {
                    (granule, kept.clone())
                } else {
                    (kept.clone(), granule)
                };
                warn!(
                    "Several MCD43{} granules for {}, ignoring {}",
                    product,
                    date,
                    ignored.display()
                );
                index.insert(date, newest);
            }
            None => {
                index.insert(date, granule);
            }
        }
    }

    debug!(
        "Found {} MCD43{} granules for {} in {}",
        index.len(),
        product,
        tile,
        dir.display()
    );

    Ok(index)
}
