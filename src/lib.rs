//! Retrieval of MODIS MCD43 BRDF descriptors.
//!
//! MCD43A1 granules carry the kernel weights of the BRDF model fitted for each
//! MODIS land band; MCD43A2 granules carry the snow, land/water and quality
//! flags that tell which of those weights are worth using. [`BrdfRetriever`]
//! indexes both products for a tile and returns scaled kernels together with
//! a validity mask.

pub mod brdf;
pub mod config;
pub mod granules;
pub mod readers;
pub mod sat_bands;
pub mod timestamp;
pub mod utils;

pub use brdf::{BrdfRetriever, MaskedKernels, RetrieverBuilder, RetrieverError};
pub use sat_bands::Band;
pub use timestamp::{TimeInput, process_time_input};
