//! BRDF kernel weights and validity masks from MCD43A1/A2 granule pairs.

pub mod layers;
pub mod processor;
pub mod retriever;

pub use layers::BrdfLayer;
pub use processor::{MaskedKernels, ProcessError, process_masked_kernels};
pub use retriever::{BrdfRetriever, RetrieverBuilder, RetrieverError};
