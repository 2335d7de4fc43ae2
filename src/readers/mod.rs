pub mod gdal_reader;
pub mod memory;
pub mod types;

pub use gdal_reader::{GdalReader, open_gdal_dataset};
pub use memory::MemoryReader;
pub use types::{LayerReader, Raster, ReadError};
