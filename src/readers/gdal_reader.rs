use gdal::Dataset;
use ndarray::Array3;

use super::{LayerReader, Raster, ReadError};

/// Reads layers through GDAL; names may be plain paths or subdataset strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct GdalReader;

impl LayerReader for GdalReader {
    fn read_layer(&self, name: &str) -> Result<Raster, ReadError> {
        open_gdal_dataset(name)
    }
}

/// Opens `name` and reads all of its bands as i32.
pub fn open_gdal_dataset(name: &str) -> Result<Raster, ReadError> {
    let read_error = |e: gdal::errors::GdalError| ReadError::Read {
        name: name.to_string(),
        message: e.to_string(),
    };

    let dataset = Dataset::open(name).map_err(|e| ReadError::Open {
        name: name.to_string(),
        message: e.to_string(),
    })?;

    let (width, height) = dataset.raster_size();
    let band_count = dataset.raster_count();
    if band_count == 0 {
        return Err(ReadError::Empty {
            name: name.to_string(),
        });
    }

    let mut samples = Vec::with_capacity(band_count * width * height);
    for index in 1..=band_count {
        let band = dataset.rasterband(index).map_err(read_error)?;
        let buffer = band
            .read_as::<i32>((0, 0), (width, height), (width, height), None)
            .map_err(read_error)?;
        samples.extend_from_slice(buffer.data());
    }

    let samples = Array3::from_shape_vec((band_count, height, width), samples).map_err(|e| {
        ReadError::Read {
            name: name.to_string(),
            message: e.to_string(),
        }
    })?;

    let raster = Raster::new(samples);
    log::debug!("{name}:\n{raster}");

    Ok(raster)
}
