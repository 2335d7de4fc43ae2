use std::collections::HashMap;

use super::{LayerReader, Raster, ReadError};

/// Serves layers that are already in memory, keyed by layer name.
#[derive(Debug, Clone, Default)]
pub struct MemoryReader {
    layers: HashMap<String, Raster>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, raster: Raster) -> Option<Raster> {
        self.layers.insert(name.into(), raster)
    }
}

impl LayerReader for MemoryReader {
    fn read_layer(&self, name: &str) -> Result<Raster, ReadError> {
        self.layers
            .get(name)
            .cloned()
            .ok_or_else(|| ReadError::Open {
                name: name.to_string(),
                message: "no such layer".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_unknown_layer_is_an_open_error() {
        let mut reader = MemoryReader::new();
        reader.insert("snow", Raster::single(array![[0, 1]]));

        assert!(reader.read_layer("snow").is_ok());
        assert!(matches!(
            reader.read_layer("land"),
            Err(ReadError::Open { .. })
        ));
    }
}
