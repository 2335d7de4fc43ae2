use std::fmt;
use std::path::Path;

use crate::granules::Product;
use crate::sat_bands::Band;

/// Grid holding every MCD43 science dataset.
pub const GRID_NAME: &str = "MOD_Grid_BRDF";

/// The MCD43 science datasets the descriptors are built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrdfLayer {
    /// Isotropic, volumetric and geometric kernel weights.
    Parameters(Band),
    Snow,
    LandWaterType,
    Uncertainty,
    Quality(Band),
}

impl BrdfLayer {
    pub fn product(&self) -> Product {
        match self {
            BrdfLayer::Parameters(_) => Product::A1,
            _ => Product::A2,
        }
    }

    pub fn layer_name(&self) -> String {
        match self {
            BrdfLayer::Parameters(band) => {
                format!("BRDF_Albedo_Parameters_Band{}", band.number())
            }
            BrdfLayer::Snow => "Snow_BRDF_Albedo".to_string(),
            BrdfLayer::LandWaterType => "BRDF_Albedo_LandWaterType".to_string(),
            BrdfLayer::Uncertainty => "BRDF_Albedo_Uncertainty".to_string(),
            BrdfLayer::Quality(band) => {
                format!("BRDF_Albedo_Band_Quality_Band{}", band.number())
            }
        }
    }

    /// GDAL subdataset name of this layer inside `granule`.
    pub fn subdataset(&self, granule: &Path) -> String {
        format!(
            "HDF4_EOS:EOS_GRID:\"{}\":{}:{}",
            granule.display(),
            GRID_NAME,
            self.layer_name()
        )
    }
}

impl fmt::Display for BrdfLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.layer_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subdataset_names() {
        let band = Band::new(3).unwrap();
        let a1 = Path::new("/data/MCD43A1.A2016001.h20v11.006.hdf");
        let a2 = Path::new("/data/MCD43A2.A2016001.h20v11.006.hdf");

        assert_eq!(
            BrdfLayer::Parameters(band).subdataset(a1),
            "HDF4_EOS:EOS_GRID:\"/data/MCD43A1.A2016001.h20v11.006.hdf\":MOD_Grid_BRDF:BRDF_Albedo_Parameters_Band3"
        );
        assert_eq!(
            BrdfLayer::Quality(band).subdataset(a2),
            "HDF4_EOS:EOS_GRID:\"/data/MCD43A2.A2016001.h20v11.006.hdf\":MOD_Grid_BRDF:BRDF_Albedo_Band_Quality_Band3"
        );
        assert_eq!(
            BrdfLayer::Snow.subdataset(a2),
            "HDF4_EOS:EOS_GRID:\"/data/MCD43A2.A2016001.h20v11.006.hdf\":MOD_Grid_BRDF:Snow_BRDF_Albedo"
        );
    }

    #[test]
    fn test_layer_products() {
        let band = Band::new(1).unwrap();
        assert_eq!(BrdfLayer::Parameters(band).product(), Product::A1);
        for layer in [
            BrdfLayer::Snow,
            BrdfLayer::LandWaterType,
            BrdfLayer::Uncertainty,
            BrdfLayer::Quality(band),
        ] {
            assert_eq!(layer.product(), Product::A2);
        }
    }
}
