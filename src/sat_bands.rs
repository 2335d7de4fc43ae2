use std::fmt::Display;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BandError {
    #[error("Bands can only go from 1 to 7, got {0}")]
    OutOfRange(u8),
}

/// One of the seven MODIS land bands the MCD43 BRDF model is fitted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Band(u8);

impl Band {
    pub const COUNT: u8 = 7;

    // Nominal centre wavelengths (nm) of MODIS bands 1 to 7
    const WAVELENGTHS: [u32; 7] = [645, 858, 469, 555, 1240, 1640, 2130];

    pub fn new(band_no: u8) -> Result<Self, BandError> {
        if !(1..=Self::COUNT).contains(&band_no) {
            return Err(BandError::OutOfRange(band_no));
        }
        Ok(Band(band_no))
    }

    pub fn all() -> impl Iterator<Item = Band> {
        (1..=Self::COUNT).map(Band)
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    pub fn wavelength(&self) -> u32 {
        Self::WAVELENGTHS[usize::from(self.0 - 1)]
    }
}

impl TryFrom<u8> for Band {
    type Error = BandError;

    fn try_from(band_no: u8) -> Result<Self, Self::Error> {
        Band::new(band_no)
    }
}

impl Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Band {} ({} nm)", self.0, self.wavelength())
    }
}
