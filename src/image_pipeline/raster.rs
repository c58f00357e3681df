//! In-memory rasters passed between pipeline stages.
//!
//! Every raster owns its pixel buffer and has immutable, non-zero bounds. Stages
//! never mutate their input; they allocate a fresh raster and hand it forward.

use crate::image_pipeline::common::error::{MapError, Result};

/// Pixel value marking foreground (dice) in a mask.
pub const WHITE: u8 = 255;
/// Pixel value marking background in a mask.
pub const BLACK: u8 = 0;

/// The two values a [`Mask`] is allowed to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentinels {
    foreground: u8,
    background: u8,
}

impl Sentinels {
    /// WHITE foreground on BLACK background.
    pub const BINARY: Sentinels = Sentinels {
        foreground: WHITE,
        background: BLACK,
    };

    pub fn new(foreground: u8, background: u8) -> Result<Self> {
        if foreground == background {
            return Err(MapError::InvalidSentinels(foreground));
        }
        Ok(Self {
            foreground,
            background,
        })
    }

    pub fn foreground(&self) -> u8 {
        self.foreground
    }

    pub fn background(&self) -> u8 {
        self.background
    }

    /// Same pair with the roles exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            foreground: self.background,
            background: self.foreground,
        }
    }
}

impl Default for Sentinels {
    fn default() -> Self {
        Self::BINARY
    }
}

fn checked_area(width: usize, height: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(MapError::InvalidDimensions(width, height));
    }
    width
        .checked_mul(height)
        .ok_or(MapError::InvalidDimensions(width, height))
}

/// Single-channel 8-bit raster, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayRaster {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayRaster {
    pub fn from_vec(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let expected = checked_area(width, height)?;
        if data.len() != expected {
            return Err(MapError::DecodeError(format!(
                "expected {} pixels for {}x{}, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn filled(width: usize, height: usize, value: u8) -> Result<Self> {
        let len = checked_area(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![value; len],
        })
    }

    /// Same bounds as `self`, every pixel set to `value`.
    pub(crate) fn blank_like(&self, value: u8) -> Self {
        Self {
            width: self.width,
            height: self.height,
            data: vec![value; self.data.len()],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y * self.width + x])
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    pub fn map(&self, f: impl Fn(u8) -> u8) -> Self {
        Self {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}

/// A raster holding only its two sentinel values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    raster: GrayRaster,
    sentinels: Sentinels,
}

impl Mask {
    /// Wraps `raster`, rejecting any pixel that is not one of `sentinels`.
    pub fn from_raster(raster: GrayRaster, sentinels: Sentinels) -> Result<Self> {
        let stray = raster
            .data()
            .iter()
            .position(|&v| v != sentinels.foreground && v != sentinels.background);
        if let Some(idx) = stray {
            return Err(MapError::NotBinary {
                x: idx % raster.width,
                y: idx / raster.width,
                value: raster.data[idx],
            });
        }
        Ok(Self { raster, sentinels })
    }

    pub(crate) fn from_raster_unchecked(raster: GrayRaster, sentinels: Sentinels) -> Self {
        debug_assert!(raster
            .data()
            .iter()
            .all(|&v| v == sentinels.foreground || v == sentinels.background));
        Self { raster, sentinels }
    }

    pub fn filled(width: usize, height: usize, foreground: bool, sentinels: Sentinels) -> Result<Self> {
        let value = if foreground {
            sentinels.foreground
        } else {
            sentinels.background
        };
        Ok(Self {
            raster: GrayRaster::filled(width, height, value)?,
            sentinels,
        })
    }

    pub fn width(&self) -> usize {
        self.raster.width
    }

    pub fn height(&self) -> usize {
        self.raster.height
    }

    pub fn sentinels(&self) -> Sentinels {
        self.sentinels
    }

    pub fn is_foreground(&self, x: usize, y: usize) -> bool {
        self.raster.get(x, y) == Some(self.sentinels.foreground)
    }

    pub fn foreground_count(&self) -> usize {
        self.raster
            .data()
            .iter()
            .filter(|&&v| v == self.sentinels.foreground)
            .count()
    }

    /// Swaps foreground and background pixels, keeping the sentinel roles.
    pub fn complement(&self) -> Self {
        let Sentinels {
            foreground,
            background,
        } = self.sentinels;
        let raster = self
            .raster
            .map(|v| if v == foreground { background } else { foreground });
        Self {
            raster,
            sentinels: self.sentinels,
        }
    }

    pub fn as_raster(&self) -> &GrayRaster {
        &self.raster
    }

    pub fn into_raster(self) -> GrayRaster {
        self.raster
    }
}

/// Interleaved RGBA output raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaRaster {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbaRaster {
    pub fn from_vec(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let expected = checked_area(width, height)? * 4;
        if data.len() != expected {
            return Err(MapError::EncodeError(format!(
                "expected {} RGBA bytes for {}x{}, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Drops the alpha channel, for encoders without alpha support.
    pub fn to_rgb(&self) -> Vec<u8> {
        self.data
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }
}
