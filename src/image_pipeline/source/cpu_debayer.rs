use std::io::Cursor;

use bayer::{BayerDepth, CFA, Demosaic, RasterDepth, RasterMut};
use tracing::debug;

use crate::image_pipeline::common::error::{MapError, Result};

/// Single-channel sensor data laid out in a 2x2 colour filter pattern.
pub(crate) struct BayerFrame<'a> {
    pub width: usize,
    pub height: usize,
    pub pattern: &'a str,
    pub data: &'a [u16],
}

/// Bilinear demosaic on the CPU.
pub(crate) struct CpuDebayer;

impl CpuDebayer {
    /// Returns interleaved 16-bit RGB with the same scale as the input samples.
    pub fn process(&self, frame: &BayerFrame<'_>) -> Result<Vec<u16>> {
        let cfa = cfa_from_name(frame.pattern)?;
        debug!(
            "Demosaicing {}x{} frame, CFA={}",
            frame.width, frame.height, frame.pattern
        );

        let bayer_bytes: Vec<u8> = frame.data.iter().flat_map(|&v| v.to_le_bytes()).collect();
        let mut output_buf = vec![0u8; frame.width * frame.height * 3 * 2];

        {
            let mut output_raster = RasterMut::new(
                frame.width,
                frame.height,
                RasterDepth::Depth16,
                &mut output_buf,
            );
            bayer::run_demosaic(
                &mut Cursor::new(&bayer_bytes[..]),
                BayerDepth::Depth16LE,
                cfa,
                Demosaic::Linear,
                &mut output_raster,
            )
            .map_err(|e| MapError::DecodeError(format!("Demosaic failed: {:?}", e)))?;
        }

        // RasterMut writes 16-bit samples in native byte order.
        Ok(output_buf
            .chunks_exact(2)
            .map(|b| u16::from_ne_bytes([b[0], b[1]]))
            .collect())
    }
}

fn cfa_from_name(name: &str) -> Result<CFA> {
    match name {
        "RGGB" => Ok(CFA::RGGB),
        "BGGR" => Ok(CFA::BGGR),
        "GRBG" => Ok(CFA::GRBG),
        "GBRG" => Ok(CFA::GBRG),
        other => Err(MapError::UnsupportedFormat(format!(
            "colour filter pattern '{}'",
            other
        ))),
    }
}
