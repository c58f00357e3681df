//! Camera RAW reader built on the rawloader library.
//!
//! Supports whatever rawloader decodes (ARW, CR2, NEF, DNG, ...). Bayer sensor data is
//! demosaiced, black/white levels are normalized, white balance is applied and the
//! result is gamma-encoded into 8-bit RGB so it can enter the grayscale stage like any
//! other photograph.

use std::io::Cursor;

use rawloader::RawImageData as RawloaderImageData;
use tracing::debug;

use crate::image_pipeline::common::error::{MapError, Result};
use crate::image_pipeline::source::cpu_debayer::{BayerFrame, CpuDebayer};
use crate::image_pipeline::source::reader::SourceReader;
use crate::image_pipeline::source::types::SourceImage;

/// Display gamma applied after linear normalization.
const OUTPUT_GAMMA: f32 = 1.0 / 2.2;

#[derive(Default)]
pub struct RawLoaderReader;

/// Per-channel levels and white balance taken from the RAW metadata.
struct Levels {
    black: f32,
    range: f32,
    wb: [f32; 3],
}

impl Levels {
    fn from_raw(decoded: &rawloader::RawImage) -> Self {
        let black = decoded.blacklevels[0] as f32;
        let white = decoded.whitelevels[0] as f32;
        let green = decoded.wb_coeffs[1];
        let wb = if green.is_finite() && green > 0.0 {
            [
                sanitize_wb(decoded.wb_coeffs[0] / green),
                1.0,
                sanitize_wb(decoded.wb_coeffs[2] / green),
            ]
        } else {
            [1.0; 3]
        };
        Self {
            black,
            range: (white - black).max(1.0),
            wb,
        }
    }

    fn to_u8(&self, sample: u16, channel: usize) -> u8 {
        let linear = ((sample as f32 - self.black).max(0.0) / self.range) * self.wb[channel];
        (linear.clamp(0.0, 1.0).powf(OUTPUT_GAMMA) * 255.0).round() as u8
    }
}

fn sanitize_wb(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 { v } else { 1.0 }
}

impl SourceReader for RawLoaderReader {
    fn read_source(&self, data: &[u8]) -> Result<SourceImage> {
        debug!("Decoding RAW image, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| MapError::DecodeError(e.to_string()))?;
        let width = decoded.width;
        let height = decoded.height;
        debug!("Decoded RAW: {}x{}, cpp={}", width, height, decoded.cpp);

        let samples: Vec<u16> = match &decoded.data {
            RawloaderImageData::Integer(values) => values.clone(),
            RawloaderImageData::Float(values) => values
                .iter()
                .map(|&v| (v.clamp(0.0, 1.0) * u16::MAX as f32) as u16)
                .collect(),
        };

        let rgb16 = match decoded.cpp {
            1 => CpuDebayer.process(&BayerFrame {
                width,
                height,
                pattern: &decoded.cfa.name,
                data: &samples,
            })?,
            3 => samples,
            other => {
                return Err(MapError::UnsupportedFormat(format!(
                    "{} components per RAW pixel",
                    other
                )));
            }
        };

        let levels = Levels::from_raw(&decoded);
        let rgb8: Vec<u8> = rgb16
            .iter()
            .enumerate()
            .map(|(i, &v)| levels.to_u8(v, i % 3))
            .collect();

        SourceImage::new(width, height, 3, rgb8)
    }
}
