//! 3x3 binary erosion and dilation.
//!
//! Both operations are the same hit-or-miss scan: look for a target sentinel anywhere
//! in the 3x3 window of the input mask and write one value on a hit, another on a miss.
//! The outermost ring of the output is never computed and is always background, so
//! every pass also clears the border.
//!
//! Each pass reads only its input and writes a freshly allocated mask. Output rows are
//! independent and are filled in parallel.

use rayon::prelude::*;

use crate::image_pipeline::raster::Mask;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphOp {
    Erode,
    Dilate,
}

impl MorphOp {
    pub fn apply(self, mask: &Mask) -> Mask {
        match self {
            MorphOp::Erode => erode(mask),
            MorphOp::Dilate => dilate(mask),
        }
    }

    /// `passes` sequential applications. Zero passes returns a copy of `mask`.
    pub fn apply_n(self, mask: &Mask, passes: u32) -> Mask {
        let mut current = mask.clone();
        for _ in 0..passes {
            current = self.apply(&current);
        }
        current
    }
}

#[derive(Debug, Clone, Copy)]
struct Probe {
    target: u8,
    hit: u8,
    miss: u8,
}

/// Foreground survives only where its whole neighbourhood is foreground.
pub fn erode(mask: &Mask) -> Mask {
    let s = mask.sentinels();
    hit_or_miss(
        mask,
        Probe {
            target: s.background(),
            hit: s.background(),
            miss: s.foreground(),
        },
    )
}

/// Foreground spreads to every pixel with a foreground neighbour.
pub fn dilate(mask: &Mask) -> Mask {
    let s = mask.sentinels();
    hit_or_miss(
        mask,
        Probe {
            target: s.foreground(),
            hit: s.foreground(),
            miss: s.background(),
        },
    )
}

pub fn erode_n(mask: &Mask, passes: u32) -> Mask {
    MorphOp::Erode.apply_n(mask, passes)
}

pub fn dilate_n(mask: &Mask, passes: u32) -> Mask {
    MorphOp::Dilate.apply_n(mask, passes)
}

fn hit_or_miss(mask: &Mask, probe: Probe) -> Mask {
    let src = mask.as_raster();
    let width = src.width();
    let height = src.height();
    let mut out = src.blank_like(mask.sentinels().background());

    if width >= 3 && height >= 3 {
        let pixels = src.data();
        out.data_mut()
            .par_chunks_mut(width)
            .enumerate()
            .filter(|(y, _)| *y > 0 && *y < height - 1)
            .for_each(|(y, row)| {
                for (x, px) in row.iter_mut().enumerate().take(width - 1).skip(1) {
                    *px = if window_contains(pixels, width, x, y, probe.target) {
                        probe.hit
                    } else {
                        probe.miss
                    };
                }
            });
    }

    Mask::from_raster_unchecked(out, mask.sentinels())
}

/// Row-major search of the 3x3 window centred on interior pixel `(x, y)`.
fn window_contains(pixels: &[u8], width: usize, x: usize, y: usize, target: u8) -> bool {
    (y - 1..=y + 1).any(|ny| {
        let row = ny * width;
        pixels[row + x - 1..=row + x + 1].contains(&target)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::raster::{BLACK, GrayRaster, Sentinels, WHITE};

    fn mask_from(width: usize, height: usize, rows: &[&str]) -> Mask {
        let data = rows
            .iter()
            .flat_map(|r| r.chars().map(|c| if c == '#' { WHITE } else { BLACK }))
            .collect();
        Mask::from_raster(GrayRaster::from_vec(width, height, data).unwrap(), Sentinels::BINARY)
            .unwrap()
    }

    fn render(mask: &Mask) -> Vec<String> {
        (0..mask.height())
            .map(|y| {
                (0..mask.width())
                    .map(|x| if mask.is_foreground(x, y) { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }

    fn border_is_background(mask: &Mask) -> bool {
        let (w, h) = (mask.width(), mask.height());
        (0..w).all(|x| !mask.is_foreground(x, 0) && !mask.is_foreground(x, h - 1))
            && (0..h).all(|y| !mask.is_foreground(0, y) && !mask.is_foreground(w - 1, y))
    }

    /// Deterministic speckle pattern with a black border.
    fn speckled(width: usize, height: usize) -> Mask {
        let data = (0..width * height)
            .map(|i| {
                let (x, y) = (i % width, i / width);
                let inner = x > 0 && y > 0 && x < width - 1 && y < height - 1;
                if inner && (x * 7 + y * 13 + x * y) % 5 < 3 { WHITE } else { BLACK }
            })
            .collect();
        Mask::from_raster(GrayRaster::from_vec(width, height, data).unwrap(), Sentinels::BINARY)
            .unwrap()
    }

    #[test]
    fn erode_all_white_5x5_keeps_interior() {
        let mask = Mask::filled(5, 5, true, Sentinels::BINARY).unwrap();

        let once = erode(&mask);
        assert_eq!(
            render(&once),
            vec![".....", ".###.", ".###.", ".###.", "....."]
        );

        let twice = erode(&once);
        assert_eq!(
            render(&twice),
            vec![".....", ".....", "..#..", ".....", "....."]
        );
    }

    #[test]
    fn dilate_all_black_stays_black() {
        let mask = Mask::filled(4, 4, false, Sentinels::BINARY).unwrap();
        let out = dilate(&mask);
        assert_eq!(out.foreground_count(), 0);
        assert_eq!(out, mask);
    }

    #[test]
    fn dilate_single_centre_pixel_grows_to_block() {
        let mask = mask_from(5, 5, &[".....", ".....", "..#..", ".....", "....."]);
        let out = dilate(&mask);
        assert_eq!(render(&out), vec![".....", ".###.", ".###.", ".###.", "....."]);
    }

    #[test]
    fn erode_removes_isolated_speck() {
        let mask = mask_from(
            6,
            5,
            &["......", ".#....", "...###", "...###", "...###"],
        );
        let out = erode(&mask);
        assert!(!out.is_foreground(1, 1));
        // Only the block pixel whose whole window is foreground survives.
        assert!(out.is_foreground(4, 3));
        assert_eq!(out.foreground_count(), 1);
    }

    #[test]
    fn border_is_cleared_by_every_pass() {
        let full = Mask::filled(7, 6, true, Sentinels::BINARY).unwrap();
        assert!(border_is_background(&erode(&full)));
        assert!(border_is_background(&dilate(&full)));

        let speck = speckled(9, 8);
        assert!(border_is_background(&dilate_n(&speck, 3)));
        assert!(border_is_background(&erode_n(&speck, 2)));
    }

    #[test]
    fn tiny_masks_come_out_background() {
        for (w, h) in [(1, 1), (2, 5), (5, 2)] {
            let full = Mask::filled(w, h, true, Sentinels::BINARY).unwrap();
            assert_eq!(dilate(&full).foreground_count(), 0);
            assert_eq!(erode(&full).foreground_count(), 0);
        }
    }

    #[test]
    fn erosion_and_dilation_are_dual_on_interior() {
        let mask = speckled(12, 10);
        let eroded_complement = erode(&mask).complement();
        let dilated_of_complement = dilate(&mask.complement());

        for y in 1..mask.height() - 1 {
            for x in 1..mask.width() - 1 {
                assert_eq!(
                    dilated_of_complement.is_foreground(x, y),
                    eroded_complement.is_foreground(x, y),
                    "pixel ({}, {})",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn repeated_dilation_never_shrinks() {
        let mut mask = speckled(15, 11);
        let mut count = mask.foreground_count();
        assert!(count > 0);
        for _ in 0..8 {
            mask = dilate(&mask);
            assert!(mask.foreground_count() >= count);
            count = mask.foreground_count();
        }
    }

    #[test]
    fn repeated_erosion_never_grows() {
        let mut mask = Mask::filled(15, 11, true, Sentinels::BINARY).unwrap();
        let mut count = mask.foreground_count();
        for _ in 0..8 {
            mask = erode(&mask);
            assert!(mask.foreground_count() <= count);
            count = mask.foreground_count();
        }
        assert_eq!(count, 0);
    }

    #[test]
    fn input_is_left_untouched() {
        let mask = speckled(8, 8);
        let before = mask.clone();
        let _ = erode(&mask);
        let _ = dilate(&mask);
        assert_eq!(mask, before);
    }

    #[test]
    fn apply_n_zero_is_identity() {
        let mask = speckled(6, 6);
        assert_eq!(MorphOp::Dilate.apply_n(&mask, 0), mask);
        assert_eq!(MorphOp::Erode.apply_n(&mask, 2), erode(&erode(&mask)));
    }

    #[test]
    fn swapped_sentinels_follow_mask() {
        let sentinels = Sentinels::BINARY.swapped();
        let raster = GrayRaster::from_vec(3, 3, vec![255, 255, 255, 255, 0, 255, 255, 255, 255]).unwrap();
        let mask = Mask::from_raster(raster, sentinels).unwrap();

        let out = dilate(&mask);
        // Foreground is 0 here; the ring becomes the background value 255.
        assert_eq!(out.as_raster().get(1, 1), Some(0));
        assert_eq!(out.as_raster().get(0, 0), Some(255));
    }
}
