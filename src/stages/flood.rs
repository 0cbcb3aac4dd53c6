use std::collections::VecDeque;

use image::{imageops, DynamicImage, GrayImage, Luma};

use crate::error::PipelineError;
use crate::pipeline::{PipelineContext, PipelineStep, SUFFIX_FLOOD_FILL};

/// Remove background noise reachable from the frame edge, then pad the mask.
///
/// Every border pixel still at 0 seeds a 4-connected flood fill with the fill
/// value, which erases noise blobs touching the frame while leaving enclosed
/// glyph strokes alone. The padding afterwards gives the morphological
/// kernels working room at what were the image edges.
pub struct FloodCleanStep {
    /// Margin added on every side, in pixels.
    pub border: u32,
    /// Value written by both the flood fill and the padding.
    pub fill: u8,
}

/// 4-connected flood fill starting at (x, y), replacing the seed's value.
///
/// A no-op when the seed already holds `replacement`.
pub fn flood_fill(mask: &mut GrayImage, x: u32, y: u32, replacement: u8) {
    let target = mask.get_pixel(x, y)[0];
    if target == replacement {
        return;
    }
    let (width, height) = mask.dimensions();
    let mut queue = VecDeque::new();
    mask.put_pixel(x, y, Luma([replacement]));
    queue.push_back((x, y));

    while let Some((cx, cy)) = queue.pop_front() {
        let visit = |nx: u32, ny: u32, mask: &mut GrayImage, queue: &mut VecDeque<(u32, u32)>| {
            if mask.get_pixel(nx, ny)[0] == target {
                mask.put_pixel(nx, ny, Luma([replacement]));
                queue.push_back((nx, ny));
            }
        };
        if cx > 0 {
            visit(cx - 1, cy, mask, &mut queue);
        }
        if cx + 1 < width {
            visit(cx + 1, cy, mask, &mut queue);
        }
        if cy > 0 {
            visit(cx, cy - 1, mask, &mut queue);
        }
        if cy + 1 < height {
            visit(cx, cy + 1, mask, &mut queue);
        }
    }
}

fn pad(mask: &GrayImage, border: u32, fill: u8) -> GrayImage {
    let (width, height) = mask.dimensions();
    let mut canvas = GrayImage::from_pixel(width + 2 * border, height + 2 * border, Luma([fill]));
    imageops::replace(&mut canvas, mask, border as i64, border as i64);
    canvas
}

impl PipelineStep for FloodCleanStep {
    fn process(
        &self,
        image: &DynamicImage,
        _context: &PipelineContext,
    ) -> Result<DynamicImage, PipelineError> {
        let mut mask = image.to_luma8();
        let (width, height) = mask.dimensions();

        for y in 0..height {
            for x in 0..width {
                if y == 0 || x == 0 || y == height - 1 || x == width - 1 {
                    if mask.get_pixel(x, y)[0] == 0 {
                        flood_fill(&mut mask, x, y, self.fill);
                    }
                }
            }
        }

        Ok(DynamicImage::ImageLuma8(pad(&mask, self.border, self.fill)))
    }

    fn name(&self) -> &str {
        "Border Flood Fill"
    }

    fn suffix(&self) -> &str {
        SUFFIX_FLOOD_FILL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> PipelineContext {
        PipelineContext {
            artifact_dir: std::path::PathBuf::from("assets"),
            prefix: String::from("display"),
            debug: false,
            verbose: false,
        }
    }

    fn run(step: &FloodCleanStep, mask: GrayImage) -> GrayImage {
        step.process(&DynamicImage::ImageLuma8(mask), &context())
            .unwrap()
            .to_luma8()
    }

    #[test]
    fn border_touching_noise_is_erased_and_enclosed_strokes_survive() {
        // 7x7 white mask: a black blob hanging off the top border and a black
        // stroke fully enclosed in the interior.
        let mut mask = GrayImage::from_pixel(7, 7, Luma([255]));
        mask.put_pixel(3, 0, Luma([0]));
        mask.put_pixel(3, 1, Luma([0]));
        mask.put_pixel(2, 4, Luma([0]));
        mask.put_pixel(3, 4, Luma([0]));
        mask.put_pixel(4, 4, Luma([0]));

        let step = FloodCleanStep { border: 2, fill: 255 };
        let out = run(&step, mask);

        // Interior starts at the padding offset.
        assert_eq!(out.get_pixel(3 + 2, 0 + 2)[0], 255);
        assert_eq!(out.get_pixel(3 + 2, 1 + 2)[0], 255);
        assert_eq!(out.get_pixel(2 + 2, 4 + 2)[0], 0);
        assert_eq!(out.get_pixel(3 + 2, 4 + 2)[0], 0);
        assert_eq!(out.get_pixel(4 + 2, 4 + 2)[0], 0);
    }

    #[test]
    fn padding_surrounds_the_exact_input_dimensions() {
        let mask = GrayImage::from_pixel(11, 5, Luma([0]));
        let step = FloodCleanStep { border: 250, fill: 255 };
        let out = run(&step, mask);

        assert_eq!(out.dimensions(), (11 + 500, 5 + 500));
        // Margin holds the sentinel on all four sides.
        assert_eq!(out.get_pixel(0, 0)[0], 255);
        assert_eq!(out.get_pixel(249, 252)[0], 255);
        assert_eq!(out.get_pixel(510, 504)[0], 255);
    }

    #[test]
    fn all_white_border_is_a_no_op_fill() {
        // White ring, black center pixel: no border pixel is background, so
        // only the padding happens and the center stays black.
        let mut mask = GrayImage::from_pixel(5, 5, Luma([255]));
        mask.put_pixel(2, 2, Luma([0]));
        let step = FloodCleanStep { border: 1, fill: 255 };
        let out = run(&step, mask);
        assert_eq!(out.dimensions(), (7, 7));
        assert_eq!(out.get_pixel(3, 3)[0], 0);
    }

    #[test]
    fn fill_is_not_reseeded_from_filled_pixels() {
        // Fully black mask: the first seed fills everything; remaining border
        // pixels are already at 255 and are skipped.
        let mask = GrayImage::from_pixel(6, 6, Luma([0]));
        let step = FloodCleanStep { border: 0, fill: 255 };
        let out = run(&step, mask);
        for pixel in out.pixels() {
            assert_eq!(pixel[0], 255);
        }
    }

    #[test]
    fn flood_fill_respects_4_connectivity() {
        // Diagonal neighbors must not connect: black at (0,0) and (1,1) with
        // white in between.
        let mut mask = GrayImage::from_pixel(3, 3, Luma([255]));
        mask.put_pixel(0, 0, Luma([0]));
        mask.put_pixel(1, 1, Luma([0]));
        flood_fill(&mut mask, 0, 0, 128);
        assert_eq!(mask.get_pixel(0, 0)[0], 128);
        assert_eq!(mask.get_pixel(1, 1)[0], 0);
    }
}
