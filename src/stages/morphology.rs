use image::{imageops, DynamicImage, GrayImage, Luma};

use crate::error::PipelineError;
use crate::pipeline::{PipelineContext, PipelineStep, SUFFIX_MORPHOLOGY};

/// Rectangular structuring element, anchored at its center.
///
/// imageproc's norm-based erode/dilate only produce diamond or square
/// neighborhoods, so the direction-specific 1x5 and 5x1 kernels are applied
/// with a plain min/max window scan instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    pub width: u32,
    pub height: u32,
}

impl Kernel {
    pub const fn rect(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// 5x5 square: speckle removal and hole filling.
pub const SQUARE_5X5: Kernel = Kernel::rect(5, 5);
/// 1 wide, 5 tall: acts on vertical stroke thickness.
pub const VERTICAL_1X5: Kernel = Kernel::rect(1, 5);
/// 5 wide, 1 tall: acts on horizontal stroke thickness.
pub const HORIZONTAL_5X1: Kernel = Kernel::rect(5, 1);

fn window_scan(image: &GrayImage, kernel: Kernel, take_max: bool) -> GrayImage {
    let (width, height) = image.dimensions();
    let half_w = (kernel.width / 2) as i64;
    let half_h = (kernel.height / 2) as i64;
    let mut out = GrayImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let mut extreme = if take_max { 0u8 } else { 255u8 };
            for dy in -half_h..=(kernel.height as i64 - 1 - half_h) {
                for dx in -half_w..=(kernel.width as i64 - 1 - half_w) {
                    // Replicated border: clamp sample coordinates.
                    let sx = (x as i64 + dx).clamp(0, width as i64 - 1) as u32;
                    let sy = (y as i64 + dy).clamp(0, height as i64 - 1) as u32;
                    let v = image.get_pixel(sx, sy)[0];
                    extreme = if take_max { extreme.max(v) } else { extreme.min(v) };
                }
            }
            out.put_pixel(x, y, Luma([extreme]));
        }
    }
    out
}

/// Morphological erosion: each pixel becomes the minimum over the kernel
/// window.
pub fn erode(image: &GrayImage, kernel: Kernel) -> GrayImage {
    window_scan(image, kernel, false)
}

/// Morphological dilation: each pixel becomes the maximum over the kernel
/// window.
pub fn dilate(image: &GrayImage, kernel: Kernel) -> GrayImage {
    window_scan(image, kernel, true)
}

/// Opening: erosion then dilation. Removes small foreground specks.
pub fn open(image: &GrayImage, kernel: Kernel) -> GrayImage {
    dilate(&erode(image, kernel), kernel)
}

/// Closing: dilation then erosion. Fills small background holes.
pub fn close(image: &GrayImage, kernel: Kernel) -> GrayImage {
    erode(&dilate(image, kernel), kernel)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphOp {
    Open,
    Close,
    Erode,
    Dilate,
}

/// The glyph reconstruction program, executed strictly in order.
///
/// The kernel shapes and iteration counts are empirically tuned to the stroke
/// width and spacing of the target 7-segment font after rectification at this
/// resolution. The steps do not commute: the intermediate blob topology
/// matters, so this stays an ordered list rather than fused operations.
pub const GLYPH_PROGRAM: &[(MorphOp, Kernel, u32)] = &[
    // Speckle and hole cleanup.
    (MorphOp::Open, SQUARE_5X5, 1),
    (MorphOp::Close, SQUARE_5X5, 1),
    // Thin vertical strokes to separate segments touching top-to-bottom.
    (MorphOp::Erode, VERTICAL_1X5, 10),
    // Thin then partially restore horizontal strokes, dropping thin
    // horizontal noise while keeping digit bars.
    (MorphOp::Erode, HORIZONTAL_5X1, 3),
    (MorphOp::Dilate, HORIZONTAL_5X1, 2),
    // Restore the vertical stroke thickness lost above.
    (MorphOp::Dilate, VERTICAL_1X5, 3),
];

/// Run a morphology program over a mask.
pub fn run_program(mask: &GrayImage, program: &[(MorphOp, Kernel, u32)]) -> GrayImage {
    let mut image = mask.clone();
    for &(op, kernel, iterations) in program {
        for _ in 0..iterations {
            image = match op {
                MorphOp::Open => open(&image, kernel),
                MorphOp::Close => close(&image, kernel),
                MorphOp::Erode => erode(&image, kernel),
                MorphOp::Dilate => dilate(&image, kernel),
            };
        }
    }
    image
}

/// Rebuild clean glyph strokes from the flood-cleaned mask.
///
/// Applies [`GLYPH_PROGRAM`], then inverts polarity so glyph ink ends up as
/// foreground (255) on a background of 0, the orientation OCR expects.
pub struct ReconstructStep;

impl PipelineStep for ReconstructStep {
    fn process(
        &self,
        image: &DynamicImage,
        _context: &PipelineContext,
    ) -> Result<DynamicImage, PipelineError> {
        let mut mask = run_program(&image.to_luma8(), GLYPH_PROGRAM);
        imageops::invert(&mut mask);
        Ok(DynamicImage::ImageLuma8(mask))
    }

    fn name(&self) -> &str {
        "Glyph Reconstruction"
    }

    fn suffix(&self) -> &str {
        SUFFIX_MORPHOLOGY
    }
}
