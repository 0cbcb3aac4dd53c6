use image::{DynamicImage, GrayImage, Luma};

use crate::error::PipelineError;
use crate::pipeline::{PipelineContext, PipelineStep, SUFFIX_THRESHOLD};

/// Fixed-threshold binarization of the rectified display.
///
/// Luminance strictly above the threshold becomes 255, everything else 0.
/// The threshold is a calibration constant for one lighting setup; there is
/// no adaptive fallback.
pub struct ThresholdStep {
    pub threshold: u8,
}

impl PipelineStep for ThresholdStep {
    fn process(
        &self,
        image: &DynamicImage,
        _context: &PipelineContext,
    ) -> Result<DynamicImage, PipelineError> {
        let gray = image.to_luma8();
        let (width, height) = gray.dimensions();
        let mut mask = GrayImage::new(width, height);
        for (x, y, pixel) in gray.enumerate_pixels() {
            let value = if pixel[0] > self.threshold { 255u8 } else { 0u8 };
            mask.put_pixel(x, y, Luma([value]));
        }
        Ok(DynamicImage::ImageLuma8(mask))
    }

    fn name(&self) -> &str {
        "Thresholding"
    }

    fn suffix(&self) -> &str {
        SUFFIX_THRESHOLD
    }
}
