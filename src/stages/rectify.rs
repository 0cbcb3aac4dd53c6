use image::{DynamicImage, Rgb, RgbImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};

use crate::error::PipelineError;
use crate::models::PointQuad;
use crate::pipeline::{PipelineContext, PipelineStep, SUFFIX_PERSPECTIVE};

/// Unwarp the display quad onto an axis-aligned rectangle.
///
/// The target rectangle takes the longer of each pair of opposite quad edges
/// as its width and height, so the display is resampled at roughly its native
/// resolution.
pub struct PerspectiveStep {
    quad: PointQuad,
}

impl PerspectiveStep {
    pub fn new(quad: PointQuad) -> Self {
        Self { quad }
    }
}

impl PipelineStep for PerspectiveStep {
    fn process(
        &self,
        image: &DynamicImage,
        _context: &PipelineContext,
    ) -> Result<DynamicImage, PipelineError> {
        let width = self.quad.target_width();
        let height = self.quad.target_height();

        // from_control_points computes the mapping from the source quad to
        // the target corners; it fails on degenerate point sets.
        let projection =
            Projection::from_control_points(self.quad.source_points(), self.quad.target_points())
                .ok_or_else(|| {
                    PipelineError::Geometry("projective transform is singular".to_string())
                })?;

        let source = image.to_rgb8();
        let mut rectified = RgbImage::new(width, height);
        warp_into(
            &source,
            &projection,
            Interpolation::Bilinear,
            Rgb([0u8, 0, 0]),
            &mut rectified,
        );

        Ok(DynamicImage::ImageRgb8(rectified))
    }

    fn name(&self) -> &str {
        "Perspective Correction"
    }

    fn suffix(&self) -> &str {
        SUFFIX_PERSPECTIVE
    }

    fn validate(&self) -> Result<(), PipelineError> {
        self.quad.validate()?;
        // Coincident or collinear corners can leave both target dimensions
        // nonzero while the transform is still singular; build it once here
        // so every degenerate quad aborts before anything touches disk.
        Projection::from_control_points(self.quad.source_points(), self.quad.target_points())
            .map(|_| ())
            .ok_or_else(|| PipelineError::Geometry("projective transform is singular".to_string()))
    }
}
