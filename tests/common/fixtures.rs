use image::{DynamicImage, Rgb, RgbImage};
use segmeter::{PipelineConfig, PointQuad};
use std::path::Path;

/// Corner position of the synthetic display region inside the test frame.
pub const DISPLAY_X: u32 = 150;
pub const DISPLAY_Y: u32 = 120;
pub const DISPLAY_W: u32 = 200;
pub const DISPLAY_H: u32 = 100;

/// An 800x600 camera frame: bright display panel with dark digit-like bars,
/// on a mid-gray bench background.
pub fn create_display_frame() -> DynamicImage {
    let mut img = RgbImage::from_pixel(800, 600, Rgb([70u8, 70, 70]));

    // Bright display panel.
    for y in DISPLAY_Y..DISPLAY_Y + DISPLAY_H {
        for x in DISPLAY_X..DISPLAY_X + DISPLAY_W {
            img.put_pixel(x, y, Rgb([220, 220, 220]));
        }
    }

    // Three dark vertical bars standing in for digit strokes, well inside the
    // panel so flood fill from the border cannot reach them.
    for bar in 0..3u32 {
        let x0 = DISPLAY_X + 40 + bar * 50;
        for y in DISPLAY_Y + 20..DISPLAY_Y + DISPLAY_H - 20 {
            for x in x0..x0 + 12 {
                img.put_pixel(x, y, Rgb([15, 15, 15]));
            }
        }
    }

    DynamicImage::ImageRgb8(img)
}

/// Calibration quad matching the synthetic display panel exactly.
pub fn display_quad() -> PointQuad {
    let (x, y) = (DISPLAY_X as f32, DISPLAY_Y as f32);
    let (w, h) = (DISPLAY_W as f32, DISPLAY_H as f32);
    PointQuad::new((x, y), (x + w, y), (x + w, y + h), (x, y + h))
}

/// A quad with two coincident corners: zero target width.
pub fn degenerate_quad() -> PointQuad {
    PointQuad::new((100.0, 100.0), (100.0, 100.0), (100.0, 100.0), (100.0, 100.0))
}

/// Pipeline configuration writing artifacts into a test directory, with a
/// small padding border to keep the test masks small.
pub fn test_config(artifact_dir: &Path, debug: bool) -> PipelineConfig {
    PipelineConfig {
        quad: display_quad(),
        border: 20,
        artifact_dir: artifact_dir.to_path_buf(),
        debug,
        ..PipelineConfig::default()
    }
}
