use std::path::PathBuf;

use crate::models::PointQuad;

/// Tuning constants for one physical camera mounting.
///
/// Every magic number of the pipeline lives here so stages can be exercised
/// against synthetic geometries. The defaults reproduce the rig this pipeline
/// was calibrated on: an ESP32-CAM pointed at a bench multimeter's 7-segment
/// display under fixed lighting.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Display corners in the source frame.
    pub quad: PointQuad,
    /// Global binarization threshold on the 0-255 luminance scale. Pixels
    /// strictly above it become white. Tuned to one lighting setup; there is
    /// no adaptive fallback.
    pub threshold: u8,
    /// Margin, in pixels, added on every side after border flood fill so the
    /// morphological kernels have working room at the former image edges.
    pub border: u32,
    /// Value the flood fill and the padding write into the mask.
    pub border_value: u8,
    /// Raw OCR number divided by this gives the reading in volts.
    pub scale_divisor: f64,
    /// Directory the stage artifacts are written to.
    pub artifact_dir: PathBuf,
    /// Filename prefix shared by all artifacts of this pipeline.
    pub prefix: String,
    /// Debug mode: timestamped artifact paths (full history kept) and
    /// per-stage reporting. Off: fixed paths overwritten every run.
    pub debug: bool,
    /// Progress reporting on stdout.
    pub verbose: bool,
    /// Directory holding the ocrs model files. `None` means the standard
    /// `~/.cache/ocrs` location.
    pub model_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            quad: PointQuad::new((76.0, 160.0), (705.0, 114.0), (727.0, 514.0), (57.0, 590.0)),
            threshold: 110,
            border: 250,
            border_value: 255,
            scale_divisor: 1000.0,
            artifact_dir: PathBuf::from("assets"),
            prefix: String::from("display"),
            debug: false,
            verbose: false,
            model_dir: None,
        }
    }
}
