/// Errors that abort a pipeline run.
///
/// An unreadable instrument is *not* an error — OCR that yields no parseable
/// text produces [`crate::models::Reading::NoReading`]. These variants cover
/// the failures a caller must be able to tell apart from a zero reading.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The calibration quad is degenerate (zero width/height, coincident
    /// corners) or its projective transform is singular.
    #[error("invalid calibration quad: {0}")]
    Geometry(String),

    /// The caller handed the pipeline an empty raster.
    #[error("input image is empty")]
    EmptyInput,

    /// The persisted glyph mask could not be loaded back for OCR.
    #[error("could not load glyph mask: {0}")]
    MaskLoad(String),

    /// The OCR engine could not be initialized (missing or broken models).
    #[error("OCR engine unavailable: {0}")]
    EngineInit(String),
}
