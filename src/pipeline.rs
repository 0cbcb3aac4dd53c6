use std::path::PathBuf;

use image::DynamicImage;
use time::OffsetDateTime;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::models::Reading;
use crate::stages::{self, FloodCleanStep, PerspectiveStep, ReconstructStep, ThresholdStep};

/// Artifact suffix for the persisted input frame.
pub const SUFFIX_INPUT: &str = "_input";
/// Artifact suffix for the rectified image.
pub const SUFFIX_PERSPECTIVE: &str = "_perspective";
/// Artifact suffix for the binarized mask.
pub const SUFFIX_THRESHOLD: &str = "_threshold";
/// Artifact suffix for the flood-cleaned, padded mask.
pub const SUFFIX_FLOOD_FILL: &str = "_flood_fill";
/// Artifact suffix for the reconstructed glyph mask fed to OCR.
pub const SUFFIX_MORPHOLOGY: &str = "_morphology";

/// Context available to all pipeline steps.
///
/// Debug is an explicit value threaded through every stage call, never a
/// global toggle.
#[derive(Clone, Debug)]
pub struct PipelineContext {
    /// Directory for stage artifacts.
    pub artifact_dir: PathBuf,
    /// Filename prefix shared by all artifacts.
    pub prefix: String,
    /// Timestamped artifact names, retained across runs.
    pub debug: bool,
    /// Stage progress on stdout.
    pub verbose: bool,
}

impl PipelineContext {
    /// The timestamp fragment for this run: empty in non-debug mode so paths
    /// overwrite, `_YYYY_MM_DD_HH_MM_SS` in debug mode so history accumulates.
    ///
    /// Computed once per run and reused for every stage so a single run always
    /// yields one coherent file set.
    pub fn run_stamp(&self) -> String {
        if !self.debug {
            return String::new();
        }
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        format!(
            "_{:04}_{:02}_{:02}_{:02}_{:02}_{:02}",
            now.year(),
            u8::from(now.month()),
            now.day(),
            now.hour(),
            now.minute(),
            now.second()
        )
    }

    /// Path a stage's artifact is persisted under.
    pub fn stage_path(&self, run_stamp: &str, suffix: &str) -> PathBuf {
        self.artifact_dir
            .join(format!("{}{}{}.png", self.prefix, run_stamp, suffix))
    }

    /// Whether persisted artifact paths are reported on stdout. Debug runs
    /// always report them — the files are the inspection surface — and
    /// verbose runs report them too.
    pub fn reports_artifacts(&self) -> bool {
        self.debug || self.verbose
    }
}

/// One image-to-image stage of the pipeline.
pub trait PipelineStep {
    /// Transform the image. Stages work on their own copy of the input; the
    /// pipeline persists the result afterwards.
    fn process(&self, image: &DynamicImage, context: &PipelineContext)
        -> Result<DynamicImage, PipelineError>;

    /// Human-readable name for this step (used in verbose output).
    fn name(&self) -> &str;

    /// Artifact suffix for this step's persisted output.
    fn suffix(&self) -> &str;

    /// Check preconditions before the run starts. Runs for every step before
    /// anything is persisted, so a bad calibration aborts with zero
    /// artifacts on disk.
    fn validate(&self) -> Result<(), PipelineError> {
        Ok(())
    }
}

/// The linear readout pipeline.
///
/// Stages run strictly in order, each consuming the previous stage's output.
/// Every intermediate image is persisted to its stage path; the final glyph
/// mask is then handed to OCR by path.
pub struct Pipeline {
    steps: Vec<Box<dyn PipelineStep>>,
    context: PipelineContext,
    scale_divisor: f64,
    model_dir: Option<PathBuf>,
}

impl Pipeline {
    /// Build the standard five-stage pipeline from a configuration.
    pub fn from_config(config: &PipelineConfig) -> Self {
        let steps: Vec<Box<dyn PipelineStep>> = vec![
            Box::new(PerspectiveStep::new(config.quad)),
            Box::new(ThresholdStep {
                threshold: config.threshold,
            }),
            Box::new(FloodCleanStep {
                border: config.border,
                fill: config.border_value,
            }),
            Box::new(ReconstructStep),
        ];
        Self {
            steps,
            context: PipelineContext {
                artifact_dir: config.artifact_dir.clone(),
                prefix: config.prefix.clone(),
                debug: config.debug,
                verbose: config.verbose,
            },
            scale_divisor: config.scale_divisor,
            model_dir: config.model_dir.clone(),
        }
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    /// Run the image stages only, returning the path of the persisted glyph
    /// mask. Useful when the OCR models are not available.
    pub fn process_image(&self, input: &DynamicImage) -> Result<PathBuf, PipelineError> {
        if input.width() == 0 || input.height() == 0 {
            return Err(PipelineError::EmptyInput);
        }
        for step in &self.steps {
            step.validate()?;
        }

        if let Err(e) = std::fs::create_dir_all(&self.context.artifact_dir) {
            eprintln!(
                "warning: could not create artifact directory {}: {}",
                self.context.artifact_dir.display(),
                e
            );
        }

        let run_stamp = self.context.run_stamp();
        self.persist(input, &run_stamp, SUFFIX_INPUT);

        let mut image = input.clone();
        let mut mask_path = self.context.stage_path(&run_stamp, SUFFIX_INPUT);
        for step in &self.steps {
            if self.context.verbose {
                println!("Running step: {}", step.name());
            }
            image = step.process(&image, &self.context)?;
            mask_path = self.persist(&image, &run_stamp, step.suffix());
        }

        Ok(mask_path)
    }

    /// Run the full pipeline: image stages, then OCR on the persisted mask.
    pub fn run(&self, input: &DynamicImage) -> Result<Reading, PipelineError> {
        let mask_path = self.process_image(input)?;
        stages::ocr::extract_value(
            &mask_path,
            self.model_dir.as_deref(),
            self.scale_divisor,
            &self.context,
        )
    }

    /// Persist a stage result. Artifact writes are a diagnostic side effect:
    /// a failure is reported but never aborts the run.
    fn persist(&self, image: &DynamicImage, run_stamp: &str, suffix: &str) -> PathBuf {
        let path = self.context.stage_path(run_stamp, suffix);
        match image.save(&path) {
            Ok(()) => {
                if self.context.reports_artifacts() {
                    println!("  saved {}", path.display());
                }
            }
            Err(e) => {
                eprintln!("warning: failed to write artifact {}: {}", path.display(), e);
            }
        }
        path
    }
}
