use std::path::Path;

use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;

use crate::error::PipelineError;
use crate::models::Reading;
use crate::pipeline::PipelineContext;

/// Initialize an OCR engine with models from the given directory, falling
/// back to the standard ocrs cache location.
///
/// Initialization failure is fatal to the OCR stage and distinct from a
/// "no reading" result: callers must be able to tell "engine unavailable"
/// apart from "reading is zero".
pub fn init_ocr_engine(model_dir: Option<&Path>) -> Result<OcrEngine, PipelineError> {
    let cache_dir = match model_dir {
        Some(dir) => dir.to_path_buf(),
        None => {
            let home_dir = std::env::var("HOME")
                .or_else(|_| std::env::var("USERPROFILE"))
                .map_err(|_| {
                    PipelineError::EngineInit("no home directory to locate models".to_string())
                })?;
            Path::new(&home_dir).join(".cache/ocrs")
        }
    };

    let detection_model_path = cache_dir.join("text-detection.rten");
    let recognition_model_path = cache_dir.join("text-recognition.rten");

    if !detection_model_path.exists() || !recognition_model_path.exists() {
        return Err(PipelineError::EngineInit(format!(
            "OCR models not found; expected {} and {}",
            detection_model_path.display(),
            recognition_model_path.display()
        )));
    }

    let detection_model = Model::load_file(&detection_model_path)
        .map_err(|e| PipelineError::EngineInit(format!("detection model: {}", e)))?;
    let recognition_model = Model::load_file(&recognition_model_path)
        .map_err(|e| PipelineError::EngineInit(format!("recognition model: {}", e)))?;

    OcrEngine::new(OcrEngineParams {
        detection_model: Some(detection_model),
        recognition_model: Some(recognition_model),
        ..Default::default()
    })
    .map_err(|e| PipelineError::EngineInit(e.to_string()))
}

/// Parse the leading numeric content of OCR text into a reading, rescaled by
/// the divisor. Empty or unparsable text is the defined "no reading"
/// fallback, not an error.
pub fn parse_reading(text: &str, scale_divisor: f64) -> Reading {
    match parse_leading_number(text) {
        Some(raw) => Reading::Value(raw / scale_divisor),
        None => Reading::NoReading,
    }
}

/// C `atof`-style parse: skip leading whitespace, then read as many
/// characters as still form a valid decimal number.
fn parse_leading_number(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let mut end = 0;
    for (i, c) in trimmed.char_indices() {
        let is_numeric = c.is_ascii_digit() || c == '.' || (i == 0 && (c == '+' || c == '-'));
        if !is_numeric {
            break;
        }
        end = i + c.len_utf8();
    }
    while end > 0 && trimmed[..end].parse::<f64>().is_err() {
        end -= 1;
    }
    if end == 0 {
        return None;
    }
    trimmed[..end].parse().ok()
}

/// Run OCR against the persisted glyph mask and post-process the text into a
/// calibrated reading.
///
/// The mask is reloaded from disk as a 3-channel image — the engine expects
/// multi-channel input even for binary content. A fresh engine is built per
/// invocation and dropped on every exit path.
pub fn extract_value(
    mask_path: &Path,
    model_dir: Option<&Path>,
    scale_divisor: f64,
    context: &PipelineContext,
) -> Result<Reading, PipelineError> {
    let mask = image::open(mask_path)
        .map_err(|e| PipelineError::MaskLoad(format!("{}: {}", mask_path.display(), e)))?
        .to_rgb8();

    if context.verbose {
        println!("Performing OCR on {}...", mask_path.display());
    }
    let engine = init_ocr_engine(model_dir)?;

    // Recognition failures are treated like empty output: the instrument was
    // unreadable this cycle.
    let mut text = String::new();
    if let Ok(source) = ImageSource::from_bytes(mask.as_raw(), mask.dimensions()) {
        if let Ok(input) = engine.prepare_input(source) {
            if let Ok(recognized) = engine.get_text(&input) {
                text = recognized;
            }
        }
    }

    let reading = parse_reading(text.trim(), scale_divisor);
    if context.verbose {
        match reading {
            Reading::Value(v) => println!("OCR output: {:?} -> {} V", text.trim(), v),
            Reading::NoReading => println!("OCR output is empty."),
        }
    }
    Ok(reading)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_digits_are_rescaled() {
        assert_eq!(parse_reading("4123", 1000.0), Reading::Value(4.123));
        assert_eq!(parse_reading("045", 1000.0), Reading::Value(0.045));
    }

    fn assert_value_near(reading: Reading, expected: f64) {
        match reading {
            Reading::Value(v) => assert!((v - expected).abs() < 1e-12, "got {}", v),
            Reading::NoReading => panic!("expected a value near {}", expected),
        }
    }

    #[test]
    fn leading_number_with_trailing_text_parses() {
        assert_value_near(parse_reading("45.3V", 1000.0), 0.0453);
        assert_eq!(parse_reading("  12 34", 1000.0), Reading::Value(0.012));
    }

    #[test]
    fn empty_and_garbage_are_no_reading() {
        assert_eq!(parse_reading("", 1000.0), Reading::NoReading);
        assert_eq!(parse_reading("   ", 1000.0), Reading::NoReading);
        assert_eq!(parse_reading("volts", 1000.0), Reading::NoReading);
        assert_eq!(parse_reading(".", 1000.0), Reading::NoReading);
        assert_eq!(parse_reading("-", 1000.0), Reading::NoReading);
    }

    #[test]
    fn zero_text_is_a_reading_not_a_fallback() {
        assert_eq!(parse_reading("0", 1000.0), Reading::Value(0.0));
        assert!(parse_reading("0", 1000.0).is_reading());
    }

    #[test]
    fn signs_and_decimals_parse_like_atof() {
        assert_eq!(parse_reading("-500", 1000.0), Reading::Value(-0.5));
        assert_value_near(parse_reading("+2500.5", 1000.0), 2.5005);
        // A second decimal point ends the number.
        assert_value_near(parse_reading("1.2.3", 1000.0), 0.0012);
    }

    #[test]
    fn missing_models_surface_as_engine_init_error() {
        let dir = tempfile::tempdir().unwrap();
        // OcrEngine is not Debug, so unwrap_err() can't be used here.
        let Err(err) = init_ocr_engine(Some(dir.path())) else {
            panic!("expected an error");
        };
        assert!(matches!(err, PipelineError::EngineInit(_)));
    }
}
