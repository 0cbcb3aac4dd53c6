use clap::Parser;
use image::ImageReader;
use std::path::PathBuf;

use segmeter::{Pipeline, PipelineConfig, RangeStatus, Reading, ReadingRange};

#[derive(Parser)]
#[command(name = "segmeter")]
#[command(about = "Read a 7-segment instrument display from a camera image")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Keep a timestamped copy of every stage artifact instead of
    /// overwriting the fixed paths
    #[arg(long)]
    debug: bool,

    /// Directory for stage artifacts
    #[arg(long, value_name = "DIR", default_value = "assets")]
    out_dir: PathBuf,

    /// Stop after writing the glyph mask (no OCR models required)
    #[arg(long)]
    skip_ocr: bool,

    /// Directory holding the ocrs model files (defaults to ~/.cache/ocrs)
    #[arg(long, value_name = "DIR")]
    model_dir: Option<PathBuf>,

    /// Lower bound of the acceptable range, in volts
    #[arg(long, default_value_t = 3.0)]
    range_min: f64,

    /// Upper bound of the acceptable range, in volts
    #[arg(long, default_value_t = 5.0)]
    range_max: f64,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    if args.verbose {
        println!("Loading image: {:?}", args.image_path);
    }

    // Acquiring and decoding the frame is the caller's job; the pipeline only
    // ever sees a successfully decoded raster.
    let img = ImageReader::open(&args.image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;

    if args.verbose {
        println!("Image loaded: {}x{}\n", img.width(), img.height());
    }

    let config = PipelineConfig {
        artifact_dir: args.out_dir,
        debug: args.debug,
        verbose: args.verbose,
        model_dir: args.model_dir,
        ..PipelineConfig::default()
    };
    let pipeline = Pipeline::from_config(&config);

    if args.skip_ocr {
        let mask_path = pipeline.process_image(&img)?;
        println!("Glyph mask written to {}", mask_path.display());
        return Ok(());
    }

    let reading = pipeline.run(&img)?;
    let value = reading.calibrated();
    match reading {
        Reading::Value(_) => println!("Multimeter value: {} V", value),
        Reading::NoReading => println!("Instrument unreadable this cycle; reporting {} V", value),
    }

    let range = ReadingRange::new(args.range_min, args.range_max);
    match range.check(value) {
        RangeStatus::Within => println!("Value is within the acceptable range."),
        RangeStatus::Outside => println!("{}", range.alert_message(value)),
    }

    Ok(())
}
