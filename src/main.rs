use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use textorient::config::{DetectorConfig, PreprocessOptions, SearchOptions};

#[derive(Parser, Debug)]
#[command(name = "textorient")]
#[command(about = "Automatic text-orientation detection for OCR pipelines")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect the rotation that best aligns the image's text
    Detect {
        /// Image to analyze
        image: PathBuf,

        /// Recognition language (tessdata identifier, e.g. "eng", "deu")
        #[arg(long, env = "TEXTORIENT_LANGUAGE", default_value = "eng")]
        language: String,

        /// Path to tessdata directory (downloaded to the cache dir if unset)
        #[arg(long, env = "TESSDATA_PREFIX")]
        tessdata_path: Option<String>,

        /// Directory for rotated-candidate artifacts (system temp dir if unset)
        #[arg(long)]
        work_dir: Option<PathBuf>,

        /// Clean up the capture (resize, grayscale, threshold) before detection
        #[arg(long)]
        preprocess: bool,

        /// Resize factor used by --preprocess
        #[arg(long, default_value = "2.0")]
        resize_factor: f32,

        /// Binary threshold (0.0-1.0) used by --preprocess
        #[arg(long, default_value = "0.5")]
        threshold: f32,

        /// Cardinal-stage score at which the tilt stages are skipped
        #[arg(long, default_value = "2.5")]
        early_exit_threshold: f32,

        /// Minimum tilt-vs-cardinal separation (degrees) before fine refinement
        #[arg(long, default_value = "20")]
        drift_threshold: f32,

        /// Half-width (degrees) of the fine-search window
        #[arg(long, default_value = "10")]
        fine_half_width: u32,

        /// Round the final angle to the nearest multiple of this many degrees
        #[arg(long)]
        stabilize: Option<u32>,

        /// Emit the full detection report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rotate an image by a fixed angle and repair the exposed background
    Rotate {
        /// Image to rotate
        image: PathBuf,

        /// Rotation in degrees (clockwise; negative values allowed)
        #[arg(long, allow_hyphen_values = true)]
        angle: f32,

        /// Directory for the rotated artifact (system temp dir if unset)
        #[arg(long)]
        work_dir: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match args.command {
        Command::Detect {
            image,
            language,
            tessdata_path,
            work_dir,
            preprocess,
            resize_factor,
            threshold,
            early_exit_threshold,
            drift_threshold,
            fine_half_width,
            stabilize,
            json,
        } => {
            let image = if preprocess {
                textorient::preprocess::preprocess_file(
                    &image,
                    &PreprocessOptions {
                        resize_factor,
                        threshold,
                    },
                )
                .context("preprocessing failed")?
            } else {
                image
            };

            let config = DetectorConfig {
                search: SearchOptions {
                    early_exit_threshold,
                    drift_threshold,
                    fine_half_width,
                    stabilize_step: stabilize,
                },
                work_dir,
            };

            let report = run_detection(&image, &language, tessdata_path, config)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.angle);
            }
        }

        Command::Rotate {
            image,
            angle,
            work_dir,
        } => {
            let work_dir = work_dir.unwrap_or_else(std::env::temp_dir);
            let path = textorient::rotate_image(&image, angle, &work_dir)
                .context("rotation failed")?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

#[cfg(feature = "engine-tesseract")]
fn run_detection(
    image: &std::path::Path,
    language: &str,
    tessdata_path: Option<String>,
    config: DetectorConfig,
) -> anyhow::Result<textorient::DetectionReport> {
    let recognizer = textorient::TesseractRecognizer::new(language, tessdata_path)
        .context("engine initialization failed")?;
    let detector = textorient::OrientationDetector::new(recognizer, config);
    detector.detect_report(image).context("detection failed")
}

#[cfg(not(feature = "engine-tesseract"))]
fn run_detection(
    _image: &std::path::Path,
    _language: &str,
    _tessdata_path: Option<String>,
    _config: DetectorConfig,
) -> anyhow::Result<textorient::DetectionReport> {
    anyhow::bail!("No recognition engine available. Build with --features engine-tesseract")
}
