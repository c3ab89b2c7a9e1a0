use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use segmask::{
    backend::{create_device, get_backend_name, SelectedBackend},
    metric::{evaluate, evaluate_library_with, LibraryEvaluationConfig},
    util::{
        bounding_circle, circular_mask, coincidence_ratio, fill_holes, largest_component,
        prune_by_region_with, Circle, ImageUtils, Mask, OntoConfig, PruneConfig,
    },
};
use tracing::info;

#[derive(Parser)]
#[command(name = "segmask")]
#[command(about = "Scoring and geometric refinement of binary segmentation masks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a candidate mask against a reference mask
    Evaluate {
        /// Candidate mask image (black pixels are selected)
        candidate: PathBuf,

        /// Reference mask image (black pixels are selected)
        reference: PathBuf,

        /// Use the strict tensor scorer instead of the manual one
        #[arg(long)]
        library: bool,

        /// Recall weight of the F-beta score (tensor scorer only)
        #[arg(long, default_value_t = 1.0)]
        beta: f64,
    },

    /// Fill enclosed holes of a mask
    FillHoles {
        input: PathBuf,
        output: PathBuf,
    },

    /// Keep only the largest connected region of a mask
    Largest {
        input: PathBuf,
        output: PathBuf,
    },

    /// Erase sizeable regions whose centroid lies above a row
    Prune {
        input: PathBuf,
        output: PathBuf,

        /// Regions centred strictly above this row are erased
        #[arg(long, allow_negative_numbers = true)]
        boundary_y: i32,

        /// Regions with at most this polygon area are always kept
        #[arg(long, default_value_t = 100.0)]
        min_area: f64,
    },

    /// Print the minimum enclosing circle of the dark region of an image
    Circle {
        input: PathBuf,
    },

    /// Black out every pixel of an image outside a circle
    ApplyCircle {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, allow_negative_numbers = true)]
        x: i32,
        #[arg(long, allow_negative_numbers = true)]
        y: i32,
        #[arg(long, allow_negative_numbers = true)]
        radius: i32,
    },

    /// Overlap ratio and containment test between two masks
    Coincidence {
        left: PathBuf,
        right: PathBuf,

        /// Containment threshold in [0, 1]
        #[arg(long, default_value_t = 0.9)]
        threshold: f64,
    },

    /// Show backend information
    Info,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            candidate,
            reference,
            library,
            beta,
        } => {
            let candidate = load(&candidate)?;
            let reference = load(&reference)?;
            let report = if library {
                let device = create_device();
                info!(backend = get_backend_name(), "scoring with tensor backend");
                let config = LibraryEvaluationConfig::new().with_beta(beta);
                let stats = evaluate_library_with::<SelectedBackend>(
                    &candidate, &reference, &config, &device,
                )?;
                serde_json::to_string_pretty(&stats)?
            } else {
                serde_json::to_string_pretty(&evaluate(&candidate, &reference)?)?
            };
            println!("{report}");
            Ok(())
        }

        Commands::FillHoles { input, output } => {
            let mask = load(&input)?;
            store(&fill_holes(&mask), &output)
        }

        Commands::Largest { input, output } => {
            let mask = load(&input)?;
            store(&largest_component(&mask), &output)
        }

        Commands::Prune {
            input,
            output,
            boundary_y,
            min_area,
        } => {
            let mask = load(&input)?;
            let config = PruneConfig::new().with_min_area(min_area);
            store(&prune_by_region_with(&mask, boundary_y, &config), &output)
        }

        Commands::Circle { input } => {
            let image = ImageUtils::load_gray(&input)?;
            let circle = bounding_circle(&image)
                .with_context(|| format!("no region found in {}", input.display()))?;
            println!("{}", serde_json::to_string_pretty(&circle)?);
            Ok(())
        }

        Commands::ApplyCircle {
            input,
            output,
            x,
            y,
            radius,
        } => {
            let image = image::open(&input)
                .with_context(|| format!("failed to open {}", input.display()))?
                .into_rgb8();
            let masked = circular_mask(&image, Circle::new(x, y, radius));
            masked
                .save(&output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            info!(output = %output.display(), "wrote circular crop");
            Ok(())
        }

        Commands::Coincidence {
            left,
            right,
            threshold,
        } => {
            let left = load(&left)?;
            let right = load(&right)?;
            let ratio = coincidence_ratio(&left, &right)?;
            let contained = OntoConfig::new()
                .with_threshold(threshold)
                .contains(&left, &right)?;
            let report = serde_json::json!({ "ratio": ratio, "contains": contained });
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }

        Commands::Info => {
            println!("segmask information:");
            println!("  Backend: {}", get_backend_name());
            println!("  Device: {:?}", create_device());
            Ok(())
        }
    }
}

fn load(path: &Path) -> Result<Mask> {
    ImageUtils::load_mask(path)?.with_context(|| format!("mask file {} not found", path.display()))
}

/// Masks are written black on white so they load back unchanged.
fn store(mask: &Mask, path: &Path) -> Result<()> {
    ImageUtils::mask_to_rgb(mask)
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(output = %path.display(), selected = mask.count(), "wrote mask");
    Ok(())
}
