//! Batch threshold-sweep driver for the puncta detection pipeline.
//!
//! Walks every subdirectory of a root folder, runs the detection pipeline on
//! each image it finds for a range of minimum-component-area thresholds, and
//! records one CSV row per (image, threshold) pair. The stacked composite for
//! every run is written into a `results/` directory next to the source image.
//!
//! ```bash
//! cargo run --release --bin sweep -- <folder> <output_csv>
//! cargo run --release --bin sweep -- <folder> <output_csv> --area-min 5 --area-max 10
//! ```
//!
//! Images are decoded once and the cached raster is reused across the whole
//! threshold sweep. A failing image is logged and skipped; the sweep
//! continues with the next one.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use puncta::image_proc::raster_to_rgb_image;
use puncta::{DetectionConfig, Pipeline};
use serde::Serialize;

/// File extensions treated as images.
const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "tif", "tiff", "bmp"];

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Root folder; every subdirectory is scanned for images
    folder: PathBuf,

    /// Output CSV file for the sweep log
    output_csv: PathBuf,

    /// Smallest minimum-component-area threshold of the sweep
    #[arg(long, default_value_t = 5)]
    area_min: usize,

    /// Largest minimum-component-area threshold of the sweep (inclusive)
    #[arg(long, default_value_t = 10)]
    area_max: usize,
}

/// One CSV row of the sweep log.
#[derive(Debug, Serialize)]
struct SweepRecord {
    /// Directory containing the image
    image_name: String,
    /// Image file basename
    region_name: String,
    /// Minimum-component-area threshold of this run
    threshold: usize,
    /// Component count returned by the pipeline
    connected_components: usize,
    /// Non-zero pixels of the grayscale decode of the source
    non_zero_pixels: u64,
}

/// Count non-zero pixels in the grayscale decode of an image file.
fn grayscale_non_zero_pixels(path: &Path) -> Result<u64, puncta::DetectError> {
    let gray = image::open(path)
        .map_err(|source| puncta::DetectError::Load {
            path: path.to_path_buf(),
            source,
        })?
        .to_luma8();
    Ok(gray.pixels().filter(|pixel| pixel.0[0] > 0).count() as u64)
}

fn is_image_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'));
    if hidden {
        return false;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Sweep one image across the threshold range, writing composites and rows.
fn sweep_image(
    pipeline: &Pipeline,
    path: &Path,
    area_range: std::ops::RangeInclusive<usize>,
    writer: &mut csv::Writer<fs::File>,
) -> Result<(), Box<dyn std::error::Error>> {
    let non_zero_pixels = grayscale_non_zero_pixels(path)?;
    log::info!("processing {:?} ({} non-zero pixels)", path, non_zero_pixels);

    let dirname = path.parent().unwrap_or_else(|| Path::new(""));
    let basename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();

    let results_dir = dirname.join("results");
    fs::create_dir_all(&results_dir)?;

    // Decode once, reuse the raster for every threshold.
    let raster = pipeline.load(path)?;

    for threshold in area_range {
        let result = pipeline.process_raster(&raster, threshold)?;
        let composite = result.composite()?;

        let output_path = results_dir.join(format!("{basename}_threshold_{threshold}.png"));
        raster_to_rgb_image(&composite).save(&output_path)?;
        log::info!("saved composite to {:?}", output_path);

        writer.serialize(SweepRecord {
            image_name: dirname.to_string_lossy().into_owned(),
            region_name: basename.clone(),
            threshold,
            connected_components: result.count,
            non_zero_pixels,
        })?;
    }

    Ok(())
}

/// Process every image directly inside one folder.
fn sweep_folder(
    pipeline: &Pipeline,
    folder: &Path,
    area_range: &std::ops::RangeInclusive<usize>,
    writer: &mut csv::Writer<fs::File>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(folder)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_image_file(path))
        .collect();
    entries.sort();

    for path in entries {
        if let Err(err) = sweep_image(pipeline, &path, area_range.clone(), writer) {
            log::warn!("skipping {:?}: {}", path, err);
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    if !cli.folder.is_dir() {
        return Err(format!("folder {:?} does not exist", cli.folder).into());
    }
    if cli.area_min < 1 || cli.area_min > cli.area_max {
        return Err(format!(
            "invalid area range {}..={} (need 1 <= min <= max)",
            cli.area_min, cli.area_max
        )
        .into());
    }

    let pipeline = Pipeline::new(DetectionConfig::default())?;
    let area_range = cli.area_min..=cli.area_max;

    let mut writer = csv::Writer::from_path(&cli.output_csv)?;

    let mut subfolders: Vec<PathBuf> = fs::read_dir(&cli.folder)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    subfolders.sort();

    let progress = ProgressBar::new(subfolders.len() as u64);
    progress.set_style(ProgressStyle::with_template(
        "{bar:40.cyan/blue} {pos}/{len} {msg}",
    )?);

    for subfolder in &subfolders {
        progress.set_message(subfolder.to_string_lossy().into_owned());
        sweep_folder(&pipeline, subfolder, &area_range, &mut writer)?;
        progress.inc(1);
    }
    progress.finish();

    writer.flush()?;
    Ok(())
}
