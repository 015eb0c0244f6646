//
// pixels.rs
// dicom-suite
//
// Pixel-level commands: rescaled statistics, intensity histograms, and PNG previews.
//
// Thales Matheus Mendonça Santos - March 2026

use std::fmt::Write as _;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::{bail, Context, Result};
use dicom::object::open_file;
use dicom::pixeldata::PixelDecoder;
use dicom_pixeldata::{ConvertOptions, VoiLutOption};
use image::{DynamicImage, ImageFormat};
use ndarray::ArrayD;

use crate::models::{PixelHistogram, PixelStatistics};
use crate::registry::CommandContext;

/// Decode the pixel data with the modality LUT applied but no VOI windowing,
/// yielding rescaled values (e.g. Hounsfield units for CT).
fn rescaled_values(path: &Path) -> Result<ArrayD<f32>> {
    let obj = open_file(path).context("Falha ao abrir arquivo DICOM")?;
    let decoded = obj
        .decode_pixel_data()
        .context("Failed to decode pixel data")?;

    let options = ConvertOptions::new().with_voi_lut(VoiLutOption::Identity);
    decoded
        .to_ndarray_with_options::<f32>(&options)
        .map(|a| a.into_dyn())
        .context("Failed to convert pixel data to ndarray")
}

pub fn pixel_statistics_for_file(path: &Path) -> Result<PixelStatistics> {
    let array = rescaled_values(path)?;
    if array.is_empty() {
        bail!("Pixel data is empty");
    }

    let min = array.iter().fold(f32::INFINITY, |a, &b| a.min(b));
    let max = array.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let count = array.len() as f32;
    let mean = array.iter().sum::<f32>() / count;

    let variance = array
        .iter()
        .map(|x| {
            let diff = mean - x;
            diff * diff
        })
        .sum::<f32>()
        / count;

    let mut sorted: Vec<f32> = array.iter().copied().collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    Ok(PixelStatistics {
        min,
        max,
        mean,
        median,
        std_dev: variance.sqrt(),
        total_pixels: array.len(),
        shape: array.shape().to_vec(),
    })
}

pub fn histogram_for_file(path: &Path, bins: usize) -> Result<PixelHistogram> {
    if bins == 0 {
        bail!("Number of bins must be greater than zero");
    }
    let array = rescaled_values(path)?;
    if array.is_empty() {
        bail!("Pixel data is empty");
    }

    let min = array.iter().fold(f32::INFINITY, |a, &b| a.min(b));
    let max = array.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let range = max - min;

    let mut counts = vec![0u64; bins];
    for &value in array.iter() {
        // A flat image collapses into the first bin.
        let idx = if range > 0.0 {
            (((value - min) / range) * bins as f32) as usize
        } else {
            0
        };
        counts[idx.min(bins - 1)] += 1;
    }

    Ok(PixelHistogram {
        bins: counts,
        min,
        max,
    })
}

pub fn first_frame_png_bytes(input: &Path) -> Result<Vec<u8>> {
    let obj = open_file(input).context("Falha ao abrir arquivo DICOM")?;
    let decoded = obj
        .decode_pixel_data()
        .context("Failed to decode pixel data")?;
    let dynamic_image = decoded
        .to_dynamic_image(0)
        .context("Failed to render first frame")?;
    encode_image(&dynamic_image, ImageFormat::Png)
}

fn encode_image(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    image.write_to(&mut Cursor::new(&mut buffer), format)?;
    Ok(buffer)
}

/// Compute min/max/mean/median/std-dev and write `stats.txt`.
pub fn stats_report(ctx: &CommandContext) -> Result<()> {
    println!("--- [Pixels] Statistics ---");
    let stats = pixel_statistics_for_file(&ctx.input_path)?;

    let mut report = String::new();
    let _ = writeln!(report, "Statistics for {:?}", ctx.input_path.file_name());
    let _ = writeln!(report, "  Shape: {:?}", stats.shape);
    let _ = writeln!(report, "  Min:    {:.2}", stats.min);
    let _ = writeln!(report, "  Max:    {:.2}", stats.max);
    let _ = writeln!(report, "  Mean:   {:.2}", stats.mean);
    let _ = writeln!(report, "  Median: {:.2}", stats.median);
    let _ = writeln!(report, "  StdDv:  {:.2}", stats.std_dev);
    print!("{report}");

    let output = ctx.output_dir.join("stats.txt");
    fs::write(&output, report).context("Failed to write statistics report")?;
    println!("  Report written to {:?}", output);
    Ok(())
}

const HISTOGRAM_BINS: usize = 256;

/// Bucket the rescaled intensities and write `histogram.txt`.
pub fn histogram_report(ctx: &CommandContext) -> Result<()> {
    println!("--- [Pixels] Histogram ---");
    let histogram = histogram_for_file(&ctx.input_path, HISTOGRAM_BINS)?;
    let total: u64 = histogram.bins.iter().sum();

    let mut report = String::new();
    let _ = writeln!(
        report,
        "Histogram: {} bins over [{:.2}, {:.2}], {} pixels",
        histogram.bins.len(),
        histogram.min,
        histogram.max,
        total
    );
    for (idx, count) in histogram.bins.iter().enumerate() {
        if *count > 0 || ctx.verbose {
            let _ = writeln!(report, "  Bin {idx:03}: {count}");
        }
    }

    let output = ctx.output_dir.join("histogram.txt");
    fs::write(&output, report).context("Failed to write histogram report")?;
    println!("  {total} pixel(s) bucketed, written to {:?}", output);
    Ok(())
}

/// Export an 8-bit PNG preview of the first frame.
pub fn preview(ctx: &CommandContext) -> Result<()> {
    println!("--- [Pixels] Preview Export ---");
    let png = first_frame_png_bytes(&ctx.input_path)?;

    let stem = ctx
        .input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dicom");
    let output = ctx.output_dir.join(format!("{stem}_preview.png"));
    fs::write(&output, png).context("Failed to write preview image")?;
    println!("  Preview saved to {:?}", output);
    Ok(())
}
