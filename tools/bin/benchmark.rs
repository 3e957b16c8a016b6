//! Benchmark of the parallel contour pipeline across worker counts
//!
//! Renders a synthetic gradient for each worker count and reports wall time per run and
//! speedup over a single worker. Outputs are compared against the single-worker result, so a
//! partitioning bug shows up as a mismatch instead of a fast time.

use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;
use contour_scale::plan::{RescalePolicy, Size};
use marching_contours::{Bitmap, ContourTileSet, ParallelPipeline, Pixel, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "benchmark")]
#[command(about = "Time the contour pipeline for 1, 2, 4 and 8 workers")]
struct Args {
    /// Image width
    #[arg(long, default_value_t = 2048)]
    width: u32,

    /// Image height
    #[arg(long, default_value_t = 2048)]
    height: u32,

    /// Grid step
    #[arg(long, default_value_t = 8)]
    step: u32,

    /// Runs per worker count
    #[arg(long, default_value_t = 5)]
    runs: u32,

    /// Force a rescale to this square size
    #[arg(long)]
    rescale_to: Option<u32>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let image = gradient(args.width, args.height)?;
    let tiles = ContourTileSet::builtin(args.step)?;
    let policy = match args.rescale_to {
        Some(side) => RescalePolicy::new(Size::new(0, 0), Size::square(side)),
        None => RescalePolicy::new(image.size(), image.size()),
    };

    println!("Contour Pipeline Benchmark");
    println!("═══════════════════════════════════");
    println!(
        "Image: {}, step {}, {} runs per worker count{}",
        image.size(),
        args.step,
        args.runs,
        match args.rescale_to {
            Some(side) => format!(", rescaled to {}x{}", side, side),
            None => String::new(),
        }
    );
    println!();
    println!("{:>8} {:>12} {:>12} {:>9}", "workers", "best (ms)", "mean (ms)", "speedup");
    println!("──────────────────────────────────────────");

    let mut baseline: Option<(Duration, Bitmap)> = None;
    for workers in [1, 2, 4, 8] {
        let config = PipelineConfig {
            step: args.step,
            policy,
            workers,
            ..PipelineConfig::default()
        };
        let pipeline = ParallelPipeline::new(config, &tiles)?;

        let mut times = Vec::with_capacity(args.runs as usize);
        let mut output = Bitmap::default();
        for _ in 0..args.runs.max(1) {
            let (rendered, report) = pipeline.run(image.clone())?;
            times.push(report.elapsed);
            output = rendered;
        }
        let best = times.iter().copied().min().unwrap_or_default();
        let mean = times.iter().sum::<Duration>() / times.len() as u32;

        let speedup = match baseline.as_ref() {
            Some((single, expected)) => {
                if *expected != output {
                    bail!("output with {} workers differs from the single-worker run", workers);
                }
                single.as_secs_f64() / best.as_secs_f64()
            }
            None => 1.0,
        };
        if baseline.is_none() {
            baseline = Some((best, output));
        }
        println!(
            "{:>8} {:>12.2} {:>12.2} {:>8.2}x",
            workers,
            best.as_secs_f64() * 1000.0,
            mean.as_secs_f64() * 1000.0,
            speedup
        );
    }

    println!();
    println!("All worker counts produced identical output.");
    Ok(())
}

/// Diagonal luminance ramp with a few rings, so every configuration appears.
fn gradient(width: u32, height: u32) -> Result<Bitmap> {
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let bitmap = Bitmap::from_fn(width, height, |row, col| {
        let ramp = (row + col) as f32 / (width + height) as f32;
        let ring = (((col as f32 - cx).hypot(row as f32 - cy) / 24.0).sin() + 1.0) * 0.5;
        Pixel::gray((255.0 * (0.5 * ramp + 0.5 * ring)) as u8)
    })?;
    Ok(bitmap)
}
