//! # Parallel Contour Pipeline
//!
//! Renders marching-squares contours over an image with a fixed pool of worker threads.
//!
//! ## Phases
//!
//! Every worker runs the same routine over its own share of each phase, and all workers meet
//! at a rendezvous between phases:
//!
//! ```text
//!   rescale    fill own rows of the target image (skipped unless oversized)
//!   ── rendezvous ──
//!   swap       worker 0 replaces the active image with the target
//!   ── rendezvous ──
//!   allocate   own rows of the grid, partitioned over [0, P]
//!   ── rendezvous ──
//!   sample     own grid rows [0, P) with their last-column cell,
//!              then own cells of the last row, partitioned over [0, Q]
//!   ── rendezvous ──
//!   march      stamp tiles for own grid rows [0, P)
//! ```
//!
//! The rescale and swap rendezvous are kept even when nothing is rescaled, so every run goes
//! through the same four meeting points.
//!
//! ## Work Ownership
//!
//! Shares come from [`partition`], applied to each phase's own index space. The marching pass
//! of worker `k` writes image rows `start_k * step .. end_k * step` only; those bands are
//! disjoint, so no pixel is written twice. Rows past `P * step` and columns past `Q * step`
//! keep their source pixels.
//!
//! ## Failure
//!
//! A worker that fails or panics aborts the rendezvous. Everyone still waiting wakes up with
//! [`ContourError::Aborted`] and exits, and [`ParallelPipeline::run`] reports the first error
//! that was not an abort.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use contour_scale::plan::{RescalePlan, RescalePolicy, Size, build_plan};

use crate::contour::march::march_band;
use crate::contour::rescale::rescale_band;
use crate::contour::sample::{sample_last_row, sample_rows};
use crate::contour::tiles::ContourTileSet;
use crate::core::canvas::SharedCanvas;
use crate::core::rendezvous::AbortOnUnwind;
use crate::core::{BinaryGrid, Bitmap, Rendezvous, partition};
use crate::error::{ContourError, ContourResult};

/// Default grid step in pixels.
pub const DEFAULT_STEP: u32 = 8;
/// Default luminance threshold.
pub const DEFAULT_SIGMA: u8 = 200;

/// Settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Grid step in pixels, both axes. Tiles must be `step x step`.
    pub step: u32,
    /// Pixels with luminance `<= sigma` are inside the contour.
    pub sigma: u8,
    /// When and how the input is resampled before sampling.
    pub policy: RescalePolicy,
    /// Number of worker threads.
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            sigma: DEFAULT_SIGMA,
            policy: RescalePolicy::default(),
            workers: thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> ContourResult<()> {
        if self.workers == 0 {
            return Err(ContourError::config(
                "workers",
                "0",
                "at least one worker is required",
            ));
        }
        if self.step == 0 {
            return Err(ContourError::config("step", "0", "grid step must be at least 1"));
        }
        if self.policy.target.is_empty() {
            return Err(ContourError::config(
                "target_size",
                self.policy.target.to_string(),
                "rescale target must be non-empty",
            ));
        }
        Ok(())
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub input: Size,
    pub output: Size,
    pub rescaled: bool,
    /// Grid rows, `P + 1`.
    pub grid_rows: usize,
    /// Grid columns, `Q + 1`.
    pub grid_cols: usize,
    pub workers: usize,
    pub elapsed: Duration,
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}{}, grid {}x{}, {} workers, {:.2} ms",
            self.input,
            self.output,
            if self.rescaled { " (rescaled)" } else { "" },
            self.grid_rows,
            self.grid_cols,
            self.workers,
            self.elapsed.as_secs_f64() * 1000.0
        )
    }
}

/// State shared by all workers of one run.
struct Shared<'a> {
    config: &'a PipelineConfig,
    tiles: &'a ContourTileSet,
    plan: RescalePlan,
    active: SharedCanvas,
    target: Option<SharedCanvas>,
    grid: BinaryGrid,
    rendezvous: Rendezvous,
}

impl Shared<'_> {
    fn meet(&self, id: usize) -> ContourResult<()> {
        self.rendezvous
            .wait()
            .map(|_| ())
            .map_err(|_| ContourError::Aborted { worker: id })
    }

    /// Grid rows excluding the last, `P`.
    fn cell_rows(&self) -> usize {
        self.grid.rows() - 1
    }

    /// Grid columns excluding the last, `Q`.
    fn cell_cols(&self) -> usize {
        self.grid.cols() - 1
    }

    fn work(&self, id: usize) -> ContourResult<()> {
        let n = self.config.workers;
        let step = self.config.step;

        if let Some(target) = &self.target {
            let size = self.plan.out;
            let rows = partition(id, n, size.h as usize);
            let rows = rows.start as u32..rows.end as u32;
            // SAFETY: the source is only read and target bands are disjoint until the
            // next rendezvous
            let (source, band) = unsafe { (self.active.get(), target.rows_mut(rows.clone())) };
            log::trace!("worker {} rescaling rows {:?}", id, rows);
            rescale_band(source, band, size, rows);
        }
        self.meet(id)?;

        if let (0, Some(target)) = (id, &self.target) {
            // SAFETY: every other worker is parked at the next rendezvous holding nothing
            unsafe { drop(self.active.replace(target.take())) };
            log::debug!("active image replaced by {} rescale", self.plan.out);
        }
        self.meet(id)?;

        for i in partition(id, n, self.grid.rows()) {
            self.grid.allocate_row(i)?;
        }
        self.meet(id)?;

        {
            // SAFETY: nobody writes the active image until the next rendezvous
            let image = unsafe { self.active.get() };
            let sigma = self.config.sigma;
            let rows = partition(id, n, self.cell_rows());
            let cols = partition(id, n, self.cell_cols() + 1);
            log::trace!("worker {} sampling rows {:?}, last-row cells {:?}", id, rows, cols);
            sample_rows(&self.grid, image, step, sigma, rows)?;
            sample_last_row(&self.grid, image, step, sigma, cols)?;
        }
        self.meet(id)?;

        let rows = partition(id, n, self.cell_rows());
        let pixels = rows.start as u32 * step..rows.end as u32 * step;
        // SAFETY: marching bands are disjoint and no reader remains after the last rendezvous
        let (width, band) = unsafe { (self.active.width(), self.active.rows_mut(pixels)) };
        log::trace!("worker {} marching rows {:?}", id, rows);
        march_band(&self.grid, self.tiles, band, width, step, rows)
    }

    /// Worker entry point: any failure releases the others.
    fn run_worker(&self, id: usize) -> ContourResult<()> {
        let _guard = AbortOnUnwind(&self.rendezvous);
        let result = self.work(id);
        match &result {
            Err(e) if !e.is_secondary() => {
                log::debug!("worker {} failed: {}", id, e);
                self.rendezvous.abort();
            }
            _ => {}
        }
        result
    }
}

/// Barrier-synchronized marching-squares renderer.
pub struct ParallelPipeline<'a> {
    config: PipelineConfig,
    tiles: &'a ContourTileSet,
}

impl<'a> ParallelPipeline<'a> {
    /// Validate `config` against `tiles`. Nothing is spawned yet.
    pub fn new(config: PipelineConfig, tiles: &'a ContourTileSet) -> ContourResult<Self> {
        config.validate()?;
        if tiles.tile_size() != config.step {
            return Err(ContourError::config(
                "step",
                config.step.to_string(),
                format!(
                    "contour tiles are {}x{}, expected one tile per grid cell",
                    tiles.tile_size(),
                    tiles.tile_size()
                ),
            ));
        }
        Ok(Self { config, tiles })
    }

    /// Render contours over `image` and return the result.
    pub fn run(&self, image: Bitmap) -> ContourResult<(Bitmap, PipelineReport)> {
        let started = Instant::now();
        if image.is_empty() {
            return Err(ContourError::config(
                "image",
                image.size().to_string(),
                "input image is empty",
            ));
        }

        let plan = build_plan(image.size(), self.config.policy);
        let step = self.config.step;
        let p = (plan.out.h / step) as usize;
        let q = (plan.out.w / step) as usize;
        let workers = self.config.workers;
        log::debug!(
            "plan: {} -> {} (rescale: {}), grid {}x{}, {} workers",
            plan.input,
            plan.out,
            plan.rescale,
            p + 1,
            q + 1,
            workers
        );

        let target = if plan.rescale {
            Some(SharedCanvas::new(Bitmap::new(plan.out.w, plan.out.h)?))
        } else {
            None
        };
        let shared = Shared {
            config: &self.config,
            tiles: self.tiles,
            plan,
            active: SharedCanvas::new(image),
            target,
            grid: BinaryGrid::with_dims(p + 1, q + 1)?,
            rendezvous: Rendezvous::new(workers),
        };

        first_error(spawn_workers(&shared))?;

        let bitmap = shared.active.into_inner();
        let report = PipelineReport {
            input: plan.input,
            output: bitmap.size(),
            rescaled: plan.rescale,
            grid_rows: p + 1,
            grid_cols: q + 1,
            workers,
            elapsed: started.elapsed(),
        };
        log::debug!("pipeline finished: {}", report);
        Ok((bitmap, report))
    }
}

/// Run `shared.config.workers` named workers to completion and collect their results.
fn spawn_workers(shared: &Shared<'_>) -> Vec<ContourResult<()>> {
    let workers = shared.config.workers;
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        let mut spawn_error = None;
        for id in 0..workers {
            let spawned = thread::Builder::new()
                .name(format!("contour-worker-{}", id))
                .spawn_scoped(scope, move || shared.run_worker(id));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    shared.rendezvous.abort();
                    spawn_error = Some(ContourError::thread("spawn", Some(id), e.to_string()));
                    break;
                }
            }
        }

        let mut results: Vec<ContourResult<()>> = handles
            .into_iter()
            .enumerate()
            .map(|(id, handle)| {
                handle.join().unwrap_or_else(|_| {
                    Err(ContourError::thread("join", Some(id), "worker panicked"))
                })
            })
            .collect();
        results.extend(spawn_error.map(Err));
        results
    })
}

/// The first error that is not a consequence of another worker's failure.
fn first_error(results: Vec<ContourResult<()>>) -> ContourResult<()> {
    let mut fallback = None;
    for result in results {
        match result {
            Ok(()) => {}
            Err(e) if !e.is_secondary() => return Err(e),
            Err(e) => {
                fallback.get_or_insert(e);
            }
        }
    }
    fallback.map_or(Ok(()), Err)
}
