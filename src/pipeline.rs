use image::RgbImage;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use st_usage::{CategoryAssignment, UsageReport, DEFAULT_FULL_SCALE_MINUTES};
use st_vision::{analyze_chart, ChartConfig, ChartResult, DebugRenderer, OverlayWriter};

/// Settings shared by every screenshot of a batch.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub config: ChartConfig,
    /// When set, each report also carries minutes per named category.
    pub categories: Option<CategoryAssignment>,
    pub full_scale_minutes: u32,
    /// Directory receiving `<stem>_debug.png` overlays.
    pub debug_dir: Option<PathBuf>,
    pub jobs: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            config: ChartConfig::builtin().clone(),
            categories: None,
            full_scale_minutes: DEFAULT_FULL_SCALE_MINUTES,
            debug_dir: None,
            jobs: 4,
        }
    }
}

/// Per-screenshot output. The chart fields are inlined next to `source`.
#[derive(Debug, Clone, Serialize)]
pub struct ScreenshotReport {
    pub source: PathBuf,
    #[serde(flatten)]
    pub chart: ChartResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScreenshotReport {
    fn failed(source: &Path, error: String) -> Self {
        Self {
            source: source.to_path_buf(),
            chart: ChartResult::empty(),
            usage: None,
            error: Some(error),
        }
    }
}

/// Runs the chart extraction over a batch of screenshots on the blocking pool.
pub struct Pipeline {
    options: Arc<PipelineOptions>,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options: Arc::new(options),
        }
    }

    /// Process every screenshot, at most `jobs` at a time.
    ///
    /// Reports come back in input order. A screenshot that fails to load or
    /// has no detectable chart yields a report with an `error` and an empty
    /// chart; the rest of the batch is unaffected.
    pub async fn run(&self, screenshots: &[PathBuf]) -> Vec<ScreenshotReport> {
        let jobs = self.options.jobs.max(1);
        info!("Processing {} screenshot(s) with {} job(s)", screenshots.len(), jobs);

        let semaphore = Arc::new(Semaphore::new(jobs));
        let mut tasks = JoinSet::new();

        for (index, path) in screenshots.iter().enumerate() {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    warn!("Job limiter closed: {}", e);
                    break;
                }
            };
            let options = self.options.clone();
            let path = path.clone();
            tasks.spawn_blocking(move || {
                let _permit = permit;
                (index, process_screenshot(&path, &options))
            });
        }

        let mut reports: Vec<Option<ScreenshotReport>> = vec![None; screenshots.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, report)) => reports[index] = Some(report),
                Err(e) => warn!("Screenshot task failed: {}", e),
            }
        }

        let reports: Vec<ScreenshotReport> = reports
            .into_iter()
            .zip(screenshots)
            .map(|(report, path)| {
                report.unwrap_or_else(|| {
                    ScreenshotReport::failed(path, "processing task did not complete".to_string())
                })
            })
            .collect();

        let failed = reports.iter().filter(|r| r.error.is_some()).count();
        info!(
            "Batch done: {} chart(s) extracted, {} failed",
            reports.len() - failed,
            failed
        );
        reports
    }
}

/// Load one screenshot and extract its chart. Never panics on bad input.
pub fn process_screenshot(path: &Path, options: &PipelineOptions) -> ScreenshotReport {
    match st_capture::load_screenshot(path) {
        Ok(image) => analyze_image(&image, path, options),
        Err(e) => {
            warn!("{:#}", e);
            ScreenshotReport::failed(path, format!("{:#}", e))
        }
    }
}

/// Extract the chart from an already decoded screenshot; `source` names it in the report.
pub fn analyze_image(image: &RgbImage, source: &Path, options: &PipelineOptions) -> ScreenshotReport {
    let analysis = match analyze_chart(image, &options.config) {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!("{}: hourly chart not extracted: {}", source.display(), e);
            return ScreenshotReport::failed(source, e.to_string());
        }
    };

    if let Some(dir) = &options.debug_dir {
        let writer = OverlayWriter::new(dir.join(overlay_name(source)));
        if let Err(e) = writer.render(image, &analysis, options.config.palette(analysis.mode)) {
            warn!("{}: {:#}", source.display(), e);
        }
    }

    let chart = analysis.result();
    debug!(
        "{}: ymax={:?}, {} bar(s)",
        source.display(),
        chart.ymax_pixels,
        analysis.bars.len()
    );

    let usage = options
        .categories
        .as_ref()
        .map(|assignment| UsageReport::from_chart(&chart, assignment, options.full_scale_minutes));

    ScreenshotReport {
        source: source.to_path_buf(),
        chart,
        usage,
        error: None,
    }
}

fn overlay_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "screenshot".to_string());
    format!("{}_debug.png", stem)
}
