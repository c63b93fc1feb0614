use image::RgbImage;
use tracing::debug;

use crate::config::ChartConfig;
use crate::error::ChartError;
use crate::palette::Palette;

/// Rows covered by the bar run chosen as the hourly chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartRegion {
    pub top: u32,
    /// First row past the run.
    pub bottom: u32,
}

impl ChartRegion {
    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Find the vertical extent of the hourly chart.
///
/// Probe columns across the middle third of the image are scanned from a quarter
/// of the way down to the bottom for runs of bar-colored pixels. The probe with
/// the most runs wins (first probe on ties), and of its runs the bottommost one
/// is taken: on the Screen Time page the hourly chart sits below the weekly one.
pub fn locate_chart_region(
    image: &RgbImage,
    palette: &Palette,
    config: &ChartConfig,
) -> Result<ChartRegion, ChartError> {
    let w = image.width();
    let step = config.probe_step.max(1);

    let mut best: Vec<ChartRegion> = Vec::new();
    let mut best_x = None;
    let mut x = w / 3;
    while x < 2 * w / 3 {
        let runs = probe_runs(image, x, palette, config);
        if runs.len() > best.len() {
            best = runs;
            best_x = Some(x);
        }
        x += step;
    }

    let Some(probe_x) = best_x else {
        debug!("No bar runs on any probe column");
        return Err(ChartError::NoChartRegionFound);
    };

    for (i, run) in best.iter().enumerate() {
        debug!(
            "Candidate region {} on probe x={}: top={} bottom={} height={}",
            i,
            probe_x,
            run.top,
            run.bottom,
            run.height()
        );
    }

    let region = best
        .into_iter()
        .filter(|run| run.height() >= config.min_region_height)
        .max_by_key(|run| run.top)
        .ok_or(ChartError::NoChartRegionFound)?;

    debug!("Chart region: y={}..{}", region.top, region.bottom);
    Ok(region)
}

/// Runs of bar-colored pixels down one column, longer than `min_region_run`.
///
/// A run only counts once a non-bar row closes it; one still open at the
/// bottom edge is dropped.
fn probe_runs(image: &RgbImage, x: u32, palette: &Palette, config: &ChartConfig) -> Vec<ChartRegion> {
    let h = image.height();
    let mut runs = Vec::new();
    let mut start: Option<u32> = None;

    for y in h / 4..h {
        let has_bar = palette.is_bar(image.get_pixel(x, y));
        match (has_bar, start) {
            (true, None) => start = Some(y),
            (false, Some(s)) => {
                if y - s > config.min_region_run {
                    runs.push(ChartRegion { top: s, bottom: y });
                }
                start = None;
            }
            _ => {}
        }
    }
    runs
}
