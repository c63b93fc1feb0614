use image::RgbImage;
use tracing::debug;

use crate::config::ChartConfig;
use crate::error::ChartError;
use crate::palette::Palette;
use crate::region::ChartRegion;

/// Horizontal gridlines framing the chart, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gridlines {
    /// Kept gridline rows, ascending.
    pub rows: Vec<u32>,
    pub top: u32,
    pub bottom: u32,
}

impl Gridlines {
    /// Pixel height of the chart's full-scale value.
    pub fn scale(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Find the gridlines above and through the chart region.
///
/// Rows from `gridline_lookback` above the region down to its bottom row qualify
/// when more than `gridline_row_fraction` of the image width is gridline gray.
/// Neighbouring rows merge into one gridline, and only the last `max_gridlines`
/// are kept since the ones higher up belong to other parts of the page.
pub fn detect_gridlines(
    image: &RgbImage,
    region: &ChartRegion,
    palette: &Palette,
    config: &ChartConfig,
) -> Result<Gridlines, ChartError> {
    let (w, h) = image.dimensions();
    if h == 0 {
        return Err(ChartError::NoGridlinesFound);
    }

    let start = region.top.saturating_sub(config.gridline_lookback);
    let end = region.bottom.min(h - 1);
    let min_count = config.gridline_row_fraction * w as f64;

    let qualifying: Vec<u32> = (start..=end)
        .filter(|&y| gridline_pixels_in_row(image, y, palette) as f64 > min_count)
        .collect();

    if qualifying.is_empty() {
        debug!("No gridline rows in y={}..={}", start, end);
        return Err(ChartError::NoGridlinesFound);
    }

    let mut rows = collapse_rows(&qualifying, config.gridline_merge_gap);
    let keep = config.max_gridlines.max(1);
    if rows.len() > keep {
        let dropped = rows.len() - keep;
        debug!("Dropping {} gridline(s) far above the chart", dropped);
        rows.drain(..dropped);
    }

    let top = rows[0];
    let bottom = rows[rows.len() - 1];
    debug!(
        "Gridlines at {:?} ({} qualifying rows): top={} bottom={} scale={}",
        rows,
        qualifying.len(),
        top,
        bottom,
        bottom - top
    );

    Ok(Gridlines { rows, top, bottom })
}

fn gridline_pixels_in_row(image: &RgbImage, y: u32, palette: &Palette) -> u32 {
    (0..image.width())
        .filter(|&x| palette.is_gridline(image.get_pixel(x, y)))
        .count() as u32
}

/// Merge ascending rows into groups whose neighbours are at most `gap` apart,
/// each represented by its (floored) mean row.
fn collapse_rows(rows: &[u32], gap: u32) -> Vec<u32> {
    let mut collapsed = Vec::new();
    let mut group: Vec<u32> = Vec::new();

    for &y in rows {
        if let Some(&last) = group.last() {
            if y - last > gap {
                collapsed.push(group_mean(&group));
                group.clear();
            }
        }
        group.push(y);
    }
    if !group.is_empty() {
        collapsed.push(group_mean(&group));
    }

    collapsed
}

fn group_mean(group: &[u32]) -> u32 {
    let sum: u64 = group.iter().map(|&y| y as u64).sum();
    (sum / group.len() as u64) as u32
}
