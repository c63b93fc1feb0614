use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

use crate::mode::Mode;
use crate::palette::Palette;

static BUILTIN: OnceLock<ChartConfig> = OnceLock::new();

/// Tunable constants for every stage of the hourly chart pipeline.
///
/// The defaults are hand-tuned against iOS Screen Time screenshots. A JSON file
/// may override any subset of fields; missing fields keep their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// First row/column of the square patch sampled for theme detection.
    pub mode_patch_start: u32,
    /// End (exclusive) of the theme patch.
    pub mode_patch_end: u32,
    /// Mean patch brightness above which the screenshot is light-themed.
    pub light_threshold: f64,

    /// Horizontal distance between region probe columns.
    pub probe_step: u32,
    /// A probe run must be longer than this many rows to be a candidate region.
    pub min_region_run: u32,
    /// Candidate regions shorter than this are ignored.
    pub min_region_height: u32,

    /// Rows above the chart region searched for gridlines.
    pub gridline_lookback: u32,
    /// Fraction of the image width that must be gridline-gray for a row to qualify.
    pub gridline_row_fraction: f64,
    /// Qualifying rows at most this far apart merge into one gridline.
    pub gridline_merge_gap: u32,
    /// Only the gridlines closest to the chart are kept.
    pub max_gridlines: usize,

    /// Fraction of the frame height that must be gridline-gray for a column to be an axis.
    pub axis_column_fraction: f64,

    /// Minimum vertical run of classified pixels for a column to carry a bar.
    pub min_bar_run: u32,
    /// Narrower segments are dropped as noise.
    pub min_segment_width: u32,
    /// Columns with fewer classified rows are skipped when measuring a bar.
    pub min_bar_rows: usize,

    pub light: Palette,
    pub dark: Palette,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            mode_patch_start: 100,
            mode_patch_end: 200,
            light_threshold: 127.0,
            probe_step: 40,
            min_region_run: 20,
            min_region_height: 20,
            gridline_lookback: 500,
            gridline_row_fraction: 0.4,
            gridline_merge_gap: 2,
            max_gridlines: 5,
            axis_column_fraction: 0.35,
            min_bar_run: 2,
            min_segment_width: 2,
            min_bar_rows: 2,
            light: Palette::light(),
            dark: Palette::dark(),
        }
    }
}

impl ChartConfig {
    /// Shared default configuration, built on first use.
    pub fn builtin() -> &'static ChartConfig {
        BUILTIN.get_or_init(ChartConfig::default)
    }

    /// Load an override file. Fields absent from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read chart config {}", path.display()))?;
        let config: ChartConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse chart config {}", path.display()))?;
        tracing::info!("Loaded chart config from {}", path.display());
        Ok(config)
    }

    pub fn palette(&self, mode: Mode) -> &Palette {
        match mode {
            Mode::Light => &self.light,
            Mode::Dark => &self.dark,
        }
    }
}
