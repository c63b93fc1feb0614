//! Hourly bar-chart reconstruction from Screen Time screenshots.
//!
//! The pipeline runs theme detection, region location, gridline and axis
//! detection, hour slotting, bar segmentation and per-bar color tallies. Each
//! stage lives in its own module; [`extract_hourly_chart`] chains them.

pub mod axis;
pub mod bars;
pub mod chart;
pub mod config;
pub mod debug;
pub mod error;
pub mod gridlines;
pub mod mode;
pub mod palette;
pub mod region;
pub mod slots;
pub mod synthetic;

pub use chart::{
    analyze_chart, extract_hourly_chart, extract_hourly_chart_with, ChartAnalysis, ChartFrame,
    ChartResult, HourlyRecord, HourlyUsage, MeasuredBar,
};
pub use config::ChartConfig;
pub use debug::{draw_overlay, DebugRenderer, OverlayWriter};
pub use error::ChartError;
pub use mode::{detect_mode, Mode};
pub use palette::{Palette, PixelCategory};
