use image::RgbImage;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use st_data::{HOURS_PER_DAY, HOUR_LABELS};
use tracing::{debug, warn};

use crate::axis::locate_axes;
use crate::bars::{measure_bar, segment_bars, BarSegment};
use crate::config::ChartConfig;
use crate::debug::DebugRenderer;
use crate::error::ChartError;
use crate::gridlines::{detect_gridlines, Gridlines};
use crate::mode::{detect_mode, Mode};
use crate::palette::PixelCategory;
use crate::region::{locate_chart_region, ChartRegion};
use crate::slots::SlotMap;

/// The chart's bounding box. `scale` is the full-scale height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartFrame {
    pub top_line: u32,
    pub bottom_line: u32,
    pub left: u32,
    pub right: u32,
}

impl ChartFrame {
    pub fn scale(&self) -> u32 {
        self.bottom_line - self.top_line
    }
}

/// Pixel heights of one hour's bar, in total and per fill color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyRecord {
    pub overall: u32,
    pub top1: u32,
    pub top2: u32,
    pub top3: u32,
    pub other: u32,
}

impl HourlyRecord {
    pub fn get(&self, category: PixelCategory) -> u32 {
        match category {
            PixelCategory::Top1 => self.top1,
            PixelCategory::Top2 => self.top2,
            PixelCategory::Top3 => self.top3,
            PixelCategory::Other => self.other,
        }
    }

    pub fn add(&mut self, category: PixelCategory) {
        match category {
            PixelCategory::Top1 => self.top1 += 1,
            PixelCategory::Top2 => self.top2 += 1,
            PixelCategory::Top3 => self.top3 += 1,
            PixelCategory::Other => self.other += 1,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// One record per hour, serialized as a map keyed "12am" … "11pm" in clock order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HourlyUsage([HourlyRecord; HOURS_PER_DAY]);

impl HourlyUsage {
    pub fn get(&self, label: &str) -> Option<&HourlyRecord> {
        st_data::hour_index(label).map(|i| &self.0[i])
    }

    pub fn records(&self) -> &[HourlyRecord; HOURS_PER_DAY] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &HourlyRecord)> {
        HOUR_LABELS.iter().copied().zip(self.0.iter())
    }

    pub fn is_all_zero(&self) -> bool {
        self.0.iter().all(HourlyRecord::is_zero)
    }
}

impl Serialize for HourlyUsage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(HOURS_PER_DAY))?;
        for (label, record) in self.iter() {
            map.serialize_entry(label, record)?;
        }
        map.end()
    }
}

/// Output of the chart pipeline. `ymax_pixels` is `None` when extraction failed,
/// in which case every hour is zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartResult {
    pub ymax_pixels: Option<u32>,
    pub hourly_usage: HourlyUsage,
}

impl ChartResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ymax_pixels.is_none()
    }
}

/// A bar segment after measurement and hour assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredBar {
    pub segment: BarSegment,
    pub slot: usize,
    pub record: HourlyRecord,
}

/// Everything the pipeline found on the way to a [`ChartResult`].
#[derive(Debug, Clone)]
pub struct ChartAnalysis {
    pub mode: Mode,
    pub region: ChartRegion,
    pub gridlines: Gridlines,
    pub frame: ChartFrame,
    pub slots: SlotMap,
    pub bars: Vec<MeasuredBar>,
}

impl ChartAnalysis {
    pub fn result(&self) -> ChartResult {
        let mut usage = HourlyUsage::default();
        // Later segments overwrite earlier ones landing in the same hour.
        for bar in &self.bars {
            usage.0[bar.slot] = bar.record;
        }
        ChartResult {
            ymax_pixels: Some(self.frame.scale()),
            hourly_usage: usage,
        }
    }
}

/// Run every detection stage on a screenshot.
pub fn analyze_chart(image: &RgbImage, config: &ChartConfig) -> Result<ChartAnalysis, ChartError> {
    let mode = detect_mode(image, config);
    let palette = config.palette(mode);

    let region = locate_chart_region(image, palette, config)?;
    let gridlines = detect_gridlines(image, &region, palette, config)?;
    let axes = locate_axes(image, &gridlines, palette, config)?;

    let frame = ChartFrame {
        top_line: gridlines.top,
        bottom_line: gridlines.bottom,
        left: axes.left,
        right: axes.right,
    };
    let slots = SlotMap::new(frame.left, frame.right);

    let bars = segment_bars(image, &frame, palette, config)
        .into_iter()
        .map(|segment| {
            let record = measure_bar(image, &frame, &segment, palette, config);
            let slot = slots.nearest(segment.center());
            debug!(
                "Bar x={}..={} -> {}: overall={} top1={} top2={} top3={} other={}",
                segment.x1,
                segment.x2,
                HOUR_LABELS[slot],
                record.overall,
                record.top1,
                record.top2,
                record.top3,
                record.other
            );
            MeasuredBar {
                segment,
                slot,
                record,
            }
        })
        .collect();

    Ok(ChartAnalysis {
        mode,
        region,
        gridlines,
        frame,
        slots,
        bars,
    })
}

/// Extract the hourly chart, or an empty result if any detection stage fails.
pub fn extract_hourly_chart(image: &RgbImage, config: &ChartConfig) -> ChartResult {
    extract_hourly_chart_with(image, config, None)
}

/// Like [`extract_hourly_chart`], handing the analysis to `renderer` when one is given.
///
/// Renderer failures are logged and never change the returned result.
pub fn extract_hourly_chart_with(
    image: &RgbImage,
    config: &ChartConfig,
    renderer: Option<&dyn DebugRenderer>,
) -> ChartResult {
    match analyze_chart(image, config) {
        Ok(analysis) => {
            if let Some(renderer) = renderer {
                if let Err(e) = renderer.render(image, &analysis, config.palette(analysis.mode)) {
                    warn!("Debug overlay failed: {:#}", e);
                }
            }
            analysis.result()
        }
        Err(e) => {
            warn!("Hourly chart not extracted: {}", e);
            ChartResult::empty()
        }
    }
}
