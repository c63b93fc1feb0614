use serde::{Deserialize, Serialize};
use st_data::CategoryRegistry;
use st_vision::{ChartResult, PixelCategory};
use std::collections::BTreeMap;
use tracing::debug;

/// Minutes represented by the chart's top gridline on the daily Screen Time view.
pub const DEFAULT_FULL_SCALE_MINUTES: u32 = 60;

/// Convert a bar height to minutes, `None` when the chart has no usable scale.
pub fn pixels_to_minutes(pixels: u32, ymax_pixels: Option<u32>, full_scale_minutes: u32) -> Option<u32> {
    match ymax_pixels {
        Some(ymax) if ymax > 0 => {
            let minutes = pixels as f64 / ymax as f64 * full_scale_minutes as f64;
            Some(minutes.round() as u32)
        }
        _ => None,
    }
}

/// Category names for the three colored fills, in legend order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAssignment {
    pub top1: Option<String>,
    pub top2: Option<String>,
    pub top3: Option<String>,
}

impl CategoryAssignment {
    /// Assign legend labels to the fills: the first label colors `top1`, and so on.
    ///
    /// Labels are canonicalized through the registry; unknown ones are kept
    /// lower-cased. Blank labels leave their fill unnamed and extra labels past
    /// the third are ignored.
    pub fn from_labels<S: AsRef<str>>(labels: &[S], registry: &CategoryRegistry) -> Self {
        let mut names = labels.iter().take(3).map(|label| {
            let label = label.as_ref().trim();
            if label.is_empty() {
                return None;
            }
            let name = registry
                .canonicalize(label)
                .map(str::to_string)
                .unwrap_or_else(|| label.to_lowercase());
            Some(name)
        });

        let assignment = Self {
            top1: names.next().flatten(),
            top2: names.next().flatten(),
            top3: names.next().flatten(),
        };
        debug!("Category assignment: {:?}", assignment);
        assignment
    }

    pub fn name_for(&self, category: PixelCategory) -> Option<&str> {
        match category {
            PixelCategory::Top1 => self.top1.as_deref(),
            PixelCategory::Top2 => self.top2.as_deref(),
            PixelCategory::Top3 => self.top3.as_deref(),
            PixelCategory::Other => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUsage {
    pub pixels: u32,
    pub minutes: Option<u32>,
}

/// One hour of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourUsage {
    pub hour: String,
    pub overall_pixels: u32,
    pub overall_minutes: Option<u32>,
    /// Pixels of each named fill. Two fills naming the same category are summed.
    pub categories: BTreeMap<String, CategoryUsage>,
    /// Pixels not attributed to a named category: the gray fill plus unnamed colored fills.
    pub other_pixels: u32,
}

/// Chart tallies translated into named categories and minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageReport {
    pub ymax_pixels: Option<u32>,
    pub full_scale_minutes: u32,
    pub hours: Vec<HourUsage>,
}

impl UsageReport {
    pub fn from_chart(chart: &ChartResult, assignment: &CategoryAssignment, full_scale_minutes: u32) -> Self {
        let ymax = chart.ymax_pixels;
        let minutes = |pixels| pixels_to_minutes(pixels, ymax, full_scale_minutes);

        let hours = chart
            .hourly_usage
            .iter()
            .map(|(label, record)| {
                let mut categories: BTreeMap<String, CategoryUsage> = BTreeMap::new();
                let mut other_pixels = record.other;

                for category in [PixelCategory::Top1, PixelCategory::Top2, PixelCategory::Top3] {
                    let pixels = record.get(category);
                    match assignment.name_for(category) {
                        Some(name) => categories.entry(name.to_string()).or_default().pixels += pixels,
                        None => other_pixels += pixels,
                    }
                }
                for usage in categories.values_mut() {
                    usage.minutes = minutes(usage.pixels);
                }

                HourUsage {
                    hour: label.to_string(),
                    overall_pixels: record.overall,
                    overall_minutes: minutes(record.overall),
                    categories,
                    other_pixels,
                }
            })
            .collect();

        Self {
            ymax_pixels: ymax,
            full_scale_minutes,
            hours,
        }
    }

    /// Sum of the hourly `overall_minutes`; `None` when the chart had no scale.
    pub fn total_minutes(&self) -> Option<u32> {
        self.hours.iter().map(|h| h.overall_minutes).sum()
    }

    pub fn hour(&self, label: &str) -> Option<&HourUsage> {
        let index = st_data::hour_index(label)?;
        self.hours.get(index)
    }
}
