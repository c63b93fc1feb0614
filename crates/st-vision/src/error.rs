/// Detection stages that abort the chart pipeline.
///
/// Any of these turns into an empty [`ChartResult`](crate::ChartResult): a chart is
/// never assembled from a partially detected frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ChartError {
    #[error("no bar-colored region of sufficient height on any probe column")]
    NoChartRegionFound,
    #[error("no horizontal gridline rows found above the chart region")]
    NoGridlinesFound,
    #[error("chart left/right axis not found or inverted")]
    NoAxisFound,
}
