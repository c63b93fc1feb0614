//! Programmatic Screen Time style charts for tests and demos.
//!
//! Renders a 600x600 frame with horizontal gridlines, two vertical axes and up
//! to 24 bars drawn from stacked color segments, using colors that fall inside
//! the default palettes.

use image::{Rgb, RgbImage};
use st_data::HOURS_PER_DAY;

use crate::mode::Mode;
use crate::palette::PixelCategory;

const WIDTH: u32 = 600;
const HEIGHT: u32 = 600;
const AXIS_LEFT: u32 = 50;
const AXIS_RIGHT: u32 = 530;
const BAR_WIDTH: u32 = 10;

#[derive(Debug, Clone)]
pub struct SyntheticChart {
    mode: Mode,
    top_line: u32,
    spacing: u32,
    gridline_count: u32,
    axes: bool,
    bars: Vec<Vec<(PixelCategory, u32)>>,
}

impl SyntheticChart {
    /// Five gridlines from y=300 to y=500 and axes at x=50 and x=530.
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            top_line: 300,
            spacing: 50,
            gridline_count: 5,
            axes: true,
            bars: vec![Vec::new(); HOURS_PER_DAY],
        }
    }

    pub fn with_gridlines(mut self, top_line: u32, spacing: u32, count: u32) -> Self {
        self.top_line = top_line;
        self.spacing = spacing;
        self.gridline_count = count;
        self
    }

    pub fn without_axes(mut self) -> Self {
        self.axes = false;
        self
    }

    /// Stack `segments` bottom-up in the bar for `hour`, replacing any earlier bar.
    pub fn with_bar(mut self, hour: usize, segments: &[(PixelCategory, u32)]) -> Self {
        self.bars[hour] = segments.to_vec();
        self
    }

    /// Single-color (`Top1`) bars, one height per hour starting at midnight.
    pub fn with_heights(mut self, heights: &[u32]) -> Self {
        for (hour, &h) in heights.iter().take(HOURS_PER_DAY).enumerate() {
            self.bars[hour] = vec![(PixelCategory::Top1, h)];
        }
        self
    }

    pub fn bottom_line(&self) -> u32 {
        self.top_line + self.spacing * self.gridline_count.saturating_sub(1)
    }

    /// Columns `(x1, x2)` the bar for `hour` is drawn in.
    pub fn bar_span(hour: usize) -> (u32, u32) {
        let slot = (AXIS_RIGHT - AXIS_LEFT) / HOURS_PER_DAY as u32;
        let x1 = AXIS_LEFT + slot * hour as u32 + (slot - BAR_WIDTH) / 2;
        (x1, x1 + BAR_WIDTH - 1)
    }

    pub fn background(&self) -> Rgb<u8> {
        match self.mode {
            Mode::Dark => Rgb([28, 28, 30]),
            Mode::Light => Rgb([242, 242, 247]),
        }
    }

    pub fn gridline(&self) -> Rgb<u8> {
        match self.mode {
            Mode::Dark => Rgb([90, 90, 90]),
            Mode::Light => Rgb([225, 225, 225]),
        }
    }

    pub fn fill(&self, category: PixelCategory) -> Rgb<u8> {
        match (self.mode, category) {
            (Mode::Dark, PixelCategory::Top1) => Rgb([10, 132, 255]),
            (Mode::Dark, PixelCategory::Top2) => Rgb([90, 200, 220]),
            (Mode::Dark, PixelCategory::Top3) => Rgb([255, 165, 40]),
            (Mode::Dark, PixelCategory::Other) => Rgb([58, 58, 58]),
            (Mode::Light, PixelCategory::Top1) => Rgb([0, 122, 255]),
            (Mode::Light, PixelCategory::Top2) => Rgb([100, 200, 220]),
            (Mode::Light, PixelCategory::Top3) => Rgb([255, 160, 40]),
            (Mode::Light, PixelCategory::Other) => Rgb([210, 210, 210]),
        }
    }

    pub fn render(&self) -> RgbImage {
        let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, self.background());
        let grid = self.gridline();

        for i in 0..self.gridline_count {
            let y = self.top_line + self.spacing * i;
            if y >= HEIGHT {
                break;
            }
            for x in 0..WIDTH {
                img.put_pixel(x, y, grid);
            }
        }

        let bottom = self.bottom_line().min(HEIGHT - 1);
        if self.axes && self.gridline_count > 0 {
            for y in self.top_line..=bottom {
                img.put_pixel(AXIS_LEFT, y, grid);
                img.put_pixel(AXIS_RIGHT, y, grid);
            }
        }

        // Bars stand on the bottom gridline and grow upward.
        for (hour, segments) in self.bars.iter().enumerate() {
            let (x1, x2) = Self::bar_span(hour);
            let mut y_end = bottom;
            for &(category, height) in segments {
                let color = self.fill(category);
                let y_start = y_end.saturating_sub(height);
                for y in y_start..y_end {
                    for x in x1..=x2 {
                        img.put_pixel(x, y, color);
                    }
                }
                y_end = y_start;
            }
        }

        img
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_spans_sit_inside_slots() {
        assert_eq!(SyntheticChart::bar_span(0), (55, 64));
        assert_eq!(SyntheticChart::bar_span(23), (515, 524));
    }

    #[test]
    fn test_render_layout() {
        let chart = SyntheticChart::new(Mode::Dark).with_bar(
            3,
            &[(PixelCategory::Top1, 10), (PixelCategory::Top3, 5)],
        );
        let img = chart.render();
        assert_eq!(chart.bottom_line(), 500);
        assert_eq!(*img.get_pixel(0, 300), chart.gridline());
        assert_eq!(*img.get_pixel(50, 420), chart.gridline());
        assert_eq!(*img.get_pixel(0, 420), chart.background());

        let (x1, _) = SyntheticChart::bar_span(3);
        assert_eq!(*img.get_pixel(x1, 500), chart.gridline());
        assert_eq!(*img.get_pixel(x1, 499), chart.fill(PixelCategory::Top1));
        assert_eq!(*img.get_pixel(x1, 490), chart.fill(PixelCategory::Top1));
        assert_eq!(*img.get_pixel(x1, 489), chart.fill(PixelCategory::Top3));
        assert_eq!(*img.get_pixel(x1, 484), chart.background());
    }
}
