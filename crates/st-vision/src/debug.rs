use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::chart::ChartAnalysis;
use crate::palette::{Palette, PixelCategory};

const GRIDLINE: Rgb<u8> = Rgb([255, 0, 0]);
const TOP_LINE: Rgb<u8> = Rgb([0, 0, 255]);
const BOTTOM_LINE: Rgb<u8> = Rgb([128, 0, 128]);
const OTHER_PIXEL: Rgb<u8> = Rgb([0, 255, 0]);

/// Side channel that receives a successful analysis. Never affects the result.
pub trait DebugRenderer {
    fn render(&self, image: &RgbImage, analysis: &ChartAnalysis, palette: &Palette) -> Result<()>;
}

/// Writes [`draw_overlay`] output to a PNG at `path`.
#[derive(Debug, Clone)]
pub struct OverlayWriter {
    path: PathBuf,
}

impl OverlayWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DebugRenderer for OverlayWriter {
    fn render(&self, image: &RgbImage, analysis: &ChartAnalysis, palette: &Palette) -> Result<()> {
        let overlay = draw_overlay(image, analysis, palette);
        overlay
            .save(&self.path)
            .with_context(|| format!("Failed to write debug overlay to {}", self.path.display()))?;
        debug!("Debug overlay saved to {}", self.path.display());
        Ok(())
    }
}

pub fn marker_color(category: PixelCategory) -> Rgb<u8> {
    match category {
        PixelCategory::Top1 => Rgb([255, 0, 0]),
        PixelCategory::Top2 => Rgb([0, 0, 255]),
        PixelCategory::Top3 => Rgb([255, 140, 0]),
        PixelCategory::Other => Rgb([128, 128, 128]),
    }
}

/// Copy of `image` annotated with what the pipeline saw.
///
/// `Other` pixels inside the frame turn bright green, gridlines are red, the
/// top and bottom frame lines are 2px blue and purple. Every measured bar gets
/// a marker line per category at both edge columns, rising from the bottom
/// line by that category's pixel count.
pub fn draw_overlay(image: &RgbImage, analysis: &ChartAnalysis, palette: &Palette) -> RgbImage {
    let mut canvas = image.clone();
    let (w, h) = canvas.dimensions();
    if w == 0 || h == 0 {
        return canvas;
    }
    let frame = &analysis.frame;

    for y in frame.top_line..frame.bottom_line.min(h) {
        for x in frame.left..frame.right.min(w) {
            if palette.classify(image.get_pixel(x, y)) == Some(PixelCategory::Other) {
                canvas.put_pixel(x, y, OTHER_PIXEL);
            }
        }
    }

    for &y in &analysis.gridlines.rows {
        hline(&mut canvas, y, GRIDLINE);
    }
    for y in [frame.top_line, frame.top_line + 1] {
        hline(&mut canvas, y, TOP_LINE);
    }
    for y in [frame.bottom_line, frame.bottom_line + 1] {
        hline(&mut canvas, y, BOTTOM_LINE);
    }

    let bottom = frame.bottom_line as f32;
    for bar in &analysis.bars {
        if bar.record.overall == 0 {
            continue;
        }
        for category in PixelCategory::ALL {
            let count = bar.record.get(category);
            if count == 0 {
                continue;
            }
            let color = marker_color(category);
            let top = bottom - count as f32;
            for x in [bar.segment.x1, bar.segment.x2] {
                draw_line_segment_mut(&mut canvas, (x as f32, bottom), (x as f32, top), color);
            }
        }
    }

    canvas
}

fn hline(canvas: &mut RgbImage, y: u32, color: Rgb<u8>) {
    if y < canvas.height() {
        let right = (canvas.width() - 1) as f32;
        draw_line_segment_mut(canvas, (0.0, y as f32), (right, y as f32), color);
    }
}
