use image::RgbImage;
use tracing::{debug, trace};

use crate::chart::{ChartFrame, HourlyRecord};
use crate::config::ChartConfig;
use crate::palette::{Palette, PixelCategory};

/// Columns `x1..=x2` occupied by one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarSegment {
    pub x1: u32,
    pub x2: u32,
}

impl BarSegment {
    pub fn center(&self) -> f64 {
        (self.x1 as f64 + self.x2 as f64) / 2.0
    }

    pub fn width(&self) -> u32 {
        self.x2 - self.x1 + 1
    }
}

/// Split the frame into bar segments.
///
/// A column carries a bar when its longest vertical run of classified pixels
/// inside the frame reaches `min_bar_run`. Consecutive bar columns form a
/// segment; segments narrower than `min_segment_width` are dropped.
pub fn segment_bars(
    image: &RgbImage,
    frame: &ChartFrame,
    palette: &Palette,
    config: &ChartConfig,
) -> Vec<BarSegment> {
    let mut segments = Vec::new();
    let mut start: Option<u32> = None;

    for x in frame.left..frame.right {
        let has_bar = longest_run(image, x, frame, palette) >= config.min_bar_run;
        match (has_bar, start) {
            (true, None) => start = Some(x),
            (false, Some(s)) => {
                if x - s >= config.min_segment_width {
                    segments.push(BarSegment { x1: s, x2: x - 1 });
                }
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        if frame.right - s >= config.min_segment_width {
            segments.push(BarSegment {
                x1: s,
                x2: frame.right - 1,
            });
        }
    }

    debug!("Found {} bar segment(s)", segments.len());
    segments
}

fn longest_run(image: &RgbImage, x: u32, frame: &ChartFrame, palette: &Palette) -> u32 {
    let mut run = 0;
    let mut longest = 0;
    for y in frame.top_line..frame.bottom_line {
        if palette.is_bar(image.get_pixel(x, y)) {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}

/// Measure a segment from its tallest column.
///
/// In each column the bar is the classified run ending at the lowest classified
/// row; anything classified above a gap is noise. The tallest such run becomes
/// the segment's `overall`, and its pixels are tallied per category.
pub fn measure_bar(
    image: &RgbImage,
    frame: &ChartFrame,
    segment: &BarSegment,
    palette: &Palette,
    config: &ChartConfig,
) -> HourlyRecord {
    let mut best = HourlyRecord::default();

    for x in segment.x1..=segment.x2 {
        let cats: Vec<Option<PixelCategory>> = (frame.top_line..frame.bottom_line)
            .map(|y| palette.classify(image.get_pixel(x, y)))
            .collect();

        let classified = cats.iter().filter(|c| c.is_some()).count();
        if classified < config.min_bar_rows {
            trace!("Skipping column x={}: {} classified row(s)", x, classified);
            continue;
        }

        let Some(bottom) = cats.iter().rposition(Option::is_some) else {
            continue;
        };
        let mut top = bottom;
        while top > 0 && cats[top - 1].is_some() {
            top -= 1;
        }

        let height = (bottom - top + 1) as u32;
        if height > best.overall {
            let mut record = HourlyRecord {
                overall: height,
                ..HourlyRecord::default()
            };
            for category in cats[top..=bottom].iter().flatten() {
                record.add(*category);
            }
            best = record;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const BG: Rgb<u8> = Rgb([28, 28, 30]);
    const BLUE: Rgb<u8> = Rgb([10, 132, 255]);
    const TEAL: Rgb<u8> = Rgb([90, 200, 220]);
    const ORANGE: Rgb<u8> = Rgb([255, 165, 40]);

    fn frame() -> ChartFrame {
        ChartFrame {
            top_line: 10,
            bottom_line: 90,
            left: 10,
            right: 90,
        }
    }

    fn fill(img: &mut RgbImage, xs: std::ops::RangeInclusive<u32>, ys: std::ops::Range<u32>, color: Rgb<u8>) {
        for x in xs {
            for y in ys.clone() {
                img.put_pixel(x, y, color);
            }
        }
    }

    #[test]
    fn test_segments() {
        let mut img = RgbImage::from_pixel(100, 100, BG);
        fill(&mut img, 20..=24, 50..90, BLUE);
        // Too narrow
        fill(&mut img, 30..=30, 50..90, BLUE);
        // Single-row streak is not a bar
        fill(&mut img, 40..=45, 60..61, BLUE);
        // Touches the right edge of the frame
        fill(&mut img, 85..=95, 70..90, TEAL);

        let segments = segment_bars(&img, &frame(), &Palette::dark(), &ChartConfig::default());
        assert_eq!(
            segments,
            vec![BarSegment { x1: 20, x2: 24 }, BarSegment { x1: 85, x2: 89 }]
        );
        assert_eq!(segments[0].center(), 22.0);
        assert_eq!(segments[0].width(), 5);
    }

    #[test]
    fn test_pixels_outside_frame_ignored() {
        let mut img = RgbImage::from_pixel(100, 100, BG);
        fill(&mut img, 20..=24, 0..10, BLUE);
        fill(&mut img, 30..=34, 90..100, BLUE);
        assert!(segment_bars(&img, &frame(), &Palette::dark(), &ChartConfig::default()).is_empty());
    }

    #[test]
    fn test_stacked_bar_tallies() {
        let mut img = RgbImage::from_pixel(100, 100, BG);
        fill(&mut img, 20..=24, 70..90, BLUE);
        fill(&mut img, 20..=24, 60..70, TEAL);
        fill(&mut img, 20..=24, 55..60, ORANGE);

        let record = measure_bar(
            &img,
            &frame(),
            &BarSegment { x1: 20, x2: 24 },
            &Palette::dark(),
            &ChartConfig::default(),
        );
        assert_eq!(
            record,
            HourlyRecord {
                overall: 35,
                top1: 20,
                top2: 10,
                top3: 5,
                other: 0,
            }
        );
    }

    #[test]
    fn test_noise_above_gap_not_counted() {
        let mut img = RgbImage::from_pixel(100, 100, BG);
        fill(&mut img, 20..=24, 70..90, BLUE);
        fill(&mut img, 20..=24, 30..33, ORANGE);

        let record = measure_bar(
            &img,
            &frame(),
            &BarSegment { x1: 20, x2: 24 },
            &Palette::dark(),
            &ChartConfig::default(),
        );
        assert_eq!(record.overall, 20);
        assert_eq!(record.top1, 20);
        assert_eq!(record.top3, 0);
    }

    #[test]
    fn test_tallest_column_represents_bar() {
        let mut img = RgbImage::from_pixel(100, 100, BG);
        // Antialiased edge columns are shorter than the body
        fill(&mut img, 20..=20, 75..90, BLUE);
        fill(&mut img, 21..=23, 60..90, BLUE);
        fill(&mut img, 22..=22, 58..60, TEAL);
        fill(&mut img, 24..=24, 80..90, BLUE);

        let record = measure_bar(
            &img,
            &frame(),
            &BarSegment { x1: 20, x2: 24 },
            &Palette::dark(),
            &ChartConfig::default(),
        );
        assert_eq!(record.overall, 32);
        assert_eq!(record.top1, 30);
        assert_eq!(record.top2, 2);
    }

    #[test]
    fn test_degenerate_columns_skipped() {
        let mut img = RgbImage::from_pixel(100, 100, BG);
        fill(&mut img, 20..=20, 89..90, BLUE);
        fill(&mut img, 21..=21, 86..90, BLUE);

        let record = measure_bar(
            &img,
            &frame(),
            &BarSegment { x1: 20, x2: 21 },
            &Palette::dark(),
            &ChartConfig::default(),
        );
        assert_eq!(record.overall, 4);

        let only_degenerate = measure_bar(
            &img,
            &frame(),
            &BarSegment { x1: 20, x2: 20 },
            &Palette::dark(),
            &ChartConfig::default(),
        );
        assert_eq!(only_degenerate, HourlyRecord::default());
    }
}
