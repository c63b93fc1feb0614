use image::RgbImage;
use tracing::debug;

use crate::config::ChartConfig;
use crate::error::ChartError;
use crate::gridlines::Gridlines;
use crate::palette::Palette;

/// Left and right chart boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisBounds {
    pub left: u32,
    pub right: u32,
}

/// Locate the vertical axes by scanning inward from both image edges.
///
/// A column is an axis when more than `axis_column_fraction` of the rows between
/// the top and bottom gridlines are gridline gray.
pub fn locate_axes(
    image: &RgbImage,
    gridlines: &Gridlines,
    palette: &Palette,
    config: &ChartConfig,
) -> Result<AxisBounds, ChartError> {
    let w = image.width();
    let min_count = config.axis_column_fraction * gridlines.scale() as f64;
    let is_axis = |x: &u32| column_gridline_pixels(image, *x, gridlines, palette) as f64 > min_count;

    let left = (0..w).find(is_axis);
    let right = (0..w).rev().find(is_axis);

    match (left, right) {
        (Some(left), Some(right)) if right > left => {
            debug!("Chart axes: left={} right={}", left, right);
            Ok(AxisBounds { left, right })
        }
        _ => {
            debug!("No usable axes (left={:?}, right={:?})", left, right);
            Err(ChartError::NoAxisFound)
        }
    }
}

fn column_gridline_pixels(image: &RgbImage, x: u32, gridlines: &Gridlines, palette: &Palette) -> u32 {
    (gridlines.top..gridlines.bottom)
        .filter(|&y| palette.is_gridline(image.get_pixel(x, y)))
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const BG: Rgb<u8> = Rgb([28, 28, 30]);
    const GRID: Rgb<u8> = Rgb([90, 90, 90]);

    fn frame() -> Gridlines {
        Gridlines {
            rows: vec![100, 150, 200],
            top: 100,
            bottom: 200,
        }
    }

    fn with_columns(columns: &[u32]) -> RgbImage {
        let mut img = RgbImage::from_pixel(300, 300, BG);
        for &y in &[100u32, 150, 200] {
            for x in 0..300 {
                img.put_pixel(x, y, GRID);
            }
        }
        for &x in columns {
            for y in 100..=200 {
                img.put_pixel(x, y, GRID);
            }
        }
        img
    }

    #[test]
    fn test_finds_both_axes() {
        let img = with_columns(&[20, 280]);
        let axes = locate_axes(&img, &frame(), &Palette::dark(), &ChartConfig::default()).unwrap();
        assert_eq!(axes, AxisBounds { left: 20, right: 280 });
    }

    #[test]
    fn test_outermost_columns_win() {
        let img = with_columns(&[20, 40, 260, 280]);
        let axes = locate_axes(&img, &frame(), &Palette::dark(), &ChartConfig::default()).unwrap();
        assert_eq!(axes, AxisBounds { left: 20, right: 280 });
    }

    #[test]
    fn test_dashed_axis_below_fraction() {
        let mut img = with_columns(&[280]);
        // 30 of 100 rows gray: under the 35% threshold
        for y in 100..130 {
            img.put_pixel(20, y, GRID);
        }
        assert_eq!(
            locate_axes(&img, &frame(), &Palette::dark(), &ChartConfig::default()),
            Err(ChartError::NoAxisFound)
        );
    }

    #[test]
    fn test_column_fraction_is_strict() {
        let mut img = with_columns(&[280]);
        // Rows 100..134 plus the gridline at 150: exactly 35 of 100 rows.
        for y in 100..134 {
            img.put_pixel(20, y, GRID);
        }
        assert_eq!(
            locate_axes(&img, &frame(), &Palette::dark(), &ChartConfig::default()),
            Err(ChartError::NoAxisFound)
        );

        img.put_pixel(20, 134, GRID);
        let axes = locate_axes(&img, &frame(), &Palette::dark(), &ChartConfig::default()).unwrap();
        assert_eq!(axes, AxisBounds { left: 20, right: 280 });
    }

    #[test]
    fn test_single_axis_is_not_a_frame() {
        let img = with_columns(&[150]);
        assert_eq!(
            locate_axes(&img, &frame(), &Palette::dark(), &ChartConfig::default()),
            Err(ChartError::NoAxisFound)
        );
    }

    #[test]
    fn test_flat_frame_has_no_axes() {
        let img = with_columns(&[20, 280]);
        let flat = Gridlines {
            rows: vec![150],
            top: 150,
            bottom: 150,
        };
        assert_eq!(
            locate_axes(&img, &flat, &Palette::dark(), &ChartConfig::default()),
            Err(ChartError::NoAxisFound)
        );
    }
}
