use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ChartConfig;

/// Visual theme of the screenshot; selects the palette used by every classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Light,
    #[default]
    Dark,
}

/// Classify the screenshot theme from the mean brightness of a fixed interior patch.
///
/// The patch is clipped to the image. When nothing of it is left (images smaller
/// than the patch origin) the default `Dark` mode is returned.
pub fn detect_mode(image: &RgbImage, config: &ChartConfig) -> Mode {
    let (w, h) = image.dimensions();
    let start = config.mode_patch_start;
    let x_end = config.mode_patch_end.min(w);
    let y_end = config.mode_patch_end.min(h);

    if start >= x_end || start >= y_end {
        debug!(
            "Theme patch {}..{} outside {}x{} image, assuming dark mode",
            start, config.mode_patch_end, w, h
        );
        return Mode::default();
    }

    let mut sum = 0u64;
    for y in start..y_end {
        for x in start..x_end {
            let px = image.get_pixel(x, y);
            sum += px[0] as u64 + px[1] as u64 + px[2] as u64;
        }
    }
    let samples = (x_end - start) as u64 * (y_end - start) as u64 * 3;
    let mean = sum as f64 / samples as f64;

    let mode = if mean > config.light_threshold {
        Mode::Light
    } else {
        Mode::Dark
    };
    debug!("Theme patch mean brightness {:.1} -> {:?}", mean, mode);
    mode
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_dark_and_light() {
        let config = ChartConfig::default();
        let dark = RgbImage::from_pixel(300, 300, Rgb([28, 28, 30]));
        assert_eq!(detect_mode(&dark, &config), Mode::Dark);

        let light = RgbImage::from_pixel(300, 300, Rgb([242, 242, 247]));
        assert_eq!(detect_mode(&light, &config), Mode::Light);
    }

    #[test]
    fn test_threshold_is_strict() {
        let config = ChartConfig::default();
        let at = RgbImage::from_pixel(300, 300, Rgb([127, 127, 127]));
        assert_eq!(detect_mode(&at, &config), Mode::Dark);
        let above = RgbImage::from_pixel(300, 300, Rgb([128, 128, 128]));
        assert_eq!(detect_mode(&above, &config), Mode::Light);
    }

    #[test]
    fn test_only_patch_is_sampled() {
        let config = ChartConfig::default();
        let img = RgbImage::from_fn(400, 400, |x, y| {
            if (100..200).contains(&x) && (100..200).contains(&y) {
                Rgb([250, 250, 250])
            } else {
                Rgb([0, 0, 0])
            }
        });
        assert_eq!(detect_mode(&img, &config), Mode::Light);
    }

    #[test]
    fn test_partial_patch_is_clipped() {
        let config = ChartConfig::default();
        let img = RgbImage::from_pixel(150, 120, Rgb([240, 240, 240]));
        assert_eq!(detect_mode(&img, &config), Mode::Light);
    }

    #[test]
    fn test_small_image_defaults_dark() {
        let config = ChartConfig::default();
        let img = RgbImage::from_pixel(50, 50, Rgb([255, 255, 255]));
        assert_eq!(detect_mode(&img, &config), Mode::Dark);
    }
}
