use image::Rgb;
use serde::{Deserialize, Serialize};

/// Bar fill a single pixel belongs to. Background pixels classify as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelCategory {
    Top1,
    Top2,
    Top3,
    Other,
}

impl PixelCategory {
    pub const ALL: [PixelCategory; 4] = [
        PixelCategory::Top1,
        PixelCategory::Top2,
        PixelCategory::Top3,
        PixelCategory::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PixelCategory::Top1 => "top1",
            PixelCategory::Top2 => "top2",
            PixelCategory::Top3 => "top3",
            PixelCategory::Other => "other",
        }
    }
}

/// Inclusive bounds on one 8-bit channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRange {
    pub min: u8,
    pub max: u8,
}

impl ChannelRange {
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    pub fn contains(self, value: u8) -> bool {
        self.min <= value && value <= self.max
    }
}

/// One entry of a palette's ordered rule list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRule {
    pub category: PixelCategory,
    pub r: ChannelRange,
    pub g: ChannelRange,
    pub b: ChannelRange,
    /// Upper bound on |r-g| and |g-b|, used for the gray "other" fill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_spread: Option<u8>,
}

impl ColorRule {
    const fn rgb(category: PixelCategory, r: ChannelRange, g: ChannelRange, b: ChannelRange) -> Self {
        Self {
            category,
            r,
            g,
            b,
            max_spread: None,
        }
    }

    const fn gray(category: PixelCategory, level: ChannelRange, max_spread: u8) -> Self {
        Self {
            category,
            r: level,
            g: level,
            b: level,
            max_spread: Some(max_spread),
        }
    }

    pub fn matches(&self, px: &Rgb<u8>) -> bool {
        let [r, g, b] = px.0;
        if !(self.r.contains(r) && self.g.contains(g) && self.b.contains(b)) {
            return false;
        }
        match self.max_spread {
            Some(limit) => r.abs_diff(g) <= limit && g.abs_diff(b) <= limit,
            None => true,
        }
    }
}

/// Near-uniform gray inside a brightness band: the color of gridlines and axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrayBand {
    pub min_brightness: f64,
    pub max_brightness: f64,
    pub max_spread: u8,
}

impl GrayBand {
    pub fn contains(&self, px: &Rgb<u8>) -> bool {
        let [r, g, b] = px.0;
        if r.abs_diff(g) > self.max_spread || g.abs_diff(b) > self.max_spread {
            return false;
        }
        let brightness = (r as f64 + g as f64 + b as f64) / 3.0;
        self.min_brightness <= brightness && brightness <= self.max_brightness
    }
}

/// Color thresholds for one theme.
///
/// `rules` are evaluated top-down and the first match wins, so a pixel that
/// satisfies two rules always gets the earlier category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub rules: Vec<ColorRule>,
    pub gridline: GrayBand,
}

impl Palette {
    /// Dark theme: blue / teal / orange fills, dark gray "other".
    pub fn dark() -> Self {
        Self {
            rules: vec![
                ColorRule::rgb(
                    PixelCategory::Top1,
                    ChannelRange::new(0, 79),
                    ChannelRange::new(100, 160),
                    ChannelRange::new(221, 255),
                ),
                ColorRule::rgb(
                    PixelCategory::Top2,
                    ChannelRange::new(0, 149),
                    ChannelRange::new(171, 255),
                    ChannelRange::new(181, 239),
                ),
                ColorRule::rgb(
                    PixelCategory::Top3,
                    ChannelRange::new(211, 255),
                    ChannelRange::new(140, 190),
                    ChannelRange::new(0, 89),
                ),
                ColorRule::gray(PixelCategory::Other, ChannelRange::new(48, 68), 4),
            ],
            gridline: GrayBand {
                min_brightness: 50.0,
                max_brightness: 110.0,
                max_spread: 8,
            },
        }
    }

    /// Light theme: same hues, slightly shifted, light gray "other".
    pub fn light() -> Self {
        Self {
            rules: vec![
                ColorRule::rgb(
                    PixelCategory::Top1,
                    ChannelRange::new(0, 99),
                    ChannelRange::new(110, 170),
                    ChannelRange::new(211, 255),
                ),
                ColorRule::rgb(
                    PixelCategory::Top2,
                    ChannelRange::new(0, 139),
                    ChannelRange::new(166, 255),
                    ChannelRange::new(181, 234),
                ),
                ColorRule::rgb(
                    PixelCategory::Top3,
                    ChannelRange::new(211, 255),
                    ChannelRange::new(135, 185),
                    ChannelRange::new(0, 84),
                ),
                ColorRule::gray(PixelCategory::Other, ChannelRange::new(200, 220), 7),
            ],
            gridline: GrayBand {
                min_brightness: 190.0,
                max_brightness: 230.0,
                max_spread: 8,
            },
        }
    }

    pub fn classify(&self, px: &Rgb<u8>) -> Option<PixelCategory> {
        self.rules
            .iter()
            .find(|rule| rule.matches(px))
            .map(|rule| rule.category)
    }

    pub fn is_bar(&self, px: &Rgb<u8>) -> bool {
        self.classify(px).is_some()
    }

    pub fn is_gridline(&self, px: &Rgb<u8>) -> bool {
        self.gridline.contains(px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_fills() {
        let palette = Palette::dark();
        assert_eq!(palette.classify(&Rgb([10, 132, 255])), Some(PixelCategory::Top1));
        assert_eq!(palette.classify(&Rgb([90, 200, 220])), Some(PixelCategory::Top2));
        assert_eq!(palette.classify(&Rgb([255, 165, 40])), Some(PixelCategory::Top3));
        assert_eq!(palette.classify(&Rgb([58, 58, 58])), Some(PixelCategory::Other));
        assert_eq!(palette.classify(&Rgb([28, 28, 30])), None);
    }

    #[test]
    fn test_light_fills() {
        let palette = Palette::light();
        assert_eq!(palette.classify(&Rgb([0, 122, 255])), Some(PixelCategory::Top1));
        assert_eq!(palette.classify(&Rgb([100, 200, 220])), Some(PixelCategory::Top2));
        assert_eq!(palette.classify(&Rgb([255, 160, 40])), Some(PixelCategory::Top3));
        assert_eq!(palette.classify(&Rgb([210, 210, 210])), Some(PixelCategory::Other));
        assert_eq!(palette.classify(&Rgb([255, 255, 255])), None);
    }

    #[test]
    fn test_other_rejects_tinted_gray() {
        let palette = Palette::dark();
        // Inside the level band on every channel but too far from neutral.
        assert_eq!(palette.classify(&Rgb([50, 56, 62])), None);
    }

    #[test]
    fn test_first_rule_wins() {
        let mut palette = Palette::dark();
        palette.rules.push(ColorRule::rgb(
            PixelCategory::Other,
            ChannelRange::new(0, 255),
            ChannelRange::new(0, 255),
            ChannelRange::new(0, 255),
        ));
        assert_eq!(palette.classify(&Rgb([10, 132, 255])), Some(PixelCategory::Top1));
        assert_eq!(palette.classify(&Rgb([28, 28, 30])), Some(PixelCategory::Other));
    }

    #[test]
    fn test_gridline_band() {
        let dark = Palette::dark();
        assert!(dark.is_gridline(&Rgb([90, 90, 90])));
        assert!(!dark.is_gridline(&Rgb([28, 28, 30])));
        assert!(!dark.is_gridline(&Rgb([90, 110, 90])));

        let light = Palette::light();
        assert!(light.is_gridline(&Rgb([225, 225, 225])));
        assert!(!light.is_gridline(&Rgb([255, 255, 255])));
    }
}
