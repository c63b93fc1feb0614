use anyhow::{bail, Context, Result};
use image::RgbImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File extensions accepted when expanding a directory, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp"];

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// Decode a screenshot into 8-bit RGB, dropping any alpha channel.
pub fn load_screenshot(path: &Path) -> Result<RgbImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to load screenshot {}", path.display()))?
        .to_rgb8();
    debug!(
        "Loaded {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(img)
}

/// Expand the given inputs into the list of screenshots to process.
///
/// Files are kept as given, whatever their extension. Directories contribute
/// their supported image files (not recursively), sorted by path. Input order
/// is otherwise preserved.
pub fn collect_screenshots(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut screenshots = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let entries = std::fs::read_dir(input)
                .with_context(|| format!("Failed to read directory {}", input.display()))?;
            let mut found = Vec::new();
            for entry in entries {
                let path = entry
                    .with_context(|| format!("Failed to list {}", input.display()))?
                    .path();
                if path.is_file() && is_supported(&path) {
                    found.push(path);
                }
            }
            found.sort();
            debug!("{} screenshot(s) in {}", found.len(), input.display());
            screenshots.extend(found);
        } else if input.is_file() {
            screenshots.push(input.clone());
        } else {
            bail!("Input not found: {}", input.display());
        }
    }

    info!("Collected {} screenshot(s)", screenshots.len());
    Ok(screenshots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("a/shot.png")));
        assert!(is_supported(Path::new("shot.JPG")));
        assert!(is_supported(Path::new("shot.webp")));
        assert!(!is_supported(Path::new("notes.txt")));
        assert!(!is_supported(Path::new("png")));
    }

    #[test]
    fn test_load_drops_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgba.png");
        let rgba = image::RgbaImage::from_pixel(4, 3, image::Rgba([10, 132, 255, 128]));
        rgba.save(&path).unwrap();

        let img = load_screenshot(&path).unwrap();
        assert_eq!(img.dimensions(), (4, 3));
        assert_eq!(*img.get_pixel(2, 1), Rgb([10, 132, 255]));
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        let err = load_screenshot(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.png"));
    }

    #[test]
    fn test_collect_expands_directories() {
        let dir = tempfile::tempdir().unwrap();
        let shots = dir.path().join("shots");
        std::fs::create_dir(&shots).unwrap();
        for name in ["b.png", "a.jpg", "c.txt"] {
            std::fs::write(shots.join(name), b"").unwrap();
        }
        std::fs::create_dir(shots.join("nested.png")).unwrap();
        let single = dir.path().join("z.bin");
        std::fs::write(&single, b"").unwrap();

        let collected = collect_screenshots(&[single.clone(), shots.clone()]).unwrap();
        assert_eq!(collected, vec![single, shots.join("a.jpg"), shots.join("b.png")]);
    }

    #[test]
    fn test_collect_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_screenshots(&[dir.path().join("nope.png")]).is_err());
    }
}
