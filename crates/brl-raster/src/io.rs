use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, RgbImage};

/// Load any image the `image` crate decodes (PNG, JPEG, BMP).
///
/// # Errors
/// Returns an error if the file is missing or cannot be decoded.
///
/// # Example
/// ```no_run
/// use brl_raster::io::load_image;
/// let img = load_image(std::path::Path::new("braille.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).with_context(|| format!("Impossible de charger {}", path.display()))
}

/// Save `img`, format chosen from the extension. Parent directories are
/// created as needed.
///
/// # Errors
/// Returns an error if the directory or the file cannot be written.
pub fn save_image(img: &RgbImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer {}", parent.display()))?;
    }
    img.save(path)
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!("Image écrite : {} ({}x{})", path.display(), img.width(), img.height());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.png");
        let img = RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]));
        save_image(&img, &path).unwrap();
        let back = load_image(&path).unwrap().to_rgb8();
        assert_eq!(back, img);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_image(Path::new("/nonexistent/braille.png")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/braille.png"));
    }
}
