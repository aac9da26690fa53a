use std::fs;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use tesswrap_core::{Error, Result};
use tesswrap_types::ImageFormat;

/// Image handed to the engine
#[derive(Debug, Clone)]
pub enum OcrInput {
    /// Existing image file, passed to the engine by path
    Path(PathBuf),
    /// Encoded image bytes, written to the scratch directory unchanged
    Encoded(Vec<u8>),
    /// Decoded image, written to the scratch directory as PNG
    Image(DynamicImage),
}

impl OcrInput {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        OcrInput::Path(path.into())
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        OcrInput::Encoded(bytes.into())
    }

    /// Check the input can be staged without touching the engine
    pub fn validate(&self) -> Result<ImageFormat> {
        match self {
            OcrInput::Path(path) => {
                if !path.is_file() {
                    return Err(Error::InvalidImage(format!(
                        "file not found: {}",
                        path.display()
                    )));
                }
                let ext = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or_default();
                ImageFormat::from_extension(ext).ok_or_else(|| {
                    Error::UnsupportedFormat(if ext.is_empty() {
                        path.display().to_string()
                    } else {
                        ext.to_string()
                    })
                })
            }
            OcrInput::Encoded(bytes) => {
                if bytes.is_empty() {
                    return Err(Error::InvalidImage("empty image buffer".to_string()));
                }
                let guessed = image::guess_format(bytes).map_err(|_| {
                    Error::UnsupportedFormat("unrecognized image data".to_string())
                })?;
                sniffed_format(guessed)
            }
            OcrInput::Image(img) => {
                if img.width() == 0 || img.height() == 0 {
                    return Err(Error::InvalidImage(format!(
                        "image has no pixels ({}x{})",
                        img.width(),
                        img.height()
                    )));
                }
                Ok(ImageFormat::Png)
            }
        }
    }

    /// Make the input readable by the engine, writing into `dir` if needed
    pub(crate) fn stage(&self, dir: &Path) -> Result<PathBuf> {
        let format = self.validate()?;
        match self {
            OcrInput::Path(path) => Ok(path.clone()),
            OcrInput::Encoded(bytes) => {
                let path = dir.join(format!("input.{}", format.extension()));
                fs::write(&path, bytes)?;
                tracing::debug!("Staged {} bytes at {}", bytes.len(), path.display());
                Ok(path)
            }
            OcrInput::Image(img) => {
                let path = dir.join("input.png");
                img.save_with_format(&path, image::ImageFormat::Png)
                    .map_err(|e| Error::InvalidImage(format!("failed to encode PNG: {e}")))?;
                tracing::debug!(
                    "Encoded {}x{} image at {}",
                    img.width(),
                    img.height(),
                    path.display()
                );
                Ok(path)
            }
        }
    }
}

fn sniffed_format(format: image::ImageFormat) -> Result<ImageFormat> {
    let format = match format {
        image::ImageFormat::Png => ImageFormat::Png,
        image::ImageFormat::Jpeg => ImageFormat::Jpeg,
        image::ImageFormat::Gif => ImageFormat::Gif,
        image::ImageFormat::WebP => ImageFormat::Webp,
        image::ImageFormat::Pnm => ImageFormat::Ppm,
        image::ImageFormat::Tiff => ImageFormat::Tiff,
        image::ImageFormat::Bmp => ImageFormat::Bmp,
        other => return Err(Error::UnsupportedFormat(format!("{other:?}"))),
    };
    Ok(format)
}

impl From<PathBuf> for OcrInput {
    fn from(path: PathBuf) -> Self {
        OcrInput::Path(path)
    }
}

impl From<&Path> for OcrInput {
    fn from(path: &Path) -> Self {
        OcrInput::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for OcrInput {
    fn from(bytes: Vec<u8>) -> Self {
        OcrInput::Encoded(bytes)
    }
}

impl From<DynamicImage> for OcrInput {
    fn from(img: DynamicImage) -> Self {
        OcrInput::Image(img)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn png_bytes() -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::new_luma8(4, 4)
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_empty_buffer_is_invalid() {
        let err = OcrInput::from_bytes(Vec::new()).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidImage(_)));
    }

    #[test]
    fn test_unknown_bytes_are_unsupported() {
        let err = OcrInput::from_bytes(b"not an image".to_vec()).validate().unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_zero_sized_image_is_invalid() {
        let err = OcrInput::Image(DynamicImage::new_luma8(0, 0))
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidImage(_)));
    }

    #[test]
    fn test_missing_file_is_invalid() {
        let err = OcrInput::from_path("/no/such/scan.png").validate().unwrap_err();
        assert!(matches!(err, Error::InvalidImage(_)));
    }

    #[test]
    fn test_file_extension_is_checked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.svg");
        fs::write(&path, b"<svg/>").unwrap();

        let err = OcrInput::from_path(&path).validate().unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ref ext) if ext == "svg"));
    }

    #[test]
    fn test_encoded_buffer_is_passed_through() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = png_bytes();

        let staged = OcrInput::from_bytes(bytes.clone()).stage(dir.path()).unwrap();

        assert_eq!(staged, dir.path().join("input.png"));
        assert_eq!(fs::read(&staged).unwrap(), bytes);
    }

    #[test]
    fn test_path_is_not_copied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.PNG");
        fs::write(&path, png_bytes()).unwrap();
        let scratch = tempfile::tempdir().unwrap();

        let staged = OcrInput::from(path.clone()).stage(scratch.path()).unwrap();

        assert_eq!(staged, path);
        assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_image_is_encoded_as_png() {
        let dir = tempfile::tempdir().unwrap();
        let staged = OcrInput::from(DynamicImage::new_rgb8(3, 2))
            .stage(dir.path())
            .unwrap();

        let decoded = image::open(&staged).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }
}
