//! Avatar cropping before upload.
//!
//! The settings form posts the original image plus an optional crop square
//! in source pixels. The square is clamped to the image (a centred square
//! when none is given), resized to [`AVATAR_SIZE`] and re-encoded as PNG.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, imageops::FilterType};
use thiserror::Error;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Edge length of the stored avatar, in pixels.
pub const AVATAR_SIZE: u32 = 256;

#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("no image was uploaded")]
    Empty,
    #[error("image is larger than {max} bytes")]
    TooLarge { max: usize },
    #[error("could not read image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("could not encode avatar: {0}")]
    Encode(#[source] image::ImageError),
    #[error("image processing task failed")]
    Task,
}

/// A square region of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropSquare {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl CropSquare {
    /// Fit `requested` inside a `width` x `height` image.
    ///
    /// A missing or zero-sized request yields the largest centred square.
    #[must_use]
    pub fn fit(width: u32, height: u32, requested: Option<Self>) -> Self {
        let side = width.min(height);
        match requested.filter(|c| c.size > 0) {
            Some(c) => {
                let size = c.size.min(side);
                Self {
                    x: c.x.min(width - size),
                    y: c.y.min(height - size),
                    size,
                }
            }
            None => Self {
                x: (width - side) / 2,
                y: (height - side) / 2,
                size: side,
            },
        }
    }
}

/// Crop, resize and encode synchronously.
///
/// # Errors
///
/// Returns an [`AvatarError`] if the input is empty, too large, or not a
/// decodable image.
pub fn crop_to_png(bytes: &[u8], crop: Option<CropSquare>) -> Result<Vec<u8>, AvatarError> {
    if bytes.is_empty() {
        return Err(AvatarError::Empty);
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AvatarError::TooLarge {
            max: MAX_UPLOAD_BYTES,
        });
    }

    let source = image::load_from_memory(bytes).map_err(AvatarError::Decode)?;
    if source.width() == 0 || source.height() == 0 {
        return Err(AvatarError::Empty);
    }

    let square = CropSquare::fit(source.width(), source.height(), crop);
    let avatar: DynamicImage = source
        .crop_imm(square.x, square.y, square.size, square.size)
        .resize_exact(AVATAR_SIZE, AVATAR_SIZE, FilterType::Lanczos3);

    let mut png = Vec::new();
    avatar
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(AvatarError::Encode)?;
    Ok(png)
}

/// [`crop_to_png`] on the blocking pool.
///
/// # Errors
///
/// Same as [`crop_to_png`], plus [`AvatarError::Task`] if the worker panicked.
pub async fn process(bytes: Vec<u8>, crop: Option<CropSquare>) -> Result<Vec<u8>, AvatarError> {
    tokio::task::spawn_blocking(move || crop_to_png(&bytes, crop))
        .await
        .map_err(|_| AvatarError::Task)?
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 255]));
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn test_fit_centres_by_default() {
        assert_eq!(
            CropSquare::fit(400, 300, None),
            CropSquare { x: 50, y: 0, size: 300 }
        );
    }

    #[test]
    fn test_fit_clamps_to_image() {
        let requested = CropSquare { x: 390, y: 290, size: 500 };
        assert_eq!(
            CropSquare::fit(400, 300, Some(requested)),
            CropSquare { x: 100, y: 0, size: 300 }
        );

        let inside = CropSquare { x: 10, y: 20, size: 100 };
        assert_eq!(CropSquare::fit(400, 300, Some(inside)), inside);
    }

    #[test]
    fn test_zero_size_crop_is_ignored() {
        let zero = CropSquare { x: 5, y: 5, size: 0 };
        assert_eq!(CropSquare::fit(10, 10, Some(zero)), CropSquare { x: 0, y: 0, size: 10 });
    }

    #[test]
    fn test_crop_to_png_outputs_square_png() {
        let out = crop_to_png(&png(64, 40), None).unwrap();
        let decoded = image::load_from_memory_with_format(&out, ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (AVATAR_SIZE, AVATAR_SIZE));
    }

    #[test]
    fn test_rejects_garbage_and_empty() {
        assert!(matches!(crop_to_png(b"not an image", None), Err(AvatarError::Decode(_))));
        assert!(matches!(crop_to_png(&[], None), Err(AvatarError::Empty)));
    }

    #[test]
    fn test_rejects_oversized_upload() {
        let big = vec![0u8; MAX_UPLOAD_BYTES + 1];
        assert!(matches!(crop_to_png(&big, None), Err(AvatarError::TooLarge { .. })));
    }
}
