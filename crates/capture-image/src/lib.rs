//! Image handling for the capture widget.
//!
//! Wraps the `image` crate to decode stored pictures and to encode canvas
//! contents as JPEG. All bitmaps are RGB8 in HWC layout:
//! `[height, width, 3]`.

pub mod canvas;
pub mod convert;
pub mod error;
pub mod image;

pub use canvas::Canvas;
pub use convert::yuyv_to_rgb;
pub use error::ImageError;
pub use image::Image;

use crates_image::ImageEncoder;

/// Decodes any supported format into an RGB8 `Image`, on the calling thread.
///
/// Alpha is dropped and 16-bit or float sources are narrowed to 8 bits, the
/// same way a 2D canvas flattens whatever it draws.
pub fn decode_image_blocking(data: &[u8]) -> Result<Image, ImageError> {
    let rgb = crates_image::load_from_memory(data)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    Image::from_rgb(width as usize, height as usize, rgb.into_raw())
}

/// Encodes an `Image` as baseline JPEG, on the calling thread.
///
/// `quality` is clamped to 1..=100.
pub fn encode_jpeg_blocking(image: &Image, quality: u8) -> Result<Vec<u8>, ImageError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ImageError::Encode("cannot encode an empty image".to_string()));
    }

    let mut buffer = Vec::new();
    let encoder =
        crates_image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    encoder
        .write_image(
            image.data(),
            image.width() as u32,
            image.height() as u32,
            crates_image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| ImageError::Encode(e.to_string()))?;

    Ok(buffer)
}

/// Decodes an image from raw bytes.
///
/// The format is auto-detected. The CPU-bound work runs on tokio's
/// blocking thread pool.
///
/// # Errors
///
/// Returns `ImageError::Decode` if the data is invalid or the format is unsupported.
pub async fn decode_image(data: &[u8]) -> Result<Image, ImageError> {
    let owned = data.to_vec();
    tokio::task::spawn_blocking(move || decode_image_blocking(&owned))
        .await
        .map_err(|e| ImageError::Decode(e.to_string()))?
}

/// Encodes an `Image` as JPEG bytes on tokio's blocking thread pool.
///
/// # Errors
///
/// Returns `ImageError::Encode` if the image is empty or encoding fails.
pub async fn encode_jpeg(image: Image, quality: u8) -> Result<Vec<u8>, ImageError> {
    tokio::task::spawn_blocking(move || encode_jpeg_blocking(&image, quality))
        .await
        .map_err(|e| ImageError::Encode(e.to_string()))?
}
