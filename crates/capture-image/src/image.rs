use crate::ImageError;
use capture_base::Tensor;

/// An RGB8 bitmap in HWC layout `[height, width, 3]`.
///
/// Camera frames, decoded existing images and the canvas contents all use
/// this one representation.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pixels: Tensor<u8>,
}

impl Image {
    /// Wrap packed `[R, G, B, ...]` bytes.
    pub fn from_rgb(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        Ok(Self {
            pixels: Tensor::hwc(height, width, 3, data)?,
        })
    }

    /// Wrap an existing tensor, which must be `[h, w, 3]`.
    pub fn from_tensor(pixels: Tensor<u8>) -> Result<Self, ImageError> {
        pixels.ensure_hwc()?;
        if pixels.channels() != 3 {
            return Err(ImageError::Decode(format!(
                "expected 3 channels, got {}",
                pixels.channels()
            )));
        }
        Ok(Self { pixels })
    }

    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    pub fn data(&self) -> &[u8] {
        &self.pixels.data
    }

    pub fn tensor(&self) -> &Tensor<u8> {
        &self.pixels
    }
}
