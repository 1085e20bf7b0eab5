use crate::{Image, ImageError, encode_jpeg};

/// Off-screen 2D drawing surface holding at most one bitmap.
///
/// Drawing resizes the canvas to the drawn image, so the canvas always has
/// the native resolution of whatever was painted last.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    bitmap: Option<Image>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(&self) -> usize {
        self.bitmap.as_ref().map_or(0, Image::width)
    }

    pub fn height(&self) -> usize {
        self.bitmap.as_ref().map_or(0, Image::height)
    }

    pub fn is_blank(&self) -> bool {
        self.bitmap.is_none()
    }

    /// Resize to `image` and paint it at the origin.
    pub fn draw(&mut self, image: &Image) {
        self.bitmap = Some(image.clone());
    }

    pub fn clear(&mut self) {
        self.bitmap = None;
    }

    pub fn image(&self) -> Option<&Image> {
        self.bitmap.as_ref()
    }

    /// Encode the current contents as JPEG.
    ///
    /// # Errors
    ///
    /// Returns `ImageError::Encode` for a blank canvas.
    pub async fn to_jpeg(&self, quality: u8) -> Result<Vec<u8>, ImageError> {
        match &self.bitmap {
            Some(image) => encode_jpeg(image.clone(), quality).await,
            None => Err(ImageError::Encode("canvas is blank".to_string())),
        }
    }
}
