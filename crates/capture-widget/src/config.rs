/// Largest encoded capture accepted into the file input: 5 MiB.
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Capture settings shared by every transition of a widget.
#[derive(Clone, Debug)]
pub struct WidgetConfig {
    max_file_size: usize,
    jpeg_quality: u8,
    file_prefix: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            jpeg_quality: 90,
            file_prefix: "webcam-photo".to_string(),
        }
    }
}

impl WidgetConfig {
    /// Set the largest accepted JPEG size in bytes.
    pub fn with_max_file_size(mut self, max_file_size: usize) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Set the JPEG quality, 1-100.
    pub fn with_jpeg_quality(mut self, jpeg_quality: u8) -> Self {
        self.jpeg_quality = jpeg_quality.clamp(1, 100);
        self
    }

    /// Set the file name prefix; names are `<prefix>-<millis>.jpg`.
    pub fn with_file_prefix(mut self, file_prefix: impl Into<String>) -> Self {
        self.file_prefix = file_prefix.into();
        self
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    pub fn file_prefix(&self) -> &str {
        &self.file_prefix
    }

    pub fn file_name(&self, timestamp_ms: u128) -> String {
        format!("{}-{}.jpg", self.file_prefix, timestamp_ms)
    }
}
