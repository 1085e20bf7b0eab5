use crate::WidgetError;
use std::path::{Component, Path, PathBuf};

/// Fetches the bytes behind an existing-image URL.
#[allow(async_fn_in_trait)]
pub trait ImageLoader {
    async fn load(&self, url: &str) -> Result<Vec<u8>, WidgetError>;
}

/// Serves media URLs from a directory on disk.
///
/// `/media/photos/a.jpg` maps to `<media_root>/photos/a.jpg` for the
/// default prefix; `file://` URLs are read as absolute paths.
#[derive(Clone, Debug)]
pub struct FsImageLoader {
    media_root: PathBuf,
    media_url: String,
}

impl FsImageLoader {
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
            media_url: "/media/".to_string(),
        }
    }

    /// Set the URL prefix served from the media root.
    pub fn with_media_url(mut self, media_url: impl Into<String>) -> Self {
        let mut media_url = media_url.into();
        if !media_url.ends_with('/') {
            media_url.push('/');
        }
        self.media_url = media_url;
        self
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    /// Map `url` to a file path without touching the file system.
    pub fn resolve(&self, url: &str) -> Result<PathBuf, WidgetError> {
        // query strings and fragments never name a file
        let url = url.split(['?', '#']).next().unwrap_or_default();

        if let Some(path) = url.strip_prefix("file://") {
            return Ok(PathBuf::from(path));
        }

        let relative = url
            .strip_prefix(self.media_url.as_str())
            .ok_or_else(|| WidgetError::Load(format!("{url} is outside {}", self.media_url)))?;
        let relative = Path::new(relative);
        if relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_)))
        {
            return Err(WidgetError::Load(format!("{url} escapes the media root")));
        }
        Ok(self.media_root.join(relative))
    }
}

impl ImageLoader for FsImageLoader {
    async fn load(&self, url: &str) -> Result<Vec<u8>, WidgetError> {
        let path = self.resolve(url)?;
        log::debug!("loading {} from {}", url, path.display());
        Ok(tokio::fs::read(&path).await?)
    }
}
