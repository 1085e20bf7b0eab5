//! Handles for the parts of a capture container.

use crate::WidgetError;
use capture_camera::{CameraError, DeviceId, DeviceInfo, Frame, MediaStream};
use tokio::sync::broadcast;

// pending change events kept per subscriber before it lags
const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// A file bound to a file input.
#[derive(Clone, PartialEq, Eq)]
pub struct BoundFile {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for BoundFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.data.len())
            .finish()
    }
}

impl BoundFile {
    pub fn jpeg(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: "image/jpeg".to_string(),
            data,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Emitted when the files of an input change. Bubbles to form observers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeEvent {
    pub field: String,
}

/// The hidden file input a capture is bound to.
#[derive(Debug)]
pub struct FileInput {
    name: String,
    accept: String,
    data_url: Option<String>,
    files: Vec<BoundFile>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl FileInput {
    pub fn new(name: impl Into<String>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            name: name.into(),
            accept: "image/*".to_string(),
            data_url: None,
            files: Vec::new(),
            changes,
        }
    }

    /// Comma-separated content types, `type/*` wildcards allowed.
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    /// URL of the image stored for this field before.
    pub fn with_data_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.data_url = (!url.is_empty()).then_some(url);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accept(&self) -> &str {
        &self.accept
    }

    pub fn data_url(&self) -> Option<&str> {
        self.data_url.as_deref()
    }

    /// A field that already has an image may be submitted without a new one.
    pub fn required(&self) -> bool {
        self.data_url.is_none()
    }

    pub fn accepts(&self, content_type: &str) -> bool {
        self.accept.split(',').map(str::trim).any(|pattern| {
            match pattern.strip_suffix("/*") {
                Some("*") => true,
                Some(major) => content_type
                    .split_once('/')
                    .is_some_and(|(kind, _)| kind.eq_ignore_ascii_case(major)),
                None => pattern.eq_ignore_ascii_case(content_type),
            }
        })
    }

    /// The bound file, if any.
    pub fn file(&self) -> Option<&BoundFile> {
        self.files.first()
    }

    pub fn files(&self) -> &[BoundFile] {
        &self.files
    }

    /// Replace the file list with `file` and notify subscribers.
    pub fn bind(&mut self, file: BoundFile) -> Result<(), WidgetError> {
        if !self.accepts(&file.content_type) {
            return Err(WidgetError::Rejected(format!(
                "{} does not match accept=\"{}\"",
                file.content_type, self.accept
            )));
        }
        log::info!("{}: bound {} ({} bytes)", self.name, file.name, file.size());
        self.files = vec![file];
        // no subscribers is fine
        let _ = self.changes.send(ChangeEvent {
            field: self.name.clone(),
        });
        Ok(())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceOption {
    pub value: DeviceId,
    pub text: String,
}

/// The camera selection control.
#[derive(Clone, Debug, Default)]
pub struct DeviceSelect {
    options: Vec<DeviceOption>,
    value: Option<DeviceId>,
}

impl DeviceSelect {
    /// Append one option per device. Unlabeled devices are shown as
    /// `Camera N`, N being the option's position.
    pub fn populate(&mut self, devices: &[DeviceInfo]) {
        for device in devices {
            let text = if device.label.is_empty() {
                format!("Camera {}", self.options.len() + 1)
            } else {
                device.label.clone()
            };
            self.options.push(DeviceOption {
                value: device.id.clone(),
                text,
            });
        }
    }

    pub fn options(&self) -> &[DeviceOption] {
        &self.options
    }

    pub fn value(&self) -> Option<&DeviceId> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: Option<DeviceId>) {
        self.value = value;
    }

    /// The option after the current one, wrapping around.
    pub fn next_value(&self) -> Option<&DeviceId> {
        let position = self
            .value
            .as_ref()
            .and_then(|value| self.options.iter().position(|option| &option.value == value));
        let next = position.map_or(0, |index| (index + 1) % self.options.len().max(1));
        self.options.get(next).map(|option| &option.value)
    }
}

/// The live video element. Holds at most one stream.
pub struct VideoElement<S: MediaStream> {
    stream: Option<(DeviceId, S)>,
}

impl<S: MediaStream> Default for VideoElement<S> {
    fn default() -> Self {
        Self { stream: None }
    }
}

impl<S: MediaStream> std::fmt::Debug for VideoElement<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoElement")
            .field("device", &self.device())
            .finish()
    }
}

impl<S: MediaStream> VideoElement<S> {
    /// Show `stream`, stopping whatever was shown before.
    pub fn attach(&mut self, device: DeviceId, stream: S) {
        self.release();
        self.stream = Some((device, stream));
    }

    /// Stop all tracks of the current stream. Returns whether one was held.
    pub fn release(&mut self) -> bool {
        match self.stream.take() {
            Some((device, mut stream)) => {
                stream.stop();
                log::debug!("stopped stream on {}", device);
                true
            }
            None => false,
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.as_ref().is_some_and(|(_, stream)| stream.is_active())
    }

    pub fn device(&self) -> Option<&DeviceId> {
        self.stream.as_ref().map(|(device, _)| device)
    }

    /// Pull the frame currently on screen, dropping older queued ones.
    pub async fn current_frame(&mut self) -> Result<Frame, CameraError> {
        match self.stream.as_mut() {
            Some((_, stream)) => stream.latest().await,
            None => Err(CameraError::Stream("no active stream".to_string())),
        }
    }
}

impl<S: MediaStream> Drop for VideoElement<S> {
    fn drop(&mut self) {
        self.release();
    }
}
