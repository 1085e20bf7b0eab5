use crate::state::Phase;
use capture_camera::{CameraError, DeviceId};
use capture_image::ImageError;
use std::fmt;

#[derive(Debug)]
pub enum WidgetError {
    /// The operation is not available in the current phase.
    InvalidTransition { phase: Phase, event: &'static str },
    UnknownDevice(DeviceId),
    /// The file input refused a file (content type outside `accept`).
    Rejected(String),
    Load(String),
    Camera(CameraError),
    Image(ImageError),
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetError::InvalidTransition { phase, event } => {
                write!(f, "{event} is not allowed while {phase}")
            }
            WidgetError::UnknownDevice(id) => write!(f, "unknown device: {id}"),
            WidgetError::Rejected(msg) => write!(f, "file rejected: {msg}"),
            WidgetError::Load(msg) => write!(f, "load error: {msg}"),
            WidgetError::Camera(err) => write!(f, "camera error: {err}"),
            WidgetError::Image(err) => write!(f, "image error: {err}"),
        }
    }
}

impl std::error::Error for WidgetError {}

impl From<CameraError> for WidgetError {
    fn from(err: CameraError) -> Self {
        WidgetError::Camera(err)
    }
}

impl From<ImageError> for WidgetError {
    fn from(err: ImageError) -> Self {
        WidgetError::Image(err)
    }
}

impl From<std::io::Error> for WidgetError {
    fn from(err: std::io::Error) -> Self {
        WidgetError::Load(err.to_string())
    }
}
