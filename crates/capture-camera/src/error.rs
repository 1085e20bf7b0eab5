use std::fmt;
use std::io;

#[derive(Debug)]
pub enum CameraError {
    /// The OS or the user refused access to the device.
    PermissionDenied(String),
    /// The requested device does not exist (anymore).
    NotFound(String),
    Device(String),
    Stream(String),
    Decode(capture_image::ImageError),
    Channel(String),
}

impl CameraError {
    /// True for errors the user can fix by granting access or plugging a
    /// camera in, as opposed to a broken stream.
    pub fn is_access_error(&self) -> bool {
        matches!(self, CameraError::PermissionDenied(_) | CameraError::NotFound(_))
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::PermissionDenied(msg) => write!(f, "permission denied: {msg}"),
            CameraError::NotFound(msg) => write!(f, "device not found: {msg}"),
            CameraError::Device(msg) => write!(f, "device error: {msg}"),
            CameraError::Stream(msg) => write!(f, "stream error: {msg}"),
            CameraError::Decode(err) => write!(f, "decode error: {err}"),
            CameraError::Channel(msg) => write!(f, "channel error: {msg}"),
        }
    }
}

impl std::error::Error for CameraError {}

impl From<io::Error> for CameraError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => CameraError::PermissionDenied(err.to_string()),
            io::ErrorKind::NotFound => CameraError::NotFound(err.to_string()),
            _ => CameraError::Device(err.to_string()),
        }
    }
}

impl From<capture_image::ImageError> for CameraError {
    fn from(err: capture_image::ImageError) -> Self {
        CameraError::Decode(err)
    }
}
