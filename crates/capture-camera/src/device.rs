use std::fmt;

/// Backend-specific device identifier (a device node path for V4L2).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceKind {
    VideoInput,
    AudioInput,
    AudioOutput,
}

/// One entry of a media-device enumeration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceInfo {
    pub id: DeviceId,
    pub kind: DeviceKind,
    /// Human readable name; may be empty when the backend withholds it.
    pub label: String,
}

impl DeviceInfo {
    pub fn video(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: DeviceId::new(id),
            kind: DeviceKind::VideoInput,
            label: label.into(),
        }
    }
}

/// Keep only the cameras, in enumeration order.
pub fn video_inputs(devices: Vec<DeviceInfo>) -> Vec<DeviceInfo> {
    devices
        .into_iter()
        .filter(|device| device.kind == DeviceKind::VideoInput)
        .collect()
}
