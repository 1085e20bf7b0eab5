//! Media-device access for the capture widget.
//!
//! `MediaDevices` enumerates cameras and opens streams on them;
//! `MediaStream` yields RGB frames until stopped. Backends live behind
//! cargo features.

pub mod config;
pub mod device;
pub mod error;
pub mod traits;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use config::CameraConfig;
pub use device::{DeviceId, DeviceInfo, DeviceKind, video_inputs};
pub use error::CameraError;
pub use traits::{Frame, MediaDevices, MediaStream};

#[cfg(feature = "v4l2")]
pub use v4l2::{V4l2Devices, V4l2Stream};
