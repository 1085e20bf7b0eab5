use crate::{CameraError, DeviceId, DeviceInfo};

/// A decoded camera frame, RGB8 at the stream's native resolution.
pub type Frame = capture_image::Image;

/// Access to the machine's media devices.
#[allow(async_fn_in_trait)]
pub trait MediaDevices {
    type Stream: MediaStream;

    /// List every media device the backend can see, cameras or not.
    async fn enumerate(&self) -> Result<Vec<DeviceInfo>, CameraError>;

    /// Acquire a live stream on `device`.
    ///
    /// Returns `CameraError::PermissionDenied` or `CameraError::NotFound`
    /// when the device cannot be used.
    async fn open(&mut self, device: &DeviceId) -> Result<Self::Stream, CameraError>;
}

/// A live video stream owned by exactly one consumer.
#[allow(async_fn_in_trait)]
pub trait MediaStream {
    /// Receive the next frame.
    async fn recv(&mut self) -> Result<Frame, CameraError>;

    /// The most recent frame, skipping any that queued up unread.
    ///
    /// Streams that do not buffer can rely on the default, which is `recv`.
    async fn latest(&mut self) -> Result<Frame, CameraError> {
        self.recv().await
    }

    /// Stop all tracks and release the device. Idempotent.
    ///
    /// Returns once the device is free to be opened again, so it may block
    /// briefly (for V4L2, until the capture thread finishes its current
    /// frame).
    fn stop(&mut self);

    /// False once `stop` has run or the stream has ended.
    fn is_active(&self) -> bool;
}
