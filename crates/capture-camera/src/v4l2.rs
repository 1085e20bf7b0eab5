use crate::{CameraConfig, CameraError, DeviceId, DeviceInfo, DeviceKind, Frame, MediaDevices, MediaStream};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;
use v4l::buffer::Type;
use v4l::capability::Flags;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

type FrameResult = Result<Frame, CameraError>;

#[derive(Clone, Copy, Debug, PartialEq)]
enum PixelFormat {
    Mjpeg,
    Yuyv,
}

/// V4L2 device enumeration and stream acquisition.
///
/// Device ids are device node paths such as `/dev/video0`.
#[derive(Clone, Debug, Default)]
pub struct V4l2Devices {
    config: CameraConfig,
}

impl V4l2Devices {
    pub fn new(config: CameraConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }
}

impl MediaDevices for V4l2Devices {
    type Stream = V4l2Stream;

    async fn enumerate(&self) -> Result<Vec<DeviceInfo>, CameraError> {
        tokio::task::spawn_blocking(enumerate_blocking)
            .await
            .map_err(|e| CameraError::Channel(e.to_string()))?
    }

    async fn open(&mut self, device: &DeviceId) -> Result<V4l2Stream, CameraError> {
        let path = PathBuf::from(device.as_str());
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || V4l2Stream::open(path, config))
            .await
            .map_err(|e| CameraError::Channel(e.to_string()))?
    }
}

/// Walk the video nodes and keep those that can capture video.
///
/// Metadata nodes and nodes we are not allowed to open are skipped rather
/// than failing the whole enumeration.
fn enumerate_blocking() -> Result<Vec<DeviceInfo>, CameraError> {
    let mut nodes = v4l::context::enum_devices();
    nodes.sort_by_key(|node| node.index());

    let mut devices = Vec::new();
    for node in nodes {
        let path = node.path().to_path_buf();
        let device = match Device::with_path(&path) {
            Ok(device) => device,
            Err(e) => {
                log::debug!("skipping {}: {}", path.display(), e);
                continue;
            }
        };
        let caps = match device.query_caps() {
            Ok(caps) => caps,
            Err(e) => {
                log::debug!("skipping {}: cannot query caps: {}", path.display(), e);
                continue;
            }
        };
        if !caps.capabilities.contains(Flags::VIDEO_CAPTURE) {
            continue;
        }
        devices.push(DeviceInfo {
            id: DeviceId::new(path.to_string_lossy()),
            kind: DeviceKind::VideoInput,
            label: caps.card.trim().to_string(),
        });
    }

    log::debug!("found {} V4L2 capture devices", devices.len());
    Ok(devices)
}

/// A running V4L2 capture.
///
/// Frames are read on a dedicated thread and handed over through a bounded
/// channel. `stop` (or drop) closes the channel and joins the thread, which
/// releases the device.
pub struct V4l2Stream {
    path: PathBuf,
    receiver: Option<mpsc::Receiver<FrameResult>>,
    cancel: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for V4l2Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4l2Stream")
            .field("path", &self.path)
            .field("receiver", &self.receiver.is_some())
            .field("thread_handle", &self.thread_handle.is_some())
            .finish()
    }
}

impl V4l2Stream {
    /// Open `path`, negotiate MJPEG (or YUYV) at the configured size and
    /// start the capture thread.
    ///
    /// # Errors
    ///
    /// `CameraError::PermissionDenied`/`NotFound` when the node cannot be
    /// opened, `CameraError::Device` when no usable pixel format is offered.
    pub fn open(path: PathBuf, config: CameraConfig) -> Result<Self, CameraError> {
        let device = Device::with_path(&path)?;

        let requested = Format::new(config.width(), config.height(), FourCC::new(b"MJPG"));
        let actual = Capture::set_format(&device, &requested)?;
        let pixel_format = match &actual.fourcc.repr {
            b"MJPG" => PixelFormat::Mjpeg,
            b"YUYV" => PixelFormat::Yuyv,
            _ => {
                return Err(CameraError::Device(format!(
                    "unsupported pixel format {} on {}",
                    actual.fourcc,
                    path.display()
                )));
            }
        };

        let params = v4l::video::capture::Parameters::with_fps(config.fps());
        Capture::set_params(&device, &params)?;

        log::info!(
            "opened {} at {}x{} {:?}",
            path.display(),
            actual.width,
            actual.height,
            pixel_format
        );

        let buffer_count = config.buffer_count();
        let (tx, rx) = mpsc::channel(buffer_count as usize);
        let cancel = Arc::new(AtomicBool::new(false));
        let size = (actual.width as usize, actual.height as usize);

        let handle = thread::spawn({
            let cancel = Arc::clone(&cancel);
            let path = path.clone();
            move || {
                if let Err(e) = Self::capture_loop(device, &tx, &cancel, buffer_count, pixel_format, size) {
                    log::error!("capture thread for {} stopped: {}", path.display(), e);
                    let _ = tx.blocking_send(Err(e));
                }
            }
        });

        Ok(Self {
            path,
            receiver: Some(rx),
            cancel,
            thread_handle: Some(handle),
        })
    }

    fn capture_loop(
        device: Device,
        tx: &mpsc::Sender<FrameResult>,
        cancel: &AtomicBool,
        buffer_count: u32,
        pixel_format: PixelFormat,
        (width, height): (usize, usize),
    ) -> Result<(), CameraError> {
        let mut stream = MmapStream::with_buffers(&device, Type::VideoCapture, buffer_count)
            .map_err(|e| CameraError::Stream(e.to_string()))?;

        while !cancel.load(Ordering::Relaxed) {
            let (data, _metadata) =
                CaptureStream::next(&mut stream).map_err(|e| CameraError::Stream(e.to_string()))?;

            let frame = match pixel_format {
                PixelFormat::Mjpeg => capture_image::decode_image_blocking(data)?,
                PixelFormat::Yuyv => {
                    let rgb = capture_image::yuyv_to_rgb(data, width, height)
                        .ok_or_else(|| CameraError::Stream("short YUYV frame".to_string()))?;
                    Frame::from_rgb(width, height, rgb)?
                }
            };

            if tx.blocking_send(Ok(frame)).is_err() {
                // receiver dropped
                break;
            }
        }

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Pop everything already queued and keep the newest entry. A queued
/// error ends the scan so it is not skipped.
fn newest_queued(receiver: &mut mpsc::Receiver<FrameResult>) -> Option<FrameResult> {
    let mut newest = None;
    while let Ok(result) = receiver.try_recv() {
        let failed = result.is_err();
        newest = Some(result);
        if failed {
            break;
        }
    }
    newest
}

async fn next_queued(receiver: &mut mpsc::Receiver<FrameResult>) -> FrameResult {
    receiver
        .recv()
        .await
        .ok_or_else(|| CameraError::Channel("capture thread ended".to_string()))?
}

impl V4l2Stream {
    fn receiver(&mut self) -> Result<&mut mpsc::Receiver<FrameResult>, CameraError> {
        self.receiver
            .as_mut()
            .ok_or_else(|| CameraError::Stream("stream stopped".to_string()))
    }
}

impl MediaStream for V4l2Stream {
    async fn recv(&mut self) -> Result<Frame, CameraError> {
        next_queued(self.receiver()?).await
    }

    async fn latest(&mut self) -> Result<Frame, CameraError> {
        let receiver = self.receiver()?;
        match newest_queued(receiver) {
            Some(result) => result,
            None => next_queued(receiver).await,
        }
    }

    /// Blocks the calling thread until the capture thread has returned
    /// from its current `next` call, at most about one frame interval.
    /// The device node can be reopened as soon as this returns.
    fn stop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        // closing the channel unblocks a thread waiting in blocking_send
        drop(self.receiver.take());
        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                log::error!("capture thread for {} panicked", self.path.display());
            }
            log::debug!("released {}", self.path.display());
        }
    }

    fn is_active(&self) -> bool {
        self.receiver.is_some()
    }
}

impl Drop for V4l2Stream {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(shade: u8) -> FrameResult {
        Ok(Frame::from_rgb(1, 1, vec![shade; 3])?)
    }

    #[test]
    fn test_newest_queued_skips_stale_frames() {
        let (tx, mut rx) = mpsc::channel(4);
        for shade in [1, 2, 3] {
            tx.try_send(frame(shade)).unwrap();
        }

        let newest = newest_queued(&mut rx).unwrap().unwrap();
        assert_eq!(newest.data(), &[3, 3, 3]);
        assert!(newest_queued(&mut rx).is_none());
    }

    #[test]
    fn test_newest_queued_stops_at_error() {
        let (tx, mut rx) = mpsc::channel(4);
        tx.try_send(frame(1)).unwrap();
        tx.try_send(Err(CameraError::Stream("unplugged".to_string()))).unwrap();
        tx.try_send(frame(2)).unwrap();

        assert!(newest_queued(&mut rx).unwrap().is_err());
        let rest = newest_queued(&mut rx).unwrap().unwrap();
        assert_eq!(rest.data(), &[2, 2, 2]);
    }

    #[tokio::test]
    async fn test_next_queued_reports_closed_channel() {
        let (tx, mut rx) = mpsc::channel::<FrameResult>(1);
        drop(tx);
        assert!(matches!(next_queued(&mut rx).await, Err(CameraError::Channel(_))));
    }
}
