use std::fmt;

/// User-visible notifications raised by the widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alert {
    NoWebcam,
    DetectionFailed,
    WebcamUnavailable,
    CaptureTooLarge,
    CaptureFailed,
    ExistingImageFailed,
}

impl Alert {
    pub fn message(&self) -> &'static str {
        match self {
            Alert::NoWebcam => {
                "No webcam detected. Please connect a webcam or upload an image manually."
            }
            Alert::DetectionFailed => "Error detecting cameras. Please check your device settings.",
            Alert::WebcamUnavailable => {
                "Unable to access webcam. Please ensure it is connected and permissions are granted."
            }
            Alert::CaptureTooLarge => "Captured image is too large. Please try again.",
            Alert::CaptureFailed => "Unable to capture a photo. Please try again.",
            Alert::ExistingImageFailed => "Failed to load existing image.",
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Blocking user notification.
///
/// `alert` returns once the user has seen the message.
pub trait Notifier {
    fn alert(&self, alert: &Alert);
}

/// Notifier for headless use: alerts only go to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, alert: &Alert) {
        log::warn!("alert: {}", alert);
    }
}
