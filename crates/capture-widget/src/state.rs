//! The capture widget as a finite-state machine.
//!
//! [`transition`] maps the current [`WidgetState`] and an [`Event`] to the
//! next state plus the [`Effect`]s the driver must perform, in order.
//! It never touches devices, files or the clock; everything it needs
//! arrives in the event.

use crate::{Alert, WidgetConfig, WidgetError};
use capture_camera::{DeviceId, DeviceInfo, video_inputs};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, devices not enumerated yet.
    Initializing,
    /// No camera available; capture is disabled.
    NoDevice,
    /// Video shown. `live` is false while a stream is being requested or
    /// after the request failed.
    Previewing { live: bool },
    /// Frame drawn to the canvas and stream released; waiting for the
    /// encoded size and the bind.
    Encoding,
    /// A capture is bound to the file input.
    Captured,
    /// Fetching the image that was uploaded before.
    LoadingExisting,
    /// The previously uploaded image is on the canvas.
    ExistingImage,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Initializing => f.write_str("initializing"),
            Phase::NoDevice => f.write_str("without a device"),
            Phase::Previewing { live: true } => f.write_str("previewing"),
            Phase::Previewing { live: false } => f.write_str("waiting for a stream"),
            Phase::Encoding => f.write_str("encoding"),
            Phase::Captured => f.write_str("captured"),
            Phase::LoadingExisting => f.write_str("loading the existing image"),
            Phase::ExistingImage => f.write_str("showing the existing image"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Initialize,
    /// Raw enumeration result; non-camera devices are filtered here.
    DevicesEnumerated(Vec<DeviceInfo>),
    EnumerationFailed(String),
    StreamStarted(DeviceId),
    StreamFailed { device: DeviceId, reason: String },
    SelectDevice(DeviceId),
    Capture,
    CaptureEncoded { bytes: usize, timestamp_ms: u128 },
    /// The encoded capture is on the file input.
    CaptureBound,
    CaptureFailed(String),
    Retake,
    ExistingLoaded,
    ExistingFailed(String),
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Initialize => "initialize",
            Event::DevicesEnumerated(_) => "devices enumerated",
            Event::EnumerationFailed(_) => "enumeration failed",
            Event::StreamStarted(_) => "stream started",
            Event::StreamFailed { .. } => "stream failed",
            Event::SelectDevice(_) => "select device",
            Event::Capture => "capture",
            Event::CaptureEncoded { .. } => "capture encoded",
            Event::CaptureBound => "capture bound",
            Event::CaptureFailed(_) => "capture failed",
            Event::Retake => "retake",
            Event::ExistingLoaded => "existing image loaded",
            Event::ExistingFailed(_) => "existing image failed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    EnumerateDevices,
    /// Fill the device selector from `WidgetState::devices`.
    PopulateDevices,
    /// Stop every track of the current stream, if any.
    StopStream,
    StartStream(DeviceId),
    /// Paint the current video frame onto the canvas at native size.
    DrawFrame,
    EncodeCanvas { quality: u8 },
    /// Throw away the encoded capture without binding it.
    DiscardCapture,
    /// Bind the encoded capture to the file input and emit a change event.
    BindCapture { file_name: String },
    LoadExisting(String),
    Alert(Alert),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
    Video,
    Canvas,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Hidden,
    Disabled,
    Enabled,
}

/// What the container shows. Only one surface exists at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct View {
    pub surface: Surface,
    pub capture: Control,
    pub retake: Control,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WidgetState {
    pub phase: Phase,
    /// Cameras offered in the selector, in enumeration order.
    pub devices: Vec<DeviceInfo>,
    pub selected: Option<DeviceId>,
    /// URL of the image uploaded before, from the file input.
    pub existing_url: Option<String>,
}

impl WidgetState {
    pub fn new(existing_url: Option<String>) -> Self {
        Self {
            phase: Phase::Initializing,
            devices: Vec::new(),
            selected: None,
            existing_url: existing_url.filter(|url| !url.is_empty()),
        }
    }

    pub fn has_devices(&self) -> bool {
        !self.devices.is_empty()
    }

    pub fn view(&self) -> View {
        let (surface, capture, retake) = match self.phase {
            Phase::Initializing | Phase::NoDevice | Phase::LoadingExisting => {
                (Surface::Video, Control::Disabled, Control::Hidden)
            }
            Phase::Previewing { live: true } => (Surface::Video, Control::Enabled, Control::Hidden),
            Phase::Previewing { live: false } => {
                (Surface::Video, Control::Disabled, Control::Hidden)
            }
            Phase::Encoding => (Surface::Canvas, Control::Hidden, Control::Hidden),
            Phase::Captured => (Surface::Canvas, Control::Hidden, Control::Enabled),
            Phase::ExistingImage if self.has_devices() => {
                (Surface::Canvas, Control::Hidden, Control::Enabled)
            }
            Phase::ExistingImage => (Surface::Canvas, Control::Hidden, Control::Disabled),
        };
        View {
            surface,
            capture,
            retake,
        }
    }

    fn with_phase(&self, phase: Phase) -> Self {
        Self {
            phase,
            ..self.clone()
        }
    }

    // phase to fall back to when nothing is streaming
    fn idle_phase(&self) -> Phase {
        if self.has_devices() {
            Phase::Previewing { live: false }
        } else {
            Phase::NoDevice
        }
    }

    fn restart_preview(&self, alert: Alert) -> (Self, Vec<Effect>) {
        let mut effects = vec![Effect::DiscardCapture, Effect::Alert(alert), Effect::StopStream];
        effects.extend(self.selected.clone().map(Effect::StartStream));
        (self.with_phase(self.idle_phase()), effects)
    }
}

pub type Transition = (WidgetState, Vec<Effect>);

/// Compute the next state and the effects to run for `event`.
///
/// # Errors
///
/// `WidgetError::InvalidTransition` when `event` is not accepted in the
/// current phase, `WidgetError::UnknownDevice` when a selection names a
/// device that was not enumerated. The state is unchanged in both cases.
pub fn transition(
    state: &WidgetState,
    event: Event,
    config: &WidgetConfig,
) -> Result<Transition, WidgetError> {
    let invalid = |event: &Event| WidgetError::InvalidTransition {
        phase: state.phase.clone(),
        event: event.name(),
    };

    match (&state.phase, event) {
        (Phase::Initializing, Event::Initialize) => {
            Ok((state.clone(), vec![Effect::EnumerateDevices]))
        }

        (Phase::Initializing, Event::DevicesEnumerated(all)) => {
            let mut next = state.clone();
            next.devices = video_inputs(all);
            next.selected = next.devices.first().map(|device| device.id.clone());

            let mut effects = vec![Effect::PopulateDevices];
            if !next.has_devices() {
                effects.push(Effect::Alert(Alert::NoWebcam));
            }
            next.phase = match (&next.existing_url, &next.selected) {
                (Some(url), _) => {
                    effects.push(Effect::LoadExisting(url.clone()));
                    Phase::LoadingExisting
                }
                (None, Some(first)) => {
                    effects.push(Effect::StartStream(first.clone()));
                    Phase::Previewing { live: false }
                }
                (None, None) => Phase::NoDevice,
            };
            Ok((next, effects))
        }

        (Phase::Initializing, Event::EnumerationFailed(_)) => {
            let mut effects = vec![Effect::Alert(Alert::DetectionFailed)];
            let phase = match &state.existing_url {
                Some(url) => {
                    effects.push(Effect::LoadExisting(url.clone()));
                    Phase::LoadingExisting
                }
                None => Phase::NoDevice,
            };
            Ok((state.with_phase(phase), effects))
        }

        (Phase::Previewing { live: false }, Event::StreamStarted(device))
            if state.selected.as_ref() == Some(&device) =>
        {
            Ok((state.with_phase(Phase::Previewing { live: true }), vec![]))
        }

        // a stream nobody is waiting for any more
        (_, Event::StreamStarted(_)) => Ok((state.clone(), vec![Effect::StopStream])),

        (Phase::Previewing { .. }, Event::StreamFailed { device, .. })
            if state.selected.as_ref() == Some(&device) =>
        {
            Ok((
                state.with_phase(Phase::Previewing { live: false }),
                vec![Effect::StopStream, Effect::Alert(Alert::WebcamUnavailable)],
            ))
        }

        (_, Event::StreamFailed { .. }) => Ok((state.clone(), vec![])),

        (
            Phase::Previewing { .. } | Phase::Captured | Phase::ExistingImage,
            Event::SelectDevice(device),
        ) => {
            if !state.devices.iter().any(|known| known.id == device) {
                return Err(WidgetError::UnknownDevice(device));
            }
            let mut next = state.with_phase(Phase::Previewing { live: false });
            next.selected = Some(device.clone());
            Ok((next, vec![Effect::StopStream, Effect::StartStream(device)]))
        }

        (Phase::Previewing { live: true }, Event::Capture) => Ok((
            state.with_phase(Phase::Encoding),
            vec![
                Effect::DrawFrame,
                Effect::StopStream,
                Effect::EncodeCanvas {
                    quality: config.jpeg_quality(),
                },
            ],
        )),

        (Phase::Encoding, Event::CaptureEncoded { bytes, timestamp_ms }) => {
            if bytes > config.max_file_size() {
                Ok(state.restart_preview(Alert::CaptureTooLarge))
            } else {
                Ok((
                    state.clone(),
                    vec![Effect::BindCapture {
                        file_name: config.file_name(timestamp_ms),
                    }],
                ))
            }
        }

        (Phase::Encoding, Event::CaptureBound) => {
            Ok((state.with_phase(Phase::Captured), vec![]))
        }

        (Phase::Encoding, Event::CaptureFailed(_)) => {
            Ok(state.restart_preview(Alert::CaptureFailed))
        }

        (Phase::Captured | Phase::ExistingImage, Event::Retake) if state.selected.is_some() => {
            let device = state.selected.clone().map(Effect::StartStream);
            let mut effects = vec![Effect::StopStream];
            effects.extend(device);
            Ok((state.with_phase(Phase::Previewing { live: false }), effects))
        }

        (Phase::LoadingExisting, Event::ExistingLoaded) => {
            Ok((state.with_phase(Phase::ExistingImage), vec![]))
        }

        (Phase::LoadingExisting, Event::ExistingFailed(_)) => Ok((
            state.with_phase(state.idle_phase()),
            vec![Effect::Alert(Alert::ExistingImageFailed)],
        )),

        (_, event) => Err(invalid(&event)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn previewing(live: bool) -> WidgetState {
        WidgetState {
            phase: Phase::Previewing { live },
            devices: vec![DeviceInfo::video("a", "A"), DeviceInfo::video("b", "B")],
            selected: Some(DeviceId::new("a")),
            existing_url: None,
        }
    }

    #[test]
    fn test_restart_preview_skips_start_without_selection() {
        let mut state = previewing(false);
        state.selected = None;
        let (next, effects) = state.restart_preview(Alert::CaptureFailed);
        assert_eq!(next.phase, Phase::Previewing { live: false });
        assert_eq!(
            effects,
            vec![
                Effect::DiscardCapture,
                Effect::Alert(Alert::CaptureFailed),
                Effect::StopStream
            ]
        );
    }

    #[test]
    fn test_idle_phase_without_devices() {
        let state = WidgetState::new(None);
        assert_eq!(state.idle_phase(), Phase::NoDevice);
        assert_eq!(previewing(true).idle_phase(), Phase::Previewing { live: false });
    }

    #[test]
    fn test_empty_existing_url_is_ignored() {
        assert_eq!(WidgetState::new(Some(String::new())).existing_url, None);
    }
}
