use crate::state::{Effect, Event, View, WidgetState, transition};
use crate::{
    BoundFile, DeviceSelect, FileInput, ImageLoader, Notifier, VideoElement, WidgetConfig,
    WidgetError,
};
use capture_camera::{DeviceId, Frame, MediaDevices};
use capture_image::Canvas;
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

/// The external handles of one capture container, gathered once.
pub struct Container<D, L, N> {
    pub devices: D,
    pub loader: L,
    pub notifier: N,
    pub input: FileInput,
}

// Outcome of one effect: an event to feed back, or a failure event that
// also cancels the effects still queued behind it.
type EffectResult = Result<Option<Event>, Event>;

/// Drives one capture container.
///
/// Every public operation feeds an event through [`transition`], performs
/// the resulting effects in order and keeps going with the events those
/// effects produce until the widget is idle again. Device and image errors
/// end up as alerts; only misuse (an operation the current phase does not
/// allow) is returned as an error, and it leaves the widget untouched.
pub struct CaptureWidget<D: MediaDevices, L, N> {
    state: WidgetState,
    config: WidgetConfig,
    devices: D,
    loader: L,
    notifier: N,
    video: VideoElement<D::Stream>,
    canvas: Canvas,
    input: FileInput,
    select: DeviceSelect,
    // encoded capture waiting for the size verdict
    pending: Option<Vec<u8>>,
}

impl<D, L, N> CaptureWidget<D, L, N>
where
    D: MediaDevices,
    L: ImageLoader,
    N: Notifier,
{
    pub fn new(container: Container<D, L, N>, config: WidgetConfig) -> Self {
        let Container {
            devices,
            loader,
            notifier,
            input,
        } = container;
        Self {
            state: WidgetState::new(input.data_url().map(str::to_string)),
            config,
            devices,
            loader,
            notifier,
            video: VideoElement::default(),
            canvas: Canvas::new(),
            input,
            select: DeviceSelect::default(),
            pending: None,
        }
    }

    /// Enumerate cameras, then either restore the existing image or start
    /// previewing the first camera.
    pub async fn initialize(&mut self) -> Result<(), WidgetError> {
        self.dispatch(Event::Initialize).await
    }

    /// Switch the preview to `device`, releasing the current stream first.
    pub async fn change_device(&mut self, device: DeviceId) -> Result<(), WidgetError> {
        self.dispatch(Event::SelectDevice(device)).await
    }

    /// Freeze the current frame and bind it to the file input.
    pub async fn capture(&mut self) -> Result<(), WidgetError> {
        self.dispatch(Event::Capture).await
    }

    /// Go back to previewing the selected camera.
    pub async fn retake(&mut self) -> Result<(), WidgetError> {
        self.dispatch(Event::Retake).await
    }

    /// Next preview frame while a stream is live.
    ///
    /// A stream that dies while previewing is released and reported like a
    /// failed acquisition.
    pub async fn preview_frame(&mut self) -> Option<Frame> {
        if !self.video.is_streaming() {
            return None;
        }
        match self.video.current_frame().await {
            Ok(frame) => Some(frame),
            Err(e) => {
                log::error!("Error reading webcam frame: {}", e);
                let device = self.video.device().cloned()?;
                let failed = Event::StreamFailed {
                    device,
                    reason: e.to_string(),
                };
                if let Err(e) = self.dispatch(failed).await {
                    log::warn!("{}", e);
                }
                None
            }
        }
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn view(&self) -> View {
        self.state.view()
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn video(&self) -> &VideoElement<D::Stream> {
        &self.video
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn input(&self) -> &FileInput {
        &self.input
    }

    pub fn select(&self) -> &DeviceSelect {
        &self.select
    }

    async fn dispatch(&mut self, event: Event) -> Result<(), WidgetError> {
        let (next, effects) = transition(&self.state, event, &self.config)?;
        self.apply(next);

        let mut queue = VecDeque::new();
        self.run(effects, &mut queue).await;

        // follow-up events come from our own effects; one the phase no
        // longer accepts is dropped
        while let Some(event) = queue.pop_front() {
            log::debug!("event: {}", event.name());
            match transition(&self.state, event, &self.config) {
                Ok((next, effects)) => {
                    self.apply(next);
                    self.run(effects, &mut queue).await;
                }
                Err(e) => log::warn!("dropping follow-up event: {}", e),
            }
        }
        Ok(())
    }

    fn apply(&mut self, next: WidgetState) {
        if next.phase != self.state.phase {
            log::debug!("phase: {} -> {}", self.state.phase, next.phase);
        }
        self.state = next;
        self.select.set_value(self.state.selected.clone());
    }

    async fn run(&mut self, effects: Vec<Effect>, queue: &mut VecDeque<Event>) {
        for effect in effects {
            match self.perform(effect).await {
                Ok(Some(event)) => queue.push_back(event),
                Ok(None) => {}
                Err(event) => {
                    queue.push_back(event);
                    break;
                }
            }
        }
    }

    async fn perform(&mut self, effect: Effect) -> EffectResult {
        match effect {
            Effect::EnumerateDevices => match self.devices.enumerate().await {
                Ok(devices) => Ok(Some(Event::DevicesEnumerated(devices))),
                Err(e) => {
                    log::error!("Error enumerating devices: {}", e);
                    Ok(Some(Event::EnumerationFailed(e.to_string())))
                }
            },
            Effect::PopulateDevices => {
                self.select.populate(&self.state.devices);
                Ok(None)
            }
            Effect::StopStream => {
                self.video.release();
                Ok(None)
            }
            Effect::StartStream(device) => {
                // never hold two camera handles
                self.video.release();
                match self.devices.open(&device).await {
                    Ok(stream) => {
                        log::info!("previewing {}", device);
                        self.video.attach(device.clone(), stream);
                        Ok(Some(Event::StreamStarted(device)))
                    }
                    Err(e) => {
                        log::error!("Error accessing webcam {}: {}", device, e);
                        Ok(Some(Event::StreamFailed {
                            device,
                            reason: e.to_string(),
                        }))
                    }
                }
            }
            Effect::DrawFrame => match self.video.current_frame().await {
                Ok(frame) => {
                    self.canvas.draw(&frame);
                    Ok(None)
                }
                Err(e) => {
                    log::error!("Error reading webcam frame: {}", e);
                    Err(Event::CaptureFailed(e.to_string()))
                }
            },
            Effect::EncodeCanvas { quality } => match self.canvas.to_jpeg(quality).await {
                Ok(jpeg) => {
                    let bytes = jpeg.len();
                    log::debug!("encoded capture: {} bytes", bytes);
                    self.pending = Some(jpeg);
                    Ok(Some(Event::CaptureEncoded {
                        bytes,
                        timestamp_ms: now_millis(),
                    }))
                }
                Err(e) => {
                    log::error!("Error encoding capture: {}", e);
                    Err(Event::CaptureFailed(e.to_string()))
                }
            },
            Effect::DiscardCapture => {
                if let Some(jpeg) = self.pending.take() {
                    log::warn!(
                        "discarded {} byte capture (limit {})",
                        jpeg.len(),
                        self.config.max_file_size()
                    );
                }
                Ok(None)
            }
            Effect::BindCapture { file_name } => {
                let Some(jpeg) = self.pending.take() else {
                    log::error!("no encoded capture to bind as {}", file_name);
                    return Err(Event::CaptureFailed("nothing to bind".to_string()));
                };
                match self.input.bind(BoundFile::jpeg(file_name, jpeg)) {
                    Ok(()) => Ok(Some(Event::CaptureBound)),
                    Err(e) => {
                        log::error!("Error binding capture: {}", e);
                        Err(Event::CaptureFailed(e.to_string()))
                    }
                }
            }
            Effect::LoadExisting(url) => match self.load_existing(&url).await {
                Ok(()) => Ok(Some(Event::ExistingLoaded)),
                Err(e) => {
                    log::error!("Error loading existing image {}: {}", url, e);
                    Ok(Some(Event::ExistingFailed(e.to_string())))
                }
            },
            Effect::Alert(alert) => {
                log::warn!("{}", alert);
                self.notifier.alert(&alert);
                Ok(None)
            }
        }
    }

    async fn load_existing(&mut self, url: &str) -> Result<(), WidgetError> {
        let data = self.loader.load(url).await?;
        let image = capture_image::decode_image(&data).await?;
        self.canvas.draw(&image);
        Ok(())
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
