#![allow(dead_code)]

use capture_camera::{CameraError, DeviceId, DeviceInfo, DeviceKind, Frame, MediaDevices, MediaStream};
use capture_widget::{
    Alert, CaptureWidget, Container, FileInput, ImageLoader, Notifier, Surface, WidgetConfig,
    WidgetError,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Enumerate,
    Open(String),
    Stop(String),
}

/// Shared record of everything the fake hardware saw.
#[derive(Clone, Default)]
pub struct Journal {
    ops: Arc<Mutex<Vec<Op>>>,
    active: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    pub fn opens(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::Open(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn active(&self) -> Vec<String> {
        self.active.lock().unwrap().clone()
    }

    fn push(&self, op: Op) {
        self.ops.lock().unwrap().push(op);
    }
}

/// Kind of picture a fake camera produces.
#[derive(Clone, Copy, Debug)]
pub enum Scene {
    /// Flat gray: compresses to well under a kilobyte.
    Flat { width: usize, height: usize },
    /// Pseudo-random noise: compresses badly.
    Noise { width: usize, height: usize },
}

impl Scene {
    fn frame(&self) -> Frame {
        match *self {
            Scene::Flat { width, height } => {
                Frame::from_rgb(width, height, vec![128; width * height * 3]).unwrap()
            }
            Scene::Noise { width, height } => {
                let mut seed: u32 = 0x2545_f491;
                let data = (0..width * height * 3)
                    .map(|_| {
                        seed ^= seed << 13;
                        seed ^= seed >> 17;
                        seed ^= seed << 5;
                        (seed >> 24) as u8
                    })
                    .collect();
                Frame::from_rgb(width, height, data).unwrap()
            }
        }
    }
}

pub struct FakeStream {
    device: String,
    scene: Scene,
    active: bool,
    journal: Journal,
}

impl MediaStream for FakeStream {
    async fn recv(&mut self) -> Result<Frame, CameraError> {
        if !self.active {
            return Err(CameraError::Stream("stopped".to_string()));
        }
        Ok(self.scene.frame())
    }

    fn stop(&mut self) {
        if self.active {
            self.active = false;
            self.journal.push(Op::Stop(self.device.clone()));
            self.journal.active.lock().unwrap().retain(|id| id != &self.device);
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for FakeStream {
    fn drop(&mut self) {
        self.stop();
    }
}

pub struct FakeDevices {
    pub devices: Vec<DeviceInfo>,
    pub scenes: HashMap<String, Scene>,
    pub denied: Vec<String>,
    pub enumerate_fails: bool,
    pub journal: Journal,
}

impl FakeDevices {
    pub fn new(cameras: &[(&str, &str)]) -> Self {
        let mut devices = vec![DeviceInfo {
            id: DeviceId::new("default-mic"),
            kind: DeviceKind::AudioInput,
            label: "Microphone".to_string(),
        }];
        devices.extend(cameras.iter().map(|(id, label)| DeviceInfo::video(*id, *label)));
        Self {
            devices,
            scenes: HashMap::new(),
            denied: Vec::new(),
            enumerate_fails: false,
            journal: Journal::default(),
        }
    }

    pub fn with_scene(mut self, id: &str, scene: Scene) -> Self {
        self.scenes.insert(id.to_string(), scene);
        self
    }

    pub fn deny(mut self, id: &str) -> Self {
        self.denied.push(id.to_string());
        self
    }

    pub fn failing_enumeration(mut self) -> Self {
        self.enumerate_fails = true;
        self
    }
}

impl MediaDevices for FakeDevices {
    type Stream = FakeStream;

    async fn enumerate(&self) -> Result<Vec<DeviceInfo>, CameraError> {
        self.journal.push(Op::Enumerate);
        if self.enumerate_fails {
            return Err(CameraError::Device("enumeration not permitted".to_string()));
        }
        Ok(self.devices.clone())
    }

    async fn open(&mut self, device: &DeviceId) -> Result<FakeStream, CameraError> {
        let id = device.as_str().to_string();
        self.journal.push(Op::Open(id.clone()));
        if self.denied.contains(&id) {
            return Err(CameraError::PermissionDenied(id));
        }
        assert!(
            self.journal.active().is_empty(),
            "stream on {id} requested while {:?} still active",
            self.journal.active()
        );
        self.journal.active.lock().unwrap().push(id.clone());
        let scene = self
            .scenes
            .get(&id)
            .copied()
            .unwrap_or(Scene::Flat { width: 32, height: 24 });
        Ok(FakeStream {
            device: id,
            scene,
            active: true,
            journal: self.journal.clone(),
        })
    }
}

/// Loader backed by an in-memory map of URL to bytes.
#[derive(Default)]
pub struct MapLoader {
    pub files: HashMap<String, Vec<u8>>,
}

impl ImageLoader for MapLoader {
    async fn load(&self, url: &str) -> Result<Vec<u8>, WidgetError> {
        self.files
            .get(url)
            .cloned()
            .ok_or_else(|| WidgetError::Load(format!("404 {url}")))
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    alerts: Arc<Mutex<Vec<Alert>>>,
}

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, alert: &Alert) {
        self.alerts.lock().unwrap().push(*alert);
    }
}

pub type TestWidget = CaptureWidget<FakeDevices, MapLoader, RecordingNotifier>;

pub fn widget_with(
    devices: FakeDevices,
    loader: MapLoader,
    input: FileInput,
    config: WidgetConfig,
) -> (TestWidget, Journal, RecordingNotifier) {
    let journal = devices.journal.clone();
    let notifier = RecordingNotifier::default();
    let widget = CaptureWidget::new(
        Container {
            devices,
            loader,
            notifier: notifier.clone(),
            input,
        },
        config,
    );
    (widget, journal, notifier)
}

pub fn widget(devices: FakeDevices) -> (TestWidget, Journal, RecordingNotifier) {
    widget_with(
        devices,
        MapLoader::default(),
        FileInput::new("photo"),
        WidgetConfig::default(),
    )
}

/// Checks that must hold after every operation.
pub fn assert_invariants(widget: &TestWidget) {
    let view = widget.view();
    if widget.video().is_streaming() {
        assert_eq!(view.surface, Surface::Video, "stream held while canvas shown");
    }
    if view.surface == Surface::Canvas {
        assert!(!widget.video().is_streaming());
    }
}

pub fn jpeg_fixture(width: usize, height: usize) -> Vec<u8> {
    let image = Frame::from_rgb(width, height, vec![200; width * height * 3]).unwrap();
    capture_image::encode_jpeg_blocking(&image, 90).unwrap()
}
