//! Webcam photo capture for form file inputs.
//!
//! A [`CaptureWidget`] owns one capture container: a live video preview,
//! a canvas, a device selector and the file input the photo is bound to.
//! The widget's behavior is a pure state machine ([`state::transition`]);
//! the widget itself only performs the effects the machine asks for.
//!
//! [`FormState`] is the form-level collaborator that watches file-input
//! change events to warn about unsaved changes.

pub mod config;
pub mod elements;
pub mod error;
pub mod form;
pub mod loader;
pub mod notify;
pub mod state;
pub mod widget;

pub use config::{MAX_FILE_SIZE, WidgetConfig};
pub use elements::{BoundFile, ChangeEvent, DeviceOption, DeviceSelect, FileInput, VideoElement};
pub use error::WidgetError;
pub use form::{FormState, UNSAVED_CHANGES_MESSAGE};
pub use loader::{FsImageLoader, ImageLoader};
pub use notify::{Alert, LogNotifier, Notifier};
pub use state::{Control, Effect, Event, Phase, Surface, View, WidgetState, transition};
pub use widget::{CaptureWidget, Container};
