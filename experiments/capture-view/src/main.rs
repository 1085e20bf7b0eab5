use capture_camera::{CameraConfig, V4l2Devices};
use capture_widget::{
    Alert, CaptureWidget, Container, FileInput, FormState, FsImageLoader, Notifier, Surface,
    WidgetConfig,
};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use std::path::{Path, PathBuf};

const WIDTH: usize = 640;
const HEIGHT: usize = 480;

/// Pack an HWC RGB buffer into minifb's 0RGB pixels.
fn rgb_to_argb(buf: &[u8]) -> Vec<u32> {
    buf.chunks_exact(3)
        .map(|px| (px[0] as u32) << 16 | (px[1] as u32) << 8 | px[2] as u32)
        .collect()
}

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, alert: &Alert) {
        eprintln!("!! {}", alert);
    }
}

fn existing_url(arg: Option<String>) -> Result<Option<String>, std::io::Error> {
    match arg {
        Some(path) => {
            let path = std::fs::canonicalize(path)?;
            Ok(Some(format!("file://{}", path.display())))
        }
        None => Ok(None),
    }
}

fn save(dir: &Path, name: &str, data: &[u8]) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(name);
    std::fs::write(&path, data)?;
    Ok(path)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    capture_base::init_stdout_logger();

    let mut args = std::env::args().skip(1);
    let existing = existing_url(args.next())?;
    let output_dir = PathBuf::from(args.next().unwrap_or_else(|| "captures".to_string()));

    println!("Capture View");
    println!("Controls: C capture, R retake, N next camera, ESC to exit");
    println!("Captures are saved to {}", output_dir.display());
    println!();

    let mut input = FileInput::new("photo");
    if let Some(url) = existing {
        input = input.with_data_url(url);
    }
    let mut changes = input.subscribe();
    let mut form = FormState::default();

    let config = CameraConfig::default()
        .with_width(WIDTH as u32)
        .with_height(HEIGHT as u32);
    let mut widget = CaptureWidget::new(
        Container {
            devices: V4l2Devices::new(config),
            loader: FsImageLoader::new(&output_dir),
            notifier: ConsoleNotifier,
            input,
        },
        WidgetConfig::default(),
    );
    widget.initialize().await?;
    for option in widget.select().options() {
        println!("camera {}: {}", option.value, option.text);
    }

    let mut window = Window::new(
        "Capture View - ESC to exit",
        WIDTH,
        HEIGHT,
        WindowOptions::default(),
    )?;
    window.set_target_fps(30);

    // shown while there is nothing to draw
    let blank = vec![0u32; WIDTH * HEIGHT];

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let result = if window.is_key_pressed(Key::C, KeyRepeat::No) {
            widget.capture().await
        } else if window.is_key_pressed(Key::R, KeyRepeat::No) {
            widget.retake().await
        } else if window.is_key_pressed(Key::N, KeyRepeat::No) {
            match widget.select().next_value().cloned() {
                Some(next) => widget.change_device(next).await,
                None => Ok(()),
            }
        } else {
            Ok(())
        };
        if let Err(e) = result {
            eprintln!("{}", e);
        }

        if form.observe(&mut changes) > 0 {
            if let Some(file) = widget.input().file() {
                let path = save(&output_dir, &file.name, &file.data)?;
                println!("saved {} ({} bytes)", path.display(), file.size());
            }
        }

        let picture = match widget.view().surface {
            Surface::Video => widget.preview_frame().await,
            Surface::Canvas => widget.canvas().image().cloned(),
        };
        match picture {
            Some(image) => {
                let argb = rgb_to_argb(image.data());
                window.update_with_buffer(&argb, image.width(), image.height())?;
            }
            None => window.update_with_buffer(&blank, WIDTH, HEIGHT)?,
        }
    }

    // every capture is already on disk
    form.submit();
    println!("Exiting...");
    Ok(())
}
