use capture_camera::CameraConfig;

#[test]
fn test_default_config() {
    let config = CameraConfig::default();
    assert_eq!((config.width(), config.height()), (640, 480));
    assert_eq!(config.fps(), 30);
    assert_eq!(config.buffer_count(), 4);
}

#[test]
fn test_builder_overrides() {
    let config = CameraConfig::default()
        .with_width(1280)
        .with_height(720)
        .with_fps(15)
        .with_buffer_count(2);
    assert_eq!((config.width(), config.height(), config.fps()), (1280, 720, 15));
    assert_eq!(config.buffer_count(), 2);
}

#[test]
fn test_buffer_count_never_zero() {
    assert_eq!(CameraConfig::default().with_buffer_count(0).buffer_count(), 1);
}
