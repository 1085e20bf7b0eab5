#[cfg(feature = "v4l2")]
mod v4l2_tests {
    use capture_camera::{CameraConfig, CameraError, DeviceId, MediaDevices, V4l2Devices, V4l2Stream};
    use std::path::PathBuf;

    #[test]
    fn test_v4l2_stream_missing_device() {
        let result = V4l2Stream::open(PathBuf::from("/dev/nonexistent_camera"), CameraConfig::default());
        match result {
            Err(CameraError::NotFound(_)) => {}
            other => panic!("Expected CameraError::NotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_v4l2_devices_open_missing_device() {
        let mut devices = V4l2Devices::new(CameraConfig::default().with_width(1280).with_height(720));
        assert_eq!(devices.config().width(), 1280);
        let err = devices.open(&DeviceId::new("/dev/nonexistent_camera")).await.unwrap_err();
        assert!(err.is_access_error());
    }

    #[tokio::test]
    async fn test_v4l2_enumeration_lists_only_cameras() {
        // works with or without hardware: every entry must be a capture node
        let devices = V4l2Devices::default().enumerate().await.unwrap();
        for device in devices {
            assert!(device.id.as_str().starts_with("/dev/video"));
        }
    }
}
