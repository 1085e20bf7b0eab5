use capture_image::yuyv_to_rgb;

#[test]
fn test_yuyv_neutral_gray() {
    let rgb = yuyv_to_rgb(&[128, 128, 128, 128], 2, 1).unwrap();
    assert_eq!(rgb, vec![128, 128, 128, 128, 128, 128]);
}

#[test]
fn test_yuyv_black_and_white() {
    let rgb = yuyv_to_rgb(&[0, 128, 255, 128], 2, 1).unwrap();
    assert_eq!(rgb, vec![0, 0, 0, 255, 255, 255]);
}

#[test]
fn test_yuyv_short_input() {
    assert!(yuyv_to_rgb(&[0, 128], 2, 1).is_none());
}

#[test]
fn test_yuyv_ignores_trailing_bytes() {
    let rgb = yuyv_to_rgb(&[16, 128, 16, 128, 99, 99], 2, 1).unwrap();
    assert_eq!(rgb.len(), 6);
}
