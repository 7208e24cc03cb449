mod common;

use common::{loaded, options, HEIGHT, WIDTH};
use puppet_api_core::PixelBuffer;
use puppet_orchestrator::CameraState;
use puppet_test_fixtures::mocks::MockSurface;

#[test]
fn auto_frame_is_idempotent() {
    let mut rt = loaded("sample", options());
    rt.surface_mut().capture = Some(MockSurface::band(WIDTH / 2, HEIGHT / 2, 75, 224));
    rt.set_camera(CameraState {
        x: 40.0,
        y: -10.0,
        scale: 2.0,
    });

    let first = rt.auto_frame().unwrap().expect("framed");
    let camera = rt.camera();
    let second = rt.auto_frame().unwrap().expect("framed");
    assert_eq!(first, second);
    assert_eq!(camera, rt.camera());
    // 150 of 300 rows free: margin 37.5 above a top at 75, doubled by the zoom.
    assert_eq!(camera, CameraState { x: 0.0, y: 75.0, scale: 2.0 });
    assert_eq!(rt.surface().capture_scales, vec![0.5, 0.5]);
}

#[test]
fn empty_frames_leave_the_camera_alone() {
    let mut rt = loaded("sample", options());
    let cam = CameraState { x: 5.0, y: 6.0, scale: 1.0 };
    rt.set_camera(cam);
    assert_eq!(rt.auto_frame().unwrap(), None);
    assert_eq!(rt.camera(), cam);

    rt.surface_mut().capture = Some(PixelBuffer::new(WIDTH, HEIGHT));
    assert_eq!(rt.auto_frame().unwrap(), None);
    assert_eq!(rt.camera(), cam);
}

#[test]
fn double_click_resets_then_frames() {
    let mut rt = loaded("sample", options());
    rt.surface_mut().capture = Some(MockSurface::band(WIDTH, HEIGHT, 150, 449));
    rt.set_camera(CameraState { x: 100.0, y: 100.0, scale: 3.0 });
    assert!(rt.double_click().unwrap());
    assert_eq!(rt.camera(), CameraState { x: 0.0, y: 75.0, scale: 1.0 });
}

#[test]
fn character_position_does_not_move_the_camera() {
    let mut rt = loaded("sample", options());
    rt.surface_mut().capture = Some(MockSurface::band(WIDTH, HEIGHT, 150, 449));
    let cam = CameraState { x: 10.0, y: 20.0, scale: 2.0 };
    rt.set_camera(cam);
    let pos = rt.character_position().unwrap().expect("visible");
    assert_eq!((pos.top, pos.bottom), (150, 449));
    assert_eq!(rt.camera(), cam);
    assert_eq!(rt.surface().capture_scales.last(), Some(&1.0));
}

#[test]
fn screenshot_face_crop_is_a_centred_quarter() {
    let mut rt = loaded("sample", options());
    rt.surface_mut().capture = Some(MockSurface::band(WIDTH, HEIGHT, 0, HEIGHT - 1));
    let full = rt.screenshot(false).unwrap().expect("frame");
    assert_eq!((full.width, full.height), (WIDTH, HEIGHT));
    let face = rt.screenshot(true).unwrap().expect("frame");
    assert_eq!((face.width, face.height), (WIDTH / 4, WIDTH / 4));
}
