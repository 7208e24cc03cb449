//! User camera: pan offset and zoom over the logical view.
//!
//! `x`/`y` are the pan offset in device pixels with y pointing up; `scale`
//! is the zoom factor. The identity camera is `(0, 0, 1)`.

use serde::{Deserialize, Serialize};

use crate::viewport::ViewTransform;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl CameraState {
    pub const NEUTRAL: CameraState = CameraState {
        x: 0.0,
        y: 0.0,
        scale: 1.0,
    };
}

impl Default for CameraState {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraLimits {
    pub min_scale: f32,
    pub max_scale: f32,
    pub zoom_step: f32,
    pub pan_speed: f32,
    pub zoom_enabled: bool,
    pub enable_pan: bool,
    pub double_click_reset: bool,
}

#[derive(Clone, Debug)]
pub struct Camera {
    state: CameraState,
    limits: CameraLimits,
    panning: bool,
    last_pointer: (f32, f32),
}

impl Camera {
    pub fn new(initial: CameraState, limits: CameraLimits) -> Self {
        let mut camera = Self {
            state: initial,
            limits,
            panning: false,
            last_pointer: (0.0, 0.0),
        };
        camera.state.scale = camera.clamp_scale(initial.scale);
        camera
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn limits(&self) -> CameraLimits {
        self.limits
    }

    pub fn set_limits(&mut self, limits: CameraLimits) {
        self.limits = limits;
        self.state.scale = self.clamp_scale(self.state.scale);
    }

    fn clamp_scale(&self, scale: f32) -> f32 {
        let (lo, hi) = if self.limits.min_scale <= self.limits.max_scale {
            (self.limits.min_scale, self.limits.max_scale)
        } else {
            (self.limits.max_scale, self.limits.min_scale)
        };
        scale.clamp(lo, hi)
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.state.x = x;
        self.state.y = y;
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.state.scale = self.clamp_scale(scale);
    }

    /// Rescale keeping the world point under the canvas centre fixed.
    fn zoom_about_center(&mut self, factor: f32) -> bool {
        if !self.limits.zoom_enabled {
            return false;
        }
        let old = self.state.scale;
        let new = self.clamp_scale(old * factor);
        if old > 0.0 {
            self.state.x *= new / old;
            self.state.y *= new / old;
        }
        self.state.scale = new;
        true
    }

    pub fn zoom_in(&mut self, factor: f32) -> bool {
        self.zoom_about_center(1.0 + factor)
    }

    pub fn zoom_out(&mut self, factor: f32) -> bool {
        self.zoom_about_center(1.0 - factor)
    }

    /// Wheel zoom by `2^(-delta_y * zoom_step)` anchored at the cursor.
    pub fn wheel(&mut self, viewport: &ViewTransform, px: f32, py: f32, delta_y: f32) -> bool {
        if !self.limits.zoom_enabled {
            return false;
        }
        let old = self.state.scale;
        let new = self.clamp_scale(old * 2f32.powf(-delta_y * self.limits.zoom_step));
        let ppl = viewport.pixels_to_logical();
        let (sx, sy) = viewport.device_to_screen(px, py);
        let (tx, ty) = (self.state.x * ppl, self.state.y * ppl);
        // World point under the cursor stays put.
        let qx = (sx - tx) / old;
        let qy = (sy - ty) / old;
        let (tx, ty) = (sx - qx * new, sy - qy * new);
        self.state.x = tx / ppl;
        self.state.y = ty / ppl;
        self.state.scale = new;
        true
    }

    pub fn pan_start(&mut self, px: f32, py: f32) {
        self.panning = self.limits.enable_pan;
        self.last_pointer = (px, py);
    }

    pub fn pan_move(&mut self, px: f32, py: f32) -> bool {
        if !self.panning {
            return false;
        }
        let (dx, dy) = (px - self.last_pointer.0, py - self.last_pointer.1);
        self.last_pointer = (px, py);
        self.state.x += dx * self.limits.pan_speed;
        self.state.y -= dy * self.limits.pan_speed;
        true
    }

    pub fn pan_end(&mut self) {
        self.panning = false;
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    /// Reset to the identity camera. Returns false when disabled.
    pub fn double_click(&mut self) -> bool {
        if !self.limits.double_click_reset {
            return false;
        }
        self.reset();
        true
    }

    pub fn reset(&mut self) {
        self.state = CameraState {
            scale: self.clamp_scale(1.0),
            ..CameraState::NEUTRAL
        };
        self.panning = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn limits() -> CameraLimits {
        CameraLimits {
            min_scale: 0.5,
            max_scale: 2.0,
            zoom_step: 0.005,
            pan_speed: 1.0,
            zoom_enabled: true,
            enable_pan: true,
            double_click_reset: true,
        }
    }

    #[test]
    fn zoom_is_clamped_and_keeps_center() {
        let mut cam = Camera::new(CameraState { x: 10.0, y: -4.0, scale: 1.0 }, limits());
        for _ in 0..20 {
            cam.zoom_in(0.5);
        }
        assert_relative_eq!(cam.state().scale, 2.0);
        assert_relative_eq!(cam.state().x, 20.0);
        assert_relative_eq!(cam.state().y, -8.0);
        for _ in 0..20 {
            cam.zoom_out(0.5);
        }
        assert_relative_eq!(cam.state().scale, 0.5);
    }

    #[test]
    fn pan_follows_pointer_with_y_up() {
        let mut cam = Camera::new(CameraState::NEUTRAL, limits());
        cam.pan_start(100.0, 100.0);
        assert!(cam.pan_move(110.0, 90.0));
        assert_eq!(cam.state(), CameraState { x: 10.0, y: 10.0, scale: 1.0 });
        cam.pan_end();
        assert!(!cam.pan_move(200.0, 200.0));
    }

    #[test]
    fn disabled_gestures_do_nothing() {
        let mut cam = Camera::new(
            CameraState::NEUTRAL,
            CameraLimits {
                zoom_enabled: false,
                enable_pan: false,
                double_click_reset: false,
                ..limits()
            },
        );
        assert!(!cam.zoom_in(0.5));
        cam.pan_start(0.0, 0.0);
        assert!(!cam.pan_move(5.0, 5.0));
        assert!(!cam.double_click());
        assert_eq!(cam.state(), CameraState::NEUTRAL);
    }

    #[test]
    fn wheel_keeps_cursor_point_fixed() {
        let vp = ViewTransform::new(800, 600);
        let mut cam = Camera::new(CameraState::NEUTRAL, limits());
        let (px, py) = (600.0, 150.0);
        let before = vp.device_to_view(&cam.state(), px, py).expect("invertible");
        assert!(cam.wheel(&vp, px, py, -100.0));
        assert!(cam.state().scale > 1.0);
        let after = vp.device_to_view(&cam.state(), px, py).expect("invertible");
        assert_relative_eq!(before.0, after.0, epsilon = 1e-4);
        assert_relative_eq!(before.1, after.1, epsilon = 1e-4);
    }
}
