//! Pointer gesture tracking and hit-area resolution.

use puppet_api_core::{ModelEngine, ModelHandle};
use puppet_assets_core::HitArea;

/// One pointer gesture, in device pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TouchState {
    pub start_x: f32,
    pub start_y: f32,
    pub last_x: f32,
    pub last_y: f32,
    pressed: bool,
}

impl TouchState {
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        *self = TouchState {
            start_x: x,
            start_y: y,
            last_x: x,
            last_y: y,
            pressed: true,
        };
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.last_x = x;
        self.last_y = y;
    }

    /// Ends the gesture. Returns whether one was in progress.
    pub fn pointer_up(&mut self, x: f32, y: f32) -> bool {
        self.pointer_move(x, y);
        std::mem::replace(&mut self.pressed, false)
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Distance travelled from the start of the gesture.
    pub fn flick_distance(&self) -> f32 {
        (self.last_x - self.start_x).hypot(self.last_y - self.start_y)
    }

    /// Movement of `(x, y)` relative to the last recorded point.
    pub fn moving_amount(&self, x: f32, y: f32) -> (f32, f32) {
        (x - self.last_x, y - self.last_y)
    }
}

/// Names of the hit areas containing the model-space point.
pub fn hit_areas(
    engine: &dyn ModelEngine,
    handle: ModelHandle,
    areas: &[HitArea],
    x: f32,
    y: f32,
) -> Vec<String> {
    areas
        .iter()
        .filter(|a| engine.hit_test(handle, &a.id, x, y))
        .map(|a| a.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gesture_tracks_start_and_last() {
        let mut t = TouchState::default();
        t.pointer_down(10.0, 10.0);
        t.pointer_move(13.0, 14.0);
        assert_eq!(t.flick_distance(), 5.0);
        assert_eq!(t.moving_amount(15.0, 14.0), (2.0, 0.0));
        assert!(t.pointer_up(13.0, 14.0));
        assert!(!t.pointer_up(0.0, 0.0));

        t.pointer_down(1.0, 1.0);
        assert_eq!(t.flick_distance(), 0.0);
    }
}
