use puppet_animation_core::{Breath, EyeBlink, TargetPoint};
use puppet_api_core::ParameterVector;
use rand::rngs::StdRng;

use super::{DragSource, ParameterEffect};

impl ParameterEffect for Breath {
    fn apply(&mut self, parameters: &mut ParameterVector, dt: f32) {
        self.update(parameters, dt);
    }
}

impl DragSource for TargetPoint {
    fn advance(&mut self, dt: f32) -> (f32, f32) {
        self.update(dt);
        (self.x(), self.y())
    }
}

/// Eye blink with its own random source for interval jitter.
pub struct BlinkController {
    pub blink: EyeBlink,
    rng: StdRng,
}

impl BlinkController {
    pub fn new(blink: EyeBlink, rng: StdRng) -> Self {
        Self { blink, rng }
    }
}

impl ParameterEffect for BlinkController {
    fn apply(&mut self, parameters: &mut ParameterVector, dt: f32) {
        self.blink.update(parameters, dt, &mut self.rng);
    }
}
