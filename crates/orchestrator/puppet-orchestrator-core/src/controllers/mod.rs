//! Interfaces the frame scheduler drives, and the controllers implementing
//! them on top of the animation crate.

pub mod effects;
pub mod expression;
pub mod lipsync;
pub mod motion;

use puppet_api_core::{ModelState, ParameterVector};

pub use effects::BlinkController;
pub use lipsync::LipsyncEngine;
pub use motion::MotionController;

/// A clip layer writing into the full model state.
pub trait StateLayer {
    /// Returns whether the layer wrote anything this tick.
    fn advance(&mut self, state: &mut ModelState, dt: f32) -> bool;
}

/// A procedural effect over parameters.
pub trait ParameterEffect {
    fn apply(&mut self, parameters: &mut ParameterVector, dt: f32);
}

/// Smoothed pointer-follow offset in `[-1, 1]` per axis.
pub trait DragSource {
    fn advance(&mut self, dt: f32) -> (f32, f32);
}

/// Loudness source for mouth movement.
pub trait EnvelopeSource {
    fn is_active(&self) -> bool;
    fn envelope(&mut self, dt: f32) -> f32;
}
