//! Procedural layers applied after motions and expressions.

mod breath;
mod eye_blink;
mod target_point;

pub use breath::{default_breath_parameters, Breath, BreathParameter};
pub use eye_blink::{BlinkState, EyeBlink};
pub use target_point::TargetPoint;
