//! Puppet Animation Core
//!
//! Decoded motion clips, a priority-arbitrated motion queue with cross-fades,
//! a layered expression queue and the procedural effects (breath, eye blink,
//! drag-follow) that run on top of them. Everything writes into a
//! [`puppet_api_core::ModelState`]; nothing here talks to the engine.

pub mod config;
pub mod data;
pub mod effects;
pub mod error;
pub mod expression;
pub mod fade;
pub mod ids;
pub mod library;
pub mod motion_json;
pub mod player;
pub mod priority;
pub mod queue;
pub mod sampling;

pub use config::AnimationConfig;
pub use data::{Curve, CurveTarget, ExpressionData, ExpressionParameter, MotionData, Point, Segment};
pub use effects::{Breath, BreathParameter, EyeBlink, TargetPoint};
pub use error::{ClipDecodeError, PlaybackError};
pub use expression::ExpressionPlayer;
pub use ids::{IdAllocator, MotionHandle, MotionKey};
pub use library::MotionLibrary;
pub use motion_json::{parse_expression_json, parse_motion_json};
pub use player::{MotionCallback, MotionCallbacks, MotionPlayer, StartedMotion};
pub use priority::PlaybackPriority;
pub use queue::MotionQueue;
