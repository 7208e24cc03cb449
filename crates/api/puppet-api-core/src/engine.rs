//! Contract of the model evaluation engine.
//!
//! The engine owns the opaque topology: it turns bytes into a model, exposes
//! the parameter layout, evaluates deformation and answers hit tests. Physics
//! and pose are optional capabilities; engines that lack them keep the
//! default method bodies.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parameters::{Parameter, ParameterVector, PartOpacityVector};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelHandle(pub u32);

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum EngineError {
    #[error("topology rejected: {reason}")]
    TopologyRejected { reason: String },
    #[error("unknown model handle {0:?}")]
    UnknownHandle(ModelHandle),
    #[error("{capability} data rejected: {reason}")]
    CapabilityRejected {
        capability: &'static str,
        reason: String,
    },
    #[error("{0} is not supported by this engine")]
    Unsupported(&'static str),
    #[error("engine framework failed to start: {reason}")]
    StartUp { reason: String },
    #[error("surface error: {reason}")]
    Surface { reason: String },
}

/// Canvas extents of a model in model units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasInfo {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasInfo {
    fn default() -> Self {
        Self {
            width: 2.0,
            height: 2.0,
        }
    }
}

/// Everything the runtime needs to know about a freshly initialized model.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelLayout {
    pub parameters: Vec<Parameter>,
    pub parts: Vec<String>,
    pub canvas: CanvasInfo,
}

pub trait ModelEngine {
    fn load_topology(
        &mut self,
        topology: &[u8],
        consistency_check: bool,
    ) -> Result<ModelHandle, EngineError>;

    fn initialize(&mut self, handle: ModelHandle) -> Result<ModelLayout, EngineError>;

    fn set_parameter(&mut self, handle: ModelHandle, index: usize, value: f32);

    fn parameter(&self, handle: ModelHandle, index: usize) -> Option<f32>;

    fn set_part_opacity(&mut self, handle: ModelHandle, index: usize, opacity: f32);

    /// Recompute deformation from the committed parameter values.
    fn evaluate(&mut self, handle: ModelHandle);

    /// Whether the drawable backing `region_id` contains the model-space point.
    fn hit_test(&self, handle: ModelHandle, region_id: &str, x: f32, y: f32) -> bool;

    fn release(&mut self, handle: ModelHandle);

    fn load_physics(&mut self, _handle: ModelHandle, _data: &[u8]) -> Result<(), EngineError> {
        Err(EngineError::Unsupported("physics"))
    }

    fn evaluate_physics(&mut self, _handle: ModelHandle, _parameters: &mut ParameterVector, _dt: f32) {}

    fn load_pose(&mut self, _handle: ModelHandle, _data: &[u8]) -> Result<(), EngineError> {
        Err(EngineError::Unsupported("pose"))
    }

    fn apply_pose(&mut self, _handle: ModelHandle, _parts: &mut PartOpacityVector, _dt: f32) {}

    fn load_user_data(&mut self, _handle: ModelHandle, _data: &[u8]) -> Result<(), EngineError> {
        Ok(())
    }
}
