//! puppet-orchestrator
//!
//! Composes a loaded puppet into a running avatar: the per-frame parameter
//! pipeline, the camera and its auto-framing, pointer input and hit tests,
//! the lipsync envelope and the refresh-driven frame loop. Engine, surface,
//! audio and clock are supplied by the host through the traits of
//! `puppet-api-core`.

pub mod camera;
pub mod config;
pub mod controllers;
pub mod diagnostics;
pub mod error;
pub mod events;
pub mod frame_loop;
pub mod framing;
pub mod runtime;
pub mod scheduler;
pub mod touch;
pub mod viewport;

pub use crate::camera::{Camera, CameraLimits, CameraState};
pub use crate::config::{FeatureFlags, RuntimeOptions};
pub use crate::controllers::LipsyncEngine;
pub use crate::diagnostics::{FrameReport, FrameStep, SkipReason};
pub use crate::error::RuntimeError;
pub use crate::events::{HitEvent, ListenerId};
pub use crate::framing::CharacterPosition;
pub use crate::runtime::{Runtime, TapOutcome};
pub use crate::viewport::{ModelMatrix, ViewTransform};
