//! One tick of the parameter pipeline.
//!
//! Order: camera, checkpoint, motion, expression, then (unless paused) drag,
//! eye blink, movement, breath, physics, lipsync and pose, and finally the
//! commit and draw. Every layer past the camera is optional and gated by its
//! feature flag.
//!
//! The parameter vector is restored to the checkpoint right after the commit,
//! so every frame blends onto the same baseline.

use log::trace;
use puppet_api_core::ids::{
    PARAM_ANGLE_X, PARAM_ANGLE_Y, PARAM_ANGLE_Z, PARAM_BODY_ANGLE_X, PARAM_EYE_BALL_X, PARAM_EYE_BALL_Y,
};
use puppet_api_core::{ModelEngine, ModelHandle, ModelState, RenderSurface, Viewport};

use crate::config::FeatureFlags;
use crate::controllers::{DragSource, EnvelopeSource, ParameterEffect, StateLayer};
use crate::diagnostics::{FrameReport, FrameStep};

/// Blend factor pulling the mouth toward the new envelope value.
const LIPSYNC_WEIGHT: f32 = 0.8;

#[derive(Default)]
pub struct FrameLayers<'a> {
    pub motion: Option<&'a mut dyn StateLayer>,
    pub expression: Option<&'a mut dyn StateLayer>,
    pub drag: Option<&'a mut dyn DragSource>,
    pub eye_blink: Option<&'a mut dyn ParameterEffect>,
    pub breath: Option<&'a mut dyn ParameterEffect>,
    pub lipsync: Option<&'a mut dyn EnvelopeSource>,
    /// Parameter indices the envelope drives.
    pub lip_sync_indices: &'a [usize],
}

pub struct FrameTarget<'a> {
    pub engine: &'a mut dyn ModelEngine,
    pub surface: &'a mut dyn RenderSurface,
    pub handle: ModelHandle,
    pub viewport: Viewport,
    pub mvp: [f32; 16],
    pub physics: bool,
    pub pose: bool,
}

pub fn run_frame(
    epoch: u64,
    dt: f32,
    state: &mut ModelState,
    layers: FrameLayers<'_>,
    target: FrameTarget<'_>,
    flags: &FeatureFlags,
    paused: bool,
) -> FrameReport {
    let mut report = FrameReport::new(epoch, dt);
    report.record(FrameStep::Time);
    report.record(FrameStep::Camera);

    state.parameters.save();
    report.record(FrameStep::Checkpoint);

    let mut motion_updated = false;
    if let Some(motion) = layers.motion.filter(|_| flags.enable_motion) {
        motion_updated = motion.advance(state, dt);
        report.record(FrameStep::Motion);
    }
    report.motion_updated = motion_updated;

    if let Some(expression) = layers.expression.filter(|_| flags.enable_expression) {
        expression.advance(state, dt);
        report.record(FrameStep::Expression);
    }

    if paused {
        trace!("frame {epoch}: paused, effects skipped");
    } else {
        let mut drag = (0.0, 0.0);
        if let Some(source) = layers.drag {
            drag = source.advance(dt);
            report.record(FrameStep::Drag);
        }
        if !motion_updated {
            if let Some(blink) = layers.eye_blink.filter(|_| flags.enable_eye_blink) {
                blink.apply(&mut state.parameters, dt);
                report.record(FrameStep::EyeBlink);
            }
        }
        if flags.enable_movement {
            apply_movement(state, drag);
            report.record(FrameStep::Movement);
        }
        if let Some(breath) = layers.breath.filter(|_| flags.enable_breath) {
            breath.apply(&mut state.parameters, dt);
            report.record(FrameStep::Breath);
        }
        if target.physics && flags.enable_physics {
            target.engine.evaluate_physics(target.handle, &mut state.parameters, dt);
            report.record(FrameStep::Physics);
        }
        if let Some(lipsync) = layers.lipsync.filter(|_| flags.enable_lipsync) {
            if lipsync.is_active() {
                let envelope = lipsync.envelope(dt);
                for &index in layers.lip_sync_indices {
                    if let Some(p) = state.parameters.get(index) {
                        let value = p.min + (p.max - p.min) * envelope;
                        state.parameters.set(index, value, LIPSYNC_WEIGHT);
                    }
                }
                report.envelope = Some(envelope);
                report.record(FrameStep::Lipsync);
            }
        }
        if target.pose && flags.enable_pose {
            target.engine.apply_pose(target.handle, &mut state.parts, dt);
            report.record(FrameStep::Pose);
        }
    }

    commit(state, target.engine, target.handle);
    state.parameters.load();
    report.record(FrameStep::Commit);
    target.surface.prepare();
    target.surface.submit_draw(target.handle, target.viewport, &target.mvp);
    report.record(FrameStep::Draw);
    report
}

/// Drag-follow offsets added onto head, body and eye parameters.
fn apply_movement(state: &mut ModelState, (dx, dy): (f32, f32)) {
    let p = &mut state.parameters;
    p.add_by_id(PARAM_ANGLE_X, dx * 30.0, 1.0);
    p.add_by_id(PARAM_ANGLE_Y, dy * 30.0, 1.0);
    p.add_by_id(PARAM_ANGLE_Z, dx * dy * -30.0, 1.0);
    p.add_by_id(PARAM_BODY_ANGLE_X, dx * 10.0, 1.0);
    p.add_by_id(PARAM_EYE_BALL_X, dx, 1.0);
    p.add_by_id(PARAM_EYE_BALL_Y, dy, 1.0);
}

fn commit(state: &ModelState, engine: &mut dyn ModelEngine, handle: ModelHandle) {
    for (index, p) in state.parameters.iter().enumerate() {
        engine.set_parameter(handle, index, p.value);
    }
    for (index, part) in state.parts.iter().enumerate() {
        engine.set_part_opacity(handle, index, part.opacity);
    }
    engine.evaluate(handle);
}
