//! Priority-arbitrated motion queue.
//!
//! At most one motion is "current"; starting another fades every queued
//! entry out and pushes the newcomer. A priority slot can be reserved while
//! a clip is being resolved so concurrent lower-priority starts are refused.

use std::rc::Rc;

use log::trace;
use puppet_api_core::ModelState;

use crate::data::{CurveTarget, MotionData, MODEL_CHANNEL_EYE_BLINK, MODEL_CHANNEL_LIP_SYNC, MODEL_CHANNEL_OPACITY};
use crate::fade::FadeState;
use crate::ids::{IdAllocator, MotionHandle, MotionKey};
use crate::priority::PlaybackPriority;
use crate::sampling::sample_curve;

pub type MotionCallback = Box<dyn FnMut(MotionHandle, &MotionKey)>;

/// Lifecycle hooks of one playback.
#[derive(Default)]
pub struct MotionCallbacks {
    pub on_begin: Option<MotionCallback>,
    pub on_end: Option<MotionCallback>,
}

impl MotionCallbacks {
    pub fn on_begin(mut self, f: impl FnMut(MotionHandle, &MotionKey) + 'static) -> Self {
        self.on_begin = Some(Box::new(f));
        self
    }

    pub fn on_end(mut self, f: impl FnMut(MotionHandle, &MotionKey) + 'static) -> Self {
        self.on_end = Some(Box::new(f));
        self
    }
}

pub struct MotionEntry {
    pub handle: MotionHandle,
    pub key: MotionKey,
    pub auto_delete: bool,
    clip: Rc<MotionData>,
    fade: FadeState,
    callbacks: MotionCallbacks,
}

impl MotionEntry {
    pub fn clip(&self) -> &MotionData {
        &self.clip
    }

    pub fn is_fading_out(&self) -> bool {
        self.fade.fading_out
    }
}

#[derive(Default)]
pub struct MotionQueue {
    entries: Vec<MotionEntry>,
    user_time: f32,
    current_priority: PlaybackPriority,
    reserve_priority: PlaybackPriority,
    ids: IdAllocator,
    eye_blink_ids: Vec<String>,
    lip_sync_ids: Vec<String>,
}

impl MotionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters the `EyeBlink` / `LipSync` model channels of a clip drive.
    pub fn set_effect_ids(&mut self, eye_blink: Vec<String>, lip_sync: Vec<String>) {
        self.eye_blink_ids = eye_blink;
        self.lip_sync_ids = lip_sync;
    }

    pub fn current_priority(&self) -> PlaybackPriority {
        self.current_priority
    }

    pub fn reserve_priority(&self) -> PlaybackPriority {
        self.reserve_priority
    }

    /// Claim the reservation slot. Fails when `priority` does not beat both
    /// the reserved and the current priority.
    pub fn reserve(&mut self, priority: PlaybackPriority) -> bool {
        if priority <= self.reserve_priority || priority <= self.current_priority {
            return false;
        }
        self.reserve_priority = priority;
        true
    }

    pub fn force_reserve(&mut self, priority: PlaybackPriority) {
        self.reserve_priority = priority;
    }

    pub fn release_reservation(&mut self, priority: PlaybackPriority) {
        if self.reserve_priority == priority {
            self.reserve_priority = PlaybackPriority::None;
        }
    }

    /// Queue `clip` as the current motion, fading out everything else.
    pub fn start(
        &mut self,
        key: MotionKey,
        clip: Rc<MotionData>,
        priority: PlaybackPriority,
        auto_delete: bool,
        callbacks: MotionCallbacks,
    ) -> MotionHandle {
        if priority == self.reserve_priority {
            self.reserve_priority = PlaybackPriority::None;
        }
        self.current_priority = priority;

        let now = self.user_time;
        for entry in &mut self.entries {
            let fade_out = entry.clip.fade_out;
            entry.fade.start_fade_out(now, fade_out);
        }

        let handle = self.ids.alloc_motion();
        trace!("queue motion {key} as {handle:?} at {priority:?}");
        self.entries.push(MotionEntry {
            handle,
            key,
            auto_delete,
            clip,
            fade: FadeState::default(),
            callbacks,
        });
        handle
    }

    pub fn is_finished(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_playing(&self, handle: MotionHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &MotionEntry> {
        self.entries.iter()
    }

    pub fn user_time(&self) -> f32 {
        self.user_time
    }

    /// Drop every entry without firing end callbacks.
    pub fn stop_all(&mut self) {
        self.entries.clear();
        self.current_priority = PlaybackPriority::None;
        self.reserve_priority = PlaybackPriority::None;
    }

    /// Advance by `dt` and apply every entry to `state`. Returns whether any
    /// entry contributed.
    pub fn update(&mut self, state: &mut ModelState, dt: f32) -> bool {
        self.user_time += dt;
        let now = self.user_time;
        let mut updated = false;

        for entry in &mut self.entries {
            if !entry.fade.started {
                let end = entry.clip.end_time(now);
                entry.fade.begin(now, end);
                if let Some(cb) = entry.callbacks.on_begin.as_mut() {
                    cb(entry.handle, &entry.key);
                }
            }
            let clip = Rc::clone(&entry.clip);
            let weight = entry.fade.weight(now, clip.fade_in, clip.fade_out);
            apply_clip(
                &clip,
                &entry.fade,
                now,
                weight,
                state,
                &self.eye_blink_ids,
                &self.lip_sync_ids,
            );
            updated = true;
        }

        let mut finished = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].fade.is_finished(now) {
                finished.push(self.entries.remove(i));
            } else {
                i += 1;
            }
        }
        for mut entry in finished {
            trace!("motion {} finished", entry.key);
            if let Some(cb) = entry.callbacks.on_end.as_mut() {
                cb(entry.handle, &entry.key);
            }
        }

        if self.entries.is_empty() {
            self.current_priority = PlaybackPriority::None;
        }
        updated
    }
}

fn curve_weight(fade: &FadeState, now: f32, clip: &MotionData, fade_in: Option<f32>, fade_out: Option<f32>) -> Option<f32> {
    if fade_in.is_none() && fade_out.is_none() {
        return None;
    }
    Some(fade.raw_weight(
        now,
        fade_in.unwrap_or(clip.fade_in),
        fade_out.unwrap_or(clip.fade_out),
    ))
}

fn apply_clip(
    clip: &MotionData,
    fade: &FadeState,
    now: f32,
    weight: f32,
    state: &mut ModelState,
    eye_blink_ids: &[String],
    lip_sync_ids: &[String],
) {
    let mut t = now - fade.start_time;
    if clip.looped && clip.duration > 0.0 {
        t %= clip.duration;
    }

    let mut eye_blink = None;
    let mut lip_sync = None;
    for curve in clip.curves.iter().filter(|c| c.target == CurveTarget::Model) {
        let v = sample_curve(curve, t);
        match curve.id.as_str() {
            MODEL_CHANNEL_EYE_BLINK => eye_blink = Some(v),
            MODEL_CHANNEL_LIP_SYNC => lip_sync = Some(v),
            MODEL_CHANNEL_OPACITY => state.opacity = v,
            _ => {}
        }
    }

    let params = &mut state.parameters;
    let mut covered_blink = Vec::new();
    let mut covered_lip = Vec::new();
    for curve in clip.curves.iter().filter(|c| c.target == CurveTarget::Parameter) {
        let Some(index) = params.index_of(&curve.id) else {
            continue;
        };
        let Some(source) = params.value(index) else {
            continue;
        };
        let mut v = sample_curve(curve, t);
        if let Some(e) = eye_blink {
            if eye_blink_ids.iter().any(|id| *id == curve.id) {
                v *= e;
                covered_blink.push(curve.id.as_str());
            }
        }
        if let Some(l) = lip_sync {
            if lip_sync_ids.iter().any(|id| *id == curve.id) {
                v += l;
                covered_lip.push(curve.id.as_str());
            }
        }
        let w = curve_weight(fade, now, clip, curve.fade_in, curve.fade_out).unwrap_or(weight);
        params.set(index, source + (v - source) * w, 1.0);
    }

    if let Some(e) = eye_blink {
        for id in eye_blink_ids.iter().filter(|id| !covered_blink.contains(&id.as_str())) {
            if let Some(current) = params.value_by_id(id) {
                params.set_by_id(id, current * e, weight);
            }
        }
    }
    if let Some(l) = lip_sync {
        for id in lip_sync_ids.iter().filter(|id| !covered_lip.contains(&id.as_str())) {
            if let Some(current) = params.value_by_id(id) {
                params.set_by_id(id, current + l, weight);
            }
        }
    }

    for curve in clip.curves.iter().filter(|c| c.target == CurveTarget::PartOpacity) {
        state.parts.set_by_id(&curve.id, sample_curve(curve, t));
    }
}
