//! Motion playback front: resolves clips through the library and arbitrates
//! them through the queue.

use std::rc::Rc;

use log::debug;
use puppet_api_core::ModelState;
use puppet_assets_core::ModelBundle;
use rand::Rng;

use crate::config::AnimationConfig;
use crate::error::PlaybackError;
use crate::ids::{MotionHandle, MotionKey};
use crate::library::MotionLibrary;
use crate::priority::PlaybackPriority;
use crate::queue::MotionQueue;

pub use crate::queue::{MotionCallback, MotionCallbacks};

/// A successfully queued motion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartedMotion {
    pub handle: MotionHandle,
    pub key: MotionKey,
    /// The clip's group carries a voice track the caller should start.
    pub has_voice: bool,
}

pub struct MotionPlayer {
    library: MotionLibrary,
    queue: MotionQueue,
}

impl MotionPlayer {
    pub fn new(bundle: Rc<ModelBundle>, config: &AnimationConfig) -> Self {
        let mut library = MotionLibrary::new(bundle, config);
        if config.preload_motions {
            library.preload_all();
        }
        Self {
            library,
            queue: MotionQueue::new(),
        }
    }

    pub fn set_effect_ids(&mut self, eye_blink: Vec<String>, lip_sync: Vec<String>) {
        self.queue.set_effect_ids(eye_blink, lip_sync);
    }

    pub fn library(&self) -> &MotionLibrary {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut MotionLibrary {
        &mut self.library
    }

    pub fn queue(&self) -> &MotionQueue {
        &self.queue
    }

    /// Start clip `index` of `group`.
    ///
    /// `Force` always takes the reservation slot; other priorities must beat
    /// both the reserved and the current priority. A reservation taken here
    /// is released again if the clip cannot be resolved.
    pub fn start_motion(
        &mut self,
        group: &str,
        index: usize,
        priority: PlaybackPriority,
        callbacks: MotionCallbacks,
    ) -> Result<StartedMotion, PlaybackError> {
        if priority == PlaybackPriority::Force {
            self.queue.force_reserve(priority);
        } else if !self.queue.reserve(priority) {
            debug!("motion {group}_{index} refused at {priority:?}");
            return Err(PlaybackError::PriorityRejected);
        }

        let key = MotionKey::new(group, index);
        let (clip, auto_delete) = match self.library.get_or_decode(&key) {
            Ok(found) => found,
            Err(e) => {
                self.queue.release_reservation(priority);
                return Err(e);
            }
        };

        let handle = self.queue.start(key.clone(), clip, priority, auto_delete, callbacks);
        debug!("motion {key} started as {handle:?}");
        Ok(StartedMotion {
            handle,
            has_voice: self.library.voice(group).is_some(),
            key,
        })
    }

    /// Start a uniformly chosen clip of `group`, or of a uniformly chosen
    /// group when `group` is `None`.
    pub fn start_random_motion<R: Rng + ?Sized>(
        &mut self,
        group: Option<&str>,
        priority: PlaybackPriority,
        callbacks: MotionCallbacks,
        rng: &mut R,
    ) -> Result<StartedMotion, PlaybackError> {
        let group = match group {
            Some(g) => g.to_string(),
            None => {
                let names = self.library.group_names();
                if names.is_empty() {
                    return Err(PlaybackError::NoGroups);
                }
                names[rng.gen_range(0..names.len())].to_string()
            }
        };
        let count = self
            .library
            .group_len(&group)
            .ok_or_else(|| PlaybackError::GroupNotFound {
                group: group.clone(),
            })?;
        if count == 0 {
            return Err(PlaybackError::EmptyGroup { group });
        }
        let index = rng.gen_range(0..count);
        self.start_motion(&group, index, priority, callbacks)
    }

    pub fn update(&mut self, state: &mut ModelState, dt: f32) -> bool {
        self.queue.update(state, dt)
    }

    pub fn is_finished(&self) -> bool {
        self.queue.is_finished()
    }

    pub fn is_playing(&self, handle: MotionHandle) -> bool {
        self.queue.is_playing(handle)
    }

    pub fn stop_all(&mut self) {
        self.queue.stop_all();
    }

    pub fn current_priority(&self) -> PlaybackPriority {
        self.queue.current_priority()
    }
}
