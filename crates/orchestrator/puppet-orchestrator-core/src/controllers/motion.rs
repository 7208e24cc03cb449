//! Motion layer with idle fallback.

use log::{debug, trace};
use puppet_animation_core::{
    MotionCallbacks, MotionPlayer, PlaybackError, PlaybackPriority, StartedMotion,
};
use puppet_api_core::ids::MOTION_GROUP_IDLE;
use puppet_api_core::ModelState;
use rand::rngs::StdRng;

use super::StateLayer;

pub struct MotionController {
    player: MotionPlayer,
    rng: StdRng,
    /// Idle fallback draws from every group instead of `Idle`.
    pub random_motion: bool,
    pending_voice: Option<String>,
}

impl MotionController {
    pub fn new(player: MotionPlayer, rng: StdRng, random_motion: bool) -> Self {
        Self {
            player,
            rng,
            random_motion,
            pending_voice: None,
        }
    }

    pub fn player(&self) -> &MotionPlayer {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut MotionPlayer {
        &mut self.player
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Group whose voice track should start, set by the last start.
    pub fn take_pending_voice(&mut self) -> Option<String> {
        self.pending_voice.take()
    }

    fn note(&mut self, started: StartedMotion) -> StartedMotion {
        if started.has_voice {
            self.pending_voice = Some(started.key.group.clone());
        }
        started
    }

    pub fn start(
        &mut self,
        group: &str,
        index: usize,
        priority: PlaybackPriority,
        callbacks: MotionCallbacks,
    ) -> Result<StartedMotion, PlaybackError> {
        let started = self.player.start_motion(group, index, priority, callbacks)?;
        Ok(self.note(started))
    }

    pub fn start_random(
        &mut self,
        group: Option<&str>,
        priority: PlaybackPriority,
        callbacks: MotionCallbacks,
    ) -> Result<StartedMotion, PlaybackError> {
        let started = self
            .player
            .start_random_motion(group, priority, callbacks, &mut self.rng)?;
        Ok(self.note(started))
    }

    pub fn stop_all(&mut self) {
        self.player.stop_all();
        self.pending_voice = None;
    }

    fn start_idle(&mut self) {
        let group = if self.random_motion {
            None
        } else {
            Some(MOTION_GROUP_IDLE)
        };
        match self.start_random(group, PlaybackPriority::Idle, MotionCallbacks::default()) {
            Ok(started) => debug!("idle motion {}", started.key),
            Err(PlaybackError::PriorityRejected) => {}
            Err(e) => trace!("no idle motion: {e}"),
        }
    }
}

impl StateLayer for MotionController {
    /// An empty queue starts an idle clip, which first applies next tick.
    fn advance(&mut self, state: &mut ModelState, dt: f32) -> bool {
        if self.player.is_finished() {
            self.start_idle();
            return false;
        }
        self.player.update(state, dt)
    }
}
