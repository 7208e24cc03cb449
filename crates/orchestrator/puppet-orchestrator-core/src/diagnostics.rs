use serde::{Deserialize, Serialize};

/// Pipeline stages in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameStep {
    Time,
    Camera,
    Checkpoint,
    Motion,
    Expression,
    Drag,
    EyeBlink,
    Movement,
    Breath,
    Physics,
    Lipsync,
    Pose,
    Commit,
    Draw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    NotLoaded,
    ContextLost,
}

/// What one tick did.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub epoch: u64,
    pub dt: f32,
    pub steps: Vec<FrameStep>,
    pub motion_updated: bool,
    pub envelope: Option<f32>,
    pub skipped: Option<SkipReason>,
}

impl FrameReport {
    pub fn new(epoch: u64, dt: f32) -> Self {
        Self {
            epoch,
            dt,
            ..Self::default()
        }
    }

    pub fn skipped(epoch: u64, dt: f32, reason: SkipReason) -> Self {
        Self {
            skipped: Some(reason),
            ..Self::new(epoch, dt)
        }
    }

    pub fn record(&mut self, step: FrameStep) {
        self.steps.push(step);
    }

    pub fn ran(&self, step: FrameStep) -> bool {
        self.steps.contains(&step)
    }
}
