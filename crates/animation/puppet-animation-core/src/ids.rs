//! Identifiers for queued motions and cached clips.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle of a queued motion. [`MotionHandle::INVALID`] marks a
/// rejected start.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MotionHandle(pub u32);

impl MotionHandle {
    pub const INVALID: MotionHandle = MotionHandle(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

/// Cache key of a clip: `(group, index)`.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MotionKey {
    pub group: String,
    pub index: usize,
}

impl MotionKey {
    pub fn new(group: impl Into<String>, index: usize) -> Self {
        Self {
            group: group.into(),
            index,
        }
    }
}

impl fmt::Display for MotionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.group, self.index)
    }
}

/// Monotonic handle allocator. Skips the invalid sentinel on wrap.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_motion: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_motion(&mut self) -> MotionHandle {
        if self.next_motion == MotionHandle::INVALID.0 {
            self.next_motion = 0;
        }
        let id = MotionHandle(self.next_motion);
        self.next_motion = self.next_motion.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
