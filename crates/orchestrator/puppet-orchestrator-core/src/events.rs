//! Outbound notifications.

use serde::{Deserialize, Serialize};

/// Emitted once per qualifying pointer release.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HitEvent {
    /// Names of every hit area containing the release point.
    pub regions: Vec<String>,
    /// Release point in view space.
    pub x: f32,
    pub y: f32,
}

impl HitEvent {
    pub fn contains(&self, region: &str) -> bool {
        self.regions.iter().any(|r| r == region)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type HitListener = Box<dyn FnMut(&HitEvent)>;

#[derive(Default)]
pub struct EventListeners {
    next: u64,
    hit: Vec<(ListenerId, HitListener)>,
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_hit(&mut self, listener: impl FnMut(&HitEvent) + 'static) -> ListenerId {
        self.next = self.next.wrapping_add(1);
        let id = ListenerId(self.next);
        self.hit.push((id, Box::new(listener)));
        id
    }

    pub fn off_hit(&mut self, id: ListenerId) -> bool {
        let before = self.hit.len();
        self.hit.retain(|(l, _)| *l != id);
        self.hit.len() != before
    }

    pub fn emit_hit(&mut self, event: &HitEvent) {
        for (_, listener) in &mut self.hit {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.hit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hit.is_empty()
    }

    pub fn clear(&mut self) {
        self.hit.clear();
    }
}
