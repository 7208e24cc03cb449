//! Reference-counted start-up/dispose of the process-wide engine framework.
//!
//! Instances share one [`FrameworkLifecycle`] through an `Arc` and hold a
//! [`FrameworkLease`] while alive. The framework starts on the first lease
//! and is only disposed when the last lease is released with disposal
//! requested.

use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;

use crate::engine::EngineError;

pub trait EngineFramework: Send + Sync {
    fn start_up(&self) -> Result<(), EngineError>;
    fn dispose(&self);
}

#[derive(Debug, Default)]
struct LifecycleState {
    started: bool,
    leases: usize,
}

pub struct FrameworkLifecycle {
    framework: Box<dyn EngineFramework>,
    state: Mutex<LifecycleState>,
}

impl FrameworkLifecycle {
    pub fn new(framework: impl EngineFramework + 'static) -> Arc<Self> {
        Arc::new(Self {
            framework: Box::new(framework),
            state: Mutex::new(LifecycleState::default()),
        })
    }

    fn state(&self) -> MutexGuard<'_, LifecycleState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Take a lease, starting the framework if it is not running.
    pub fn acquire(self: &Arc<Self>) -> Result<FrameworkLease, EngineError> {
        let mut state = self.state();
        if !state.started {
            self.framework.start_up()?;
            state.started = true;
            debug!("engine framework started");
        }
        state.leases += 1;
        Ok(FrameworkLease {
            lifecycle: Arc::clone(self),
            released: false,
        })
    }

    pub fn is_started(&self) -> bool {
        self.state().started
    }

    pub fn lease_count(&self) -> usize {
        self.state().leases
    }

    fn release_one(&self, dispose_if_last: bool) -> bool {
        let mut state = self.state();
        state.leases = state.leases.saturating_sub(1);
        if dispose_if_last && state.leases == 0 && state.started {
            self.framework.dispose();
            state.started = false;
            debug!("engine framework disposed");
            return true;
        }
        false
    }
}

pub struct FrameworkLease {
    lifecycle: Arc<FrameworkLifecycle>,
    released: bool,
}

impl FrameworkLease {
    /// Give the lease back. Returns whether the framework was disposed.
    pub fn release(mut self, dispose_if_last: bool) -> bool {
        self.released = true;
        self.lifecycle.release_one(dispose_if_last)
    }
}

impl Drop for FrameworkLease {
    fn drop(&mut self) {
        if !self.released {
            self.lifecycle.release_one(false);
        }
    }
}
