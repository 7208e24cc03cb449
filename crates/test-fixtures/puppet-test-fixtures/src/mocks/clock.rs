use std::cell::{Cell, RefCell};
use std::rc::Rc;

use puppet_api_core::{Clock, FrameRequest, RefreshSignal};

/// Clock advanced by hand. Clones share one time value.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn now_seconds(&self) -> f64 {
        self.now.get()
    }
}

#[derive(Debug, Default)]
pub struct RefreshLog {
    pub requested: Vec<FrameRequest>,
    pub cancelled: Vec<FrameRequest>,
}

/// Refresh signal that only records. Clones share one log.
#[derive(Clone, Debug, Default)]
pub struct ManualRefresh {
    log: Rc<RefCell<RefreshLog>>,
}

impl ManualRefresh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requested(&self) -> Vec<FrameRequest> {
        self.log.borrow().requested.clone()
    }

    pub fn cancelled(&self) -> Vec<FrameRequest> {
        self.log.borrow().cancelled.clone()
    }
}

impl RefreshSignal for ManualRefresh {
    fn request_frame(&mut self) -> FrameRequest {
        let mut log = self.log.borrow_mut();
        let request = FrameRequest(log.requested.len() as u64 + 1);
        log.requested.push(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.log.borrow_mut().cancelled.push(request);
    }
}
