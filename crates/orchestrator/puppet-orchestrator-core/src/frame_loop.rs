//! Refresh-driven repeating tick with a cancellable pending request.

use puppet_api_core::{Clock, CountingRefresh, FrameRequest, RefreshSignal, SystemClock};

pub struct FrameLoop {
    clock: Box<dyn Clock>,
    refresh: Box<dyn RefreshSignal>,
    pending: Option<FrameRequest>,
    last_time: Option<f64>,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(Box::new(SystemClock::new()), Box::new(CountingRefresh::default()))
    }
}

impl FrameLoop {
    pub fn new(clock: Box<dyn Clock>, refresh: Box<dyn RefreshSignal>) -> Self {
        Self {
            clock,
            refresh,
            pending: None,
            last_time: None,
        }
    }

    pub fn set_clock(&mut self, clock: Box<dyn Clock>) {
        self.clock = clock;
        self.last_time = None;
    }

    /// Swapping the signal cancels the outstanding request on the old one.
    pub fn set_refresh(&mut self, refresh: Box<dyn RefreshSignal>) {
        let rescheduled = self.cancel();
        self.refresh = refresh;
        if rescheduled {
            self.schedule();
        }
    }

    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    /// Ask for the next frame unless one is already outstanding.
    pub fn schedule(&mut self) -> FrameRequest {
        match self.pending {
            Some(request) => request,
            None => {
                let request = self.refresh.request_frame();
                self.pending = Some(request);
                request
            }
        }
    }

    /// Consume `request` if it is the outstanding one.
    pub fn begin(&mut self, request: FrameRequest) -> bool {
        if self.pending == Some(request) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Returns whether a request was outstanding.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(request) => {
                self.refresh.cancel_frame(request);
                true
            }
            None => false,
        }
    }

    /// Seconds since the previous call; zero on the first.
    pub fn delta(&mut self) -> f32 {
        let now = self.clock.now_seconds();
        let dt = self.last_time.map(|t| (now - t).max(0.0)).unwrap_or(0.0);
        self.last_time = Some(now);
        dt as f32
    }
}
