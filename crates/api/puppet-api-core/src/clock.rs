//! Time source and refresh-signal contracts for the frame loop.

use std::time::Instant;

pub trait Clock {
    /// Monotonic seconds since an arbitrary origin.
    fn now_seconds(&self) -> f64;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_seconds(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Token identifying one scheduled refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// Host refresh signal (vsync, timer, ...). The runtime asks for one frame at
/// a time and cancels the outstanding request on teardown.
pub trait RefreshSignal {
    fn request_frame(&mut self) -> FrameRequest;
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Hands out increasing request ids and nothing else. The host drives frames
/// by calling back into the runtime with the pending request.
#[derive(Debug, Default)]
pub struct CountingRefresh {
    next: u64,
}

impl RefreshSignal for CountingRefresh {
    fn request_frame(&mut self) -> FrameRequest {
        self.next = self.next.wrapping_add(1);
        FrameRequest(self.next)
    }

    fn cancel_frame(&mut self, _request: FrameRequest) {}
}
