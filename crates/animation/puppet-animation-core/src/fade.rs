//! Fade-in/fade-out bookkeeping shared by motion and expression entries.

use puppet_api_core::blend::easing_sine;

/// Timing of one queued entry in queue-local seconds.
#[derive(Clone, Debug)]
pub struct FadeState {
    pub started: bool,
    pub start_time: f32,
    pub fade_in_start: f32,
    /// `None` while the entry has no end.
    pub end_time: Option<f32>,
    pub fading_out: bool,
    last_weight: f32,
}

impl Default for FadeState {
    fn default() -> Self {
        Self {
            started: false,
            start_time: 0.0,
            fade_in_start: 0.0,
            end_time: None,
            fading_out: false,
            last_weight: 1.0,
        }
    }
}

impl FadeState {
    /// Called on the first update of an entry. An end time already set by an
    /// early fade-out is kept.
    pub fn begin(&mut self, now: f32, natural_end: Option<f32>) {
        self.started = true;
        self.start_time = now;
        self.fade_in_start = now;
        if self.end_time.is_none() {
            self.end_time = natural_end;
        }
    }

    /// End no later than `now + seconds`.
    pub fn start_fade_out(&mut self, now: f32, seconds: f32) {
        let end = now + seconds.max(0.0);
        self.end_time = Some(match self.end_time {
            Some(existing) if existing < end => existing,
            _ => end,
        });
        self.fading_out = true;
    }

    /// Product of the eased fade-in and fade-out factors.
    pub fn raw_weight(&self, now: f32, fade_in: f32, fade_out: f32) -> f32 {
        let fin = if fade_in <= 0.0 {
            1.0
        } else {
            easing_sine((now - self.fade_in_start) / fade_in)
        };
        let fout = match self.end_time {
            Some(end) if fade_out > 0.0 => easing_sine((end - now) / fade_out),
            _ => 1.0,
        };
        fin * fout
    }

    /// Entry weight for this frame. Once the fade-out window is reached the
    /// weight never increases again.
    pub fn weight(&mut self, now: f32, fade_in: f32, fade_out: f32) -> f32 {
        let mut w = self.raw_weight(now, fade_in, fade_out);
        let in_fade_out = match self.end_time {
            Some(end) => self.fading_out || now >= end - fade_out,
            None => false,
        };
        if in_fade_out {
            w = w.min(self.last_weight);
        }
        self.last_weight = w;
        w
    }

    pub fn is_finished(&self, now: f32) -> bool {
        matches!(self.end_time, Some(end) if end < now)
    }
}
