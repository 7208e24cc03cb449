//! Loudness envelope tracked against a wall-clock playback position.

use log::debug;
use puppet_api_core::DecodedAudio;

use super::EnvelopeSource;

const GAIN: f32 = 5.0;

#[derive(Debug, Default)]
pub struct LipsyncEngine {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
    samples_per_channel: usize,
    playback_clock: f64,
    previous_offset: usize,
    previous_envelope: f32,
    envelope: f32,
    smoothing: f32,
}

impl LipsyncEngine {
    pub fn new(smoothing: f32) -> Self {
        Self {
            smoothing: smoothing.clamp(0.0, 1.0),
            ..Self::default()
        }
    }

    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.smoothing = smoothing.clamp(0.0, 1.0);
    }

    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    /// Track `audio` from its first sample.
    pub fn start(&mut self, audio: &DecodedAudio) {
        self.samples_per_channel = audio.samples_per_channel();
        self.channels = audio
            .channels
            .iter()
            .map(|c| c[..self.samples_per_channel].to_vec())
            .collect();
        self.sample_rate = audio.sample_rate;
        self.playback_clock = 0.0;
        self.previous_offset = 0;
        self.previous_envelope = 0.0;
        self.envelope = 0.0;
        debug!(
            "lipsync started: {} channel(s), {} samples at {} Hz",
            self.channels.len(),
            self.samples_per_channel,
            self.sample_rate
        );
    }

    pub fn stop(&mut self) {
        self.channels.clear();
        self.samples_per_channel = 0;
        self.previous_offset = 0;
        self.previous_envelope = 0.0;
        self.envelope = 0.0;
    }

    pub fn is_active(&self) -> bool {
        !self.channels.is_empty() && self.sample_rate > 0 && self.previous_offset < self.samples_per_channel
    }

    pub fn playback_clock(&self) -> f64 {
        self.playback_clock
    }

    pub fn previous_offset(&self) -> usize {
        self.previous_offset
    }

    pub fn envelope(&self) -> f32 {
        self.envelope
    }

    /// Advance the playback clock and return the new envelope in `[0, 1]`.
    pub fn update(&mut self, dt: f32) -> f32 {
        if !self.is_active() {
            self.previous_envelope = 0.0;
            self.envelope = 0.0;
            return 0.0;
        }
        self.playback_clock += f64::from(dt.max(0.0));
        let goal = ((self.playback_clock * f64::from(self.sample_rate)).floor() as usize)
            .min(self.samples_per_channel);

        let raw = self.window_rms(self.previous_offset, goal);
        self.previous_offset = goal;

        let alpha = self.smoothing;
        let value = if alpha == 0.0 {
            raw
        } else {
            self.previous_envelope * (1.0 - alpha) + raw * alpha
        };
        self.previous_envelope = value;
        self.envelope = value.clamp(0.0, 1.0);
        self.envelope
    }

    fn window_rms(&self, from: usize, to: usize) -> f32 {
        if to <= from {
            return 0.0;
        }
        let mut sum = 0.0f32;
        for channel in &self.channels {
            sum += channel[from..to].iter().map(|s| s * s).sum::<f32>();
        }
        let count = ((to - from) * self.channels.len()) as f32;
        ((sum / count).sqrt() * GAIN).clamp(0.0, 1.0)
    }
}

impl EnvelopeSource for LipsyncEngine {
    fn is_active(&self) -> bool {
        LipsyncEngine::is_active(self)
    }

    fn envelope(&mut self, dt: f32) -> f32 {
        self.update(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tone(rate: u32, seconds: f32, amplitude: f32) -> DecodedAudio {
        let n = (rate as f32 * seconds) as usize;
        DecodedAudio {
            channels: vec![vec![amplitude; n], vec![-amplitude; n]],
            sample_rate: rate,
        }
    }

    #[test]
    fn gain_and_clamp() {
        let mut lip = LipsyncEngine::new(0.0);
        lip.start(&tone(1000, 1.0, 0.1));
        assert_relative_eq!(lip.update(0.1), 0.5, epsilon = 1e-5);
        lip.start(&tone(1000, 1.0, 0.9));
        assert_eq!(lip.update(0.1), 1.0);
    }

    #[test]
    fn smoothing_blends_toward_raw() {
        let mut lip = LipsyncEngine::new(0.5);
        lip.start(&tone(1000, 1.0, 0.1));
        assert_relative_eq!(lip.update(0.1), 0.25, epsilon = 1e-5);
        assert_relative_eq!(lip.update(0.1), 0.375, epsilon = 1e-5);
    }

    #[test]
    fn decays_to_zero_after_the_clip_and_restarts() {
        let mut lip = LipsyncEngine::new(0.1);
        lip.start(&tone(1000, 0.2, 0.1));
        lip.update(0.1);
        lip.update(0.15);
        assert!(!lip.is_active());
        assert_eq!(lip.update(0.1), 0.0);
        assert_eq!(lip.update(0.1), 0.0);

        lip.start(&tone(1000, 0.2, 0.1));
        assert_eq!(lip.previous_offset(), 0);
        assert_eq!(lip.playback_clock(), 0.0);
        assert!(lip.is_active());
        assert!(lip.update(0.05) > 0.0);
    }

    #[test]
    fn empty_window_reads_silence() {
        let mut lip = LipsyncEngine::new(0.0);
        lip.start(&tone(10, 1.0, 0.1));
        // 0.05 s at 10 Hz rounds down to no new sample.
        assert_eq!(lip.update(0.05), 0.0);
        assert!(lip.is_active());
    }
}
