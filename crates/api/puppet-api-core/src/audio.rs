//! Audio decode and playback contracts. No codec lives in this workspace.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("audio error: {reason}")]
pub struct AudioError {
    pub reason: String,
}

impl AudioError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// PCM samples split per channel, normalized to `[-1, 1]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodedAudio {
    pub channels: Vec<Vec<f32>>,
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn samples_per_channel(&self) -> usize {
        self.channels.iter().map(Vec::len).min().unwrap_or(0)
    }

    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples_per_channel() as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.samples_per_channel() == 0
    }
}

pub trait AudioDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedAudio, AudioError>;
}

pub trait AudioSink {
    fn play(&mut self, audio: DecodedAudio);
    fn stop(&mut self);
    fn set_volume(&mut self, volume: f32);
}

/// Sink that drops everything; used when the host provides no output.
#[derive(Debug, Default)]
pub struct NullAudioSink;

impl AudioSink for NullAudioSink {
    fn play(&mut self, _audio: DecodedAudio) {}
    fn stop(&mut self) {}
    fn set_volume(&mut self, _volume: f32) {}
}
