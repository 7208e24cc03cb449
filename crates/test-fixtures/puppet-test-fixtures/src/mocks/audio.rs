use std::cell::RefCell;
use std::rc::Rc;

use puppet_api_core::{AudioDecoder, AudioError, AudioSink, DecodedAudio};

#[derive(Debug, Default)]
pub struct AudioLog {
    /// Samples per channel of every clip handed to `play`.
    pub played: Vec<usize>,
    pub stops: usize,
    pub volume: Option<f32>,
}

/// Sink that records calls. Clones share one log.
#[derive(Clone, Debug, Default)]
pub struct RecordingAudioSink {
    log: Rc<RefCell<AudioLog>>,
}

impl RecordingAudioSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<usize> {
        self.log.borrow().played.clone()
    }

    pub fn stops(&self) -> usize {
        self.log.borrow().stops
    }

    pub fn volume(&self) -> Option<f32> {
        self.log.borrow().volume
    }
}

impl AudioSink for RecordingAudioSink {
    fn play(&mut self, audio: DecodedAudio) {
        self.log.borrow_mut().played.push(audio.samples_per_channel());
    }

    fn stop(&mut self) {
        self.log.borrow_mut().stops += 1;
    }

    fn set_volume(&mut self, volume: f32) {
        self.log.borrow_mut().volume = Some(volume);
    }
}

/// Decoder that ignores its input and returns a prepared clip.
#[derive(Clone, Debug)]
pub struct StubDecoder {
    audio: Option<DecodedAudio>,
}

impl StubDecoder {
    /// Constant-magnitude mono clip: the RMS of any window equals `amplitude`.
    pub fn tone(sample_rate: u32, seconds: f32, amplitude: f32) -> Self {
        let n = (sample_rate as f32 * seconds) as usize;
        let samples = (0..n)
            .map(|i| if i % 2 == 0 { amplitude } else { -amplitude })
            .collect();
        Self {
            audio: Some(DecodedAudio {
                channels: vec![samples],
                sample_rate,
            }),
        }
    }

    pub fn failing() -> Self {
        Self { audio: None }
    }

    pub fn audio(&self) -> Option<&DecodedAudio> {
        self.audio.as_ref()
    }
}

impl AudioDecoder for StubDecoder {
    fn decode(&self, _bytes: &[u8]) -> Result<DecodedAudio, AudioError> {
        self.audio
            .clone()
            .ok_or_else(|| AudioError::new("stub decoder has no clip"))
    }
}
