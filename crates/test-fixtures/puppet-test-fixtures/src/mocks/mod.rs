//! In-memory doubles for the collaborator traits of `puppet-api-core`.

mod audio;
mod clock;
mod engine;
mod surface;

pub use audio::{AudioLog, RecordingAudioSink, StubDecoder};
pub use clock::{ManualClock, ManualRefresh, RefreshLog};
pub use engine::{default_layout, MockEngine, Rect};
pub use surface::{DrawCall, MockSurface};
