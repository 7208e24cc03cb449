//! puppet-api-core: parameter vectors, model state and the contracts of the
//! external collaborators (evaluation engine, render surface, audio, clock).
//!
//! Every other crate in the workspace speaks in these types. Nothing here
//! interprets topology bytes or rasterizes anything; those live behind the
//! [`ModelEngine`] and [`RenderSurface`] traits.

pub mod audio;
pub mod blend;
pub mod clock;
pub mod engine;
pub mod ids;
pub mod lifecycle;
pub mod parameters;
pub mod surface;

pub use audio::{AudioDecoder, AudioError, AudioSink, DecodedAudio, NullAudioSink};
pub use blend::BlendMode;
pub use clock::{Clock, CountingRefresh, FrameRequest, RefreshSignal, SystemClock};
pub use engine::{CanvasInfo, EngineError, ModelEngine, ModelHandle, ModelLayout};
pub use lifecycle::{EngineFramework, FrameworkLease, FrameworkLifecycle};
pub use parameters::{ModelState, Parameter, ParameterVector, PartOpacity, PartOpacityVector};
pub use surface::{PixelBuffer, RenderSurface, TextureImage, Viewport};
