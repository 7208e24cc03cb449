//! puppet-assets-core: turns a bundle reference into a fully fetched
//! [`ModelBundle`].
//!
//! A reference is either a loose settings document (artifacts resolved
//! relative to its directory) or a zip container holding the same files.
//! Nothing here evaluates the topology; bytes are handed over untouched,
//! except textures which are decoded to RGBA.

pub mod bundle;
pub mod container;
pub mod error;
pub mod loader;
pub mod settings;
pub mod source;
pub mod texture;

pub use bundle::{ExpressionBuffer, ModelBundle, MotionGroupBuffers};
pub use container::{is_puppet_container, sniff, Archive, ContainerKind};
pub use error::LoadError;
pub use loader::load_bundle;
pub use settings::{HitArea, HotkeySettings, ModelSettings};
pub use source::{BundleSource, FileSource, MemorySource};
