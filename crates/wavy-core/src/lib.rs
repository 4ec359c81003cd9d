//! Core types for the WAVY music engine.
//!
//! Everything the playback orchestration consumes but does not own:
//!
//! - **Output abstraction**: [`OutputDevice`] / [`OutputVoice`], plus the
//!   headless [`VirtualDevice`] for offline hosts and tests
//! - **Song model**: [`AudioClip`], [`SongSpec`], [`SongMarker`]
//! - **Song provider**: [`SongLibrary`] resolving [`SongRef`]s to [`SongId`]s
//! - **Configuration**: [`PlayerConfig`], loadable from TOML
//!
//! # Example
//!
//! ```ignore
//! use wavy_core::{AudioClip, SongLibrary, SongSpec};
//!
//! let mut library = SongLibrary::new();
//! let id = library.register(
//!     SongSpec::new("overworld", master_clip)
//!         .layer(drums_clip)
//!         .loop_point(48.0),
//! )?;
//! assert_eq!(library.id_of("overworld")?, id);
//! ```

pub mod error;
pub use error::{Error, Result};

mod clip;
mod config;
mod library;
mod song;
mod virtual_device;
mod voice;

pub use clip::AudioClip;
pub use config::{PlayerConfig, ReplayPolicy};
pub use library::{SongId, SongLibrary, SongRef};
pub use song::{SongMarker, SongSpec};
pub use virtual_device::{VirtualClock, VirtualDevice, VirtualVoice, VoiceProbe};
pub use voice::{OutputDevice, OutputVoice};
