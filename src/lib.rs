//! # WAVY - Adaptive Layered Music Playback
//!
//! Plays songs built from a master layer and any number of synchronized
//! secondary layers, for games and other interactive hosts.
//!
//! ## Architecture
//!
//! WAVY is an umbrella crate that coordinates:
//! - **wavy-core** - Output voice traits, song model, song library, configuration
//! - **wavy-player** - Track pool, fades, loop scheduling, the `Player`
//!
//! ## Quick Start
//!
//! ```ignore
//! use wavy::prelude::*;
//!
//! let device = VirtualDevice::new();
//! let clock = device.clock();
//! let mut player = Player::builder(device).lookahead(1.0).build();
//!
//! let battle = player.library_mut().register(
//!     SongSpec::new("battle", master)
//!         .layer(drums)
//!         .layer(brass)
//!         .loop_point(64.0),
//! )?;
//!
//! player.play(battle, &[0])?;
//! player.set_layers("battle", 2.0, &[0, 1, 2])?;
//!
//! // Once per frame
//! clock.advance(dt);
//! player.update(dt);
//! ```
//!
//! A real host implements [`OutputDevice`] over its audio backend; the
//! [`VirtualDevice`] plays nothing and is driven by a manual clock.

/// Re-export of wavy-core for direct access
pub use wavy_core as core;

/// Re-export of wavy-player for direct access
pub use wavy_player as player;

// Core types
pub use wavy_core::{
    // Song model
    AudioClip,
    // Error
    Error,
    // Output abstraction
    OutputDevice,
    OutputVoice,
    // Configuration
    PlayerConfig,
    ReplayPolicy,
    Result,
    SongId,
    SongLibrary,
    SongMarker,
    SongRef,
    SongSpec,
    // Headless device
    VirtualClock,
    VirtualDevice,
    VirtualVoice,
    VoiceProbe,
};

// Playback
pub use wavy_player::{
    FadeCallback, FadeId, LayerSet, Player, PlayerBuilder, PlayerEvent, Track, TrackId, TrackPool,
};

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{Player, PlayerBuilder, PlayerEvent};

    pub use crate::core::{
        AudioClip, OutputDevice, OutputVoice, PlayerConfig, ReplayPolicy, SongId, SongLibrary,
        SongSpec, VirtualClock, VirtualDevice,
    };
}
