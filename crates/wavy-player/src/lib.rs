//! Layered song playback.
//!
//! Plays songs made of a master layer plus synchronized secondary layers
//! through a pool of reusable tracks, with per-layer fades, a global volume
//! scale and gapless loops scheduled against the output device clock.
//!
//! # Features
//!
//! - **Track pool**: voices are created on demand and re-used once idle
//! - **Fades**: per-layer linear fades advanced by [`Player::update`]
//! - **Seamless loops**: the master layer schedules the next cycle ahead of
//!   the loop point
//! - **Events**: loop, marker, fade and stop notifications
//!
//! # Example
//!
//! ```ignore
//! use wavy_player::Player;
//! use wavy_core::VirtualDevice;
//!
//! let mut player = Player::builder(VirtualDevice::new()).build();
//! let song = player.library_mut().register(spec)?;
//!
//! player.play(song, &[0])?;
//! player.fade_track(song, 1, 2.0, 1.0, None)?;
//! player.stop(song, 3.0)?;
//! ```

mod events;
mod fade;
mod playback;
mod player;
mod pool;
mod track;

pub use events::PlayerEvent;
pub use fade::{FadeCallback, FadeId};
pub use playback::LayerSet;
pub use player::{Player, PlayerBuilder};
pub use pool::TrackPool;
pub use track::{Track, TrackId};
