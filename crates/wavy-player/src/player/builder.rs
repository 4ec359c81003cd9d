//! Builder for configuring and constructing a `Player`.

use super::Player;
use wavy_core::{OutputDevice, PlayerConfig, ReplayPolicy, SongLibrary};

/// Settings not given explicitly come from [`PlayerConfig::default`].
///
/// # Example
///
/// ```ignore
/// use wavy::prelude::*;
///
/// let config = PlayerConfig::load("music.toml")?;
/// let player = Player::builder(VirtualDevice::new())
///     .config(config)
///     .library(songs)
///     .prewarm(8)
///     .build();
/// ```
pub struct PlayerBuilder<D> {
    device: D,
    library: SongLibrary,
    config: PlayerConfig,
}

impl<D: OutputDevice> PlayerBuilder<D> {
    pub(crate) fn new(device: D) -> Self {
        Self {
            device,
            library: SongLibrary::new(),
            config: PlayerConfig::default(),
        }
    }

    /// Replace the whole configuration. Overrides set before this call are
    /// discarded.
    pub fn config(mut self, config: PlayerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn library(mut self, library: SongLibrary) -> Self {
        self.library = library;
        self
    }

    /// Default: 1.0 seconds
    pub fn lookahead(mut self, seconds: f64) -> Self {
        self.config.loop_lookahead = seconds;
        self
    }

    /// Default: `ReplayPolicy::Merge`
    pub fn replay_policy(mut self, policy: ReplayPolicy) -> Self {
        self.config.replay_policy = policy;
        self
    }

    /// Default: 1.0
    pub fn volume_scale(mut self, scale: f32) -> Self {
        self.config.volume_scale = scale;
        self
    }

    /// Default: 0
    pub fn prewarm(mut self, tracks: usize) -> Self {
        self.config.prewarm_tracks = tracks;
        self
    }

    pub fn output_group(mut self, group: impl Into<String>) -> Self {
        self.config.output_group = Some(group.into());
        self
    }

    pub fn build(self) -> Player<D> {
        let mut config = self.config;
        config.loop_lookahead = config.lookahead();
        if !config.volume_scale.is_finite() {
            config.volume_scale = 1.0;
        }

        Player::from_parts(self.device, self.library, config)
    }
}
