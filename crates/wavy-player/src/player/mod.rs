//! Player - the single coordination point for song playback.
//!
//! The player owns the output device, the song library, the track pool and
//! every per-song registry. All state is mutated from the host's update
//! thread: commands are plain method calls, and [`Player::update`] advances
//! tracks and fades once per frame.
//!
//! # Example
//!
//! ```ignore
//! use wavy_player::Player;
//! use wavy_core::{SongSpec, VirtualDevice};
//!
//! let device = VirtualDevice::new();
//! let clock = device.clock();
//! let mut player = Player::builder(device).lookahead(1.0).build();
//!
//! let song = player.library_mut().register(
//!     SongSpec::new("battle", master).layer(drums).loop_point(64.0),
//! )?;
//!
//! player.play(song, &[])?;
//! player.set_layers(song, 2.0, &[0, 1])?;
//!
//! // every frame
//! clock.advance(dt);
//! player.update(dt);
//! for event in player.drain_events() { /* ... */ }
//! ```

mod builder;
mod control;
mod tick;
mod volume;

pub use builder::PlayerBuilder;

use crate::events::PlayerEvent;
use crate::fade::{FadeScheduler, FadeStep};
use crate::playback::{LayerSet, SongPlayback};
use crate::pool::TrackPool;
use crate::track::TrackId;
use wavy_core::{
    Error, OutputDevice, PlayerConfig, Result, SongId, SongLibrary, SongRef, SongSpec,
};

pub struct Player<D: OutputDevice> {
    device: D,
    library: SongLibrary,
    config: PlayerConfig,
    pool: TrackPool<D::Voice>,
    fades: FadeScheduler,
    /// Active playback, indexed by `SongId::index`.
    songs: Vec<Option<SongPlayback>>,
    /// Last layer selection per song, indexed by `SongId::index`.
    preferred_layers: Vec<Option<LayerSet>>,
    volume_scale: f32,
    events: Vec<PlayerEvent>,

    // Scratch buffers re-used every tick
    polled: Vec<TrackId>,
    loop_requests: Vec<(SongId, f64)>,
    fade_steps: Vec<FadeStep>,
}

impl<D: OutputDevice> Player<D> {
    /// Player with default configuration and an empty library.
    pub fn new(device: D) -> Self {
        Self::builder(device).build()
    }

    pub fn builder(device: D) -> PlayerBuilder<D> {
        PlayerBuilder::new(device)
    }

    pub(crate) fn from_parts(mut device: D, library: SongLibrary, config: PlayerConfig) -> Self {
        let mut pool = TrackPool::new(config.output_group.clone());
        pool.prewarm(&mut device, config.prewarm_tracks);

        Self {
            device,
            library,
            volume_scale: config.volume_scale,
            config,
            pool,
            fades: FadeScheduler::new(),
            songs: Vec::new(),
            preferred_layers: Vec::new(),
            events: Vec::new(),
            polled: Vec::new(),
            loop_requests: Vec::new(),
            fade_steps: Vec::new(),
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn library(&self) -> &SongLibrary {
        &self.library
    }

    /// Register songs here. Songs can be added while others play.
    pub fn library_mut(&mut self) -> &mut SongLibrary {
        &mut self.library
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn pool(&self) -> &TrackPool<D::Voice> {
        &self.pool
    }

    /// Resolve a handle or name. Fails with `UnknownSong`.
    pub fn song_id<'a>(&self, song: impl Into<SongRef<'a>>) -> Result<SongId> {
        self.library.resolve(song.into())
    }

    pub fn is_playing<'a>(&self, song: impl Into<SongRef<'a>>) -> bool {
        self.song_id(song)
            .map(|id| self.state(id).is_some())
            .unwrap_or(false)
    }

    /// True while a stop sequence is fading the song out.
    pub fn is_stopping<'a>(&self, song: impl Into<SongRef<'a>>) -> bool {
        self.song_id(song)
            .ok()
            .and_then(|id| self.state(id))
            .is_some_and(|state| state.stopping)
    }

    /// Stored volume of a layer, global scale applied. `None` when the song
    /// is not playing.
    pub fn layer_volume<'a>(&self, song: impl Into<SongRef<'a>>, layer: usize) -> Option<f32> {
        let id = self.song_id(song).ok()?;
        self.state(id)?.volumes.get(layer).copied()
    }

    /// Layers most recently requested for a song, whether or not it plays.
    pub fn enabled_layers<'a>(&self, song: impl Into<SongRef<'a>>) -> Option<&[usize]> {
        let id = self.song_id(song).ok()?;
        self.preferred_layers
            .get(id.index())?
            .as_ref()
            .map(|set| set.as_slice())
    }

    /// Track ids of the song's current cycle, master first.
    pub fn song_tracks<'a>(&self, song: impl Into<SongRef<'a>>) -> Option<Vec<Option<TrackId>>> {
        let id = self.song_id(song).ok()?;
        Some(self.state(id)?.tracks.to_vec())
    }

    pub fn active_songs(&self) -> impl Iterator<Item = SongId> + '_ {
        self.library
            .iter()
            .map(|(id, _)| id)
            .filter(|id| self.state(*id).is_some())
    }

    /// Number of fades currently running.
    pub fn active_fades(&self) -> usize {
        self.fades.len()
    }

    /// Events produced since the last drain.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, PlayerEvent> {
        self.events.drain(..)
    }

    pub(crate) fn state(&self, id: SongId) -> Option<&SongPlayback> {
        self.songs.get(id.index())?.as_ref()
    }

    pub(crate) fn state_mut(&mut self, id: SongId) -> Option<&mut SongPlayback> {
        self.songs.get_mut(id.index())?.as_mut()
    }

    fn slot_mut(&mut self, id: SongId) -> &mut Option<SongPlayback> {
        let index = id.index();
        if self.songs.len() <= index {
            self.songs.resize_with(index + 1, || None);
        }
        &mut self.songs[index]
    }

    fn set_preferred_layers(&mut self, id: SongId, layers: LayerSet) {
        let index = id.index();
        if self.preferred_layers.len() <= index {
            self.preferred_layers.resize_with(index + 1, || None);
        }
        self.preferred_layers[index] = Some(layers);
    }

    fn preferred(&self, id: SongId) -> Option<&LayerSet> {
        self.preferred_layers.get(id.index())?.as_ref()
    }

    /// Check every layer index against the song's layer count.
    fn check_layers(song: &SongSpec, layers: &[usize]) -> Result<()> {
        let layer_count = song.layer_count();
        match layers.iter().find(|&&layer| layer >= layer_count) {
            Some(&layer) => Err(Error::InvalidLayer {
                song: song.name().to_string(),
                layer,
                layer_count,
            }),
            None => Ok(()),
        }
    }

    /// Push a layer's stored volume to every track rendering it.
    fn push_layer_volume(&mut self, id: SongId, layer: usize) {
        let Some(state) = self.songs.get(id.index()).and_then(Option::as_ref) else {
            return;
        };
        let volume = state.volumes[layer];
        for (track_layer, track) in state.layer_tracks() {
            if track_layer == layer {
                self.pool.get_mut(track).set_volume(volume);
            }
        }
    }
}

impl<D: OutputDevice> std::fmt::Debug for Player<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("songs", &self.library.len())
            .field("active", &self.active_songs().count())
            .field("pool", &self.pool)
            .field("fades", &self.fades.len())
            .field("volume_scale", &self.volume_scale)
            .finish()
    }
}
