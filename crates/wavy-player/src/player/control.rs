//! Playback commands: play, stop, layer selection and seeking.

use super::Player;
use crate::events::PlayerEvent;
use crate::fade::FadeCompletion;
use crate::playback::{layer_set, SongPlayback};
use wavy_core::{Error, OutputDevice, ReplayPolicy, Result, SongId, SongLibrary, SongRef, SongSpec};

fn lookup(library: &SongLibrary, id: SongId) -> Result<&SongSpec> {
    library
        .get(id)
        .ok_or_else(|| Error::UnknownSong(id.to_string()))
}

impl<D: OutputDevice> Player<D> {
    /// Start a song now.
    ///
    /// `layers` selects the layers that start at full volume; the others
    /// start silent. An empty slice re-uses the song's last selection, or
    /// the master layer alone when there is none.
    ///
    /// A song that is already playing keeps its tracks (see
    /// [`ReplayPolicy`]). Under the default merge policy its stop, if any, is
    /// interrupted, running fades are cancelled and every layer is set at
    /// once to full volume or silence according to the selection.
    pub fn play<'a>(&mut self, song: impl Into<SongRef<'a>>, layers: &[usize]) -> Result<()> {
        let id = self.song_id(song)?;
        self.start_song(id, None, layers)
    }

    /// Like [`play`](Self::play), but every layer starts at `clock_time` on
    /// the device clock, seeking to the song's loop start point first.
    pub fn play_scheduled<'a>(
        &mut self,
        song: impl Into<SongRef<'a>>,
        clock_time: f64,
        layers: &[usize],
    ) -> Result<()> {
        let id = self.song_id(song)?;
        self.start_song(id, Some(clock_time), layers)
    }

    fn start_song(&mut self, id: SongId, scheduled: Option<f64>, layers: &[usize]) -> Result<()> {
        Self::check_layers(lookup(&self.library, id)?, layers)?;
        let requested = (!layers.is_empty()).then(|| layer_set(layers));

        let replay = self.state(id).is_some();
        if replay && self.config.replay_policy == ReplayPolicy::WarnAndIgnore {
            tracing::warn!("Song \"{}\" is already playing!", self.song_name(id));
            return Ok(());
        }

        let enabled = requested
            .or_else(|| self.preferred(id).cloned())
            .unwrap_or_else(|| layer_set(&[0]));
        self.set_preferred_layers(id, enabled.clone());

        if replay {
            self.interrupt(id);
            self.apply_layers(id, &enabled);
            tracing::debug!(
                "Song \"{}\" already playing, keeping its tracks, layers {:?}",
                self.song_name(id),
                enabled.as_slice()
            );
            return Ok(());
        }

        let spec = lookup(&self.library, id)?;
        let set = self.pool.acquire(&mut self.device, spec.layer_count());
        tracing::debug!(
            "Playing \"{}\" on {} tracks, layers {:?}",
            spec.name(),
            set.len(),
            enabled.as_slice()
        );

        let playback = SongPlayback::new(&set, &enabled, self.volume_scale);
        let now = self.device.now();

        for (layer, &track_id) in set.iter().enumerate() {
            let Some(clip) = spec.clip(layer) else {
                continue;
            };
            let track = self.pool.get_mut(track_id);
            track.assign(id, layer == 0);
            track.set_volume(playback.volumes[layer]);
            match scheduled {
                Some(clock_time) => track.play_scheduled(clip, spec, clock_time),
                None => track.play(clip, spec, now),
            }
        }

        *self.slot_mut(id) = Some(playback);
        self.events.push(PlayerEvent::Started { song: id });
        Ok(())
    }

    /// Set every layer straight to full volume or silence.
    fn apply_layers(&mut self, id: SongId, enabled: &[usize]) {
        let scale = self.volume_scale;
        let Some(state) = self.songs.get_mut(id.index()).and_then(Option::as_mut) else {
            return;
        };
        let layer_count = state.layer_count();
        for layer in 0..layer_count {
            if let Some(fade) = state.fades[layer].take() {
                self.fades.cancel(fade);
            }
            let level = if enabled.contains(&layer) { 1.0 } else { 0.0 };
            state.set_level(layer, level, scale);
        }
        for layer in 0..layer_count {
            self.push_layer_volume(id, layer);
        }
    }

    /// Fade every layer to silence over `fade` seconds, then stop the
    /// song's voices and drop its state. A stop already in progress is
    /// restarted from the current volumes.
    pub fn stop<'a>(&mut self, song: impl Into<SongRef<'a>>, fade: f64) -> Result<()> {
        let id = self.song_id(song)?;
        self.stop_song(id, fade);
        Ok(())
    }

    /// Stop every active song.
    pub fn stop_all(&mut self, fade: f64) {
        let active: Vec<SongId> = self.active_songs().collect();
        for id in active {
            self.stop_song(id, fade);
        }
    }

    fn stop_song(&mut self, id: SongId, fade: f64) {
        let Some(state) = self.state(id) else {
            tracing::warn!("No song called \"{}\" is currently playing!", self.song_name(id));
            return;
        };
        let layer_count = state.layer_count();

        self.interrupt(id);

        // Master last: its completion tears the song down.
        for layer in 1..layer_count {
            self.start_fade(id, layer, 0.0, fade, FadeCompletion::None);
        }
        self.start_fade(id, 0, 0.0, fade, FadeCompletion::FinishStop);

        // Flagged after the fades so they are not refused by the stop guard.
        if let Some(state) = self.state_mut(id) {
            state.stopping = true;
        }
    }

    /// Abort a stop in progress. Running fades are cancelled and the layers
    /// keep whatever volume they had reached.
    pub fn interrupt_stopping<'a>(&mut self, song: impl Into<SongRef<'a>>) -> Result<()> {
        let id = self.song_id(song)?;
        if self.state(id).is_none() {
            tracing::debug!("interrupt_stopping on {} ignored, song is not playing", id);
            return Ok(());
        }
        self.interrupt(id);
        Ok(())
    }

    fn interrupt(&mut self, id: SongId) {
        let Some(state) = self.songs.get_mut(id.index()).and_then(Option::as_mut) else {
            return;
        };
        state.stopping = false;
        for slot in state.fades.iter_mut() {
            if let Some(fade) = slot.take() {
                self.fades.cancel(fade);
            }
        }
    }

    /// Fade the listed layers in and every other layer out over `fade`
    /// seconds. The selection is remembered for later `play` calls even when
    /// the song is not playing. Refused while the song is being stopped.
    pub fn set_layers<'a>(
        &mut self,
        song: impl Into<SongRef<'a>>,
        fade: f64,
        layers: &[usize],
    ) -> Result<()> {
        let id = self.song_id(song)?;
        Self::check_layers(lookup(&self.library, id)?, layers)?;

        let enabled = layer_set(layers);
        let Some((stopping, layer_count)) = self
            .state(id)
            .map(|state| (state.stopping, state.layer_count()))
        else {
            self.set_preferred_layers(id, enabled);
            tracing::debug!("set_layers on {} recorded, song is not playing", id);
            return Ok(());
        };
        if stopping {
            tracing::debug!("set_layers on {} ignored, song is stopping", id);
            return Ok(());
        }
        self.set_preferred_layers(id, enabled.clone());

        for layer in 0..layer_count {
            let target = if enabled.contains(&layer) { 1.0 } else { 0.0 };
            self.start_fade(id, layer, target, fade, FadeCompletion::None);
        }
        Ok(())
    }

    /// Playback time of the song's master layer. `None` when the song is not
    /// playing or its master clip has ended.
    pub fn song_position<'a>(&self, song: impl Into<SongRef<'a>>) -> Result<Option<f64>> {
        let id = self.song_id(song)?;
        Ok(self
            .state(id)
            .and_then(|state| state.master())
            .map(|track| self.pool.get(track).position()))
    }

    /// Move every layer to `seconds` and re-arm the loop from there. Tracks
    /// still ringing out from the previous loop cycle are stopped.
    pub fn seek<'a>(&mut self, song: impl Into<SongRef<'a>>, seconds: f64) -> Result<()> {
        let id = self.song_id(song)?;
        let seconds = if seconds.is_finite() {
            seconds.max(0.0)
        } else {
            0.0
        };

        let spec = lookup(&self.library, id)?;
        let Some(state) = self.songs.get_mut(id.index()).and_then(Option::as_mut) else {
            tracing::debug!("seek on {} ignored, song is not playing", id);
            return Ok(());
        };

        for (_, track_id) in state.outgoing.drain(..) {
            self.pool.get_mut(track_id).stop();
            self.pool.release(track_id);
        }

        let now = self.device.now();
        for track_id in state.tracks.iter().flatten() {
            self.pool.get_mut(*track_id).seek(spec, seconds, now);
        }
        Ok(())
    }

    /// Stop every voice of a song, return its tracks and drop its state.
    pub(super) fn finish_stop(&mut self, id: SongId) {
        let Some(state) = self.songs.get_mut(id.index()).and_then(Option::take) else {
            return;
        };
        self.fades.cancel_song(id);

        for (_, track_id) in state.layer_tracks() {
            self.pool.get_mut(track_id).stop();
            self.pool.release(track_id);
        }

        tracing::debug!("Song \"{}\" stopped", self.song_name(id));
        self.events.push(PlayerEvent::Stopped { song: id });
    }

    pub(super) fn song_name(&self, id: SongId) -> &str {
        self.library.get(id).map_or("<unknown>", SongSpec::name)
    }
}
