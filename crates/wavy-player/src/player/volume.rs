//! Layer volumes, fades and the global volume scale.

use super::Player;
use crate::events::PlayerEvent;
use crate::fade::{FadeCallback, FadeCompletion};
use wavy_core::{OutputDevice, Result, SongId, SongRef};

impl<D: OutputDevice> Player<D> {
    /// Set the given layers to `volume` immediately, cancelling their fades.
    ///
    /// Does nothing when the song is not playing or is being stopped.
    pub fn set_volume<'a>(
        &mut self,
        song: impl Into<SongRef<'a>>,
        volume: f32,
        layers: &[usize],
    ) -> Result<()> {
        let id = self.song_id(song)?;
        self.check_song_layers(id, layers)?;

        let scale = self.volume_scale;
        let Some(state) = self.songs.get_mut(id.index()).and_then(Option::as_mut) else {
            tracing::debug!("set_volume on {} ignored, song is not playing", id);
            return Ok(());
        };
        if state.stopping {
            tracing::debug!("set_volume on {} ignored, song is stopping", id);
            return Ok(());
        }

        for &layer in layers {
            if let Some(fade) = state.fades[layer].take() {
                self.fades.cancel(fade);
            }
            state.set_level(layer, volume, scale);
        }
        for &layer in layers {
            self.push_layer_volume(id, layer);
        }
        Ok(())
    }

    pub fn set_layer_volume<'a>(
        &mut self,
        song: impl Into<SongRef<'a>>,
        volume: f32,
        layer: usize,
    ) -> Result<()> {
        self.set_volume(song, volume, &[layer])
    }

    /// Fade one layer to `target` over `duration` seconds.
    ///
    /// A running fade on the same layer is superseded and its callback is
    /// dropped. With `duration <= 0` the target is applied at once and
    /// `on_finish` runs before this returns. Refused while the song is not
    /// playing or is being stopped.
    pub fn fade_track<'a>(
        &mut self,
        song: impl Into<SongRef<'a>>,
        layer: usize,
        duration: f64,
        target: f32,
        on_finish: Option<FadeCallback>,
    ) -> Result<()> {
        let id = self.song_id(song)?;
        self.check_song_layers(id, &[layer])?;

        match self.state(id) {
            None => {
                tracing::debug!("fade_track on {} ignored, song is not playing", id);
            }
            Some(state) if state.stopping => {
                tracing::debug!("fade_track on {} ignored, song is stopping", id);
            }
            Some(_) => {
                self.start_fade(
                    id,
                    layer,
                    target,
                    duration,
                    FadeCompletion::from_callback(on_finish),
                );
            }
        }
        Ok(())
    }

    pub fn volume_scale(&self) -> f32 {
        self.volume_scale
    }

    /// Change the global volume scale and rescale every stored layer volume
    /// of every active song.
    pub fn set_volume_scale(&mut self, scale: f32) {
        if !scale.is_finite() {
            tracing::warn!("Ignoring non-finite volume scale {}", scale);
            return;
        }

        let old = self.volume_scale;
        self.volume_scale = scale;

        if old == 0.0 && self.songs.iter().any(Option::is_some) {
            tracing::warn!(
                "Rescaling from a volume scale of 0, layer volumes rebuilt from their last levels"
            );
        }

        for state in self.songs.iter_mut().flatten() {
            state.rescale(old, scale);
            for (layer, track) in state.layer_tracks() {
                self.pool.get_mut(track).set_volume(state.volumes[layer]);
            }
        }
    }

    /// Start a fade, or apply it at once for a non-positive duration. The
    /// caller has checked that the song is playing and the layer exists.
    pub(super) fn start_fade(
        &mut self,
        id: SongId,
        layer: usize,
        target: f32,
        duration: f64,
        completion: FadeCompletion,
    ) {
        let scale = self.volume_scale;
        let Some(state) = self.songs.get_mut(id.index()).and_then(Option::as_mut) else {
            return;
        };

        if let Some(previous) = state.fades[layer].take() {
            self.fades.cancel(previous);
        }

        if duration <= 0.0 || !duration.is_finite() {
            state.set_level(layer, target, scale);
            self.push_layer_volume(id, layer);
            self.complete_fade(id, layer, completion);
            return;
        }

        let start = state.levels[layer];
        let fade = self
            .fades
            .start(id, layer, start, target, duration, completion);
        state.fades[layer] = Some(fade);
    }

    /// Step every running fade and apply the results.
    pub(super) fn advance_fades(&mut self, dt: f64) {
        let mut steps = std::mem::take(&mut self.fade_steps);
        steps.clear();
        self.fades.advance(dt, &mut steps);

        let scale = self.volume_scale;
        for step in steps.drain(..) {
            let Some(state) = self
                .songs
                .get_mut(step.song.index())
                .and_then(Option::as_mut)
            else {
                continue;
            };
            if state.fades[step.layer] != Some(step.id) {
                continue;
            }

            state.set_level(step.layer, step.level, scale);
            if step.completion.is_some() {
                state.fades[step.layer] = None;
            }
            self.push_layer_volume(step.song, step.layer);

            if let Some(completion) = step.completion {
                self.complete_fade(step.song, step.layer, completion);
            }
        }

        self.fade_steps = steps;
    }

    fn complete_fade(&mut self, id: SongId, layer: usize, completion: FadeCompletion) {
        tracing::trace!("Fade finished on {} layer {}", id, layer);
        self.events.push(PlayerEvent::FadeFinished { song: id, layer });

        match completion {
            FadeCompletion::None => {}
            FadeCompletion::Callback(callback) => callback(id, layer),
            FadeCompletion::FinishStop => self.finish_stop(id),
        }
    }

    fn check_song_layers(&self, id: SongId, layers: &[usize]) -> Result<()> {
        match self.library.get(id) {
            Some(spec) => Self::check_layers(spec, layers),
            None => Err(wavy_core::Error::UnknownSong(id.to_string())),
        }
    }
}
