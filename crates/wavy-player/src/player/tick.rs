//! Per-frame advance: track polling, loop handoff, markers and fades.

use super::Player;
use crate::events::PlayerEvent;
use crate::track::{TrackId, TrackPoll};
use wavy_core::{OutputDevice, SongId};

impl<D: OutputDevice> Player<D> {
    /// Advance the player by `dt` seconds of frame time.
    ///
    /// Call once per frame from the host's update loop. Tracks are polled
    /// against the device clock; fades advance by `dt`.
    pub fn update(&mut self, dt: f64) {
        self.poll_tracks();
        self.advance_fades(dt);
    }

    fn poll_tracks(&mut self) {
        let lookahead = self.config.lookahead();
        let mut polled = std::mem::take(&mut self.polled);
        let mut loop_requests = std::mem::take(&mut self.loop_requests);
        polled.clear();
        self.pool.allocated_into(&mut polled);

        for &track_id in &polled {
            let track = self.pool.get_mut(track_id);
            // Released earlier in this pass
            let Some(song) = track.song() else {
                continue;
            };
            let Some(spec) = self.library.get(song) else {
                debug_assert!(false, "track {:?} plays an unregistered song", track_id);
                continue;
            };

            let poll = track.poll(spec, lookahead);
            if track.reports_markers() {
                for marker in track.crossed_markers(spec) {
                    self.events.push(PlayerEvent::Marker {
                        song,
                        name: marker.name.clone(),
                        time: marker.time,
                    });
                }
            }

            match poll {
                TrackPoll::Finished => self.on_track_finished(song, track_id),
                TrackPoll::LoopDue(at) => loop_requests.push((song, at)),
                TrackPoll::Started | TrackPoll::Unchanged => {}
            }
        }

        for (song, at) in loop_requests.drain(..) {
            self.schedule_next_cycle(song, at);
        }

        self.polled = polled;
        self.loop_requests = loop_requests;
    }

    /// A voice went idle: hand its track back and end the song once nothing
    /// of it is left sounding.
    fn on_track_finished(&mut self, id: SongId, track_id: TrackId) {
        self.pool.release(track_id);

        let Some(slot) = self.songs.get_mut(id.index()) else {
            return;
        };
        let Some(state) = slot.as_mut() else {
            return;
        };
        state.forget(track_id);
        if !state.is_silent() {
            return;
        }

        *slot = None;
        self.fades.cancel_song(id);
        tracing::debug!("Song \"{}\" reached its end", self.song_name(id));
        self.events.push(PlayerEvent::Finished { song: id });
    }

    /// Loop handoff: start a fresh track set at `clock_time` and keep the
    /// current one ringing out until its voices go idle.
    fn schedule_next_cycle(&mut self, id: SongId, clock_time: f64) {
        let Some(spec) = self.library.get(id) else {
            return;
        };
        let Some(state) = self.songs.get_mut(id.index()).and_then(Option::as_mut) else {
            return;
        };

        let set = self.pool.acquire(&mut self.device, spec.layer_count());
        for (layer, slot) in state.tracks.iter_mut().enumerate() {
            if let Some(previous) = slot.replace(set[layer]) {
                self.pool.get_mut(previous).detach_master();
                state.outgoing.push((layer, previous));
            }
        }

        for (layer, &track_id) in set.iter().enumerate() {
            let Some(clip) = spec.clip(layer) else {
                continue;
            };
            let track = self.pool.get_mut(track_id);
            track.assign(id, layer == 0);
            track.set_volume(state.volumes[layer]);
            track.play_scheduled(clip, spec, clock_time);
        }

        tracing::debug!("Loop of \"{}\" scheduled at {:.3}", spec.name(), clock_time);
        self.events.push(PlayerEvent::LoopScheduled {
            song: id,
            at: clock_time,
        });
    }
}
