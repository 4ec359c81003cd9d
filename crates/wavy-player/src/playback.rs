//! Per-song playback state.

use crate::fade::FadeId;
use crate::pool::TrackSet;
use crate::track::TrackId;
use smallvec::SmallVec;

/// Sorted, de-duplicated layer indices.
pub type LayerSet = SmallVec<[usize; 4]>;

pub(crate) fn layer_set(layers: &[usize]) -> LayerSet {
    let mut set: LayerSet = layers.iter().copied().collect();
    set.sort_unstable();
    set.dedup();
    set
}

/// Everything the player tracks for one active song.
///
/// Created by the first `play`, destroyed when a stop sequence completes or
/// when every track of a non-looping song has finished.
#[derive(Debug)]
pub(crate) struct SongPlayback {
    /// Current cycle, one slot per layer, master at 0. A slot is vacated
    /// when its track finishes before the rest of the song.
    pub tracks: SmallVec<[Option<TrackId>; 4]>,
    /// Previous loop cycle still ringing out, as `(layer, track)`.
    pub outgoing: SmallVec<[(usize, TrackId); 4]>,
    /// Last requested level per layer, before the global scale.
    pub levels: SmallVec<[f32; 4]>,
    /// Stored volume per layer in the current global scale.
    pub volumes: SmallVec<[f32; 4]>,
    pub fades: SmallVec<[Option<FadeId>; 4]>,
    pub stopping: bool,
}

impl SongPlayback {
    pub fn new(tracks: &TrackSet, enabled: &[usize], scale: f32) -> Self {
        let layer_count = tracks.len();
        let levels: SmallVec<[f32; 4]> = (0..layer_count)
            .map(|layer| if enabled.contains(&layer) { 1.0 } else { 0.0 })
            .collect();
        let volumes = levels.iter().map(|level| level * scale).collect();

        Self {
            tracks: tracks.iter().copied().map(Some).collect(),
            outgoing: SmallVec::new(),
            levels,
            volumes,
            fades: SmallVec::from_elem(None, layer_count),
            stopping: false,
        }
    }

    pub fn layer_count(&self) -> usize {
        self.tracks.len()
    }

    /// Every track currently rendering a layer, with that layer.
    pub fn layer_tracks(&self) -> impl Iterator<Item = (usize, TrackId)> + '_ {
        self.tracks
            .iter()
            .enumerate()
            .filter_map(|(layer, slot)| slot.map(|id| (layer, id)))
            .chain(self.outgoing.iter().copied())
    }

    pub fn master(&self) -> Option<TrackId> {
        self.tracks.first().copied().flatten()
    }

    /// Drop a finished track from the current cycle or the outgoing set.
    pub fn forget(&mut self, id: TrackId) {
        if let Some(slot) = self.tracks.iter_mut().find(|slot| **slot == Some(id)) {
            *slot = None;
        }
        self.outgoing.retain(|(_, track)| *track != id);
    }

    pub fn is_silent(&self) -> bool {
        self.tracks.iter().all(Option::is_none) && self.outgoing.is_empty()
    }

    pub fn set_level(&mut self, layer: usize, level: f32, scale: f32) {
        self.levels[layer] = level;
        self.volumes[layer] = level * scale;
    }

    /// Move every stored volume from `old` to `new` global scale.
    pub fn rescale(&mut self, old: f32, new: f32) {
        for (volume, level) in self.volumes.iter_mut().zip(&self.levels) {
            if old != 0.0 {
                *volume = *volume / old * new;
            } else {
                *volume = level * new;
            }
        }
    }
}
