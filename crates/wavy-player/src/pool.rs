//! Track pool.
//!
//! Backing store of every track ever created plus a FIFO free list of the
//! idle ones. Tracks are created on demand and never destroyed; ownership
//! moves between the free list and a song's playback state through
//! [`TrackPool::acquire`] and [`TrackPool::release`].

use crate::track::{Track, TrackId};
use smallvec::SmallVec;
use std::collections::VecDeque;
use wavy_core::{OutputDevice, OutputVoice};

/// Track ids for one song's layers.
pub(crate) type TrackSet = SmallVec<[TrackId; 4]>;

pub struct TrackPool<V> {
    tracks: Vec<Track<V>>,
    idle: VecDeque<TrackId>,
    output_group: Option<String>,
}

impl<V: OutputVoice> TrackPool<V> {
    pub(crate) fn new(output_group: Option<String>) -> Self {
        Self {
            tracks: Vec::new(),
            idle: VecDeque::new(),
            output_group,
        }
    }

    /// Create `count` idle tracks up front.
    pub(crate) fn prewarm<D>(&mut self, device: &mut D, count: usize)
    where
        D: OutputDevice<Voice = V>,
    {
        for _ in 0..count {
            let id = self.create(device);
            self.idle.push_back(id);
        }
    }

    /// Take `count` tracks, re-using idle ones before creating new ones.
    pub(crate) fn acquire<D>(&mut self, device: &mut D, count: usize) -> TrackSet
    where
        D: OutputDevice<Voice = V>,
    {
        let mut set = TrackSet::with_capacity(count);
        for _ in 0..count {
            let id = match self.idle.pop_front() {
                Some(id) => id,
                None => self.create(device),
            };
            set.push(id);
        }
        set
    }

    /// Hand a track back. The caller must have stopped it or observed its
    /// voice going idle.
    pub(crate) fn release(&mut self, id: TrackId) {
        debug_assert!(!self.idle.contains(&id), "track {:?} released twice", id);

        self.tracks[id.index()].reset();
        self.idle.push_back(id);
    }

    fn create<D>(&mut self, device: &mut D) -> TrackId
    where
        D: OutputDevice<Voice = V>,
    {
        let id = TrackId(self.tracks.len() as u32);
        let voice = device.create_voice(id.index(), self.output_group.as_deref());
        self.tracks.push(Track::new(id, voice));
        tracing::debug!("Track pool grew to {} tracks", self.tracks.len());
        id
    }

    pub fn get(&self, id: TrackId) -> &Track<V> {
        &self.tracks[id.index()]
    }

    pub(crate) fn get_mut(&mut self, id: TrackId) -> &mut Track<V> {
        &mut self.tracks[id.index()]
    }

    /// Ids of every track currently owned by a song.
    pub(crate) fn allocated_into(&self, out: &mut Vec<TrackId>) {
        out.extend(
            self.tracks
                .iter()
                .filter(|track| track.song().is_some())
                .map(Track::id),
        );
    }

    /// Total tracks ever created.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track<V>> {
        self.tracks.iter()
    }
}

impl<V> std::fmt::Debug for TrackPool<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackPool")
            .field("tracks", &self.tracks.len())
            .field("idle", &self.idle.len())
            .finish()
    }
}
