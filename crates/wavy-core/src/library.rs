//! Song library: the provider that resolves song handles and names.

use crate::error::{Error, Result};
use crate::song::SongSpec;
use std::collections::HashMap;

/// Stable handle to a song registered in a [`SongLibrary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SongId(u32);

impl SongId {
    /// Dense index of the song in its library.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for SongId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "song#{}", self.0)
    }
}

/// A song reference accepted by every playback entry point: either a
/// resolved handle or a lookup name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SongRef<'a> {
    Id(SongId),
    Name(&'a str),
}

impl From<SongId> for SongRef<'_> {
    fn from(id: SongId) -> Self {
        SongRef::Id(id)
    }
}

impl<'a> From<&'a str> for SongRef<'a> {
    fn from(name: &'a str) -> Self {
        SongRef::Name(name)
    }
}

impl<'a> From<&'a String> for SongRef<'a> {
    fn from(name: &'a String) -> Self {
        SongRef::Name(name.as_str())
    }
}

/// Arena of song definitions indexed by [`SongId`].
///
/// Songs are never removed, so handles stay valid for the lifetime of the
/// library.
#[derive(Debug, Default)]
pub struct SongLibrary {
    songs: Vec<SongSpec>,
    by_name: HashMap<String, SongId>,
}

impl SongLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register a song, returning its handle.
    pub fn register(&mut self, song: SongSpec) -> Result<SongId> {
        if self.by_name.contains_key(song.name()) {
            return Err(Error::DuplicateSong(song.name().to_string()));
        }

        let song = song.validate()?;
        let id = SongId(self.songs.len() as u32);
        self.by_name.insert(song.name().to_string(), id);
        tracing::debug!(
            "Registered song \"{}\" as {} ({} layers)",
            song.name(),
            id,
            song.layer_count()
        );
        self.songs.push(song);
        Ok(id)
    }

    pub fn get(&self, id: SongId) -> Option<&SongSpec> {
        self.songs.get(id.index())
    }

    /// Look up a song by name.
    pub fn id_of(&self, name: &str) -> Result<SongId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownSong(name.to_string()))
    }

    /// Resolve a handle or name to a handle that belongs to this library.
    pub fn resolve(&self, song: SongRef<'_>) -> Result<SongId> {
        match song {
            SongRef::Name(name) => self.id_of(name),
            SongRef::Id(id) if id.index() < self.songs.len() => Ok(id),
            SongRef::Id(id) => Err(Error::UnknownSong(id.to_string())),
        }
    }

    pub fn contains(&self, id: SongId) -> bool {
        id.index() < self.songs.len()
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SongId, &SongSpec)> {
        self.songs
            .iter()
            .enumerate()
            .map(|(i, song)| (SongId(i as u32), song))
    }
}
