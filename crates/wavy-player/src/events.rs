//! Notifications produced while the player ticks.

use wavy_core::SongId;

/// Drained by the host with [`Player::drain_events`](crate::Player::drain_events).
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// A song got fresh playback state.
    Started { song: SongId },
    /// The master layer scheduled the next loop cycle.
    LoopScheduled { song: SongId, at: f64 },
    /// The master layer passed a marker.
    Marker {
        song: SongId,
        name: String,
        time: f64,
    },
    /// A fade reached its target.
    FadeFinished { song: SongId, layer: usize },
    /// A stop sequence completed and the song's state was removed.
    Stopped { song: SongId },
    /// Every layer of a non-looping song reached the end of its clip.
    Finished { song: SongId },
}

impl PlayerEvent {
    pub fn song(&self) -> SongId {
        match self {
            PlayerEvent::Started { song }
            | PlayerEvent::LoopScheduled { song, .. }
            | PlayerEvent::Marker { song, .. }
            | PlayerEvent::FadeFinished { song, .. }
            | PlayerEvent::Stopped { song }
            | PlayerEvent::Finished { song } => *song,
        }
    }
}
