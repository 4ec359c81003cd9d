//! Track - one output voice playing one layer of a song.
//!
//! A track is either idle in the [`TrackPool`](crate::TrackPool) or
//! allocated to exactly one song. The master track (layer 0) also runs the
//! loop pre-trigger: once its position comes within the lookahead of the
//! loop point it asks the player, once per cycle, to schedule the next
//! cycle at the precomputed device clock time.

use wavy_core::{AudioClip, OutputVoice, SongId, SongMarker, SongSpec};

/// Index of a track in its pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub(crate) u32);

impl TrackId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Result of polling a track once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum TrackPoll {
    Unchanged,
    /// Voice was observed playing for the first time.
    Started,
    /// Voice went idle; the track must go back to the pool.
    Finished,
    /// Master only: schedule the next loop cycle at this clock time.
    LoopDue(f64),
}

pub struct Track<V> {
    id: TrackId,
    voice: V,
    song: Option<SongId>,
    is_master: bool,
    /// Layer 0 of its cycle; stays set after a loop handoff so markers
    /// before the loop point are still reported from the tail.
    reports_markers: bool,
    volume: f32,
    considered_playing: bool,
    /// A play was issued and no poll has seen the voice playing yet.
    play_issued: bool,
    loop_armed: bool,
    next_loop_time: f64,
    /// Position from which the next marker scan starts.
    marker_cursor: f64,
}

impl<V: OutputVoice> Track<V> {
    pub(crate) fn new(id: TrackId, voice: V) -> Self {
        Self {
            id,
            voice,
            song: None,
            is_master: false,
            reports_markers: false,
            volume: 0.0,
            considered_playing: false,
            play_issued: false,
            loop_armed: false,
            next_loop_time: 0.0,
            marker_cursor: 0.0,
        }
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    /// Song this track is rendering, `None` while pooled.
    pub fn song(&self) -> Option<SongId> {
        self.song
    }

    pub fn is_master(&self) -> bool {
        self.is_master
    }

    pub(crate) fn reports_markers(&self) -> bool {
        self.reports_markers
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_loop_armed(&self) -> bool {
        self.loop_armed
    }

    /// Device clock time of the next loop cycle (meaningful on the master).
    pub fn next_loop_time(&self) -> f64 {
        self.next_loop_time
    }

    pub fn voice(&self) -> &V {
        &self.voice
    }

    pub(crate) fn assign(&mut self, song: SongId, is_master: bool) {
        self.song = Some(song);
        self.is_master = is_master;
        self.reports_markers = is_master;
    }

    /// Stop acting as master. Used on the outgoing set after a loop handoff,
    /// so the tail of the previous cycle never re-triggers. Markers are still
    /// reported up to the loop point.
    pub(crate) fn detach_master(&mut self) {
        self.is_master = false;
    }

    /// Return to the pooled state.
    pub(crate) fn reset(&mut self) {
        self.song = None;
        self.is_master = false;
        self.reports_markers = false;
        self.considered_playing = false;
        self.play_issued = false;
        self.loop_armed = false;
        self.next_loop_time = 0.0;
        self.marker_cursor = 0.0;
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        self.voice.set_volume(volume);
    }

    /// Start `clip` immediately.
    pub fn play(&mut self, clip: &AudioClip, song: &SongSpec, now: f64) {
        self.voice.play(clip);
        self.play_issued = true;
        self.marker_cursor = 0.0;
        self.arm_loop(song, now, 0.0);
    }

    /// Start `clip` at `clock_time`, seeking to the song's loop start point
    /// when it has one.
    ///
    /// The next cycle is then due one loop length later,
    /// `clock_time + (loop_point - loop_start_point)`, rather than
    /// `clock_time + loop_point`, so restarts from a loop start point stay
    /// in phase.
    pub fn play_scheduled(&mut self, clip: &AudioClip, song: &SongSpec, clock_time: f64) {
        let offset = song.loop_start_point_secs().unwrap_or(0.0);
        if offset > 0.0 {
            self.voice.set_position(offset);
        }
        self.voice.play_scheduled(clip, clock_time);
        self.play_issued = true;
        self.marker_cursor = offset;
        if self.is_master {
            if let Some(length) = song.loop_length() {
                self.next_loop_time = clock_time + length.max(0.0);
                self.loop_armed = false;
            }
        }
    }

    pub fn stop(&mut self) {
        self.voice.stop();
        self.loop_armed = false;
    }

    /// Seek and re-arm the loop relative to the new position.
    pub(crate) fn seek(&mut self, song: &SongSpec, position: f64, now: f64) {
        self.voice.set_position(position);
        self.marker_cursor = position;
        self.arm_loop(song, now, position);
    }

    pub fn position(&self) -> f64 {
        self.voice.position()
    }

    /// The next cycle starts when the voice, which is at `position` at
    /// clock time `at`, reaches the loop point.
    fn arm_loop(&mut self, song: &SongSpec, at: f64, position: f64) {
        if !self.is_master {
            return;
        }
        if let Some(loop_point) = song.loop_point_secs() {
            self.next_loop_time = at + (loop_point - position).max(0.0);
            self.loop_armed = false;
        }
    }

    /// Per-tick transition detection and loop pre-trigger.
    ///
    /// A voice that ended before any poll saw it playing (a clip shorter
    /// than the frame time) still reports `Finished`.
    pub(crate) fn poll(&mut self, song: &SongSpec, lookahead: f64) -> TrackPoll {
        let playing = self.voice.is_playing();

        if !playing && (self.considered_playing || self.play_issued) {
            self.considered_playing = false;
            self.play_issued = false;
            return TrackPoll::Finished;
        }

        let started = !self.considered_playing && playing;
        if started {
            self.considered_playing = true;
            self.play_issued = false;
        }

        if self.is_master && self.considered_playing && !self.loop_armed {
            if let Some(loop_point) = song.loop_point_secs() {
                if self.voice.position() + lookahead >= loop_point {
                    self.loop_armed = true;
                    return TrackPoll::LoopDue(self.next_loop_time);
                }
            }
        }

        if started {
            TrackPoll::Started
        } else {
            TrackPoll::Unchanged
        }
    }

    /// Markers passed since the previous scan, in time order. Markers at or
    /// after the loop point belong to the next cycle and are never reported.
    pub(crate) fn crossed_markers<'a>(&mut self, song: &'a SongSpec) -> &'a [SongMarker] {
        if !self.considered_playing || !self.reports_markers {
            return &[];
        }

        let position = self.voice.position();
        if position < self.marker_cursor {
            self.marker_cursor = position;
            return &[];
        }

        let end = song.loop_point_secs().map_or(position, |lp| position.min(lp));
        let markers = song.markers();
        let lo = markers.partition_point(|m| m.time < self.marker_cursor);
        let hi = markers.partition_point(|m| m.time < end);
        self.marker_cursor = position;
        &markers[lo..hi.max(lo)]
    }
}

impl<V> std::fmt::Debug for Track<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Track")
            .field("id", &self.id)
            .field("song", &self.song)
            .field("is_master", &self.is_master)
            .field("reports_markers", &self.reports_markers)
            .field("volume", &self.volume)
            .field("playing", &self.considered_playing)
            .field("loop_armed", &self.loop_armed)
            .finish()
    }
}
