//! Song definitions.
//!
//! A song is one master clip plus any number of secondary clips that play
//! in sync with it. Layer 0 is always the master; layer `i > 0` is
//! `secondary[i - 1]`.

use crate::clip::AudioClip;
use crate::error::{Error, Result};

/// A named position in a song, reported when the master layer passes it.
#[derive(Debug, Clone, PartialEq)]
pub struct SongMarker {
    pub name: String,
    /// Seconds from the start of the master clip.
    pub time: f64,
}

impl SongMarker {
    pub fn new(name: impl Into<String>, time: f64) -> Self {
        Self {
            name: name.into(),
            time,
        }
    }
}

/// Immutable description of a song.
///
/// # Example
///
/// ```ignore
/// let song = SongSpec::new("overworld", master)
///     .display_name("Overworld Theme")
///     .layer(drums)
///     .layer(strings)
///     .loop_point(32.0)
///     .loop_start_point(4.0)
///     .marker("chorus", 16.0);
/// ```
#[derive(Debug, Clone)]
pub struct SongSpec {
    name: String,
    display_name: Option<String>,
    master: AudioClip,
    secondary: Vec<AudioClip>,
    loop_point: Option<f64>,
    loop_start_point: Option<f64>,
    markers: Vec<SongMarker>,
}

impl SongSpec {
    /// Create a song with only a master layer and no loop.
    pub fn new(name: impl Into<String>, master: AudioClip) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            master,
            secondary: Vec::new(),
            loop_point: None,
            loop_start_point: None,
            markers: Vec::new(),
        }
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Append a secondary layer.
    pub fn layer(mut self, clip: AudioClip) -> Self {
        self.secondary.push(clip);
        self
    }

    pub fn layers(mut self, clips: impl IntoIterator<Item = AudioClip>) -> Self {
        self.secondary.extend(clips);
        self
    }

    /// Seconds into the master clip at which playback restarts.
    pub fn loop_point(mut self, seconds: f64) -> Self {
        self.loop_point = Some(seconds);
        self
    }

    /// Seek offset applied to scheduled restarts (skips an intro).
    pub fn loop_start_point(mut self, seconds: f64) -> Self {
        self.loop_start_point = Some(seconds);
        self
    }

    pub fn marker(mut self, name: impl Into<String>, time: f64) -> Self {
        self.markers.push(SongMarker::new(name, time));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display name, falling back to the lookup name.
    pub fn title(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn master(&self) -> &AudioClip {
        &self.master
    }

    pub fn secondary(&self) -> &[AudioClip] {
        &self.secondary
    }

    /// Clip for a layer index, `None` when out of range.
    pub fn clip(&self, layer: usize) -> Option<&AudioClip> {
        match layer {
            0 => Some(&self.master),
            i => self.secondary.get(i - 1),
        }
    }

    pub fn layer_count(&self) -> usize {
        1 + self.secondary.len()
    }

    pub fn loop_point_secs(&self) -> Option<f64> {
        self.loop_point
    }

    pub fn loop_start_point_secs(&self) -> Option<f64> {
        self.loop_start_point
    }

    /// Length of one loop cycle when restarting from the loop start point.
    pub fn loop_length(&self) -> Option<f64> {
        self.loop_point
            .map(|end| end - self.loop_start_point.unwrap_or(0.0))
    }

    /// Markers sorted by time.
    pub fn markers(&self) -> &[SongMarker] {
        &self.markers
    }

    /// Check internal consistency and sort markers.
    pub(crate) fn validate(mut self) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidSong {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if let Some(loop_point) = self.loop_point {
            if !loop_point.is_finite() || loop_point <= 0.0 {
                return Err(invalid("loop point must be a positive number of seconds"));
            }
            if let Some(start) = self.loop_start_point {
                if !start.is_finite() || start < 0.0 || start >= loop_point {
                    return Err(invalid("loop start point must lie in [0, loop point)"));
                }
            }
        }

        if self.markers.iter().any(|m| !m.time.is_finite()) {
            return Err(invalid("marker times must be finite"));
        }

        self.markers.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(self)
    }
}
