//! Output device abstraction.
//!
//! The player never touches audio data. It drives voices through
//! [`OutputVoice`] and reads time from [`OutputDevice::now`], the device's
//! own monotonic audio clock. Scheduled starts are expressed on that clock,
//! never on the host's frame clock, so layers started for the same clock
//! time begin on the same sample.

use crate::clip::AudioClip;

/// A single playback channel that plays one clip at a time.
pub trait OutputVoice {
    /// Start playing `clip` from its beginning (or the current seek position
    /// if one was set after the previous stop) immediately.
    fn play(&mut self, clip: &AudioClip);

    /// Start playing `clip` at the given device clock time.
    ///
    /// The voice reports `is_playing() == true` from this call onwards, even
    /// before the start time is reached.
    fn play_scheduled(&mut self, clip: &AudioClip, clock_time: f64);

    /// Stop immediately and cancel any pending scheduled start.
    fn stop(&mut self);

    /// True from `play`/`play_scheduled` until the clip ends or `stop`.
    fn is_playing(&self) -> bool;

    /// Playback position in seconds from the start of the clip.
    fn position(&self) -> f64;

    /// Seek. Applies to the current clip, or to the next start.
    fn set_position(&mut self, seconds: f64);

    fn set_volume(&mut self, volume: f32);

    fn volume(&self) -> f32;
}

/// Factory and clock for voices.
pub trait OutputDevice {
    type Voice: OutputVoice;

    /// Create a new voice. `index` is the pool slot the voice will live in;
    /// `output_group` is the configured routing group, if any.
    fn create_voice(&mut self, index: usize, output_group: Option<&str>) -> Self::Voice;

    /// Current device clock time in seconds.
    fn now(&self) -> f64;
}
