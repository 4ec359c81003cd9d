//! Audio clip handle.

use std::sync::Arc;

/// Decoded audio owned by the host, shared by every voice that plays it.
///
/// Cloning is cheap: the samples live behind an `Arc`. WAVY never decodes
/// audio itself; the host hands over interleaved `f32` frames.
#[derive(Clone)]
pub struct AudioClip {
    name: Arc<str>,
    samples: Arc<[f32]>,
    channels: u16,
    sample_rate: u32,
}

impl AudioClip {
    /// Create a clip from interleaved samples.
    pub fn new(
        name: impl Into<Arc<str>>,
        samples: impl Into<Arc<[f32]>>,
        channels: u16,
        sample_rate: u32,
    ) -> Self {
        Self {
            name: name.into(),
            samples: samples.into(),
            channels: channels.max(1),
            sample_rate: sample_rate.max(1),
        }
    }

    /// Create a silent clip of the given length.
    ///
    /// Useful for hosts whose output device streams audio from elsewhere
    /// and only needs the clip's timing.
    pub fn silent(name: impl Into<Arc<str>>, seconds: f64, sample_rate: u32) -> Self {
        let frames = (seconds.max(0.0) * sample_rate as f64).round() as usize;
        Self::new(name, vec![0.0; frames], 1, sample_rate)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Interleaved samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Length in seconds.
    pub fn duration(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }
}

impl std::fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioClip")
            .field("name", &self.name)
            .field("frames", &self.frames())
            .field("channels", &self.channels)
            .field("sample_rate", &self.sample_rate)
            .finish()
    }
}
