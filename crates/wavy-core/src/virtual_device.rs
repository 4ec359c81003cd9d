//! Headless output device driven by a manually advanced clock.
//!
//! `VirtualDevice` produces no sound. Its voices derive their position from
//! a shared [`VirtualClock`], which makes playback deterministic: advance
//! the clock by the frame delta, then call the player's `update`.
//!
//! ```ignore
//! let device = VirtualDevice::new();
//! let clock = device.clock();
//! let mut player = Player::builder(device).build();
//!
//! loop {
//!     clock.advance(dt);
//!     player.update(dt);
//! }
//! ```

use crate::clip::AudioClip;
use crate::voice::{OutputDevice, OutputVoice};
use atomic_float::AtomicF64;
use parking_lot::Mutex;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Shared, lock-free device clock in seconds.
#[derive(Clone)]
pub struct VirtualClock(Arc<AtomicF64>);

impl Default for VirtualClock {
    fn default() -> Self {
        Self(Arc::new(AtomicF64::new(0.0)))
    }
}

impl std::fmt::Debug for VirtualClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("VirtualClock").field(&self.now()).finish()
    }
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.0.load(Ordering::Acquire)
    }

    pub fn advance(&self, seconds: f64) {
        self.0.fetch_add(seconds.max(0.0), Ordering::AcqRel);
    }

    pub fn set(&self, seconds: f64) {
        self.0.store(seconds, Ordering::Release);
    }
}

#[derive(Debug, Default)]
struct VoiceState {
    clip: Option<AudioClip>,
    /// A play or scheduled play was issued and not stopped.
    started: bool,
    /// Clock time at which `start_offset` is (or will be) the position.
    start_time: f64,
    start_offset: f64,
    /// Position used by the next start when no clip is sounding.
    pending_seek: f64,
    volume: f32,
    plays: u32,
    scheduled_plays: u32,
    stops: u32,
    scheduled_at: Option<f64>,
    output_group: Option<String>,
}

impl VoiceState {
    fn duration(&self) -> f64 {
        self.clip.as_ref().map_or(0.0, AudioClip::duration)
    }

    fn raw_position(&self, now: f64) -> f64 {
        if now < self.start_time {
            self.start_offset
        } else {
            self.start_offset + (now - self.start_time)
        }
    }

    fn is_playing(&self, now: f64) -> bool {
        self.started && self.raw_position(now) < self.duration()
    }

    fn position(&self, now: f64) -> f64 {
        if self.is_playing(now) {
            self.raw_position(now)
        } else {
            self.pending_seek
        }
    }

    fn start(&mut self, clip: &AudioClip, at: f64) {
        self.clip = Some(clip.clone());
        self.started = true;
        self.start_time = at;
        self.start_offset = self.pending_seek;
        self.pending_seek = 0.0;
    }
}

/// Read-only view of a virtual voice, kept by the device for inspection.
#[derive(Debug, Clone)]
pub struct VoiceProbe {
    state: Arc<Mutex<VoiceState>>,
    clock: VirtualClock,
}

impl VoiceProbe {
    pub fn is_playing(&self) -> bool {
        self.state.lock().is_playing(self.clock.now())
    }

    pub fn position(&self) -> f64 {
        self.state.lock().position(self.clock.now())
    }

    pub fn volume(&self) -> f32 {
        self.state.lock().volume
    }

    /// Immediate plays issued.
    pub fn play_count(&self) -> u32 {
        self.state.lock().plays
    }

    /// Scheduled plays issued.
    pub fn scheduled_count(&self) -> u32 {
        self.state.lock().scheduled_plays
    }

    pub fn stop_count(&self) -> u32 {
        self.state.lock().stops
    }

    /// Clock time of the most recent scheduled play.
    pub fn scheduled_at(&self) -> Option<f64> {
        self.state.lock().scheduled_at
    }

    pub fn clip_name(&self) -> Option<String> {
        self.state
            .lock()
            .clip
            .as_ref()
            .map(|clip| clip.name().to_string())
    }

    pub fn output_group(&self) -> Option<String> {
        self.state.lock().output_group.clone()
    }
}

/// Voice created by [`VirtualDevice`].
#[derive(Debug)]
pub struct VirtualVoice {
    state: Arc<Mutex<VoiceState>>,
    clock: VirtualClock,
}

impl OutputVoice for VirtualVoice {
    fn play(&mut self, clip: &AudioClip) {
        let now = self.clock.now();
        let mut state = self.state.lock();
        state.start(clip, now);
        state.plays += 1;
    }

    fn play_scheduled(&mut self, clip: &AudioClip, clock_time: f64) {
        let mut state = self.state.lock();
        state.start(clip, clock_time);
        state.scheduled_plays += 1;
        state.scheduled_at = Some(clock_time);
    }

    fn stop(&mut self) {
        let mut state = self.state.lock();
        state.started = false;
        state.pending_seek = 0.0;
        state.stops += 1;
    }

    fn is_playing(&self) -> bool {
        self.state.lock().is_playing(self.clock.now())
    }

    fn position(&self) -> f64 {
        self.state.lock().position(self.clock.now())
    }

    fn set_position(&mut self, seconds: f64) {
        let now = self.clock.now();
        let mut state = self.state.lock();
        let seconds = seconds.max(0.0);

        if !state.is_playing(now) {
            state.pending_seek = seconds;
        } else if now < state.start_time {
            state.start_offset = seconds;
        } else {
            state.start_offset = seconds;
            state.start_time = now;
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.lock().volume = volume;
    }

    fn volume(&self) -> f32 {
        self.state.lock().volume
    }
}

/// Output device with no audio backend.
#[derive(Debug, Default)]
pub struct VirtualDevice {
    clock: VirtualClock,
    voices: Vec<VoiceProbe>,
}

impl VirtualDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Device driven by an existing clock.
    pub fn with_clock(clock: VirtualClock) -> Self {
        Self {
            clock,
            voices: Vec::new(),
        }
    }

    pub fn clock(&self) -> VirtualClock {
        self.clock.clone()
    }

    /// Probes for every voice created so far, in creation order.
    pub fn voices(&self) -> &[VoiceProbe] {
        &self.voices
    }

    /// Number of voices currently producing (or scheduled to produce) sound.
    pub fn playing_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_playing()).count()
    }
}

impl OutputDevice for VirtualDevice {
    type Voice = VirtualVoice;

    fn create_voice(&mut self, index: usize, output_group: Option<&str>) -> VirtualVoice {
        debug_assert_eq!(index, self.voices.len());

        let state = Arc::new(Mutex::new(VoiceState {
            volume: 1.0,
            output_group: output_group.map(str::to_string),
            ..VoiceState::default()
        }));
        self.voices.push(VoiceProbe {
            state: Arc::clone(&state),
            clock: self.clock.clone(),
        });

        VirtualVoice {
            state,
            clock: self.clock.clone(),
        }
    }

    fn now(&self) -> f64 {
        self.clock.now()
    }
}
