//! Test helpers and fixtures for WAVY integration tests
//!
//! Every fixture runs on a `VirtualDevice`, so playback is deterministic:
//! the test owns the clock and advances it in fixed ticks.
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `VOLUME_EPSILON` (1e-5): Stored and pushed layer volumes
//! - `TIME_EPSILON` (1e-9): Clock times and voice positions

#![allow(dead_code)]

pub mod tolerances;

use wavy::prelude::*;

/// Frame time used by [`Fixture::tick`]. A power of two, so clock sums are exact.
pub const TICK: f64 = 0.25;

/// Sample rate of the silent test clips.
pub const CLIP_RATE: u32 = 100;

/// Install a test subscriber so logs show up with `--nocapture`. Safe to
/// call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn clip(name: &str, seconds: f64) -> AudioClip {
    AudioClip::silent(name.to_string(), seconds, CLIP_RATE)
}

/// Song whose layers all last `seconds`.
pub fn layered_song(name: &str, layers: usize, seconds: f64) -> SongSpec {
    let master = clip(&format!("{name}/0"), seconds);
    SongSpec::new(name, master)
        .layers((1..layers).map(|i| clip(&format!("{name}/{i}"), seconds)))
}

/// Song with a loop point at 10 s on 12 s clips.
pub fn looping_song(name: &str, layers: usize) -> SongSpec {
    layered_song(name, layers, 12.0).loop_point(10.0)
}

/// Player on a virtual device plus the clock driving it.
pub struct Fixture {
    pub player: Player<VirtualDevice>,
    pub clock: VirtualClock,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(PlayerConfig::default())
    }

    pub fn with_config(config: PlayerConfig) -> Self {
        init_tracing();
        let device = VirtualDevice::new();
        let clock = device.clock();
        let player = Player::builder(device).config(config).build();
        Self { player, clock }
    }

    pub fn register(&mut self, song: SongSpec) -> SongId {
        self.player
            .library_mut()
            .register(song)
            .expect("Failed to register test song")
    }

    /// Advance the device clock and the player by one [`TICK`].
    pub fn tick(&mut self) {
        self.advance(TICK);
    }

    pub fn advance(&mut self, dt: f64) {
        self.clock.advance(dt);
        self.player.update(dt);
    }

    pub fn ticks(&mut self, count: usize) {
        for _ in 0..count {
            self.tick();
        }
    }

    /// Tick until the clock reaches `time`.
    pub fn run_until(&mut self, time: f64) {
        while self.clock.now() < time {
            self.tick();
        }
    }

    pub fn events(&mut self) -> Vec<PlayerEvent> {
        self.player.drain_events().collect()
    }

    /// Volumes of every voice the device has created, in creation order.
    pub fn voice_volumes(&self) -> Vec<f32> {
        self.player
            .device()
            .voices()
            .iter()
            .map(|voice| voice.volume())
            .collect()
    }

    pub fn layer_volumes(&self, song: SongId, layers: usize) -> Vec<f32> {
        (0..layers)
            .map(|layer| {
                self.player
                    .layer_volume(song, layer)
                    .expect("song is not playing")
            })
            .collect()
    }
}

/// Assert two volume lists match within [`tolerances::VOLUME_EPSILON`].
pub fn assert_volumes(actual: &[f32], expected: &[f32]) {
    assert_eq!(actual.len(), expected.len(), "volume count mismatch");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= tolerances::VOLUME_EPSILON,
            "index {}: expected volume {}, got {}",
            i,
            e,
            a
        );
    }
}
