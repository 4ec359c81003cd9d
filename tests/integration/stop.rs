//! Stop sequence integration tests
//!
//! Fade-out, teardown, interruption mid-stop and restarting a stop.

use crate::helpers::*;
use wavy::prelude::*;

fn two_layer_fixture() -> (Fixture, SongId) {
    let mut fx = Fixture::new();
    let song = fx.register(layered_song("theme", 2, 30.0));
    fx.player.play(song, &[0, 1]).unwrap();
    fx.tick();
    fx.events();
    (fx, song)
}

#[test]
fn test_stop_fades_out_then_releases_tracks() {
    let (mut fx, song) = two_layer_fixture();

    fx.player.stop(song, 1.0).unwrap();
    assert!(fx.player.is_stopping(song));

    fx.ticks(2);
    assert_volumes(&fx.layer_volumes(song, 2), &[0.5, 0.5]);
    assert_volumes(&fx.voice_volumes(), &[0.5, 0.5]);

    fx.ticks(2);
    assert!(!fx.player.is_playing(song));
    assert!(!fx.player.is_stopping(song));
    assert_eq!(fx.player.pool().idle_count(), 2);
    assert_eq!(fx.player.device().playing_voices(), 0);
    assert_eq!(fx.player.active_fades(), 0);

    let events = fx.events();
    assert_eq!(
        events,
        [
            PlayerEvent::FadeFinished { song, layer: 1 },
            PlayerEvent::FadeFinished { song, layer: 0 },
            PlayerEvent::Stopped { song },
        ]
    );
}

/// Interrupting at 0.5 s of a 2 s stop keeps the 0.5 s volumes and leaves
/// the song playing.
#[test]
fn test_interrupt_keeps_partially_faded_volumes() {
    let (mut fx, song) = two_layer_fixture();

    fx.player.stop(song, 2.0).unwrap();
    fx.ticks(2);
    fx.player.interrupt_stopping(song).unwrap();

    assert!(!fx.player.is_stopping(song));
    assert!(fx.player.is_playing(song));
    assert_eq!(fx.player.active_fades(), 0);
    assert_volumes(&fx.layer_volumes(song, 2), &[0.75, 0.75]);

    fx.ticks(12);
    assert!(fx.player.is_playing(song));
    assert_volumes(&fx.layer_volumes(song, 2), &[0.75, 0.75]);
    assert_volumes(&fx.voice_volumes(), &[0.75, 0.75]);
    assert_eq!(fx.player.device().playing_voices(), 2);
}

/// `play` after an interrupted stop reverses the fade-out on the same
/// voices: nothing restarts from silence and nothing is triggered again.
#[test]
fn test_play_after_interrupt_restores_layers() {
    let (mut fx, song) = two_layer_fixture();
    let tracks = fx.player.song_tracks(song).unwrap();

    fx.player.stop(song, 2.0).unwrap();
    fx.ticks(2);
    fx.player.interrupt_stopping(song).unwrap();
    fx.player.play(song, &[]).unwrap();
    fx.tick();

    assert_eq!(fx.player.song_tracks(song).unwrap(), tracks);
    assert_volumes(&fx.layer_volumes(song, 2), &[1.0, 1.0]);
    assert_volumes(&fx.voice_volumes(), &[1.0, 1.0]);
    let plays: u32 = fx
        .player
        .device()
        .voices()
        .iter()
        .map(|voice| voice.play_count())
        .sum();
    assert_eq!(plays, 2);
}

#[test]
fn test_play_interrupts_stop() {
    let (mut fx, song) = two_layer_fixture();

    fx.player.stop(song, 2.0).unwrap();
    fx.ticks(2);
    fx.player.play(song, &[]).unwrap();

    assert!(!fx.player.is_stopping(song));
    assert_eq!(fx.player.active_fades(), 0);

    fx.ticks(10);
    assert!(fx.player.is_playing(song));
    assert_volumes(&fx.layer_volumes(song, 2), &[1.0, 1.0]);
}

/// A new selection passed to `play` mid-stop is applied to the kept tracks.
#[test]
fn test_play_with_layers_reverses_stop() {
    let (mut fx, song) = two_layer_fixture();

    fx.player.stop(song, 2.0).unwrap();
    fx.ticks(2);
    fx.player.play(song, &[1]).unwrap();

    assert_eq!(fx.player.enabled_layers(song), Some(&[1][..]));
    assert_volumes(&fx.voice_volumes(), &[0.0, 1.0]);
    fx.ticks(10);
    assert!(fx.player.is_playing(song));
}

/// A second stop restarts the unwind from the current volumes.
#[test]
fn test_stop_restart_uses_current_volumes() {
    let (mut fx, song) = two_layer_fixture();

    fx.player.stop(song, 2.0).unwrap();
    fx.ticks(2);
    fx.player.stop(song, 1.0).unwrap();
    assert!(fx.player.is_stopping(song));

    fx.ticks(2);
    assert_volumes(&fx.layer_volumes(song, 2), &[0.375, 0.375]);

    fx.ticks(2);
    assert!(!fx.player.is_playing(song));
}

/// After interrupting, fades are accepted again and `set_layers` can
/// reverse the stop.
#[test]
fn test_set_layers_after_interrupt_fades_back_in() {
    let (mut fx, song) = two_layer_fixture();

    fx.player.stop(song, 2.0).unwrap();
    fx.ticks(4);
    fx.player.interrupt_stopping(song).unwrap();
    assert_volumes(&fx.layer_volumes(song, 2), &[0.5, 0.5]);

    fx.player.set_layers(song, 1.0, &[0]).unwrap();
    fx.ticks(4);
    assert_volumes(&fx.layer_volumes(song, 2), &[1.0, 0.0]);
}

#[test]
fn test_instant_stop() {
    let (mut fx, song) = two_layer_fixture();

    fx.player.stop(song, 0.0).unwrap();
    assert!(!fx.player.is_playing(song));
    assert_eq!(fx.player.device().playing_voices(), 0);
    assert!(fx.events().contains(&PlayerEvent::Stopped { song }));
}

#[test]
fn test_stop_when_not_playing_is_a_noop() {
    let mut fx = Fixture::new();
    let song = fx.register(layered_song("theme", 1, 30.0));

    fx.player.stop(song, 1.0).unwrap();
    fx.player.interrupt_stopping(song).unwrap();
    assert!(fx.events().is_empty());
    assert!(fx.player.pool().is_empty());
}

#[test]
fn test_stop_all() {
    let mut fx = Fixture::new();
    let a = fx.register(layered_song("a", 2, 30.0));
    let b = fx.register(layered_song("b", 1, 30.0));
    fx.player.play(a, &[]).unwrap();
    fx.player.play(b, &[]).unwrap();

    fx.player.stop_all(0.5);
    assert!(fx.player.is_stopping(a));
    assert!(fx.player.is_stopping(b));

    fx.ticks(2);
    assert_eq!(fx.player.active_songs().count(), 0);
    assert_eq!(fx.player.pool().idle_count(), 3);
}
