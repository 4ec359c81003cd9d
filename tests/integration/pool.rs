//! Track pool integration tests
//!
//! Allocation on demand, reuse of finished tracks, and isolation between
//! songs playing at the same time.

use crate::helpers::*;
use wavy::prelude::*;

/// Tracks returned by a finished song serve the next song without growing
/// the pool.
#[test]
fn test_finished_tracks_are_reused() {
    let mut fx = Fixture::new();
    let jingle = fx.register(layered_song("jingle", 3, 1.0));
    let sting = fx.register(layered_song("sting", 2, 1.0));

    fx.player.play(jingle, &[0, 1, 2]).unwrap();
    fx.ticks(5);
    assert!(!fx.player.is_playing(jingle));
    assert_eq!(fx.player.pool().idle_count(), 3);

    fx.player.play(sting, &[]).unwrap();
    assert_eq!(fx.player.pool().len(), 3);
    assert_eq!(fx.player.pool().idle_count(), 1);
    assert_eq!(fx.player.device().voices().len(), 3);
}

/// A second `play` on a playing song keeps the same tracks and never
/// starts a second voice.
#[test]
fn test_replay_does_not_duplicate_voices() {
    let mut fx = Fixture::new();
    let song = fx.register(layered_song("theme", 2, 30.0));

    fx.player.play(song, &[0]).unwrap();
    let tracks = fx.player.song_tracks(song).unwrap();
    fx.tick();

    fx.player.play(song, &[0]).unwrap();
    fx.tick();

    assert_eq!(fx.player.song_tracks(song).unwrap(), tracks);
    assert_eq!(fx.player.pool().len(), 2);
    assert_eq!(fx.player.device().playing_voices(), 2);

    let plays: u32 = fx
        .player
        .device()
        .voices()
        .iter()
        .map(|voice| voice.play_count())
        .sum();
    assert_eq!(plays, 2);

    let started = fx
        .events()
        .into_iter()
        .filter(|event| matches!(event, PlayerEvent::Started { .. }))
        .count();
    assert_eq!(started, 1);
}

#[test]
fn test_concurrent_songs_never_share_tracks() {
    let mut fx = Fixture::new();
    let a = fx.register(layered_song("a", 2, 30.0));
    let b = fx.register(layered_song("b", 2, 30.0));

    fx.player.play(a, &[]).unwrap();
    fx.player.play(b, &[]).unwrap();

    let tracks_a = fx.player.song_tracks(a).unwrap();
    let tracks_b = fx.player.song_tracks(b).unwrap();
    assert!(tracks_a.iter().all(|track| !tracks_b.contains(track)));
    assert_eq!(fx.player.pool().len(), 4);

    for track in tracks_a.iter().flatten() {
        assert_eq!(fx.player.pool().get(*track).song(), Some(a));
    }
}

#[test]
fn test_prewarmed_tracks_carry_output_group() {
    let config = PlayerConfig {
        prewarm_tracks: 4,
        output_group: Some("Music".to_string()),
        ..PlayerConfig::default()
    };
    let mut fx = Fixture::with_config(config);
    assert_eq!(fx.player.pool().len(), 4);
    assert_eq!(fx.player.pool().idle_count(), 4);

    let song = fx.register(layered_song("theme", 3, 30.0));
    fx.player.play(song, &[]).unwrap();
    assert_eq!(fx.player.pool().len(), 4);
    assert_eq!(fx.player.pool().idle_count(), 1);

    for voice in fx.player.device().voices() {
        assert_eq!(voice.output_group().as_deref(), Some("Music"));
    }
}

/// Only the master track of a song is flagged as master.
#[test]
fn test_single_master_per_song() {
    let mut fx = Fixture::new();
    let song = fx.register(layered_song("theme", 3, 30.0));
    fx.player.play(song, &[]).unwrap();

    let tracks = fx.player.song_tracks(song).unwrap();
    let masters: Vec<bool> = tracks
        .iter()
        .flatten()
        .map(|track| fx.player.pool().get(*track).is_master())
        .collect();
    assert_eq!(masters, [true, false, false]);
}
