//! Fade integration tests
//!
//! Layer fan-out, completion callbacks, superseding and the stop guard.

use crate::helpers::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wavy::prelude::*;

/// `set_layers(song, 0.5, [0, 2])` on a three-layer song fades layer 1 out
/// and layers 0 and 2 in, whatever order the layers are listed in.
#[test]
fn test_set_layers_fans_out_independently() {
    for selection in [[0usize, 2], [2, 0]] {
        let mut fx = Fixture::new();
        let song = fx.register(layered_song("theme", 3, 30.0));
        fx.player.play(song, &[0, 1]).unwrap();

        fx.player.set_layers(song, 0.5, &selection).unwrap();
        assert_eq!(fx.player.active_fades(), 3);

        fx.tick();
        assert_volumes(&fx.layer_volumes(song, 3), &[1.0, 0.5, 0.5]);

        fx.tick();
        assert_volumes(&fx.layer_volumes(song, 3), &[1.0, 0.0, 1.0]);
        assert_volumes(&fx.voice_volumes(), &[1.0, 0.0, 1.0]);
        assert_eq!(fx.player.enabled_layers(song), Some(&[0, 2][..]));
        assert_eq!(fx.player.active_fades(), 0);
    }
}

#[test]
fn test_fade_callback_runs_once_on_completion() {
    let mut fx = Fixture::new();
    let song = fx.register(layered_song("theme", 2, 30.0));
    fx.player.play(song, &[0]).unwrap();

    let calls = Rc::new(RefCell::new(Vec::new()));
    let record = Rc::clone(&calls);
    fx.player
        .fade_track(
            song,
            1,
            0.5,
            0.8,
            Some(Box::new(move |s: SongId, layer: usize| {
                record.borrow_mut().push((s, layer))
            })),
        )
        .unwrap();

    fx.tick();
    assert!(calls.borrow().is_empty());

    fx.ticks(4);
    assert_eq!(calls.borrow().as_slice(), &[(song, 1usize)]);
    assert_volumes(&fx.layer_volumes(song, 2), &[1.0, 0.8]);
    assert!(fx
        .events()
        .contains(&PlayerEvent::FadeFinished { song, layer: 1 }));
}

#[test]
fn test_zero_duration_fade_is_immediate() {
    let mut fx = Fixture::new();
    let song = fx.register(layered_song("theme", 2, 30.0));
    fx.player.play(song, &[0]).unwrap();

    let fired = Rc::new(Cell::new(false));
    let flag = Rc::clone(&fired);
    fx.player
        .fade_track(
            song,
            1,
            0.0,
            0.6,
            Some(Box::new(move |_: SongId, _: usize| flag.set(true))),
        )
        .unwrap();

    assert!(fired.get());
    assert_volumes(&fx.voice_volumes(), &[1.0, 0.6]);
    assert_eq!(fx.player.active_fades(), 0);
}

/// A new fade on the same layer continues from the level the old one
/// reached, and the old callback never runs.
#[test]
fn test_new_fade_supersedes_running_fade() {
    let mut fx = Fixture::new();
    let song = fx.register(layered_song("theme", 1, 30.0));
    fx.player.play(song, &[0]).unwrap();

    let fired = Rc::new(Cell::new(false));
    let flag = Rc::clone(&fired);
    fx.player
        .fade_track(
            song,
            0,
            1.0,
            0.0,
            Some(Box::new(move |_: SongId, _: usize| flag.set(true))),
        )
        .unwrap();
    fx.ticks(2);
    assert_volumes(&fx.layer_volumes(song, 1), &[0.5]);

    fx.player.fade_track(song, 0, 1.0, 1.0, None).unwrap();
    assert_eq!(fx.player.active_fades(), 1);

    fx.ticks(2);
    assert_volumes(&fx.layer_volumes(song, 1), &[0.75]);

    fx.ticks(4);
    assert_volumes(&fx.layer_volumes(song, 1), &[1.0]);
    assert!(!fired.get());
}

#[test]
fn test_set_volume_cancels_fade() {
    let mut fx = Fixture::new();
    let song = fx.register(layered_song("theme", 2, 30.0));
    fx.player.play(song, &[0]).unwrap();

    fx.player.fade_track(song, 1, 1.0, 1.0, None).unwrap();
    fx.tick();
    fx.player.set_layer_volume(song, 0.3, 1).unwrap();

    fx.ticks(8);
    assert_volumes(&fx.layer_volumes(song, 2), &[1.0, 0.3]);
    assert!(!fx
        .events()
        .contains(&PlayerEvent::FadeFinished { song, layer: 1 }));
}

/// While a stop is unwinding, other fades and volume sets are refused.
#[test]
fn test_stop_fades_take_priority() {
    let mut fx = Fixture::new();
    let song = fx.register(layered_song("theme", 2, 30.0));
    fx.player.play(song, &[0, 1]).unwrap();

    fx.player.stop(song, 1.0).unwrap();
    fx.player.fade_track(song, 0, 0.25, 1.0, None).unwrap();
    fx.player.set_volume(song, 1.0, &[1]).unwrap();

    fx.ticks(2);
    assert_volumes(&fx.layer_volumes(song, 2), &[0.5, 0.5]);

    fx.ticks(2);
    assert!(!fx.player.is_playing(song));
}

#[test]
fn test_fade_ignored_when_song_not_playing() {
    let mut fx = Fixture::new();
    let song = fx.register(layered_song("theme", 1, 30.0));

    fx.player.fade_track(song, 0, 1.0, 0.5, None).unwrap();
    fx.player.set_volume(song, 0.5, &[0]).unwrap();
    assert_eq!(fx.player.active_fades(), 0);
    assert!(fx.player.layer_volume(song, 0).is_none());
}
