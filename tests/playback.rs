#![cfg(not(target_arch = "wasm32"))]

use promo_wasm::playback::{PlaybackCommand, PlaybackToggle};

#[test]
fn toggle_starts_then_pauses() {
    let mut state = PlaybackToggle::new();
    assert!(!state.is_playing());

    assert_eq!(state.toggle(), Some(PlaybackCommand::RequestPlay));
    assert!(state.is_requesting());
    assert!(!state.is_playing());

    assert_eq!(state.play_resolved(true), None);
    assert!(state.is_playing());

    assert_eq!(state.toggle(), Some(PlaybackCommand::Pause));
    assert!(!state.is_playing());
}

#[test]
fn rejected_start_stays_stopped() {
    let mut state = PlaybackToggle::new();
    assert_eq!(state.toggle(), Some(PlaybackCommand::RequestPlay));
    assert_eq!(state.play_resolved(false), None);
    assert!(!state.is_playing());
    assert!(!state.is_requesting());

    // The next toggle starts a fresh request.
    assert_eq!(state.toggle(), Some(PlaybackCommand::RequestPlay));
}

#[test]
fn toggle_during_request_is_reconciled_at_completion() {
    let mut state = PlaybackToggle::new();
    assert_eq!(state.toggle(), Some(PlaybackCommand::RequestPlay));
    // Second toggle lands while the request is in flight: no command yet.
    assert_eq!(state.toggle(), None);

    // Playback actually started, but the user no longer wants it.
    assert_eq!(state.play_resolved(true), Some(PlaybackCommand::Pause));
    assert!(!state.is_playing());
}

#[test]
fn toggling_back_during_request_keeps_playing() {
    let mut state = PlaybackToggle::new();
    assert_eq!(state.toggle(), Some(PlaybackCommand::RequestPlay));
    assert_eq!(state.toggle(), None);
    assert_eq!(state.toggle(), None);
    // Desired state ended where it started: playing.
    assert_eq!(state.play_resolved(true), None);
    assert!(state.is_playing());
}

#[test]
fn at_most_one_request_outstanding() {
    let mut state = PlaybackToggle::new();
    let mut requests = 0;
    for _ in 0..10 {
        if state.toggle() == Some(PlaybackCommand::RequestPlay) {
            requests += 1;
        }
    }
    assert_eq!(requests, 1);
}

#[test]
fn natural_end_of_stream_stops_playback() {
    let mut state = PlaybackToggle::new();
    state.toggle();
    state.play_resolved(true);
    assert!(state.is_playing());

    state.stream_ended();
    assert!(!state.is_playing());

    // Toggling again starts over from Stopped.
    assert_eq!(state.toggle(), Some(PlaybackCommand::RequestPlay));
}

#[test]
fn resource_error_forces_stopped() {
    let mut state = PlaybackToggle::new();
    state.toggle();
    state.play_resolved(true);
    assert!(state.is_playing());

    state.stream_error();
    assert!(!state.is_playing());
}

#[test]
fn error_during_request_then_rejection() {
    let mut state = PlaybackToggle::new();
    assert_eq!(state.toggle(), Some(PlaybackCommand::RequestPlay));
    state.stream_error();
    // The in-flight request still resolves, as a rejection.
    assert_eq!(state.play_resolved(false), None);
    assert!(!state.is_playing());
    assert!(!state.is_requesting());
}

#[test]
fn double_toggle_is_identity_without_resource_events() {
    // Stopped -> Playing -> Stopped.
    let mut state = PlaybackToggle::new();
    state.toggle();
    state.play_resolved(true);
    state.toggle();
    state.toggle();
    state.play_resolved(true);
    state.toggle();
    assert!(!state.is_playing());
}
