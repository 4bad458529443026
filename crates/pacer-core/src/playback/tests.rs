use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use parking_lot::Mutex;

use super::*;
use crate::{
    content::segment,
    progress::estimate_remaining_ms,
    settings::{MAX_WPM, MIN_WPM},
};

fn engine_at(start_ms: u64) -> (ReaderEngine<ManualClock>, ManualClock) {
    let clock = ManualClock::new(start_ms);
    let engine = ReaderEngine::with_clock(ReaderConfig::default(), clock.clone());
    (engine, clock)
}

fn loaded(text: &str) -> (ReaderEngine<ManualClock>, ManualClock) {
    let (mut engine, clock) = engine_at(0);
    engine.load(segment(text));
    (engine, clock)
}

fn record(engine: &mut ReaderEngine<ManualClock>) -> Arc<Mutex<Vec<ReaderState>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    engine.subscribe(move |state| sink.lock().push(state.clone()));
    seen
}

#[test]
fn new_session_starts_empty() {
    let (engine, _) = engine_at(0);
    let state = engine.state();

    assert!(state.is_empty());
    assert_eq!(state.index, 0);
    assert!(!state.is_playing);
    assert_eq!(state.wpm, 600);
    assert_eq!(state.cadence_profile, CadenceProfile::Normal);
    assert_eq!(state.phase(), PlaybackPhase::Empty);
}

#[test]
fn initial_wpm_is_clamped() {
    let engine = ReaderEngine::with_clock(
        ReaderConfig::default().with_wpm(5_000),
        ManualClock::default(),
    );
    assert_eq!(engine.state().wpm, MAX_WPM);
}

#[test]
fn step_forward_moves_exactly_one_unit() {
    let (mut engine, _) = loaded("Hello world. This is fast.");

    assert_eq!(engine.state().index, 0);
    engine.step_forward();
    assert_eq!(engine.state().index, 1);
}

#[test]
fn steps_clamp_at_both_ends() {
    let (mut engine, _) = loaded("one two");

    engine.step_back();
    assert_eq!(engine.state().index, 0);

    engine.step_forward();
    engine.step_forward();
    engine.step_forward();
    assert_eq!(engine.state().index, 1);
}

#[test]
fn seek_clamps_into_range() {
    let (mut engine, _) = loaded("a b c d");

    engine.seek(99);
    assert_eq!(engine.state().index, 3);

    engine.seek_relative(-10);
    assert_eq!(engine.state().index, 0);

    engine.seek_relative(2);
    assert_eq!(engine.state().index, 2);

    engine.seek(1);
    assert_eq!(engine.state().index, 1);
}

#[test]
fn empty_session_ignores_transport_controls() {
    let (mut engine, _) = engine_at(0);
    let seen = record(&mut engine);

    engine.play();
    engine.toggle();
    engine.step_forward();
    engine.step_back();
    engine.seek(4);
    engine.seek_relative(-1);

    assert!(!engine.state().is_playing);
    assert!(!engine.is_heartbeat_active());
    assert_eq!(engine.state().index, 0);
    assert!(seen.lock().is_empty());
}

#[test]
fn set_wpm_clamps_and_notifies() {
    let (mut engine, _) = engine_at(0);
    let seen = record(&mut engine);

    engine.set_wpm(100);
    assert_eq!(engine.state().wpm, MIN_WPM);

    engine.set_wpm(5_000);
    assert_eq!(engine.state().wpm, MAX_WPM);

    engine.set_wpm(700);
    assert_eq!(engine.state().wpm, 700);
    assert_eq!(seen.lock().len(), 3);
}

#[test]
fn load_rewinds_and_cancels_playback() {
    let (mut engine, clock) = loaded("one two three");
    engine.seek(2);
    engine.play();
    assert!(engine.is_heartbeat_active());

    engine.load(segment("fresh text"));
    assert_eq!(engine.state().index, 0);
    assert!(!engine.state().is_playing);
    assert!(!engine.is_heartbeat_active());
    assert_eq!(engine.state().len(), 2);

    clock.set(60_000);
    assert_eq!(engine.tick(), TickResult::Idle);
    assert_eq!(engine.state().index, 0);
}

#[test]
fn load_text_rejects_blank_input() {
    let (mut engine, _) = loaded("keep me");

    assert_eq!(engine.load_text(" \n\n\t"), Err(PacerError::EmptyText));
    assert_eq!(engine.state().len(), 2);

    assert_eq!(engine.load_text("Hello world.\n\nBye"), Ok(4));
    assert_eq!(engine.state().current_unit(), Some(&Unit::Word("Hello".into())));
}

#[test]
fn tick_waits_for_the_deadline() {
    let (mut engine, clock) = loaded("Hello world. Bye");
    engine.play();
    assert_eq!(engine.next_due_ms(), Some(100));

    clock.set(99);
    assert_eq!(engine.tick(), TickResult::Waiting);
    assert_eq!(engine.state().index, 0);

    clock.advance(1);
    assert_eq!(engine.tick(), TickResult::Advanced);
    assert_eq!(engine.state().index, 1);
    // "world." holds 100ms plus the 400ms stop pause.
    assert_eq!(engine.next_due_ms(), Some(600));
}

#[test]
fn late_tick_anchors_next_deadline_to_fire_time() {
    let (mut engine, clock) = loaded("Hello world. Bye");
    engine.play();
    clock.set(100);
    engine.tick();

    clock.set(650);
    assert_eq!(engine.tick(), TickResult::Advanced);
    assert_eq!(engine.state().index, 2);
    assert_eq!(engine.next_due_ms(), Some(650 + 90));
}

#[test]
fn reaching_the_end_stops_playback() {
    let (mut engine, clock) = loaded("Hello world. Bye");
    let seen = record(&mut engine);
    engine.play();
    clock.set(100);
    engine.tick();
    clock.set(600);
    engine.tick();

    clock.set(690);
    assert_eq!(engine.tick(), TickResult::Finished);
    assert_eq!(engine.state().index, 2);
    assert!(!engine.state().is_playing);
    assert!(!engine.is_heartbeat_active());
    assert_eq!(engine.state().phase(), PlaybackPhase::Exhausted);

    let last = seen.lock().last().cloned().expect("end of content notifies");
    assert!(!last.is_playing);
    assert_eq!(last.index, 2);

    clock.set(10_000);
    assert_eq!(engine.tick(), TickResult::Idle);
    assert_eq!(seen.lock().len(), 4);
}

#[test]
fn wpm_change_rearms_full_delay_from_now() {
    let (mut engine, clock) = loaded("hello world");
    engine.play();
    assert_eq!(engine.next_due_ms(), Some(100));

    clock.set(80);
    engine.set_wpm(300);
    assert_eq!(engine.next_due_ms(), Some(80 + 200));

    clock.set(279);
    assert_eq!(engine.tick(), TickResult::Waiting);
    clock.set(280);
    assert_eq!(engine.tick(), TickResult::Advanced);
}

#[test]
fn profile_change_rearms_from_now() {
    let (mut engine, clock) = loaded("world. next");
    engine.play();
    assert_eq!(engine.next_due_ms(), Some(500));

    clock.set(10);
    engine.set_cadence_profile(CadenceProfile::Strong);
    assert_eq!(engine.state().cadence_profile, CadenceProfile::Strong);
    assert_eq!(engine.next_due_ms(), Some(10 + 100 + 550));
}

#[test]
fn settings_change_while_paused_arms_nothing() {
    let (mut engine, _) = loaded("hello world");
    engine.set_wpm(900);
    engine.set_cadence_profile(CadenceProfile::Strong);

    assert_eq!(engine.next_due_ms(), None);
    assert!(!engine.is_heartbeat_active());
}

#[test]
fn pause_freezes_and_play_rearms_from_now() {
    let (mut engine, clock) = loaded("hello world again");
    engine.play();

    clock.set(50);
    engine.pause();
    assert!(!engine.is_heartbeat_active());
    assert_eq!(engine.state().phase(), PlaybackPhase::Paused);

    clock.set(1_000);
    assert_eq!(engine.tick(), TickResult::Idle);
    assert_eq!(engine.state().index, 0);

    engine.play();
    assert_eq!(engine.next_due_ms(), Some(1_100));
    assert_eq!(engine.tick(), TickResult::Waiting);
}

#[test]
fn toggle_flips_between_play_and_pause() {
    let (mut engine, _) = loaded("one two");

    engine.toggle();
    assert!(engine.state().is_playing);
    assert_eq!(engine.state().phase(), PlaybackPhase::Playing);

    engine.toggle();
    assert!(!engine.state().is_playing);
    assert!(!engine.is_heartbeat_active());
}

#[test]
fn restart_keeps_playing_and_rearms() {
    let (mut engine, clock) = loaded("Hello world. Bye");
    engine.play();
    clock.set(100);
    engine.tick();
    assert_eq!(engine.state().index, 1);

    clock.set(300);
    engine.restart();
    assert_eq!(engine.state().index, 0);
    assert!(engine.state().is_playing);
    assert_eq!(engine.next_due_ms(), Some(400));
}

#[test]
fn restart_leaves_exhausted_session_paused() {
    let (mut engine, clock) = loaded("one two");
    engine.play();
    clock.set(1_000);
    engine.tick();
    clock.set(2_000);
    assert_eq!(engine.tick(), TickResult::Finished);

    engine.restart();
    assert_eq!(engine.state().index, 0);
    assert!(!engine.state().is_playing);
    assert_eq!(engine.state().phase(), PlaybackPhase::Paused);

    engine.play();
    assert!(engine.is_heartbeat_active());
}

#[test]
fn seek_leaves_exhausted_state() {
    let (mut engine, clock) = loaded("one two");
    engine.play();
    clock.set(1_000);
    engine.tick();
    clock.set(2_000);
    engine.tick();
    assert_eq!(engine.state().phase(), PlaybackPhase::Exhausted);

    engine.seek(0);
    assert_eq!(engine.state().phase(), PlaybackPhase::Paused);
}

#[test]
fn stepping_while_playing_rearms_for_new_unit() {
    let (mut engine, clock) = loaded("Hello world. Bye");
    engine.play();

    clock.set(30);
    engine.step_forward();
    assert_eq!(engine.state().index, 1);
    assert_eq!(engine.next_due_ms(), Some(30 + 500));

    clock.set(40);
    engine.step_back();
    assert_eq!(engine.next_due_ms(), Some(40 + 100));
}

#[test]
fn paragraph_break_holds_for_its_fixed_pause() {
    let (mut engine, clock) = loaded("end.\n\nstart");
    engine.seek(1);
    assert_eq!(engine.state().current_unit(), Some(&Unit::ParagraphBreak));

    clock.set(5);
    engine.play();
    assert_eq!(engine.next_due_ms(), Some(5 + 700));
}

#[test]
fn observers_run_in_registration_order() {
    let (mut engine, _) = loaded("one two");
    let calls = Arc::new(Mutex::new(Vec::new()));

    let first_calls = Arc::clone(&calls);
    let first = engine.subscribe(move |_| first_calls.lock().push("first"));
    let second_calls = Arc::clone(&calls);
    engine.subscribe(move |_| second_calls.lock().push("second"));
    assert_eq!(engine.observer_count(), 2);

    engine.play();
    assert_eq!(*calls.lock(), ["first", "second"]);

    assert!(engine.unsubscribe(first));
    assert!(!engine.unsubscribe(first));
    engine.pause();
    assert_eq!(*calls.lock(), ["first", "second", "second"]);
}

#[test]
fn no_op_controls_do_not_notify() {
    let (mut engine, _) = loaded("one two");
    let seen = record(&mut engine);

    engine.pause();
    engine.play();
    engine.play();
    assert_eq!(seen.lock().len(), 1);
}

#[test]
fn observers_receive_complete_snapshots() {
    let (mut engine, clock) = loaded("one two");
    let seen = record(&mut engine);

    engine.play();
    clock.set(1_000);
    engine.tick();
    engine.set_wpm(900);

    let seen = seen.lock();
    assert_eq!(seen.len(), 3);
    assert!(seen[0].is_playing && seen[0].index == 0);
    assert!(seen[1].is_playing && seen[1].index == 1);
    assert_eq!(seen[2].wpm, 900);
    assert!(Arc::ptr_eq(&seen[2].units, &engine.state().units));
}

#[test]
fn scrub_resumes_only_when_it_interrupted_playback() {
    let (mut engine, _) = loaded("a b c d e");

    engine.play();
    engine.begin_scrub();
    assert!(!engine.state().is_playing);
    engine.seek(3);
    engine.end_scrub();
    assert!(engine.state().is_playing);
    assert_eq!(engine.state().index, 3);

    engine.pause();
    engine.begin_scrub();
    engine.end_scrub();
    assert!(!engine.state().is_playing);
}

#[test]
fn heartbeat_thread_plays_to_the_end() {
    let mut engine = ReaderEngine::new(ReaderConfig::default().with_wpm(MAX_WPM));
    engine.load(segment("one two three"));
    let budget_ms = estimate_remaining_ms(
        &engine.state().units,
        0,
        MAX_WPM,
        CadenceProfile::Normal,
    );

    let shared = engine.into_shared();
    let heartbeat = Heartbeat::spawn_default(Arc::clone(&shared)).expect("spawn heartbeat");
    shared.lock().play();

    let started = Instant::now();
    let give_up = Duration::from_millis(budget_ms + 5_000);
    while shared.lock().state().is_playing {
        assert!(started.elapsed() < give_up, "playback never finished");
        thread::sleep(Duration::from_millis(10));
    }
    heartbeat.stop();

    let engine = shared.lock();
    assert_eq!(engine.state().index, 2);
    assert!(!engine.is_heartbeat_active());
    assert!(started.elapsed() >= Duration::from_millis(budget_ms));
}
