//! Playback scheduler: session state, transport controls, and the heartbeat tick.
//!
//! All mutations happen synchronously inside the operation that triggers them
//! or inside [`ReaderEngine::tick`]. Observers are called after every mutation
//! with the complete state, in registration order.

mod clock;
mod heartbeat;
mod observers;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use log::{debug, info};

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use heartbeat::{Heartbeat, SharedEngine};
pub use observers::{Observer, Subscription};

use crate::{
    cadence::{CadenceProfile, delay_ms},
    content::{Unit, segment, word_count},
    error::{PacerError, PacerResult},
    settings::{ReaderConfig, clamp_wpm},
};
use observers::Observers;

/// Snapshot of a reading session.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReaderState {
    /// Loaded units. Replaced wholesale by [`ReaderEngine::load`].
    pub units: Arc<[Unit]>,
    /// Current position; always `0` when `units` is empty.
    pub index: usize,
    pub is_playing: bool,
    pub wpm: u16,
    pub cadence_profile: CadenceProfile,
}

impl ReaderState {
    fn new(config: ReaderConfig) -> Self {
        Self {
            units: Arc::from(Vec::new()),
            index: 0,
            is_playing: false,
            wpm: config.wpm,
            cadence_profile: config.cadence_profile,
        }
    }

    pub fn current_unit(&self) -> Option<&Unit> {
        self.units.get(self.index)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.units.len().checked_sub(1)
    }

    /// Hold time of the current unit at the session's speed and profile.
    pub fn current_delay_ms(&self) -> Option<u32> {
        self.current_unit()
            .map(|unit| delay_ms(unit, self.wpm, self.cadence_profile))
    }

    pub fn phase(&self) -> PlaybackPhase {
        if self.units.is_empty() {
            PlaybackPhase::Empty
        } else if self.is_playing {
            PlaybackPhase::Playing
        } else if Some(self.index) == self.last_index() {
            PlaybackPhase::Exhausted
        } else {
            PlaybackPhase::Paused
        }
    }

    fn clamp_index(&self, index: usize) -> usize {
        self.last_index().map_or(0, |last| index.min(last))
    }
}

/// Derived view of the session's state machine. `Exhausted` is a paused
/// session sitting on its last unit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlaybackPhase {
    Empty,
    Paused,
    Playing,
    Exhausted,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    /// Heartbeat stopped; nothing to do.
    Idle,
    /// Current unit still within its hold time.
    Waiting,
    Advanced,
    /// Moved past the last unit; playback stopped.
    Finished,
}

pub struct ReaderEngine<C = MonotonicClock> {
    clock: C,
    state: ReaderState,
    heartbeat_interval_ms: u64,
    next_due_ms: u64,
    heartbeat_active: bool,
    resume_after_scrub: bool,
    observers: Observers,
}

impl ReaderEngine<MonotonicClock> {
    pub fn new(config: ReaderConfig) -> Self {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl<C: Clock> ReaderEngine<C> {
    pub fn with_clock(config: ReaderConfig, clock: C) -> Self {
        let config = config.normalized();

        Self {
            clock,
            state: ReaderState::new(config),
            heartbeat_interval_ms: config.heartbeat_interval_ms,
            next_due_ms: 0,
            heartbeat_active: false,
            resume_after_scrub: false,
            observers: Observers::default(),
        }
    }

    pub fn state(&self) -> &ReaderState {
        &self.state
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn heartbeat_interval_ms(&self) -> u64 {
        self.heartbeat_interval_ms
    }

    pub fn is_heartbeat_active(&self) -> bool {
        self.heartbeat_active
    }

    /// Deadline of the current unit while playing.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.state.is_playing.then_some(self.next_due_ms)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Replaces the content, rewinds to the start and stops playback.
    pub fn load(&mut self, units: impl Into<Arc<[Unit]>>) {
        self.stop_heartbeat();

        let units = units.into();
        info!(
            "playback: load units={} words={}",
            units.len(),
            word_count(&units)
        );

        self.state.units = units;
        self.state.index = 0;
        self.state.is_playing = false;
        self.resume_after_scrub = false;
        self.emit();
    }

    /// Segments and loads `text`, returning the unit count. Text without any
    /// word leaves the session untouched.
    pub fn load_text(&mut self, text: &str) -> PacerResult<usize> {
        let units = segment(text);
        if units.is_empty() {
            debug!("playback: rejected text without words (bytes={})", text.len());
            return Err(PacerError::EmptyText);
        }

        let count = units.len();
        self.load(units);
        Ok(count)
    }

    /// Stores the clamped speed. While playing, the current unit's deadline is
    /// recomputed in full from now at the new speed; time already spent on
    /// the unit is not credited.
    pub fn set_wpm(&mut self, wpm: u32) {
        self.state.wpm = clamp_wpm(wpm);
        debug!("playback: wpm={} (requested {})", self.state.wpm, wpm);
        self.emit();
        self.reschedule();
    }

    /// Same rescheduling rule as [`set_wpm`](Self::set_wpm).
    pub fn set_cadence_profile(&mut self, profile: CadenceProfile) {
        self.state.cadence_profile = profile;
        debug!("playback: cadence_profile={}", profile);
        self.emit();
        self.reschedule();
    }

    pub fn play(&mut self) {
        if self.state.is_playing || self.state.units.is_empty() {
            return;
        }

        self.state.is_playing = true;
        info!(
            "playback: play index={} wpm={} cadence={}",
            self.state.index, self.state.wpm, self.state.cadence_profile
        );
        self.emit();
        self.schedule_next(self.clock.now_ms());
        self.start_heartbeat();
    }

    pub fn pause(&mut self) {
        if !self.state.is_playing {
            return;
        }

        self.state.is_playing = false;
        info!("playback: pause index={}", self.state.index);
        self.emit();
        self.stop_heartbeat();
    }

    pub fn toggle(&mut self) {
        if self.state.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Rewinds to the first unit, keeping the playing flag.
    pub fn restart(&mut self) {
        let was_playing = self.state.is_playing;
        self.state.index = 0;
        self.emit();

        if was_playing {
            self.schedule_next(self.clock.now_ms());
            self.start_heartbeat();
        }
    }

    pub fn step_forward(&mut self) {
        if self.state.units.is_empty() {
            return;
        }
        self.move_to(self.state.index.saturating_add(1));
    }

    pub fn step_back(&mut self) {
        if self.state.units.is_empty() {
            return;
        }
        self.move_to(self.state.index.saturating_sub(1));
    }

    /// Jumps to `index`, clamped to the loaded range.
    pub fn seek(&mut self, index: usize) {
        if self.state.units.is_empty() {
            return;
        }
        self.move_to(index);
    }

    /// Jumps by `delta` units from the current position, clamped at both ends.
    pub fn seek_relative(&mut self, delta: isize) {
        if self.state.units.is_empty() {
            return;
        }
        self.move_to(self.state.index.saturating_add_signed(delta));
    }

    /// Pauses for a scrub gesture, remembering whether to resume afterwards.
    pub fn begin_scrub(&mut self) {
        self.resume_after_scrub = self.state.is_playing;
        self.pause();
    }

    /// Resumes playback if it was running when the scrub began.
    pub fn end_scrub(&mut self) {
        if core::mem::take(&mut self.resume_after_scrub) {
            self.play();
        }
    }

    /// Registers `observer`; it runs after every mutation until unsubscribed.
    pub fn subscribe<F>(&mut self, observer: F) -> Subscription
    where
        F: FnMut(&ReaderState) + Send + 'static,
    {
        self.observers.add(Box::new(observer))
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.observers.remove(subscription)
    }

    /// Heartbeat body: advances when the current unit's deadline has passed.
    ///
    /// The next deadline is anchored to this tick's fire time, so a late tick
    /// delays one unit without shifting the ones after it further.
    pub fn tick(&mut self) -> TickResult {
        if !self.heartbeat_active || !self.state.is_playing {
            return TickResult::Idle;
        }

        let now_ms = self.clock.now_ms();
        if now_ms < self.next_due_ms {
            return TickResult::Waiting;
        }

        let next = self.state.index + 1;
        if next >= self.state.units.len() {
            self.state.is_playing = false;
            info!("playback: end of content index={}", self.state.index);
            self.emit();
            self.stop_heartbeat();
            return TickResult::Finished;
        }

        self.state.index = next;
        self.emit();
        self.schedule_next(now_ms);
        TickResult::Advanced
    }

    pub fn into_shared(self) -> SharedEngine<C> {
        Arc::new(parking_lot::Mutex::new(self))
    }

    fn move_to(&mut self, index: usize) {
        self.state.index = self.state.clamp_index(index);
        self.emit();
        self.reschedule();
    }

    fn schedule_next(&mut self, from_ms: u64) {
        self.next_due_ms = match self.state.current_delay_ms() {
            Some(delay) => from_ms.saturating_add(u64::from(delay)),
            None => from_ms,
        };
    }

    fn reschedule(&mut self) {
        if self.state.is_playing {
            self.schedule_next(self.clock.now_ms());
        }
    }

    fn start_heartbeat(&mut self) {
        if !self.heartbeat_active {
            self.heartbeat_active = true;
            debug!("playback: heartbeat started");
        }
    }

    fn stop_heartbeat(&mut self) {
        if self.heartbeat_active {
            self.heartbeat_active = false;
            debug!("playback: heartbeat stopped");
        }
    }

    fn emit(&mut self) {
        self.observers.notify(&self.state);
    }
}

impl<C> core::fmt::Debug for ReaderEngine<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReaderEngine")
            .field("state", &self.state)
            .field("next_due_ms", &self.next_due_ms)
            .field("heartbeat_active", &self.heartbeat_active)
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}
