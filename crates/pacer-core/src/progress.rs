//! Progress, scrubbing, and end-of-session figures derived from session state.

use crate::{
    cadence::{CadenceProfile, delay_ms},
    content::{Unit, word_count},
    playback::ReaderState,
};

/// Position within the loaded units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    /// 1-based position, `0` when nothing is loaded.
    pub position: usize,
    pub total: usize,
    /// `0.0..=100.0`; the last unit reads as 100.
    pub percent: f32,
}

impl Progress {
    pub fn new(index: usize, total: usize) -> Self {
        if total == 0 {
            return Self {
                position: 0,
                total: 0,
                percent: 0.0,
            };
        }

        let index = index.min(total - 1);
        let percent = if total == 1 {
            100.0
        } else {
            (index as f32 / (total - 1) as f32) * 100.0
        };

        Self {
            position: index + 1,
            total,
            percent,
        }
    }

    pub fn of(state: &ReaderState) -> Self {
        Self::new(state.index, state.len())
    }
}

/// Unit index under a scrub bar at `fraction` (`0.0..=1.0`) of its width.
pub fn index_for_fraction(fraction: f32, total: usize) -> usize {
    if total == 0 {
        return 0;
    }

    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    (fraction * (total - 1) as f32).round() as usize
}

/// Estimated playback time from `from_index` (its full hold included) to
/// the end of `units`.
pub fn estimate_remaining_ms(
    units: &[Unit],
    from_index: usize,
    wpm: u16,
    profile: CadenceProfile,
) -> u64 {
    units
        .iter()
        .skip(from_index)
        .map(|unit| u64::from(delay_ms(unit, wpm, profile)))
        .sum()
}

/// Figures shown when a session runs to completion.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SessionSummary {
    pub words_read: usize,
    pub wpm: u16,
    /// Nominal reading time at `wpm`, without punctuation pauses.
    pub elapsed_secs: u64,
}

impl SessionSummary {
    pub fn of(state: &ReaderState) -> Self {
        let words_read = word_count(&state.units);
        let elapsed_secs = (words_read as f64 / f64::from(state.wpm.max(1)) * 60.0).round() as u64;

        Self {
            words_read,
            wpm: state.wpm,
            elapsed_secs,
        }
    }
}
