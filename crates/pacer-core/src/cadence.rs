//! Per-unit display durations.
//!
//! A word is held for the base interval at the current speed, scaled by its
//! length, plus a fixed pause for trailing punctuation. The pauses do not
//! scale with wpm: they model processing time at clause and sentence
//! boundaries, not reading time.

use core::{fmt, str::FromStr};

use heapless::String as HeaplessString;

use crate::{content::Unit, error::PacerError};

/// Longest entry of [`ABBREVIATIONS`] in bytes, rounded up.
const ABBREVIATION_MAX_BYTES: usize = 8;

/// Lowercase words ending in `.` that do not end a sentence.
const ABBREVIATIONS: [&str; 47] = [
    "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", //
    "vs.", "etc.", "e.g.", "i.e.", "cf.", "al.", //
    "inc.", "ltd.", "corp.", "co.", //
    "st.", "ave.", "rd.", "blvd.", //
    "jan.", "feb.", "mar.", "apr.", "jun.", "jul.", "aug.", "sep.", "sept.", "oct.", "nov.",
    "dec.", //
    "mon.", "tue.", "wed.", "thu.", "fri.", "sat.", "sun.", //
    "a.m.", "p.m.", "b.c.", "a.d.", //
    "u.s.", "u.k.", "u.s.a.",
];

/// Stripped from the end of a word before its final punctuation is read.
const TRAILING_CLOSERS: [char; 6] = [')', ']', '"', '\'', '\u{201D}', '\u{2019}'];

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum CadenceProfile {
    #[default]
    Normal,
    Strong,
}

impl CadenceProfile {
    pub const ALL: [Self; 2] = [Self::Normal, Self::Strong];

    pub const fn pauses(self) -> PauseTable {
        match self {
            Self::Normal => NORMAL_PAUSES,
            Self::Strong => STRONG_PAUSES,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Strong => "strong",
        }
    }
}

impl fmt::Display for CadenceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CadenceProfile {
    type Err = PacerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|profile| profile.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| PacerError::UnknownCadenceProfile(name.to_owned()))
    }
}

/// Fixed pause magnitudes of one profile, in milliseconds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PauseTable {
    pub comma_ms: u16,
    pub semicolon_ms: u16,
    pub colon_ms: u16,
    pub stop_ms: u16,
    pub ellipsis_ms: u16,
    pub paragraph_ms: u16,
}

const NORMAL_PAUSES: PauseTable = PauseTable {
    comma_ms: 150,
    semicolon_ms: 200,
    colon_ms: 250,
    stop_ms: 400,
    ellipsis_ms: 500,
    paragraph_ms: 700,
};

const STRONG_PAUSES: PauseTable = PauseTable {
    comma_ms: 220,
    semicolon_ms: 300,
    colon_ms: 350,
    stop_ms: 550,
    ellipsis_ms: 700,
    paragraph_ms: 1_000,
};

/// Milliseconds per word at `wpm`, before length scaling.
pub fn base_interval_ms(wpm: u16) -> f64 {
    60_000.0 / f64::from(wpm.max(1))
}

/// How long `unit` stays on screen. Never below 1ms.
pub fn delay_ms(unit: &Unit, wpm: u16, profile: CadenceProfile) -> u32 {
    let pauses = profile.pauses();

    let text = match unit {
        Unit::ParagraphBreak => return u32::from(pauses.paragraph_ms),
        Unit::Word(text) => text,
    };

    let display_ms = base_interval_ms(wpm) * length_multiplier(text);
    let pause_ms = f64::from(punctuation_pause_ms(text, pauses));

    ((display_ms + pause_ms).round() as u32).max(1)
}

fn length_multiplier(text: &str) -> f64 {
    match text.chars().filter(|ch| ch.is_alphanumeric()).count() {
        0..=2 => 0.8,
        3..=4 => 0.9,
        5..=8 => 1.0,
        9..=11 => 1.15,
        _ => 1.3,
    }
}

fn punctuation_pause_ms(text: &str, pauses: PauseTable) -> u16 {
    let cleaned = text.trim_end_matches(TRAILING_CLOSERS);

    if cleaned.ends_with("...") || cleaned.ends_with('\u{2026}') {
        return pauses.ellipsis_ms;
    }

    // 1,000,000 reads as one number, not three clauses.
    if is_grouped_number(text) {
        return 0;
    }

    match cleaned.chars().last() {
        Some('.') if is_abbreviation(cleaned) => pauses.comma_ms,
        Some('.' | '!' | '?') => pauses.stop_ms,
        Some(',') => pauses.comma_ms,
        Some(';') => pauses.semicolon_ms,
        Some(':') => pauses.colon_ms,
        Some('\u{2014}' | '-') => pauses.comma_ms,
        _ => 0,
    }
}

/// Whether the digits and commas of `text` form `d{1,3}(,ddd)+`.
fn is_grouped_number(text: &str) -> bool {
    let mut groups = 0usize;
    let mut digits = 0usize;

    for ch in text.chars().filter(|ch| ch.is_ascii_digit() || *ch == ',') {
        if ch != ',' {
            digits += 1;
            continue;
        }

        let valid_group = if groups == 0 {
            (1..=3).contains(&digits)
        } else {
            digits == 3
        };
        if !valid_group {
            return false;
        }

        groups += 1;
        digits = 0;
    }

    groups > 0 && digits == 3
}

fn is_abbreviation(word: &str) -> bool {
    let mut lowered = HeaplessString::<ABBREVIATION_MAX_BYTES>::new();
    for ch in word.chars().flat_map(char::to_lowercase) {
        if lowered.push(ch).is_err() {
            return false;
        }
    }

    ABBREVIATIONS.contains(&lowered.as_str())
}
