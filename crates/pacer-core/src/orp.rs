//! Optimal recognition point placement.
//!
//! The ORP is the character held at the fixed focus point of the viewport.
//! Lengths are counted in chars and punctuation is not stripped; callers that
//! want letter-only placement strip before calling.

use crate::content::Unit;

/// Index (in chars) of the focus character for `word`.
pub fn orp_index(word: &str) -> usize {
    let length = word.chars().count();
    if length == 0 {
        return 0;
    }

    orp_index_for_length(length).min(length - 1)
}

fn orp_index_for_length(length: usize) -> usize {
    match length {
        0 => 0,
        1..=5 => 1,
        6..=9 => 2,
        10..=13 => 3,
        _ => 4,
    }
}

/// A word cut around its focus character.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OrpSplit<'a> {
    pub left: &'a str,
    pub pivot: &'a str,
    pub right: &'a str,
}

impl<'a> OrpSplit<'a> {
    pub const EMPTY: OrpSplit<'static> = OrpSplit {
        left: "",
        pivot: "",
        right: "",
    };

    pub fn new(word: &'a str) -> Self {
        let Some((start, ch)) = word.char_indices().nth(orp_index(word)) else {
            return Self {
                left: word,
                pivot: "",
                right: "",
            };
        };

        let end = start + ch.len_utf8();
        Self {
            left: &word[..start],
            pivot: &word[start..end],
            right: &word[end..],
        }
    }

    /// Paragraph breaks render as a blank viewport.
    pub fn for_unit(unit: &'a Unit) -> Self {
        match unit {
            Unit::Word(text) => Self::new(text),
            Unit::ParagraphBreak => Self::EMPTY,
        }
    }

    /// Chars to the left of the pivot.
    pub fn lead_columns(&self) -> usize {
        self.left.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.pivot.is_empty() && self.left.is_empty()
    }

    /// Column where the word must start so the pivot lands on `anchor`.
    pub fn start_column(&self, anchor: usize) -> usize {
        anchor.saturating_sub(self.lead_columns())
    }
}

/// Focus column for a viewport `width` columns wide.
pub fn anchor_column(width: usize, anchor_percent: usize) -> usize {
    (width * anchor_percent.min(100)) / 100
}
