//! Presentable units and the text segmenter.

mod segmenter;

pub use segmenter::segment;

/// One step of the reading sequence.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Unit {
    /// Whitespace-delimited word with its punctuation attached. Never empty
    /// when produced by [`segment`].
    Word(String),
    /// Boundary between two paragraphs.
    ParagraphBreak,
}

impl Unit {
    /// Builds a word unit, rejecting empty text.
    pub fn word(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.is_empty() {
            None
        } else {
            Some(Self::Word(text))
        }
    }

    pub fn as_word(&self) -> Option<&str> {
        match self {
            Self::Word(text) => Some(text),
            Self::ParagraphBreak => None,
        }
    }

    pub fn is_paragraph_break(&self) -> bool {
        matches!(self, Self::ParagraphBreak)
    }
}

/// Number of word units, paragraph breaks excluded.
pub fn word_count(units: &[Unit]) -> usize {
    units.iter().filter(|unit| unit.as_word().is_some()).count()
}
