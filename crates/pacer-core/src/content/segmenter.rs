use super::Unit;

/// Splits raw text into words and paragraph breaks.
///
/// Paragraphs are separated by two or more consecutive newlines; a single
/// newline is ordinary whitespace. Exactly one [`Unit::ParagraphBreak`] is
/// emitted between consecutive paragraphs and none after the last one.
pub fn segment(text: &str) -> Vec<Unit> {
    let normalized = normalize(text);
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let paragraphs = split_paragraphs(trimmed);
    let last = paragraphs.len() - 1;
    let mut units = Vec::new();

    for (index, paragraph) in paragraphs.iter().enumerate() {
        units.extend(
            paragraph
                .split_whitespace()
                .map(|word| Unit::Word(word.to_owned())),
        );

        if index < last {
            units.push(Unit::ParagraphBreak);
        }
    }

    units
}

fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").replace('\t', " ")
}

fn split_paragraphs(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut paragraphs = Vec::new();
    let mut start = 0usize;
    let mut cursor = 0usize;

    while cursor < bytes.len() {
        if bytes[cursor] != b'\n' {
            cursor += 1;
            continue;
        }

        let run_start = cursor;
        while cursor < bytes.len() && bytes[cursor] == b'\n' {
            cursor += 1;
        }

        if cursor - run_start >= 2 {
            paragraphs.push(&text[start..run_start]);
            start = cursor;
        }
    }

    paragraphs.push(&text[start..]);
    paragraphs
}
