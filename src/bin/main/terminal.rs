use std::io::{self, Write};

use pacer_core::{
    OrpSplit, ReaderState,
    orp::anchor_column,
    playback::PlaybackPhase,
    progress::Progress,
};

const CLEAR_LINE: &str = "\r\x1b[2K";
const PIVOT_STYLE: &str = "\x1b[1;31m";
const RESET_STYLE: &str = "\x1b[0m";

/// Single-line RSVP viewport: the current word with its pivot pinned to the
/// anchor column, followed by a status block.
#[derive(Clone, Copy, Debug)]
pub struct TerminalView {
    width: usize,
    anchor: usize,
}

impl TerminalView {
    pub fn new(width: usize, anchor_percent: usize) -> Self {
        Self {
            width,
            anchor: anchor_column(width, anchor_percent),
        }
    }

    /// Marker above the anchor column, drawn once before playback.
    pub fn draw_guide(&self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{:pad$}v", "", pad = self.anchor)?;
        out.flush()
    }

    pub fn draw(&mut self, state: &ReaderState) -> io::Result<()> {
        let split = state
            .current_unit()
            .map_or(OrpSplit::EMPTY, OrpSplit::for_unit);
        let pad = split.start_column(self.anchor);
        let used = pad + split.left.chars().count() + split.pivot.chars().count()
            + split.right.chars().count();
        let fill = self.width.saturating_sub(used);

        let progress = Progress::of(state);
        let marker = match state.phase() {
            PlaybackPhase::Playing => "",
            PlaybackPhase::Paused => " [paused]",
            PlaybackPhase::Exhausted => " [end]",
            PlaybackPhase::Empty => " [empty]",
        };

        let mut out = io::stdout().lock();
        write!(
            out,
            "{CLEAR_LINE}{:pad$}{}{PIVOT_STYLE}{}{RESET_STYLE}{}{:fill$} | {}/{} {:.0}% {}wpm{}",
            "",
            split.left,
            split.pivot,
            split.right,
            "",
            progress.position,
            progress.total,
            progress.percent,
            state.wpm,
            marker,
        )?;
        out.flush()
    }
}
