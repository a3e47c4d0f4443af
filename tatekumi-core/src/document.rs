//! The parsed document: parent text plus annotation spans.
//!
//! All spans are half-open byte ranges into the parent document and are
//! aligned to UTF-8 code-point boundaries. Progression runs partition
//! the parent end to end; ruby and emphasis spans are sorted by start
//! offset and may cross run boundaries (the painter consumes them
//! span-wise).

use std::ops::Range;

/// How glyphs of a run advance within a vertical line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Progression {
    /// Upright glyphs advancing down the line.
    #[default]
    Vertical,
    /// A horizontally set fragment rotated 90° clockwise into the line.
    Horizontal,
    /// Exactly two narrow glyphs sharing one vertical slot.
    TateChuYoko,
}

/// A contiguous stretch of the parent document with one progression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressionRun {
    pub range: Range<usize>,
    pub progression: Progression,
}

/// A phonetic gloss attached to the base characters in `range`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RubySpan {
    pub range: Range<usize>,
    pub text: String,
}

/// Sidebar emphasis dots over every base character in `range`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmphasisSpan {
    pub range: Range<usize>,
}

/// The parser's output: markup-free text plus its annotations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedDocument {
    pub parent: String,
    pub runs: Vec<ProgressionRun>,
    pub rubies: Vec<RubySpan>,
    pub emphases: Vec<EmphasisSpan>,
}

impl ParsedDocument {
    /// Progression runs with adjacent same-progression runs merged.
    ///
    /// Flow operates on the coalesced list so a run boundary only ever
    /// marks an actual progression change.
    pub fn coalesced_runs(&self) -> Vec<ProgressionRun> {
        let mut merged: Vec<ProgressionRun> = Vec::with_capacity(self.runs.len());
        for run in &self.runs {
            match merged.last_mut() {
                Some(last) if last.progression == run.progression => {
                    last.range.end = run.range.end;
                }
                _ => merged.push(run.clone()),
            }
        }
        merged
    }
}
