//! Aozora Bunko markup parser.
//!
//! Consumes annotated plain text and produces a [`ParsedDocument`]:
//! the markup-free parent text, progression runs derived from the
//! UTR#50 vertical-orientation property, ruby spans and emphasis
//! spans. The recognized markup is the Aozora subset: `｜…《…》` ruby,
//! `［＃…］` tags (of which only `「…」に傍点` is understood), HTML
//! tags (skipped), and the `!!`/`!?` ligature collapse.

use icu::properties::CodePointMapData;
use icu::properties::props::{Script, VerticalOrientation};
use tracing::warn;

use crate::document::{EmphasisSpan, ParsedDocument, Progression, ProgressionRun, RubySpan};

const TAG_HEADER: &str = "＃「";
const TAG_FOOTER: &str = "」に傍点";

/// A parsed document together with the diagnostics the parse produced.
#[derive(Clone, Debug, Default)]
pub struct ParseOutput {
    pub document: ParsedDocument,
    /// Contents of every `［＃…］` tag that was not understood, in
    /// document order. The tags themselves are dropped from the text.
    pub unknown_tags: Vec<String>,
}

/// Parse Aozora-annotated text into a document.
pub fn parse(input: &str) -> ParseOutput {
    let vertical_orientation = CodePointMapData::<VerticalOrientation>::new();

    let mut parent = String::new();
    let mut runs: Vec<ProgressionRun> = Vec::new();
    let mut rubies: Vec<RubySpan> = Vec::new();
    let mut emphases: Vec<EmphasisSpan> = Vec::new();
    let mut unknown_tags: Vec<String> = Vec::new();

    let mut run_start = 0usize;
    let mut progression = Progression::Vertical;
    // Rotated glyphs in the active horizontal run. Starts negative when
    // transitional-rotate code points are pulled in from the left.
    let mut rotated_length: i32 = 0;

    let mut pending_ruby: Option<RubySpan> = None;
    let mut ruby_base: Option<usize> = None;
    // Bytes appended to the parent since the last markup event; the
    // region backtrack_han is allowed to search.
    let mut not_selected = 0usize;
    // Parent offset the transitional-rotate walk must not cross.
    let mut barrier = 0usize;

    let mut in_ruby = false;
    let mut in_tag = false;
    let mut in_html = false;
    let mut tag = String::new();

    let mut chars = input.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '｜' => {
                ruby_base = Some(parent.len());
                barrier = parent.len();
                continue;
            }
            '《' => {
                in_ruby = true;
                if let Some(ruby) = pending_ruby.take() {
                    rubies.push(ruby);
                }
                let end = parent.len();
                let start = ruby_base
                    .take()
                    .unwrap_or_else(|| backtrack_han(&parent, not_selected));
                pending_ruby = Some(RubySpan {
                    range: start..end,
                    text: String::new(),
                });
                not_selected = 0;
                barrier = parent.len();
                continue;
            }
            '》' => {
                in_ruby = false;
                barrier = parent.len();
                continue;
            }
            '［' if matches!(chars.peek(), Some((_, '＃'))) => {
                in_tag = true;
                barrier = parent.len();
                continue;
            }
            '］' if in_tag => {
                in_tag = false;
                match parse_emphasis_tag(&tag, parent.len()) {
                    Some(span) => emphases.push(span),
                    None => {
                        warn!(tag = %tag, "unknown tag");
                        unknown_tags.push(tag.clone());
                    }
                }
                tag.clear();
                barrier = parent.len();
                continue;
            }
            '<' => {
                in_html = true;
                barrier = parent.len();
                continue;
            }
            '>' => {
                in_html = false;
                barrier = parent.len();
                continue;
            }
            _ => {}
        }

        // `!!` and `!?` collapse to their one-glyph ligature forms.
        let mut text = &input[i..i + c.len_utf8()];
        let mut ligature = false;
        if c == '!' {
            match chars.peek() {
                Some((_, '!')) => {
                    text = "‼";
                    ligature = true;
                }
                Some((_, '?')) => {
                    text = "⁉";
                    ligature = true;
                }
                _ => {}
            }
            if ligature {
                chars.next();
            }
        }

        if in_ruby {
            if let Some(ruby) = pending_ruby.as_mut() {
                ruby.text.push_str(text);
            }
        } else if in_tag {
            tag.push_str(text);
        } else if in_html {
            // HTML tag contents are dropped entirely.
        } else {
            match vertical_orientation.get(c) {
                VerticalOrientation::Rotated
                    if progression == Progression::Vertical
                        && !matches!(c, '\n' | '…' | '―') =>
                {
                    // The rotated run starts where the trailing
                    // transitional-rotate code points start; they join it.
                    let mut pos = parent.len();
                    let mut pulled = 0i32;
                    for prev in parent[barrier..].chars().rev() {
                        if vertical_orientation.get(prev) == VerticalOrientation::TransformedRotated
                        {
                            pos -= prev.len_utf8();
                            pulled += 1;
                        } else {
                            break;
                        }
                    }
                    runs.push(ProgressionRun {
                        range: run_start..pos,
                        progression,
                    });
                    run_start = pos;
                    progression = Progression::Horizontal;
                    rotated_length = -pulled;
                }
                VerticalOrientation::TransformedUpright | VerticalOrientation::Upright
                    if progression == Progression::Horizontal && c != '\n' =>
                {
                    let closed = match rotated_length {
                        2 => Progression::TateChuYoko,
                        i32::MIN..2 => Progression::Vertical,
                        _ => Progression::Horizontal,
                    };
                    runs.push(ProgressionRun {
                        range: run_start..parent.len(),
                        progression: closed,
                    });
                    run_start = parent.len();
                    progression = Progression::Vertical;
                }
                _ => {}
            }
            if progression == Progression::Horizontal && c != '\n' {
                rotated_length += 1;
            }
            parent.push_str(text);
            not_selected += text.len();
            if ligature {
                barrier = parent.len();
            }
        }
    }

    if let Some(ruby) = pending_ruby.take() {
        rubies.push(ruby);
    }
    runs.push(ProgressionRun {
        range: run_start..parent.len(),
        progression,
    });

    ParseOutput {
        document: ParsedDocument {
            parent,
            runs,
            rubies,
            emphases,
        },
        unknown_tags,
    }
}

/// Resolve the implicit ruby base: the longest run of Han code points
/// at the end of the dirty region, or failing that the last code point
/// alone.
fn backtrack_han(parent: &str, dirty: usize) -> usize {
    let script = CodePointMapData::<Script>::new();
    let tail_start = parent.len() - dirty;
    let tail = &parent[tail_start..];

    let mut start = parent.len();
    let mut last_char = None;
    for (i, c) in tail.char_indices().rev() {
        if last_char.is_none() {
            last_char = Some(i);
        }
        if script.get(c) == Script::Han {
            start = tail_start + i;
        } else {
            break;
        }
    }
    if start == parent.len() {
        start = tail_start + last_char.unwrap_or(0);
    }
    start
}

/// Parse the buffered contents of a `［＃…］` tag. Only the emphasis
/// form `「X」に傍点` is understood; X must be non-empty and must fit
/// in the parent document preceding `end`.
fn parse_emphasis_tag(tag: &str, end: usize) -> Option<EmphasisSpan> {
    let base = tag.strip_prefix(TAG_HEADER)?.strip_suffix(TAG_FOOTER)?;
    if base.is_empty() || base.len() > end {
        return None;
    }
    Some(EmphasisSpan {
        range: end - base.len()..end,
    })
}
