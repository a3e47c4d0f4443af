//! Paragraph flow: lines into columns, columns into pages.

use anyhow::Result;
use tatekumi_core::document::{ParsedDocument, Progression};
use tatekumi_core::geometry::{Point, Rect};
use tracing::debug;

use crate::font::Font;
use crate::linebreak::LineState;
use crate::page::KihonHanmen;
use crate::paint::{EmphasisCursor, LinePainter, RubyCursor};
use crate::shape::{ShapedRun, ShapingOptions, TextShaper};
use crate::surface::Surface;

/// Drives a parsed document through shaping, line breaking and painting
/// into an output surface.
///
/// The flow offset, the column cursor and the ruby/emphasis cursors all
/// survive progression-run boundaries, so a rotated Latin fragment
/// continues mid-line instead of forcing a break.
pub struct Typesetter<'a> {
    vertical: &'a Font,
    horizontal: &'a Font,
    ruby: &'a Font,
    line_gap: f64,
    hanmen: KihonHanmen,
    surface: Box<dyn Surface + 'a>,
    shaper: TextShaper,
}

impl<'a> Typesetter<'a> {
    pub fn new(
        vertical: &'a Font,
        horizontal: &'a Font,
        ruby: &'a Font,
        line_gap: f64,
        hanmen: KihonHanmen,
        surface: Box<dyn Surface + 'a>,
    ) -> Self {
        Self {
            vertical,
            horizontal,
            ruby,
            line_gap,
            hanmen,
            surface,
            shaper: TextShaper::new(),
        }
    }

    /// Typesets the whole document and flushes the surface.
    pub fn typeset(mut self, document: &ParsedDocument) -> Result<()> {
        let mut offset = Point::ZERO;
        let mut rubies = RubyCursor::new(document.rubies.clone());
        let mut emphases = EmphasisCursor::new(document.emphases.clone());

        for run in document.coalesced_runs() {
            let font = match run.progression {
                Progression::Horizontal => self.horizontal,
                Progression::Vertical | Progression::TateChuYoko => self.vertical,
            };
            let fragment = &document.parent[run.range.clone()];
            let shaped =
                self.shaper
                    .shape(fragment, font, &ShapingOptions::for_font(font), run.range.start)?;
            if shaped.is_empty() {
                continue;
            }
            self.flow_run(&shaped, font, &mut offset, &mut rubies, &mut emphases)?;
        }

        self.surface.finish_page()?;
        self.surface.finish()
    }

    fn flow_run(
        &mut self,
        run: &ShapedRun,
        font: &Font,
        offset: &mut Point,
        rubies: &mut RubyCursor,
        emphases: &mut EmphasisCursor,
    ) -> Result<()> {
        let mut written = 0usize;
        let mut column = self.hanmen.current();
        let mut line = vertical_line_rect(column, *offset, font.size());
        let mut state = LineState::ContinueLine;

        loop {
            match state {
                LineState::EndOfString | LineState::TooShortLine => break,
                LineState::ContinueLine => {
                    state = if column.start.x <= line.start.x {
                        LineState::NewLine
                    } else {
                        LineState::EndOfColumn
                    };
                }
                LineState::EndOfColumn => {
                    if self.hanmen.is_last() {
                        debug!("page full, starting a new one");
                        self.surface.finish_page()?;
                    }
                    let (next, _wrapped) = self.hanmen.advance();
                    column = next;
                    *offset = Point::ZERO;
                    line = vertical_line_rect(column, *offset, font.size());
                    state = if line.is_valid(0.0, 0.0) && column.start.x <= line.start.x {
                        LineState::NewLine
                    } else {
                        LineState::TooShortLine
                    };
                }
                LineState::SoftLineBreak | LineState::HardLineBreak => {
                    if state == LineState::SoftLineBreak && written == run.len() {
                        break;
                    }
                    offset.x -= self.line_gap + font.size();
                    offset.y = 0.0;
                    line = vertical_line_rect(column, *offset, font.size());
                    state = if column.start.x <= line.start.x {
                        LineState::NewLine
                    } else {
                        LineState::EndOfColumn
                    };
                }
                LineState::NewLine => {
                    let written_before = written;
                    let fresh_line = offset.y == 0.0;
                    let mut painter =
                        LinePainter::new(font, self.ruby, &self.shaper, self.surface.as_mut());
                    let (delta, next) = painter.paint_line(run, &mut written, line, rubies, emphases)?;
                    *offset += delta;
                    // A full-height line that cannot take a single
                    // glyph would wrap forever; abort the paragraph.
                    state = if next == LineState::SoftLineBreak
                        && written == written_before
                        && fresh_line
                        && written < run.len()
                    {
                        LineState::TooShortLine
                    } else {
                        next
                    };
                }
            }
        }

        Ok(())
    }
}

/// The rect of the next vertical line: one thickness wide, hanging off
/// the column's right edge shifted by the carried offset.
fn vertical_line_rect(column: Rect, offset: Point, thickness: f64) -> Rect {
    Rect::new(
        column.end.x + offset.x - thickness,
        column.start.y + offset.y,
        column.end.x + offset.x,
        column.end.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_rect_hangs_off_the_column_right_edge() {
        let column = Rect::new(10.0, 20.0, 110.0, 220.0);
        let line = vertical_line_rect(column, Point::ZERO, 16.0);
        assert_eq!(line, Rect::new(94.0, 20.0, 110.0, 220.0));
    }

    #[test]
    fn carried_offset_shifts_the_line() {
        let column = Rect::new(10.0, 20.0, 110.0, 220.0);
        let line = vertical_line_rect(column, Point::new(-32.0, 48.0), 16.0);
        assert_eq!(line, Rect::new(62.0, 68.0, 78.0, 220.0));
    }
}
