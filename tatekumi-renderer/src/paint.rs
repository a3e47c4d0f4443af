//! Line painting: glyph placement, ruby overlays, emphasis dots.
//!
//! A painted line is a vertical rect one font-size wide. Upright glyphs
//! hang from a pen starting at the top center of the rect; horizontal
//! fragments are rotated 90° clockwise onto the same pen. Ruby and
//! emphasis live in the gutter immediately right of the rect.
//!
//! Ruby is a cross-line entity: when a line ends inside a ruby span the
//! gloss is split proportionally to the consumed base bytes and the
//! remainder is carried to the next line.

use anyhow::Result;
use tatekumi_core::document::{EmphasisSpan, RubySpan};
use tatekumi_core::geometry::{Point, Rect};

use crate::font::Font;
use crate::linebreak::{LineState, break_line};
use crate::outline::{Transform, glyph_path};
use crate::shape::{ShapedRun, ShapingOptions, TextShaper};
use crate::surface::Surface;

/// The sidebar emphasis mark, drawn as a one-glyph ruby.
const EMPHASIS_DOT: &str = "丶";

/// Cursor over the document's ruby spans. Partially painted rubies
/// keep their unpainted suffix and stay current.
#[derive(Clone, Debug, Default)]
pub struct RubyCursor {
    spans: Vec<RubySpan>,
    index: usize,
}

impl RubyCursor {
    pub fn new(spans: Vec<RubySpan>) -> Self {
        Self { spans, index: 0 }
    }

    pub fn current(&self) -> Option<&RubySpan> {
        self.spans.get(self.index)
    }

    pub fn advance(&mut self) {
        self.index += 1;
    }

    /// Drops the first `drawn_bytes` of the current gloss; the suffix
    /// is painted on a later line.
    pub fn carry(&mut self, drawn_bytes: usize) {
        if let Some(ruby) = self.spans.get_mut(self.index) {
            let at = drawn_bytes.min(ruby.text.len());
            ruby.text = ruby.text.split_off(at);
        }
    }
}

/// Cursor over the document's emphasis spans.
#[derive(Clone, Debug, Default)]
pub struct EmphasisCursor {
    spans: Vec<EmphasisSpan>,
    index: usize,
}

impl EmphasisCursor {
    pub fn new(spans: Vec<EmphasisSpan>) -> Self {
        Self { spans, index: 0 }
    }

    pub fn current(&self) -> Option<&EmphasisSpan> {
        self.spans.get(self.index)
    }

    pub fn advance(&mut self) {
        self.index += 1;
    }
}

/// Paints one line at a time into a [`Surface`].
pub struct LinePainter<'a> {
    font: &'a Font,
    ruby_font: &'a Font,
    shaper: &'a TextShaper,
    surface: &'a mut dyn Surface,
}

impl<'a> LinePainter<'a> {
    pub fn new(
        font: &'a Font,
        ruby_font: &'a Font,
        shaper: &'a TextShaper,
        surface: &'a mut dyn Surface,
    ) -> Self {
        Self {
            font,
            ruby_font,
            shaper,
            surface,
        }
    }

    /// Paints as much of `run` as fits into `rect`, starting at the
    /// write cursor. Returns the pen movement (carried into the flow
    /// offset) and the state that ended the line.
    pub fn paint_line(
        &mut self,
        run: &ShapedRun,
        written: &mut usize,
        rect: Rect,
        rubies: &mut RubyCursor,
        emphases: &mut EmphasisCursor,
    ) -> Result<(Point, LineState)> {
        let size = self.font.size();
        let max_advance = rect.height();
        let (num, state) = break_line(run, *written, max_advance, self.font.is_vertical(), self.font);

        if num == 0 {
            if state == LineState::HardLineBreak {
                // Step past the break glyph; it is never painted.
                *written += 1;
            }
            return Ok((Point::ZERO, state));
        }

        // Byte extent of this line in the parent document, including
        // the hard-break glyph's bytes when one ends the line.
        let line_end = if state == LineState::HardLineBreak {
            run.cluster_end(*written + num)
        } else if *written + num < run.len() {
            run.glyphs[*written + num].cluster
        } else {
            run.range.end
        };

        let origin_start = Point::new(rect.end.x - size / 2.0, rect.start.y);
        let mut origin = origin_start;
        let mut in_ruby = false;
        let mut ruby_rect = Rect::default();

        for glyph in &run.glyphs[*written..*written + num] {
            let cluster = glyph.cluster;

            // Close the ruby whose base ended before this cluster.
            if let Some(ruby) = rubies.current() {
                if in_ruby && ruby.range.start < line_end && ruby.range.end <= cluster {
                    ruby_rect.end = Point::new(rect.end.x + self.ruby_font.size(), origin.y);
                    in_ruby = false;
                    let text = ruby.text.clone();
                    self.print_ruby(&text, ruby_rect, 0.0)?;
                    rubies.advance();
                }
            }
            // Open the ruby whose base starts at this cluster.
            if let Some(ruby) = rubies.current() {
                if !in_ruby && ruby.range.start < line_end && ruby.range.start <= cluster {
                    ruby_rect.start = Point::new(rect.end.x, origin.y);
                    in_ruby = true;
                }
            }
            // Skip emphasis spans that ended before this cluster.
            while let Some(em) = emphases.current() {
                if em.range.start < line_end && em.range.end <= cluster {
                    emphases.advance();
                } else {
                    break;
                }
            }

            let mut advance = Point::new(glyph.x_advance, -glyph.y_advance);
            if !self.font.is_vertical() {
                advance = Point::new(advance.y, advance.x);
            }

            if let Some(em) = emphases.current() {
                if em.range.start < line_end && em.range.start <= cluster && cluster < em.range.end
                {
                    let em_rect = Rect::from_origin(
                        Point::new(rect.end.x, origin.y),
                        self.ruby_font.size(),
                        advance.y,
                    );
                    self.print_ruby(EMPHASIS_DOT, em_rect, 0.0)?;
                }
            }

            let transform = if self.font.is_vertical() {
                Transform::upright(Point::new(
                    origin.x + glyph.x_offset,
                    origin.y - glyph.y_offset,
                ))
            } else {
                // The rotated baseline sits so the Latin ascender meets
                // the right edge of the line rect.
                Transform::rotated(Point::new(
                    rect.end.x - self.font.rotated_baseline_inset() + glyph.y_offset,
                    origin.y + glyph.x_offset,
                ))
            };
            if let Some(path) = glyph_path(self.font, glyph.glyph_id, transform)? {
                self.surface.fill_path(&path)?;
            }

            origin += advance;
        }

        // A ruby still open at end of line is split: paint the prefix
        // proportional to the consumed base bytes, carry the suffix.
        if in_ruby {
            if let Some(ruby) = rubies.current() {
                let remaining = ruby.range.end.saturating_sub(line_end);
                let mut ratio = 0.0;
                if remaining > 0 && !ruby.range.is_empty() {
                    ratio = remaining as f64 / ruby.range.len() as f64;
                }
                ruby_rect.end = Point::new(rect.end.x + self.ruby_font.size(), origin.y);
                let text = ruby.text.clone();
                let drawn = self.print_ruby(&text, ruby_rect, ratio)?;
                if remaining > 0 {
                    rubies.carry(drawn);
                } else {
                    rubies.advance();
                }
            }
        }

        *written += num;
        if state == LineState::HardLineBreak {
            *written += 1;
        }
        Ok((origin - origin_start, state))
    }

    /// Shapes and paints ruby text into its gutter rect.
    ///
    /// A gloss longer than the base is centered on it (clamped to the
    /// page top); a shorter one is spread with even padding. When
    /// `ratio > 0` only the leading `1 − ratio` share of the glyphs is
    /// painted. Returns the number of gloss bytes painted, so a split
    /// ruby can carry its suffix.
    fn print_ruby(&mut self, text: &str, rect: Rect, ratio: f64) -> Result<usize> {
        let run = self
            .shaper
            .shape(text, self.ruby_font, &ShapingOptions::ruby(), 0)?;
        let whole = run.len();
        let take = if ratio > 0.0 && whole > 1 {
            (whole as f64 * (1.0 - ratio)) as usize
        } else {
            whole
        };

        let max_advance = rect.height();
        let mut total = 0.0;
        let mut num = 0usize;
        while num < take {
            let glyph = &run.glyphs[num];
            if glyph.glyph_id == 0 {
                break;
            }
            total += -glyph.y_advance;
            num += 1;
        }
        if num == 0 {
            return Ok(0);
        }

        let drawn_bytes = if num == whole {
            text.len()
        } else {
            run.glyphs[num].cluster
        };

        let size = self.ruby_font.size();
        let mut origin = Point::new(rect.end.x - size / 2.0, rect.start.y);
        let mut pad = 0.0;
        if max_advance < total {
            origin.y += (max_advance - total) / 2.0;
            if origin.y < 0.0 {
                origin.y = 0.0;
            }
        } else {
            pad = (max_advance - total) / (num as f64 * 2.0);
            origin.y += pad;
            pad *= 2.0;
        }

        for glyph in &run.glyphs[..num] {
            let pos = Point::new(origin.x + glyph.x_offset, origin.y - glyph.y_offset);
            if let Some(path) = glyph_path(self.ruby_font, glyph.glyph_id, Transform::upright(pos))?
            {
                self.surface.fill_path(&path)?;
            }
            origin.x += glyph.x_advance;
            origin.y += -glyph.y_advance;
            origin.y += pad;
        }

        Ok(drawn_bytes)
    }
}
