//! Greedy line breaking with kinsoku adjustment.

use crate::shape::ShapedRun;

/// States driving the layout flow loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineState {
    /// Resume a line at the carried offset (entry state of a run).
    ContinueLine,
    /// A fresh line rect is ready to paint.
    NewLine,
    /// The painter filled the line; request the next one.
    SoftLineBreak,
    /// The painter hit a line-break glyph; request the next line.
    HardLineBreak,
    /// The line rect no longer fits in the column; advance the column.
    EndOfColumn,
    /// No glyphs remain.
    EndOfString,
    /// The line rect is degenerate; abort the paragraph.
    TooShortLine,
}

/// Line-edge prohibition rules, obtained by shaping the forbidden
/// literals under the font actually in use.
pub trait Kinsoku {
    /// Glyphs that must not start a line (closing punctuation).
    fn is_forbidden_first(&self, glyph_id: u32) -> bool;
    /// Glyphs that must not end a line (opening brackets).
    fn is_forbidden_last(&self, glyph_id: u32) -> bool;
}

/// Chooses how many glyphs of `run`, starting at `written`, fit on a
/// line with `max_advance` points of room along the primary axis.
///
/// Greedy: glyphs are taken until the budget is exceeded, then the
/// break point is adjusted for kinsoku. A forbidden last glyph is
/// pushed down to the next line; a forbidden first glyph on the next
/// line is pulled up, deliberately overflowing the budget.
pub fn break_line(
    run: &ShapedRun,
    written: usize,
    max_advance: f64,
    vertical: bool,
    kinsoku: &dyn Kinsoku,
) -> (usize, LineState) {
    let remaining = run.len() - written;

    let mut total = 0.0;
    let mut num = 0usize;
    let mut state = LineState::SoftLineBreak;

    while num < remaining {
        let glyph = &run.glyphs[written + num];
        if glyph.glyph_id == 0 {
            // The break glyph is consumed by the caller, never painted.
            state = LineState::HardLineBreak;
            break;
        }
        let advance = if vertical {
            -glyph.y_advance
        } else {
            glyph.x_advance
        };
        if max_advance < total + advance {
            break;
        }
        total += advance;
        num += 1;
    }

    if state == LineState::SoftLineBreak && num > 1 {
        let last = run.glyphs[written + num - 1].glyph_id;
        if kinsoku.is_forbidden_last(last) {
            num -= 1;
        } else if written + num < run.len()
            && kinsoku.is_forbidden_first(run.glyphs[written + num].glyph_id)
        {
            num += 1;
        }
    }

    if num == 0 && state == LineState::SoftLineBreak && remaining == 0 {
        state = LineState::EndOfString;
    }

    (num, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::PositionedGlyph;

    struct Rules {
        first: Vec<u32>,
        last: Vec<u32>,
    }

    impl Kinsoku for Rules {
        fn is_forbidden_first(&self, glyph_id: u32) -> bool {
            self.first.contains(&glyph_id)
        }

        fn is_forbidden_last(&self, glyph_id: u32) -> bool {
            self.last.contains(&glyph_id)
        }
    }

    fn none() -> Rules {
        Rules {
            first: vec![],
            last: vec![],
        }
    }

    fn vertical_run(glyph_ids: &[u32]) -> ShapedRun {
        let glyphs = glyph_ids
            .iter()
            .enumerate()
            .map(|(i, &glyph_id)| PositionedGlyph {
                glyph_id,
                cluster: i * 3,
                x_advance: 0.0,
                y_advance: -16.0,
                x_offset: 0.0,
                y_offset: 0.0,
            })
            .collect::<Vec<_>>();
        let end = glyphs.len() * 3;
        ShapedRun {
            glyphs,
            range: 0..end,
        }
    }

    #[test]
    fn takes_glyphs_until_the_budget_is_spent() {
        let run = vertical_run(&[1, 2, 3, 4, 5, 6]);
        let (num, state) = break_line(&run, 0, 64.0, true, &none());
        assert_eq!(num, 4);
        assert_eq!(state, LineState::SoftLineBreak);
    }

    #[test]
    fn consumes_everything_that_fits() {
        let run = vertical_run(&[1, 2, 3]);
        let (num, state) = break_line(&run, 0, 200.0, true, &none());
        assert_eq!(num, 3);
        assert_eq!(state, LineState::SoftLineBreak);
    }

    #[test]
    fn zero_glyph_id_is_a_hard_break() {
        let run = vertical_run(&[1, 2, 0, 3]);
        let (num, state) = break_line(&run, 0, 200.0, true, &none());
        assert_eq!(num, 2);
        assert_eq!(state, LineState::HardLineBreak);
    }

    #[test]
    fn hard_break_at_line_start_keeps_zero_count() {
        let run = vertical_run(&[0, 1]);
        let (num, state) = break_line(&run, 0, 200.0, true, &none());
        assert_eq!(num, 0);
        assert_eq!(state, LineState::HardLineBreak);
    }

    #[test]
    fn exhausted_run_is_end_of_string() {
        let run = vertical_run(&[1, 2]);
        let (num, state) = break_line(&run, 2, 200.0, true, &none());
        assert_eq!(num, 0);
        assert_eq!(state, LineState::EndOfString);
    }

    #[test]
    fn line_without_room_for_one_glyph_requests_a_wrap() {
        // A continued line may have no room left at all; the caller
        // retries on a fresh line.
        let run = vertical_run(&[1, 2]);
        let (num, state) = break_line(&run, 0, 8.0, true, &none());
        assert_eq!(num, 0);
        assert_eq!(state, LineState::SoftLineBreak);
    }

    #[test]
    fn forbidden_last_glyph_moves_to_the_next_line() {
        // Glyph 9 is an opening bracket; it may not end the line.
        let rules = Rules {
            first: vec![],
            last: vec![9],
        };
        let run = vertical_run(&[1, 2, 9, 3]);
        let (num, state) = break_line(&run, 0, 48.0, true, &rules);
        assert_eq!(num, 2);
        assert_eq!(state, LineState::SoftLineBreak);
    }

    #[test]
    fn forbidden_first_glyph_is_pulled_up_despite_overflow() {
        // Glyph 7 is closing punctuation; it may not start a line.
        let rules = Rules {
            first: vec![7],
            last: vec![],
        };
        let run = vertical_run(&[1, 2, 3, 7, 4]);
        let (num, state) = break_line(&run, 0, 48.0, true, &rules);
        assert_eq!(num, 4);
        assert_eq!(state, LineState::SoftLineBreak);
    }

    #[test]
    fn horizontal_runs_budget_on_x_advance() {
        let glyphs = (0..4)
            .map(|i| PositionedGlyph {
                glyph_id: 1 + i as u32,
                cluster: i,
                x_advance: 10.0,
                y_advance: 0.0,
                x_offset: 0.0,
                y_offset: 0.0,
            })
            .collect::<Vec<_>>();
        let run = ShapedRun {
            glyphs,
            range: 0..4,
        };
        let (num, state) = break_line(&run, 0, 25.0, false, &none());
        assert_eq!(num, 2);
        assert_eq!(state, LineState::SoftLineBreak);
    }
}
