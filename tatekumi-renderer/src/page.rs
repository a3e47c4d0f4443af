//! Page margins and the kihon-hanmen (basic print area).

use tatekumi_core::geometry::{Point, Rect};

/// Page margins in points.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

/// A page: the outer rect plus margins; the inner rect is the
/// typesetting area.
#[derive(Clone, Copy, Debug)]
pub struct Page {
    outer: Rect,
    inner: Rect,
}

impl Page {
    pub fn new(width: f64, height: f64, margins: Margins) -> Self {
        let outer = Rect::new(0.0, 0.0, width, height);
        let inner = Rect::new(
            outer.start.x + margins.left,
            outer.start.y + margins.top,
            outer.end.x - margins.right,
            outer.end.y - margins.bottom,
        );
        Self { outer, inner }
    }

    pub fn outer_rect(&self) -> Rect {
        self.outer
    }

    pub fn inner_rect(&self) -> Rect {
        self.inner
    }
}

/// The inner rect partitioned into `k` equal columns along the
/// line-progression axis (Y in vertical writing: columns are
/// full-width bands stacked top to bottom), with a cursor over them.
#[derive(Clone, Debug)]
pub struct KihonHanmen {
    columns: Vec<Rect>,
    index: usize,
}

impl KihonHanmen {
    pub fn new(inner: Rect, gap: f64, count: usize) -> Self {
        let count = count.max(1);
        let progress = (inner.height() - gap * (count - 1) as f64) / count as f64;

        let mut columns = Vec::with_capacity(count);
        let mut start = inner.start;
        for _ in 0..count {
            columns.push(Rect::from_origin(start, inner.width(), progress));
            start += Point::new(0.0, progress + gap);
        }

        Self { columns, index: 0 }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn current(&self) -> Rect {
        self.columns[self.index]
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.columns.len()
    }

    /// Moves to the next column, wrapping to the first. A wrap means
    /// the caller must start a new page.
    pub fn advance(&mut self) -> (Rect, bool) {
        let wrapped = self.is_last();
        self.index = if wrapped { 0 } else { self.index + 1 };
        (self.current(), wrapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_rect_respects_margins() {
        let page = Page::new(
            100.0,
            200.0,
            Margins {
                top: 10.0,
                bottom: 20.0,
                left: 5.0,
                right: 15.0,
            },
        );
        assert_eq!(page.outer_rect(), Rect::new(0.0, 0.0, 100.0, 200.0));
        assert_eq!(page.inner_rect(), Rect::new(5.0, 10.0, 85.0, 180.0));
    }

    #[test]
    fn columns_partition_the_inner_rect() {
        let inner = Rect::new(10.0, 20.0, 110.0, 260.0);
        let hanmen = KihonHanmen::new(inner, 30.0, 3);
        assert_eq!(hanmen.column_count(), 3);

        let mut cursor = hanmen.clone();
        for _ in 0..3 {
            let column = cursor.current();
            assert!(inner.contains(&column));
            assert_eq!(column.width(), inner.width());
            assert_eq!(column.height(), 60.0);
            cursor.advance();
        }
    }

    #[test]
    fn columns_are_separated_by_the_gap() {
        let inner = Rect::new(0.0, 0.0, 90.0, 210.0);
        let mut hanmen = KihonHanmen::new(inner, 10.0, 2);
        let first = hanmen.current();
        let (second, wrapped) = hanmen.advance();
        assert!(!wrapped);
        assert_eq!(second.start.y - first.end.y, 10.0);
    }

    #[test]
    fn advancing_past_the_last_column_wraps() {
        let inner = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut hanmen = KihonHanmen::new(inner, 0.0, 2);
        assert!(!hanmen.is_last());
        let (_, wrapped) = hanmen.advance();
        assert!(!wrapped);
        assert!(hanmen.is_last());
        let (column, wrapped) = hanmen.advance();
        assert!(wrapped);
        assert_eq!(column, hanmen.current());
        assert_eq!(column.start, inner.start);
    }

    #[test]
    fn single_column_always_wraps() {
        let inner = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut hanmen = KihonHanmen::new(inner, 0.0, 1);
        assert!(hanmen.is_last());
        let (_, wrapped) = hanmen.advance();
        assert!(wrapped);
    }
}
