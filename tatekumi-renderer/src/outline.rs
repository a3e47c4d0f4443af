//! Glyph outline extraction into device-space paths.
//!
//! Outlines come out of skrifa in glyph space (X right, Y up, origin at
//! the horizontal baseline origin) scaled to the font size. A
//! [`Transform`] maps them into page space (Y down), either upright or
//! rotated 90° clockwise for horizontal-in-vertical fragments.

use anyhow::{Result, anyhow};
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::{GlyphId, MetadataProvider};
use tatekumi_core::geometry::Point;

use crate::font::Font;

/// An affine map from glyph space to device space:
/// `device = (dx + xx·x + xy·y, dy + yx·x + yy·y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub xx: f64,
    pub xy: f64,
    pub yx: f64,
    pub yy: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Transform {
    /// Upright placement at `origin`: glyph X maps to device X, glyph Y
    /// (up) maps to device −Y.
    pub fn upright(origin: Point) -> Self {
        Self {
            xx: 1.0,
            xy: 0.0,
            yx: 0.0,
            yy: -1.0,
            dx: origin.x,
            dy: origin.y,
        }
    }

    /// 90° clockwise rotation at `origin`: the baseline runs down the
    /// page and the ascender side faces the right edge.
    pub fn rotated(origin: Point) -> Self {
        Self {
            xx: 0.0,
            xy: 1.0,
            yx: 1.0,
            yy: 0.0,
            dx: origin.x,
            dy: origin.y,
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> Point {
        Point::new(
            self.dx + self.xx * x + self.xy * y,
            self.dy + self.yx * x + self.yy * y,
        )
    }
}

/// One path command in device space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathEl {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    CurveTo(Point, Point, Point),
    Close,
}

/// A filled glyph outline in device space.
#[derive(Clone, Debug, Default)]
pub struct GlyphPath {
    pub elements: Vec<PathEl>,
}

struct TransformPen<'a> {
    transform: Transform,
    elements: &'a mut Vec<PathEl>,
}

impl OutlinePen for TransformPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.transform.apply(x as f64, y as f64);
        self.elements.push(PathEl::MoveTo(p));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.transform.apply(x as f64, y as f64);
        self.elements.push(PathEl::LineTo(p));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        let c = self.transform.apply(cx0 as f64, cy0 as f64);
        let p = self.transform.apply(x as f64, y as f64);
        self.elements.push(PathEl::QuadTo(c, p));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let c0 = self.transform.apply(cx0 as f64, cy0 as f64);
        let c1 = self.transform.apply(cx1 as f64, cy1 as f64);
        let p = self.transform.apply(x as f64, y as f64);
        self.elements.push(PathEl::CurveTo(c0, c1, p));
    }

    fn close(&mut self) {
        self.elements.push(PathEl::Close);
    }
}

/// Extracts the outline of `glyph_id` at the font's size, mapped by
/// `transform`. Returns `None` for glyphs without an outline (blanks,
/// missing glyphs).
pub fn glyph_path(font: &Font, glyph_id: u32, transform: Transform) -> Result<Option<GlyphPath>> {
    let face = font.skrifa()?;
    let outlines = face.outline_glyphs();
    let Some(outline) = outlines.get(GlyphId::new(glyph_id)) else {
        return Ok(None);
    };

    let mut elements = Vec::new();
    let mut pen = TransformPen {
        transform,
        elements: &mut elements,
    };
    let settings = DrawSettings::unhinted(Size::new(font.size() as f32), LocationRef::default());
    outline
        .draw(settings, &mut pen)
        .map_err(|e| anyhow!("failed to draw glyph {glyph_id}: {e}"))?;

    if elements.is_empty() {
        Ok(None)
    } else {
        Ok(Some(GlyphPath { elements }))
    }
}
