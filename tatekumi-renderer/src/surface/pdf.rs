//! Multi-page PDF sink built on `pdf-writer`.
//!
//! Each page is a content stream of filled glyph outlines. A transform
//! emitted at the top of every stream flips PDF's bottom-left Y-up
//! coordinates into the engine's top-left Y-down device space, so
//! painters never see the difference.

use std::io::Write;

use anyhow::{Context, Result};
use pdf_writer::{Content, Pdf, Rect, Ref};
use tatekumi_core::geometry::Point;

use super::Surface;
use crate::outline::{GlyphPath, PathEl};

pub struct PdfSurface<W: Write> {
    out: W,
    pdf: Pdf,
    next_ref: i32,
    page_tree: Ref,
    page_ids: Vec<Ref>,
    content: Content,
    width: f32,
    height: f32,
    /// Current and subpath-start points, tracked for quad-to-cubic
    /// conversion (PDF content streams have no quadratic operator).
    current: Point,
    subpath_start: Point,
}

impl<W: Write> PdfSurface<W> {
    pub fn new(width: f64, height: f64, out: W) -> Self {
        let mut next_ref = 0;
        let page_tree = bump(&mut next_ref);
        Self {
            out,
            pdf: Pdf::new(),
            next_ref,
            page_tree,
            page_ids: Vec::new(),
            content: page_content(height as f32),
            width: width as f32,
            height: height as f32,
            current: Point::ZERO,
            subpath_start: Point::ZERO,
        }
    }

    fn bump(&mut self) -> Ref {
        bump(&mut self.next_ref)
    }
}

fn bump(next_ref: &mut i32) -> Ref {
    *next_ref += 1;
    Ref::new(*next_ref)
}

fn page_content(height: f32) -> Content {
    let mut content = Content::new();
    content.transform([1.0, 0.0, 0.0, -1.0, 0.0, height]);
    content
}

impl<W: Write> Surface for PdfSurface<W> {
    fn fill_path(&mut self, path: &GlyphPath) -> Result<()> {
        for el in &path.elements {
            match *el {
                PathEl::MoveTo(p) => {
                    self.content.move_to(p.x as f32, p.y as f32);
                    self.current = p;
                    self.subpath_start = p;
                }
                PathEl::LineTo(p) => {
                    self.content.line_to(p.x as f32, p.y as f32);
                    self.current = p;
                }
                PathEl::QuadTo(c, p) => {
                    let from = self.current;
                    let c1 = Point::new(
                        from.x + 2.0 / 3.0 * (c.x - from.x),
                        from.y + 2.0 / 3.0 * (c.y - from.y),
                    );
                    let c2 = Point::new(
                        p.x + 2.0 / 3.0 * (c.x - p.x),
                        p.y + 2.0 / 3.0 * (c.y - p.y),
                    );
                    self.content.cubic_to(
                        c1.x as f32,
                        c1.y as f32,
                        c2.x as f32,
                        c2.y as f32,
                        p.x as f32,
                        p.y as f32,
                    );
                    self.current = p;
                }
                PathEl::CurveTo(c1, c2, p) => {
                    self.content.cubic_to(
                        c1.x as f32,
                        c1.y as f32,
                        c2.x as f32,
                        c2.y as f32,
                        p.x as f32,
                        p.y as f32,
                    );
                    self.current = p;
                }
                PathEl::Close => {
                    self.content.close_path();
                    self.current = self.subpath_start;
                }
            }
        }
        self.content.fill_nonzero();
        Ok(())
    }

    fn finish_page(&mut self) -> Result<()> {
        let content_id = self.bump();
        let page_id = self.bump();

        let data = std::mem::replace(&mut self.content, page_content(self.height)).finish();
        self.pdf.stream(content_id, &data);
        self.pdf
            .page(page_id)
            .parent(self.page_tree)
            .media_box(Rect::new(0.0, 0.0, self.width, self.height))
            .contents(content_id);
        self.page_ids.push(page_id);
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<()> {
        let mut this = *self;
        this.pdf
            .pages(this.page_tree)
            .count(this.page_ids.len() as i32)
            .kids(this.page_ids.iter().copied());
        let catalog_id = bump(&mut this.next_ref);
        this.pdf.catalog(catalog_id).pages(this.page_tree);

        let bytes = this.pdf.finish();
        this.out.write_all(&bytes).context("failed to write PDF")?;
        this.out.flush().context("failed to flush PDF")?;
        Ok(())
    }
}
