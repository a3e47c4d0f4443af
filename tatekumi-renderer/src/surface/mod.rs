//! Output sinks: multi-page PDF to a stream, or one SVG file per page
//! plus a JSON index.
//!
//! Painters hand every glyph to the sink as a filled path in device
//! coordinates, so both backends stay free of font state. A sink is
//! told when a page ends (`finish_page`) and exactly once when the
//! whole document ends (`finish`); the last page must be finished
//! before the document is.

use anyhow::Result;

use crate::outline::GlyphPath;

pub mod pdf;
pub mod svg;

pub use pdf::PdfSurface;
pub use svg::SvgSurface;

/// A rendering target for one document.
pub trait Surface {
    /// Fills a path with black on the current page.
    fn fill_path(&mut self, path: &GlyphPath) -> Result<()>;

    /// Finishes the current page and prepares the next one.
    fn finish_page(&mut self) -> Result<()>;

    /// Flushes the document. Consumes the sink; no page may be open
    /// (i.e. `finish_page` was called for the last page).
    fn finish(self: Box<Self>) -> Result<()>;
}
