//! Vertical typesetting engine: fonts, shaping, line breaking, page
//! flow and the PDF/SVG output sinks.
//!
//! The pipeline is strictly top-down and single-threaded: a
//! [`ParsedDocument`](tatekumi_core::ParsedDocument) is shaped one
//! progression run at a time, broken into lines under kinsoku rules,
//! painted into column rects with ruby and emphasis overlays, and
//! flushed page by page into a [`surface::Surface`].

pub mod flow;
pub mod font;
pub mod linebreak;
pub mod outline;
pub mod page;
pub mod paint;
pub mod shape;
pub mod surface;

pub use flow::Typesetter;
pub use font::{Font, FontBook, Orientation};
pub use linebreak::LineState;
pub use page::{KihonHanmen, Margins, Page};
pub use shape::{PositionedGlyph, ShapedRun, TextShaper};
pub use surface::{PdfSurface, Surface, SvgSurface};
