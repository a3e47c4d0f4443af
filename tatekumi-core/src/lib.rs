//! Document model for Aozora Bunko vertical typesetting.
//!
//! This crate owns everything that exists before a font is opened: the
//! geometry primitives the layout engine computes with, the parsed
//! document (progression runs, ruby spans, emphasis spans) and the
//! markup parser that produces it from annotated plain text.

pub mod document;
pub mod geometry;
pub mod parser;

pub use document::{EmphasisSpan, ParsedDocument, Progression, ProgressionRun, RubySpan};
pub use geometry::{Point, Rect};
pub use parser::{ParseOutput, parse};
