//! The tatekumi command line tool: reads Aozora-annotated UTF-8 from
//! stdin and writes a vertically typeset document as PDF to stdout, or
//! as one SVG per page into a directory.

pub mod app;
pub mod cli;
