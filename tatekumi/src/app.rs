//! Pipeline wiring: stdin → parse → fonts → flow → PDF/SVG.

use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use tatekumi_core::parse;
use tatekumi_renderer::{
    FontBook, KihonHanmen, Orientation, Page, PdfSurface, Surface, SvgSurface, Typesetter,
};

use crate::cli::Args;

pub fn run() -> Result<()> {
    // Stdout carries the PDF byte stream, so all diagnostics go to
    // stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let layout = args.layout();

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    // A single trailing line feed comes from the shell, not the text.
    let text = input.strip_suffix('\n').unwrap_or(&input);

    let output = parse(text);
    debug!(
        runs = output.document.runs.len(),
        rubies = output.document.rubies.len(),
        emphases = output.document.emphases.len(),
        "parsed input"
    );
    report_unknown_tags(&output.unknown_tags)?;

    let mut book = FontBook::new();
    let vertical = book.query(&args.fontface, args.fontsize, Orientation::Vertical)?;
    let horizontal = book.query(&args.fontface, args.fontsize, Orientation::Horizontal)?;
    let ruby = book.query(&layout.ruby_family, layout.ruby_size, Orientation::Vertical)?;

    let page = Page::new(layout.width, layout.height, layout.margins);
    let hanmen = KihonHanmen::new(page.inner_rect(), layout.column_gap, layout.columns);

    let surface: Box<dyn Surface> = match &args.svgpath {
        Some(dir) => Box::new(SvgSurface::new(dir, layout.width, layout.height)?),
        None => Box::new(PdfSurface::new(
            layout.width,
            layout.height,
            std::io::stdout().lock(),
        )),
    };

    Typesetter::new(
        &vertical,
        &horizontal,
        &ruby,
        layout.line_gap,
        hanmen,
        surface,
    )
    .typeset(&output.document)
}

/// Unknown `［＃…］` tags are dropped from the text but recorded in
/// `error.txt`; the parser already warned about each on stderr.
fn report_unknown_tags(tags: &[String]) -> Result<()> {
    if tags.is_empty() {
        return Ok(());
    }
    let mut body = String::new();
    for tag in tags {
        body.push_str(tag);
        body.push('\n');
    }
    std::fs::write("error.txt", body).context("failed to write error.txt")?;
    Ok(())
}
