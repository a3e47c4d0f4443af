//! End-to-end typesetting scenarios. These need an installed CJK font
//! and are ignored by default, like the rendering tests they verify
//! against.

use std::fs;

use anyhow::Result;
use tatekumi_core::parse;
use tatekumi_renderer::{
    Font, FontBook, KihonHanmen, Margins, Orientation, Page, PdfSurface, Surface, SvgSurface,
    Typesetter,
};

const SAMPLE_TEXT: &str = "吾輩は猫である。名前はまだ無い。どこで生れたかとんと見当がつかぬ。何でも薄暗いじめじめした所でニャーニャー泣いていた事だけは記憶している。吾輩はここで始めて人間というものを見た。";

fn fonts(book: &mut FontBook, size: f64) -> Result<(Font, Font, Font)> {
    Ok((
        book.query("", size, Orientation::Vertical)?,
        book.query("", size, Orientation::Horizontal)?,
        book.query("", size / 2.0, Orientation::Vertical)?,
    ))
}

fn page(width: f64, height: f64) -> Page {
    Page::new(
        width,
        height,
        Margins {
            top: 0.0,
            bottom: 8.0,
            left: 0.0,
            right: 8.0,
        },
    )
}

#[test]
#[ignore = "requires an installed CJK font"]
fn plain_paragraph_fills_one_svg_page() -> Result<()> {
    let mut book = FontBook::new();
    let (vertical, horizontal, ruby) = fonts(&mut book, 16.0)?;

    let dir = tempfile::tempdir()?;
    let page = page(100.0, 200.0);
    let hanmen = KihonHanmen::new(page.inner_rect(), 0.0, 1);
    let surface = Box::new(SvgSurface::new(dir.path(), 100.0, 200.0)?);

    let output = parse("日本語の文章");
    Typesetter::new(&vertical, &horizontal, &ruby, 16.0, hanmen, surface)
        .typeset(&output.document)?;

    let first = fs::read_to_string(dir.path().join("000000.svg"))?;
    assert_eq!(first.matches("<path").count(), 6, "one path per glyph");
    assert!(!dir.path().join("000001.svg").exists());

    let info = fs::read_to_string(dir.path().join("info.json"))?;
    assert_eq!(info, r#"{"fileLeafs":["/000000.svg"]}"#);
    Ok(())
}

#[test]
#[ignore = "requires an installed CJK font"]
fn ruby_gloss_adds_overlay_paths() -> Result<()> {
    let mut book = FontBook::new();
    let (vertical, horizontal, ruby) = fonts(&mut book, 16.0)?;

    let dir = tempfile::tempdir()?;
    let page = page(100.0, 200.0);
    let hanmen = KihonHanmen::new(page.inner_rect(), 0.0, 1);
    let surface = Box::new(SvgSurface::new(dir.path(), 100.0, 200.0)?);

    let output = parse("｜日本語《にほんご》");
    Typesetter::new(&vertical, &horizontal, &ruby, 16.0, hanmen, surface)
        .typeset(&output.document)?;

    let first = fs::read_to_string(dir.path().join("000000.svg"))?;
    // Three base glyphs plus four ruby glyphs.
    assert_eq!(first.matches("<path").count(), 7);
    Ok(())
}

#[test]
#[ignore = "requires an installed CJK font"]
fn emphasis_dots_sit_beside_their_base() -> Result<()> {
    let mut book = FontBook::new();
    let (vertical, horizontal, ruby) = fonts(&mut book, 16.0)?;

    let dir = tempfile::tempdir()?;
    let page = page(100.0, 200.0);
    let hanmen = KihonHanmen::new(page.inner_rect(), 0.0, 1);
    let surface = Box::new(SvgSurface::new(dir.path(), 100.0, 200.0)?);

    let output = parse("これは重要［＃「重要」に傍点］だ");
    Typesetter::new(&vertical, &horizontal, &ruby, 16.0, hanmen, surface)
        .typeset(&output.document)?;

    let first = fs::read_to_string(dir.path().join("000000.svg"))?;
    // Six base glyphs plus one dot for each of the two emphasized ones.
    assert_eq!(first.matches("<path").count(), 8);
    Ok(())
}

#[test]
#[ignore = "requires an installed CJK font"]
fn long_input_spills_over_multiple_pdf_pages() -> Result<()> {
    let mut book = FontBook::new();
    let (vertical, horizontal, ruby) = fonts(&mut book, 16.0)?;

    let mut buf = Vec::new();
    {
        let page = page(100.0, 200.0);
        let hanmen = KihonHanmen::new(page.inner_rect(), 0.0, 1);
        let surface: Box<dyn Surface + '_> = Box::new(PdfSurface::new(100.0, 200.0, &mut buf));

        let output = parse(SAMPLE_TEXT);
        Typesetter::new(&vertical, &horizontal, &ruby, 16.0, hanmen, surface)
            .typeset(&output.document)?;
    }

    assert!(buf.starts_with(b"%PDF-"));
    let text = String::from_utf8_lossy(&buf);
    assert!(!text.contains("/Count 0"));
    assert!(!text.contains("/Count 1"));
    Ok(())
}

#[test]
#[ignore = "requires an installed CJK font"]
fn empty_input_still_emits_one_blank_page() -> Result<()> {
    let mut book = FontBook::new();
    let (vertical, horizontal, ruby) = fonts(&mut book, 16.0)?;

    let dir = tempfile::tempdir()?;
    let page = page(100.0, 200.0);
    let hanmen = KihonHanmen::new(page.inner_rect(), 0.0, 1);
    let surface = Box::new(SvgSurface::new(dir.path(), 100.0, 200.0)?);

    let output = parse("");
    Typesetter::new(&vertical, &horizontal, &ruby, 16.0, hanmen, surface)
        .typeset(&output.document)?;

    assert!(dir.path().join("000000.svg").is_file());
    let info = fs::read_to_string(dir.path().join("info.json"))?;
    assert_eq!(info, r#"{"fileLeafs":["/000000.svg"]}"#);
    Ok(())
}
