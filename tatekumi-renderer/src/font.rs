//! Font discovery and the logical font handle.
//!
//! `FontBook` resolves a family name to face data through `fontdb`,
//! keeping the few opened byte buffers shared between orientations.
//! `Font` wraps one face at a fixed size and orientation and exposes
//! zero-copy views for the shaper (`harfrust`) and the outline
//! extractor (`skrifa`), plus the lazily computed kinsoku glyph sets.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use fontdb::{Database, Family, ID, Query, Stretch, Style, Weight};
use once_cell::sync::OnceCell;
use skrifa::MetadataProvider;
use skrifa::instance::{LocationRef, Size};
use tracing::warn;

use crate::linebreak::Kinsoku;
use crate::shape::{ShapingOptions, TextShaper};

/// Glyphs that must not start a line, e.g. closing punctuation.
const FORBIDDEN_FIRST: &str = "。、」』)）";
/// Glyphs that must not end a line, e.g. opening brackets.
const FORBIDDEN_LAST: &str = "「『(（";

/// Whether a font advances glyphs down a vertical line or along a
/// horizontal baseline (used for rotated Latin fragments).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Font provider resolving family names against the system database.
///
/// A run opens at most a handful of faces (the base family twice, once
/// per orientation, plus the ruby family), so the opened byte buffers
/// live in a short list and are shared between the orientations of one
/// face.
pub struct FontBook {
    database: Database,
    opened: Vec<(ID, Arc<[u8]>)>,
}

impl FontBook {
    /// Creates a new font book with all available system fonts loaded.
    pub fn new() -> Self {
        let mut database = Database::new();
        database.load_system_fonts();
        Self::from_database(database)
    }

    /// Creates a font book from an existing font database, useful for
    /// tests with custom font collections.
    pub fn from_database(database: Database) -> Self {
        Self {
            database,
            opened: Vec::new(),
        }
    }

    /// Resolves a family name to a [`Font`] at the given size and
    /// orientation. An empty family name falls back to generic Serif.
    pub fn query(&mut self, family: &str, size: f64, orient: Orientation) -> Result<Font> {
        let families = if family.is_empty() {
            vec![Family::Serif]
        } else {
            vec![Family::Name(family), Family::Serif]
        };
        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self
            .database
            .query(&query)
            .with_context(|| format!("no font matches family {family:?}"))?;
        let index = self
            .database
            .face(id)
            .map(|face| face.index)
            .with_context(|| format!("missing face info for id {id:?}"))?;

        let data = if let Some(pos) = self.opened.iter().position(|(opened, _)| *opened == id) {
            self.opened[pos].1.clone()
        } else {
            let bytes = self
                .database
                .with_face_data(id, |data, _| data.to_vec())
                .with_context(|| format!("font data for family {family:?} is unavailable"))?;
            let data: Arc<[u8]> = Arc::from(bytes);
            self.opened.push((id, data.clone()));
            data
        };

        Font::new(data, index, size, orient)
    }
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

/// A loaded face at a fixed size and orientation.
///
/// The shaper and the renderer both read the same immutable byte
/// buffer through per-call zero-copy views, so one `Font` value serves
/// both sides of the pipeline.
#[derive(Debug)]
pub struct Font {
    data: Arc<[u8]>,
    index: u32,
    size: f64,
    orient: Orientation,
    units_per_em: f64,
    /// Ascent in points at `size` (positive, above the baseline).
    ascent: f64,
    /// Descent in points at `size` (negative, below the baseline).
    descent: f64,
    forbidden_first: OnceCell<Vec<u32>>,
    forbidden_last: OnceCell<Vec<u32>>,
}

impl Font {
    pub fn new(data: Arc<[u8]>, index: u32, size: f64, orient: Orientation) -> Result<Self> {
        let metrics = {
            let face = skrifa::FontRef::from_index(&data, index)
                .map_err(|e| anyhow!("unable to read font face {index}: {e}"))?;
            face.metrics(Size::new(size as f32), LocationRef::default())
        };
        Ok(Self {
            data,
            index,
            size,
            orient,
            units_per_em: metrics.units_per_em as f64,
            ascent: metrics.ascent as f64,
            descent: metrics.descent as f64,
            forbidden_first: OnceCell::new(),
            forbidden_last: OnceCell::new(),
        })
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn is_vertical(&self) -> bool {
        self.orient == Orientation::Vertical
    }

    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    pub fn descent(&self) -> f64 {
        self.descent
    }

    /// Font-unit to point scale at this font's size.
    pub fn scale(&self) -> f64 {
        self.size / self.units_per_em
    }

    /// Distance from the right edge of a line rect to the baseline of a
    /// rotated horizontal fragment, so the Latin ascender lines up with
    /// the Japanese glyph edge.
    pub fn rotated_baseline_inset(&self) -> f64 {
        self.size * self.ascent / (self.ascent - self.descent)
    }

    /// Builds the shaping view over the cached face data.
    pub fn harfrust(&self) -> Result<harfrust::FontRef<'_>> {
        harfrust::FontRef::from_index(&self.data, self.index)
            .map_err(|e| anyhow!("unable to build shaping face {}: {e}", self.index))
    }

    /// Builds the outline/metrics view over the cached face data.
    pub fn skrifa(&self) -> Result<skrifa::FontRef<'_>> {
        skrifa::FontRef::from_index(&self.data, self.index)
            .map_err(|e| anyhow!("unable to build render face {}: {e}", self.index))
    }

    fn forbidden_first_glyphs(&self) -> &[u32] {
        self.forbidden_first
            .get_or_init(|| kinsoku_glyphs(self, FORBIDDEN_FIRST))
    }

    fn forbidden_last_glyphs(&self) -> &[u32] {
        self.forbidden_last
            .get_or_init(|| kinsoku_glyphs(self, FORBIDDEN_LAST))
    }
}

impl Kinsoku for Font {
    fn is_forbidden_first(&self, glyph_id: u32) -> bool {
        self.forbidden_first_glyphs().binary_search(&glyph_id).is_ok()
    }

    fn is_forbidden_last(&self, glyph_id: u32) -> bool {
        self.forbidden_last_glyphs().binary_search(&glyph_id).is_ok()
    }
}

/// Shape one of the forbidden-glyph literals under this exact font.
/// Glyph ids are font-dependent, so the sets can only be obtained by
/// shaping the literals, never hard-coded.
fn kinsoku_glyphs(font: &Font, literal: &str) -> Vec<u32> {
    match TextShaper::new().shape(literal, font, &ShapingOptions::ruby(), 0) {
        Ok(run) => {
            let mut glyphs: Vec<u32> = run.glyphs.iter().map(|g| g.glyph_id).collect();
            glyphs.sort_unstable();
            glyphs.dedup();
            glyphs
        }
        Err(err) => {
            warn!(%err, "failed to shape kinsoku literal");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_family_error_names_the_family() {
        let mut book = FontBook::from_database(Database::new());
        let err = book
            .query("IPAexMincho", 16.0, Orientation::Vertical)
            .expect_err("an empty database cannot resolve any family");
        assert!(err.to_string().contains("IPAexMincho"));
    }

    #[test]
    #[ignore = "requires an installed serif font"]
    fn query_resolves_generic_serif() -> Result<()> {
        let mut book = FontBook::new();
        let font = book.query("", 16.0, Orientation::Vertical)?;
        assert!(font.is_vertical());
        assert!(font.scale() > 0.0);
        assert!(font.ascent() > 0.0);
        assert!(font.descent() < 0.0);
        Ok(())
    }

    #[test]
    #[ignore = "requires an installed CJK font"]
    fn kinsoku_sets_are_disjoint() -> Result<()> {
        let mut book = FontBook::new();
        let font = book.query("", 16.0, Orientation::Vertical)?;
        let first = font.forbidden_first_glyphs().to_vec();
        let last = font.forbidden_last_glyphs().to_vec();
        assert!(!first.is_empty());
        assert!(!last.is_empty());
        assert!(first.iter().all(|g| !last.contains(g)));
        Ok(())
    }
}
