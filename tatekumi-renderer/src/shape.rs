//! Shaper adapter over HarfRust.
//!
//! Turns a UTF-8 run into parallel glyph/cluster/advance arrays. All
//! advances and offsets are scaled to device points at this stage;
//! cluster values are absolute byte offsets into the parent document.

use anyhow::Result;
use harfrust::{Direction, Script, ShaperData, UnicodeBuffer, script};

use crate::font::Font;

/// A glyph with positioning information in device points.
///
/// Offsets and advances follow the shaper's convention: Y grows upward,
/// so a vertical run advances with negative `y_advance`.
#[derive(Debug, Clone)]
pub struct PositionedGlyph {
    /// The glyph id in the font's glyph set. Id 0 means the font has no
    /// glyph for the code point and is treated as a hard break marker.
    pub glyph_id: u32,
    /// Absolute byte offset into the parent document of the cluster
    /// that produced this glyph. Non-decreasing across a run.
    pub cluster: usize,
    pub x_advance: f64,
    pub y_advance: f64,
    pub x_offset: f64,
    pub y_offset: f64,
}

/// A shaped run of text: positioned glyphs plus the byte range of the
/// parent document they were shaped from.
#[derive(Debug, Clone, Default)]
pub struct ShapedRun {
    pub glyphs: Vec<PositionedGlyph>,
    pub range: std::ops::Range<usize>,
}

impl ShapedRun {
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Exclusive end of glyph `i`'s bytes: the next glyph's cluster, or
    /// the end of the run for the last glyph.
    pub fn cluster_end(&self, i: usize) -> usize {
        self.glyphs
            .get(i + 1)
            .map(|g| g.cluster)
            .unwrap_or(self.range.end)
    }
}

/// Direction, script and language for one shaping call.
#[derive(Debug, Clone, Copy)]
pub struct ShapingOptions {
    pub direction: Direction,
    pub script: Option<Script>,
    pub language: &'static str,
}

impl ShapingOptions {
    /// Options matching the font's orientation: top-to-bottom Japanese
    /// for vertical faces, left-to-right for rotated Latin fragments.
    pub fn for_font(font: &Font) -> Self {
        if font.is_vertical() {
            Self {
                direction: Direction::TopToBottom,
                script: None,
                language: "ja",
            }
        } else {
            Self {
                direction: Direction::LeftToRight,
                script: None,
                language: "en",
            }
        }
    }

    /// Options for ruby text and the kinsoku literals.
    pub fn ruby() -> Self {
        Self {
            direction: Direction::TopToBottom,
            script: Some(script::KATAKANA),
            language: "ja",
        }
    }
}

/// Text shaper using HarfRust.
#[derive(Debug, Clone, Default)]
pub struct TextShaper;

impl TextShaper {
    pub fn new() -> Self {
        Self
    }

    /// Shapes `text` under `options`, offsetting every cluster by
    /// `cluster_offset` so the result addresses the parent document.
    pub fn shape(
        &self,
        text: &str,
        font: &Font,
        options: &ShapingOptions,
        cluster_offset: usize,
    ) -> Result<ShapedRun> {
        let font_ref = font.harfrust()?;

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.set_direction(options.direction);
        if let Some(script) = options.script {
            buffer.set_script(script);
        }
        if let Ok(language) = options.language.parse() {
            buffer.set_language(language);
        }
        buffer.guess_segment_properties();

        let shaper_data = ShaperData::new(&font_ref);
        let shaper = shaper_data
            .shaper(&font_ref)
            .point_size(Some(font.size() as f32))
            .build();
        let output = shaper.shape(buffer, &[]);

        let glyph_positions = output.glyph_positions();
        let glyph_infos = output.glyph_infos();

        // Scale factor to convert font units to points.
        let scale = font.scale();

        let mut glyphs = Vec::with_capacity(glyph_infos.len());
        for (info, pos) in glyph_infos.iter().zip(glyph_positions.iter()) {
            glyphs.push(PositionedGlyph {
                glyph_id: info.glyph_id,
                cluster: cluster_offset + info.cluster as usize,
                x_offset: pos.x_offset as f64 * scale,
                y_offset: pos.y_offset as f64 * scale,
                x_advance: pos.x_advance as f64 * scale,
                y_advance: pos.y_advance as f64 * scale,
            });
        }

        Ok(ShapedRun {
            glyphs,
            range: cluster_offset..cluster_offset + text.len(),
        })
    }
}
