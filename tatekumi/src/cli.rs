//! Command line surface and page-geometry resolution.

use std::path::PathBuf;

use clap::Parser;
use tatekumi_renderer::Margins;

#[derive(Parser, Debug)]
#[command(
    name = "tatekumi",
    about = "Typeset Aozora Bunko text vertically into PDF or SVG",
    version
)]
pub struct Args {
    /// Base font size in points.
    #[arg(long, default_value_t = 16.0)]
    pub fontsize: f64,

    /// Ruby font size as a fraction of the base size.
    #[arg(long, default_value_t = 0.5)]
    pub rubysize: f64,

    /// Page width in points; derived from height and ratio when unset.
    #[arg(long)]
    pub width: Option<f64>,

    /// Page height in points; derived from size when unset.
    #[arg(long)]
    pub height: Option<f64>,

    /// Page height in inches, used when height is unset.
    #[arg(long, default_value_t = 5.0)]
    pub size: f64,

    /// Width to height ratio, used when width is unset.
    #[arg(long, default_value_t = 9.0 / 16.0)]
    pub ratio: f64,

    /// Page margin in points; the per-side options override it.
    #[arg(long, default_value_t = 0.0)]
    pub margin: f64,

    #[arg(long, default_value_t = 0.0)]
    pub margin_top: f64,

    #[arg(long, default_value_t = 0.0)]
    pub margin_bottom: f64,

    #[arg(long, default_value_t = 0.0)]
    pub margin_left: f64,

    #[arg(long, default_value_t = 0.0)]
    pub margin_right: f64,

    /// Columns per page.
    #[arg(long, default_value_t = 1)]
    pub columns: usize,

    /// Gap between columns in points; defaults to the line gap.
    #[arg(long)]
    pub column_gap: Option<f64>,

    /// Write one SVG file per page into this directory instead of
    /// streaming a PDF to stdout.
    #[arg(long)]
    pub svgpath: Option<PathBuf>,

    /// Base font family.
    #[arg(long, default_value = "IPAexMincho")]
    pub fontface: String,

    /// Ruby font family; defaults to the base family.
    #[arg(long)]
    pub rubyfontface: Option<String>,
}

/// Page geometry derived from the raw arguments, with the enforced
/// minima applied: the right margin reserves the ruby gutter and the
/// bottom margin half a glyph.
#[derive(Clone, Debug)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    pub line_gap: f64,
    pub column_gap: f64,
    pub columns: usize,
    pub ruby_size: f64,
    pub ruby_family: String,
}

impl Args {
    pub fn layout(&self) -> Layout {
        let height = self.height.unwrap_or(self.size * 72.0);
        let width = self.width.unwrap_or(height * self.ratio);

        let side = |v: f64| if v == 0.0 { self.margin } else { v };
        let mut margins = Margins {
            top: side(self.margin_top),
            bottom: side(self.margin_bottom),
            left: side(self.margin_left),
            right: side(self.margin_right),
        };
        margins.right = margins.right.max(self.fontsize * self.rubysize);
        margins.bottom = margins.bottom.max(self.fontsize / 2.0);

        let line_gap = self.fontsize;
        let column_gap = self
            .column_gap
            .unwrap_or(if self.columns > 1 { line_gap } else { 0.0 });

        Layout {
            width,
            height,
            margins,
            line_gap,
            column_gap,
            columns: self.columns.max(1),
            ruby_size: self.fontsize * self.rubysize,
            ruby_family: self
                .rubyfontface
                .clone()
                .unwrap_or_else(|| self.fontface.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        let mut full = vec!["tatekumi"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).expect("arguments should parse")
    }

    #[test]
    fn page_size_derives_from_size_and_ratio() {
        let layout = args(&[]).layout();
        assert_eq!(layout.height, 360.0);
        assert_eq!(layout.width, 360.0 * 9.0 / 16.0);
    }

    #[test]
    fn explicit_dimensions_win() {
        let layout = args(&["--width", "100", "--height", "200"]).layout();
        assert_eq!(layout.width, 100.0);
        assert_eq!(layout.height, 200.0);
    }

    #[test]
    fn general_margin_fills_unset_sides() {
        let layout = args(&["--margin", "20", "--margin-top", "30"]).layout();
        assert_eq!(layout.margins.top, 30.0);
        assert_eq!(layout.margins.bottom, 20.0);
        assert_eq!(layout.margins.left, 20.0);
        assert_eq!(layout.margins.right, 20.0);
    }

    #[test]
    fn ruby_gutter_and_bottom_margin_minima_are_enforced() {
        let layout = args(&[]).layout();
        assert_eq!(layout.margins.right, 8.0);
        assert_eq!(layout.margins.bottom, 8.0);
        let layout = args(&["--margin", "12"]).layout();
        assert_eq!(layout.margins.right, 12.0);
    }

    #[test]
    fn column_gap_defaults_to_line_gap_for_multiple_columns() {
        assert_eq!(args(&[]).layout().column_gap, 0.0);
        assert_eq!(args(&["--columns", "3"]).layout().column_gap, 16.0);
        assert_eq!(
            args(&["--columns", "3", "--column-gap", "4"]).layout().column_gap,
            4.0
        );
    }

    #[test]
    fn ruby_family_falls_back_to_the_base_family() {
        let layout = args(&["--fontface", "Noto Serif CJK JP"]).layout();
        assert_eq!(layout.ruby_family, "Noto Serif CJK JP");
        let layout = args(&["--rubyfontface", "IPAexGothic"]).layout();
        assert_eq!(layout.ruby_family, "IPAexGothic");
    }

    #[test]
    fn ruby_size_scales_with_the_base_size() {
        let layout = args(&["--fontsize", "20", "--rubysize", "0.4"]).layout();
        assert_eq!(layout.ruby_size, 8.0);
    }
}
