//! SVG directory sink: one file per page plus `info.json`.
//!
//! Pages are numbered `000000.svg`, `000001.svg`, … inside the target
//! directory. After the last page, `info.json` lists every emitted
//! file as a leaf name prefixed with `/`.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use xmlwriter::XmlWriter;

use super::Surface;
use crate::outline::{GlyphPath, PathEl};

pub struct SvgSurface {
    dir: PathBuf,
    width: f64,
    height: f64,
    xml: XmlWriter,
    index: usize,
    leafs: Vec<String>,
}

impl SvgSurface {
    pub fn new(dir: &Path, width: f64, height: f64) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create SVG directory {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            width,
            height,
            xml: page_writer(width, height),
            index: 0,
            leafs: Vec::new(),
        })
    }
}

fn page_writer(width: f64, height: f64) -> XmlWriter {
    let mut xml = XmlWriter::new(xmlwriter::Options::default());
    xml.start_element("svg");
    xml.write_attribute("xmlns", "http://www.w3.org/2000/svg");
    xml.write_attribute("width", &format!("{width}pt"));
    xml.write_attribute("height", &format!("{height}pt"));
    xml.write_attribute("viewBox", &format!("0 0 {width} {height}"));
    xml
}

impl Surface for SvgSurface {
    fn fill_path(&mut self, path: &GlyphPath) -> Result<()> {
        let mut d = String::new();
        for el in &path.elements {
            if !d.is_empty() {
                d.push(' ');
            }
            match *el {
                PathEl::MoveTo(p) => {
                    let _ = write!(d, "M {:.3} {:.3}", p.x, p.y);
                }
                PathEl::LineTo(p) => {
                    let _ = write!(d, "L {:.3} {:.3}", p.x, p.y);
                }
                PathEl::QuadTo(c, p) => {
                    let _ = write!(d, "Q {:.3} {:.3} {:.3} {:.3}", c.x, c.y, p.x, p.y);
                }
                PathEl::CurveTo(c1, c2, p) => {
                    let _ = write!(
                        d,
                        "C {:.3} {:.3} {:.3} {:.3} {:.3} {:.3}",
                        c1.x, c1.y, c2.x, c2.y, p.x, p.y
                    );
                }
                PathEl::Close => d.push('Z'),
            }
        }

        self.xml.start_element("path");
        self.xml.write_attribute("d", &d);
        self.xml.end_element();
        Ok(())
    }

    fn finish_page(&mut self) -> Result<()> {
        let xml = std::mem::replace(&mut self.xml, page_writer(self.width, self.height));
        let name = format!("{:06}.svg", self.index);
        let path = self.dir.join(&name);
        fs::write(&path, xml.end_document())
            .with_context(|| format!("failed to write {}", path.display()))?;
        self.leafs.push(format!("/{name}"));
        self.index += 1;
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<()> {
        let listing = serde_json::json!({ "fileLeafs": self.leafs });
        let path = self.dir.join("info.json");
        fs::write(&path, serde_json::to_string(&listing)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tatekumi_core::geometry::Point;

    #[test]
    fn writes_one_file_per_page_and_an_index() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut surface: Box<dyn Surface> = Box::new(SvgSurface::new(dir.path(), 90.0, 160.0)?);

        surface.fill_path(&GlyphPath {
            elements: vec![
                PathEl::MoveTo(Point::new(1.0, 2.0)),
                PathEl::LineTo(Point::new(3.0, 2.0)),
                PathEl::Close,
            ],
        })?;
        surface.finish_page()?;
        surface.finish_page()?;
        surface.finish_page()?;
        surface.finish()?;

        for name in ["000000.svg", "000001.svg", "000002.svg"] {
            assert!(dir.path().join(name).is_file(), "{name} should exist");
        }
        let first = fs::read_to_string(dir.path().join("000000.svg"))?;
        assert!(first.contains("<path"));
        assert!(first.contains("M 1.000 2.000"));

        let info = fs::read_to_string(dir.path().join("info.json"))?;
        assert_eq!(
            info,
            r#"{"fileLeafs":["/000000.svg","/000001.svg","/000002.svg"]}"#
        );
        Ok(())
    }

    #[test]
    fn empty_document_lists_no_pages() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let surface: Box<dyn Surface> = Box::new(SvgSurface::new(dir.path(), 90.0, 160.0)?);
        surface.finish()?;
        let info = fs::read_to_string(dir.path().join("info.json"))?;
        assert_eq!(info, r#"{"fileLeafs":[]}"#);
        Ok(())
    }
}
