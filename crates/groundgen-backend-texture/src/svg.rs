//! Vector document composition for cell layers.
//!
//! A document covers `size x size` centimetres. The viewBox spans the
//! unpadded lattice region, so wrap padding falls outside the image.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::cells::{Cell, CellTexture};
use crate::error::GenerateError;
use crate::point::{ColorRgb, Point2, Point3, Point4};

/// Centimetres per inch.
const CM_PER_INCH: f64 = 2.54;

/// Radius of the debug center markers, in user units.
const CENTER_MARKER_RADIUS: f64 = 70.0;

/// What is painted behind the cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Background {
    /// Transparent; rasterizes as black.
    #[default]
    None,
    Color(ColorRgb),
    /// Repeating image pattern.
    Texture(PathBuf),
}

/// Layout and styling of a composed document.
#[derive(Debug, Clone)]
pub struct SvgOptions {
    /// Image size in centimetres (and lattice cells).
    pub size: [usize; 2],
    /// Lattice units per cell.
    pub scale: f64,
    /// Top-left corner of the viewBox in lattice units.
    pub offset: Point2,
    pub dpi: f64,
    /// Color of a cell at height 0.
    pub foreground: ColorRgb,
    /// Color of a cell at height 255, and of the gaps unless textured.
    pub background_color: ColorRgb,
    pub background: Background,
    /// Draw a red marker on every cell's site.
    pub render_center: bool,
    /// Disable anti-aliasing, for binary masks.
    pub crisp_edges: bool,
}

/// A composed SVG document and its raster size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgDocument {
    pub width: u32,
    pub height: u32,
    pub text: String,
}

/// Pixel size of a `size` centimetre image at `dpi`.
pub fn image_size(size: [usize; 2], dpi: f64) -> (u32, u32) {
    let ppcm = dpi / CM_PER_INCH;
    let px = |cm: usize| (cm as f64 * ppcm + 0.5).floor() as u32;
    (px(size[0]), px(size[1]))
}

/// Color for height `z`, interpolated from `foreground` at 0 towards
/// `background` at 255.
pub fn z_color(foreground: &ColorRgb, background: &ColorRgb, z: f64) -> ColorRgb {
    let z = z.clamp(0.0, 255.0).trunc();
    foreground.lerp(background, z / 255.0)
}

/// Composes the document for `cells`.
///
/// Fails with [`GenerateError::Io`] when a texture image cannot be read.
pub fn compose(cells: &[Cell], options: &SvgOptions) -> Result<SvgDocument, GenerateError> {
    let (width, height) = image_size(options.size, options.dpi);
    let view_box = Point4::new(
        options.offset.x,
        options.offset.y,
        options.size[0] as f64 * options.scale,
        options.size[1] as f64 * options.scale,
    );

    let mut defs = String::new();
    let mut body = String::new();

    let background_fill = match &options.background {
        Background::None => None,
        Background::Color(color) => Some(color.to_hex()),
        Background::Texture(file) => {
            let texture = CellTexture {
                file: file.clone(),
                rotation: 0,
            };
            defs.push_str(&texture_pattern("tex-background", &texture, options)?);
            Some("url(#tex-background)".to_string())
        }
    };
    if let Some(fill) = background_fill {
        let (origin, extent) = (view_box.xy(), view_box.zw());
        let _ = writeln!(
            body,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            origin.x, origin.y, extent.x, extent.y, fill
        );
    }

    for (i, cell) in cells.iter().enumerate() {
        if cell.is_empty() {
            continue;
        }
        let fill = if let Some(texture) = &cell.texture {
            let id = format!("tex{}", i);
            defs.push_str(&texture_pattern(&id, texture, options)?);
            format!("url(#{})", id)
        } else if !cell.is_slanted {
            match &cell.color {
                Some(color) => color.to_hex(),
                None => z_color(&options.foreground, &options.background_color, cell.center.z)
                    .to_hex(),
            }
        } else {
            let id = format!("grad{}", i);
            defs.push_str(&slant_gradient(&id, cell, options));
            format!("url(#{})", id)
        };
        body.push_str(&cell_path(&cell.polygon, &fill));
        if options.render_center {
            let _ = writeln!(
                body,
                r##"<circle fill="#f00" stroke="none" cx="{}" cy="{}" r="{}"/>"##,
                cell.center.x, cell.center.y, CENTER_MARKER_RADIUS
            );
        }
    }

    let mut text = String::with_capacity(defs.len() + body.len() + 512);
    text.push_str("<?xml version='1.0' encoding='UTF-8' standalone='no'?>\n");
    let _ = write!(
        text,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{}" height="{}" viewBox="{} {} {} {}""#,
        width, height, view_box.x, view_box.y, view_box.z, view_box.w
    );
    if options.crisp_edges {
        text.push_str(r#" shape-rendering="crispEdges""#);
    }
    text.push_str(">\n<defs>\n");
    text.push_str(&defs);
    text.push_str("</defs>\n");
    text.push_str(&body);
    text.push_str("</svg>\n");

    Ok(SvgDocument {
        width,
        height,
        text,
    })
}

fn cell_path(polygon: &[Point3], fill: &str) -> String {
    let mut d = String::new();
    for (i, p) in polygon.iter().enumerate() {
        let _ = write!(d, "{} {},{} ", if i == 0 { "M" } else { "L" }, p.x, p.y);
    }
    d.push('Z');
    format!("<path fill=\"{}\" d=\"{}\"/>\n", fill, d)
}

/// The lowest and highest vertex of a slanted cell, with x and y normalized
/// into their common bounding box (0.5 on a flat axis).
fn normalized_z_bounds(cell: &Cell) -> (Point3, Point3) {
    let Some((low, high)) = cell.z_bounds() else {
        return (Point3::new(0.5, 0.5, 0.0), Point3::new(0.5, 0.5, 0.0));
    };
    let normalize = |a: f64, b: f64| -> (f64, f64) {
        let (min, max) = (a.min(b), a.max(b));
        let range = max - min;
        if range == 0.0 {
            (0.5, 0.5)
        } else {
            ((a - min) / range, (b - min) / range)
        }
    };
    let (lx, hx) = normalize(low.x, high.x);
    let (ly, hy) = normalize(low.y, high.y);
    (Point3::new(lx, ly, low.z), Point3::new(hx, hy, high.z))
}

fn slant_gradient(id: &str, cell: &Cell, options: &SvgOptions) -> String {
    let (low, high) = normalized_z_bounds(cell);
    let color = |z: f64| z_color(&options.foreground, &options.background_color, z).to_hex();
    format!(
        concat!(
            "<linearGradient id=\"{}\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\">\n",
            "\t<stop offset=\"0\" stop-color=\"{}\"/>\n",
            "\t<stop offset=\"1\" stop-color=\"{}\"/>\n",
            "</linearGradient>\n"
        ),
        id,
        low.x,
        low.y,
        high.x,
        high.y,
        color(low.z),
        color(high.z)
    )
}

/// A repeating pattern of the texture image, sized from its pixel size and
/// rotated about the tile center.
fn texture_pattern(
    id: &str,
    texture: &CellTexture,
    options: &SvgOptions,
) -> Result<String, GenerateError> {
    let file = resolve_texture(&texture.file)?;
    let (px_w, px_h) = image::image_dimensions(&file)?;
    let w = px_w.saturating_sub(1).max(1) as f64 * options.scale / options.dpi;
    let h = px_h.saturating_sub(1).max(1) as f64 * options.scale / options.dpi;
    let href = xml_escape(&file.to_string_lossy());
    Ok(format!(
        concat!(
            "<pattern id=\"{id}\" width=\"{w}\" height=\"{h}\" patternUnits=\"userSpaceOnUse\" ",
            "patternTransform=\"rotate({rot} {cx} {cy})\">\n",
            "\t<image xlink:href=\"{href}\" width=\"{w}\" height=\"{h}\" preserveAspectRatio=\"none\"/>\n",
            "</pattern>\n"
        ),
        id = id,
        w = w,
        h = h,
        rot = texture.rotation,
        cx = w / 2.0,
        cy = h / 2.0,
        href = href
    ))
}

fn resolve_texture(file: &Path) -> Result<PathBuf, GenerateError> {
    Ok(std::fs::canonicalize(file)?)
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> SvgOptions {
        SvgOptions {
            size: [2, 2],
            scale: 1000.0,
            offset: Point2::new(1000.0, 1000.0),
            dpi: 254.0,
            foreground: ColorRgb::white(),
            background_color: ColorRgb::black(),
            background: Background::Color(ColorRgb::black()),
            render_center: false,
            crisp_edges: false,
        }
    }

    fn square_cell(z: f64) -> Cell {
        let polygon = vec![
            Point3::new(1200.0, 1200.0, z),
            Point3::new(1800.0, 1200.0, z),
            Point3::new(1800.0, 1800.0, z),
            Point3::new(1200.0, 1800.0, z),
            Point3::new(1200.0, 1200.0, z),
        ];
        Cell::new(Point3::new(1500.0, 1500.0, z), polygon)
    }

    #[test]
    fn test_image_size() {
        // 100 px per cm.
        assert_eq!(image_size([2, 3], 254.0), (200, 300));
        // 10 cm at 288 dpi: 1133.86 + 0.5
        assert_eq!(image_size([10, 10], 288.0), (1134, 1134));
    }

    #[test]
    fn test_z_color() {
        let fg = ColorRgb::white();
        let bg = ColorRgb::black();
        assert_eq!(z_color(&fg, &bg, 0.0).to_hex(), "#ffffff");
        assert_eq!(z_color(&fg, &bg, 255.0).to_hex(), "#000000");
        assert_eq!(z_color(&fg, &bg, 400.0).to_hex(), "#000000");
        assert_eq!(z_color(&fg, &bg, -3.0).to_hex(), "#ffffff");
        assert_eq!(z_color(&fg, &bg, 100.0).to_hex(), "#9b9b9b");
    }

    #[test]
    fn test_compose_header_and_background() {
        let doc = compose(&[], &options()).unwrap();
        assert_eq!((doc.width, doc.height), (200, 200));
        assert!(doc.text.contains(r#"viewBox="1000 1000 2000 2000""#));
        assert!(doc
            .text
            .contains(r##"<rect x="1000" y="1000" width="2000" height="2000" fill="#000000"/>"##));
        assert!(!doc.text.contains("crispEdges"));
    }

    #[test]
    fn test_compose_flat_cells() {
        let mut colored = square_cell(0.0);
        colored.color = Some(ColorRgb::from_rgb8([1, 2, 3]));
        let mut empty = square_cell(0.0);
        empty.polygon.clear();
        let cells = vec![square_cell(255.0), colored, empty];

        let doc = compose(&cells, &options()).unwrap();
        assert_eq!(doc.text.matches("<path").count(), 2);
        assert!(doc.text.contains(r##"<path fill="#000000" d="M 1200,1200 L 1800,1200"##));
        assert!(doc.text.contains(r##"fill="#010203""##));
    }

    #[test]
    fn test_compose_slanted_gradient() {
        let mut cell = square_cell(0.0);
        cell.polygon[2].z = 200.0;
        cell.is_slanted = true;
        let doc = compose(&[cell], &options()).unwrap();
        assert!(doc
            .text
            .contains(r#"<linearGradient id="grad0" x1="0" y1="0" x2="1" y2="1">"#));
        assert!(doc.text.contains(r##"<stop offset="0" stop-color="#ffffff"/>"##));
        assert!(doc.text.contains(r#"fill="url(#grad0)""#));
    }

    #[test]
    fn test_compose_crisp_edges_and_markers() {
        let mut opts = options();
        opts.crisp_edges = true;
        opts.render_center = true;
        opts.background = Background::None;
        let doc = compose(&[square_cell(0.0)], &opts).unwrap();
        assert!(doc.text.contains(r#"shape-rendering="crispEdges""#));
        assert!(doc
            .text
            .contains(r##"<circle fill="#f00" stroke="none" cx="1500" cy="1500" r="70"/>"##));
        assert!(!doc.text.contains("<rect"));
    }

    #[test]
    fn test_missing_texture_is_io_error() {
        let mut cell = square_cell(0.0);
        cell.texture = Some(CellTexture {
            file: PathBuf::from("does/not/exist.png"),
            rotation: 10,
        });
        let err = compose(&[cell], &options()).unwrap_err();
        assert!(matches!(err, GenerateError::Io(_)));
    }

    #[test]
    fn test_texture_pattern_size() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("stone.png");
        image::RgbImage::new(255, 128).save(&file).unwrap();

        let mut cell = square_cell(0.0);
        cell.texture = Some(CellTexture {
            file: file.clone(),
            rotation: 90,
        });
        let doc = compose(&[cell], &options()).unwrap();
        // (255 - 1) * 1000 / 254 = 1000, (128 - 1) * 1000 / 254 = 500
        assert!(doc
            .text
            .contains(r#"<pattern id="tex0" width="1000" height="500" patternUnits="userSpaceOnUse" patternTransform="rotate(90 500 250)">"#));
        assert!(doc.text.contains(r#"fill="url(#tex0)""#));
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape(r#"a&b<"c">'"#), "a&amp;b&lt;&quot;c&quot;&gt;&apos;");
    }
}
