use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use log::info;

use super::ImageRenderer;
use crate::config::{ImageFormat, RenderConfig};
use crate::navigation::Coord;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
const FILE_STEM: &str = "route";

const MARGIN: f64 = 80.0;
const MARKER_RADIUS: i64 = 7;
const LINE_HALF_WIDTH: i64 = 2;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const ROUTE: Rgb<u8> = Rgb([31, 119, 180]);
const START: Rgb<u8> = Rgb([44, 160, 44]);
const FINISH: Rgb<u8> = Rgb([214, 39, 40]);

/// Writes the route layout as `route.svg` or `route.png`.
///
/// SVG output carries the point labels as text. PNG output only draws the
/// segments and markers (start green, finish red).
#[derive(Debug, Clone)]
pub struct RouteImageRenderer {
    pub format: ImageFormat,
    pub output_dir: PathBuf,
    /// File written inside `output_dir`.
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub display: bool,
}

impl RouteImageRenderer {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            format: config.format,
            output_dir: config
                .output_dir
                .clone()
                .unwrap_or_else(std::env::temp_dir),
            file_name: default_file_name(config.format),
            width: config.width.unwrap_or(DEFAULT_WIDTH),
            height: config.height.unwrap_or(DEFAULT_HEIGHT),
            display: config.display.unwrap_or(true),
        }
    }

    /// Write to an explicit file instead, picking the format from its extension.
    pub fn with_file(mut self, path: &Path) -> Result<Self> {
        self.format = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => ImageFormat::Svg,
            Some(ext) if ext.eq_ignore_ascii_case("png") => ImageFormat::Png,
            _ => anyhow::bail!(
                "Unsupported image file: {}. Use a .svg or .png extension.",
                path.display()
            ),
        };
        self.output_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        self.file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| default_file_name(self.format));
        Ok(self)
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.file_name)
    }
}

/// `route.svg` or `route.png`.
pub fn default_file_name(format: ImageFormat) -> String {
    format!("{FILE_STEM}.{}", format.extension())
}

impl ImageRenderer for RouteImageRenderer {
    fn render(&self, coordinates: &[Coord], labels: &[String]) -> Result<PathBuf> {
        if coordinates.is_empty() {
            anyhow::bail!("Nothing to draw: route has no points");
        }
        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))?;

        let path = self.output_path();
        match self.format {
            ImageFormat::Svg => {
                let svg = to_svg(coordinates, labels, self.width, self.height);
                std::fs::write(&path, svg)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            ImageFormat::Png => {
                if labels.iter().any(|l| !l.is_empty()) {
                    info!("PNG route images carry no labels; use render.format svg to keep them");
                }
                to_png(coordinates, self.width, self.height)
                    .save_with_format(&path, image::ImageFormat::Png)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
        }
        info!("Route image written to {}", path.display());

        if self.display {
            super::show(&path);
        }
        Ok(path)
    }
}

/// Maps layout coordinates onto the canvas, y pointing up.
struct Projection {
    min_x: i32,
    min_y: i32,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    height: f64,
}

impl Projection {
    fn fit(coordinates: &[Coord], width: u32, height: u32) -> Self {
        let min_x = coordinates.iter().map(|c| c.x).min().unwrap_or(0);
        let max_x = coordinates.iter().map(|c| c.x).max().unwrap_or(0);
        let min_y = coordinates.iter().map(|c| c.y).min().unwrap_or(0);
        let max_y = coordinates.iter().map(|c| c.y).max().unwrap_or(0);

        let span_x = f64::from(max_x - min_x);
        let span_y = f64::from(max_y - min_y);
        let usable_w = (f64::from(width) - 2.0 * MARGIN).max(1.0);
        let usable_h = (f64::from(height) - 2.0 * MARGIN).max(1.0);
        let scale = (usable_w / span_x.max(1.0)).min(usable_h / span_y.max(1.0));

        // Center the drawing inside the margins.
        let offset_x = MARGIN + (usable_w - span_x * scale) / 2.0;
        let offset_y = MARGIN + (usable_h - span_y * scale) / 2.0;

        Self {
            min_x,
            min_y,
            scale,
            offset_x,
            offset_y,
            height: f64::from(height),
        }
    }

    fn project(&self, c: Coord) -> (f64, f64) {
        let x = self.offset_x + f64::from(c.x - self.min_x) * self.scale;
        let y = self.height - (self.offset_y + f64::from(c.y - self.min_y) * self.scale);
        (x, y)
    }
}

/// Render the route as an SVG document.
pub fn to_svg(coordinates: &[Coord], labels: &[String], width: u32, height: u32) -> String {
    let projection = Projection::fit(coordinates, width, height);
    let points: Vec<(f64, f64)> = coordinates.iter().map(|&c| projection.project(c)).collect();

    let mut svg = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="white"/>"#);

    let polyline = points
        .iter()
        .map(|(x, y)| format!("{x:.1},{y:.1}"))
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(
        svg,
        r##"  <polyline points="{polyline}" fill="none" stroke="#1f77b4" stroke-width="3"/>"##
    );

    let last = points.len().saturating_sub(1);
    for (i, (x, y)) in points.iter().enumerate() {
        let fill = match i {
            0 => "#2ca02c",
            _ if i == last => "#d62728",
            _ => "#1f77b4",
        };
        let _ = writeln!(
            svg,
            r#"  <circle cx="{x:.1}" cy="{y:.1}" r="{MARKER_RADIUS}" fill="{fill}"/>"#
        );

        let Some(label) = labels.get(i) else {
            continue;
        };
        let lines: Vec<&str> = label.lines().collect();
        // Lift multi-line labels so the last line sits just above the marker.
        let top = y - 12.0 - 16.0 * (lines.len().saturating_sub(1)) as f64;
        let _ = write!(
            svg,
            r#"  <text x="{x:.1}" y="{top:.1}" text-anchor="middle" font-family="sans-serif" font-size="14">"#
        );
        for (n, line) in lines.iter().enumerate() {
            let dy = if n == 0 { 0 } else { 16 };
            let _ = write!(
                svg,
                r#"<tspan x="{x:.1}" dy="{dy}">{}</tspan>"#,
                escape_xml(line)
            );
        }
        let _ = writeln!(svg, "</text>");
    }

    svg.push_str("</svg>\n");
    svg
}

/// Render the route as a raster image.
pub fn to_png(coordinates: &[Coord], width: u32, height: u32) -> RgbImage {
    let projection = Projection::fit(coordinates, width, height);
    let points: Vec<(f64, f64)> = coordinates.iter().map(|&c| projection.project(c)).collect();
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);

    for pair in points.windows(2) {
        draw_segment(&mut img, pair[0], pair[1], ROUTE);
    }

    let last = points.len().saturating_sub(1);
    for (i, &point) in points.iter().enumerate() {
        let color = match i {
            0 => START,
            _ if i == last => FINISH,
            _ => ROUTE,
        };
        fill_disc(&mut img, point, MARKER_RADIUS, color);
    }
    img
}

fn draw_segment(img: &mut RgbImage, from: (f64, f64), to: (f64, f64), color: Rgb<u8>) {
    let steps = (to.0 - from.0).abs().max((to.1 - from.1).abs()).ceil().max(1.0) as i64;
    for s in 0..=steps {
        let t = s as f64 / steps as f64;
        let x = from.0 + (to.0 - from.0) * t;
        let y = from.1 + (to.1 - from.1) * t;
        fill_square(img, (x, y), LINE_HALF_WIDTH, color);
    }
}

fn fill_square(img: &mut RgbImage, (cx, cy): (f64, f64), half: i64, color: Rgb<u8>) {
    let (cx, cy) = (cx.round() as i64, cy.round() as i64);
    for dy in -half..=half {
        for dx in -half..=half {
            put(img, cx + dx, cy + dy, color);
        }
    }
}

fn fill_disc(img: &mut RgbImage, (cx, cy): (f64, f64), radius: i64, color: Rgb<u8>) {
    let (cx, cy) = (cx.round() as i64, cy.round() as i64);
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                put(img, cx + dx, cy + dy, color);
            }
        }
    }
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u64) < u64::from(img.width()) && (y as u64) < u64::from(img.height())
    {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
