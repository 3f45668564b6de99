use crate::config::RenderConfig;
use crate::geometry::{Point, Rectangle};
use crate::placement::Layout;
use crate::solver::OverlapTarget;
use crate::theme::Theme;
use anyhow::Result;
use std::collections::HashSet;
use std::path::Path;

const ANCHOR_RADIUS: f64 = 3.0;
const MIN_EXTENT: f64 = 1e-6;

/// Maps layout coordinates (y up) onto the canvas (y down).
#[derive(Debug, Clone, Copy)]
struct Viewport {
    origin: Point,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    height: f64,
}

impl Viewport {
    fn fit(bounds: &Rectangle, config: &RenderConfig) -> Self {
        let width = f64::from(config.width);
        let height = f64::from(config.height);
        let padding = f64::from(config.padding);
        let bounds = if bounds.is_empty() {
            Rectangle::centered(Point::new(0.0, 0.0), 1.0, 1.0)
        } else {
            *bounds
        };
        let span_x = bounds.width().max(MIN_EXTENT);
        let span_y = bounds.height().max(MIN_EXTENT);
        let usable_w = (width - 2.0 * padding).max(1.0);
        let usable_h = (height - 2.0 * padding).max(1.0);
        let scale = (usable_w / span_x).min(usable_h / span_y);
        Self {
            origin: bounds.bottom_left,
            scale,
            offset_x: padding + (usable_w - span_x * scale) / 2.0,
            offset_y: padding + (usable_h - span_y * scale) / 2.0,
            height,
        }
    }

    fn point(&self, p: Point) -> (f64, f64) {
        let x = self.offset_x + (p.x - self.origin.x) * self.scale;
        let y = self.height - self.offset_y - (p.y - self.origin.y) * self.scale;
        (x, y)
    }

    /// Top-left corner and size on the canvas.
    fn rect(&self, rect: &Rectangle) -> (f64, f64, f64, f64) {
        let (x, _) = self.point(rect.bottom_left);
        let (_, y) = self.point(rect.top_right);
        (x, y, rect.width() * self.scale, rect.height() * self.scale)
    }
}

/// Draws the layout: keepouts, label boxes with their text, anchors and a
/// tick from each anchor to its label centre. Labels that overlap anything
/// are outlined in the theme's overlap colour.
pub fn render_svg(layout: &Layout, theme: &Theme, config: &RenderConfig) -> String {
    let bounds = layout
        .labels()
        .iter()
        .fold(layout.bounds(), |acc, label| {
            acc.union(&Rectangle::centered(label.optimal(), 0.0, 0.0))
        });
    let view = Viewport::fit(&bounds, config);
    let width = config.width;
    let height = config.height;

    let overlapping: HashSet<usize> = match layout.overlaps() {
        Ok(reports) => reports
            .iter()
            .flat_map(|report| {
                let other = match report.other {
                    OverlapTarget::Label(index) => Some(index),
                    OverlapTarget::Keepout(_) => None,
                };
                std::iter::once(report.label).chain(other)
            })
            .collect(),
        Err(err) => {
            tracing::warn!(error = %err, "cannot measure overlaps, rendering without highlight");
            HashSet::new()
        }
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        config.background
    ));

    for keepout in layout.keepouts() {
        let (x, y, w, h) = view.rect(&keepout.rectangle());
        svg.push_str(&format!(
            "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{w:.2}\" height=\"{h:.2}\" fill=\"{}\" stroke=\"{}\" stroke-dasharray=\"4 3\" stroke-width=\"1\"/>",
            theme.keepout_fill, theme.keepout_border
        ));
    }

    for label in layout.labels() {
        let (ax, ay) = view.point(label.optimal());
        let (cx, cy) = view.point(label.location());
        if label.optimal() != label.location() {
            svg.push_str(&format!(
                "<line x1=\"{ax:.2}\" y1=\"{ay:.2}\" x2=\"{cx:.2}\" y2=\"{cy:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
                theme.anchor_color
            ));
        }
    }

    for (index, label) in layout.labels().iter().enumerate() {
        let (x, y, w, h) = view.rect(&label.rectangle());
        let stroke = if overlapping.contains(&index) {
            &theme.overlap_color
        } else {
            &theme.label_border
        };
        svg.push_str(&format!(
            "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{w:.2}\" height=\"{h:.2}\" rx=\"3\" ry=\"3\" fill=\"{}\" fill-opacity=\"0.85\" stroke=\"{stroke}\" stroke-width=\"1.2\"/>",
            theme.label_fill
        ));
        if !label.text().is_empty() {
            let (cx, cy) = view.point(label.location());
            let font_size = f64::from(theme.font_size).min(h * 0.7).max(1.0);
            svg.push_str(&format!(
                "<text x=\"{cx:.2}\" y=\"{cy:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{font_size:.2}\" fill=\"{}\">{}</text>",
                escape_xml(&theme.font_family),
                theme.label_text_color,
                escape_xml(label.text())
            ));
        }
    }

    for label in layout.labels() {
        let (ax, ay) = view.point(label.optimal());
        svg.push_str(&format!(
            "<circle cx=\"{ax:.2}\" cy=\"{ay:.2}\" r=\"{ANCHOR_RADIUS}\" fill=\"{}\"/>",
            theme.anchor_color
        ));
    }

    svg.push_str("</svg>");
    svg
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    if let Some(family) = theme.font_family.split(',').next() {
        opt.font_family = family.trim().trim_matches('"').to_string();
    }
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid canvas size {}x{}", render_cfg.width, render_cfg.height))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
