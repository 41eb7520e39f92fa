use std::convert::Infallible;

use crate::canvas::{Bounds, Canvas, Point, TextAnchor};
use crate::config::RenderConfig;
use crate::style::{Arrowhead, BoxStyle, EllipseStyle, Stroke};
use crate::theme::Theme;

/// Arrowhead half-width as a fraction of its length.
const HEAD_SPREAD: f64 = 0.4;

/// Canvas that accumulates an SVG document.
///
/// Items are offset by the configured padding so strokes on the diagram edge
/// stay visible. Call [`SvgCanvas::finish`] to close the document.
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    svg: String,
    padding: f64,
    font_family: String,
    font_size: f32,
}

impl SvgCanvas {
    pub fn new(render: &RenderConfig, theme: &Theme) -> Self {
        let padding = f64::from(render.padding);
        let width = f64::from(render.width) + 2.0 * padding;
        let height = f64::from(render.height) + 2.0 * padding;
        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
        ));
        svg.push_str(&format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            escape_xml(&render.background)
        ));
        Self {
            svg,
            padding,
            font_family: theme.font_family.clone(),
            font_size: theme.font_size,
        }
    }

    pub fn finish(mut self) -> String {
        self.svg.push_str("</svg>");
        self.svg
    }

    fn x(&self, x: f64) -> f64 {
        x + self.padding
    }

    fn y(&self, y: f64) -> f64 {
        y + self.padding
    }

    fn push_stroke(&mut self, stroke: &Stroke) {
        self.svg.push_str(&format!(
            " stroke=\"{}\" stroke-width=\"{}\"",
            escape_xml(&stroke.color),
            stroke.width
        ));
    }

    fn push_fill(&mut self, fill: Option<&str>) {
        self.svg.push_str(&format!(
            " fill=\"{}\"",
            fill.map(escape_xml).unwrap_or_else(|| "none".to_string())
        ));
    }

    fn push_arrowhead(&mut self, start: Point, end: Point, stroke: &Stroke, head: Arrowhead) {
        let Some(base) = head_base(start, end, head) else {
            return;
        };
        let (dx, dy) = unit(start, end).unwrap_or((0.0, 0.0));
        let spread = f64::from(head.length) * HEAD_SPREAD + f64::from(stroke.width) / 2.0;
        let left = Point::new(base.x - dy * spread, base.y + dx * spread);
        let right = Point::new(base.x + dy * spread, base.y - dx * spread);
        self.svg.push_str(&format!(
            "<polygon points=\"{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}\" fill=\"{}\"/>",
            self.x(end.x),
            self.y(end.y),
            self.x(left.x),
            self.y(left.y),
            self.x(right.x),
            self.y(right.y),
            escape_xml(&stroke.color)
        ));
    }
}

impl Canvas for SvgCanvas {
    type Error = Infallible;

    fn draw_rectangle(&mut self, bounds: Bounds, style: &BoxStyle) -> Result<(), Infallible> {
        let width = bounds.width();
        let height = bounds.height();
        let radius = f64::from(style.corner_radius).min(width / 2.0).min(height / 2.0);
        self.svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{width:.2}\" height=\"{height:.2}\"",
            self.x(bounds.min_x()),
            self.y(bounds.min_y()),
        ));
        if radius > 0.0 {
            self.svg.push_str(&format!(" rx=\"{radius:.2}\" ry=\"{radius:.2}\""));
        }
        self.push_fill(style.fill.as_deref());
        self.push_stroke(&style.stroke);
        if let Some(dash) = &style.dash {
            let pattern = dash
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            self.svg.push_str(&format!(" stroke-dasharray=\"{pattern}\""));
        }
        self.svg.push_str("/>");
        Ok(())
    }

    fn draw_ellipse(&mut self, bounds: Bounds, style: &EllipseStyle) -> Result<(), Infallible> {
        let center = bounds.center();
        self.svg.push_str(&format!(
            "<ellipse cx=\"{:.2}\" cy=\"{:.2}\" rx=\"{:.2}\" ry=\"{:.2}\"",
            self.x(center.x),
            self.y(center.y),
            bounds.width() / 2.0,
            bounds.height() / 2.0
        ));
        self.push_fill(style.fill.as_deref());
        self.push_stroke(&style.stroke);
        self.svg.push_str("/>");
        Ok(())
    }

    fn draw_line(
        &mut self,
        start: Point,
        end: Point,
        stroke: &Stroke,
        arrowhead: Option<Arrowhead>,
    ) -> Result<(), Infallible> {
        // The shaft stops at the head's base so wide strokes don't poke through the tip.
        let shaft_end = arrowhead
            .and_then(|head| head_base(start, end, head))
            .unwrap_or(end);
        self.svg.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"",
            self.x(start.x),
            self.y(start.y),
            self.x(shaft_end.x),
            self.y(shaft_end.y)
        ));
        self.push_stroke(stroke);
        self.svg.push_str("/>");
        if let Some(head) = arrowhead {
            self.push_arrowhead(start, end, stroke, head);
        }
        Ok(())
    }

    fn draw_text(
        &mut self,
        position: Point,
        text: &str,
        color: &str,
        anchor: TextAnchor,
    ) -> Result<(), Infallible> {
        let anchor = match anchor {
            TextAnchor::Center => "middle",
        };
        self.svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"{anchor}\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            self.x(position.x),
            self.y(position.y),
            escape_xml(&self.font_family),
            self.font_size,
            escape_xml(color),
            escape_xml(text)
        ));
        Ok(())
    }
}

fn unit(start: Point, end: Point) -> Option<(f64, f64)> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let len = dx.hypot(dy);
    if len <= f64::EPSILON {
        return None;
    }
    Some((dx / len, dy / len))
}

/// Where the head meets the shaft. `None` for zero-length segments, which
/// have no direction.
fn head_base(start: Point, end: Point, head: Arrowhead) -> Option<Point> {
    let (dx, dy) = unit(start, end)?;
    let segment = (end.x - start.x).hypot(end.y - start.y);
    let length = f64::from(head.length).min(segment);
    Some(Point::new(end.x - dx * length, end.y - dy * length))
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
