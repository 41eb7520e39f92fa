//! Resolution of partial [`Style`]s into concrete drawing parameters.
//!
//! Each item kind has its own resolver so the defaults live in one place.
//! Dash patterns are only honored for boxes; ellipses and arrows always draw
//! solid lines.

use serde::Serialize;

use crate::ir::{Corners, LineStyle, Style};
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stroke {
    pub color: String,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoxStyle {
    pub stroke: Stroke,
    /// Alternating on/off segment lengths; `None` draws a solid outline.
    pub dash: Option<Vec<u32>>,
    pub fill: Option<String>,
    /// Zero for sharp corners.
    pub corner_radius: u32,
}

impl BoxStyle {
    pub fn is_dashed(&self) -> bool {
        self.dash.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EllipseStyle {
    pub stroke: Stroke,
    pub fill: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Arrowhead {
    /// Distance from the tip to the base of the head.
    pub length: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrowStyle {
    pub stroke: Stroke,
    pub head: Arrowhead,
}

pub fn resolve_box_style(style: Option<&Style>, theme: &Theme) -> BoxStyle {
    let dash = match style.and_then(|s| s.line_style) {
        Some(LineStyle::Dashed) => Some(theme.dash_pattern.clone()),
        Some(LineStyle::Solid | LineStyle::Dotted) | None => None,
    };
    let corner_radius = match style.and_then(|s| s.corners) {
        Some(Corners::Rounded) => theme.corner_radius,
        Some(Corners::Sharp) | None => 0,
    };
    BoxStyle {
        stroke: resolve_stroke(style, theme),
        dash,
        fill: resolve_fill(style),
        corner_radius,
    }
}

pub fn resolve_ellipse_style(style: Option<&Style>, theme: &Theme) -> EllipseStyle {
    EllipseStyle {
        stroke: resolve_stroke(style, theme),
        fill: resolve_fill(style),
    }
}

pub fn resolve_arrow_style(
    style: Option<&Style>,
    head_size: Option<u32>,
    theme: &Theme,
) -> ArrowStyle {
    ArrowStyle {
        stroke: resolve_stroke(style, theme),
        head: Arrowhead {
            length: head_size.unwrap_or(theme.arrow_head_size),
        },
    }
}

fn resolve_stroke(style: Option<&Style>, theme: &Theme) -> Stroke {
    let color = style
        .and_then(|s| non_blank(s.line_color.as_deref()))
        .unwrap_or(theme.line_color.as_str());
    let width = style
        .and_then(|s| s.line_thickness)
        .filter(|width| *width > 0)
        .unwrap_or(theme.line_thickness);
    Stroke {
        color: color.to_string(),
        width,
    }
}

fn resolve_fill(style: Option<&Style>) -> Option<String> {
    style
        .and_then(|s| non_blank(s.fill_color.as_deref()))
        .map(str::to_string)
}

// Blank color strings count as unset.
fn non_blank(color: Option<&str>) -> Option<&str> {
    color.map(str::trim).filter(|color| !color.is_empty())
}
