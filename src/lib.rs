//! Validated box/ellipse/arrow drawings and a renderer that turns them into
//! primitive calls on any [`Canvas`].

pub mod canvas;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod parser;
pub mod render;
pub mod style;
pub mod svg;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;

pub use canvas::{Bounds, Canvas, DrawCall, Point, RecordingCanvas, TextAnchor};
pub use config::{Config, RenderConfig};
pub use ir::{ArrowItem, BoxItem, Corners, Drawing, EllipseItem, Item, LineStyle, Style, UnknownText};
pub use parser::{ValidationError, ValidationErrorKind, parse_drawing, parse_drawing_lenient};
pub use render::{record_calls, render_drawing, render_svg};
pub use svg::SvgCanvas;
pub use theme::Theme;

/// Validates a JSON drawing document and renders it to SVG.
pub fn render_json_to_svg(input: &str, config: &Config) -> Result<String, ValidationError> {
    let drawing = parse_drawing(input)?;
    Ok(render_svg(&drawing, config))
}
