use crate::canvas::{Bounds, Canvas, DrawCall, Point, RecordingCanvas, TextAnchor};
use crate::config::Config;
#[cfg(feature = "png")]
use crate::config::RenderConfig;
use crate::ir::{ArrowItem, BoxItem, Drawing, EllipseItem, Item, UnknownText};
use crate::style::{resolve_arrow_style, resolve_box_style, resolve_ellipse_style};
use crate::svg::SvgCanvas;
use crate::theme::Theme;
use anyhow::Result;
use log::{debug, trace};
use std::path::Path;

/// Draws every item of `drawing` onto `canvas`, in order.
///
/// The drawing is assumed valid. The first canvas error stops the pass and is
/// returned as-is; calls issued before it are not undone.
pub fn render_drawing<C: Canvas>(
    drawing: &Drawing,
    canvas: &mut C,
    theme: &Theme,
) -> Result<(), C::Error> {
    debug!(items = drawing.items.len(); "Rendering drawing");
    for (index, item) in drawing.items.iter().enumerate() {
        trace!(index = index, kind = item.kind().as_str(); "Rendering item");
        render_item(item, canvas, theme)?;
    }
    debug!("Drawing rendered");
    Ok(())
}

pub fn render_item<C: Canvas>(item: &Item, canvas: &mut C, theme: &Theme) -> Result<(), C::Error> {
    match item {
        Item::Box(item) => render_box(item, canvas, theme),
        Item::Ellipse(item) => render_ellipse(item, canvas, theme),
        Item::Arrow(item) => render_arrow(item, canvas, theme),
        Item::UnknownText(item) => render_unknown_text(item, canvas, theme),
    }
}

fn render_box<C: Canvas>(item: &BoxItem, canvas: &mut C, theme: &Theme) -> Result<(), C::Error> {
    let bounds = Bounds::from_origin_size(item.x, item.y, item.width, item.height);
    let style = resolve_box_style(item.style.as_ref(), theme);
    canvas.draw_rectangle(bounds, &style)?;
    render_label(item.text.as_deref(), bounds, canvas, theme)
}

fn render_ellipse<C: Canvas>(
    item: &EllipseItem,
    canvas: &mut C,
    theme: &Theme,
) -> Result<(), C::Error> {
    let bounds = Bounds::from_origin_size(item.x, item.y, item.width, item.height);
    let style = resolve_ellipse_style(item.style.as_ref(), theme);
    canvas.draw_ellipse(bounds, &style)?;
    render_label(item.text.as_deref(), bounds, canvas, theme)
}

fn render_arrow<C: Canvas>(item: &ArrowItem, canvas: &mut C, theme: &Theme) -> Result<(), C::Error> {
    let style = resolve_arrow_style(item.style.as_ref(), item.head_size, theme);
    canvas.draw_line(
        Point::from_ints(item.start_x, item.start_y),
        Point::from_ints(item.end_x, item.end_y),
        &style.stroke,
        Some(style.head),
    )
}

fn render_unknown_text<C: Canvas>(
    item: &UnknownText,
    canvas: &mut C,
    theme: &Theme,
) -> Result<(), C::Error> {
    let (x, y) = theme.diagnostic_position;
    canvas.draw_text(
        Point::new(x, y),
        &item.text,
        &theme.diagnostic_color,
        TextAnchor::Center,
    )
}

// Labels use the theme text color regardless of the shape's own style.
fn render_label<C: Canvas>(
    text: Option<&str>,
    bounds: Bounds,
    canvas: &mut C,
    theme: &Theme,
) -> Result<(), C::Error> {
    match text {
        Some(text) if !text.is_empty() => {
            canvas.draw_text(bounds.center(), text, &theme.text_color, TextAnchor::Center)
        }
        _ => Ok(()),
    }
}

pub fn render_svg(drawing: &Drawing, config: &Config) -> String {
    let mut canvas = SvgCanvas::new(&config.render, &config.theme);
    render_drawing(drawing, &mut canvas, &config.theme).unwrap_or_else(|never| match never {});
    canvas.finish()
}

/// The primitive calls `drawing` produces, in issue order.
pub fn record_calls(drawing: &Drawing, theme: &Theme) -> Vec<DrawCall> {
    let mut canvas = RecordingCanvas::new();
    render_drawing(drawing, &mut canvas, theme).unwrap_or_else(|never| match never {});
    canvas.into_calls()
}

/// Writes `contents` to `output`, or to stdout when no path is given.
pub fn write_output(contents: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, contents)?;
        }
        None => {
            print!("{}", contents);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    let default_size = usvg::Size::from_wh(render_cfg.width as f32, render_cfg.height as f32)
        .ok_or_else(|| anyhow::anyhow!("Invalid canvas size"))?;
    opt.default_size = default_size;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    debug!(path:? = output; "PNG written");
    Ok(())
}
