//! The drawing surface the renderer targets.
//!
//! A [`Canvas`] exposes four primitives. Implementations decide what a
//! primitive means: [`crate::svg::SvgCanvas`] writes SVG markup,
//! [`RecordingCanvas`] just remembers the calls.

use std::convert::Infallible;

use serde::Serialize;

use crate::style::{Arrowhead, BoxStyle, EllipseStyle, Stroke};

/// A position in diagram units; origin top-left, y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn from_ints(x: i32, y: i32) -> Self {
        Self {
            x: f64::from(x),
            y: f64::from(y),
        }
    }
}

/// Two opposite corners. Not normalized: `end` may lie above or left of
/// `start` when an item has a negative extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub start: Point,
    pub end: Point,
}

impl Bounds {
    pub fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        let start = Point::from_ints(x, y);
        Self {
            start,
            end: Point::new(start.x + f64::from(width), start.y + f64::from(height)),
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    pub fn min_x(&self) -> f64 {
        self.start.x.min(self.end.x)
    }

    pub fn min_y(&self) -> f64 {
        self.start.y.min(self.end.y)
    }

    pub fn width(&self) -> f64 {
        (self.end.x - self.start.x).abs()
    }

    pub fn height(&self) -> f64 {
        (self.end.y - self.start.y).abs()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Center,
}

pub trait Canvas {
    type Error;

    fn draw_rectangle(&mut self, bounds: Bounds, style: &BoxStyle) -> Result<(), Self::Error>;

    fn draw_ellipse(&mut self, bounds: Bounds, style: &EllipseStyle) -> Result<(), Self::Error>;

    /// Draws a segment from `start` to `end`, with a head at `end` if given.
    fn draw_line(
        &mut self,
        start: Point,
        end: Point,
        stroke: &Stroke,
        arrowhead: Option<Arrowhead>,
    ) -> Result<(), Self::Error>;

    fn draw_text(
        &mut self,
        position: Point,
        text: &str,
        color: &str,
        anchor: TextAnchor,
    ) -> Result<(), Self::Error>;
}

/// One primitive call, as seen by a [`RecordingCanvas`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCall {
    Rectangle {
        bounds: Bounds,
        style: BoxStyle,
    },
    Ellipse {
        bounds: Bounds,
        style: EllipseStyle,
    },
    Line {
        start: Point,
        end: Point,
        stroke: Stroke,
        arrowhead: Option<Arrowhead>,
    },
    Text {
        position: Point,
        text: String,
        color: String,
        anchor: TextAnchor,
    },
}

/// Headless canvas that keeps every call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    pub calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_calls(self) -> Vec<DrawCall> {
        self.calls
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Canvas for RecordingCanvas {
    type Error = Infallible;

    fn draw_rectangle(&mut self, bounds: Bounds, style: &BoxStyle) -> Result<(), Infallible> {
        self.calls.push(DrawCall::Rectangle {
            bounds,
            style: style.clone(),
        });
        Ok(())
    }

    fn draw_ellipse(&mut self, bounds: Bounds, style: &EllipseStyle) -> Result<(), Infallible> {
        self.calls.push(DrawCall::Ellipse {
            bounds,
            style: style.clone(),
        });
        Ok(())
    }

    fn draw_line(
        &mut self,
        start: Point,
        end: Point,
        stroke: &Stroke,
        arrowhead: Option<Arrowhead>,
    ) -> Result<(), Infallible> {
        self.calls.push(DrawCall::Line {
            start,
            end,
            stroke: stroke.clone(),
            arrowhead,
        });
        Ok(())
    }

    fn draw_text(
        &mut self,
        position: Point,
        text: &str,
        color: &str,
        anchor: TextAnchor,
    ) -> Result<(), Infallible> {
        self.calls.push(DrawCall::Text {
            position,
            text: text.to_string(),
            color: color.to_string(),
            anchor,
        });
        Ok(())
    }
}
