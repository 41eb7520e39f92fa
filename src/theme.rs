use serde::{Deserialize, Serialize};

/// Renderer defaults applied wherever an item's style leaves a field unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub line_color: String,
    pub line_thickness: u32,
    pub text_color: String,
    pub diagnostic_color: String,
    pub diagnostic_position: (f64, f64),
    pub dash_pattern: Vec<u32>,
    pub arrow_head_size: u32,
    pub corner_radius: u32,
}

impl Theme {
    /// Black one-pixel outlines, black labels and red diagnostics.
    pub fn classic() -> Self {
        Self {
            font_family: "Helvetica, Arial, sans-serif".to_string(),
            font_size: 12.0,
            line_color: "black".to_string(),
            line_thickness: 1,
            text_color: "black".to_string(),
            diagnostic_color: "red".to_string(),
            diagnostic_position: (100.0, 500.0),
            dash_pattern: vec![4, 4],
            arrow_head_size: 10,
            corner_radius: 8,
        }
    }

    /// Softer palette for documentation output. Diagnostics stay red.
    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            line_color: "#1C2430".to_string(),
            text_color: "#1C2430".to_string(),
            ..Self::classic()
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
