use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub background: String,
    /// Margin added around the drawing area on every side.
    pub padding: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: "white".to_string(),
            padding: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub theme: Theme,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    line_color: Option<String>,
    line_thickness: Option<u32>,
    text_color: Option<String>,
    diagnostic_color: Option<String>,
    diagnostic_x: Option<f64>,
    diagnostic_y: Option<f64>,
    dash_pattern: Option<Vec<u32>>,
    arrow_head_size: Option<u32>,
    corner_radius: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    width: Option<u32>,
    height: Option<u32>,
    background: Option<String>,
    padding: Option<u32>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = match theme_name {
            "modern" => Theme::modern(),
            "classic" | "default" => Theme::classic(),
            other => return Err(anyhow::anyhow!("Unknown theme: {other}")),
        };
    }

    if let Some(vars) = parsed.theme_variables {
        let theme = &mut config.theme;
        if let Some(v) = vars.font_family {
            theme.font_family = non_blank("fontFamily", v)?;
        }
        if let Some(v) = vars.font_size {
            theme.font_size = v;
        }
        if let Some(v) = vars.line_color {
            theme.line_color = non_blank("lineColor", v)?;
        }
        if let Some(v) = vars.line_thickness {
            theme.line_thickness = positive("lineThickness", v)?;
        }
        if let Some(v) = vars.text_color {
            theme.text_color = non_blank("textColor", v)?;
        }
        if let Some(v) = vars.diagnostic_color {
            theme.diagnostic_color = non_blank("diagnosticColor", v)?;
        }
        if let Some(v) = vars.diagnostic_x {
            theme.diagnostic_position.0 = v;
        }
        if let Some(v) = vars.diagnostic_y {
            theme.diagnostic_position.1 = v;
        }
        if let Some(v) = vars.dash_pattern {
            if v.is_empty() || v.iter().all(|segment| *segment == 0) {
                return Err(anyhow::anyhow!("dashPattern needs a non-zero segment"));
            }
            theme.dash_pattern = v;
        }
        if let Some(v) = vars.arrow_head_size {
            theme.arrow_head_size = positive("arrowHeadSize", v)?;
        }
        if let Some(v) = vars.corner_radius {
            theme.corner_radius = v;
        }
    }

    if let Some(v) = parsed.width {
        config.render.width = v;
    }
    if let Some(v) = parsed.height {
        config.render.height = v;
    }
    if let Some(v) = parsed.background {
        config.render.background = v;
    }
    if let Some(v) = parsed.padding {
        config.render.padding = v;
    }

    Ok(config)
}

// Theme values are every item's fallback; blank or zero ones are refused.
fn non_blank(name: &str, value: String) -> anyhow::Result<String> {
    if value.trim().is_empty() {
        return Err(anyhow::anyhow!("{name} must not be blank"));
    }
    Ok(value)
}

fn positive(name: &str, value: u32) -> anyhow::Result<u32> {
    if value == 0 {
        return Err(anyhow::anyhow!("{name} must be a positive integer"));
    }
    Ok(value)
}
