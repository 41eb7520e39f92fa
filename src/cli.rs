use crate::config::{Config, load_config};
use crate::ir::Drawing;
use crate::parser::parse_drawing_lenient;
use crate::render::{record_calls, render_svg, write_output};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{LevelFilter, debug, info};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "sketchr", version, about = "Render box/ellipse/arrow drawing documents")]
pub struct Args {
    /// Input drawing (.json / .json5) or '-' for stdin
    #[arg(short = 'i', long = "input", conflicts_with = "demo")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and call dumps.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme and themeVariables)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas width, overrides the config file
    #[arg(short = 'w', long = "width")]
    pub width: Option<u32>,

    /// Canvas height, overrides the config file
    #[arg(short = 'H', long = "height")]
    pub height: Option<u32>,

    /// Render the built-in sample drawing instead of reading input
    #[arg(long = "demo")]
    pub demo: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    /// JSON list of the primitive draw calls
    Calls,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logger(&args.log_level);
    debug!(args:?; "Parsed arguments");
    execute(&args)
}

fn init_logger(level: &str) {
    let level = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level)
        .init();
}

pub fn execute(args: &Args) -> Result<()> {
    let config = build_config(args)?;
    let drawing = if args.demo {
        Drawing::sample()
    } else {
        let input = read_input(args.input.as_deref())?;
        parse_drawing_lenient(&input)?
    };
    info!(items = drawing.items.len(); "Drawing loaded");

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&drawing, &config);
            write_output(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg(&drawing, &config);
            write_png(&svg, &output, &config)?;
        }
        OutputFormat::Calls => {
            let calls = record_calls(&drawing, &config.theme);
            let json = serde_json::to_string_pretty(&calls)?;
            write_output(&json, args.output.as_deref())?;
        }
    }
    Ok(())
}

fn build_config(args: &Args) -> Result<Config> {
    let mut config = match args.config.as_deref() {
        Some(path) => load_config(Some(path))
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    Ok(config)
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    crate::render::write_output_png(svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
