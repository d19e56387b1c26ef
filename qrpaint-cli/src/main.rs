//! # qrpaint CLI
//!
//! Command-line embedding host: builds a [`RenderConfig`] from flags or a
//! JSON file, renders it, and writes the raster as PNG.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use qrpaint_core::{utf8_expand, EcLevel, LogoSettings, ModuleStyle, Rgb, RenderConfig};
use qrpaint_renderer::{Renderer, Surface};

/// Error-correction level flag.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum EcLevelArg {
    L,
    M,
    Q,
    H,
}

impl From<EcLevelArg> for EcLevel {
    fn from(level: EcLevelArg) -> Self {
        match level {
            EcLevelArg::L => Self::L,
            EcLevelArg::M => Self::M,
            EcLevelArg::Q => Self::Q,
            EcLevelArg::H => Self::H,
        }
    }
}

/// Module style flag.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum StyleArg {
    Squares,
    Dots,
}

impl From<StyleArg> for ModuleStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Squares => Self::Squares,
            StyleArg::Dots => Self::Dots,
        }
    }
}

/// Render a QR symbol to a PNG file.
#[derive(Debug, Parser)]
#[command(name = "qrpaint", version, about)]
struct Cli {
    /// Text payload, expanded to UTF-8 bytes before encoding. Overrides the
    /// payload of `--config` when both are given.
    text: Option<String>,

    /// JSON render config file; flags below are ignored when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Error-correction level.
    #[arg(long, value_enum, default_value = "m")]
    ec_level: EcLevelArg,

    /// Drawn side length in logical pixels, excluding margin.
    #[arg(long, default_value_t = 125.0)]
    size: f64,

    /// Quiet border in logical pixels.
    #[arg(long, default_value_t = 15.0)]
    margin: f64,

    /// Module painting style.
    #[arg(long, value_enum, default_value = "squares")]
    style: StyleArg,

    /// Dark-module colour as a hex literal.
    #[arg(long, default_value = "#000000")]
    foreground: String,

    /// Background colour as a hex literal.
    #[arg(long, default_value = "#FFFFFF")]
    background: String,

    /// Logo source: a file path, an http(s) URL, or a data: URI.
    #[arg(long)]
    logo: Option<String>,

    /// Logo opacity in [0, 1].
    #[arg(long, default_value_t = 1.0)]
    logo_opacity: f32,

    /// Logo width in logical pixels.
    #[arg(long)]
    logo_width: Option<f64>,

    /// Logo height in logical pixels.
    #[arg(long)]
    logo_height: Option<f64>,

    /// Request anonymous cross-origin mode for remote logos.
    #[arg(long)]
    cors: bool,

    /// Physical-to-logical pixel ratio of the target display.
    #[arg(long, default_value_t = 1.0, env = "QRPAINT_DENSITY")]
    density: f64,

    /// Output PNG path.
    #[arg(short, long, default_value = "qr.png")]
    out: PathBuf,
}

/// Initialize structured tracing.
///
/// Set `RUST_LOG` to control log levels (default: info). Set
/// `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Resolve the render config from flags or a JSON file.
fn build_config(cli: &Cli) -> anyhow::Result<RenderConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => RenderConfig {
            ec_level: cli.ec_level.into(),
            size: cli.size,
            margin: cli.margin,
            style: cli.style.into(),
            foreground: Rgb::from_hex(&cli.foreground)?,
            background: Rgb::from_hex(&cli.background)?,
            logo: cli.logo.as_ref().map(|source| {
                let mut logo = LogoSettings::new(source);
                logo.opacity = cli.logo_opacity;
                logo.width = cli.logo_width;
                logo.height = cli.logo_height;
                logo
            }),
            cors_enabled: cli.cors,
            ..RenderConfig::default()
        },
    };

    if let Some(text) = &cli.text {
        config.payload = utf8_expand(text);
    }
    anyhow::ensure!(
        !config.payload.is_empty(),
        "payload is empty; pass TEXT or a config file with payload bytes"
    );

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let mut surface = Surface::new(cli.density)?;
    Renderer::new().render(&config, &mut surface).await?;
    surface.save_png(&cli.out)?;

    let (width, height) = surface.physical_size();
    tracing::info!(path = %cli.out.display(), width, height, "raster written");

    Ok(())
}
