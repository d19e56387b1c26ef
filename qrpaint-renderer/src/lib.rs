//! # qrpaint Renderer
//!
//! Raster compositor for QR module matrices.
//!
//! ## Render pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │             Renderer::render                │
//! ├─────────────────────────┬───────────────────┤
//! │ paint (synchronous)     │ composite_logo    │
//! │ - validate, encode      │ (async, optional) │
//! │ - background fill       │ - fetch + decode  │
//! │ - squares or dots       │ - staleness check │
//! │ - finder overlay        │ - alpha blit      │
//! └─────────────────────────┴───────────────────┘
//! ```
//!
//! The matrix path never suspends; the logo is the only asynchronous layer
//! and always lands on top of an already-complete matrix raster.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logo;
mod paint;
pub mod surface;

pub use error::{RenderError, RenderResult};
pub use logo::LogoLoader;
pub use surface::Surface;

use std::sync::atomic::{AtomicU64, Ordering};

use qrpaint_core::{encode, CellGrid, LogoSettings, ModuleSource, ModuleStyle, RenderConfig};

/// Ticket for a logo scheduled by [`Renderer::paint`].
///
/// Carries the geometry captured at paint time plus a generation stamp; a
/// ticket whose renderer has painted again since is stale and composites
/// nothing.
#[derive(Debug)]
pub struct PendingLogo {
    settings: LogoSettings,
    cors_enabled: bool,
    size: f64,
    margin: f64,
    generation: u64,
}

/// The render entry point.
///
/// Stateless across renders apart from the logo generation counter, so one
/// renderer can serve any number of configs and surfaces.
#[derive(Debug, Default)]
pub struct Renderer {
    loader: LogoLoader,
    generation: AtomicU64,
}

impl Renderer {
    /// Create a renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronously paint the module matrix: validate, encode, reset the
    /// surface, fill the background, and draw every dark module (plus the
    /// finder overlay in dot style).
    ///
    /// Returns a [`PendingLogo`] ticket when the config schedules a logo;
    /// pass it to [`Renderer::composite_logo`] to finish the render.
    ///
    /// # Errors
    ///
    /// Returns a configuration or encoding error before the surface is
    /// touched - a failed paint never leaves a half-drawn raster.
    pub fn paint(
        &self,
        config: &RenderConfig,
        surface: &mut Surface,
    ) -> RenderResult<Option<PendingLogo>> {
        config.validate()?;
        let matrix = encode(&config.payload, config.ec_level)?;

        // Everything fallible is behind us; commit to the surface.
        surface.prepare(config.canvas_size())?;
        surface.fill(config.background);

        let grid = CellGrid::new(config.size, matrix.side());
        match config.style {
            ModuleStyle::Squares => {
                paint::squares(surface, &matrix, grid, config.margin, config.foreground);
            }
            ModuleStyle::Dots => {
                paint::dots(surface, &matrix, grid, config.margin, config.foreground);
            }
        }

        tracing::debug!(
            side = matrix.side(),
            style = ?config.style,
            density = surface.density(),
            "matrix painted"
        );

        match &config.logo {
            Some(settings) if !settings.source.is_empty() => {
                let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(Some(PendingLogo {
                    settings: settings.clone(),
                    cors_enabled: config.cors_enabled,
                    size: config.size,
                    margin: config.margin,
                    generation,
                }))
            }
            _ => Ok(None),
        }
    }

    /// Load and composite a scheduled logo over the painted matrix.
    ///
    /// Best-effort by design: a source that fails to load or decode leaves
    /// the raster as painted and still counts as success - a missing
    /// decorative logo must never invalidate a scannable code. A ticket
    /// superseded by a later paint is discarded the same way.
    ///
    /// # Errors
    ///
    /// Currently never fails; the signature leaves room for callers that
    /// need the compositing step to become fallible.
    pub async fn composite_logo(
        &self,
        pending: PendingLogo,
        surface: &mut Surface,
    ) -> RenderResult<()> {
        let loaded = self
            .loader
            .load(&pending.settings.source, pending.cors_enabled)
            .await;

        let image = match loaded {
            Ok(image) => image,
            Err(err) => {
                tracing::warn!(source = %pending.settings.source, error = %err, "logo skipped");
                return Ok(());
            }
        };

        if self.generation.load(Ordering::SeqCst) != pending.generation {
            tracing::debug!(
                generation = pending.generation,
                "discarding stale logo load"
            );
            return Ok(());
        }

        let (width, height) = pending.settings.resolve_dimensions(pending.size);
        let dx = (pending.size - width) / 2.0 + pending.margin;
        let dy = (pending.size - height) / 2.0 + pending.margin;

        surface.blit(
            &image.to_rgba8(),
            dx,
            dy,
            width,
            height,
            pending.settings.opacity,
        );

        tracing::debug!(width, height, "logo composited");
        Ok(())
    }

    /// Paint the matrix and, if one is configured, composite the logo.
    ///
    /// # Errors
    ///
    /// Propagates configuration and encoding errors from [`Renderer::paint`];
    /// logo failures stay silent.
    pub async fn render(&self, config: &RenderConfig, surface: &mut Surface) -> RenderResult<()> {
        if let Some(pending) = self.paint(config, surface)? {
            self.composite_logo(pending, surface).await?;
        }
        Ok(())
    }
}
