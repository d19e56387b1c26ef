//! # qrpaint Core
//!
//! Display-free building blocks for the qrpaint rasterizer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               qrpaint-core                  │
//! ├──────────────────────┬──────────────────────┤
//! │  RenderConfig        │  CellGrid            │
//! │  - colours, margins  │  - module → pixel    │
//! │  - logo settings     │  - finder layout     │
//! ├──────────────────────┼──────────────────────┤
//! │  BitMatrix / encode  │  utf8_expand         │
//! │  - qrcode adapter    │  - payload prep      │
//! └──────────────────────┴──────────────────────┘
//! ```
//!
//! Everything in this crate is pure data and math; pixel pushing lives in
//! `qrpaint-renderer`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod matrix;
pub mod text;

pub use color::Rgb;
pub use config::{EcLevel, LogoSettings, ModuleStyle, RenderConfig};
pub use error::{CoreError, CoreResult};
pub use geometry::{CellGrid, Span, FINDER_SIDE};
pub use matrix::{encode, BitMatrix, ModuleSource};
pub use text::utf8_expand;

/// Core crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
