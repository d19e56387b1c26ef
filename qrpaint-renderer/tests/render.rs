//! Integration tests for the full render pipeline (qrpaint-renderer).
//!
//! Covers the standard scenario, idempotence, the dot-style finder overlay,
//! logo compositing and its failure modes, and density scaling.

use image::Rgba;

use qrpaint_core::{CellGrid, LogoSettings, ModuleStyle, Rgb, RenderConfig};
use qrpaint_renderer::{Renderer, Surface};

/// 1x1 red pixel, for logo tests that need no filesystem or network.
const RED_PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// The standard scenario: payload "HELLO", EC level M, 125px symbol with a
/// 15px margin - a 21-module version 1 symbol with cell size ~5.95.
fn hello_config(style: ModuleStyle) -> RenderConfig {
    RenderConfig {
        payload: b"HELLO".to_vec(),
        style,
        ..RenderConfig::default()
    }
}

fn paint(config: &RenderConfig, density: f64) -> Surface {
    let mut surface = Surface::new(density).expect("density");
    Renderer::new()
        .paint(config, &mut surface)
        .expect("paint should succeed");
    surface
}

// ==========================================================================
// Square style
// ==========================================================================

#[test]
fn test_scenario_square_render_geometry() {
    let surface = paint(&hello_config(ModuleStyle::Squares), 1.0);

    // 125 + 2 * 15 logical pixels per axis.
    assert_eq!(surface.physical_size(), (155, 155));

    // Module (0,0) is always dark and maps to x=15, y=15, w=6, h=6.
    for (x, y) in [(15, 15), (20, 15), (15, 20), (20, 20)] {
        assert_eq!(surface.pixel(x, y), BLACK, "expected dark at ({x}, {y})");
    }

    // The margin stays background on all four sides.
    for (x, y) in [(0, 0), (14, 14), (77, 7), (7, 77), (154, 154), (148, 77)] {
        assert_eq!(surface.pixel(x, y), WHITE, "expected margin at ({x}, {y})");
    }
}

#[test]
fn test_rendering_is_idempotent() {
    let config = hello_config(ModuleStyle::Squares);
    let first = paint(&config, 1.0);
    let second = paint(&config, 1.0);
    assert_eq!(first.as_image().as_raw(), second.as_image().as_raw());

    let config = hello_config(ModuleStyle::Dots);
    let first = paint(&config, 1.0);
    let second = paint(&config, 1.0);
    assert_eq!(first.as_image().as_raw(), second.as_image().as_raw());
}

#[test]
fn test_repaint_fully_resets_the_surface() {
    let mut surface = Surface::new(1.0).expect("density");
    let renderer = Renderer::new();

    let inverted = RenderConfig {
        foreground: Rgb::WHITE,
        background: Rgb::BLACK,
        ..hello_config(ModuleStyle::Squares)
    };
    renderer.paint(&inverted, &mut surface).expect("paint");
    renderer
        .paint(&hello_config(ModuleStyle::Squares), &mut surface)
        .expect("repaint");

    let fresh = paint(&hello_config(ModuleStyle::Squares), 1.0);
    assert_eq!(surface.as_image().as_raw(), fresh.as_image().as_raw());
}

// ==========================================================================
// Dot style and the finder overlay
// ==========================================================================

#[test]
fn test_dot_style_finder_footprints_match_square_style() {
    let squares = paint(&hello_config(ModuleStyle::Squares), 1.0);
    let dots = paint(&hello_config(ModuleStyle::Dots), 1.0);

    let grid = CellGrid::new(125.0, 21);
    let margin = 15.0;

    // Physical bounds of a 7-module finder footprint starting at module
    // index `first` along one axis.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let bounds = |first: usize| {
        let lo = grid.origin(first) + margin;
        let hi = grid.origin(first + 7) + margin;
        (lo as u32, hi as u32)
    };

    for (row0, col0) in [(0, 0), (0, 14), (14, 0)] {
        let (y0, y1) = bounds(row0);
        let (x0, x1) = bounds(col0);
        for y in y0..y1 {
            for x in x0..x1 {
                assert_eq!(
                    dots.pixel(x, y),
                    squares.pixel(x, y),
                    "finder footprint ({row0},{col0}) differs at ({x}, {y})"
                );
            }
        }
    }
}

#[test]
fn test_dot_style_finder_core_is_solid_not_circular() {
    let surface = paint(&hello_config(ModuleStyle::Dots), 1.0);
    let grid = CellGrid::new(125.0, 21);

    // Module (3,3) sits in the finder core. Its full rectangle must be dark;
    // a 75%-radius circle would leave the corners light.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (x0, y0) = ((grid.origin(3) + 15.0) as u32, (grid.origin(3) + 15.0) as u32);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (w, h) = (grid.extent(3) as u32, grid.extent(3) as u32);

    for y in y0..y0 + h {
        for x in x0..x0 + w {
            assert_eq!(surface.pixel(x, y), BLACK, "core corner missing at ({x}, {y})");
        }
    }
}

#[test]
fn test_dot_style_data_modules_are_under_filled() {
    let surface = paint(&hello_config(ModuleStyle::Dots), 1.0);
    let squares = paint(&hello_config(ModuleStyle::Squares), 1.0);

    // Count dark pixels outside the three finder footprints; dots cover
    // ~44% of a cell, so the dot raster must be strictly lighter there.
    let dark = |s: &Surface| {
        let mut count = 0u32;
        for y in 0..155 {
            for x in 0..155 {
                let in_finder = |v: u32| (15..57).contains(&v);
                let top_left = in_finder(x) && in_finder(y);
                let top_right = (98..140).contains(&x) && in_finder(y);
                let bottom_left = in_finder(x) && (98..140).contains(&y);
                if !(top_left || top_right || bottom_left) && s.pixel(x, y) == BLACK {
                    count += 1;
                }
            }
        }
        count
    };

    assert!(dark(&surface) < dark(&squares));
    assert!(dark(&surface) > 0);
}

// ==========================================================================
// Density scaling
// ==========================================================================

#[test]
fn test_density_scales_physical_but_not_logical_layout() {
    let base = paint(&hello_config(ModuleStyle::Squares), 1.0);

    for density in [2.0, 3.0] {
        let scaled = paint(&hello_config(ModuleStyle::Squares), density);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let expected = (155.0 * density) as u32;
        assert_eq!(scaled.physical_size(), (expected, expected));

        // Sampling at scaled logical coordinates reproduces the density-1
        // raster: module rectangles land on integer logical edges.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let step = density as u32;
        for y in 0..155 {
            for x in 0..155 {
                assert_eq!(
                    scaled.pixel(x * step, y * step),
                    base.pixel(x, y),
                    "logical ({x}, {y}) differs at density {density}"
                );
            }
        }
    }
}

// ==========================================================================
// Logo compositing
// ==========================================================================

fn logo_config(width: Option<f64>, height: Option<f64>) -> RenderConfig {
    let mut logo = LogoSettings::new(format!("data:image/png;base64,{RED_PIXEL_PNG}"));
    logo.width = width;
    logo.height = height;
    RenderConfig {
        logo: Some(logo),
        ..hello_config(ModuleStyle::Squares)
    }
}

#[tokio::test]
async fn test_logo_lands_centered_and_contained() {
    let plain = paint(&hello_config(ModuleStyle::Squares), 1.0);

    let config = logo_config(Some(25.0), Some(25.0));
    let mut surface = Surface::new(1.0).expect("density");
    Renderer::new()
        .render(&config, &mut surface)
        .await
        .expect("render");

    // dx = dy = (125 - 25) / 2 + 15 = 65.
    let changed = |x: u32, y: u32| surface.pixel(x, y) != plain.pixel(x, y);

    assert_eq!(surface.pixel(77, 77), Rgba([255, 0, 0, 255]));
    for y in 0..155 {
        for x in 0..155 {
            let inside = (65..90).contains(&x) && (65..90).contains(&y);
            if !inside {
                assert!(!changed(x, y), "pixel outside the logo box changed at ({x}, {y})");
            }
        }
    }
}

#[tokio::test]
async fn test_single_logo_dimension_makes_a_square() {
    let config = logo_config(Some(45.0), None);
    let mut surface = Surface::new(1.0).expect("density");
    Renderer::new()
        .render(&config, &mut surface)
        .await
        .expect("render");

    // dx = dy = (125 - 45) / 2 + 15 = 55; the 45x45 box is red throughout.
    for (x, y) in [(55, 55), (99, 55), (55, 99), (99, 99), (77, 77)] {
        assert_eq!(surface.pixel(x, y), Rgba([255, 0, 0, 255]));
    }
    // Just outside the box the matrix shows through unchanged.
    let plain = paint(&hello_config(ModuleStyle::Squares), 1.0);
    for (x, y) in [(54, 54), (100, 100), (54, 100), (100, 54)] {
        assert_eq!(surface.pixel(x, y), plain.pixel(x, y));
    }
}

#[tokio::test]
async fn test_failed_logo_load_is_silent() {
    let mut logo = LogoSettings::new("/nonexistent/qrpaint-logo.png");
    logo.width = Some(25.0);
    let config = RenderConfig {
        logo: Some(logo),
        ..hello_config(ModuleStyle::Squares)
    };

    let mut surface = Surface::new(1.0).expect("density");
    Renderer::new()
        .render(&config, &mut surface)
        .await
        .expect("a missing logo must not fail the render");

    let plain = paint(&hello_config(ModuleStyle::Squares), 1.0);
    assert_eq!(surface.as_image().as_raw(), plain.as_image().as_raw());
}

#[tokio::test]
async fn test_empty_logo_source_schedules_nothing() {
    let config = RenderConfig {
        logo: Some(LogoSettings::new("")),
        ..hello_config(ModuleStyle::Squares)
    };

    let mut surface = Surface::new(1.0).expect("density");
    let pending = Renderer::new().paint(&config, &mut surface).expect("paint");
    assert!(pending.is_none());
}

#[tokio::test]
async fn test_superseded_logo_load_is_discarded() {
    let renderer = Renderer::new();
    let config = logo_config(Some(25.0), Some(25.0));

    let mut first = Surface::new(1.0).expect("density");
    let stale = renderer
        .paint(&config, &mut first)
        .expect("paint")
        .expect("ticket");

    let mut second = Surface::new(1.0).expect("density");
    let current = renderer
        .paint(&config, &mut second)
        .expect("paint")
        .expect("ticket");

    // The first ticket was superseded before its load completed.
    renderer
        .composite_logo(stale, &mut first)
        .await
        .expect("stale composite");
    let plain = paint(&hello_config(ModuleStyle::Squares), 1.0);
    assert_eq!(first.as_image().as_raw(), plain.as_image().as_raw());

    // The latest ticket still composites.
    renderer
        .composite_logo(current, &mut second)
        .await
        .expect("composite");
    assert_eq!(second.pixel(77, 77), Rgba([255, 0, 0, 255]));
}

// ==========================================================================
// Failure atomicity
// ==========================================================================

#[test]
fn test_invalid_config_fails_before_touching_the_surface() {
    let config = RenderConfig {
        size: -1.0,
        ..hello_config(ModuleStyle::Squares)
    };

    let mut surface = Surface::new(1.0).expect("density");
    assert!(Renderer::new().paint(&config, &mut surface).is_err());
    assert_eq!(surface.physical_size(), (0, 0));
}

#[test]
fn test_oversized_payload_fails_before_touching_the_surface() {
    let config = RenderConfig {
        payload: vec![b'A'; 4000],
        ..hello_config(ModuleStyle::Squares)
    };

    let mut surface = Surface::new(1.0).expect("density");
    assert!(Renderer::new().paint(&config, &mut surface).is_err());
    assert_eq!(surface.physical_size(), (0, 0));
}

// ==========================================================================
// Export
// ==========================================================================

#[test]
fn test_png_round_trip() {
    let surface = paint(&hello_config(ModuleStyle::Squares), 1.0);
    let bytes = surface.to_png_bytes().expect("png");

    let decoded = image::load_from_memory(&bytes).expect("decode").to_rgba8();
    assert_eq!(&decoded, surface.as_image());
}
