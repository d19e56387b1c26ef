//! The owned raster surface.
//!
//! A [`Surface`] wraps an RGBA buffer whose physical dimensions are the
//! logical canvas size multiplied by an explicit pixel density. Density is
//! injected at construction rather than read from any display environment,
//! and every drawing operation takes logical coordinates, so the geometry
//! math upstream never has to know what display it is aimed at.

use std::path::Path;

use image::{imageops, Rgba, RgbaImage};

use qrpaint_core::Rgb;

use crate::error::{RenderError, RenderResult};

/// An owned RGBA raster addressed in logical pixels.
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: RgbaImage,
    density: f64,
    logical_side: f64,
}

impl Surface {
    /// Create an empty surface for a display with the given
    /// physical-to-logical pixel ratio. Use `1.0` when the ratio is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Surface`] for a non-positive or non-finite
    /// density.
    pub fn new(density: f64) -> RenderResult<Self> {
        if !density.is_finite() || density <= 0.0 {
            return Err(RenderError::Surface(format!(
                "pixel density must be a positive finite number, got {density}"
            )));
        }
        Ok(Self {
            pixels: RgbaImage::new(0, 0),
            density,
            logical_side: 0.0,
        })
    }

    /// The physical-to-logical pixel ratio.
    #[must_use]
    pub fn density(&self) -> f64 {
        self.density
    }

    /// Logical side length set by the last [`Surface::prepare`].
    #[must_use]
    pub fn logical_side(&self) -> f64 {
        self.logical_side
    }

    /// Physical buffer dimensions in pixels.
    #[must_use]
    pub fn physical_size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Reallocate the buffer for a square canvas of `logical_side` logical
    /// pixels. Discards all previous content; a re-render never diffs.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Surface`] for a non-positive or non-finite
    /// side.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn prepare(&mut self, logical_side: f64) -> RenderResult<()> {
        if !logical_side.is_finite() || logical_side <= 0.0 {
            return Err(RenderError::Surface(format!(
                "canvas side must be a positive finite number, got {logical_side}"
            )));
        }
        let physical = (logical_side * self.density).round() as u32;
        self.pixels = RgbaImage::new(physical, physical);
        self.logical_side = logical_side;
        Ok(())
    }

    /// Fill the whole surface with one colour.
    pub fn fill(&mut self, color: Rgb) {
        let pixel = opaque(color);
        for p in self.pixels.pixels_mut() {
            *p = pixel;
        }
    }

    /// Fill an axis-aligned rectangle given in logical pixels.
    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb) {
        let (x0, x1) = self.axis_range(x, width, self.pixels.width());
        let (y0, y1) = self.axis_range(y, height, self.pixels.height());
        let pixel = opaque(color);
        for py in y0..y1 {
            for px in x0..x1 {
                self.pixels.put_pixel(px, py, pixel);
            }
        }
    }

    /// Fill a circle centered at `(cx, cy)` logical pixels.
    ///
    /// A physical pixel is inside when its center lies within the radius,
    /// which keeps the raster identical across runs.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgb) {
        if radius <= 0.0 {
            return;
        }
        let (pcx, pcy, pr) = (cx * self.density, cy * self.density, radius * self.density);
        let (w, h) = self.pixels.dimensions();

        let x0 = (pcx - pr).floor().clamp(0.0, f64::from(w)) as u32;
        let x1 = (pcx + pr).ceil().clamp(0.0, f64::from(w)) as u32;
        let y0 = (pcy - pr).floor().clamp(0.0, f64::from(h)) as u32;
        let y1 = (pcy + pr).ceil().clamp(0.0, f64::from(h)) as u32;

        let pixel = opaque(color);
        let rr = pr * pr;
        for py in y0..y1 {
            for px in x0..x1 {
                let dx = (f64::from(px) + 0.5) - pcx;
                let dy = (f64::from(py) + 0.5) - pcy;
                if dx * dx + dy * dy <= rr {
                    self.pixels.put_pixel(px, py, pixel);
                }
            }
        }
    }

    /// Draw `source` scaled to `width x height` logical pixels at `(x, y)`,
    /// blended with the given global alpha.
    ///
    /// The alpha is a parameter of this one call; no blend state outlives it.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn blit(
        &mut self,
        source: &RgbaImage,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        opacity: f32,
    ) {
        let (x0, x1) = self.axis_range(x, width, self.pixels.width());
        let (y0, y1) = self.axis_range(y, height, self.pixels.height());
        if x1 <= x0 || y1 <= y0 || source.width() == 0 || source.height() == 0 {
            return;
        }

        let scaled = imageops::resize(source, x1 - x0, y1 - y0, imageops::FilterType::Lanczos3);
        let opacity = opacity.clamp(0.0, 1.0);

        for (sx, sy, src) in scaled.enumerate_pixels() {
            let alpha = f32::from(src[3]) / 255.0 * opacity;
            if alpha <= 0.0 {
                continue;
            }
            let dst = self.pixels.get_pixel_mut(x0 + sx, y0 + sy);
            for c in 0..3 {
                let blended = f32::from(src[c]) * alpha + f32::from(dst[c]) * (1.0 - alpha);
                dst[c] = blended.round().clamp(0.0, 255.0) as u8;
            }
            dst[3] = 255;
        }
    }

    /// Read one physical pixel.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.pixels.get_pixel(x, y)
    }

    /// Borrow the underlying RGBA buffer.
    #[must_use]
    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Take the underlying RGBA buffer.
    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Write the raster as a PNG file.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Export`] when encoding or writing fails.
    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        self.pixels
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| RenderError::Export(e.to_string()))
    }

    /// Encode the raster as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Export`] when encoding fails.
    pub fn to_png_bytes(&self) -> RenderResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.pixels
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .map_err(|e| RenderError::Export(e.to_string()))?;
        Ok(bytes)
    }

    /// Convert a logical interval to a clamped physical pixel range.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn axis_range(&self, start: f64, extent: f64, limit: u32) -> (u32, u32) {
        let lo = (start * self.density).round().clamp(0.0, f64::from(limit)) as u32;
        let hi = ((start + extent) * self.density)
            .round()
            .clamp(0.0, f64::from(limit)) as u32;
        (lo, hi.max(lo))
    }
}

fn opaque(color: Rgb) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, 255])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_scales_physical_dimensions() {
        let mut surface = Surface::new(2.0).unwrap();
        surface.prepare(155.0).unwrap();
        assert_eq!(surface.physical_size(), (310, 310));
        assert!((surface.logical_side() - 155.0).abs() < f64::EPSILON);

        let mut surface = Surface::new(1.5).unwrap();
        surface.prepare(100.0).unwrap();
        assert_eq!(surface.physical_size(), (150, 150));
    }

    #[test]
    fn test_rejects_degenerate_density_and_side() {
        assert!(Surface::new(0.0).is_err());
        assert!(Surface::new(-1.0).is_err());
        assert!(Surface::new(f64::NAN).is_err());

        let mut surface = Surface::new(1.0).unwrap();
        assert!(surface.prepare(0.0).is_err());
        assert!(surface.prepare(f64::INFINITY).is_err());
    }

    #[test]
    fn test_prepare_discards_previous_content() {
        let mut surface = Surface::new(1.0).unwrap();
        surface.prepare(10.0).unwrap();
        surface.fill(Rgb::BLACK);
        surface.prepare(10.0).unwrap();
        assert_eq!(surface.pixel(5, 5), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_fill_rect_is_clamped_to_the_buffer() {
        let mut surface = Surface::new(1.0).unwrap();
        surface.prepare(10.0).unwrap();
        surface.fill(Rgb::WHITE);
        surface.fill_rect(-5.0, -5.0, 100.0, 3.0, Rgb::BLACK);

        assert_eq!(surface.pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(surface.pixel(9, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(surface.pixel(0, 9), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_fill_circle_stays_inside_its_bounding_box() {
        let mut surface = Surface::new(1.0).unwrap();
        surface.prepare(20.0).unwrap();
        surface.fill(Rgb::WHITE);
        surface.fill_circle(10.0, 10.0, 4.0, Rgb::BLACK);

        assert_eq!(surface.pixel(10, 10), Rgba([0, 0, 0, 255]));
        for (x, y) in [(3, 3), (16, 16), (3, 16), (16, 3)] {
            assert_eq!(surface.pixel(x, y), Rgba([255, 255, 255, 255]));
        }
    }

    #[test]
    fn test_blit_respects_global_alpha() {
        let mut surface = Surface::new(1.0).unwrap();
        surface.prepare(4.0).unwrap();
        surface.fill(Rgb::WHITE);

        let stamp = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        surface.blit(&stamp, 0.0, 0.0, 2.0, 2.0, 0.5);

        let blended = surface.pixel(0, 0);
        assert_eq!(blended[0], 128);
        assert_eq!(blended[3], 255);
        // Pixels outside the destination rectangle stay untouched.
        assert_eq!(surface.pixel(3, 3), Rgba([255, 255, 255, 255]));
    }
}
