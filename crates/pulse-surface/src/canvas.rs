//! CPU raster surface backed by an `image::RgbaImage`.

use std::path::Path;

use image::{Rgba, RgbaImage};
use pulse_core::{DrawCommand, Frame, Rgb};

use crate::error::SurfaceError;
use crate::presenter::Presenter;

pub struct RasterCanvas {
    image: RgbaImage,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { image: RgbaImage::new(width, height) }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Opaque colour at `(x, y)`, or `None` off the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        self.image
            .get_pixel_checked(x, y)
            .map(|p| Rgb::new(p[0], p[1], p[2]))
    }

    pub fn clear(&mut self, color: Rgb) {
        let px = Rgba(color.to_rgba8());
        for p in self.image.pixels_mut() {
            *p = px;
        }
    }

    /// Fill every pixel whose centre lies within `radius` of `(x, y)`.
    ///
    /// A disc too small to cover any pixel centre still paints the pixel
    /// containing `(x, y)`. Anything off the canvas is clipped.
    pub fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb) {
        if !(x.is_finite() && y.is_finite() && radius.is_finite()) {
            return;
        }
        let (w, h) = (self.image.width() as i64, self.image.height() as i64);
        if w == 0 || h == 0 {
            return;
        }

        let r = radius.max(0.0);
        let px = Rgba(color.to_rgba8());
        let x0 = ((x - r).floor() as i64).max(0);
        let x1 = ((x + r).ceil() as i64).min(w - 1);
        let y0 = ((y - r).floor() as i64).max(0);
        let y1 = ((y + r).ceil() as i64).min(h - 1);

        let r2 = r * r;
        let mut painted = false;
        for py in y0..=y1 {
            let dy = py as f32 + 0.5 - y;
            for pxi in x0..=x1 {
                let dx = pxi as f32 + 0.5 - x;
                if dx * dx + dy * dy <= r2 {
                    self.image.put_pixel(pxi as u32, py as u32, px);
                    painted = true;
                }
            }
        }

        if !painted {
            let (cx, cy) = (x.floor() as i64, y.floor() as i64);
            if (0..w).contains(&cx) && (0..h).contains(&cy) {
                self.image.put_pixel(cx as u32, cy as u32, px);
            }
        }
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), SurfaceError> {
        self.image
            .save_with_format(path.as_ref(), image::ImageFormat::Png)?;
        Ok(())
    }
}

impl Presenter for RasterCanvas {
    fn present(&mut self, frame: &Frame) -> Result<(), SurfaceError> {
        if self.width() == 0 || self.height() == 0 {
            return Err(SurfaceError::ZeroSize { width: self.width(), height: self.height() });
        }
        for command in frame.draw_commands() {
            match command {
                DrawCommand::Clear(color) => self.clear(color),
                DrawCommand::FillCircle { x, y, radius, color } => self.fill_circle(x, y, radius, color),
            }
        }
        Ok(())
    }

    /// Reallocates the pixel buffer; contents are lost until the next frame.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        if (width, height) != (self.width(), self.height()) {
            self.image = RgbaImage::new(width, height);
        }
        Ok(())
    }
}
