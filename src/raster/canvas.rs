//! Pixel buffers: the oversampled working canvas and the final RGB canvas

use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::config::Rgb;
use crate::error::{Result, SignatureError};

#[cfg(test)]
thread_local! {
    static LIVE_WORKING_CANVASES: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Number of working canvases alive on this thread
#[cfg(test)]
pub(crate) fn live_working_canvases() -> usize {
    LIVE_WORKING_CANVASES.with(|c| c.get())
}

/// Oversampled drawing surface, filled with the background on creation
///
/// Only `rasterize` holds one, and it is dropped before the final canvas is
/// handed back.
pub struct WorkingCanvas {
    pixmap: Pixmap,
}

impl WorkingCanvas {
    pub fn new(width: u32, height: u32, background: Rgb) -> Result<Self> {
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            SignatureError::render(format!(
                "cannot allocate a {}x{} working canvas",
                width, height
            ))
        })?;
        pixmap.fill(Color::from_rgba8(background.r, background.g, background.b, 255));

        #[cfg(test)]
        LIVE_WORKING_CANVASES.with(|c| c.set(c.get() + 1));

        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Colour at (x, y), or None outside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        let p = self.pixmap.pixel(x, y)?;
        Some(Rgb::new(p.red(), p.green(), p.blue()))
    }

    /// Channel rows as stored; every pixel is opaque
    pub(crate) fn pixels(&self) -> &[tiny_skia::PremultipliedColorU8] {
        self.pixmap.pixels()
    }

    /// Fill a closed polygon with a solid colour, without anti-aliasing
    ///
    /// Returns false when the outline encloses nothing and was skipped.
    pub fn fill_polygon(&mut self, points: &[(f32, f32)], colour: Rgb) -> bool {
        let Some((&(x0, y0), rest)) = points.split_first() else {
            return false;
        };

        let mut pb = PathBuilder::new();
        pb.move_to(x0, y0);
        for &(x, y) in rest {
            pb.line_to(x, y);
        }
        pb.close();
        let Some(path) = pb.finish() else {
            return false;
        };

        self.pixmap.fill_path(
            &path,
            &solid_paint(colour),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
        true
    }

    /// Fill the one-pixel-wide run from `a` to `b`, both ends included
    ///
    /// Outlines that collapse to a line or a point still cover these pixels.
    pub fn fill_line(&mut self, a: (f32, f32), b: (f32, f32), colour: Rgb) -> bool {
        let paint = solid_paint(colour);
        if a.0 == b.0 || a.1 == b.1 {
            let Some(rect) = Rect::from_ltrb(
                a.0.min(b.0),
                a.1.min(b.1),
                a.0.max(b.0) + 1.0,
                a.1.max(b.1) + 1.0,
            ) else {
                return false;
            };
            self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
            return true;
        }

        let mut pb = PathBuilder::new();
        pb.move_to(a.0, a.1);
        pb.line_to(b.0, b.1);
        let Some(path) = pb.finish() else {
            return false;
        };
        // Zero width strokes as a hairline
        let stroke = Stroke {
            width: 0.0,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        true
    }
}

fn solid_paint(colour: Rgb) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(colour.r, colour.g, colour.b, 255);
    paint.anti_alias = false;
    paint
}

#[cfg(test)]
impl Drop for WorkingCanvas {
    fn drop(&mut self) {
        LIVE_WORKING_CANVASES.with(|c| c.set(c.get() - 1));
    }
}

/// Final truecolor image, three bytes per pixel in row-major order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    /// Allocate a canvas filled with `fill`
    pub fn new(width: u32, height: u32, fill: Rgb) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SignatureError::render(format!(
                "cannot allocate a {}x{} canvas",
                width, height
            )));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| {
                SignatureError::render(format!("{}x{} canvas is too large", width, height))
            })?;

        let mut data = Vec::with_capacity(len);
        for _ in 0..(len / 3) {
            data.extend_from_slice(&fill.to_array());
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGB bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 3)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        let i = self.offset(x, y)?;
        Some(Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, colour: Rgb) {
        if let Some(i) = self.offset(x, y) {
            self.data[i..i + 3].copy_from_slice(&colour.to_array());
        }
    }

    /// Every pixel in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.data.chunks_exact(3).map(|p| Rgb::new(p[0], p[1], p[2]))
    }
}
