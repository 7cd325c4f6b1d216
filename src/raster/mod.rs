//! Rasterizer for signature traces
//!
//! A trace is drawn onto an oversampled working canvas, then box-filtered down
//! to the output size. The working canvas never outlives [`rasterize`].

mod canvas;
pub mod resample;
pub mod stroke;

pub use canvas::{Canvas, WorkingCanvas};
pub use resample::area_average;
pub use stroke::{stroke_thick_segment, thick_segment_corners};

#[cfg(test)]
pub(crate) use canvas::live_working_canvases;

use crate::config::RenderOptions;
use crate::error::{Result, SignatureError};
use crate::trace::SignatureTrace;

/// Largest working canvas, in pixels, a render may allocate (1 GiB of RGBA)
///
/// Auto-sized output follows the trace coordinates, so untrusted input can
/// ask for any size.
pub const MAX_WORKING_PIXELS: u64 = 1 << 28;

/// Draw `trace` with fully resolved `options` and return the final canvas
pub fn rasterize(trace: &SignatureTrace, options: &RenderOptions) -> Result<Canvas> {
    let (width, height) = (options.image_width, options.image_height);
    let factor = options.draw_multiplier;
    if width == 0 || height == 0 {
        return Err(SignatureError::render(format!(
            "output size {}x{} has no area",
            width, height
        )));
    }
    if factor == 0 {
        return Err(SignatureError::render("draw multiplier must be at least 1"));
    }
    let (work_w, work_h) = width
        .checked_mul(factor)
        .zip(height.checked_mul(factor))
        .ok_or_else(|| {
            SignatureError::render(format!(
                "{}x{} at {}x oversampling overflows",
                width, height, factor
            ))
        })?;
    let work_pixels = u64::from(work_w) * u64::from(work_h);
    if work_pixels > MAX_WORKING_PIXELS {
        return Err(SignatureError::render(format!(
            "{}x{} at {}x oversampling needs {} working pixels, limit is {}",
            width, height, factor, work_pixels, MAX_WORKING_PIXELS
        )));
    }

    log::debug!(
        "rasterizing {} segments: {}x{} via {}x{} working canvas",
        trace.len(),
        width,
        height,
        work_w,
        work_h
    );

    let mut working = WorkingCanvas::new(work_w, work_h, options.bg_colour)?;
    let scale = f64::from(factor);
    let half_thickness = options.half_thickness();
    let mut drawn = 0usize;
    for segment in trace {
        let scaled = segment.scaled(scale);
        if stroke_thick_segment(&mut working, &scaled, half_thickness, options.pen_colour) {
            drawn += 1;
        }
    }
    if drawn < trace.len() {
        log::debug!("{} of {} segments drew nothing", trace.len() - drawn, trace.len());
    }

    let mut output = Canvas::new(width, height, options.bg_colour)?;
    area_average(&working, &mut output)?;
    Ok(output)
}
