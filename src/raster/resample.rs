//! Area-averaging (box filter) downsampling
//!
//! Every destination pixel covers a rectangle of the source; its colour is the
//! mean of the source pixels under that rectangle, each weighted by how much
//! of it is covered. Width and height are scaled independently.

use crate::config::Rgb;
use crate::error::{Result, SignatureError};

use super::{Canvas, WorkingCanvas};

/// Source indices and coverage weights for one destination row or column
type Span = Vec<(usize, f64)>;

fn axis_spans(src_len: u32, dst_len: u32) -> Vec<Span> {
    let scale = f64::from(src_len) / f64::from(dst_len);
    let src_end = f64::from(src_len);

    (0..dst_len)
        .map(|i| {
            let start = f64::from(i) * scale;
            let end = (start + scale).min(src_end);
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src_len as usize);
            (first..last)
                .filter_map(|j| {
                    let weight = end.min(j as f64 + 1.0) - start.max(j as f64);
                    (weight > 0.0).then_some((j, weight))
                })
                .collect()
        })
        .collect()
}

fn to_channel(sum: f64, total: f64) -> u8 {
    (sum / total).round().clamp(0.0, 255.0) as u8
}

/// Downsample `src` into every pixel of `dst`
pub fn area_average(src: &WorkingCanvas, dst: &mut Canvas) -> Result<()> {
    let (src_w, src_h) = (src.width(), src.height());
    let (dst_w, dst_h) = dst.dimensions();
    if src_w == 0 || src_h == 0 || dst_w == 0 || dst_h == 0 {
        return Err(SignatureError::render(format!(
            "cannot resample {}x{} into {}x{}",
            src_w, src_h, dst_w, dst_h
        )));
    }

    let columns = axis_spans(src_w, dst_w);
    let rows = axis_spans(src_h, dst_h);
    let pixels = src.pixels();
    let stride = src_w as usize;

    for (dy, row_span) in rows.iter().enumerate() {
        for (dx, col_span) in columns.iter().enumerate() {
            let (mut r, mut g, mut b, mut total) = (0.0, 0.0, 0.0, 0.0);
            for &(sy, wy) in row_span {
                let base = sy * stride;
                for &(sx, wx) in col_span {
                    let w = wx * wy;
                    let p = pixels[base + sx];
                    r += f64::from(p.red()) * w;
                    g += f64::from(p.green()) * w;
                    b += f64::from(p.blue()) * w;
                    total += w;
                }
            }
            if total > 0.0 {
                let colour = Rgb::new(
                    to_channel(r, total),
                    to_channel(g, total),
                    to_channel(b, total),
                );
                dst.set_pixel(dx as u32, dy as u32, colour);
            }
        }
    }

    Ok(())
}
