//! Signature to Image - render captured signatures as PNG images
//!
//! Signature capture widgets record a signature as a list of straight line
//! segments. This library decodes that list, draws each segment as a thick
//! stroke on an oversampled canvas, box-filters the canvas down to the output
//! size and encodes the result as PNG.
//!
//! # Example
//!
//! ```rust
//! use signature_to_image::render;
//!
//! let canvas = render(r#"[{"lx":0,"ly":0,"mx":50,"my":0}]"#).unwrap();
//! assert_eq!(canvas.dimensions(), (198, 55));
//! ```

pub mod config;
pub mod encode;
pub mod error;
pub mod raster;
pub mod rasterizer;
pub mod trace;

pub use config::{RenderOptions, RenderOverrides, Rgb};
pub use encode::{encode_png, Destination, EncodedPng, Emitted, PngOptions, PNG_CONTENT_TYPE};
pub use error::{ConfigError, Result, SignatureError};
pub use raster::{rasterize, Canvas};
pub use rasterizer::{RenderState, SignatureInput, SignatureRasterizer};
pub use trace::{decode_trace, BoundingSize, LineSegment, SignatureTrace};

/// Render signature JSON with default options
///
/// The JSON may carry one layer of backslash-escaped quotes.
pub fn render(json: &str) -> Result<Canvas> {
    render_with_options(json, &RenderOptions::default())
}

/// Render signature JSON with custom options
///
/// # Example
///
/// ```rust
/// use signature_to_image::{render_with_options, RenderOptions, Rgb};
///
/// let options = RenderOptions::new()
///     .with_auto_size(true)
///     .with_pen_colour(Rgb::new(0, 0, 0));
///
/// let canvas = render_with_options(r#"[{"lx":10,"ly":5,"mx":20,"my":8}]"#, &options).unwrap();
/// assert_eq!(canvas.dimensions(), (20, 8));
/// ```
pub fn render_with_options(json: &str, options: &RenderOptions) -> Result<Canvas> {
    let trace = decode_trace(json)?;
    rasterize(&trace, &options.resolve(&RenderOverrides::default(), &trace))
}

/// Render signature JSON straight to PNG bytes
///
/// # Example
///
/// ```rust
/// use signature_to_image::{signature_to_png, PngOptions, RenderOptions};
///
/// let png = signature_to_png("[]", &RenderOptions::default(), &PngOptions::default()).unwrap();
/// assert_eq!(&png.bytes[1..4], b"PNG");
/// ```
pub fn signature_to_png(
    json: &str,
    options: &RenderOptions,
    png_options: &PngOptions,
) -> Result<EncodedPng> {
    let canvas = render_with_options(json, options)?;
    encode_png(&canvas, png_options)
}
