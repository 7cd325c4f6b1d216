//! Stateful rasterizer holding the most recent render
//!
//! A [`SignatureRasterizer`] is built with default [`RenderOptions`] and keeps
//! the last successfully rendered canvas so it can be encoded later. Each
//! render replaces that canvas; a failed render leaves it untouched.

use std::path::Path;

use crate::config::{RenderOptions, RenderOverrides};
use crate::encode::{self, Destination, EncodedPng, Emitted, PngOptions};
use crate::error::{Result, SignatureError};
use crate::raster::{rasterize, Canvas};
use crate::trace::{BoundingSize, SignatureTrace};

/// Signature data as it reaches the rasterizer
#[derive(Debug, Clone, Copy)]
pub enum SignatureInput<'a> {
    /// JSON text, possibly with backslash-escaped quotes
    Json(&'a str),
    /// An already decoded trace
    Trace(&'a SignatureTrace),
}

impl<'a> From<&'a str> for SignatureInput<'a> {
    fn from(json: &'a str) -> Self {
        SignatureInput::Json(json)
    }
}

impl<'a> From<&'a String> for SignatureInput<'a> {
    fn from(json: &'a String) -> Self {
        SignatureInput::Json(json.as_str())
    }
}

impl<'a> From<&'a SignatureTrace> for SignatureInput<'a> {
    fn from(trace: &'a SignatureTrace) -> Self {
        SignatureInput::Trace(trace)
    }
}

/// Lifecycle of a rasterizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// Nothing rendered yet
    Uninitialized,
    /// Holds the last successful render
    Rendered,
}

/// Renders signatures with a fixed set of defaults
#[derive(Debug, Clone, Default)]
pub struct SignatureRasterizer {
    defaults: RenderOptions,
    image: Option<Canvas>,
}

impl SignatureRasterizer {
    pub fn new(defaults: RenderOptions) -> Self {
        Self {
            defaults,
            image: None,
        }
    }

    pub fn defaults(&self) -> &RenderOptions {
        &self.defaults
    }

    pub fn state(&self) -> RenderState {
        match self.image {
            Some(_) => RenderState::Rendered,
            None => RenderState::Uninitialized,
        }
    }

    /// The last successfully rendered canvas, if any
    pub fn image(&self) -> Option<&Canvas> {
        self.image.as_ref()
    }

    /// Give up the held canvas, returning to `Uninitialized`
    pub fn take_image(&mut self) -> Option<Canvas> {
        self.image.take()
    }

    /// Max x and y over all segments, seeded at zero
    pub fn compute_bounding_size(trace: &SignatureTrace) -> BoundingSize {
        trace.bounding_size()
    }

    /// The options a render of `trace` with `overrides` would use
    pub fn resolve_options(
        &self,
        trace: &SignatureTrace,
        overrides: &RenderOverrides,
    ) -> RenderOptions {
        self.defaults.resolve(overrides, trace)
    }

    /// Decode (if needed), draw and keep the result
    ///
    /// The caller gets its own copy of the canvas; the rasterizer keeps the
    /// other for [`image`](Self::image) and encoding.
    pub fn render<'a>(
        &mut self,
        input: impl Into<SignatureInput<'a>>,
        overrides: &RenderOverrides,
    ) -> Result<Canvas> {
        let decoded;
        let trace = match input.into() {
            SignatureInput::Trace(trace) => trace,
            SignatureInput::Json(json) => {
                decoded = json.parse::<SignatureTrace>()?;
                &decoded
            }
        };

        let options = self.resolve_options(trace, overrides);
        if options.auto_size && (options.image_width == 0 || options.image_height == 0) {
            log::warn!(
                "auto-size produced {}x{}; the signature has no extent in positive coordinates",
                options.image_width,
                options.image_height
            );
        }
        log::debug!("resolved options {:?}", options);

        let canvas = rasterize(trace, &options)?;
        self.image = Some(canvas.clone());
        Ok(canvas)
    }

    fn rendered(&self) -> Result<&Canvas> {
        self.image()
            .ok_or_else(|| SignatureError::encode("no image has been rendered"))
    }

    /// Encode the held canvas and send it to `destination`
    pub fn encode_and_emit(
        &self,
        destination: &Destination,
        options: &PngOptions,
    ) -> Result<Emitted> {
        encode::emit(self.rendered()?, destination, options)
    }

    /// Encode the held canvas as PNG bytes
    pub fn encode(&self, options: &PngOptions) -> Result<EncodedPng> {
        encode::encode_png(self.rendered()?, options)
    }

    /// Encode the held canvas into a PNG file
    pub fn save(&self, path: &Path, options: &PngOptions) -> Result<usize> {
        encode::write_png(self.rendered()?, path, options)
    }
}
