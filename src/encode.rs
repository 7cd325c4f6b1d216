//! PNG encoding and emission of rendered canvases

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use base64::Engine as _;

use crate::error::{Result, SignatureError};
use crate::raster::Canvas;

/// MIME type of everything this module produces
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// PNG row filter bits, using the classic libgd/libpng mask values
pub mod filters {
    pub const NO_FILTER: u32 = 0x00;
    pub const FILTER_NONE: u32 = 0x08;
    pub const FILTER_SUB: u32 = 0x10;
    pub const FILTER_UP: u32 = 0x20;
    pub const FILTER_AVG: u32 = 0x40;
    pub const FILTER_PAETH: u32 = 0x80;
    pub const ALL_FILTERS: u32 = FILTER_NONE | FILTER_SUB | FILTER_UP | FILTER_AVG | FILTER_PAETH;
}

/// Encoder settings; `None` leaves the encoder's default in place
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PngOptions {
    /// Compression level, 0 (fastest) to 9 (smallest)
    pub compression: Option<u8>,
    /// Bitmask of [`filters`] values
    pub filters: Option<u32>,
}

impl PngOptions {
    /// Create options that keep the encoder defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compression level (0-9)
    pub fn with_compression(mut self, level: u8) -> Self {
        self.compression = Some(level);
        self
    }

    /// Set the row filter bitmask, see [`filters`]
    pub fn with_filters(mut self, mask: u32) -> Self {
        self.filters = Some(mask);
        self
    }

    fn compression(&self) -> Result<Option<png::Compression>> {
        match self.compression {
            None => Ok(None),
            Some(level @ 0..=3) => {
                log::trace!("compression level {} -> fast", level);
                Ok(Some(png::Compression::Fast))
            }
            Some(4..=6) => Ok(Some(png::Compression::Default)),
            Some(7..=9) => Ok(Some(png::Compression::Best)),
            Some(level) => Err(SignatureError::encode(format!(
                "compression level {} is outside 0-9",
                level
            ))),
        }
    }

    /// Map the filter mask onto the encoder's filter settings
    ///
    /// A single bit selects that filter for every row. Several bits let the
    /// encoder choose per row.
    fn filter(&self) -> Option<(png::FilterType, png::AdaptiveFilterType)> {
        use self::filters::*;

        let mask = self.filters? & ALL_FILTERS;
        let fixed = |f| Some((f, png::AdaptiveFilterType::NonAdaptive));
        match mask {
            NO_FILTER | FILTER_NONE => fixed(png::FilterType::NoFilter),
            FILTER_SUB => fixed(png::FilterType::Sub),
            FILTER_UP => fixed(png::FilterType::Up),
            FILTER_AVG => fixed(png::FilterType::Avg),
            FILTER_PAETH => fixed(png::FilterType::Paeth),
            _ => Some((png::FilterType::Sub, png::AdaptiveFilterType::Adaptive)),
        }
    }
}

/// An encoded image ready to hand to a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPng {
    pub bytes: Vec<u8>,
}

impl EncodedPng {
    pub fn content_type(&self) -> &'static str {
        PNG_CONTENT_TYPE
    }

    /// `data:image/png;base64,...`
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            PNG_CONTENT_TYPE,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    pub fn write_to(&self, out: &mut impl Write) -> std::io::Result<()> {
        out.write_all(&self.bytes)?;
        out.flush()
    }
}

/// Where an encoded image goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Return the bytes to the caller
    Stream,
    /// Write the bytes to a file
    File(PathBuf),
}

/// What emitting an image produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emitted {
    Stream(EncodedPng),
    File { path: PathBuf, bytes_written: usize },
}

/// Encode `canvas` as an 8-bit truecolor PNG
pub fn encode_png(canvas: &Canvas, options: &PngOptions) -> Result<EncodedPng> {
    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, canvas.width(), canvas.height());
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        if let Some(compression) = options.compression()? {
            encoder.set_compression(compression);
        }
        if let Some((filter, adaptive)) = options.filter() {
            encoder.set_filter(filter);
            encoder.set_adaptive_filter(adaptive);
        }

        let mut writer = encoder.write_header()?;
        writer.write_image_data(canvas.data())?;
        writer.finish()?;
    }
    log::debug!(
        "encoded {}x{} canvas into {} PNG bytes",
        canvas.width(),
        canvas.height(),
        bytes.len()
    );
    Ok(EncodedPng { bytes })
}

/// Encode `canvas` and write it to `path`
pub fn write_png(canvas: &Canvas, path: &Path, options: &PngOptions) -> Result<usize> {
    let encoded = encode_png(canvas, options)?;
    fs::write(path, &encoded.bytes).map_err(|e| SignatureError::io(path, e))?;
    log::info!("wrote {} bytes to {}", encoded.bytes.len(), path.display());
    Ok(encoded.bytes.len())
}

/// Encode `canvas` and send it to `destination`
pub fn emit(canvas: &Canvas, destination: &Destination, options: &PngOptions) -> Result<Emitted> {
    match destination {
        Destination::Stream => encode_png(canvas, options).map(Emitted::Stream),
        Destination::File(path) => {
            let bytes_written = write_png(canvas, path, options)?;
            Ok(Emitted::File {
                path: path.clone(),
                bytes_written,
            })
        }
    }
}
