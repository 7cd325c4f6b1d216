//! Render options, per-call overrides and colour values
//!
//! [`RenderOptions`] holds the defaults a rasterizer is built with and can be
//! loaded from a TOML file. [`RenderOverrides`] carries the fields a single
//! render call wants to change; anything left as `None` falls back to the
//! defaults.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;
use crate::trace::SignatureTrace;

/// An opaque 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
    /// Default ink colour
    pub const INK_BLUE: Rgb = Rgb::new(0x14, 0x53, 0x94);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Sum of squared channel differences
    pub fn distance_sq(self, other: Rgb) -> u32 {
        let d = |a: u8, b: u8| (i32::from(a) - i32::from(b)).pow(2) as u32;
        d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// Accepts `#rrggbb`, `#rgb` and `r,g,b`
impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(format!("'{}': not a hex colour", s));
            }
            let channel = |h: &str| u8::from_str_radix(h, 16).map_err(|e| format!("'{}': {}", s, e));
            return match hex.len() {
                6 => Ok(Rgb::new(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                )),
                3 => {
                    let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                    Ok(Rgb::new(short(0)?, short(1)?, short(2)?))
                }
                _ => Err(format!("'{}': expected #rgb or #rrggbb", s)),
            };
        }

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(format!("'{}': expected #rrggbb or r,g,b", s));
        }
        let channel = |p: &str| p.parse::<u8>().map_err(|e| format!("'{}': {}", s, e));
        Ok(Rgb::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?))
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawColour {
            Text(String),
            Channels([u8; 3]),
        }

        match RawColour::deserialize(deserializer)? {
            RawColour::Text(text) => text.parse().map_err(serde::de::Error::custom),
            RawColour::Channels(channels) => Ok(channels.into()),
        }
    }
}

/// Defaults for every render a rasterizer performs
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Size the output to the signature's bounds instead of `image_width` x `image_height`
    #[serde(alias = "autoSize")]
    pub auto_size: bool,

    /// Output width in pixels
    #[serde(alias = "imageWidth")]
    pub image_width: u32,

    /// Output height in pixels
    #[serde(alias = "imageHeight")]
    pub image_height: u32,

    /// Canvas fill
    #[serde(alias = "bgColour")]
    pub bg_colour: Rgb,

    /// Ink colour
    #[serde(alias = "penColour")]
    pub pen_colour: Rgb,

    /// Stroke thickness in output pixels
    #[serde(alias = "penWidth")]
    pub pen_width: u32,

    /// Oversampling factor for the working canvas
    #[serde(alias = "drawMultiplier")]
    pub draw_multiplier: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            auto_size: false,
            image_width: 198,
            image_height: 55,
            bg_colour: Rgb::WHITE,
            pen_colour: Rgb::INK_BLUE,
            pen_width: 2,
            draw_multiplier: 12,
        }
    }
}

impl RenderOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load options from a TOML string; missing keys keep their defaults
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Set whether the output size follows the signature bounds
    pub fn with_auto_size(mut self, auto_size: bool) -> Self {
        self.auto_size = auto_size;
        self
    }

    /// Set the output size in pixels
    pub fn with_image_size(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set the background colour
    pub fn with_bg_colour(mut self, colour: Rgb) -> Self {
        self.bg_colour = colour;
        self
    }

    /// Set the ink colour
    pub fn with_pen_colour(mut self, colour: Rgb) -> Self {
        self.pen_colour = colour;
        self
    }

    /// Set the stroke thickness in output pixels
    pub fn with_pen_width(mut self, width: u32) -> Self {
        self.pen_width = width;
        self
    }

    /// Set the oversampling factor
    pub fn with_draw_multiplier(mut self, multiplier: u32) -> Self {
        self.draw_multiplier = multiplier;
        self
    }

    /// Half the stroke thickness, in working-canvas pixels
    pub fn half_thickness(&self) -> f64 {
        f64::from(self.pen_width) * (f64::from(self.draw_multiplier) / 2.0)
    }

    /// Merge `overrides` over these defaults and settle the output size
    ///
    /// Auto-sizing applies only when the merged `auto_size` is set and the
    /// call did not pass an explicit `image_size`.
    pub fn resolve(&self, overrides: &RenderOverrides, trace: &SignatureTrace) -> RenderOptions {
        let auto_size = overrides.auto_size.unwrap_or(self.auto_size);
        let (image_width, image_height) = match overrides.image_size {
            Some(size) => size,
            None if auto_size => {
                let bounds = trace.bounding_size();
                log::debug!("auto-size bounds {:?}", bounds);
                bounds.to_pixels()
            }
            None => (self.image_width, self.image_height),
        };

        RenderOptions {
            auto_size,
            image_width,
            image_height,
            bg_colour: overrides.bg_colour.unwrap_or(self.bg_colour),
            pen_colour: overrides.pen_colour.unwrap_or(self.pen_colour),
            pen_width: overrides.pen_width.unwrap_or(self.pen_width),
            draw_multiplier: overrides.draw_multiplier.unwrap_or(self.draw_multiplier),
        }
    }
}

/// Per-call changes to a rasterizer's defaults
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderOverrides {
    #[serde(alias = "autoSize")]
    pub auto_size: Option<bool>,
    /// Explicit (width, height); suppresses auto-sizing
    #[serde(alias = "imageSize")]
    pub image_size: Option<(u32, u32)>,
    #[serde(alias = "bgColour")]
    pub bg_colour: Option<Rgb>,
    #[serde(alias = "penColour")]
    pub pen_colour: Option<Rgb>,
    #[serde(alias = "penWidth")]
    pub pen_width: Option<u32>,
    #[serde(alias = "drawMultiplier")]
    pub draw_multiplier: Option<u32>,
}

impl RenderOverrides {
    /// Create overrides that change nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Override whether the output size follows the signature bounds
    pub fn with_auto_size(mut self, auto_size: bool) -> Self {
        self.auto_size = Some(auto_size);
        self
    }

    /// Use an explicit output size, even when auto-sizing is on
    pub fn with_image_size(mut self, width: u32, height: u32) -> Self {
        self.image_size = Some((width, height));
        self
    }

    /// Override the background colour
    pub fn with_bg_colour(mut self, colour: Rgb) -> Self {
        self.bg_colour = Some(colour);
        self
    }

    /// Override the ink colour
    pub fn with_pen_colour(mut self, colour: Rgb) -> Self {
        self.pen_colour = Some(colour);
        self
    }

    /// Override the stroke thickness in output pixels
    pub fn with_pen_width(mut self, width: u32) -> Self {
        self.pen_width = Some(width);
        self
    }

    /// Override the oversampling factor
    pub fn with_draw_multiplier(mut self, multiplier: u32) -> Self {
        self.draw_multiplier = Some(multiplier);
        self
    }
}
