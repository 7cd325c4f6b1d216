//! Signature to Image CLI
//!
//! Usage:
//!   signature-to-image [OPTIONS] [FILE]
//!
//! Options:
//!   -o, --output <FILE>   Write the PNG to a file instead of stdout
//!   --data-uri            Print a data:image/png;base64 URI
//!   -c, --config <FILE>   Render options file (TOML format)
//!   -v, --verbose         More log output (repeatable)
//!   -h, --help            Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;

use signature_to_image::{
    PngOptions, RenderOptions, RenderOverrides, Rgb, SignatureError, SignatureRasterizer,
};

#[derive(Parser)]
#[command(name = "signature-to-image")]
#[command(about = "Render signature pad JSON as a PNG image")]
struct Cli {
    /// Signature JSON file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Write the PNG to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print a data URI instead of raw PNG bytes
    #[arg(long, conflicts_with = "output")]
    data_uri: bool,

    /// Render options file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Size the image to the signature's bounds
    #[arg(long)]
    auto_size: bool,

    /// Output width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Output height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Pen thickness in output pixels
    #[arg(long)]
    pen_width: Option<u32>,

    /// Ink colour (#rrggbb, #rgb or r,g,b)
    #[arg(long)]
    pen_colour: Option<Rgb>,

    /// Background colour (#rrggbb, #rgb or r,g,b)
    #[arg(long)]
    bg_colour: Option<Rgb>,

    /// Oversampling factor
    #[arg(short, long)]
    multiplier: Option<u32>,

    /// PNG compression level
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=9))]
    compression: Option<u8>,

    /// PNG filter bitmask, decimal or 0x-prefixed hex (0xf8 = all filters)
    #[arg(long, value_parser = parse_mask)]
    filters: Option<u32>,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_mask(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid filter mask '{}': {}", s, e))
}

impl Cli {
    fn overrides(&self, defaults: &RenderOptions) -> RenderOverrides {
        let mut overrides = RenderOverrides::new();
        if self.auto_size {
            overrides.auto_size = Some(true);
        }
        if self.width.is_some() || self.height.is_some() {
            overrides.image_size = Some((
                self.width.unwrap_or(defaults.image_width),
                self.height.unwrap_or(defaults.image_height),
            ));
        }
        overrides.pen_width = self.pen_width;
        overrides.pen_colour = self.pen_colour;
        overrides.bg_colour = self.bg_colour;
        overrides.draw_multiplier = self.multiplier;
        overrides
    }

    fn png_options(&self) -> PngOptions {
        PngOptions {
            compression: self.compression,
            filters: self.filters,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    // If no input file and stdin is a terminal (interactive), show a hint
    if cli.input.is_none() && io::stdin().is_terminal() {
        eprintln!("Usage: signature-to-image [OPTIONS] [FILE]");
        eprintln!("       echo '[{{\"lx\":0,\"ly\":0,\"mx\":50,\"my\":0}}]' | signature-to-image -o sig.png");
        std::process::exit(1);
    }

    // Load render defaults
    let defaults = match &cli.config {
        Some(path) => match RenderOptions::from_file(path).map_err(SignatureError::from) {
            Ok(options) => options,
            Err(e) => {
                eprintln!("Error loading options '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => RenderOptions::default(),
    };

    // Read input
    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    if let Err(e) = run(&cli, defaults, &source) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, defaults: RenderOptions, source: &str) -> Result<(), SignatureError> {
    let overrides = cli.overrides(&defaults);
    let mut rasterizer = SignatureRasterizer::new(defaults);
    rasterizer.render(source, &overrides)?;

    let png_options = cli.png_options();
    if let Some(path) = &cli.output {
        rasterizer.save(path, &png_options)?;
        return Ok(());
    }

    let encoded = rasterizer.encode(&png_options)?;
    if cli.data_uri {
        println!("{}", encoded.to_data_uri());
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    if stdout.is_terminal() {
        return Err(SignatureError::encode(
            "refusing to write binary PNG to a terminal; use --output or --data-uri",
        ));
    }
    encoded
        .write_to(&mut stdout)
        .map_err(|e| SignatureError::io("<stdout>", e))
}
