//! Cartoonize an image file.
//!
//! Usage:
//!   cargo run --example cartoonize --release -- <input> [output] [--hsv]
//!
//! Set `RUST_LOG=debug` to print the per-channel centroids.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Instant;

use zencartoon::{CartoonConfig, ColorSpace, RGB8};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let hsv = args.iter().any(|a| a == "--hsv");
    let mut paths = args.iter().filter(|a| !a.starts_with("--"));
    let input = paths
        .next()
        .ok_or("usage: cartoonize <input> [output] [--hsv]")?;
    let output = paths
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output(Path::new(input)));

    let img = image::open(input)?.to_rgb8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    let pixels: Vec<RGB8> = img
        .pixels()
        .map(|p| RGB8::new(p.0[0], p.0[1], p.0[2]))
        .collect();

    let space = if hsv { ColorSpace::Hsv } else { ColorSpace::Rgb };
    let config = CartoonConfig::new().color_space(space);

    let start = Instant::now();
    let result = zencartoon::cartoonize(&pixels, w, h, &config)?;
    let elapsed = start.elapsed();

    let bytes: Vec<u8> = result
        .pixels()
        .iter()
        .flat_map(|p| [p.r, p.g, p.b])
        .collect();
    image::save_buffer(&output, &bytes, w as u32, h as u32, image::ExtendedColorType::Rgb8)?;

    eprintln!(
        "{input} ({w}x{h}) → {} ({} bands, {:.1}ms)",
        output.display(),
        result.band_count(),
        elapsed.as_secs_f64() * 1000.0
    );
    Ok(())
}

/// `photo.jpg` → `photo_cartoon.png`, next to the input.
fn default_output(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{stem}_cartoon.png"))
}
