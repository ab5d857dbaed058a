//! Example: Parse a PNG file and list its chunks
//!
//! Without an argument a small in-memory sample is inspected instead.
//!
//! Run: `cargo run --example inspect -- <file.png>`
//! Set `RUST_LOG=png_chunk_io=debug` to see the walk as it happens.

use png_chunk_io::{test_utils::PngBuilder, ParseOptions, PngFile};
use std::env;
use tracing_subscriber::EnvFilter;

fn main() -> png_chunk_io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    // Lenient so a damaged file still lists everything
    let options = ParseOptions::new().lenient();
    let png = match env::args().nth(1) {
        Some(path) => {
            println!("Parsing: {}", path);
            PngFile::open_with(&path, options)?
        }
        None => {
            println!("No file given, inspecting a generated sample");
            let sample = PngBuilder::new()
                .ihdr(2, 2, 8, 3)
                .gama(45455)
                .plte(&[[0, 0, 0], [255, 255, 255]])
                .chunk(b"tEXt", b"Software\0png-chunk-io")
                .idat(&[0x78, 0x9c, 0x63, 0x60, 0x00, 0x00])
                .idat(&[0x00, 0x02, 0x00, 0x01])
                .iend()
                .build();
            PngFile::from_bytes("sample", sample, options)?
        }
    };
    let store = png.store();

    println!("\nChunks ({} bytes total):", store.total_size);
    for entry in store.entries() {
        println!("  {}", entry);
    }

    if let Some(header) = store.header() {
        println!(
            "\nImage: {}x{}, {} at {} bits, {}",
            header.width,
            header.height,
            header.color_type,
            header.bit_depth,
            if header.is_interlaced() { "interlaced" } else { "not interlaced" }
        );
    }
    if let Some(palette) = store.palette() {
        println!("Palette: {} entries", palette.len());
    }
    if let Some(gamma) = store.gamma() {
        println!("Gamma: {:.5}", gamma.as_f64());
    }
    println!(
        "Image data: {} bytes in {} fragment(s)",
        store.compressed_image_data().len(),
        store.image_data().len()
    );

    for notice in store.notices() {
        println!("  note: {}", notice);
    }
    if !store.is_clean() {
        println!("\n{} problem(s):", store.issues().len());
        for issue in store.issues() {
            println!("  {}", issue);
        }
    }

    Ok(())
}
