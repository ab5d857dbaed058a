//! Example: Strip every non-critical chunk from a PNG file
//!
//! Writes `<name>_anonymized.png` next to the input and prints a CRC-32 of
//! the output computed while it was written.
//!
//! Run: `cargo run --example anonymize -- <file.png>`

use png_chunk_io::{PngFile, RetainSet};
use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

fn main() -> png_chunk_io::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <file.png>", args[0]);
        std::process::exit(1);
    }

    let input = Path::new(&args[1]);
    let png = PngFile::open(input)?;
    let output = input.with_file_name(png.anonymized_file_name());

    let retain = RetainSet::critical();
    let mut hasher = crc32fast::Hasher::new();
    let written = {
        let file = BufWriter::new(File::create(&output)?);
        png.reconstructor()?
            .write_with_processing(file, &retain, |bytes| hasher.update(bytes))?
    };

    let dropped = png
        .store()
        .entries()
        .iter()
        .filter(|e| !retain.contains(&e.kind))
        .count();
    println!(
        "Wrote {} ({} bytes, {} chunk(s) dropped, crc32 {:08x})",
        output.display(),
        written,
        dropped,
        hasher.finalize()
    );

    Ok(())
}
