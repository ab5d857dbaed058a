#![no_main]

use libfuzzer_sys::fuzz_target;
use png_chunk_io::{parse_with, ParseOptions};

fuzz_target!(|data: &[u8]| {
    // Any input must produce a store or an error, never a panic
    for options in [ParseOptions::new(), ParseOptions::new().lenient()] {
        if let Ok(store) = parse_with(data, options) {
            let _ = store.header().map(|h| h.bytes_per_row());
            let _ = store.compressed_image_data();
            for entry in store.entries() {
                let _ = entry.to_string();
            }
        }
    }
});
