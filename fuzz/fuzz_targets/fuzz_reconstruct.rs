#![no_main]

use libfuzzer_sys::fuzz_target;
use png_chunk_io::{parse, parse_with, reconstruct, ParseOptions, RetainSet};

fuzz_target!(|data: &[u8]| {
    let Ok(store) = parse_with(data, ParseOptions::new().lenient()) else {
        return;
    };

    // Reconstruction of parsed input never fails, and any output that
    // parses again is a fixed point
    for retain in [RetainSet::critical(), RetainSet::all()] {
        let out = reconstruct(data, &store, &retain).expect("reconstruct parsed input");
        if let Ok(again) = parse(&out) {
            let twice = reconstruct(&out, &again, &RetainSet::all()).expect("reconstruct output");
            assert_eq!(twice, out);
        }
    }
});
