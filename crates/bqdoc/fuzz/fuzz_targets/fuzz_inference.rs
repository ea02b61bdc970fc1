//! Fuzz target for the JSON sample inferencer.
//!
//! This fuzzer tests that inference:
//! 1. Never panics on arbitrary text values
//! 2. Never keeps more than three display samples
//! 3. Returns nothing rather than something empty

#![no_main]

use bqdoc::Inferencer;
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Each line is one raw cell value, the way sampled rows arrive.
    let values: Vec<Value> = text
        .lines()
        .map(|line| Value::String(line.to_string()))
        .collect();

    let inferencer = Inferencer::new();
    if let Some(sample) = inferencer.infer("payload", &values) {
        assert!(!sample.samples.is_empty());
        assert!(sample.samples.len() <= 3);
    }
});
