//! Fuzz target for JSON shape derivation and merging.
//!
//! This fuzzer tests that the shape algebra:
//! 1. Never panics on any parseable JSON value
//! 2. Keeps self-merge idempotent for every derived shape
//! 3. Always renders a schema value

#![no_main]

use bqdoc::JsonShape;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(value) = serde_json::from_str::<serde_json::Value>(text) else {
        return;
    };

    let shape = JsonShape::of(&value);

    // Merging a shape with itself must reproduce it exactly.
    let merged = shape.clone().merge(shape.clone());
    assert_eq!(merged, shape);

    // Rendering never panics, whatever the nesting.
    let _ = shape.to_schema_value();
});
