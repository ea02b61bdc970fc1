//! Fuzz target for sampling query construction.
//!
//! This fuzzer tests that the sampler:
//! 1. Never panics on arbitrary identifiers
//! 2. Only ever interpolates vetted identifiers into SQL

#![no_main]

use arbitrary::Arbitrary;
use bqdoc::{MockWarehouse, Sampler};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct SamplerInput {
    dataset: String,
    table: String,
    columns: Vec<String>,
}

fn is_safe(identifier: &str) -> bool {
    !identifier.is_empty()
        && identifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fuzz_target!(|input: SamplerInput| {
    let warehouse = MockWarehouse::new();
    let mut sampler = Sampler::new(10, 5);
    let _ = sampler.sample(&warehouse, &input.dataset, &input.table, &input.columns);

    // A query only ever goes out when every identifier passed the guard.
    if warehouse.query_count() > 0 {
        assert!(is_safe(&input.dataset));
        assert!(is_safe(&input.table));
        assert!(!input.columns.is_empty());
        assert!(input.columns.iter().all(|c| is_safe(c)));
    }
});
