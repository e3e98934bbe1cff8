//! Mapping over slices of different sizes
//!
//! Run with:
//!   cargo run --example array_map -p ratebench-demos --release
//!   cargo run --example array_map -p ratebench-demos --release -- list

use ratebench::prelude::*;
use std::hint::black_box;
use std::process::ExitCode;

fn doubled(input: &[u64]) -> Vec<u64> {
    input.iter().map(|x| x * 2).collect()
}

#[suite(name = "Array.map")]
fn array_map(suite: &mut Suite) -> Result<(), SuiteError> {
    let small: Vec<u64> = (0..16).collect();
    let large: Vec<u64> = (0..10_000).collect();

    suite.add("16 items", move || {
        black_box(doubled(black_box(&small)));
    })?;
    suite.add("10k items", move || {
        black_box(doubled(black_box(&large)));
    })?;
    suite.add("10k items in place", || {
        let mut v: Vec<u64> = (0..10_000).collect();
        v.iter_mut().for_each(|x| *x *= 2);
        black_box(v);
    })
}

fn main() -> ExitCode {
    ratebench::run()
}
