//! Test hooks: once-only `before` and pooled input data
//!
//! Generated data is built before measurement starts, so the timed region
//! only contains the test body. Each call receives the next pooled item.
//!
//! Run with:
//!   cargo run --example data_generation -p ratebench-demos --release

use ratebench::prelude::*;
use std::cell::Cell;
use std::hint::black_box;
use std::process::ExitCode;
use std::rc::Rc;

/// Small xorshift so the pool differs item to item without extra crates
fn next_seed(seed: &Cell<u64>) -> u64 {
    let mut x = seed.get();
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    seed.set(x);
    x
}

#[suite(name = "Vec.sort")]
fn vec_sort(suite: &mut Suite) -> Result<(), SuiteError> {
    let seed = Rc::new(Cell::new(0x2545_f491_4f6c_dd1d));
    let options = TestOptions::new().generate_data(move || {
        (0..512).map(|_| next_seed(&seed) as u32).collect::<Vec<u32>>()
    });
    suite.add_with(
        "sort 512 random",
        |data: Option<&Vec<u32>>| {
            let mut v = data.cloned().unwrap_or_default();
            v.sort_unstable();
            black_box(v);
        },
        options,
    )?;

    let options = TestOptions::new().generate_data_array(|| {
        vec![
            (0..512u32).collect::<Vec<_>>(),
            (0..512u32).rev().collect::<Vec<_>>(),
        ]
    });
    suite.add_with(
        "sort 512 presorted",
        |data: Option<&Vec<u32>>| {
            let mut v = data.cloned().unwrap_or_default();
            v.sort_unstable();
            black_box(v);
        },
        options,
    )
}

#[suite(name = "String.parse")]
fn string_parse(suite: &mut Suite) -> Result<(), SuiteError> {
    let table: Rc<Cell<Option<Vec<String>>>> = Rc::default();

    let fill = table.clone();
    let options = TestOptions::<()>::new().before(move || {
        fill.set(Some((0..256).map(|i| (i * 7919).to_string()).collect()));
    });
    suite.add_with(
        "parse 256 integers",
        move |_| {
            let values = table.take().unwrap_or_default();
            let sum: u64 = values.iter().filter_map(|s| s.parse::<u64>().ok()).sum();
            black_box(sum);
            table.set(Some(values));
        },
        options,
    )
}

fn main() -> ExitCode {
    ratebench::run()
}
