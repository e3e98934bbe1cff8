//! Async suite setup
//!
//! The `before` callback is awaited once before any test in the suite is
//! measured. Returning an error aborts the whole benchmark run.
//!
//! Run with:
//!   cargo run --example array_foreach -p ratebench-demos --release

use ratebench::prelude::*;
use ratebench::BoxError;
use std::cell::RefCell;
use std::hint::black_box;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Duration;

#[suite(name = "Array.forEach")]
fn array_foreach(suite: &mut Suite) -> Result<(), SuiteError> {
    let fixture: Rc<RefCell<Vec<u32>>> = Rc::default();

    let loader = fixture.clone();
    suite.before(move || {
        let loader = loader.clone();
        async move {
            // Stand-in for loading a fixture from disk or the network
            tokio::time::sleep(Duration::from_millis(10)).await;
            loader.borrow_mut().extend(0..4096);
            Ok::<(), BoxError>(())
        }
    })?;

    let data = fixture.clone();
    suite.add("sum", move || {
        let mut total = 0u64;
        data.borrow().iter().for_each(|x| total += u64::from(*x));
        black_box(total);
    })?;

    let data = fixture;
    suite.add("count even", move || {
        let mut even = 0usize;
        data.borrow().iter().for_each(|x| {
            if x % 2 == 0 {
                even += 1;
            }
        });
        black_box(even);
    })
}

fn main() -> ExitCode {
    ratebench::run()
}
