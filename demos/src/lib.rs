//! RateBench Examples
//!
//! Runnable demonstrations of RateBench suites. This crate is not
//! published; it exists solely to host examples that depend on `ratebench`.
//!
//! Run any example with:
//! ```sh
//! cargo run --example <name> -p ratebench-demos --release
//! ```
//!
//! Record a baseline, then compare against it:
//! ```sh
//! cargo run --example array_map -p ratebench-demos --release -- --profile-out target/profile.json
//! cargo run --example array_map -p ratebench-demos --release -- --profile target/profile.json
//! ```
//!
//! | Example | Feature |
//! |---------|---------|
//! | `array_map` | Plain tests registered with `#[suite]` |
//! | `array_foreach` | Async suite setup with `suite.before(..)` |
//! | `data_generation` | `before` hooks and pooled test data |
