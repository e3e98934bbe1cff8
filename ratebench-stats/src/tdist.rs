//! Student-t critical values
//!
//! Two-sided 95% critical values indexed by degrees of freedom. Beyond 30
//! degrees of freedom the normal approximation (1.96) is used.

/// Critical value used once the table runs out (normal approximation)
pub const T_INFINITY: f64 = 1.96;

const T_TABLE: [f64; 30] = [
    12.706, 4.303, 3.182, 2.776, 2.571, 2.447, 2.365, 2.306, 2.262, 2.228, // 1-10
    2.201, 2.179, 2.16, 2.145, 2.131, 2.12, 2.11, 2.101, 2.093, 2.086, // 11-20
    2.08, 2.074, 2.069, 2.064, 2.06, 2.056, 2.052, 2.048, 2.045, 2.042, // 21-30
];

/// Look up the 95% critical value for `df` degrees of freedom.
///
/// Zero degrees of freedom is treated as one.
pub fn critical_value(df: usize) -> f64 {
    let df = df.max(1);
    T_TABLE.get(df - 1).copied().unwrap_or(T_INFINITY)
}
