//! Formula building blocks shared by the instrument derivations.
//!
//! Every function here is total over finite inputs: derivation never fails
//! and never yields NaN. Unavailability is decided by the normative lookup,
//! not here.

/// Correct responses minus the two error kinds, as used by cancellation
/// and attention subtasks. May go negative.
pub fn net_score(hits: f64, errors: f64, omissions: f64) -> f64 {
    hits - (errors + omissions)
}

/// `numerator / denominator`, rounded to hundredths.
///
/// A zero denominator yields 0 rather than NaN or infinity. Ratio tables are
/// authored at two-decimal resolution, so rounding here is what lets a ratio
/// land inside exactly one table row.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    round_hundredths(numerator / denominator)
}

pub fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
