//! Fairness cost of adding a chain to the history.
//!
//! The cost is the sum of the dispersions (population standard deviation of the strict upper
//! triangle) of the teammate and opponent matrices once the chain is added. Minimizing it pushes
//! both relations toward a uniform distribution at the same time.

use crate::{chain::Chain, matrix::PairCounts};

/// Cost of `chain` if it were played next. `counts` is left untouched.
pub fn cost_of_adding(counts: &PairCounts, chain: &Chain) -> f64 {
    let mut hypothetical = counts.clone();
    hypothetical.apply(chain);
    hypothetical.teammates().dispersion() + hypothetical.opponents().dispersion()
}

/// Rounds half-up to two decimals: `floor(x * 100 + 0.5) / 100`.
///
/// Costs are compared after rounding, so floating point noise collapses into ties.
pub fn round_cost(cost: f64) -> f64 {
    (cost * 100.0 + 0.5).floor() / 100.0
}

/// [`cost_of_adding`] followed by [`round_cost`].
pub fn rounded_cost_of_adding(counts: &PairCounts, chain: &Chain) -> f64 {
    round_cost(cost_of_adding(counts, chain))
}
