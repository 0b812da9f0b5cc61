//! Greedy selection of the next chain.
//!
//! Every candidate is scored with [`rounded_cost_of_adding`]. The scan keeps the lowest rounded
//! cost seen so far and the candidates reaching it; a strictly lower cost restarts that tie set.
//! One candidate is then drawn uniformly from the final tie set. This draw is the only
//! randomness of a run and happens exactly once per match.

use anyhow::bail;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::trace;

use crate::{
    chain::Chain, cost::rounded_cost_of_adding, enumerator::CandidateSet, matrix::PairCounts,
};

/// Candidates sharing the lowest rounded cost of a scan.
#[derive(Debug, Clone, PartialEq)]
pub struct TieSet {
    /// The shared rounded cost.
    pub cost: f64,
    /// Indices into the scanned [`CandidateSet`], in scan order.
    pub indices: Vec<usize>,
}

/// Scans `candidates` against `counts` and returns the lowest-cost tie set.
///
/// # Errors
/// If `candidates` is empty.
pub fn best_candidates(counts: &PairCounts, candidates: &CandidateSet) -> anyhow::Result<TieSet> {
    if candidates.is_empty() {
        bail!(
            "candidate set is empty (players: {}, benched: {:?})",
            candidates.num_players(),
            candidates.benched()
        );
    }

    let mut best = f64::INFINITY;
    let mut indices = vec![];
    for (index, chain) in candidates.iter().enumerate() {
        let cost = rounded_cost_of_adding(counts, chain);
        if cost < best {
            best = cost;
            indices.clear();
            indices.push(index);
        } else if cost == best {
            indices.push(index);
        }
    }

    if indices.is_empty() {
        bail!("no candidate has a finite cost");
    }
    Ok(TieSet {
        cost: best,
        indices,
    })
}

/// Maps a random `u64` onto `[0, len)` with a widening multiply, so one draw is always enough.
fn draw_index(random: u64, len: usize) -> usize {
    ((u128::from(random) * len as u128) >> 64) as usize
}

/// Picks the next chain, breaking ties with its own random number generator.
#[derive(Debug)]
pub struct Selector<R: Rng = StdRng> {
    rng: R,
}

impl Selector<StdRng> {
    /// Reproducible selector: the same seed always yields the same choices.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Selector seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> Selector<R> {
    #[allow(missing_docs)]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Returns the chain to play next. Draws exactly one random number.
    ///
    /// # Errors
    /// If `candidates` is empty.
    pub fn select<'c>(
        &mut self,
        counts: &PairCounts,
        candidates: &'c CandidateSet,
    ) -> anyhow::Result<&'c Chain> {
        let ties = best_candidates(counts, candidates)?;
        let pick = draw_index(self.rng.next_u64(), ties.indices.len());
        trace!(cost = ties.cost, ties = ties.indices.len(), pick, "chain selected");
        Ok(&candidates.chains()[ties.indices[pick]])
    }
}
