//! Candidate chains for a match.
//!
//! The full candidate set for `N` players is every permutation of `[0, N)`, in lexicographic
//! order. No symmetry reduction is done: `0 1 2 3` and `2 3 0 1` are distinct candidates. The
//! order matters, since the selector's tie set follows it and a fixed seed only reproduces a
//! schedule if the scan order is the same.
//!
//! Enumeration is `O(N!)` and only meant for small rosters.

use std::collections::HashMap;

use anyhow::bail;
use tracing::debug;

use crate::chain::{Chain, Player};

/// Every permutation of `[0, num_players)`, in lexicographic order.
///
/// Zero players yield no chain, one player yields the single chain `[0]`.
pub fn enumerate_chains(num_players: usize) -> Vec<Chain> {
    if num_players == 0 {
        return vec![];
    }
    let mut chains = Vec::with_capacity(factorial(num_players));
    let mut partial = Vec::with_capacity(num_players);
    let mut used = vec![false; num_players];
    extend_chain(&mut chains, &mut partial, &mut used);
    chains
}

fn extend_chain(chains: &mut Vec<Chain>, partial: &mut Vec<Player>, used: &mut [bool]) {
    if partial.len() == used.len() {
        chains.push(Chain::new(partial.clone()));
        return;
    }
    for player in 0..used.len() {
        if used[player] {
            continue;
        }
        used[player] = true;
        partial.push(player);
        extend_chain(chains, partial, used);
        partial.pop();
        used[player] = false;
    }
}

/// The chains of `chains` whose last player is `benched`, in their original order.
///
/// The returned chains are marked as benched: `benched` sits out and meets nobody.
pub fn bench_filter(chains: &[Chain], benched: Player) -> Vec<Chain> {
    chains
        .iter()
        .filter(|chain| chain.last() == Some(benched))
        .map(|chain| Chain::with_bench(chain.players().to_vec()))
        .collect()
}

/// `n!`, saturating.
pub fn factorial(n: usize) -> usize {
    (1..=n).fold(1usize, |acc, k| acc.saturating_mul(k))
}

/// The chains eligible for one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    num_players: usize,
    benched: Option<Player>,
    chains: Vec<Chain>,
}

impl CandidateSet {
    /// Every chain of `num_players` players.
    pub fn full(num_players: usize) -> Self {
        Self {
            num_players,
            benched: None,
            chains: enumerate_chains(num_players),
        }
    }

    /// The subset of this set whose chains end with `benched`.
    pub fn with_benched(&self, benched: Player) -> Self {
        Self {
            num_players: self.num_players,
            benched: Some(benched),
            chains: bench_filter(&self.chains, benched),
        }
    }

    #[allow(missing_docs)]
    pub fn num_players(&self) -> usize {
        self.num_players
    }

    /// The player every chain of this set ends with, if the set was bench-filtered.
    pub fn benched(&self) -> Option<Player> {
        self.benched
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    #[allow(missing_docs)]
    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    #[allow(missing_docs)]
    pub fn iter(&self) -> std::slice::Iter<'_, Chain> {
        self.chains.iter()
    }
}

/// Candidate sets of one roster, each built at most once per run.
#[derive(Debug)]
pub struct CandidateCache {
    full: CandidateSet,
    benched: HashMap<Player, CandidateSet>,
}

impl CandidateCache {
    /// Enumerates the full set for `num_players`. Bench-filtered sets are built on first use.
    pub fn new(num_players: usize) -> Self {
        let full = CandidateSet::full(num_players);
        debug!(num_players, candidates = full.len(), "enumerated chains");
        Self {
            full,
            benched: HashMap::new(),
        }
    }

    #[allow(missing_docs)]
    pub fn num_players(&self) -> usize {
        self.full.num_players()
    }

    /// Every chain of the roster.
    pub fn full(&self) -> &CandidateSet {
        &self.full
    }

    /// Chains ending with `benched`.
    ///
    /// # Errors
    /// If `benched` is not a player of the roster, or the filtered set is empty.
    pub fn benched(&mut self, benched: Player) -> anyhow::Result<&CandidateSet> {
        let num_players = self.num_players();
        if benched >= num_players {
            bail!("benched player {benched} is outside [0, {num_players})");
        }
        let full = &self.full;
        let set = self.benched.entry(benched).or_insert_with(|| {
            let set = full.with_benched(benched);
            debug!(benched, candidates = set.len(), "filtered chains");
            set
        });
        if set.is_empty() {
            bail!("no chain ends with benched player {benched}");
        }
        Ok(set)
    }

    /// The full set when `benched` is `None`, the filtered set otherwise.
    pub fn get(&mut self, benched: Option<Player>) -> anyhow::Result<&CandidateSet> {
        match benched {
            Some(player) => self.benched(player),
            None => Ok(&self.full),
        }
    }
}
