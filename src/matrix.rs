//! Pairwise count matrices.
//!
//! A [`PairMatrix`] counts how often each unordered pair of players met in one relation. Only
//! the strict upper triangle (`i < j`) is ever written or read. [`PairCounts`] bundles the
//! teammate and opponent matrices of a run and is the only place chains are committed.

use std::fmt;

use crate::chain::{Chain, Player, TrailingPair};

/// Square table of pair counts, populated in the strict upper triangle only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairMatrix {
    size: usize,
    counts: Vec<u32>,
}

impl PairMatrix {
    /// A `size`×`size` matrix of zeros.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            counts: vec![0; size * size],
        }
    }

    /// Number of players (rows).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Count for the unordered pair `{a, b}`. Always 0 on the diagonal.
    pub fn get(&self, a: Player, b: Player) -> u32 {
        let (i, j) = (a.min(b), a.max(b));
        self.counts[i * self.size + j]
    }

    /// Increments the unordered pair `{a, b}`.
    ///
    /// # Panics
    /// If `a == b` or either player is out of range: a chain produced such a pair, which is a bug.
    pub(crate) fn increment(&mut self, a: Player, b: Player) {
        let (i, j) = (a.min(b), a.max(b));
        assert!(
            i < j && j < self.size,
            "pair ({a}, {b}) is outside the strict upper triangle of a {0}x{0} matrix",
            self.size
        );
        self.counts[i * self.size + j] += 1;
    }

    /// Values of the strict upper triangle, row by row.
    pub fn upper_triangle(&self) -> impl Iterator<Item = u32> + '_ {
        let size = self.size;
        let counts = &self.counts;
        (0..size).flat_map(move |i| counts[i * size + i + 1..(i + 1) * size].iter().copied())
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.upper_triangle().map(u64::from).sum()
    }

    /// Population standard deviation of the strict upper triangle.
    ///
    /// Returns 0 when the matrix has no upper entries (fewer than two players).
    pub fn dispersion(&self) -> f64 {
        let entries = self.size * self.size.saturating_sub(1) / 2;
        if entries == 0 {
            return 0.0;
        }
        let entries = entries as f64;
        let mean = self.upper_triangle().map(f64::from).sum::<f64>() / entries;
        let variance = self
            .upper_triangle()
            .map(|count| (f64::from(count) - mean).powi(2))
            .sum::<f64>()
            / entries;
        variance.sqrt()
    }

    /// Full rows, lower triangle and diagonal included (always zero).
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> + '_ {
        self.counts.chunks_exact(self.size.max(1))
    }
}

impl fmt::Display for PairMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for count in row {
                write!(f, "{count:>3}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Teammate and opponent history of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairCounts {
    teammates: PairMatrix,
    opponents: PairMatrix,
    trailing: TrailingPair,
}

impl PairCounts {
    /// Empty history for `num_players` players.
    pub fn new(num_players: usize, trailing: TrailingPair) -> Self {
        Self {
            teammates: PairMatrix::new(num_players),
            opponents: PairMatrix::new(num_players),
            trailing,
        }
    }

    #[allow(missing_docs)]
    pub fn num_players(&self) -> usize {
        self.teammates.size()
    }

    #[allow(missing_docs)]
    pub fn teammates(&self) -> &PairMatrix {
        &self.teammates
    }

    #[allow(missing_docs)]
    pub fn opponents(&self) -> &PairMatrix {
        &self.opponents
    }

    /// Trailing-pair policy applied when a chain is added.
    pub fn trailing(&self) -> TrailingPair {
        self.trailing
    }

    /// Adds a played match to the history.
    ///
    /// # Panics
    /// If `chain` is not a permutation of every player.
    pub fn commit(&mut self, chain: &Chain) {
        assert!(
            chain.is_permutation_of(self.num_players()),
            "chain [{chain}] is not a permutation of {} players",
            self.num_players()
        );
        self.apply(chain);
    }

    /// Applies the pair increments of `chain` without checking it.
    pub(crate) fn apply(&mut self, chain: &Chain) {
        for (a, b) in chain.teammate_pairs() {
            self.teammates.increment(a, b);
        }
        for (a, b) in chain.opponent_pairs(self.trailing) {
            self.opponents.increment(a, b);
        }
    }
}

#[cfg(test)]
mod matrix_tests {
    use super::*;

    fn nonzero(matrix: &PairMatrix) -> Vec<(Player, Player, u32)> {
        let mut cells = vec![];
        for i in 0..matrix.size() {
            for j in i + 1..matrix.size() {
                if matrix.get(i, j) != 0 {
                    cells.push((i, j, matrix.get(i, j)));
                }
            }
        }
        cells
    }

    #[test]
    fn commit_touches_only_chain_pairs() {
        let mut counts = PairCounts::new(4, TrailingPair::TeammatesOnly);
        counts.commit(&Chain::new(vec![0, 1, 2, 3]));

        assert_eq!(nonzero(counts.teammates()), vec![(0, 1, 1), (2, 3, 1)]);
        assert_eq!(
            nonzero(counts.opponents()),
            vec![(0, 2, 1), (0, 3, 1), (1, 2, 1), (1, 3, 1)]
        );
    }

    #[test]
    fn unordered_pairs_land_in_upper_triangle() {
        let mut counts = PairCounts::new(4, TrailingPair::TeammatesOnly);
        counts.commit(&Chain::new(vec![3, 1, 2, 0]));
        counts.commit(&Chain::new(vec![1, 3, 0, 2]));

        assert_eq!(counts.teammates().get(1, 3), 2);
        assert_eq!(counts.teammates().get(3, 1), 2);
        assert_eq!(counts.teammates().get(0, 2), 2);
        for row in 0..4 {
            for col in 0..=row {
                assert_eq!(counts.teammates().rows().nth(row).unwrap()[col], 0);
            }
        }
    }

    #[test]
    fn singles_counts_trailing_pair_as_opponents() {
        let chain = Chain::new(vec![0, 1, 2, 3, 4, 5]);

        let mut counts = PairCounts::new(6, TrailingPair::TeammatesOnly);
        counts.commit(&chain);
        assert_eq!(counts.teammates().get(4, 5), 1);
        assert_eq!(counts.opponents().get(4, 5), 0);
        assert_eq!(counts.opponents().total(), 4);

        let mut counts = PairCounts::new(6, TrailingPair::Singles);
        counts.commit(&chain);
        assert_eq!(counts.opponents().get(4, 5), 1);
        assert_eq!(counts.opponents().total(), 5);
    }

    #[test]
    #[should_panic(expected = "not a permutation")]
    fn commit_rejects_repeated_player() {
        let mut counts = PairCounts::new(4, TrailingPair::TeammatesOnly);
        counts.commit(&Chain::new(vec![0, 0, 1, 2]));
    }

    #[test]
    #[should_panic(expected = "strict upper triangle")]
    fn diagonal_increment_is_fatal() {
        let mut matrix = PairMatrix::new(3);
        matrix.increment(1, 1);
    }

    #[test]
    fn dispersion_is_population_std_dev() {
        assert_eq!(PairMatrix::new(5).dispersion(), 0.0);
        assert_eq!(PairMatrix::new(1).dispersion(), 0.0);

        let mut matrix = PairMatrix::new(4);
        matrix.increment(0, 1);
        matrix.increment(2, 3);
        // values {1, 0, 0, 0, 0, 1}: mean 1/3, variance 2/9
        let expected = (2.0f64 / 9.0).sqrt();
        assert!((matrix.dispersion() - expected).abs() < 1e-12);

        let mut uniform = PairMatrix::new(3);
        for (a, b) in [(0, 1), (0, 2), (1, 2)] {
            uniform.increment(a, b);
        }
        assert_eq!(uniform.dispersion(), 0.0);
    }

    #[test]
    fn display_prints_full_grid() {
        let mut matrix = PairMatrix::new(3);
        matrix.increment(2, 0);
        assert_eq!(matrix.to_string(), "  0  0  1\n  0  0  0\n  0  0  0\n");
    }
}
