//! Chains: a single match lineup, encoded positionally.
//!
//! Consecutive players at even offsets `(2k, 2k + 1)` are teammates. Inside every complete group
//! of four consecutive players, each member of the first pair opposes each member of the second
//! pair. A single leftover player (odd lineup length) is never paired with anyone.
//!
//! A benched chain still lists every player, the benched one last, but that last slot is a marker:
//! pairs are only taken from the lineup before it.

use std::{fmt, str::FromStr};

use anyhow::bail;

/// A player identifier in `[0, N)`.
pub type Player = usize;

/// How a trailing pair that does not complete a group of four is counted.
///
/// This only matters when the chain length modulo 4 is 2 or 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingPair {
    /// The trailing pair is counted as teammates and never as opponents.
    #[default]
    TeammatesOnly,
    /// The trailing pair is counted as teammates and also once as opponents (they play a 1v1).
    Singles,
}

impl FromStr for TrailingPair {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "teammates" | "teammates-only" => Ok(TrailingPair::TeammatesOnly),
            "singles" => Ok(TrailingPair::Singles),
            other => bail!("unknown trailing pair policy '{other}' (expected 'teammates' or 'singles')"),
        }
    }
}

/// An ordered lineup of players for one match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chain {
    players: Vec<Player>,
    benched: bool,
}

impl Chain {
    /// Wraps a lineup without checking it. See [`Chain::is_permutation_of`].
    pub fn new(players: Vec<Player>) -> Self {
        Self {
            players,
            benched: false,
        }
    }

    /// Wraps a lineup whose last player sits out the match.
    pub fn with_bench(players: Vec<Player>) -> Self {
        Self {
            players,
            benched: true,
        }
    }

    /// Every player of the chain, the benched one included.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// The players actually playing: every player but the benched one.
    pub fn lineup(&self) -> &[Player] {
        match (self.benched, self.players.split_last()) {
            (true, Some((_, lineup))) => lineup,
            _ => &self.players,
        }
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// The last player of the chain, which is the benched player in a session with a bench.
    pub fn last(&self) -> Option<Player> {
        self.players.last().copied()
    }

    /// The player sitting out, if this is a benched chain.
    pub fn benched(&self) -> Option<Player> {
        if self.benched {
            self.last()
        } else {
            None
        }
    }

    /// True if the chain contains every player of `[0, num_players)` exactly once.
    pub fn is_permutation_of(&self, num_players: usize) -> bool {
        if self.players.len() != num_players {
            return false;
        }
        let mut seen = vec![false; num_players];
        for &player in &self.players {
            if player >= num_players || seen[player] {
                return false;
            }
            seen[player] = true;
        }
        true
    }

    /// Teammate pairs `(lineup[2k], lineup[2k + 1])`, in lineup order.
    pub fn teammate_pairs(&self) -> impl Iterator<Item = (Player, Player)> + '_ {
        self.lineup().chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }

    /// Opponent pairs, in lineup order.
    ///
    /// Each complete group of four yields the cross pairs `0×2, 0×3, 1×2, 1×3`. With
    /// [`TrailingPair::Singles`], a trailing pair left after the last group also yields itself.
    pub fn opponent_pairs(
        &self,
        trailing: TrailingPair,
    ) -> impl Iterator<Item = (Player, Player)> + '_ {
        let groups = self.lineup().chunks_exact(4);
        let tail: &[Player] = match trailing {
            TrailingPair::Singles => groups.remainder(),
            TrailingPair::TeammatesOnly => &[],
        };
        groups
            .flat_map(|g| [(g[0], g[2]), (g[0], g[3]), (g[1], g[2]), (g[1], g[3])])
            .chain(tail.chunks_exact(2).map(|pair| (pair[0], pair[1])))
    }
}

impl From<Vec<Player>> for Chain {
    fn from(players: Vec<Player>) -> Self {
        Self::new(players)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for player in &self.players {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{player}")?;
            first = false;
        }
        Ok(())
    }
}

/// Number of teammate increments a lineup of `len` players contributes.
pub fn teammate_pair_count(len: usize) -> usize {
    len / 2
}

/// Number of opponent increments a lineup of `len` players contributes.
pub fn opponent_pair_count(len: usize, trailing: TrailingPair) -> usize {
    let singles = match trailing {
        TrailingPair::Singles if len % 4 >= 2 => 1,
        _ => 0,
    };
    (len / 4) * 4 + singles
}
