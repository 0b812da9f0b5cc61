//! # Fair Rotation
//!
//! Generates match lineups for a small fixed roster playing repeated 2v2 matches, so that over
//! many matches every pair of players is as evenly spread as possible, both as teammates and as
//! opponents.
//!
//! It provides:
//! - Enumeration of every lineup ("chain") a match could use, see [`enumerator`]
//! - Teammate and opponent count matrices, see [`matrix`]
//! - A dispersion-based fairness cost, see [`cost`]
//! - A greedy selector with a seeded random tie-break, see [`selector`]
//! - Match and session plans with a benched player, see [`schedule`]
//!
//! A chain lists every player once. Players at offsets `(0, 1)`, `(2, 3)`, ... are teammates, and
//! within each group of four consecutive players the two teams face each other. When a player
//! sits out a session, they are placed last in the chain and left out of every pair.
//!
//! Enumeration is factorial in the roster size: rosters of up to
//! [`MAX_PLAYERS`](crate::configuration::MAX_PLAYERS) players are supported, 8 or 9 being the
//! intended use.
//!
//! # Usage Example
//!
//! ```
//! use fair_rotation::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     // 6 matches between 8 players, reproducible thanks to the seed
//!     let config = Configuration::new()
//!         .with_players(8)
//!         .with_matches(6)
//!         .with_seed(42);
//!
//!     let schedule = generate(&config)?;
//!     for m in schedule.matches() {
//!         println!("match {:>3}: {}", m.index, m.chain);
//!     }
//!     println!("teammates:\n{}", schedule.teammates());
//!     println!("opponents:\n{}", schedule.opponents());
//!
//!     assert_eq!(schedule.matches().len(), 6);
//!     assert_eq!(schedule.teammates().total(), 6 * 4);
//!     Ok(())
//! }
//! ```
//!
//! Sessions with a benched player:
//!
//! ```
//! use fair_rotation::prelude::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! // 9 players, 2 sessions of 1 match: player 0 sits out the first, player 1 the second
//! let config = Configuration::new()
//!     .with_players(9)
//!     .with_sessions(2, 1)
//!     .with_seed(1);
//!
//! let schedule = generate(&config)?;
//! assert_eq!(schedule.matches()[0].chain.last(), Some(0));
//! assert_eq!(schedule.matches()[1].chain.last(), Some(1));
//! assert_eq!(schedule.teammates().get(0, 1), 0);
//! # Ok(())
//! # }
//! ```
#![warn(missing_docs)]

pub use anyhow;
pub mod chain;
pub mod configuration;
pub mod cost;
pub mod enumerator;
mod logger;
pub mod matrix;
pub mod schedule;
pub mod selector;

/// Commonly used types and functions for quick access.
///
/// Import this prelude to get started easily:
/// ```rust
/// use fair_rotation::prelude::*;
/// ```
///
/// Includes:
/// - [`Configuration`](crate::configuration::Configuration)
/// - [`generate`](crate::schedule::generate) and [`generate_with`](crate::schedule::generate_with)
/// - [`Schedule`](crate::schedule::Schedule), [`BenchPolicy`](crate::schedule::BenchPolicy)
///   and [`Plan`](crate::schedule::Plan)
/// - [`Chain`](crate::chain::Chain), [`Player`](crate::chain::Player) and
///   [`TrailingPair`](crate::chain::TrailingPair)
/// - [`Selector`](crate::selector::Selector)
pub mod prelude {
    pub use crate::chain::{Chain, Player, TrailingPair};
    pub use crate::configuration::Configuration;
    pub use crate::matrix::{PairCounts, PairMatrix};
    pub use crate::schedule::{generate, generate_with, BenchPolicy, Plan, Schedule};
    pub use crate::selector::Selector;
}
