//! Config for a schedule run
//!
//! This module provides the parameters of a run: roster size, how many matches (or sessions) to
//! play, who sits out each session, the random seed and how trailing pairs are counted.
//!
//! Configuration can be created programmatically using [`Configuration::new()`] or by reading
//! environment variables using [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! All values are optional. Flags are case-insensitive, set them to `"true"` to enable.
//!
//! - `ROTATION_PLAYERS`: Roster size (default: `8`)
//! - `ROTATION_MATCHES`: Total matches, ignored when sessions are used (default: `114`)
//! - `ROTATION_SESSIONS`: Number of sessions; enables the session plan
//! - `ROTATION_MATCHES_PER_SESSION`: Matches per session (default: `1`)
//! - `ROTATION_BENCH`: Comma-separated benched player per session (default: rotating)
//! - `ROTATION_SEED`: Random seed (default: seeded from the OS)
//! - `ROTATION_TRAILING`: `teammates` or `singles` (default: `teammates`)
//! - `ROTATION_REQUIRE_OPPONENTS`: Reject rosters too small to have opponents (default: `false`)
//! - `ROTATION_LOG`: Enable logging to a file (default: `false`)
//! - `ROTATION_VERBOSE`: Print progress on stdout (default: `true`)

use std::{env, str::FromStr};

use anyhow::{bail, Context};
use tracing::warn;

use crate::{
    chain::{Player, TrailingPair},
    schedule::{BenchPolicy, Plan},
};

/// Largest supported roster. Enumeration is factorial in the roster size.
pub const MAX_PLAYERS: usize = 9;

/// Default roster size.
pub const DEFAULT_PLAYERS: usize = 8;

/// Default number of matches of a flat plan.
pub const DEFAULT_MATCHES: usize = 38 * 3;

/// Configuration of a schedule run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub(crate) players: usize,
    pub(crate) plan: Plan,
    pub(crate) seed: Option<u64>,
    pub(crate) trailing: TrailingPair,
    pub(crate) require_opponents: bool,
    pub(crate) log: bool,
    pub(crate) verbose: bool,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - 8 players play 114 matches with the whole roster.
    /// - The random generator is seeded from the operating system.
    /// - A trailing pair counts as teammates only.
    /// - Rosters of 2 or 3 players (no opponents) are accepted.
    /// - Logging to file is disabled.
    /// - Progress is printed on stdout.
    pub fn new() -> Self {
        Self {
            players: DEFAULT_PLAYERS,
            plan: Plan::Matches(DEFAULT_MATCHES),
            seed: None,
            trailing: TrailingPair::default(),
            require_opponents: false,
            log: false,
            verbose: true,
        }
    }

    /// Create configuration from environment variables (see module documentation).
    ///
    /// # Errors
    /// If a variable is set to a value that does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        fn get_env_flag(var: &str, default: bool) -> bool {
            match env::var(var) {
                Ok(val) => val.eq_ignore_ascii_case("true"),
                Err(_) => default,
            }
        }

        fn parse_var<T>(var: &str) -> anyhow::Result<Option<T>>
        where
            T: FromStr,
            T::Err: std::error::Error + Send + Sync + 'static,
        {
            match env::var(var) {
                Ok(val) => val
                    .trim()
                    .parse()
                    .map(Some)
                    .with_context(|| format!("invalid value '{val}' for {var}")),
                Err(_) => Ok(None),
            }
        }

        let mut config = Self::new();
        if let Some(players) = parse_var("ROTATION_PLAYERS")? {
            config.players = players;
        }

        config.plan = match parse_var("ROTATION_SESSIONS")? {
            Some(sessions) => {
                let matches_per_session = parse_var("ROTATION_MATCHES_PER_SESSION")?.unwrap_or(1);
                let bench = match env::var("ROTATION_BENCH") {
                    Ok(list) => BenchPolicy::Explicit(
                        parse_player_list(&list).context("invalid value for ROTATION_BENCH")?,
                    ),
                    Err(_) => BenchPolicy::Rotating,
                };
                Plan::Sessions {
                    sessions,
                    matches_per_session,
                    bench,
                }
            }
            None => Plan::Matches(parse_var("ROTATION_MATCHES")?.unwrap_or(DEFAULT_MATCHES)),
        };

        config.seed = parse_var("ROTATION_SEED")?;
        if let Ok(trailing) = env::var("ROTATION_TRAILING") {
            config.trailing = trailing
                .parse()
                .context("invalid value for ROTATION_TRAILING")?;
        }
        config.require_opponents = get_env_flag("ROTATION_REQUIRE_OPPONENTS", false);
        config.log = get_env_flag("ROTATION_LOG", false);
        config.verbose = get_env_flag("ROTATION_VERBOSE", true);
        Ok(config)
    }

    /// Set the roster size.
    pub fn with_players(mut self, players: usize) -> Self {
        self.players = players;
        self
    }

    /// Play `total` matches with the whole roster.
    pub fn with_matches(mut self, total: usize) -> Self {
        self.plan = Plan::Matches(total);
        self
    }

    /// Play `sessions` sessions of `matches_per_session` matches, benching player
    /// `session mod N` in each.
    pub fn with_sessions(mut self, sessions: usize, matches_per_session: usize) -> Self {
        self.plan = Plan::Sessions {
            sessions,
            matches_per_session,
            bench: BenchPolicy::Rotating,
        };
        self
    }

    /// Set who sits out each session.
    ///
    /// Ignored unless [`with_sessions`](Self::with_sessions) was called first.
    pub fn with_bench(mut self, policy: BenchPolicy) -> Self {
        if let Plan::Sessions { bench, .. } = &mut self.plan {
            *bench = policy;
        } else {
            warn!("`with_bench` is ignored without sessions, call `with_sessions` first!");
        }
        self
    }

    /// Seed the tie-break generator for a reproducible schedule.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set how a trailing pair (chain length not a multiple of 4) is counted.
    pub fn with_trailing(mut self, trailing: TrailingPair) -> Self {
        self.trailing = trailing;
        self
    }

    /// Reject rosters with fewer than 4 players, which never produce opponents.
    pub fn with_require_opponents(mut self, value: bool) -> Self {
        self.require_opponents = value;
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// Enable or disable progress output on stdout.
    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    #[allow(missing_docs)]
    pub fn players(&self) -> usize {
        self.players
    }

    #[allow(missing_docs)]
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    #[allow(missing_docs)]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    #[allow(missing_docs)]
    pub fn trailing(&self) -> TrailingPair {
        self.trailing
    }

    #[allow(missing_docs)]
    pub fn log(&self) -> bool {
        self.log
    }

    #[allow(missing_docs)]
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Checks every parameter.
    ///
    /// # Errors
    /// Names the first invalid parameter.
    pub fn validate(&self) -> anyhow::Result<()> {
        let players = self.players;
        if players < 2 {
            bail!("players must be at least 2, got {players}");
        }
        if players > MAX_PLAYERS {
            bail!("players must be at most {MAX_PLAYERS}, got {players}");
        }
        if self.require_opponents && players < 4 {
            bail!("players must be at least 4 when opponents are required, got {players}");
        }

        if let Plan::Sessions {
            sessions,
            matches_per_session,
            bench,
        } = &self.plan
        {
            if *matches_per_session == 0 {
                bail!("matches_per_session must be at least 1");
            }
            if let BenchPolicy::Explicit(benched) = bench {
                if benched.len() != *sessions {
                    bail!(
                        "bench list has {} players for {sessions} sessions",
                        benched.len()
                    );
                }
                if let Some((session, player)) =
                    benched.iter().enumerate().find(|(_, player)| **player >= players)
                {
                    bail!(
                        "benched player {player} of session {session} is outside [0, {players})"
                    );
                }
            }
        }
        Ok(())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_player_list(list: &str) -> anyhow::Result<Vec<Player>> {
    list.split(',')
        .map(|item| {
            let item = item.trim();
            item.parse()
                .with_context(|| format!("could not parse player '{item}'"))
        })
        .collect()
}
