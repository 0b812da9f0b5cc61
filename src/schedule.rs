//! Building a schedule one greedy match at a time.
//!
//! For each match the [`ScheduleBuilder`] asks its [`Selector`] for the best chain among the
//! candidates of the current session, commits that chain to the live [`PairCounts`] and appends it
//! to the match log. Committed matches are never revisited.
//!
//! A plan is either a flat number of matches played with the whole roster, or a number of
//! sessions in which one player is benched. The benched player of a session is placed last in
//! every chain of that session and takes no part in its pairs, whatever the roster size.

use std::io::Write;

use rand::Rng;
use tracing::{debug, info, instrument};

use crate::{
    chain::{Chain, Player, TrailingPair},
    configuration::Configuration,
    enumerator::CandidateCache,
    logger::init_logger,
    matrix::{PairCounts, PairMatrix},
    selector::Selector,
};

/// Who sits out each session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BenchPolicy {
    /// Session `k` benches player `k mod N`.
    #[default]
    Rotating,
    /// One benched player per session, in session order.
    Explicit(Vec<Player>),
}

impl BenchPolicy {
    /// Benched player of `session`, or `None` if an explicit list is too short.
    pub fn benched_for(&self, session: usize, num_players: usize) -> Option<Player> {
        match self {
            BenchPolicy::Rotating if num_players > 0 => Some(session % num_players),
            BenchPolicy::Rotating => None,
            BenchPolicy::Explicit(players) => players.get(session).copied(),
        }
    }
}

/// How many matches to play, and how they are grouped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// `total` matches with the whole roster.
    Matches(usize),
    /// `sessions` sessions of `matches_per_session` matches, each with a benched player.
    Sessions {
        #[allow(missing_docs)]
        sessions: usize,
        #[allow(missing_docs)]
        matches_per_session: usize,
        #[allow(missing_docs)]
        bench: BenchPolicy,
    },
}

impl Plan {
    /// Number of matches the plan produces.
    pub fn total_matches(&self) -> usize {
        match self {
            Plan::Matches(total) => *total,
            Plan::Sessions {
                sessions,
                matches_per_session,
                ..
            } => sessions * matches_per_session,
        }
    }
}

/// One logged match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Play order, starting at 0.
    pub index: usize,
    /// Session of the match, for session plans.
    pub session: Option<usize>,
    /// Benched player of the session, for session plans.
    pub benched: Option<Player>,
    #[allow(missing_docs)]
    pub chain: Chain,
}

/// A finished run: the match log and the final pair counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    matches: Vec<Match>,
    counts: PairCounts,
}

impl Schedule {
    /// The match log, in play order.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Chains of the match log, in play order.
    pub fn chains(&self) -> impl Iterator<Item = &Chain> + '_ {
        self.matches.iter().map(|m| &m.chain)
    }

    #[allow(missing_docs)]
    pub fn counts(&self) -> &PairCounts {
        &self.counts
    }

    #[allow(missing_docs)]
    pub fn teammates(&self) -> &PairMatrix {
        self.counts.teammates()
    }

    #[allow(missing_docs)]
    pub fn opponents(&self) -> &PairMatrix {
        self.counts.opponents()
    }

    /// Population standard deviation of the final teammate counts.
    pub fn teammate_dispersion(&self) -> f64 {
        self.counts.teammates().dispersion()
    }

    /// Population standard deviation of the final opponent counts.
    pub fn opponent_dispersion(&self) -> f64 {
        self.counts.opponents().dispersion()
    }
}

/// Owns the live history of a run and extends it match by match.
#[derive(Debug)]
pub struct ScheduleBuilder<R: Rng> {
    counts: PairCounts,
    matches: Vec<Match>,
    candidates: CandidateCache,
    selector: Selector<R>,
    verbose: bool,
}

impl<R: Rng> ScheduleBuilder<R> {
    /// Empty history for `num_players` players. Enumerates the full candidate set.
    pub fn new(num_players: usize, trailing: TrailingPair, selector: Selector<R>) -> Self {
        Self {
            counts: PairCounts::new(num_players, trailing),
            matches: vec![],
            candidates: CandidateCache::new(num_players),
            selector,
            verbose: false,
        }
    }

    /// Print a progress line on stdout for every committed match.
    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// The live history.
    pub fn counts(&self) -> &PairCounts {
        &self.counts
    }

    /// Matches played so far.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Selects and commits one match.
    ///
    /// # Errors
    /// If `benched` is not a player of the roster.
    pub fn play_match(
        &mut self,
        session: Option<usize>,
        benched: Option<Player>,
    ) -> anyhow::Result<&Match> {
        let candidates = self.candidates.get(benched)?;
        let chain = self.selector.select(&self.counts, candidates)?.clone();
        self.counts.commit(&chain);

        let index = self.matches.len();
        debug!(index, ?session, ?benched, %chain, "match committed");
        if self.verbose {
            // clear, green, default, start of line
            print!("\x1b[2K\x1b[32mMatch {index}:\x1b[39m {chain}\x1b[0G");
            let _ = std::io::stdout().flush();
        }
        self.matches.push(Match {
            index,
            session,
            benched,
            chain,
        });
        Ok(&self.matches[index])
    }

    /// Plays `count` matches with the whole roster.
    pub fn play_matches(&mut self, count: usize) -> anyhow::Result<()> {
        for _ in 0..count {
            self.play_match(None, None)?;
        }
        Ok(())
    }

    /// Plays `count` matches of `session` with `benched` sitting out.
    pub fn play_session(
        &mut self,
        session: usize,
        benched: Player,
        count: usize,
    ) -> anyhow::Result<()> {
        // fail on a bad bench before any match of the session is played
        self.candidates.benched(benched)?;
        for _ in 0..count {
            self.play_match(Some(session), Some(benched))?;
        }
        Ok(())
    }

    /// Plays every match of `plan`.
    pub fn play_plan(&mut self, plan: &Plan) -> anyhow::Result<()> {
        match plan {
            Plan::Matches(total) => self.play_matches(*total),
            Plan::Sessions {
                sessions,
                matches_per_session,
                bench,
            } => {
                let num_players = self.counts.num_players();
                let benches = (0..*sessions)
                    .map(|session| {
                        bench.benched_for(session, num_players).ok_or_else(|| {
                            anyhow::anyhow!("no benched player given for session {session}")
                        })
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?;
                for benched in &benches {
                    self.candidates.benched(*benched)?;
                }
                for (session, benched) in benches.into_iter().enumerate() {
                    self.play_session(session, benched, *matches_per_session)?;
                }
                Ok(())
            }
        }
    }

    /// Ends the run.
    pub fn finish(self) -> Schedule {
        Schedule {
            matches: self.matches,
            counts: self.counts,
        }
    }
}

/// Validates `config` and generates its schedule.
///
/// Uses `config.seed` when set, entropy otherwise.
///
/// # Errors
/// On any configuration error, before a match is selected.
pub fn generate(config: &Configuration) -> anyhow::Result<Schedule> {
    let selector = match config.seed {
        Some(seed) => Selector::seeded(seed),
        None => Selector::from_entropy(),
    };
    generate_with(config, selector)
}

/// Like [`generate`], with a caller-provided selector.
#[instrument(skip_all)]
pub fn generate_with<R: Rng>(
    config: &Configuration,
    selector: Selector<R>,
) -> anyhow::Result<Schedule> {
    config.validate()?;
    if config.log {
        init_logger()?;
    }
    info!(?config, "generating schedule");
    if config.verbose {
        println!(
            "Generating {} matches for {} players...",
            config.plan.total_matches(),
            config.players
        );
    }

    let mut builder = ScheduleBuilder::new(config.players, config.trailing, selector)
        .with_verbose(config.verbose);
    builder.play_plan(&config.plan)?;
    let schedule = builder.finish();
    if config.verbose {
        println!("\x1b[2K\x1b[32mOk\x1b[0m");
    }

    info!(
        matches = schedule.matches().len(),
        teammate_dispersion = schedule.teammate_dispersion(),
        opponent_dispersion = schedule.opponent_dispersion(),
        "schedule generated"
    );
    Ok(schedule)
}
