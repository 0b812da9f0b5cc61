use fair_rotation::{
    chain::{opponent_pair_count, teammate_pair_count},
    configuration::MAX_PLAYERS,
    enumerator::{bench_filter, enumerate_chains, factorial},
    prelude::*,
};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{Level, Metadata};
use tracing_subscriber::{
    fmt,
    layer::{Context, Filter, SubscriberExt},
    Layer, Registry,
};

struct CustomLevelFilter;
impl<S> Filter<S> for CustomLevelFilter {
    fn enabled(&self, meta: &Metadata<'_>, _cx: &Context<'_, S>) -> bool {
        meta.level() != &Level::TRACE
    }
}

/// Debug events of every test go to the captured test output.
fn init_test_logger() {
    let format = tracing_subscriber::fmt::format()
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_target(false);

    let reg = Registry::default().with(
        fmt::layer()
            .event_format(format)
            .with_test_writer()
            .with_filter(CustomLevelFilter),
    );

    let _ = tracing::subscriber::set_global_default(reg);
}

fn nonzero_cells(matrix: &PairMatrix) -> usize {
    matrix.upper_triangle().filter(|&count| count != 0).count()
}

#[test]
fn four_players_single_match() {
    init_test_logger();
    let config = Configuration::new().with_players(4).with_matches(1).with_seed(3);
    let schedule = generate(&config).unwrap();

    assert_eq!(schedule.matches().len(), 1);
    let chain = &schedule.matches()[0].chain;
    assert_eq!(chain.len(), 4);
    assert!(chain.is_permutation_of(4));

    let p = chain.players();
    assert_eq!(nonzero_cells(schedule.teammates()), 2);
    assert_eq!(schedule.teammates().total(), 2);
    assert_eq!(schedule.teammates().get(p[0], p[1]), 1);
    assert_eq!(schedule.teammates().get(p[2], p[3]), 1);

    assert_eq!(nonzero_cells(schedule.opponents()), 4);
    assert_eq!(schedule.opponents().total(), 4);
    for (a, b) in [(p[0], p[2]), (p[0], p[3]), (p[1], p[2]), (p[1], p[3])] {
        assert_eq!(schedule.opponents().get(a, b), 1);
    }
}

#[test]
fn same_seed_same_schedule() {
    init_test_logger();
    let config = Configuration::new().with_players(8).with_matches(3).with_seed(8);
    let first = generate(&config).unwrap();
    let second = generate(&config).unwrap();

    assert_eq!(first.matches().len(), 3);
    assert_eq!(first, second);

    let injected = generate_with(&config, Selector::new(StdRng::seed_from_u64(8))).unwrap();
    assert_eq!(injected, first);
}

#[test]
fn nine_players_benched_session() {
    init_test_logger();
    let config = Configuration::new()
        .with_players(9)
        .with_sessions(1, 1)
        .with_bench(BenchPolicy::Explicit(vec![0]))
        .with_seed(5);
    let schedule = generate(&config).unwrap();

    assert_eq!(schedule.matches().len(), 1);
    let logged = &schedule.matches()[0];
    assert_eq!(logged.chain.len(), 9);
    assert!(logged.chain.is_permutation_of(9));
    assert_eq!(logged.chain.last(), Some(0));
    assert_eq!(logged.benched, Some(0));
    assert_eq!(logged.session, Some(0));

    // the benched player meets nobody
    for other in 1..9 {
        assert_eq!(schedule.teammates().get(0, other), 0);
        assert_eq!(schedule.opponents().get(0, other), 0);
    }
}

#[test]
fn matrix_sums_grow_linearly() {
    init_test_logger();
    let matches = 5;
    for (players, trailing) in [
        (8, TrailingPair::TeammatesOnly),
        (6, TrailingPair::TeammatesOnly),
        (6, TrailingPair::Singles),
        (5, TrailingPair::Singles),
    ] {
        let config = Configuration::new()
            .with_players(players)
            .with_matches(matches)
            .with_trailing(trailing)
            .with_seed(1);
        let schedule = generate(&config).unwrap();

        assert_eq!(
            schedule.teammates().total(),
            (matches * teammate_pair_count(players)) as u64
        );
        assert_eq!(
            schedule.opponents().total(),
            (matches * opponent_pair_count(players, trailing)) as u64,
            "{players} players, {trailing:?}"
        );
    }
}

#[test]
fn bench_filter_sizes() {
    init_test_logger();
    let players = 7;
    let chains = enumerate_chains(players);
    assert_eq!(chains.len(), factorial(players));
    for benched in 0..players {
        let filtered = bench_filter(&chains, benched);
        assert_eq!(filtered.len(), factorial(players - 1));
        assert!(filtered.iter().all(|c| c.last() == Some(benched)));
        assert!(filtered.iter().all(|c| c.benched() == Some(benched)));
    }
}

#[test]
fn benched_player_meets_nobody_for_any_roster() {
    init_test_logger();
    for players in 2..=MAX_PLAYERS {
        let config = Configuration::new()
            .with_players(players)
            .with_sessions(1, 2)
            .with_trailing(TrailingPair::Singles)
            .with_seed(4)
            .with_verbose(false);
        let schedule = generate(&config).unwrap();

        for m in schedule.matches() {
            assert_eq!(m.benched, Some(0));
            assert_eq!(m.chain.benched(), Some(0));
            assert!(m.chain.is_permutation_of(players));
        }
        for other in 1..players {
            assert_eq!(schedule.teammates().get(0, other), 0, "{players} players");
            assert_eq!(schedule.opponents().get(0, other), 0, "{players} players");
        }
        assert_eq!(
            schedule.teammates().total(),
            (2 * teammate_pair_count(players - 1)) as u64,
            "{players} players"
        );
        assert_eq!(
            schedule.opponents().total(),
            (2 * opponent_pair_count(players - 1, TrailingPair::Singles)) as u64,
            "{players} players"
        );
    }
}

#[test]
fn configuration_errors_stop_the_run() {
    init_test_logger();
    let err = generate(&Configuration::new().with_players(1)).unwrap_err();
    assert!(err.to_string().contains("players"));

    let err = generate(
        &Configuration::new()
            .with_players(9)
            .with_sessions(2, 1)
            .with_bench(BenchPolicy::Explicit(vec![3, 12])),
    )
    .unwrap_err();
    assert!(err.to_string().contains("benched player 12"), "{err}");

    let err = generate(&Configuration::new().with_players(11)).unwrap_err();
    assert!(err.to_string().contains("players"));
}
