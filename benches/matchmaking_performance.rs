//! Performance benchmarks for matchmaking strategies, rating updates and rounds

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use matchmaking_sim::config::{MatchmakingSettings, SimulationConfig, StrategyKind};
use matchmaking_sim::engine::PlayerRegistry;
use matchmaking_sim::rating::{ExtendedWengLinConfig, MmrEngine, WengLinMmrEngine};
use matchmaking_sim::runner::Runner;
use matchmaking_sim::types::{Game, Lobby, Participant, Player, Queuer, Team};

const STRATEGIES: [StrategyKind; 5] = [
    StrategyKind::Slicing,
    StrategyKind::Random,
    StrategyKind::SortedWindow,
    StrategyKind::Filtered,
    StrategyKind::Fair,
];

/// Queue with ratings spread evenly between 1000 and 3400
fn bench_queue(size: usize) -> Vec<Queuer> {
    (0..size)
        .map(|i| Queuer {
            player_id: format!("player{}", i),
            mmr: 1000.0 + ((i * 7919) % 2400) as f64,
            waited: (i % 50) as u32,
        })
        .collect()
}

fn bench_find_lobby(c: &mut Criterion) {
    let settings = MatchmakingSettings::default();
    let mut group = c.benchmark_group("find_lobby");

    for size in [20, 200, 1000] {
        let queue = bench_queue(size);
        for kind in STRATEGIES {
            let mut strategy = settings.build(kind, 7);
            group.bench_with_input(
                BenchmarkId::new(kind.to_string(), size),
                &queue,
                |b, queue| b.iter(|| strategy.find_lobby(black_box(queue))),
            );
        }
    }
    group.finish();
}

fn bench_weng_lin_update(c: &mut Criterion) {
    let mut registry = PlayerRegistry::new();
    let mut team = |prefix: &str, base: f64| -> Vec<Participant> {
        (0..5)
            .map(|i| {
                let id = format!("{}{}", prefix, i);
                let mmr = base + i as f64 * 25.0;
                registry
                    .register(Player::new(id.clone(), mmr))
                    .expect("fresh registry");
                Participant::new(id, mmr)
            })
            .collect()
    };
    let lobby = Lobby {
        id: 1,
        team_1: team("a", 2100.0),
        team_2: team("b", 2200.0),
    };
    let game = Game::from_lobby(&lobby, 20, Team::Second);
    let mut engine =
        WengLinMmrEngine::new(ExtendedWengLinConfig::default()).expect("default config is valid");

    c.bench_function("weng_lin_game_update", |b| {
        b.iter(|| {
            engine
                .on_game_finished(black_box(&game), &mut registry)
                .expect("all participants registered")
        })
    });
}

fn bench_simulation_rounds(c: &mut Criterion) {
    let mut config = SimulationConfig::default();
    config.simulation.seed = 1;
    let mut group = c.benchmark_group("simulate_1000_rounds");
    group.sample_size(10);

    for kind in STRATEGIES {
        group.bench_function(kind.to_string(), |b| {
            b.iter(|| {
                let mut runner = Runner::from_config(&config, kind).expect("valid config");
                for _ in 0..1000 {
                    runner.engine_mut().one_round().expect("round succeeds");
                }
                black_box(runner.engine().data_store().replays().len())
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_find_lobby,
    bench_weng_lin_update,
    bench_simulation_rounds
);
criterion_main!(benches);
