use criterion::{criterion_group, criterion_main, Criterion};
use engine::{Button, ScenarioConfig, ScreenResolution, ScriptedEngine};
use harness::{run_episodes, ActionSet, NoopObserver, RandomPolicy, RunOptions, Session};
use std::path::PathBuf;

fn config(resolution: ScreenResolution, depth: bool) -> ScenarioConfig {
    ScenarioConfig {
        scenario_path: Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/basic.wad")),
        map: Some("map01".to_string()),
        resolution,
        available_buttons: vec![Button::MoveLeft, Button::MoveRight, Button::Attack],
        episode_timeout: 200,
        episode_start_time: 10,
        living_reward: -1.0,
        depth_buffer_enabled: depth,
        ..Default::default()
    }
}

fn bench_basic_episode(c: &mut Criterion) {
    let mut group = c.benchmark_group("basic_episode");
    for (name, resolution, depth) in [
        ("160x120", ScreenResolution::Res160x120, false),
        ("640x480", ScreenResolution::Res640x480, false),
        ("640x480_depth", ScreenResolution::Res640x480, true),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut policy = RandomPolicy::with_seed(ActionSet::one_hot(3).unwrap(), 7);
                run_episodes(
                    Session::new(ScriptedEngine::new()),
                    config(resolution, depth),
                    &mut policy,
                    &mut NoopObserver,
                    RunOptions::headless(1),
                )
                .unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_basic_episode);
criterion_main!(benches);
