mod common;

use common::{basic_config, config_with_timeout};
use engine::{
    EngineError, EventKind, GameVariable, ObservationSnapshot, ScenarioConfig, ScriptedEngine,
    ScriptedEvent,
};
use harness::{
    run_episode, run_episodes, Action, ActionSet, ConstantPolicy, EpisodeSummary, FnPolicy,
    FrameObserver, HarnessError, NoopObserver, Pacer, Policy, RandomPolicy, RunOptions, Session,
    StepResult,
};

fn running(engine: ScriptedEngine, config: ScenarioConfig) -> Session<ScriptedEngine> {
    let mut session = Session::new(engine);
    session.configure(config).unwrap();
    session.initialize().unwrap();
    session.start_episode().unwrap();
    session
}

#[derive(Default)]
struct Recorder {
    frames: Vec<u64>,
    rewards: Vec<f64>,
    summaries: Vec<EpisodeSummary>,
}

impl FrameObserver for Recorder {
    fn on_frame(&mut self, _episode: u32, snapshot: &ObservationSnapshot) {
        self.frames.push(snapshot.number);
    }

    fn on_step(&mut self, _episode: u32, _action: &Action, result: &StepResult) {
        self.rewards.push(result.reward);
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) {
        self.summaries.push(summary.clone());
    }
}

#[test]
fn basic_scenario_runs_exactly_two_hundred_ticks() {
    let engine = ScriptedEngine::new();
    let probe = engine.probe();
    let mut session = running(engine, basic_config());
    let attack = Action::from([false, false, true]);

    let mut submissions = 0;
    let mut cumulative = 0.0;
    while !session.is_episode_finished() {
        let _state = session.get_state().unwrap();
        let step = session.submit_action(&attack).unwrap();
        submissions += 1;
        cumulative += step.reward;
    }

    assert_eq!(submissions, 200);
    assert_eq!(cumulative, -200.0);
    assert_eq!(session.total_reward(), -200.0);
    assert_eq!(probe.actions(), 200);
}

#[test]
fn living_reward_accumulates_to_minus_t() {
    for timeout in [1, 7, 50] {
        let mut session = running(ScriptedEngine::new(), config_with_timeout(timeout));
        let mut policy = ConstantPolicy::new([true, false, false]);
        let summary =
            run_episode(&mut session, &mut policy, &mut Pacer::unpaced(), &mut NoopObserver, 1)
                .unwrap();
        assert_eq!(summary.ticks, timeout);
        assert_eq!(summary.total_reward, -f64::from(timeout));
    }
}

#[test]
fn finished_stays_finished_until_next_episode() {
    let mut session = running(ScriptedEngine::new(), config_with_timeout(3));
    for tick in 1..=3 {
        assert!(!session.is_episode_finished());
        let step = session.submit_action(&Action::none(3)).unwrap();
        assert_eq!(step.finished, tick == 3);
        assert_eq!(step.episode_time, tick);
    }
    for _ in 0..3 {
        assert!(session.is_episode_finished());
        assert!(session.get_state().is_err());
    }
    session.start_episode().unwrap();
    assert!(!session.is_episode_finished());
}

#[test]
fn submit_after_finish_fails_without_mutating_anything() {
    let mut session = running(ScriptedEngine::new(), config_with_timeout(2));
    session.submit_action(&Action::none(3)).unwrap();
    session.submit_action(&Action::none(3)).unwrap();
    let reward = session.total_reward();
    let time = session.episode_time();

    let err = session.submit_action(&Action::none(3)).unwrap_err();
    assert!(matches!(err, HarnessError::SessionState(e) if e.operation == "submit_action"));
    assert_eq!(session.total_reward(), reward);
    assert_eq!(session.episode_time(), time);
    assert!(session.is_episode_finished());
}

#[test]
fn channel_count_mismatch_is_rejected() {
    let mut session = running(ScriptedEngine::new(), basic_config());
    let before = session.get_state().unwrap().clone();

    for bad in [vec![true], vec![false, false, true, true], vec![]] {
        let width = bad.len();
        let err = session.submit_action(&Action::new(bad)).unwrap_err();
        assert_eq!(err, HarnessError::ActionLength { expected: 3, actual: width });
    }
    assert_eq!(session.get_state().unwrap(), &before);
    assert_eq!(session.episode_time(), 0);
}

#[test]
fn engine_fault_propagates_and_leaves_episode_running() {
    let engine = ScriptedEngine::new().with_event(ScriptedEvent::every_episode(3, EventKind::Fault));
    let mut session = running(engine, config_with_timeout(10));
    session.submit_action(&Action::none(3)).unwrap();
    session.submit_action(&Action::none(3)).unwrap();
    let err = session.submit_action(&Action::none(3)).unwrap_err();
    assert_eq!(err, HarnessError::Engine(EngineError::StepFailed { tick: 3 }));
    assert!(!session.is_episode_finished());
    assert_eq!(session.episode_time(), 2);
}

#[test]
fn fault_mid_run_still_shuts_down_once() {
    let engine = ScriptedEngine::new().with_event(ScriptedEvent::every_episode(3, EventKind::Fault));
    let probe = engine.probe();
    let mut policy = ConstantPolicy::new([false, false, true]);

    let err = run_episodes(
        Session::new(engine),
        config_with_timeout(10),
        &mut policy,
        &mut NoopObserver,
        RunOptions::headless(4),
    )
    .unwrap_err();

    assert_eq!(err, HarnessError::Engine(EngineError::StepFailed { tick: 3 }));
    assert_eq!(probe.episodes(), 1);
    assert_eq!(probe.actions(), 2);
    assert_eq!(probe.closes(), 1);
}

#[test]
fn n_episodes_means_n_starts_and_one_shutdown() {
    for n in 0..5 {
        let engine = ScriptedEngine::new();
        let probe = engine.probe();
        let mut policy = RandomPolicy::with_seed(ActionSet::one_hot(3).unwrap(), 1);
        let report = run_episodes(
            Session::new(engine),
            config_with_timeout(4),
            &mut policy,
            &mut NoopObserver,
            RunOptions::headless(n),
        )
        .unwrap();

        assert_eq!(probe.inits(), 1);
        assert_eq!(probe.episodes(), n);
        assert_eq!(probe.closes(), 1);
        assert_eq!(report.episodes.len(), n as usize);
        assert_eq!(report.total_ticks(), u64::from(4 * n));
        assert!(!report.cancelled);
    }
}

#[test]
fn configuration_error_in_run_never_starts_engine() {
    let engine = ScriptedEngine::new();
    let probe = engine.probe();
    let mut policy = ConstantPolicy::new([false, false, true]);
    let err = run_episodes(
        Session::new(engine),
        ScenarioConfig { scenario_path: None, ..basic_config() },
        &mut policy,
        &mut NoopObserver,
        RunOptions::headless(3),
    )
    .unwrap_err();
    assert!(matches!(err, HarnessError::Config(_)));
    assert_eq!(probe.inits(), 0);
    assert_eq!(probe.closes(), 0);
}

#[test]
fn terminal_event_ends_episode_before_timeout() {
    let engine = ScriptedEngine::new()
        .with_event(ScriptedEvent::every_episode(4, EventKind::Reward(106.0)))
        .with_event(ScriptedEvent::every_episode(4, EventKind::Terminal));
    let mut session = running(engine, basic_config());
    let mut recorder = Recorder::default();
    let summary = run_episode(
        &mut session,
        &mut ConstantPolicy::new([false, false, true]),
        &mut Pacer::unpaced(),
        &mut recorder,
        1,
    )
    .unwrap();

    assert_eq!(summary.ticks, 4);
    assert_eq!(summary.total_reward, 102.0);
    assert_eq!(recorder.frames, vec![1, 2, 3, 4]);
    assert_eq!(recorder.rewards, vec![-1.0, -1.0, -1.0, 105.0]);
    assert_eq!(recorder.summaries, vec![summary]);
}

#[test]
fn frame_skip_holds_actions_and_stops_at_timeout() {
    let mut session = running(ScriptedEngine::new(), config_with_timeout(10));
    let summary = run_episode(
        &mut session,
        &mut ConstantPolicy::new([false, true, false]),
        &mut Pacer::unpaced(),
        &mut NoopObserver,
        4,
    )
    .unwrap();
    assert_eq!(summary.ticks, 10);
    assert_eq!(summary.submissions, 3);
    assert_eq!(summary.total_reward, -10.0);
}

#[test]
fn zero_tics_is_rejected() {
    let mut session = running(ScriptedEngine::new(), basic_config());
    assert_eq!(
        session.submit_action_for(&Action::none(3), 0),
        Err(HarnessError::ZeroTics)
    );
    assert_eq!(session.episode_time(), 0);
}

#[test]
fn policy_sees_configured_game_variables() {
    let config = ScenarioConfig {
        available_game_variables: vec![GameVariable::PositionX, GameVariable::Ammo2],
        ..config_with_timeout(5)
    };
    let mut session = running(ScriptedEngine::new(), config);
    let mut seen = Vec::new();
    let mut policy = FnPolicy::new("strafe-right", |snapshot: &ObservationSnapshot| {
        seen.push(snapshot.game_variables.values());
        Action::from([false, true, true])
    });
    assert_eq!(policy.name(), "strafe-right");
    run_episode(&mut session, &mut policy, &mut Pacer::unpaced(), &mut NoopObserver, 1).unwrap();
    drop(policy);

    assert_eq!(seen.len(), 5);
    assert_eq!(seen[0], vec![0.0, 50.0]);
    assert_eq!(seen[4], vec![4.0, 46.0]);
}

#[test]
fn seeded_random_policy_is_reproducible() {
    let run = |seed| {
        let mut session = running(ScriptedEngine::new(), config_with_timeout(30));
        let mut policy = RandomPolicy::with_seed(ActionSet::one_hot(3).unwrap(), seed);
        let mut chosen = Vec::new();
        while !session.is_episode_finished() {
            let action = policy.choose_action(session.get_state().unwrap());
            session.submit_action(&action).unwrap();
            chosen.push(action);
        }
        chosen
    };
    let a = run(42);
    assert_eq!(a, run(42));
    let menu = ActionSet::one_hot(3).unwrap();
    assert!(a.iter().all(|action| menu.iter().any(|m| m == action)));
}

#[test]
fn cancelled_run_stops_at_episode_boundary() {
    let engine = ScriptedEngine::new();
    let probe = engine.probe();
    let pacer = Pacer::unpaced();
    let token = pacer.cancel_token();

    struct CancelAfterFirst(harness::CancelToken);
    impl FrameObserver for CancelAfterFirst {
        fn on_episode_end(&mut self, _summary: &EpisodeSummary) {
            self.0.cancel();
        }
    }

    let report = run_episodes(
        Session::new(engine),
        config_with_timeout(6),
        &mut ConstantPolicy::new([true, false, false]),
        &mut CancelAfterFirst(token),
        RunOptions { episodes: 5, frame_skip: 1, pacer },
    )
    .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.episodes.len(), 1);
    assert_eq!(report.episodes[0].ticks, 6);
    assert_eq!(probe.closes(), 1);
}

#[test]
fn report_serializes_to_json() {
    let mut policy = ConstantPolicy::new([false, false, true]);
    let report = run_episodes(
        Session::new(ScriptedEngine::new()),
        config_with_timeout(3),
        &mut policy,
        &mut NoopObserver,
        RunOptions::headless(2),
    )
    .unwrap();
    assert_eq!(report.mean_reward(), Some(-3.0));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["map"], "map01");
    assert_eq!(json["policy"], "constant");
    assert_eq!(json["episodes"].as_array().unwrap().len(), 2);
    assert_eq!(json["episodes"][1]["episode"], 2);
}

#[test]
fn huge_episode_count_with_cancelled_token_returns_empty_report() {
    let engine = ScriptedEngine::new();
    let probe = engine.probe();
    let pacer = Pacer::unpaced();
    pacer.cancel_token().cancel();

    let report = run_episodes(
        Session::new(engine),
        basic_config(),
        &mut ConstantPolicy::new([false, false, true]),
        &mut NoopObserver,
        RunOptions { episodes: u32::MAX, frame_skip: 1, pacer },
    )
    .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.episodes_requested, u32::MAX);
    assert!(report.episodes.is_empty());
    assert_eq!(probe.inits(), 1);
    assert_eq!(probe.episodes(), 0);
    assert_eq!(probe.closes(), 1);
}

/// Records submitted actions and optionally cancels a token after `cancel_at`
/// steps.
struct ActionLog {
    actions: Vec<Action>,
    cancel: Option<(harness::CancelToken, usize)>,
}

impl FrameObserver for ActionLog {
    fn on_step(&mut self, _episode: u32, action: &Action, _result: &StepResult) {
        self.actions.push(action.clone());
        if let Some((token, at)) = &self.cancel {
            if self.actions.len() == *at {
                token.cancel();
            }
        }
    }
}

fn seeded_episode(mut pacer: Pacer, cancel_at: Option<usize>) -> (EpisodeSummary, Vec<Action>) {
    let mut session = running(ScriptedEngine::new(), config_with_timeout(30));
    let mut policy = RandomPolicy::with_seed(ActionSet::one_hot(3).unwrap(), 99);
    let mut log = ActionLog {
        actions: Vec::new(),
        cancel: cancel_at.map(|at| (pacer.cancel_token(), at)),
    };
    let summary = run_episode(&mut session, &mut policy, &mut pacer, &mut log, 1).unwrap();
    (summary, log.actions)
}

#[test]
fn pacing_does_not_change_what_is_played() {
    let unpaced = seeded_episode(Pacer::unpaced(), None);
    let paced = seeded_episode(Pacer::real_time(1000), None);
    assert_eq!(paced, unpaced);
    assert_eq!(unpaced.0.ticks, 30);
    assert_eq!(unpaced.0.total_reward, -30.0);

    // Cancelling mid-episode only stops the waiting.
    let interrupted = seeded_episode(Pacer::real_time(1000), Some(10));
    assert_eq!(interrupted, unpaced);
}
