use super::*;
use crate::render::{port::NullPort, recorder::DrawRecorder};

const VALUES: [i64; 10] = [3, 12, 12, 27, 41, 55, 61, 70, 88, 96];
const BUDGET: u64 = 20_000;

fn pinned(needle: i64) -> SceneConfig {
    SceneConfig {
        values: Some(VALUES.to_vec()),
        needle: Some(needle),
        ..SceneConfig::default()
    }
}

fn starting_at(phase: Phase, needle: i64) -> SceneConfig {
    SceneConfig {
        start_phase: phase.tag().to_owned(),
        ..pinned(needle)
    }
}

fn visited(seq: &Sequencer) -> Vec<Phase> {
    let mut phases = vec![seq.transitions()[0].from];
    phases.extend(seq.transitions().iter().map(|change| change.to));
    phases
}

#[test]
fn start_moves_to_collect_on_first_tick() {
    let mut seq = Sequencer::new(pinned(55)).unwrap();
    assert_eq!(seq.phase(), Phase::Start);
    assert_eq!(seq.tick_index(), TickIndex(0));

    assert_eq!(seq.tick(&mut NullPort).unwrap(), Phase::CollectNumbers);
    assert_eq!(seq.tick_index(), TickIndex(1));
    assert_eq!(
        seq.transitions(),
        &[PhaseChange {
            tick: TickIndex(1),
            from: Phase::Start,
            to: Phase::CollectNumbers,
        }]
    );
}

#[test]
fn tokens_spawn_on_interval_ticks() {
    let mut seq = Sequencer::new(pinned(55)).unwrap();
    for _ in 0..14 {
        seq.tick(&mut NullPort).unwrap();
    }
    assert!(seq.tokens().is_empty());
    seq.tick(&mut NullPort).unwrap();
    assert_eq!(seq.tokens().len(), 1);
    assert_eq!(seq.tokens()[0].value, 3);

    while seq.phase() == Phase::CollectNumbers {
        seq.tick(&mut NullPort).unwrap();
    }
    assert_eq!(seq.tick_index(), TickIndex(150));
    assert_eq!(seq.tokens().len(), TOKEN_COUNT);
    let spread = seq.config().spawn_spread;
    for token in seq.tokens() {
        assert!(token.position.x.abs() <= spread);
        assert!((token.position.y + 50.0).abs() <= spread);
    }
}

#[test]
fn worked_example_finds_needle_at_index_five() {
    let mut seq = Sequencer::new(pinned(55)).unwrap();
    let outcome = seq.run_to_end(&mut NullPort, BUDGET).unwrap();
    assert_eq!(outcome, SearchOutcome::Found { index: 5, value: 55 });

    use Phase::*;
    assert_eq!(
        visited(&seq),
        vec![
            Start,
            CollectNumbers,
            SpawnRandomNumbers,
            SpinNumbersSpinning,
            SpitOut10,
            BsHighLowMidCalc,
            BsRevealMidAndTransition,
            AdjustHighLow,
            AdjustHighLowNums,
            AdjustMid,
            AdjustMidNum,
            BsRevealMidAndTransition,
            AdjustHighLow,
            AdjustHighLowNums,
            AdjustMid,
            AdjustMidNum,
            BsRevealMidAndTransition,
            AdjustHighLow,
            End,
        ]
    );

    let search = seq.search().unwrap();
    assert_eq!((search.low, search.high, search.mid), (5, 6, 5));
    assert_eq!(seq.marker(Pointer::Low).unwrap().readout.incoming, "5");
    assert_eq!(seq.marker(Pointer::High).unwrap().readout.incoming, "6");
    assert_eq!(seq.marker(Pointer::Mid).unwrap().readout.incoming, "5");
}

#[test]
fn absent_needle_ends_not_found() {
    let mut seq = Sequencer::new(pinned(50)).unwrap();
    let outcome = seq.run_to_end(&mut NullPort, BUDGET).unwrap();
    assert_eq!(outcome, SearchOutcome::NotFound { needle: 50 });

    let search = seq.search().unwrap();
    assert!(search.low > search.high);
    assert_eq!(search.is_found, Some(false));
    let last = seq.transitions().last().unwrap();
    assert_eq!((last.from, last.to), (Phase::AdjustHighLow, Phase::End));
}

#[test]
fn end_is_reached_only_from_adjust_high_low() {
    for needle in [-5, 3, 12, 27, 41, 55, 61, 70, 88, 96, 100, 50] {
        let mut seq = Sequencer::new(starting_at(Phase::BsHighLowMidCalc, needle)).unwrap();
        seq.run_to_end(&mut NullPort, BUDGET).unwrap();
        let ends: Vec<_> = seq
            .transitions()
            .iter()
            .filter(|change| change.to == Phase::End)
            .collect();
        assert_eq!(ends.len(), 1, "needle {needle}");
        assert_eq!(ends[0].from, Phase::AdjustHighLow);
        let comparisons = seq
            .transitions()
            .iter()
            .filter(|change| change.to == Phase::AdjustHighLow)
            .count();
        assert!(comparisons <= 4, "needle {needle}: {comparisons} comparisons");
    }
}

#[test]
fn every_recorded_transition_is_a_legal_edge() {
    let mut seq = Sequencer::new(pinned(88)).unwrap();
    seq.run_to_end(&mut NullPort, BUDGET).unwrap();
    for change in seq.transitions() {
        assert!(change.from.successors().contains(&change.to), "{change:?}");
    }
    let ticks: Vec<u64> = seq.transitions().iter().map(|c| c.tick.0).collect();
    assert!(ticks.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn calc_reveals_markers_sixty_ticks_apart() {
    let mut seq = Sequencer::new(starting_at(Phase::BsHighLowMidCalc, 55)).unwrap();
    assert_eq!(seq.phase(), Phase::BsHighLowMidCalc);
    assert!(seq.search().is_some());

    seq.tick(&mut NullPort).unwrap();
    assert!(seq.cache().contains(ProcedureLabel::IndexGrid));
    assert!(seq.cache().contains(ProcedureLabel::NeedleBanner));
    assert!(seq.cache().contains(ProcedureLabel::HighMarker));
    assert!(!seq.cache().contains(ProcedureLabel::LowMarker));

    while seq.tick_index() < TickIndex(60) {
        seq.tick(&mut NullPort).unwrap();
    }
    assert!(!seq.cache().contains(ProcedureLabel::LowMarker));
    seq.tick(&mut NullPort).unwrap();
    assert!(seq.cache().contains(ProcedureLabel::LowMarker));
    assert!(!seq.cache().contains(ProcedureLabel::MidMarker));

    while seq.tick_index() < TickIndex(121) {
        seq.tick(&mut NullPort).unwrap();
    }
    assert!(seq.cache().contains(ProcedureLabel::MidMarker));

    while seq.phase() == Phase::BsHighLowMidCalc {
        seq.tick(&mut NullPort).unwrap();
    }
    assert_eq!(seq.transitions()[0].tick, TickIndex(181));
}

#[test]
fn calc_replays_grid_without_rebuilding() {
    let mut seq = Sequencer::new(starting_at(Phase::BsHighLowMidCalc, 55)).unwrap();
    let mut first = DrawRecorder::new();
    seq.tick(&mut first).unwrap();
    let mut second = DrawRecorder::new();
    seq.tick(&mut second).unwrap();
    assert_eq!(first.commands(), second.commands());
}

#[test]
fn spin_lasts_past_configured_seconds() {
    let mut seq = Sequencer::new(starting_at(Phase::SpinNumbersSpinning, 55)).unwrap();
    while seq.phase() == Phase::SpinNumbersSpinning {
        seq.tick(&mut NullPort).unwrap();
    }
    // 3 seconds at 60 ticks per second, exclusive.
    assert_eq!(seq.transitions()[0].tick, TickIndex(181));
    assert_eq!(seq.phase(), Phase::SpitOut10);
}

#[test]
fn deal_waits_for_container_to_fade() {
    let mut seq = Sequencer::new(starting_at(Phase::SpitOut10, 55)).unwrap();
    while seq.phase() == Phase::SpitOut10 {
        seq.tick(&mut NullPort).unwrap();
    }
    // 255 / 3 ticks of fading at minimum.
    assert!(seq.transitions()[0].tick.0 >= 85);
    for token in seq.tokens() {
        let slot = seq.config().slot_position(token.home_index);
        assert!(points_converged(token.position, slot));
    }
    let homes: Vec<i64> = {
        let mut by_home = seq.tokens().to_vec();
        by_home.sort_by_key(|t| t.home_index);
        by_home.iter().map(|t| t.value).collect()
    };
    assert_eq!(homes, VALUES.to_vec());
}

#[test]
fn end_replays_scene_and_announces_result() {
    let mut seq = Sequencer::new(starting_at(Phase::BsHighLowMidCalc, 55)).unwrap();
    seq.run_to_end(&mut NullPort, BUDGET).unwrap();

    let mut rec = DrawRecorder::new();
    seq.tick(&mut rec).unwrap();
    assert_eq!(seq.phase(), Phase::End);
    let texts: Vec<&str> = rec.texts().collect();
    assert!(texts.contains(&"find 55"));
    assert!(texts.contains(&"found 55 at index 5!"));
    assert!(texts.contains(&"55"));

    let missing = {
        let mut seq = Sequencer::new(starting_at(Phase::BsHighLowMidCalc, 50)).unwrap();
        seq.run_to_end(&mut NullPort, BUDGET).unwrap();
        let mut rec = DrawRecorder::new();
        seq.tick(&mut rec).unwrap();
        rec.texts().map(str::to_owned).collect::<Vec<_>>()
    };
    assert!(missing.iter().any(|t| t == "50 is not in the list"));
}

#[test]
fn revealed_values_accumulate_per_probe() {
    let mut seq = Sequencer::new(starting_at(Phase::BsHighLowMidCalc, 55)).unwrap();
    seq.run_to_end(&mut NullPort, BUDGET).unwrap();
    let mut indices: Vec<usize> = seq.revealed().iter().map(|card| card.index).collect();
    indices.sort_unstable();
    assert_eq!(indices, vec![4, 5, 7]);
    assert!(seq.revealed().iter().all(|card| card.alpha >= 1.0));
}

#[test]
fn reveal_fade_restarts_on_every_loop() {
    let mut seq = Sequencer::new(starting_at(Phase::BsHighLowMidCalc, 55)).unwrap();
    let mut first_alphas = Vec::new();
    let mut previous = seq.phase();
    while !seq.is_finished() {
        seq.tick(&mut NullPort).unwrap();
        if previous != Phase::BsRevealMidAndTransition
            && seq.phase() == Phase::BsRevealMidAndTransition
        {
            // Entry tick: the next tick is the first reveal step.
            seq.tick(&mut NullPort).unwrap();
            match seq.phase_state() {
                PhaseState::RevealMid { fade } => first_alphas.push(fade.value()),
                other => panic!("unexpected {other:?}"),
            }
        }
        previous = seq.phase();
    }
    assert_eq!(first_alphas.len(), 3);
    for alpha in first_alphas {
        assert!((alpha - 0.02).abs() < 1e-12);
    }
}

#[test]
fn identical_configs_draw_identical_runs() {
    let config = SceneConfig {
        seed: 42,
        ..SceneConfig::default()
    };
    let mut a = Sequencer::new(config.clone()).unwrap();
    let mut b = Sequencer::new(config).unwrap();
    let mut rec_a = DrawRecorder::new();
    let mut rec_b = DrawRecorder::new();
    let out_a = a.run_to_end(&mut rec_a, BUDGET).unwrap();
    let out_b = b.run_to_end(&mut rec_b, BUDGET).unwrap();
    assert_eq!(out_a, out_b);
    assert_eq!(a.transitions(), b.transitions());
    assert_eq!(rec_a.fingerprint(), rec_b.fingerprint());
}

#[test]
fn tiny_budget_reports_stuck_phase() {
    let mut seq = Sequencer::new(pinned(55)).unwrap();
    let err = seq.run_to_end(&mut NullPort, 10).unwrap_err();
    assert!(matches!(err, ReelError::Invariant(_)));
    assert!(err.to_string().contains("COLLECT_NUMBERS"));
}

#[test]
fn restart_clears_previous_run() {
    let mut seq = Sequencer::new(pinned(55)).unwrap();
    seq.run_to_end(&mut NullPort, BUDGET).unwrap();

    let replacement = Dataset::from_values(VALUES.to_vec(), 96).unwrap();
    seq.restart_with(replacement).unwrap();
    assert_eq!(seq.phase(), Phase::Start);
    assert_eq!(seq.tick_index(), TickIndex(0));
    assert!(seq.transitions().is_empty());
    assert!(seq.tokens().is_empty());
    assert!(seq.search().is_none());
    assert_eq!(seq.cache().labels().count(), 0);

    let outcome = seq.run_to_end(&mut NullPort, BUDGET).unwrap();
    assert_eq!(outcome, SearchOutcome::Found { index: 9, value: 96 });
}

#[test]
fn reset_draws_a_new_dataset() {
    let mut seq = Sequencer::new(SceneConfig::default()).unwrap();
    let before = seq.dataset().clone();
    seq.reset().unwrap();
    assert_ne!(seq.dataset(), &before);
    assert_eq!(seq.phase(), Phase::Start);
}

#[test]
fn with_dataset_overrides_configured_values() {
    let dataset = Dataset::from_values(VALUES.to_vec(), 3).unwrap();
    let mut seq = Sequencer::with_dataset(SceneConfig::default(), dataset).unwrap();
    assert_eq!(seq.sorted_values(), &VALUES);
    let outcome = seq.run_to_end(&mut NullPort, BUDGET).unwrap();
    assert_eq!(outcome, SearchOutcome::Found { index: 0, value: 3 });
}

#[test]
fn non_entry_start_phase_is_rejected() {
    let err = Sequencer::new(starting_at(Phase::AdjustMid, 55)).unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));

    let config = SceneConfig {
        start_phase: "WARP_SPEED".to_owned(),
        ..SceneConfig::default()
    };
    let err = Sequencer::new(config).unwrap_err();
    assert!(matches!(err, ReelError::UnknownPhase(tag) if tag == "WARP_SPEED"));
}

#[test]
fn deserialized_dataset_drives_a_run_or_is_refused() {
    let short = serde_json::from_str::<Dataset>(r#"{"values":[1,2,3],"needle":2}"#);
    assert!(short.is_err());

    let json = r#"{"values":[3,12,12,27,41,55,61,70,88,96],"needle":70}"#;
    let dataset: Dataset = serde_json::from_str(json).unwrap();
    let mut seq = Sequencer::with_dataset(SceneConfig::default(), dataset.clone()).unwrap();
    let outcome = seq.run_to_end(&mut NullPort, BUDGET).unwrap();
    assert_eq!(outcome, SearchOutcome::Found { index: 7, value: 70 });

    seq.restart_with(dataset).unwrap();
    assert_eq!(seq.tick_index(), TickIndex(0));
}

#[test]
fn anchor_on_rounding_boundary_still_reaches_end() {
    let config = SceneConfig {
        container_anchor: crate::foundation::core::Point::new(0.005, 10.0),
        slot_origin: crate::foundation::core::Point::new(-349.995, 100.005),
        ..pinned(55)
    };
    let mut seq = Sequencer::new(config).unwrap();
    let outcome = seq.run_to_end(&mut NullPort, BUDGET).unwrap();
    assert_eq!(outcome, SearchOutcome::Found { index: 5, value: 55 });
}
