use bb84_sim::ProtocolConfig;
use bb84_sim::errors::{ConfigError, SimulationError};
use bb84_sim::protocols::bb84::{self, ProtocolOutcome, matching_positions, sift};
use bb84_sim::record::{ResultRecorder, SimulationRow};
use bb84_sim::report::ProtocolEvent;

fn check_config(eavesdropper: bool) -> ProtocolConfig {
    ProtocolConfig {
        seed: 2024,
        n_tx_bits: 30_000,
        n_check_bits: 20_000,
        key_len: 1_000,
        eavesdropper,
        ..Default::default()
    }
}

#[test]
fn baseline_error_rate_without_eavesdropper() {
    let result = bb84::run(&check_config(false)).unwrap();
    let report = result.outcome.detection().copied().unwrap();

    assert!(!result.outcome.is_aborted());
    assert!((report.error_rate - 0.25).abs() < 0.02, "rate {}", report.error_rate);
    assert!(!report.detected);
    assert!(result.eve_bases.is_none());
}

#[test]
fn intercept_resend_is_detected() {
    let result = bb84::run(&check_config(true)).unwrap();

    let ProtocolOutcome::Aborted(report) = result.outcome else {
        panic!("eavesdropper went unnoticed");
    };
    assert!((report.error_rate - 0.375).abs() < 0.02, "rate {}", report.error_rate);
    assert_eq!(report.check_bits, 20_000);

    // The trace ends at the detection report
    assert!(matches!(
        result.trace.events().last(),
        Some(ProtocolEvent::EavesdropperCheck { detected: true, .. })
    ));
    assert!(result.trace.to_string().contains("Eavesdropper detected! Abort."));
}

#[test]
fn sifted_count_matches_basis_agreement_after_drop() {
    let config = check_config(false);
    let result = bb84::run(&config).unwrap();
    let capacity = *result.outcome.capacity().unwrap();

    let skip = config.n_check_bits;
    let expected: Vec<usize> = (skip..config.n_tx_bits)
        .filter(|&i| result.alice_bases[i] == result.bob_bases[i])
        .collect();
    assert_eq!(capacity.sifted_bits, expected.len());

    let positions: Vec<usize> =
        matching_positions(&result.alice_bases[skip..], &result.bob_bases[skip..])
            .into_iter()
            .map(|i| i + skip)
            .collect();
    assert_eq!(positions, expected);

    // Noiseless channel: sifted bits agree with what Alice sent
    let bob_key = sift(
        &result.bob_results[skip..],
        &result.alice_bases[skip..],
        &result.bob_bases[skip..],
    );
    let alice_key: Vec<bool> = expected.iter().map(|&i| result.alice_bits[i]).collect();
    assert_eq!(bob_key, alice_key);

    assert_eq!(capacity.efficient_bits, capacity.sifted_bits / 3);
    assert_eq!(capacity.key_count, capacity.efficient_bits / 1_000);
}

#[test]
fn keeping_check_bits_sifts_whole_transmission() {
    let config = ProtocolConfig {
        drop_check: false,
        hashed_key: false,
        ..check_config(false)
    };
    let result = bb84::run(&config).unwrap();
    let capacity = result.outcome.capacity().unwrap();

    let expected = matching_positions(&result.alice_bases, &result.bob_bases).len();
    assert_eq!(capacity.sifted_bits, expected);
    assert_eq!(capacity.efficient_bits, expected);
    assert_eq!(capacity.key_count, expected / 1_000);
    assert!(
        !result
            .trace
            .iter()
            .any(|e| matches!(e, ProtocolEvent::CheckBitsDropped { .. }))
    );
}

#[test]
fn disabled_detection_lets_eavesdropped_run_complete() {
    let config = ProtocolConfig {
        eavesdropper_check: false,
        ..check_config(true)
    };
    let result = bb84::run(&config).unwrap();

    assert!(result.outcome.detection().is_none());
    assert_eq!(result.eve_bases.as_ref().map(Vec::len), Some(30_000));
    let capacity = result.outcome.capacity().unwrap();
    assert_eq!(
        capacity.sifted_bits,
        matching_positions(&result.alice_bases, &result.bob_bases).len()
    );
}

#[test]
fn identical_seeds_reproduce_the_run() {
    let config = check_config(false);
    let first = bb84::run(&config).unwrap();
    let second = bb84::run(&config).unwrap();

    assert_eq!(first.alice_bits, second.alice_bits);
    assert_eq!(first.alice_bases, second.alice_bases);
    assert_eq!(first.bob_bases, second.bob_bases);
    assert_eq!(first.bob_results, second.bob_results);
    assert_eq!(first.outcome, second.outcome);
    assert_eq!(first.trace.to_string(), second.trace.to_string());

    let other = bb84::run(&ProtocolConfig { seed: 2025, ..config }).unwrap();
    assert_ne!(first.alice_bits, other.alice_bits);
}

#[test]
fn eavesdropper_bases_drawn_after_receiver_bases() {
    let honest = bb84::run(&check_config(false)).unwrap();
    let config = ProtocolConfig {
        eavesdropper_check: false,
        ..check_config(true)
    };
    let attacked = bb84::run(&config).unwrap();

    // Same seed: the draws shared by both runs come out identical
    assert_eq!(honest.alice_bits, attacked.alice_bits);
    assert_eq!(honest.alice_bases, attacked.alice_bases);
    assert_eq!(honest.bob_bases, attacked.bob_bases);
}

#[test]
fn insufficient_budget_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = ResultRecorder::simulation(dir.path());
    let config = ProtocolConfig {
        n_tx_bits: 100,
        n_check_bits: 200,
        ..Default::default()
    };

    let err = bb84::run(&config).unwrap_err();
    assert!(matches!(
        err,
        SimulationError::Config(ConfigError::TooManyCheckBits {
            check: 200,
            available: 100
        })
    ));
    assert!(!recorder.path().exists());
}

#[test]
fn completed_run_is_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = ResultRecorder::simulation(dir.path());
    let config = check_config(false);

    let result = bb84::run(&config).unwrap();
    let capacity = result.outcome.capacity().unwrap();
    recorder
        .append(&SimulationRow::new(&config, capacity))
        .unwrap();

    let contents = std::fs::read_to_string(recorder.path()).unwrap();
    let mut lines = contents.lines();
    assert!(lines.next().unwrap().starts_with("seed,n_tx_bits,eavesdropper"));
    let row = lines.next().unwrap();
    assert!(row.starts_with("2024,30000,0,1,20000,0.28,1,1000,1,3,"));
    assert!(row.ends_with(&format!(
        "{},{},{}",
        capacity.sifted_bits, capacity.efficient_bits, capacity.key_count
    )));
    assert!(lines.next().is_none());
}
