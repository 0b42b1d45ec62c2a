//! BB84 Quantum Key Distribution Protocol.
//!
//! A run walks a fixed sequence of stages:
//!
//! ```text
//! GENERATE -> TRANSMIT -> (INTERCEPT) -> RECEIVE -> DETECT -> SIFT -> DERIVE
//!                                                     \
//!                                                      -> ABORTED
//! ```
//!
//! Every random draw comes from one `ChaCha8Rng` seeded with
//! [`ProtocolConfig::seed`]: first the sender's bits, then the sender's
//! bases, the receiver's bases and, with an eavesdropper, her bases. The
//! same stream then feeds every qubit measurement, so a run is fully
//! reproducible from its seed.

use crate::config::ProtocolConfig;
use crate::core::errors::SimulationError;
use crate::core::{Basis, QuantumChannel};
use crate::protocols::qkd::capacity::KeyCapacity;
use crate::report::{EventTrace, ProtocolEvent};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Result of comparing the leading check bits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionReport {
    /// Number of compared positions.
    pub check_bits: usize,
    /// Positions where the received bit differs from the sent one.
    pub mismatches: usize,
    /// `mismatches / check_bits`.
    pub error_rate: f64,
    /// Threshold the error rate was compared against.
    pub threshold: f64,
    /// Whether `error_rate` exceeded `threshold`.
    pub detected: bool,
}

/// Final state of a run.
#[derive(Clone, Debug, PartialEq)]
pub enum ProtocolOutcome {
    /// The eavesdropper check failed; no key material is produced.
    Aborted(DetectionReport),
    /// The run reached key derivation.
    Completed {
        detection: Option<DetectionReport>,
        capacity: KeyCapacity,
    },
}

impl ProtocolOutcome {
    pub fn is_aborted(&self) -> bool {
        matches!(self, ProtocolOutcome::Aborted(_))
    }

    pub fn capacity(&self) -> Option<&KeyCapacity> {
        match self {
            ProtocolOutcome::Completed { capacity, .. } => Some(capacity),
            ProtocolOutcome::Aborted(_) => None,
        }
    }

    pub fn detection(&self) -> Option<&DetectionReport> {
        match self {
            ProtocolOutcome::Aborted(report) => Some(report),
            ProtocolOutcome::Completed { detection, .. } => detection.as_ref(),
        }
    }
}

/// BB84 results
#[derive(Clone, Debug)]
pub struct BB84Result {
    pub outcome: ProtocolOutcome,
    pub trace: EventTrace,
    pub alice_bits: Vec<bool>,
    pub alice_bases: Vec<Basis>,
    pub bob_bases: Vec<Basis>,
    /// Present only when an eavesdropper was modeled.
    pub eve_bases: Option<Vec<Basis>>,
    pub bob_results: Vec<bool>,
}

/// Runs BB84 protocol
///
/// # Errors
///
/// Returns [`SimulationError::Config`] when the configuration cannot pay
/// for the check bits and one key; nothing is simulated in that case.
/// Eavesdropper detection is reported as [`ProtocolOutcome::Aborted`],
/// not as an error.
pub fn run(config: &ProtocolConfig) -> Result<BB84Result, SimulationError> {
    config.validate()?;

    let n = config.n_tx_bits;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut trace = EventTrace::new();
    let channel = QuantumChannel::new();

    tracing::debug!(seed = config.seed, n_tx_bits = n, "generating bits and bases");
    let alice_bits: Vec<bool> = (0..n).map(|_| rng.random_bool(0.5)).collect();
    let alice_bases = random_bases(&mut rng, n);
    let bob_bases = random_bases(&mut rng, n);
    let eve_bases = config.eavesdropper.then(|| random_bases(&mut rng, n));

    // Alice sends qubits to Bob
    let mut qubits = channel.transmit(&alice_bits, &alice_bases)?;
    trace.push(ProtocolEvent::Transmitted { bits: qubits.len() });

    // Eavesdropper intercepts and re-sends in her own bases
    if let Some(eve_bases) = &eve_bases {
        let (forwarded, _) = channel.intercept_resend(&mut qubits, eve_bases, &mut rng)?;
        qubits = forwarded;
        trace.push(ProtocolEvent::Intercepted { bits: qubits.len() });
    }

    // Bob measures
    let bob_results = channel.receive(&mut qubits, &bob_bases, &mut rng)?;
    trace.push(ProtocolEvent::Received {
        bits: bob_results.len(),
    });

    let detection = if config.eavesdropper_check {
        let report = check_eavesdropper(
            &alice_bits,
            &bob_results,
            config.n_check_bits,
            config.expected_error,
        );
        trace.push(ProtocolEvent::EavesdropperCheck {
            check_bits: report.check_bits,
            error_rate: report.error_rate,
            threshold: report.threshold,
            detected: report.detected,
        });
        Some(report)
    } else {
        None
    };

    if let Some(report) = detection.filter(|r| r.detected) {
        tracing::warn!(
            error_rate = report.error_rate,
            threshold = report.threshold,
            "eavesdropper detected, aborting run"
        );
        return Ok(BB84Result {
            outcome: ProtocolOutcome::Aborted(report),
            trace,
            alice_bits,
            alice_bases,
            bob_bases,
            eve_bases,
            bob_results,
        });
    }

    // Check bits were revealed on the classical channel
    let skip = if detection.is_some() && config.drop_check {
        trace.push(ProtocolEvent::CheckBitsDropped {
            bits: config.n_check_bits,
        });
        config.n_check_bits
    } else {
        0
    };

    // Sifting stage; the channel is noiseless so correction finds no errors
    let sifted = sift(
        &bob_results[skip..],
        &alice_bases[skip..],
        &bob_bases[skip..],
    );
    trace.push(ProtocolEvent::ErrorCorrection {
        shared_bits: sifted.len(),
    });

    let capacity = KeyCapacity::derive(
        sifted.len(),
        config.key_len,
        config.privacy_amplification(),
    )?;
    trace.push(ProtocolEvent::KeysGenerated {
        keys: capacity.key_count,
        efficient_bits: capacity.efficient_bits,
        key_len: config.key_len,
        hashed: config.hashed_key,
    });

    tracing::info!(
        sifted_bits = capacity.sifted_bits,
        efficient_bits = capacity.efficient_bits,
        keys = capacity.key_count,
        "run completed"
    );

    Ok(BB84Result {
        outcome: ProtocolOutcome::Completed {
            detection,
            capacity,
        },
        trace,
        alice_bits,
        alice_bases,
        bob_bases,
        eve_bases,
        bob_results,
    })
}

fn random_bases<R: Rng>(rng: &mut R, n: usize) -> Vec<Basis> {
    (0..n).map(|_| Basis::random(rng)).collect()
}

/// Compares the first `n_check_bits` sent and received bits.
///
/// The threshold is used as is: the ~25% baseline caused by basis
/// mismatch is not subtracted.
pub fn check_eavesdropper(
    sent: &[bool],
    received: &[bool],
    n_check_bits: usize,
    threshold: f64,
) -> DetectionReport {
    let mismatches = sent
        .iter()
        .zip(received)
        .take(n_check_bits)
        .filter(|(a, b)| a != b)
        .count();

    let error_rate = if n_check_bits > 0 {
        mismatches as f64 / n_check_bits as f64
    } else {
        0.0
    };

    DetectionReport {
        check_bits: n_check_bits,
        mismatches,
        error_rate,
        threshold,
        detected: error_rate > threshold,
    }
}

/// Positions where sender and receiver picked the same basis.
pub fn matching_positions(alice_bases: &[Basis], bob_bases: &[Basis]) -> Vec<usize> {
    alice_bases
        .iter()
        .zip(bob_bases)
        .enumerate()
        .filter_map(|(i, (a, b))| (a == b).then_some(i))
        .collect()
}

/// Keeps the bits measured in the sender's basis.
pub fn sift(bits: &[bool], alice_bases: &[Basis], bob_bases: &[Basis]) -> Vec<bool> {
    matching_positions(alice_bases, bob_bases)
        .into_iter()
        .filter_map(|i| bits.get(i).copied())
        .collect()
}
