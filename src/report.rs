//! Ordered trace of protocol milestones.
//!
//! The orchestrator appends one [`ProtocolEvent`] per milestone; the trace
//! never influences control flow and is rendered for display through
//! `Display`.

use std::fmt;

/// A single protocol milestone.
#[derive(Clone, Debug, PartialEq)]
pub enum ProtocolEvent {
    /// Qubits sent on the quantum channel.
    Transmitted { bits: usize },
    /// Qubits measured and re-sent by the eavesdropper.
    Intercepted { bits: usize },
    /// Qubits measured by the receiver.
    Received { bits: usize },
    /// Outcome of the eavesdropper check over the leading check bits.
    EavesdropperCheck {
        check_bits: usize,
        error_rate: f64,
        threshold: f64,
        detected: bool,
    },
    /// Check bits removed before sifting.
    CheckBitsDropped { bits: usize },
    /// Basis reconciliation followed by the idealized correction pass.
    ErrorCorrection { shared_bits: usize },
    /// Key capacity derived from the shared bits.
    KeysGenerated {
        keys: usize,
        efficient_bits: usize,
        key_len: usize,
        hashed: bool,
    },
}

impl fmt::Display for ProtocolEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolEvent::Transmitted { bits } => {
                writeln!(f, "Transmitting {bits} bits on quantum channel...OK")
            }
            ProtocolEvent::Intercepted { bits } => {
                writeln!(f, "Intercepting {bits} bits on quantum channel...OK")
            }
            ProtocolEvent::Received { bits } => {
                writeln!(f, "Receiving {bits} bits from quantum channel...OK")
            }
            ProtocolEvent::EavesdropperCheck {
                error_rate,
                detected,
                ..
            } => {
                writeln!(f, "Performing eavesdropper check...")?;
                write!(f, " - Measured error rate is {:.2}%...", error_rate * 100.0)?;
                if *detected {
                    writeln!(f)?;
                    writeln!(f, " -- Eavesdropper detected! Abort.")
                } else {
                    writeln!(f, "OK")
                }
            }
            ProtocolEvent::CheckBitsDropped { .. } => {
                writeln!(f, "Dropping error measurement bits...OK")
            }
            ProtocolEvent::ErrorCorrection { shared_bits } => {
                writeln!(f, "Performing error correction...")?;
                writeln!(f, " - Sharing polarization bases...OK")?;
                writeln!(f, " - Discarding erroneous bits...OK")?;
                writeln!(f, " - Executing ECC...")?;
                writeln!(f, " -- No errors found...OK")?;
                writeln!(f, "{shared_bits} shared secret bits available...OK")
            }
            ProtocolEvent::KeysGenerated {
                keys,
                efficient_bits,
                key_len,
                hashed,
            } => {
                if *hashed {
                    writeln!(f, "Generating privacy amplified keys (hashing)...")?;
                } else {
                    writeln!(f, "Generating direct keys (no hashing)...")?;
                }
                writeln!(f, " - {efficient_bits} efficient bits available...OK")?;
                writeln!(f, " - {keys} keys of {key_len} bits were generated...OK")
            }
        }
    }
}

/// Append-only sequence of events produced by one run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventTrace {
    events: Vec<ProtocolEvent>,
}

impl EventTrace {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: ProtocolEvent) {
        tracing::debug!(?event, "protocol milestone");
        self.events.push(event);
    }

    pub fn events(&self) -> &[ProtocolEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProtocolEvent> {
        self.events.iter()
    }
}

impl<'a> IntoIterator for &'a EventTrace {
    type Item = &'a ProtocolEvent;
    type IntoIter = std::slice::Iter<'a, ProtocolEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl fmt::Display for EventTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            write!(f, "{event}")?;
        }
        Ok(())
    }
}
