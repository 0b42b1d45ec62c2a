//! Quantum Key Distribution (QKD) Protocols.
//!
//! - **BB84**: prepare-and-measure key exchange over two conjugate bases,
//!   with optional intercept-resend eavesdropping and detection.
//! - **Capacity**: key counts from sifted bits, simulated or closed-form.

pub mod bb84;
pub mod capacity;

pub use bb84::{BB84Result, DetectionReport, ProtocolOutcome};
pub use capacity::{KeyCapacity, TheoreticalEstimate, TheoryParams};
