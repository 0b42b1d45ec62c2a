pub mod config;
mod core;
pub mod protocols;
pub mod record;
pub mod report;

pub use crate::config::{PrivacyAmplification, ProtocolConfig};
pub use crate::core::{Basis, Gate, QuantumBit, QuantumChannel, errors};
