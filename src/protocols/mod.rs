//! Quantum Cryptography Protocols.
//!
//! This module contains the BB84 quantum key distribution run and the key
//! capacity arithmetic that goes with it.

pub mod qkd;
pub use qkd::{bb84, capacity};
