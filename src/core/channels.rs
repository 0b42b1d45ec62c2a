use crate::core::errors::ChannelError;
use crate::core::state::{Basis, QuantumBit};
use rand::Rng;

/// Simulated quantum channel batching single qubit preparation and measurement.
///
/// Index `i` of every input and output sequence refers to the same
/// transmission slot.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuantumChannel;

impl QuantumChannel {
    pub fn new() -> Self {
        Self
    }

    /// Encodes classical bits into qubits, one per slot.
    pub fn transmit(
        &self,
        bits: &[bool],
        bases: &[Basis],
    ) -> Result<Vec<QuantumBit>, ChannelError> {
        check_lengths(bits.len(), bases.len())?;

        Ok(bits
            .iter()
            .zip(bases)
            .map(|(&bit, &basis)| QuantumBit::new(bit, basis))
            .collect())
    }

    /// Measures every qubit in the basis of its slot.
    ///
    /// Used both by the legitimate receiver and by an intercepting party.
    /// Each measurement advances `rng` exactly once.
    pub fn receive<R: Rng>(
        &self,
        qubits: &mut [QuantumBit],
        bases: &[Basis],
        rng: &mut R,
    ) -> Result<Vec<bool>, ChannelError> {
        check_lengths(qubits.len(), bases.len())?;

        Ok(qubits
            .iter_mut()
            .zip(bases)
            .map(|(qubit, &basis)| qubit.measure(basis, rng))
            .collect())
    }

    /// Intercept-resend attack: measures the whole sequence with `bases`,
    /// then re-encodes the readings in the same bases for forwarding.
    ///
    /// Returns the forwarded qubits together with the intercepted bits.
    pub fn intercept_resend<R: Rng>(
        &self,
        qubits: &mut [QuantumBit],
        bases: &[Basis],
        rng: &mut R,
    ) -> Result<(Vec<QuantumBit>, Vec<bool>), ChannelError> {
        let intercepted = self.receive(qubits, bases, rng)?;
        let forwarded = self.transmit(&intercepted, bases)?;
        Ok((forwarded, intercepted))
    }
}

fn check_lengths(items: usize, bases: usize) -> Result<(), ChannelError> {
    if items != bases {
        return Err(ChannelError::LengthMismatch { items, bases });
    }
    Ok(())
}
