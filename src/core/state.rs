use crate::core::Gate;
use ndarray::{Array1, array};
use rand::Rng;

/// Encoding/measurement frame of a single qubit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Basis {
    /// Z basis -> {|0>, |1>}. Tag `0`.
    Rectilinear,
    /// X basis -> {|+>, |->}. Tag `1`.
    Diagonal,
}

impl Basis {
    /// Draws a basis with equal probability.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::from(rng.random_bool(0.5))
    }

    /// The other basis of the conjugate pair.
    pub fn conjugate(self) -> Self {
        match self {
            Basis::Rectilinear => Basis::Diagonal,
            Basis::Diagonal => Basis::Rectilinear,
        }
    }

    /// Binary tag used in interchange formats.
    pub fn tag(self) -> u8 {
        match self {
            Basis::Rectilinear => 0,
            Basis::Diagonal => 1,
        }
    }
}

impl From<bool> for Basis {
    fn from(diagonal: bool) -> Self {
        if diagonal {
            Basis::Diagonal
        } else {
            Basis::Rectilinear
        }
    }
}

/// A single qubit holding a real two-component amplitude vector.
///
/// The amplitudes are expressed in the frame of `basis`, the basis of the
/// last preparation or measurement. Measuring in the other basis first
/// rotates the vector into that frame with a Hadamard transform, then the
/// state collapses onto the observed outcome. A qubit is therefore not
/// reusable: a second read sees the collapsed state, not the prepared one.
#[derive(Clone, Debug)]
pub struct QuantumBit {
    amplitudes: Array1<f64>,
    basis: Basis,
}

impl QuantumBit {
    /// Prepares the qubit encoding `bit` in `basis`.
    pub fn new(bit: bool, basis: Basis) -> Self {
        let mut amplitudes = array![1.0, 0.0];
        if bit {
            amplitudes = Gate::x().apply(&amplitudes);
        }

        Self { amplitudes, basis }
    }

    /// Frame of the current amplitude vector.
    pub fn basis(&self) -> Basis {
        self.basis
    }

    /// Rotates the amplitude vector into the frame of `basis`.
    fn change_frame(&mut self, basis: Basis) {
        if basis != self.basis {
            self.amplitudes = Gate::h().apply(&self.amplitudes);
            self.basis = basis;
        }
    }

    #[cfg(test)]
    fn probability_of_zero(&self, basis: Basis) -> f64 {
        let amplitude = if basis == self.basis {
            self.amplitudes[0]
        } else {
            Gate::h().apply(&self.amplitudes)[0]
        };
        (amplitude * amplitude).clamp(0.0, 1.0)
    }

    /// Physical measurement which changes the state irretrievably.
    ///
    /// Draws one uniform `f64` in [0, 1) from `rng`; the outcome is `0`
    /// when the draw falls below the probability mass of `0`.
    pub fn measure<R: Rng>(&mut self, basis: Basis, rng: &mut R) -> bool {
        self.change_frame(basis);

        let p_zero = (self.amplitudes[0] * self.amplitudes[0]).clamp(0.0, 1.0);
        let roll: f64 = rng.random();
        let bit = roll >= p_zero;

        // Collapse onto the observed basis state
        self.amplitudes = if bit {
            array![0.0, 1.0]
        } else {
            array![1.0, 0.0]
        };

        bit
    }
}
