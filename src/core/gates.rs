use ndarray::{Array1, Array2, arr2};
use std::f64::consts::FRAC_1_SQRT_2;

/// Represents a single qubit quantum gate with real entries.
///
/// BB84 only ever needs the bit flip and the Hadamard transform, both of
/// which are real, so the matrix is kept as `f64`.
#[derive(Clone, Debug, PartialEq)]
pub struct Gate {
    /// The orthogonal (real unitary) 2x2 matrix of the gate.
    pub matrix: Array2<f64>,
}

impl Gate {
    /// Applies the gate to an amplitude vector, returning the new amplitudes.
    pub fn apply(&self, amplitudes: &Array1<f64>) -> Array1<f64> {
        self.matrix.dot(amplitudes)
    }

    // --- Standard Gates ---

    /// Creates a Pauli-X gate (NOT gate).
    pub fn x() -> Gate {
        Gate {
            matrix: arr2(&[[0.0, 1.0], [1.0, 0.0]]),
        }
    }

    /// Creates a Hadamard gate.
    ///
    /// It maps the rectilinear basis onto the diagonal one and, being its
    /// own inverse, back again.
    pub fn h() -> Gate {
        Gate {
            matrix: arr2(&[
                [FRAC_1_SQRT_2, FRAC_1_SQRT_2],
                [FRAC_1_SQRT_2, -FRAC_1_SQRT_2],
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn hadamard_is_self_inverse() {
        let h = Gate::h();
        let v = array![0.0, 1.0];
        let back = h.apply(&h.apply(&v));
        assert_abs_diff_eq!(back[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(back[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn x_flips_computational_states() {
        assert_eq!(Gate::x().apply(&array![1.0, 0.0]), array![0.0, 1.0]);
    }
}
