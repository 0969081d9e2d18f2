//! Single-qubit unitaries and their resynthesis.
//!
//! [`Unitary2x2`] is the working representation of a run of single-qubit
//! gates. A run is multiplied into one matrix, decomposed into the Euler
//! angles of `U(θ, φ, λ)` and emitted again in the target's gate set.

use std::f64::consts::{FRAC_PI_2, PI};
use std::ops::Mul;

use num_complex::Complex64;

use benchpress_ir::StandardGate;

/// Tolerance for angle and matrix-element comparisons.
pub const EPSILON: f64 = 1e-10;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// A 2x2 unitary matrix in row-major order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unitary2x2 {
    /// The matrix elements in row-major order: [[a, b], [c, d]].
    pub data: [Complex64; 4],
}

impl Unitary2x2 {
    /// Create a new 2x2 unitary matrix.
    pub const fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    /// Create the identity matrix.
    pub const fn identity() -> Self {
        Self::new(ONE, ZERO, ZERO, ONE)
    }

    fn diagonal(phase: f64) -> Self {
        Self::new(ONE, ZERO, ZERO, Complex64::from_polar(1.0, phase))
    }

    /// Create an RX rotation matrix.
    pub fn rx(theta: f64) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        let mis = Complex64::new(0.0, -s);
        Self::new(Complex64::new(c, 0.0), mis, mis, Complex64::new(c, 0.0))
    }

    /// Create an RY rotation matrix.
    pub fn ry(theta: f64) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        Self::new(
            Complex64::new(c, 0.0),
            Complex64::new(-s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(c, 0.0),
        )
    }

    /// Create an RZ rotation matrix.
    pub fn rz(theta: f64) -> Self {
        Self::new(
            Complex64::from_polar(1.0, -theta / 2.0),
            ZERO,
            ZERO,
            Complex64::from_polar(1.0, theta / 2.0),
        )
    }

    /// Create a U gate U(theta, phi, lambda).
    pub fn u(theta: f64, phi: f64, lambda: f64) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        Self::new(
            Complex64::new(c, 0.0),
            -Complex64::from_polar(s, lambda),
            Complex64::from_polar(s, phi),
            Complex64::from_polar(c, phi + lambda),
        )
    }

    /// Matrix of a single-qubit gate, `None` for multi-qubit gates.
    pub fn from_gate(gate: &StandardGate) -> Option<Self> {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let half = Complex64::new(0.5, 0.5);
        let half_conj = Complex64::new(0.5, -0.5);
        Some(match *gate {
            StandardGate::I => Self::identity(),
            StandardGate::X => Self::new(ZERO, ONE, ONE, ZERO),
            StandardGate::Y => Self::new(
                ZERO,
                Complex64::new(0.0, -1.0),
                Complex64::new(0.0, 1.0),
                ZERO,
            ),
            StandardGate::Z => Self::diagonal(PI),
            StandardGate::H => {
                let h = Complex64::new(h, 0.0);
                Self::new(h, h, h, -h)
            }
            StandardGate::S => Self::diagonal(FRAC_PI_2),
            StandardGate::Sdg => Self::diagonal(-FRAC_PI_2),
            StandardGate::T => Self::diagonal(PI / 4.0),
            StandardGate::Tdg => Self::diagonal(-PI / 4.0),
            StandardGate::SX => Self::new(half, half_conj, half_conj, half),
            StandardGate::SXdg => Self::new(half_conj, half, half, half_conj),
            StandardGate::Rx(theta) => Self::rx(theta),
            StandardGate::Ry(theta) => Self::ry(theta),
            StandardGate::Rz(theta) => Self::rz(theta),
            StandardGate::P(lambda) => Self::diagonal(lambda),
            StandardGate::U(theta, phi, lambda) => Self::u(theta, phi, lambda),
            _ => return None,
        })
    }

    /// Whether this is the identity up to global phase.
    pub fn is_identity(&self) -> bool {
        let [a, b, c, d] = self.data;
        b.norm() < EPSILON && c.norm() < EPSILON && (a - d).norm() < EPSILON
    }

    /// Euler angles `(θ, φ, λ)` with `self = e^{iα} U(θ, φ, λ)`.
    ///
    /// `θ` lies in `[0, π]`. When `θ` is 0 or π only the sum or the
    /// difference of `φ` and `λ` is determined, and the other is set to 0.
    pub fn euler_angles(&self) -> (f64, f64, f64) {
        let [a, b, c, d] = self.data;
        // Divide out sqrt(det) to land in SU(2).
        let root = (a * d - b * c).sqrt();
        let (a, c) = (a / root, c / root);

        let theta = 2.0 * c.norm().atan2(a.norm());
        // For SU(2): a = e^{-i(φ+λ)/2} cos(θ/2), c = e^{i(φ-λ)/2} sin(θ/2).
        let (sum, diff) = if c.norm() < EPSILON {
            (-2.0 * a.arg(), 0.0)
        } else if a.norm() < EPSILON {
            (0.0, 2.0 * c.arg())
        } else {
            (-2.0 * a.arg(), 2.0 * c.arg())
        };
        let phi = (sum + diff) / 2.0;
        let lambda = (sum - diff) / 2.0;
        (theta, normalize_angle(phi), normalize_angle(lambda))
    }

    /// Synthesize as rz/sx/x gates in circuit order.
    pub fn to_zsx(&self) -> Vec<StandardGate> {
        let (theta, phi, lambda) = self.euler_angles();
        let mut gates = Vec::with_capacity(5);
        if theta.abs() < EPSILON {
            push_rz(&mut gates, phi + lambda);
        } else if (theta - FRAC_PI_2).abs() < EPSILON {
            push_rz(&mut gates, lambda - FRAC_PI_2);
            gates.push(StandardGate::SX);
            push_rz(&mut gates, phi + FRAC_PI_2);
        } else if (theta - PI).abs() < EPSILON {
            // Only φ - λ matters here, which needs a single rz after the x.
            gates.push(StandardGate::X);
            push_rz(&mut gates, phi - lambda - PI);
        } else {
            push_rz(&mut gates, lambda);
            gates.push(StandardGate::SX);
            push_rz(&mut gates, theta + PI);
            gates.push(StandardGate::SX);
            push_rz(&mut gates, phi + PI);
        }
        gates
    }

    /// Synthesize as a single `U` gate, or nothing for the identity.
    pub fn to_u(&self) -> Vec<StandardGate> {
        if self.is_identity() {
            return vec![];
        }
        let (theta, phi, lambda) = self.euler_angles();
        vec![StandardGate::U(theta, phi, lambda)]
    }

    /// Whether two unitaries are equal up to global phase.
    pub fn approx_eq_up_to_phase(&self, other: &Self) -> bool {
        (*self * other.dagger()).is_identity()
    }

    /// Get the conjugate transpose (dagger).
    pub fn dagger(&self) -> Self {
        let [a, b, c, d] = self.data;
        Self::new(a.conj(), c.conj(), b.conj(), d.conj())
    }
}

impl Default for Unitary2x2 {
    fn default() -> Self {
        Self::identity()
    }
}

/// Matrix product `self * rhs`. Applying gate `g` after `self` is `g * self`.
impl Mul for Unitary2x2 {
    type Output = Self;

    #[allow(clippy::many_single_char_names)]
    fn mul(self, rhs: Self) -> Self::Output {
        let [a, b, c, d] = self.data;
        let [e, f, g, h] = rhs.data;
        Self::new(a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h)
    }
}

/// Wrap an angle into `(-π, π]`.
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let a = angle.rem_euclid(2.0 * PI);
    if a > PI { a - 2.0 * PI } else { a }
}

fn push_rz(gates: &mut Vec<StandardGate>, angle: f64) {
    let angle = normalize_angle(angle);
    if angle.abs() > EPSILON {
        gates.push(StandardGate::Rz(angle));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(gates: &[StandardGate]) -> Unitary2x2 {
        gates.iter().fold(Unitary2x2::identity(), |acc, g| {
            Unitary2x2::from_gate(g).unwrap() * acc
        })
    }

    fn samples() -> Vec<Unitary2x2> {
        let mut out: Vec<Unitary2x2> = [
            StandardGate::I,
            StandardGate::X,
            StandardGate::Y,
            StandardGate::Z,
            StandardGate::H,
            StandardGate::S,
            StandardGate::Tdg,
            StandardGate::SX,
            StandardGate::SXdg,
            StandardGate::Rx(0.3),
            StandardGate::Ry(-2.1),
            StandardGate::Rz(1.7),
            StandardGate::U(FRAC_PI_2, 0.4, -0.9),
            StandardGate::U(PI, 1.1, 0.2),
            StandardGate::U(2.5, -3.0, 3.1),
        ]
        .iter()
        .map(|g| Unitary2x2::from_gate(g).unwrap())
        .collect();
        out.push(product(&[StandardGate::H, StandardGate::T, StandardGate::H, StandardGate::S]));
        out
    }

    #[test]
    fn test_pauli_squared() {
        for g in [StandardGate::X, StandardGate::Y, StandardGate::Z, StandardGate::H] {
            let m = Unitary2x2::from_gate(&g).unwrap();
            assert!((m * m).is_identity(), "{g:?}");
        }
    }

    #[test]
    fn test_sx_squared_is_x() {
        let sx = Unitary2x2::from_gate(&StandardGate::SX).unwrap();
        let x = Unitary2x2::from_gate(&StandardGate::X).unwrap();
        assert!((sx * sx).approx_eq_up_to_phase(&x));
    }

    #[test]
    fn test_euler_roundtrip() {
        for m in samples() {
            let (theta, phi, lambda) = m.euler_angles();
            assert!((0.0..=PI + EPSILON).contains(&theta));
            assert!(Unitary2x2::u(theta, phi, lambda).approx_eq_up_to_phase(&m));
        }
    }

    #[test]
    fn test_zsx_synthesis_is_equivalent() {
        for m in samples() {
            let gates = m.to_zsx();
            assert!(gates.len() <= 5);
            assert!(gates.iter().all(|g| matches!(
                g,
                StandardGate::Rz(_) | StandardGate::SX | StandardGate::X
            )));
            assert!(product(&gates).approx_eq_up_to_phase(&m), "{gates:?}");
        }
    }

    #[test]
    fn test_zsx_special_cases() {
        assert!(Unitary2x2::identity().to_zsx().is_empty());
        let h = Unitary2x2::from_gate(&StandardGate::H).unwrap();
        assert_eq!(h.to_zsx().len(), 3);
        let x = Unitary2x2::from_gate(&StandardGate::X).unwrap();
        assert_eq!(x.to_zsx(), vec![StandardGate::X]);
        let rz = Unitary2x2::rz(0.7);
        assert_eq!(rz.to_zsx().len(), 1);
    }

    #[test]
    fn test_u_synthesis() {
        assert!(Unitary2x2::identity().to_u().is_empty());
        let m = Unitary2x2::from_gate(&StandardGate::H).unwrap();
        assert!(product(&m.to_u()).approx_eq_up_to_phase(&m));
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(2.5 * PI) - FRAC_PI_2).abs() < EPSILON);
        assert!(normalize_angle(-2.0 * PI).abs() < EPSILON);
        assert!((normalize_angle(-FRAC_PI_2) + FRAC_PI_2).abs() < EPSILON);
        assert_eq!(normalize_angle(f64::NAN), 0.0);
    }
}
