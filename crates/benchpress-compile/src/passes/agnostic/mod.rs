//! Target-agnostic compilation passes.
//!
//! These passes operate purely on the DAG structure. The single-qubit
//! optimizer reads the basis gates when they are present but runs without
//! them too.

pub mod decompose;
pub mod optimization;

pub use decompose::{DecomposeMultiQubit, decompose_gate};
pub use optimization::{CommutativeCancellation, OneQubitBasis, Optimize1qGates};
