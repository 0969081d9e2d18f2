//! Built-in compilation passes.
//!
//! Passes are organized into two categories:
//! - [`agnostic`]: passes that operate purely on DAG structure
//! - [`target`]: passes that require hardware properties

pub mod agnostic;
pub mod target;

pub use agnostic::{
    CommutativeCancellation, DecomposeMultiQubit, OneQubitBasis, Optimize1qGates, decompose_gate,
};
pub use target::{
    BasisTranslation, DenseLayout, RoutingStats, RoutingStrategy, SwapRouting, TrivialLayout,
};
