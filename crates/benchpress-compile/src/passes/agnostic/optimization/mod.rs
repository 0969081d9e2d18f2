//! Optimization passes.

mod cancel;
mod optimize_1q;

#[cfg(test)]
mod tests;

pub use cancel::CommutativeCancellation;
pub use optimize_1q::{OneQubitBasis, Optimize1qGates};
