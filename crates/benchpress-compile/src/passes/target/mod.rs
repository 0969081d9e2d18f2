//! Target-specific compilation passes.
//!
//! These passes require target hardware properties from the `PropertySet`
//! (coupling map, basis gates, layout) and produce hardware-compatible
//! circuits for a specific device.

pub mod layout;
pub mod routing;
pub mod translation;

pub use layout::{DenseLayout, TrivialLayout};
pub use routing::{RoutingStats, RoutingStrategy, SwapRouting};
pub use translation::BasisTranslation;
