//! Benchpress Compilation Framework
//!
//! This crate is the compiler the device-transpile benchmarks measure. It
//! rewrites a logical circuit into one that runs on a target device: only
//! native gates, and every two-qubit gate on a coupled pair.
//!
//! # Overview
//!
//! Compilation runs a sequence of passes over a [`CircuitDag`]:
//! 1. **Decomposition**: multi-qubit gates become `cx` plus 1q gates
//! 2. **Layout**: map logical qubits to physical qubits on the device
//! 3. **Routing**: insert SWAP gates to satisfy connectivity constraints
//! 4. **Translation**: convert gates to the target's native gate set
//! 5. **Optimization**: cancel gate pairs and merge 1q runs
//!
//! # Architecture
//!
//! ```text
//! Input Circuit
//!       │
//!       ▼
//! ┌─────────────┐
//! │ PassManager │ ◄── PropertySet (coupling map, basis gates, layout)
//! └─────────────┘
//!       │
//!       ├── DecomposeMultiQubit
//!       ├── TrivialLayout / DenseLayout
//!       ├── SwapRouting
//!       ├── BasisTranslation
//!       └── Optimize1qGates / CommutativeCancellation
//!       │
//!       ▼
//! Output Circuit (hardware-compatible)
//! ```
//!
//! # Example: Compiling for a Target
//!
//! ```rust
//! use benchpress_compile::Target;
//! use benchpress_ir::{Circuit, GateType};
//!
//! let target = Target::heavy_hex_cz();
//! let pass = target.default_compilation_pass(2).unwrap();
//!
//! let mut circuit = Circuit::ghz(5).unwrap();
//! pass.apply(&mut circuit).unwrap();
//!
//! assert_eq!(circuit.n_gates_of_type(GateType::CX), 0);
//! assert!(circuit.n_gates_of_type(target.two_q_gate_type()) >= 4);
//! ```
//!
//! # Optimization Levels
//!
//! | Level | Passes Included |
//! |-------|-----------------|
//! | 0 | Decomposition, trivial layout, forward routing, translation |
//! | 1 | + commutative cancellation before routing, 1q merging after |
//! | 2 | + dense layout, best-of-both swap routing, optimization on both sides |
//! | 3 | Level 2 with the post-routing optimization repeated to a fixed point |
//!
//! # Custom Passes
//!
//! Implement the [`Pass`] trait to create custom compilation passes:
//!
//! ```rust
//! use benchpress_compile::{Pass, PassKind, CompileResult, PropertySet};
//! use benchpress_ir::CircuitDag;
//!
//! struct MyCustomPass;
//!
//! impl Pass for MyCustomPass {
//!     fn name(&self) -> &str { "my_custom_pass" }
//!     fn kind(&self) -> PassKind { PassKind::Analysis }
//!
//!     fn run(&self, dag: &mut CircuitDag, props: &mut PropertySet) -> CompileResult<()> {
//!         Ok(())
//!     }
//! }
//! ```
//!
//! [`CircuitDag`]: benchpress_ir::CircuitDag

pub mod error;
pub mod manager;
pub mod pass;
pub mod property;
pub mod target;
pub mod unitary;

// Built-in passes
pub mod passes;

pub use error::{CompileError, CompileResult};
pub use manager::{MAX_OPTIMIZATION_LEVEL, PassManager, PassManagerBuilder, RepeatUntilStable};
pub use pass::{Pass, PassKind};
pub use property::{BasisGates, CouplingMap, Layout, PropertySet};
pub use target::{CompilationPass, PRESET_NAMES, Target};
