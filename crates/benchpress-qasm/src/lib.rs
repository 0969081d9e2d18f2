//! `OpenQASM` 2.0 reader and writer for benchpress.
//!
//! Benchmark fixtures are stored as `OpenQASM` 2.0 files. This crate reads
//! them into [`benchpress_ir::Circuit`]s and writes generated circuits back
//! out.
//!
//! # Supported Features
//!
//! | Feature | Status | Example |
//! |---------|--------|---------|
//! | Version declaration | ✅ | `OPENQASM 2.0;` |
//! | Includes | ✅ (ignored) | `include "qelib1.inc";` |
//! | Registers | ✅ | `qreg q[5];`, `creg c[5];` |
//! | `qelib1.inc` gates | ✅ | `h q[0];`, `cu1(pi/4) q[0], q[1];` |
//! | Gate definitions | ✅ | `gate maj a, b, c { ... }` |
//! | Register broadcast | ✅ | `h q;`, `measure q -> c;` |
//! | Barriers and reset | ✅ | `barrier q;`, `reset q[0];` |
//! | `opaque`, `if` | ❌ | rejected with [`ParseError::Unsupported`] |
//!
//! Built-in gate names take priority over user definitions of the same
//! name, so files that redefine `qelib1.inc` gates inline still produce
//! standard gates.
//!
//! # Example: Parsing QASM
//!
//! ```rust
//! use benchpress_ir::GateType;
//! use benchpress_qasm::parse;
//!
//! let qasm = r#"
//!     OPENQASM 2.0;
//!     include "qelib1.inc";
//!     qreg q[2];
//!     creg c[2];
//!     h q[0];
//!     cx q[0], q[1];
//!     measure q -> c;
//! "#;
//!
//! let circuit = parse(qasm).unwrap();
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.n_gates_of_type(GateType::CX), 1);
//! ```
//!
//! # Example: Round-Trip
//!
//! ```rust
//! use benchpress_ir::Circuit;
//! use benchpress_qasm::{emit, parse};
//!
//! let circuit = Circuit::ghz(3).unwrap();
//! let reparsed = parse(&emit(&circuit)).unwrap();
//! assert_eq!(circuit.count_ops(), reparsed.count_ops());
//! ```

mod ast;
mod emitter;
mod error;
mod lexer;
mod parser;

pub use emitter::emit;
pub use error::{ParseError, ParseResult};
pub use parser::{parse, parse_ast, parse_file};

// Re-export AST types for advanced users
pub mod syntax {
    pub use crate::ast::*;
}
