//! Error types for the QASM parser.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during parsing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Lexer error (invalid token).
    #[error("Lexer error at line {line}: {message}")]
    LexerError { line: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// Invalid version.
    #[error("Invalid OPENQASM version: {0}")]
    InvalidVersion(String),

    /// Undefined identifier.
    #[error("Undefined identifier at line {line}: {name}")]
    UndefinedIdentifier { line: usize, name: String },

    /// Duplicate declaration.
    #[error("Duplicate declaration at line {line}: {name}")]
    DuplicateDeclaration { line: usize, name: String },

    /// Invalid gate.
    #[error("Unknown gate at line {line}: {name}")]
    UnknownGate { line: usize, name: String },

    /// Wrong number of arguments.
    #[error("Gate '{gate}' at line {line} expects {expected} qubits, got {got}")]
    WrongQubitCount {
        line: usize,
        gate: String,
        expected: usize,
        got: usize,
    },

    /// Wrong number of parameters.
    #[error("Gate '{gate}' at line {line} expects {expected} parameters, got {got}")]
    WrongParameterCount {
        line: usize,
        gate: String,
        expected: usize,
        got: usize,
    },

    /// Index out of bounds.
    #[error("Index {index} out of bounds for register '{register}' of size {size} at line {line}")]
    IndexOutOfBounds {
        line: usize,
        register: String,
        index: u32,
        size: u32,
    },

    /// Register arguments of different sizes in one broadcast statement.
    #[error("Register size mismatch in '{statement}' at line {line}")]
    BroadcastMismatch { line: usize, statement: String },

    /// Language feature outside what the reader handles.
    #[error("Unsupported feature at line {line}: {feature}")]
    Unsupported { line: usize, feature: String },

    /// Gate definitions nested too deeply, usually a self-referencing gate.
    #[error("Gate expansion of '{gate}' exceeds depth {limit}")]
    RecursionLimit { gate: String, limit: usize },

    /// Source file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// IR error during circuit construction.
    #[error("Circuit error: {0}")]
    CircuitError(#[from] benchpress_ir::IrError),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
