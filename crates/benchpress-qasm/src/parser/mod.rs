//! Parser for `OpenQASM` 2.0.

mod expression;
mod lowering;
mod statement;

pub(crate) use lowering::lower_to_circuit;

use std::path::Path;

use benchpress_ir::Circuit;

use crate::ast::Program;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Parse a QASM source string into a Circuit.
pub fn parse(source: &str) -> ParseResult<Circuit> {
    let program = parse_ast(source)?;
    lower_to_circuit(&program)
}

/// Read and parse a QASM file. The circuit is named after the file stem.
pub fn parse_file(path: impl AsRef<Path>) -> ParseResult<Circuit> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut circuit = parse(&source)?;
    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
        circuit.set_name(stem);
    }
    Ok(circuit)
}

/// Parse a QASM source string into an AST Program.
pub fn parse_ast(source: &str) -> ParseResult<Program> {
    let mut parser = Parser::new(source)?;
    parser.parse_program()
}

/// Parser state.
pub(super) struct Parser {
    pub(super) tokens: Vec<SpannedToken>,
    pub(super) pos: usize,
}

impl Parser {
    /// Create a new parser from source.
    fn new(source: &str) -> ParseResult<Self> {
        let tokens =
            tokenize(source).map_err(|(line, message)| ParseError::LexerError { line, message })?;
        Ok(Self { tokens, pos: 0 })
    }

    /// Check if we've reached the end.
    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Line of the current token, or of the last one at end of input.
    pub(super) fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    /// Peek at the current token.
    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Advance and return the current token.
    pub(super) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    /// Expect a specific token.
    #[allow(clippy::needless_pass_by_value)]
    pub(super) fn expect(&mut self, expected: Token) -> ParseResult<()> {
        let line = self.line();
        let found = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof(format!("expected {expected}")))?;

        if std::mem::discriminant(&found) != std::mem::discriminant(&expected) {
            return Err(ParseError::UnexpectedToken {
                line,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    /// Check if current token matches.
    pub(super) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    /// Consume token if it matches.
    pub(super) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Parse the entire program.
    fn parse_program(&mut self) -> ParseResult<Program> {
        self.expect(Token::OpenQasm)?;
        let version = self.parse_version()?;
        self.expect(Token::Semicolon)?;

        let mut statements = Vec::new();
        while !self.is_eof() {
            statements.push(self.parse_statement()?);
        }

        Ok(Program {
            version,
            statements,
        })
    }

    /// Parse the version number; only major version 2 is accepted.
    fn parse_version(&mut self) -> ParseResult<String> {
        let version = match self.advance() {
            Some(Token::FloatLiteral(v)) => format!("{v:.1}"),
            Some(Token::IntLiteral(v)) => format!("{v}.0"),
            Some(other) => return Err(ParseError::InvalidVersion(other.to_string())),
            None => return Err(ParseError::UnexpectedEof("version number".into())),
        };
        if !version.starts_with("2.") {
            return Err(ParseError::InvalidVersion(version));
        }
        Ok(version)
    }

    /// Parse an identifier.
    pub(super) fn parse_identifier(&mut self) -> ParseResult<String> {
        let line = self.line();
        match self.advance() {
            Some(Token::Identifier(s)) => Ok(s),
            Some(other) => Err(ParseError::UnexpectedToken {
                line,
                expected: "identifier".into(),
                found: other.to_string(),
            }),
            None => Err(ParseError::UnexpectedEof("identifier".into())),
        }
    }

    /// Parse a comma-separated identifier list.
    pub(super) fn parse_identifier_list(&mut self) -> ParseResult<Vec<String>> {
        let mut ids = vec![self.parse_identifier()?];
        while self.consume(&Token::Comma) {
            ids.push(self.parse_identifier()?);
        }
        Ok(ids)
    }

    /// Parse an integer literal that fits in `u32`.
    pub(super) fn parse_index(&mut self) -> ParseResult<u32> {
        let line = self.line();
        match self.advance() {
            Some(Token::IntLiteral(v)) => u32::try_from(v).map_err(|_| ParseError::UnexpectedToken {
                line,
                expected: "32-bit integer".into(),
                found: v.to_string(),
            }),
            Some(other) => Err(ParseError::UnexpectedToken {
                line,
                expected: "integer".into(),
                found: other.to_string(),
            }),
            None => Err(ParseError::UnexpectedEof("integer".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchpress_ir::GateType;

    #[test]
    fn test_parse_bell_state() {
        let source = r#"
            OPENQASM 2.0;
            include "qelib1.inc";
            qreg q[2];
            creg c[2];
            h q[0];
            cx q[0], q[1];
            measure q -> c;
        "#;

        let circuit = parse(source).unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.count_ops()["measure"], 2);
    }

    #[test]
    fn test_parse_parameterized() {
        let source = r"
            OPENQASM 2.0;
            qreg q[1];
            rx(pi/2) q[0];
            ry(-pi/4) q[0];
            rz(0.5) q[0];
        ";

        let circuit = parse(source).unwrap();
        assert_eq!(circuit.num_qubits(), 1);
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_parse_multiple_registers() {
        let source = r"
            OPENQASM 2.0;
            qreg a[2];
            qreg b[2];
            cx a, b;
        ";

        let circuit = parse(source).unwrap();
        assert_eq!(circuit.num_qubits(), 4);
        assert_eq!(circuit.n_gates_of_type(GateType::CX), 2);
        assert_eq!(circuit.depth(), 1);
    }

    #[test]
    fn test_rejects_qasm3_header() {
        let err = parse("OPENQASM 3.0;\nqubit[2] q;").unwrap_err();
        assert!(matches!(err, ParseError::InvalidVersion(_)));
    }

    #[test]
    fn test_parse_error_undefined() {
        let source = "OPENQASM 2.0;\nqreg q[1];\nh undefined[0];";
        match parse(source) {
            Err(ParseError::UndefinedIdentifier { line, name }) => {
                assert_eq!(line, 3);
                assert_eq!(name, "undefined");
            }
            other => panic!("expected UndefinedIdentifier, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_file_names_circuit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qft_N4.qasm");
        std::fs::write(&path, "OPENQASM 2.0;\nqreg q[4];\nh q;\n").unwrap();
        let circuit = parse_file(&path).unwrap();
        assert_eq!(circuit.name(), "qft_N4");
        assert_eq!(circuit.num_gates(), 4);
    }

    #[test]
    fn test_parse_file_missing() {
        let err = parse_file("/nonexistent/dir/qv_N100_12345.qasm").unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }
}
