//! Statement parsing.

use super::Parser;
use crate::ast::{Argument, GateCall, GateDef, GateOp, Located, Statement};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

impl Parser {
    /// Parse a statement.
    pub(super) fn parse_statement(&mut self) -> ParseResult<Located> {
        let line = self.line();
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("statement".into()))?;

        let statement = match token {
            Token::Include => self.parse_include()?,
            Token::Qreg => {
                let (name, size) = self.parse_register_decl(&Token::Qreg)?;
                Statement::QregDecl { name, size }
            }
            Token::Creg => {
                let (name, size) = self.parse_register_decl(&Token::Creg)?;
                Statement::CregDecl { name, size }
            }
            Token::Gate => self.parse_gate_def()?,
            Token::Measure => self.parse_measure()?,
            Token::Reset => self.parse_reset()?,
            Token::Barrier => {
                self.expect(Token::Barrier)?;
                let args = self.parse_argument_list()?;
                self.expect(Token::Semicolon)?;
                Statement::Barrier { args }
            }
            Token::Opaque => {
                return Err(ParseError::Unsupported {
                    line,
                    feature: "opaque gate declarations".into(),
                });
            }
            Token::If => {
                return Err(ParseError::Unsupported {
                    line,
                    feature: "classically conditioned operations".into(),
                });
            }
            Token::Identifier(_) | Token::GateU | Token::GateCX => {
                let call = self.parse_gate_call()?;
                self.expect(Token::Semicolon)?;
                Statement::Gate(call)
            }
            _ => {
                return Err(ParseError::UnexpectedToken {
                    line,
                    expected: "statement".into(),
                    found: token.to_string(),
                });
            }
        };

        Ok(Located { line, statement })
    }

    /// Parse include statement.
    fn parse_include(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Include)?;
        let line = self.line();
        let path = match self.advance() {
            Some(Token::StringLiteral(s)) => s,
            Some(other) => {
                return Err(ParseError::UnexpectedToken {
                    line,
                    expected: "string literal".into(),
                    found: other.to_string(),
                });
            }
            None => return Err(ParseError::UnexpectedEof("include path".into())),
        };
        self.expect(Token::Semicolon)?;
        Ok(Statement::Include(path))
    }

    /// Parse `qreg name[size];` or `creg name[size];`.
    fn parse_register_decl(&mut self, keyword: &Token) -> ParseResult<(String, u32)> {
        self.expect(keyword.clone())?;
        let name = self.parse_identifier()?;
        self.expect(Token::LBracket)?;
        let size = self.parse_index()?;
        self.expect(Token::RBracket)?;
        self.expect(Token::Semicolon)?;
        Ok((name, size))
    }

    /// Parse `gate name(params) a, b { ... }`.
    fn parse_gate_def(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Gate)?;
        let name = self.parse_identifier()?;

        let params = if self.consume(&Token::LParen) {
            let params = if self.check(&Token::RParen) {
                vec![]
            } else {
                self.parse_identifier_list()?
            };
            self.expect(Token::RParen)?;
            params
        } else {
            vec![]
        };

        let qubits = self.parse_identifier_list()?;
        self.expect(Token::LBrace)?;

        let mut body = Vec::new();
        while !self.consume(&Token::RBrace) {
            if self.is_eof() {
                return Err(ParseError::UnexpectedEof(format!(
                    "closing brace of gate '{name}'"
                )));
            }
            if self.consume(&Token::Barrier) {
                let args = self.parse_identifier_list()?;
                self.expect(Token::Semicolon)?;
                body.push(GateOp::Barrier(args));
            } else {
                let call = self.parse_gate_call()?;
                self.expect(Token::Semicolon)?;
                body.push(GateOp::Call(call));
            }
        }

        Ok(Statement::GateDef(GateDef {
            name,
            params,
            qubits,
            body,
        }))
    }

    /// Parse measure statement.
    fn parse_measure(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Measure)?;
        let qubit = self.parse_argument()?;
        self.expect(Token::Arrow)?;
        let bit = self.parse_argument()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::Measure { qubit, bit })
    }

    /// Parse reset statement.
    fn parse_reset(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Reset)?;
        let qubit = self.parse_argument()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::Reset { qubit })
    }

    /// Parse `name(params) args` without the trailing semicolon.
    fn parse_gate_call(&mut self) -> ParseResult<GateCall> {
        let line = self.line();
        let name = match self.advance() {
            Some(Token::Identifier(s)) => s,
            Some(Token::GateU) => "U".to_string(),
            Some(Token::GateCX) => "CX".to_string(),
            Some(other) => {
                return Err(ParseError::UnexpectedToken {
                    line,
                    expected: "gate name".into(),
                    found: other.to_string(),
                });
            }
            None => return Err(ParseError::UnexpectedEof("gate name".into())),
        };

        let params = if self.consume(&Token::LParen) {
            let params = self.parse_expression_list()?;
            self.expect(Token::RParen)?;
            params
        } else {
            vec![]
        };

        let args = self.parse_argument_list()?;
        Ok(GateCall { name, params, args })
    }

    /// Parse a comma-separated list of arguments.
    fn parse_argument_list(&mut self) -> ParseResult<Vec<Argument>> {
        let mut args = vec![self.parse_argument()?];
        while self.consume(&Token::Comma) {
            args.push(self.parse_argument()?);
        }
        Ok(args)
    }

    /// Parse `name` or `name[index]`.
    fn parse_argument(&mut self) -> ParseResult<Argument> {
        let name = self.parse_identifier()?;
        if self.consume(&Token::LBracket) {
            let index = self.parse_index()?;
            self.expect(Token::RBracket)?;
            Ok(Argument::Indexed(name, index))
        } else {
            Ok(Argument::Register(name))
        }
    }
}
