//! Abstract syntax tree for `OpenQASM` 2.0 programs.

/// A parsed program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Version string from the header, e.g. `2.0`.
    pub version: String,
    /// Top-level statements in source order.
    pub statements: Vec<Located>,
}

/// A statement with the line it starts on.
#[derive(Debug, Clone, PartialEq)]
pub struct Located {
    pub line: usize,
    pub statement: Statement,
}

/// Top-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `include "file";`
    Include(String),
    /// `qreg name[size];`
    QregDecl { name: String, size: u32 },
    /// `creg name[size];`
    CregDecl { name: String, size: u32 },
    /// `gate name(params) qubits { body }`
    GateDef(GateDef),
    /// Gate application.
    Gate(GateCall),
    /// `measure qubit -> bit;`
    Measure { qubit: Argument, bit: Argument },
    /// `reset qubit;`
    Reset { qubit: Argument },
    /// `barrier args;`
    Barrier { args: Vec<Argument> },
}

/// User gate definition.
#[derive(Debug, Clone, PartialEq)]
pub struct GateDef {
    pub name: String,
    /// Formal angle parameter names.
    pub params: Vec<String>,
    /// Formal qubit argument names.
    pub qubits: Vec<String>,
    pub body: Vec<GateOp>,
}

/// Operation inside a gate body.
#[derive(Debug, Clone, PartialEq)]
pub enum GateOp {
    Call(GateCall),
    Barrier(Vec<String>),
}

/// A gate call.
#[derive(Debug, Clone, PartialEq)]
pub struct GateCall {
    pub name: String,
    pub params: Vec<Expression>,
    pub args: Vec<Argument>,
}

/// A quantum or classical operand: a whole register or one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Register(String),
    Indexed(String, u32),
}

impl Argument {
    /// Register or formal-argument name.
    pub fn name(&self) -> &str {
        match self {
            Argument::Register(name) | Argument::Indexed(name, _) => name,
        }
    }
}

/// Real-valued parameter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(f64),
    Pi,
    Identifier(String),
    Neg(Box<Expression>),
    BinOp {
        left: Box<Expression>,
        op: BinOp,
        right: Box<Expression>,
    },
    Call {
        func: Function,
        arg: Box<Expression>,
    },
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Unary functions allowed in expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Exp,
    Ln,
    Sqrt,
}

impl Function {
    /// Look up a function by its QASM name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(Function::Sin),
            "cos" => Some(Function::Cos),
            "tan" => Some(Function::Tan),
            "exp" => Some(Function::Exp),
            "ln" => Some(Function::Ln),
            "sqrt" => Some(Function::Sqrt),
            _ => None,
        }
    }

    /// Apply the function.
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Function::Sin => x.sin(),
            Function::Cos => x.cos(),
            Function::Tan => x.tan(),
            Function::Exp => x.exp(),
            Function::Ln => x.ln(),
            Function::Sqrt => x.sqrt(),
        }
    }
}
