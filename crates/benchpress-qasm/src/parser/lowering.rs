//! AST-to-Circuit lowering for `OpenQASM` 2.0.

use std::f64::consts::PI;

use benchpress_ir::{Circuit, ClbitId, QubitId, Register, StandardGate};
use rustc_hash::FxHashMap;

use crate::ast::{Argument, BinOp, Expression, GateCall, GateDef, GateOp, Program, Statement};
use crate::error::{ParseError, ParseResult};

/// Maximum nesting of user gate definitions.
const MAX_GATE_DEPTH: usize = 64;

/// Lower an AST Program to a Circuit.
pub(crate) fn lower_to_circuit(program: &Program) -> ParseResult<Circuit> {
    let mut lowerer = Lowerer::new();
    for located in &program.statements {
        lowerer.lower_statement(located.line, &located.statement)?;
    }
    Ok(lowerer.circuit)
}

/// Angle and qubit bindings inside a gate body.
#[derive(Default)]
struct Scope {
    params: FxHashMap<String, f64>,
    qubits: FxHashMap<String, QubitId>,
}

/// Lowers AST to Circuit.
struct Lowerer {
    circuit: Circuit,
    qregs: FxHashMap<String, Register>,
    cregs: FxHashMap<String, Register>,
    gates: FxHashMap<String, GateDef>,
}

#[allow(clippy::too_many_lines, clippy::match_same_arms)]
impl Lowerer {
    fn new() -> Self {
        Self {
            circuit: Circuit::new("qasm_circuit"),
            qregs: FxHashMap::default(),
            cregs: FxHashMap::default(),
            gates: FxHashMap::default(),
        }
    }

    fn lower_statement(&mut self, line: usize, stmt: &Statement) -> ParseResult<()> {
        match stmt {
            // Standard gates are built in, so the include carries nothing.
            Statement::Include(_) => {}

            Statement::QregDecl { name, size } => {
                self.check_unique(line, name)?;
                self.circuit.add_qreg(name.clone(), *size);
                if let Some(reg) = self.circuit.qregs().last() {
                    self.qregs.insert(name.clone(), reg.clone());
                }
            }

            Statement::CregDecl { name, size } => {
                self.check_unique(line, name)?;
                self.circuit.add_creg(name.clone(), *size);
                if let Some(reg) = self.circuit.cregs().last() {
                    self.cregs.insert(name.clone(), reg.clone());
                }
            }

            Statement::GateDef(def) => {
                if self.gates.contains_key(&def.name) {
                    return Err(ParseError::DuplicateDeclaration {
                        line,
                        name: def.name.clone(),
                    });
                }
                self.gates.insert(def.name.clone(), def.clone());
            }

            Statement::Gate(call) => self.lower_gate_call(line, call)?,

            Statement::Measure { qubit, bit } => {
                let qubits = self.resolve_qubits(line, qubit)?;
                let clbits = self.resolve_clbits(line, bit)?;
                if qubits.len() != clbits.len() {
                    return Err(ParseError::BroadcastMismatch {
                        line,
                        statement: "measure".into(),
                    });
                }
                for (q, c) in qubits.into_iter().zip(clbits) {
                    self.circuit.measure(q, c)?;
                }
            }

            Statement::Reset { qubit } => {
                for q in self.resolve_qubits(line, qubit)? {
                    self.circuit.reset(q)?;
                }
            }

            Statement::Barrier { args } => {
                let mut qubits: Vec<QubitId> = Vec::new();
                for arg in args {
                    for q in self.resolve_qubits(line, arg)? {
                        if !qubits.contains(&q) {
                            qubits.push(q);
                        }
                    }
                }
                self.circuit.barrier(qubits)?;
            }
        }
        Ok(())
    }

    /// Apply a top-level gate call, broadcasting over whole registers.
    fn lower_gate_call(&mut self, line: usize, call: &GateCall) -> ParseResult<()> {
        let scope = Scope::default();
        let params = call
            .params
            .iter()
            .map(|e| evaluate(line, e, &scope))
            .collect::<ParseResult<Vec<_>>>()?;

        let operands = call
            .args
            .iter()
            .map(|arg| self.resolve_qubits(line, arg))
            .collect::<ParseResult<Vec<_>>>()?;

        let width = broadcast_width(line, &call.name, &call.args, &operands)?;
        for i in 0..width {
            let qubits: Vec<QubitId> = operands
                .iter()
                .map(|ids| if ids.len() == 1 { ids[0] } else { ids[i] })
                .collect();
            self.apply_gate(line, &call.name, &params, &qubits, 0)?;
        }
        Ok(())
    }

    /// Apply one gate to concrete qubits, expanding user definitions.
    fn apply_gate(
        &mut self,
        line: usize,
        name: &str,
        params: &[f64],
        qubits: &[QubitId],
        depth: usize,
    ) -> ParseResult<()> {
        if let Some((gate, arity)) = builtin_gate(line, name, params)? {
            check_qubit_count(line, name, qubits, arity)?;
            self.circuit.gate(gate, qubits.iter().copied())?;
            return Ok(());
        }

        if name == "cu3" {
            check_param_count(line, name, params, 3)?;
            check_qubit_count(line, name, qubits, 2)?;
            let (theta, phi, lambda) = (params[0], params[1], params[2]);
            let (c, t) = (qubits[0], qubits[1]);
            self.circuit
                .gate(StandardGate::P((lambda + phi) / 2.0), [c])?
                .gate(StandardGate::P((lambda - phi) / 2.0), [t])?
                .cx(c, t)?
                .u(-theta / 2.0, 0.0, -(phi + lambda) / 2.0, t)?
                .cx(c, t)?
                .u(theta / 2.0, phi, 0.0, t)?;
            return Ok(());
        }

        let Some(def) = self.gates.get(name).cloned() else {
            return Err(ParseError::UnknownGate {
                line,
                name: name.to_string(),
            });
        };
        if depth >= MAX_GATE_DEPTH {
            return Err(ParseError::RecursionLimit {
                gate: name.to_string(),
                limit: MAX_GATE_DEPTH,
            });
        }
        check_param_count(line, name, params, def.params.len())?;
        check_qubit_count(line, name, qubits, def.qubits.len())?;

        let scope = Scope {
            params: def.params.iter().cloned().zip(params.iter().copied()).collect(),
            qubits: def.qubits.iter().cloned().zip(qubits.iter().copied()).collect(),
        };

        for op in &def.body {
            match op {
                GateOp::Call(inner) => {
                    let inner_params = inner
                        .params
                        .iter()
                        .map(|e| evaluate(line, e, &scope))
                        .collect::<ParseResult<Vec<_>>>()?;
                    let inner_qubits = inner
                        .args
                        .iter()
                        .map(|arg| scope_qubit(line, arg, &scope))
                        .collect::<ParseResult<Vec<_>>>()?;
                    self.apply_gate(line, &inner.name, &inner_params, &inner_qubits, depth + 1)?;
                }
                GateOp::Barrier(names) => {
                    let barrier_qubits = names
                        .iter()
                        .map(|n| scope_qubit(line, &Argument::Register(n.clone()), &scope))
                        .collect::<ParseResult<Vec<_>>>()?;
                    self.circuit.barrier(barrier_qubits)?;
                }
            }
        }
        Ok(())
    }

    fn check_unique(&self, line: usize, name: &str) -> ParseResult<()> {
        if self.qregs.contains_key(name) || self.cregs.contains_key(name) {
            return Err(ParseError::DuplicateDeclaration {
                line,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn resolve_qubits(&self, line: usize, arg: &Argument) -> ParseResult<Vec<QubitId>> {
        let reg = self
            .qregs
            .get(arg.name())
            .ok_or_else(|| ParseError::UndefinedIdentifier {
                line,
                name: arg.name().to_string(),
            })?;
        Ok(resolve(line, arg, reg)?.into_iter().map(QubitId).collect())
    }

    fn resolve_clbits(&self, line: usize, arg: &Argument) -> ParseResult<Vec<ClbitId>> {
        let reg = self
            .cregs
            .get(arg.name())
            .ok_or_else(|| ParseError::UndefinedIdentifier {
                line,
                name: arg.name().to_string(),
            })?;
        Ok(resolve(line, arg, reg)?.into_iter().map(ClbitId).collect())
    }
}

/// Raw wire ids an argument refers to within its register.
fn resolve(line: usize, arg: &Argument, reg: &Register) -> ParseResult<Vec<u32>> {
    match arg {
        Argument::Register(_) => Ok(reg.ids().collect()),
        Argument::Indexed(name, index) => {
            if *index >= reg.size {
                return Err(ParseError::IndexOutOfBounds {
                    line,
                    register: name.clone(),
                    index: *index,
                    size: reg.size,
                });
            }
            Ok(vec![reg.start + index])
        }
    }
}

/// Number of gate applications a broadcast call expands to.
fn broadcast_width(
    line: usize,
    name: &str,
    args: &[Argument],
    operands: &[Vec<QubitId>],
) -> ParseResult<usize> {
    let mut width: Option<usize> = None;
    for (arg, ids) in args.iter().zip(operands) {
        if matches!(arg, Argument::Indexed(..)) {
            continue;
        }
        match width {
            None => width = Some(ids.len()),
            Some(w) if w != ids.len() => {
                return Err(ParseError::BroadcastMismatch {
                    line,
                    statement: name.to_string(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(width.unwrap_or(1))
}

fn scope_qubit(line: usize, arg: &Argument, scope: &Scope) -> ParseResult<QubitId> {
    match arg {
        Argument::Register(name) => {
            scope
                .qubits
                .get(name)
                .copied()
                .ok_or_else(|| ParseError::UndefinedIdentifier {
                    line,
                    name: name.clone(),
                })
        }
        Argument::Indexed(..) => Err(ParseError::Unsupported {
            line,
            feature: "indexed operands inside a gate body".into(),
        }),
    }
}

/// Resolve a built-in gate name to a standard gate and its qubit count.
///
/// Returns `Ok(None)` when the name is not built in.
fn builtin_gate(
    line: usize,
    name: &str,
    params: &[f64],
) -> ParseResult<Option<(StandardGate, usize)>> {
    let expected = match name {
        "U" | "u3" | "u" => 3,
        "u2" => 2,
        "u1" | "p" | "u0" | "rx" | "ry" | "rz" | "crx" | "cry" | "crz" | "cu1" | "cp" | "rzz"
        | "rxx" | "ryy" => 1,
        "id" | "x" | "y" | "z" | "h" | "s" | "sdg" | "t" | "tdg" | "sx" | "sxdg" | "CX" | "cx"
        | "cy" | "cz" | "ch" | "swap" | "ccx" | "cswap" => 0,
        _ => return Ok(None),
    };
    check_param_count(line, name, params, expected)?;

    let gate = match name {
        "U" | "u3" | "u" => (StandardGate::U(params[0], params[1], params[2]), 1),
        "u2" => (StandardGate::U(PI / 2.0, params[0], params[1]), 1),
        "u1" | "p" => (StandardGate::P(params[0]), 1),
        "u0" | "id" => (StandardGate::I, 1),
        "x" => (StandardGate::X, 1),
        "y" => (StandardGate::Y, 1),
        "z" => (StandardGate::Z, 1),
        "h" => (StandardGate::H, 1),
        "s" => (StandardGate::S, 1),
        "sdg" => (StandardGate::Sdg, 1),
        "t" => (StandardGate::T, 1),
        "tdg" => (StandardGate::Tdg, 1),
        "sx" => (StandardGate::SX, 1),
        "sxdg" => (StandardGate::SXdg, 1),
        "rx" => (StandardGate::Rx(params[0]), 1),
        "ry" => (StandardGate::Ry(params[0]), 1),
        "rz" => (StandardGate::Rz(params[0]), 1),
        "CX" | "cx" => (StandardGate::CX, 2),
        "cy" => (StandardGate::CY, 2),
        "cz" => (StandardGate::CZ, 2),
        "ch" => (StandardGate::CH, 2),
        "swap" => (StandardGate::Swap, 2),
        "crx" => (StandardGate::CRx(params[0]), 2),
        "cry" => (StandardGate::CRy(params[0]), 2),
        "crz" => (StandardGate::CRz(params[0]), 2),
        "cu1" | "cp" => (StandardGate::CP(params[0]), 2),
        "rzz" => (StandardGate::RZZ(params[0]), 2),
        "rxx" => (StandardGate::RXX(params[0]), 2),
        "ryy" => (StandardGate::RYY(params[0]), 2),
        "ccx" => (StandardGate::CCX, 3),
        "cswap" => (StandardGate::CSwap, 3),
        _ => return Ok(None),
    };
    Ok(Some(gate))
}

/// Evaluate an angle expression against the bound parameters.
fn evaluate(line: usize, expr: &Expression, scope: &Scope) -> ParseResult<f64> {
    match expr {
        Expression::Number(v) => Ok(*v),
        Expression::Pi => Ok(PI),
        Expression::Identifier(name) => {
            scope
                .params
                .get(name)
                .copied()
                .ok_or_else(|| ParseError::UndefinedIdentifier {
                    line,
                    name: name.clone(),
                })
        }
        Expression::Neg(inner) => Ok(-evaluate(line, inner, scope)?),
        Expression::BinOp { left, op, right } => {
            let l = evaluate(line, left, scope)?;
            let r = evaluate(line, right, scope)?;
            Ok(match op {
                BinOp::Add => l + r,
                BinOp::Sub => l - r,
                BinOp::Mul => l * r,
                BinOp::Div => l / r,
                BinOp::Pow => l.powf(r),
            })
        }
        Expression::Call { func, arg } => Ok(func.apply(evaluate(line, arg, scope)?)),
    }
}

fn check_param_count(line: usize, gate: &str, params: &[f64], expected: usize) -> ParseResult<()> {
    // u0 takes a single duration argument and historically also appears bare.
    if gate == "u0" && params.len() <= 1 {
        return Ok(());
    }
    if params.len() != expected {
        return Err(ParseError::WrongParameterCount {
            line,
            gate: gate.to_string(),
            expected,
            got: params.len(),
        });
    }
    Ok(())
}

fn check_qubit_count(line: usize, gate: &str, qubits: &[QubitId], expected: usize) -> ParseResult<()> {
    if qubits.len() != expected {
        return Err(ParseError::WrongQubitCount {
            line,
            gate: gate.to_string(),
            expected,
            got: qubits.len(),
        });
    }
    Ok(())
}
