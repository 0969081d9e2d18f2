//! `OpenQASM` 2.0 code emitter.

use std::f64::consts::PI;
use std::fmt::Write as _;

use benchpress_ir::{Circuit, Instruction, InstructionKind, Register, StandardGate};

/// Emit a circuit as `OpenQASM` 2.0 source.
///
/// Registers are written as declared on the circuit. A circuit whose
/// registers do not cover all of its wires gets flat `q` and `c` registers
/// instead.
pub fn emit(circuit: &Circuit) -> String {
    let mut emitter = Qasm2Emitter::new(circuit);
    emitter.emit_circuit(circuit);
    emitter.output
}

/// QASM 2.0 emitter.
struct Qasm2Emitter {
    output: String,
    qregs: Vec<Register>,
    cregs: Vec<Register>,
}

impl Qasm2Emitter {
    #[allow(clippy::cast_possible_truncation)]
    fn new(circuit: &Circuit) -> Self {
        let qregs = registers_or_flat(circuit.qregs(), "q", circuit.num_qubits() as u32);
        let cregs = registers_or_flat(circuit.cregs(), "c", circuit.num_clbits() as u32);
        Self {
            output: String::new(),
            qregs,
            cregs,
        }
    }

    fn emit_circuit(&mut self, circuit: &Circuit) {
        self.writeln("OPENQASM 2.0;");
        self.writeln("include \"qelib1.inc\";");

        for reg in self.qregs.clone() {
            self.writeln(&format!("qreg {reg};"));
        }
        for reg in self.cregs.clone() {
            self.writeln(&format!("creg {reg};"));
        }

        for instruction in circuit.instructions() {
            self.emit_instruction(instruction);
        }
    }

    fn emit_instruction(&mut self, instruction: &Instruction) {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let name = gate_name(gate);
                let qubits = self.emit_qubits(instruction);
                let params = gate.parameters();
                if params.is_empty() {
                    self.writeln(&format!("{name} {qubits};"));
                } else {
                    let params = params
                        .iter()
                        .map(|&v| emit_angle(v))
                        .collect::<Vec<_>>()
                        .join(", ");
                    self.writeln(&format!("{name}({params}) {qubits};"));
                }
            }

            InstructionKind::Measure => {
                for (q, c) in instruction.qubits.iter().zip(&instruction.clbits) {
                    let q = label(&self.qregs, q.0);
                    let c = label(&self.cregs, c.0);
                    self.writeln(&format!("measure {q} -> {c};"));
                }
            }

            InstructionKind::Reset => {
                let qubits = self.emit_qubits(instruction);
                self.writeln(&format!("reset {qubits};"));
            }

            InstructionKind::Barrier => {
                let qubits = self.emit_qubits(instruction);
                self.writeln(&format!("barrier {qubits};"));
            }
        }
    }

    fn emit_qubits(&self, instruction: &Instruction) -> String {
        instruction
            .qubits
            .iter()
            .map(|q| label(&self.qregs, q.0))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

/// `qelib1.inc` spelling of a gate.
fn gate_name(gate: &StandardGate) -> &'static str {
    match gate {
        StandardGate::U(..) => "u3",
        StandardGate::P(_) => "u1",
        StandardGate::CP(_) => "cu1",
        other => other.name(),
    }
}

fn registers_or_flat(registers: &[Register], name: &str, wires: u32) -> Vec<Register> {
    let covered: u32 = registers.iter().map(|r| r.size).sum();
    if covered == wires {
        registers.to_vec()
    } else if wires == 0 {
        vec![]
    } else {
        vec![Register::new(name, 0, wires)]
    }
}

fn label(registers: &[Register], id: u32) -> String {
    let mut out = String::new();
    match registers.iter().find(|r| r.contains(id)) {
        Some(reg) => {
            let _ = write!(out, "{}[{}]", reg.name, id - reg.start);
        }
        None => {
            let _ = write!(out, "q[{id}]");
        }
    }
    out
}

/// Format an angle. Simple multiples of pi are written symbolically and
/// everything else with the shortest representation that reads back exactly.
fn emit_angle(v: f64) -> String {
    const EPS: f64 = 1e-12;
    for (value, text) in [
        (PI, "pi"),
        (-PI, "-pi"),
        (PI / 2.0, "pi/2"),
        (-PI / 2.0, "-pi/2"),
        (PI / 4.0, "pi/4"),
        (-PI / 4.0, "-pi/4"),
    ] {
        if (v - value).abs() < EPS {
            return text.to_string();
        }
    }
    format!("{v}")
}
