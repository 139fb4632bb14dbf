//! Program disassembly.
//!
//! Intcode freely mixes code and data, so the listing is a linear sweep: each
//! cell that decodes as an instruction consumes its operands, anything else is
//! shown as a single `.data` cell.

use std::fmt;

use crate::decoder::{Decoder, Mode};
use crate::Profile;

/// A single disassembled row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DisassemblyRow {
    /// Address of the first cell.
    pub address: usize,
    /// Raw cells covered by this row.
    pub cells: Vec<i64>,
    /// Instruction mnemonic, or `.data`.
    pub mnemonic: String,
    /// Formatted operands (`[a]` position, `#v` immediate, `rb+o` relative).
    pub operands: String,
    /// Whether this row is a data cell rather than an instruction.
    pub is_data: bool,
}

impl fmt::Display for DisassemblyRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = self
            .cells
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "{:04}: {:<24} {}", self.address, raw, self.mnemonic)?;
        if !self.operands.is_empty() {
            write!(f, " {}", self.operands)?;
        }
        Ok(())
    }
}

/// Formats one operand in listing syntax.
#[must_use]
pub fn format_operand(mode: Mode, value: i64) -> String {
    match mode {
        Mode::Position => format!("[{value}]"),
        Mode::Immediate => format!("#{value}"),
        Mode::Relative if value < 0 => format!("rb-{}", value.unsigned_abs()),
        Mode::Relative => format!("rb+{value}"),
    }
}

/// Disassembles one row starting at `address`, or `None` past the end.
#[must_use]
pub fn disassemble_one(address: usize, program: &[i64], profile: Profile) -> Option<DisassemblyRow> {
    let raw = *program.get(address)?;

    let instruction = Decoder::decode(raw, address, profile)
        .ok()
        .filter(|instr| address + instr.width() <= program.len());

    let Some(instr) = instruction else {
        return Some(DisassemblyRow {
            address,
            cells: vec![raw],
            mnemonic: ".data".to_owned(),
            operands: String::new(),
            is_data: true,
        });
    };

    let cells = program[address..address + instr.width()].to_vec();
    let operands = cells[1..]
        .iter()
        .enumerate()
        .map(|(offset, &value)| format_operand(instr.modes[offset], value))
        .collect::<Vec<_>>()
        .join(", ");

    Some(DisassemblyRow {
        address,
        cells,
        mnemonic: instr.opcode.mnemonic().to_owned(),
        operands,
        is_data: false,
    })
}

/// Disassembles a whole program image.
#[must_use]
pub fn disassemble(program: &[i64], profile: Profile) -> Vec<DisassemblyRow> {
    let mut rows = Vec::new();
    let mut address = 0;
    while let Some(row) = disassemble_one(address, program, profile) {
        address += row.cells.len();
        rows.push(row);
    }
    rows
}
