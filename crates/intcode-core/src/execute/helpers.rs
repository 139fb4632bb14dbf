//! Parameter fetch and addressing-mode resolution.

use crate::decoder::{DecodedInstruction, Mode, Param};
use crate::memory::resolve_address;
use crate::{MachineError, MachineState};

/// Fetches the one-based parameter `index` of the instruction at `pc`.
///
/// # Errors
///
/// Propagates memory faults from reading the operand cell.
pub fn fetch_param(
    instr: &DecodedInstruction,
    state: &mut MachineState,
    pc: usize,
    index: usize,
) -> Result<Param, MachineError> {
    let value = state.memory.read(pc + index)?;
    Ok(Param {
        mode: instr.mode(index),
        value,
    })
}

/// Computes the absolute address a position or relative parameter refers to.
///
/// # Errors
///
/// Returns [`MachineError::NegativeAddress`] for a negative result,
/// [`MachineError::ArithmeticOverflow`] when `value + relative_base` overflows,
/// and [`MachineError::ImmediateWrite`] for an immediate parameter.
pub fn effective_address(
    param: Param,
    state: &MachineState,
    index: usize,
) -> Result<usize, MachineError> {
    let pc = state.registers.ip();
    let address = match param.mode {
        Mode::Position => param.value,
        Mode::Relative => param
            .value
            .checked_add(state.registers.relative_base())
            .ok_or(MachineError::ArithmeticOverflow { pc })?,
        Mode::Immediate => {
            return Err(MachineError::ImmediateWrite {
                parameter: index,
                pc,
            })
        }
    };
    resolve_address(address)
}

/// Reads the value a parameter denotes.
///
/// # Errors
///
/// Propagates address and memory faults.
pub fn read_param(
    param: Param,
    state: &mut MachineState,
    index: usize,
) -> Result<i64, MachineError> {
    match param.mode {
        Mode::Immediate => Ok(param.value),
        Mode::Position | Mode::Relative => {
            let address = effective_address(param, state, index)?;
            state.memory.read(address)
        }
    }
}
