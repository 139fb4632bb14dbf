//! Instruction execution pipeline.
//!
//! Each step follows the same order:
//! 1. Fetch the instruction cell and decode it
//! 2. Fetch operand cells
//! 3. Read source operands and compute the result
//! 4. Write the destination cell or queue
//! 5. Advance or override the instruction pointer
//!
//! An input instruction that finds the queue empty returns before step 3 and
//! leaves every register, cell, and queue untouched so it can be re-executed.

mod helpers;

pub use helpers::{effective_address, fetch_param, read_param};

use crate::decoder::{DecodedInstruction, Decoder, Opcode};
use crate::memory::resolve_address;
use crate::{MachineError, MachineState, Profile, StepOutcome, TraceEvent, TraceSink};

/// Instruction-pointer effect of one executed instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// Advance past the instruction and its operands.
    Advance,
    /// Continue at the given address; the default advance is suppressed.
    Jump(usize),
    /// Input queue was empty; nothing changed.
    Suspend,
    /// `HALT` executed.
    Halt,
}

/// Executes one decoded instruction against `state`.
///
/// # Errors
///
/// Returns the fault raised by operand access, arithmetic, or jump-target
/// resolution. Faults during the write phase happen after every read, so the
/// only mutation that can precede a fault is memory growth from reads.
pub fn execute_instruction(
    instr: &DecodedInstruction,
    state: &mut MachineState,
    sink: &mut dyn TraceSink,
) -> Result<ExecuteOutcome, MachineError> {
    let pc = state.registers.ip();
    match instr.opcode {
        Opcode::Add => execute_arith(instr, state, sink, pc, i64::checked_add),
        Opcode::Multiply => execute_arith(instr, state, sink, pc, i64::checked_mul),
        Opcode::LessThan => execute_arith(instr, state, sink, pc, |a, b| Some(i64::from(a < b))),
        Opcode::Equals => execute_arith(instr, state, sink, pc, |a, b| Some(i64::from(a == b))),
        Opcode::Input => execute_input(instr, state, sink, pc),
        Opcode::Output => execute_output(instr, state, sink, pc),
        Opcode::JumpIfTrue => execute_jump(instr, state, pc, |a| a != 0),
        Opcode::JumpIfFalse => execute_jump(instr, state, pc, |a| a == 0),
        Opcode::AdjustRelativeBase => execute_adjust_relative_base(instr, state, sink, pc),
        Opcode::Halt => Ok(ExecuteOutcome::Halt),
    }
}

/// Fetches, decodes, and executes the instruction at the instruction pointer.
///
/// # Errors
///
/// Returns any decode, memory, addressing, or arithmetic fault.
pub fn step_one(
    state: &mut MachineState,
    profile: Profile,
    sink: &mut dyn TraceSink,
) -> Result<StepOutcome, MachineError> {
    let pc = state.registers.ip();
    let raw = state.memory.read(pc)?;
    sink.on_event(TraceEvent::InstructionStart { pc, raw });

    let instr = Decoder::decode(raw, pc, profile)?;
    match execute_instruction(&instr, state, sink)? {
        ExecuteOutcome::Advance => {
            state.registers.advance(instr.width());
            Ok(StepOutcome::Retired)
        }
        ExecuteOutcome::Jump(to) => {
            state.registers.set_ip(to);
            sink.on_event(TraceEvent::Jump { from: pc, to });
            Ok(StepOutcome::Retired)
        }
        ExecuteOutcome::Suspend => {
            sink.on_event(TraceEvent::Suspended { pc });
            Ok(StepOutcome::NeedsInput)
        }
        ExecuteOutcome::Halt => {
            sink.on_event(TraceEvent::Halted { pc });
            Ok(StepOutcome::Halted)
        }
    }
}

fn write_cell(
    state: &mut MachineState,
    sink: &mut dyn TraceSink,
    address: usize,
    value: i64,
) -> Result<(), MachineError> {
    state.memory.write(address, value)?;
    sink.on_event(TraceEvent::MemoryWrite { address, value });
    Ok(())
}

fn execute_arith(
    instr: &DecodedInstruction,
    state: &mut MachineState,
    sink: &mut dyn TraceSink,
    pc: usize,
    op: impl Fn(i64, i64) -> Option<i64>,
) -> Result<ExecuteOutcome, MachineError> {
    let a = fetch_param(instr, state, pc, 1)?;
    let b = fetch_param(instr, state, pc, 2)?;
    let c = fetch_param(instr, state, pc, 3)?;

    let a = read_param(a, state, 1)?;
    let b = read_param(b, state, 2)?;
    let result = op(a, b).ok_or(MachineError::ArithmeticOverflow { pc })?;

    let target = effective_address(c, state, 3)?;
    write_cell(state, sink, target, result)?;
    Ok(ExecuteOutcome::Advance)
}

fn execute_input(
    instr: &DecodedInstruction,
    state: &mut MachineState,
    sink: &mut dyn TraceSink,
    pc: usize,
) -> Result<ExecuteOutcome, MachineError> {
    if state.input.is_empty() {
        return Ok(ExecuteOutcome::Suspend);
    }

    let a = fetch_param(instr, state, pc, 1)?;
    let target = effective_address(a, state, 1)?;
    if let Some(value) = state.input.pop_front() {
        sink.on_event(TraceEvent::InputConsumed { value });
        write_cell(state, sink, target, value)?;
    }
    Ok(ExecuteOutcome::Advance)
}

fn execute_output(
    instr: &DecodedInstruction,
    state: &mut MachineState,
    sink: &mut dyn TraceSink,
    pc: usize,
) -> Result<ExecuteOutcome, MachineError> {
    let a = fetch_param(instr, state, pc, 1)?;
    let value = read_param(a, state, 1)?;
    state.output.push(value);
    sink.on_event(TraceEvent::OutputProduced { value });
    Ok(ExecuteOutcome::Advance)
}

fn execute_jump(
    instr: &DecodedInstruction,
    state: &mut MachineState,
    pc: usize,
    condition: impl Fn(i64) -> bool,
) -> Result<ExecuteOutcome, MachineError> {
    let a = fetch_param(instr, state, pc, 1)?;
    let b = fetch_param(instr, state, pc, 2)?;

    if !condition(read_param(a, state, 1)?) {
        return Ok(ExecuteOutcome::Advance);
    }
    let target = resolve_address(read_param(b, state, 2)?)?;
    Ok(ExecuteOutcome::Jump(target))
}

fn execute_adjust_relative_base(
    instr: &DecodedInstruction,
    state: &mut MachineState,
    sink: &mut dyn TraceSink,
    pc: usize,
) -> Result<ExecuteOutcome, MachineError> {
    let a = fetch_param(instr, state, pc, 1)?;
    let delta = read_param(a, state, 1)?;
    let base = state.registers.adjust_relative_base(delta)?;
    sink.on_event(TraceEvent::RelativeBaseAdjusted { base });
    Ok(ExecuteOutcome::Advance)
}
