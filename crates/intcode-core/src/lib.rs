//! Core Intcode virtual machine.

/// Fault taxonomy for decode, addressing, memory, and host-contract errors.
pub mod fault;
pub use fault::{FaultClass, MachineError};

/// Public host-facing configuration, outcome, and trace types.
pub mod api;
pub use api::{MachineConfig, NoopTrace, Profile, RunOutcome, StepOutcome, TraceEvent, TraceSink};

/// Input shapes and output rendering at the start/resume boundary.
pub mod io;
pub use io::{encode_text, is_ascii_code, Input, Output};

/// Program images and text parsing.
pub mod program;
pub use program::{ParseProgramError, Program};

/// Memory model with on-demand growth.
pub mod memory;
pub use memory::{resolve_address, Memory};

/// Architectural machine state.
pub mod state;
pub use state::{MachineState, Registers, RunState, Status};

/// Instruction decoding and validation.
pub mod decoder;
pub use decoder::{DecodedInstruction, Decoder, Mode, Opcode, Param, MAX_PARAMETERS};

/// Instruction execution pipeline.
pub mod execute;
pub use execute::{execute_instruction, step_one, ExecuteOutcome};

/// The resumable machine.
pub mod machine;
pub use machine::Machine;

/// Linear-sweep disassembly.
pub mod disasm;
pub use disasm::{disassemble, disassemble_one, format_operand, DisassemblyRow};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
