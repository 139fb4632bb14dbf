//! Architectural machine state primitives.

/// Instruction pointer and relative base.
pub mod registers;
/// Host-observable run state and suspension status.
pub mod run_state;

pub use registers::Registers;
pub use run_state::{RunState, Status};

use std::collections::VecDeque;

use crate::{Memory, Profile};

/// Complete mutable state of one machine instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MachineState {
    /// Instruction pointer and relative base.
    pub registers: Registers,
    /// Memory image.
    pub memory: Memory,
    /// Pending input, consumed front first.
    pub input: VecDeque<i64>,
    /// Output produced since the last segment boundary.
    pub output: Vec<i64>,
    /// Lifecycle state.
    pub run_state: RunState,
}

impl MachineState {
    /// Fresh state for `program`: registers zeroed, queues empty, memory a copy
    /// of the program.
    #[must_use]
    pub fn load(program: &[i64], profile: Profile) -> Self {
        Self {
            registers: Registers::default(),
            memory: Memory::from_program(program, profile),
            input: VecDeque::new(),
            output: Vec::new(),
            run_state: RunState::Running,
        }
    }
}
