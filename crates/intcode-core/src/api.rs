//! Public host-facing API contracts for embedding the machine.

use crate::{Output, Status};

/// Instruction-set profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Profile {
    /// Full instruction set: relative mode, opcode 9, auto-extending memory.
    #[default]
    Complete,
    /// Restricted early variant: opcodes 1-8 and 99, position and immediate
    /// modes only, memory fixed at the program's length.
    Basic,
}

/// Top-level immutable configuration for a machine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineConfig {
    /// Instruction-set profile.
    pub profile: Profile,
    /// Translate text input to character codes and render printable output
    /// as text.
    pub ascii: bool,
}

impl MachineConfig {
    /// Default configuration with ASCII translation enabled.
    #[must_use]
    pub fn ascii() -> Self {
        Self {
            ascii: true,
            ..Self::default()
        }
    }
}

/// Result of one `start` or `resume` call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RunOutcome {
    /// Why execution stopped.
    pub status: Status,
    /// Output produced during this call only.
    pub output: Output,
}

/// Result of executing a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// Instruction retired; the machine can keep stepping.
    Retired,
    /// Input instruction found the queue empty. Nothing was mutated.
    NeedsInput,
    /// `HALT` reached.
    Halted,
}

impl StepOutcome {
    /// Suspension status, if this step ended a run segment.
    #[must_use]
    pub const fn status(self) -> Option<Status> {
        match self {
            Self::Retired => None,
            Self::NeedsInput => Some(Status::NeedsInput),
            Self::Halted => Some(Status::Halted),
        }
    }
}

/// Deterministic trace events emitted in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum TraceEvent {
    /// An instruction was fetched and decoded.
    InstructionStart {
        /// Instruction pointer used for the fetch.
        pc: usize,
        /// Raw instruction value.
        raw: i64,
    },
    /// A memory cell was written.
    MemoryWrite {
        /// Target address.
        address: usize,
        /// Value written.
        value: i64,
    },
    /// An input value was popped from the queue.
    InputConsumed {
        /// Value consumed.
        value: i64,
    },
    /// A value was appended to the output buffer.
    OutputProduced {
        /// Value produced.
        value: i64,
    },
    /// A jump instruction changed the instruction pointer.
    Jump {
        /// Address of the jump instruction.
        from: usize,
        /// New instruction pointer.
        to: usize,
    },
    /// The relative base changed.
    RelativeBaseAdjusted {
        /// New relative base.
        base: i64,
    },
    /// Execution suspended waiting for input.
    Suspended {
        /// Address of the input instruction that will be re-executed.
        pc: usize,
    },
    /// Execution reached `HALT`.
    Halted {
        /// Address of the halt instruction.
        pc: usize,
    },
}

/// Sink trait for deterministic trace hooks.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTrace;

impl TraceSink for NoopTrace {
    fn on_event(&mut self, _event: TraceEvent) {}
}

impl TraceSink for Vec<TraceEvent> {
    fn on_event(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::{MachineConfig, NoopTrace, Profile, StepOutcome, TraceEvent, TraceSink};
    use crate::Status;

    #[test]
    fn default_config_is_complete_without_ascii() {
        let config = MachineConfig::default();
        assert_eq!(config.profile, Profile::Complete);
        assert!(!config.ascii);
        assert!(MachineConfig::ascii().ascii);
    }

    #[test]
    fn step_outcome_maps_to_status() {
        assert_eq!(StepOutcome::Retired.status(), None);
        assert_eq!(StepOutcome::NeedsInput.status(), Some(Status::NeedsInput));
        assert_eq!(StepOutcome::Halted.status(), Some(Status::Halted));
    }

    #[test]
    fn vec_sink_records_in_order() {
        let mut events = Vec::new();
        events.on_event(TraceEvent::InputConsumed { value: 1 });
        events.on_event(TraceEvent::Halted { pc: 2 });
        assert_eq!(
            events,
            vec![
                TraceEvent::InputConsumed { value: 1 },
                TraceEvent::Halted { pc: 2 }
            ]
        );

        NoopTrace.on_event(TraceEvent::Halted { pc: 0 });
    }
}
