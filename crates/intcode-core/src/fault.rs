use thiserror::Error;

/// Fault classes used for caller-side reporting and policy decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultClass {
    /// Decoder rejected an instruction value.
    Decode,
    /// Parameter mode was invalid for the way the parameter is used.
    Addressing,
    /// Memory access outside the addressable range.
    Memory,
    /// Integer arithmetic left the 64-bit signed range.
    Arithmetic,
    /// Host misused the machine contract.
    Host,
}

/// Fatal machine faults.
///
/// Every variant aborts the current `start`/`resume`/`step` call. The machine
/// latches the fault and reports it again until it is restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum MachineError {
    /// Opcode outside the supported set for the active profile.
    #[error("malformed program: unknown opcode {opcode} (instruction {raw}) at {pc}")]
    MalformedProgram {
        /// Decoded opcode (low two digits) or the raw value when negative.
        opcode: i64,
        /// Full instruction value.
        raw: i64,
        /// Instruction pointer of the offending instruction.
        pc: usize,
    },
    /// Parameter mode digit is not supported by the active profile.
    #[error("invalid addressing mode {mode} for parameter {parameter} at {pc}")]
    InvalidAddressingMode {
        /// Offending mode digit.
        mode: i64,
        /// One-based parameter index.
        parameter: usize,
        /// Instruction pointer of the offending instruction.
        pc: usize,
    },
    /// A write target was encoded in immediate mode.
    #[error("write through immediate mode for parameter {parameter} at {pc}")]
    ImmediateWrite {
        /// One-based parameter index.
        parameter: usize,
        /// Instruction pointer of the offending instruction.
        pc: usize,
    },
    /// A computed address was negative.
    #[error("negative address {address}")]
    NegativeAddress {
        /// Offending computed address.
        address: i64,
    },
    /// Access past the end of fixed-size memory (basic profile only).
    #[error("address {address} outside fixed memory of {len} cells")]
    AddressOutOfBounds {
        /// Offending address.
        address: usize,
        /// Memory length at the time of the access.
        len: usize,
    },
    /// Growing memory to reach `address` failed to allocate.
    #[error("memory exhausted growing to address {address}")]
    MemoryExhausted {
        /// Address the access tried to reach.
        address: usize,
    },
    /// Addition, multiplication, or relative-base adjustment overflowed `i64`.
    #[error("arithmetic overflow at {pc}")]
    ArithmeticOverflow {
        /// Instruction pointer of the offending instruction.
        pc: usize,
    },
    /// Text input supplied to a machine without ASCII translation enabled.
    #[error("text input requires an ascii machine")]
    TextInputRejected,
    /// `resume` or `step` called before `start`.
    #[error("machine has not been started")]
    NotStarted,
}

impl MachineError {
    /// Returns the fault class for this error.
    #[must_use]
    pub const fn class(self) -> FaultClass {
        match self {
            Self::MalformedProgram { .. } => FaultClass::Decode,
            Self::InvalidAddressingMode { .. } | Self::ImmediateWrite { .. } => {
                FaultClass::Addressing
            }
            Self::NegativeAddress { .. }
            | Self::AddressOutOfBounds { .. }
            | Self::MemoryExhausted { .. } => FaultClass::Memory,
            Self::ArithmeticOverflow { .. } => FaultClass::Arithmetic,
            Self::TextInputRejected | Self::NotStarted => FaultClass::Host,
        }
    }

    /// Host faults reject the call without touching machine state.
    #[must_use]
    pub const fn is_host_fault(self) -> bool {
        matches!(self.class(), FaultClass::Host)
    }
}
