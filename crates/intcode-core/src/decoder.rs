//! Instruction decoder for Intcode.
//!
//! An instruction value `ABCDE` carries the opcode in its low two digits
//! (`DE`) and one addressing-mode digit per parameter (`C` for the first,
//! `B` for the second, `A` for the third). Omitted mode digits are zero.
//!
//! Decoding validates the opcode and every mode digit the opcode actually
//! uses before any operand is read, so a faulting instruction never has
//! partial side effects.

use crate::{MachineError, Profile};

/// Maximum number of parameters any opcode takes.
pub const MAX_PARAMETERS: usize = 3;

/// Closed set of Intcode opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum Opcode {
    /// `mem[c] = a + b`.
    Add = 1,
    /// `mem[c] = a * b`.
    Multiply = 2,
    /// Pops one queued input value into `mem[a]`, or suspends.
    Input = 3,
    /// Appends `a` to the output buffer.
    Output = 4,
    /// Jumps to `b` when `a != 0`.
    JumpIfTrue = 5,
    /// Jumps to `b` when `a == 0`.
    JumpIfFalse = 6,
    /// `mem[c] = (a < b) as i64`.
    LessThan = 7,
    /// `mem[c] = (a == b) as i64`.
    Equals = 8,
    /// `relative_base += a`.
    AdjustRelativeBase = 9,
    /// Stops the machine.
    ///
    /// Selected by the low two digits like every other opcode, so mode digits
    /// are ignored and `199` halts too. Stricter hosts that only accept a bare
    /// `99` reject such cells as unknown opcodes.
    Halt = 99,
}

impl Opcode {
    /// Every opcode in ascending numeric order.
    pub const ALL: [Self; 10] = [
        Self::Add,
        Self::Multiply,
        Self::Input,
        Self::Output,
        Self::JumpIfTrue,
        Self::JumpIfFalse,
        Self::LessThan,
        Self::Equals,
        Self::AdjustRelativeBase,
        Self::Halt,
    ];

    /// Converts the low two digits of an instruction into an opcode.
    #[must_use]
    pub const fn from_i64(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::Add),
            2 => Some(Self::Multiply),
            3 => Some(Self::Input),
            4 => Some(Self::Output),
            5 => Some(Self::JumpIfTrue),
            6 => Some(Self::JumpIfFalse),
            7 => Some(Self::LessThan),
            8 => Some(Self::Equals),
            9 => Some(Self::AdjustRelativeBase),
            99 => Some(Self::Halt),
            _ => None,
        }
    }

    /// Numeric opcode value.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self as i64
    }

    /// Number of parameters following the instruction cell.
    #[must_use]
    pub const fn parameter_count(self) -> usize {
        match self {
            Self::Add | Self::Multiply | Self::LessThan | Self::Equals => 3,
            Self::JumpIfTrue | Self::JumpIfFalse => 2,
            Self::Input | Self::Output | Self::AdjustRelativeBase => 1,
            Self::Halt => 0,
        }
    }

    /// One-based index of the parameter this opcode writes through, if any.
    #[must_use]
    pub const fn write_parameter(self) -> Option<usize> {
        match self {
            Self::Add | Self::Multiply | Self::LessThan | Self::Equals => Some(3),
            Self::Input => Some(1),
            Self::Output
            | Self::JumpIfTrue
            | Self::JumpIfFalse
            | Self::AdjustRelativeBase
            | Self::Halt => None,
        }
    }

    /// Short assembly mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Multiply => "MUL",
            Self::Input => "IN",
            Self::Output => "OUT",
            Self::JumpIfTrue => "JNZ",
            Self::JumpIfFalse => "JZ",
            Self::LessThan => "LT",
            Self::Equals => "EQ",
            Self::AdjustRelativeBase => "ARB",
            Self::Halt => "HALT",
        }
    }

    /// Returns true when the opcode exists in the given profile.
    #[must_use]
    pub const fn is_supported_by(self, profile: Profile) -> bool {
        match profile {
            Profile::Complete => true,
            Profile::Basic => !matches!(self, Self::AdjustRelativeBase),
        }
    }
}

/// Parameter addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Mode {
    /// Operand is an address to read or write through.
    #[default]
    Position,
    /// Operand is the literal value. Read-only.
    Immediate,
    /// Operand plus the relative base is the address.
    Relative,
}

impl Mode {
    /// Converts a single mode digit into a mode.
    #[must_use]
    pub const fn from_digit(digit: i64) -> Option<Self> {
        match digit {
            0 => Some(Self::Position),
            1 => Some(Self::Immediate),
            2 => Some(Self::Relative),
            _ => None,
        }
    }

    /// Returns true when the mode exists in the given profile.
    #[must_use]
    pub const fn is_supported_by(self, profile: Profile) -> bool {
        match profile {
            Profile::Complete => true,
            Profile::Basic => !matches!(self, Self::Relative),
        }
    }
}

/// One decoded operand: its mode and the raw cell value that follows the
/// instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Param {
    /// Addressing mode.
    pub mode: Mode,
    /// Raw operand cell.
    pub value: i64,
}

/// Validated opcode plus parameter modes.
///
/// Operand cells are not part of the decoded instruction; they are fetched by
/// the execution pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodedInstruction {
    /// Opcode.
    pub opcode: Opcode,
    /// Modes for parameters `1..=3`. Entries beyond the opcode's parameter
    /// count are always [`Mode::Position`].
    pub modes: [Mode; MAX_PARAMETERS],
    /// Raw instruction value.
    pub raw: i64,
}

impl DecodedInstruction {
    /// Number of cells occupied by the instruction and its operands.
    #[must_use]
    pub const fn width(&self) -> usize {
        1 + self.opcode.parameter_count()
    }

    /// Mode for the one-based parameter `index`.
    #[must_use]
    pub const fn mode(&self, index: usize) -> Mode {
        self.modes[index - 1]
    }
}

/// Stateless instruction decoder.
pub struct Decoder;

impl Decoder {
    /// Decodes and validates the instruction value `raw` found at `pc`.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::MalformedProgram`] for an unknown opcode,
    /// [`MachineError::InvalidAddressingMode`] for a mode digit the profile
    /// does not support, and [`MachineError::ImmediateWrite`] when a write
    /// parameter is encoded in immediate mode.
    pub fn decode(raw: i64, pc: usize, profile: Profile) -> Result<DecodedInstruction, MachineError> {
        let malformed = MachineError::MalformedProgram {
            opcode: if raw < 0 { raw } else { raw % 100 },
            raw,
            pc,
        };
        if raw < 0 {
            return Err(malformed);
        }

        let opcode = Opcode::from_i64(raw % 100)
            .filter(|op| op.is_supported_by(profile))
            .ok_or(malformed)?;

        let mut modes = [Mode::Position; MAX_PARAMETERS];
        let mut digits = raw / 100;
        for (offset, slot) in modes.iter_mut().take(opcode.parameter_count()).enumerate() {
            let parameter = offset + 1;
            let digit = digits % 10;
            digits /= 10;

            let mode = Mode::from_digit(digit)
                .filter(|mode| mode.is_supported_by(profile))
                .ok_or(MachineError::InvalidAddressingMode {
                    mode: digit,
                    parameter,
                    pc,
                })?;

            if mode == Mode::Immediate && opcode.write_parameter() == Some(parameter) {
                return Err(MachineError::ImmediateWrite { parameter, pc });
            }
            *slot = mode;
        }

        Ok(DecodedInstruction { opcode, modes, raw })
    }
}

#[cfg(test)]
mod tests {
    use super::{Decoder, Mode, Opcode};
    use crate::{MachineError, Profile};

    #[test]
    fn opcode_table_roundtrips() {
        for opcode in Opcode::ALL {
            assert_eq!(Opcode::from_i64(opcode.as_i64()), Some(opcode));
        }
        assert_eq!(Opcode::from_i64(0), None);
        assert_eq!(Opcode::from_i64(10), None);
        assert_eq!(Opcode::from_i64(98), None);
    }

    #[test]
    fn parameter_counts_match_instruction_set() {
        let counts: Vec<usize> = Opcode::ALL.iter().map(|op| op.parameter_count()).collect();
        assert_eq!(counts, vec![3, 3, 1, 1, 2, 2, 3, 3, 1, 0]);
    }

    #[test]
    fn omitted_mode_digits_default_to_position() {
        let decoded = Decoder::decode(2, 0, Profile::Complete).expect("valid multiply");
        assert_eq!(decoded.opcode, Opcode::Multiply);
        assert_eq!(decoded.modes, [Mode::Position; 3]);
        assert_eq!(decoded.width(), 4);
    }

    #[test]
    fn mode_digits_are_read_least_significant_parameter_first() {
        let decoded = Decoder::decode(21_002, 0, Profile::Complete).expect("valid multiply");
        assert_eq!(decoded.mode(1), Mode::Position);
        assert_eq!(decoded.mode(2), Mode::Immediate);
        assert_eq!(decoded.mode(3), Mode::Relative);
    }

    #[test]
    fn halt_ignores_mode_digits() {
        let decoded = Decoder::decode(199, 4, Profile::Complete).expect("halt decodes");
        assert_eq!(decoded.opcode, Opcode::Halt);
        assert_eq!(decoded.width(), 1);
    }

    #[test]
    fn unknown_opcode_is_malformed() {
        assert_eq!(
            Decoder::decode(1042, 12, Profile::Complete),
            Err(MachineError::MalformedProgram {
                opcode: 42,
                raw: 1042,
                pc: 12
            })
        );
    }

    #[test]
    fn negative_instruction_is_malformed() {
        assert_eq!(
            Decoder::decode(-1, 0, Profile::Complete),
            Err(MachineError::MalformedProgram {
                opcode: -1,
                raw: -1,
                pc: 0
            })
        );
    }

    #[test]
    fn unknown_mode_digit_is_rejected() {
        assert_eq!(
            Decoder::decode(301, 0, Profile::Complete),
            Err(MachineError::InvalidAddressingMode {
                mode: 3,
                parameter: 1,
                pc: 0
            })
        );
    }

    #[test]
    fn unused_mode_digits_are_not_validated() {
        let decoded = Decoder::decode(90_004, 0, Profile::Complete).expect("output decodes");
        assert_eq!(decoded.opcode, Opcode::Output);
    }

    #[test]
    fn immediate_write_target_is_rejected() {
        assert_eq!(
            Decoder::decode(11_101, 3, Profile::Complete),
            Err(MachineError::ImmediateWrite { parameter: 3, pc: 3 })
        );
        assert_eq!(
            Decoder::decode(103, 0, Profile::Complete),
            Err(MachineError::ImmediateWrite { parameter: 1, pc: 0 })
        );
    }

    #[test]
    fn basic_profile_rejects_relative_features() {
        assert!(matches!(
            Decoder::decode(9, 0, Profile::Basic),
            Err(MachineError::MalformedProgram { opcode: 9, .. })
        ));
        assert!(matches!(
            Decoder::decode(204, 0, Profile::Basic),
            Err(MachineError::InvalidAddressingMode { mode: 2, .. })
        ));
        assert!(Decoder::decode(204, 0, Profile::Complete).is_ok());
    }
}
