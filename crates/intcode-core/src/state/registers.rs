use crate::MachineError;

/// The two machine registers: instruction pointer and relative base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Registers {
    ip: usize,
    relative_base: i64,
}

impl Registers {
    /// Reads the instruction pointer.
    #[must_use]
    pub const fn ip(&self) -> usize {
        self.ip
    }

    /// Overrides the instruction pointer (jumps).
    pub const fn set_ip(&mut self, value: usize) {
        self.ip = value;
    }

    /// Moves the instruction pointer past an instruction of `width` cells.
    pub const fn advance(&mut self, width: usize) {
        self.ip += width;
    }

    /// Reads the relative base.
    #[must_use]
    pub const fn relative_base(&self) -> i64 {
        self.relative_base
    }

    /// Adds `delta` to the relative base.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::ArithmeticOverflow`] when the base would leave
    /// the `i64` range; the register is left unchanged.
    pub const fn adjust_relative_base(&mut self, delta: i64) -> Result<i64, MachineError> {
        match self.relative_base.checked_add(delta) {
            Some(base) => {
                self.relative_base = base;
                Ok(base)
            }
            None => Err(MachineError::ArithmeticOverflow { pc: self.ip }),
        }
    }
}
