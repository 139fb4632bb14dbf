//! Program images and their comma-separated text form.

use std::str::FromStr;

use thiserror::Error;

/// Error returned when program text cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseProgramError {
    /// The text contained no values.
    #[error("program text is empty")]
    Empty,
    /// A field was not a signed decimal integer.
    #[error("invalid value {token:?} at field {field}")]
    InvalidValue {
        /// One-based field index.
        field: usize,
        /// Offending text, trimmed.
        token: String,
    },
}

/// An Intcode program: the initial memory image.
///
/// Machines copy the image on every start and never mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Program {
    cells: Vec<i64>,
}

impl Program {
    /// Wraps an already-parsed integer sequence.
    #[must_use]
    pub const fn new(cells: Vec<i64>) -> Self {
        Self { cells }
    }

    /// Program cells.
    #[must_use]
    pub fn as_slice(&self) -> &[i64] {
        &self.cells
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true for an empty program.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Sets cell `address` of the image, zero-extending when needed.
    ///
    /// Used to seed initial memory parameters before a run.
    pub fn patch(&mut self, address: usize, value: i64) {
        if address >= self.cells.len() {
            self.cells.resize(address + 1, 0);
        }
        self.cells[address] = value;
    }

    /// Returns a copy with every `(address, value)` pair patched in.
    #[must_use]
    pub fn patched(&self, patches: &[(usize, i64)]) -> Self {
        let mut program = self.clone();
        for &(address, value) in patches {
            program.patch(address, value);
        }
        program
    }

    /// Consumes the program, returning its cells.
    #[must_use]
    pub fn into_cells(self) -> Vec<i64> {
        self.cells
    }
}

impl FromStr for Program {
    type Err = ParseProgramError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ParseProgramError::Empty);
        }

        text.split(',')
            .enumerate()
            .map(|(index, token)| {
                let token = token.trim();
                token
                    .parse::<i64>()
                    .map_err(|_| ParseProgramError::InvalidValue {
                        field: index + 1,
                        token: token.to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }
}

impl From<Vec<i64>> for Program {
    fn from(cells: Vec<i64>) -> Self {
        Self::new(cells)
    }
}

impl From<&[i64]> for Program {
    fn from(cells: &[i64]) -> Self {
        Self::new(cells.to_vec())
    }
}

impl<const N: usize> From<[i64; N]> for Program {
    fn from(cells: [i64; N]) -> Self {
        Self::new(cells.to_vec())
    }
}
