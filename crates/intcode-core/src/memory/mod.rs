//! Memory model: a zero-initialized cell array that grows on demand.

/// Address legality helpers.
pub mod access;

pub use access::resolve_address;

use crate::{MachineError, Profile};

/// Machine memory image.
///
/// Under [`Profile::Complete`] any access past the current length extends the
/// image with zeros up to and including the accessed address. Under
/// [`Profile::Basic`] the image keeps the program's length and such accesses
/// fault.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Memory {
    cells: Vec<i64>,
    growable: bool,
}

impl Memory {
    /// Creates a memory image holding a fresh copy of `program`.
    #[must_use]
    pub fn from_program(program: &[i64], profile: Profile) -> Self {
        Self {
            cells: program.to_vec(),
            growable: matches!(profile, Profile::Complete),
        }
    }

    /// Current number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true when no cells are allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns true when out-of-range accesses extend the image.
    #[must_use]
    pub const fn is_growable(&self) -> bool {
        self.growable
    }

    /// Read-only view of every allocated cell.
    #[must_use]
    pub fn as_slice(&self) -> &[i64] {
        &self.cells
    }

    /// Reads the cell at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::AddressOutOfBounds`] when memory is fixed-size
    /// and `address` is past its end, or [`MachineError::MemoryExhausted`]
    /// when growing to `address` cannot be allocated.
    pub fn read(&mut self, address: usize) -> Result<i64, MachineError> {
        self.ensure(address)?;
        Ok(self.cells[address])
    }

    /// Writes `value` to the cell at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::AddressOutOfBounds`] when memory is fixed-size
    /// and `address` is past its end, or [`MachineError::MemoryExhausted`]
    /// when growing to `address` cannot be allocated.
    pub fn write(&mut self, address: usize, value: i64) -> Result<(), MachineError> {
        self.ensure(address)?;
        self.cells[address] = value;
        Ok(())
    }

    /// Reads a cell without extending memory; unallocated cells read as zero.
    #[must_use]
    pub fn peek(&self, address: usize) -> i64 {
        self.cells.get(address).copied().unwrap_or(0)
    }

    fn ensure(&mut self, address: usize) -> Result<(), MachineError> {
        if address < self.cells.len() {
            return Ok(());
        }
        if !self.growable {
            return Err(MachineError::AddressOutOfBounds {
                address,
                len: self.cells.len(),
            });
        }
        let exhausted = MachineError::MemoryExhausted { address };
        let new_len = address.checked_add(1).ok_or(exhausted)?;
        self.cells
            .try_reserve_exact(new_len - self.cells.len())
            .map_err(|_| exhausted)?;
        self.cells.resize(new_len, 0);
        Ok(())
    }
}
