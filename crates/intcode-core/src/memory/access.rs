//! Address legality helpers.

use crate::MachineError;

/// Converts a computed address into a memory index.
///
/// Valid programs only ever compute non-negative addresses; memory never
/// auto-extends downward.
///
/// # Errors
///
/// Returns [`MachineError::NegativeAddress`] when `address < 0`.
pub fn resolve_address(address: i64) -> Result<usize, MachineError> {
    usize::try_from(address).map_err(|_| MachineError::NegativeAddress { address })
}
