//! Host-side support for the `intcode` command-line tool.

use intcode_core as _;
#[cfg(test)]
use tempfile as _;

/// Program loading, run drivers, and output formatting.
pub mod runner;
