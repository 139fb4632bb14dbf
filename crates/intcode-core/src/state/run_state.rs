use crate::MachineError;

/// Status returned at every suspension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Status {
    /// The program executed `HALT`.
    Halted,
    /// An input instruction found the queue empty; resume with more input.
    NeedsInput,
}

/// Lifecycle state of a machine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    /// Constructed but never started.
    #[default]
    Idle,
    /// Ready to execute the next instruction.
    Running,
    /// Suspended on an input instruction.
    NeedsInput,
    /// Executed `HALT`.
    Halted,
    /// A fatal fault occurred; only a restart clears it.
    FaultLatched(MachineError),
}

impl RunState {
    /// Returns the currently latched fault, if this state is fault-latched.
    #[must_use]
    pub const fn latched_fault(self) -> Option<MachineError> {
        match self {
            Self::FaultLatched(cause) => Some(cause),
            Self::Idle | Self::Running | Self::NeedsInput | Self::Halted => None,
        }
    }

    /// Suspension status for this state, when it is a suspension point.
    #[must_use]
    pub const fn status(self) -> Option<Status> {
        match self {
            Self::NeedsInput => Some(Status::NeedsInput),
            Self::Halted => Some(Status::Halted),
            Self::Idle | Self::Running | Self::FaultLatched(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RunState, Status};
    use crate::MachineError;

    #[test]
    fn run_state_default_is_idle() {
        assert_eq!(RunState::default(), RunState::Idle);
    }

    #[test]
    fn latched_fault_accessor_reports_only_fault_latched_variant() {
        assert_eq!(RunState::Running.latched_fault(), None);
        assert_eq!(RunState::Halted.latched_fault(), None);
        assert_eq!(
            RunState::FaultLatched(MachineError::NotStarted).latched_fault(),
            Some(MachineError::NotStarted)
        );
    }

    #[test]
    fn only_suspension_points_map_to_status() {
        assert_eq!(RunState::Halted.status(), Some(Status::Halted));
        assert_eq!(RunState::NeedsInput.status(), Some(Status::NeedsInput));
        assert_eq!(RunState::Running.status(), None);
        assert_eq!(RunState::Idle.status(), None);
    }
}
