//! The resumable Intcode machine.

use crate::execute::step_one;
use crate::{
    Input, MachineConfig, MachineError, MachineState, NoopTrace, Output, Program, RunOutcome,
    RunState, Status, StepOutcome, TraceSink,
};

/// One Intcode machine instance.
///
/// A machine owns a private copy of its program image and never shares state
/// with other instances. Callers orchestrating several machines move output
/// values into other machines' input themselves.
#[derive(Debug, Clone)]
pub struct Machine {
    program: Program,
    config: MachineConfig,
    state: MachineState,
}

impl Machine {
    /// Creates a machine with the default configuration.
    #[must_use]
    pub fn new(program: impl Into<Program>) -> Self {
        Self::with_config(program, MachineConfig::default())
    }

    /// Creates a machine that translates text input and renders printable
    /// output as text.
    #[must_use]
    pub fn ascii(program: impl Into<Program>) -> Self {
        Self::with_config(program, MachineConfig::ascii())
    }

    /// Creates a machine with an explicit configuration.
    #[must_use]
    pub fn with_config(program: impl Into<Program>, config: MachineConfig) -> Self {
        Self {
            program: program.into(),
            config,
            state: MachineState::default(),
        }
    }

    /// Configuration this machine was built with.
    #[must_use]
    pub const fn config(&self) -> MachineConfig {
        self.config
    }

    /// Source program image.
    #[must_use]
    pub const fn program(&self) -> &Program {
        &self.program
    }

    /// Resets the machine and runs until it halts or needs input.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::TextInputRejected`] without touching state when
    /// text is given to a non-ASCII machine, or the fault that aborted
    /// execution.
    pub fn start(&mut self, input: impl Into<Input>) -> Result<RunOutcome, MachineError> {
        self.start_traced(input, &mut NoopTrace)
    }

    /// [`Machine::start`] with every executed event reported to `sink`.
    ///
    /// # Errors
    ///
    /// See [`Machine::start`].
    pub fn start_traced(
        &mut self,
        input: impl Into<Input>,
        sink: &mut dyn TraceSink,
    ) -> Result<RunOutcome, MachineError> {
        self.reset(input)?;
        self.run(sink)
    }

    /// Appends input, clears the output buffer, and continues execution from
    /// the current instruction pointer.
    ///
    /// Resuming a halted machine is allowed and halts again immediately.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::NotStarted`] before the first start, the
    /// latched fault after a failed run, [`MachineError::TextInputRejected`]
    /// for text given to a non-ASCII machine, or the fault that aborted
    /// execution.
    pub fn resume(&mut self, input: impl Into<Input>) -> Result<RunOutcome, MachineError> {
        self.resume_traced(input, &mut NoopTrace)
    }

    /// [`Machine::resume`] with every executed event reported to `sink`.
    ///
    /// # Errors
    ///
    /// See [`Machine::resume`].
    pub fn resume_traced(
        &mut self,
        input: impl Into<Input>,
        sink: &mut dyn TraceSink,
    ) -> Result<RunOutcome, MachineError> {
        self.feed(input)?;
        self.state.output.clear();
        self.run(sink)
    }

    /// Reloads the program and queues `input` without executing anything.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::TextInputRejected`] without touching state when
    /// text is given to a non-ASCII machine.
    pub fn reset(&mut self, input: impl Into<Input>) -> Result<(), MachineError> {
        let values = input.into().into_values(self.config.ascii)?;
        self.state = MachineState::load(self.program.as_slice(), self.config.profile);
        self.state.input.extend(values);
        Ok(())
    }

    /// Appends `input` to the queue without executing anything.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::NotStarted`] before the first start, the
    /// latched fault after a failed run, or
    /// [`MachineError::TextInputRejected`].
    pub fn feed(&mut self, input: impl Into<Input>) -> Result<(), MachineError> {
        self.ensure_live()?;
        let values = input.into().into_values(self.config.ascii)?;
        self.state.input.extend(values);
        Ok(())
    }

    /// Executes exactly one instruction.
    ///
    /// Output accumulates until [`Machine::take_output`] or the next
    /// `start`/`resume`. Callers that need a step limit drive the machine with
    /// this method and count steps themselves.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::NotStarted`], the latched fault, or the fault
    /// raised by this instruction.
    pub fn step(&mut self) -> Result<StepOutcome, MachineError> {
        self.step_traced(&mut NoopTrace)
    }

    /// [`Machine::step`] with every executed event reported to `sink`.
    ///
    /// # Errors
    ///
    /// See [`Machine::step`].
    pub fn step_traced(&mut self, sink: &mut dyn TraceSink) -> Result<StepOutcome, MachineError> {
        self.ensure_live()?;
        match step_one(&mut self.state, self.config.profile, sink) {
            Ok(outcome) => {
                self.state.run_state = match outcome {
                    StepOutcome::Retired => RunState::Running,
                    StepOutcome::NeedsInput => RunState::NeedsInput,
                    StepOutcome::Halted => RunState::Halted,
                };
                Ok(outcome)
            }
            Err(fault) => {
                self.state.run_state = RunState::FaultLatched(fault);
                Err(fault)
            }
        }
    }

    /// Drains the output buffer, rendering it as text on ASCII machines when
    /// every value is printable.
    pub fn take_output(&mut self) -> Output {
        let values = std::mem::take(&mut self.state.output);
        if self.config.ascii {
            Output::rendered(values)
        } else {
            Output::raw(values)
        }
    }

    /// Status of the last suspension, if the machine is suspended.
    #[must_use]
    pub const fn status(&self) -> Option<Status> {
        self.state.run_state.status()
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.state.run_state
    }

    /// Current memory image.
    #[must_use]
    pub fn memory(&self) -> &[i64] {
        self.state.memory.as_slice()
    }

    /// Reads one memory cell; cells never touched read as zero.
    #[must_use]
    pub fn read(&self, address: usize) -> i64 {
        self.state.memory.peek(address)
    }

    /// Address of the next instruction to execute.
    #[must_use]
    pub const fn instruction_pointer(&self) -> usize {
        self.state.registers.ip()
    }

    /// Current relative base.
    #[must_use]
    pub const fn relative_base(&self) -> i64 {
        self.state.registers.relative_base()
    }

    /// Number of queued input values not yet consumed.
    #[must_use]
    pub fn pending_input(&self) -> usize {
        self.state.input.len()
    }

    fn ensure_live(&self) -> Result<(), MachineError> {
        match self.state.run_state {
            RunState::Idle => Err(MachineError::NotStarted),
            RunState::FaultLatched(fault) => Err(fault),
            RunState::Running | RunState::NeedsInput | RunState::Halted => Ok(()),
        }
    }

    fn run(&mut self, sink: &mut dyn TraceSink) -> Result<RunOutcome, MachineError> {
        let status = loop {
            match self.step_traced(sink)? {
                StepOutcome::Retired => {}
                StepOutcome::NeedsInput => break Status::NeedsInput,
                StepOutcome::Halted => break Status::Halted,
            }
        };
        Ok(RunOutcome {
            status,
            output: self.take_output(),
        })
    }
}
