//! Program loading and host-side drivers for the `intcode` binary.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use intcode_core::{
    disassemble, Input, Machine, MachineConfig, MachineError, Output, ParseProgramError, Profile,
    Program, Status, StepOutcome, TraceEvent, TraceSink,
};

/// Options for a single `run` invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunOptions {
    /// Integers queued before execution starts.
    pub input: Vec<i64>,
    /// Text queued after `input`, as character codes. Implies ASCII mode.
    pub text: Option<String>,
    /// Render printable output as text.
    pub ascii: bool,
    /// Use the restricted basic instruction set.
    pub basic: bool,
    /// Print every trace event to stderr.
    pub trace: bool,
    /// Fail when execution needs more than this many instructions.
    pub max_steps: Option<u64>,
}

impl RunOptions {
    /// Machine configuration implied by these options.
    #[must_use]
    pub const fn machine_config(&self) -> MachineConfig {
        MachineConfig {
            profile: if self.basic {
                Profile::Basic
            } else {
                Profile::Complete
            },
            ascii: self.ascii || self.text.is_some(),
        }
    }
}

/// Result of a completed `run` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Status at the suspension point.
    pub status: Status,
    /// Output produced by the run.
    pub output: Output,
    /// Instructions executed, when counted.
    pub steps: Option<u64>,
}

/// Errors surfaced by the command-line driver.
#[derive(Debug)]
pub enum CliError {
    /// Program file could not be read.
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Program file was not valid Intcode text.
    Parse {
        /// Path that failed.
        path: PathBuf,
        /// Parse failure.
        source: ParseProgramError,
    },
    /// Writing results to stdout failed.
    Output(io::Error),
    /// The machine faulted.
    Machine(MachineError),
    /// Execution exceeded `--max-steps`.
    StepLimit {
        /// Configured limit.
        limit: u64,
    },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Parse { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Output(source) => write!(f, "failed to write output: {source}"),
            Self::Machine(fault) => write!(f, "machine fault: {fault}"),
            Self::StepLimit { limit } => write!(f, "step limit of {limit} exceeded"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Output(source) => Some(source),
            Self::Machine(fault) => Some(fault),
            Self::StepLimit { .. } => None,
        }
    }
}

impl From<MachineError> for CliError {
    fn from(fault: MachineError) -> Self {
        Self::Machine(fault)
    }
}

/// Reads and parses a program file.
///
/// # Errors
///
/// Returns [`CliError::Io`] or [`CliError::Parse`].
pub fn load_program(path: &Path) -> Result<Program, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    text.parse().map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a comma-separated list of integers given on the command line.
///
/// # Errors
///
/// Returns a message naming the first invalid value.
pub fn parse_input_values(text: &str) -> Result<Vec<i64>, String> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|_| format!("invalid input value: {token}"))
        })
        .collect()
}

/// Expands `\n` and `\t` escapes in text given on the command line.
#[must_use]
pub fn unescape_text(text: &str) -> String {
    text.replace("\\n", "\n").replace("\\t", "\t")
}

/// Runs `program` until it halts or needs input.
///
/// # Errors
///
/// Returns [`CliError::Machine`] on a fault and [`CliError::StepLimit`] when
/// `max_steps` is exceeded.
pub fn run_program(
    program: Program,
    options: &RunOptions,
    sink: &mut dyn TraceSink,
) -> Result<RunReport, CliError> {
    let mut machine = Machine::with_config(program, options.machine_config());
    machine.reset(options.input.clone())?;
    if let Some(text) = &options.text {
        machine.feed(Input::Text(text.clone()))?;
    }

    let Some(limit) = options.max_steps else {
        let outcome = machine.resume_traced((), sink)?;
        return Ok(RunReport {
            status: outcome.status,
            output: outcome.output,
            steps: None,
        });
    };

    let mut steps = 0;
    let status = loop {
        if steps == limit {
            return Err(CliError::StepLimit { limit });
        }
        steps += 1;
        match machine.step_traced(sink)? {
            StepOutcome::Retired => {}
            StepOutcome::NeedsInput => break Status::NeedsInput,
            StepOutcome::Halted => break Status::Halted,
        }
    };
    Ok(RunReport {
        status,
        output: machine.take_output(),
        steps: Some(steps),
    })
}

/// Formats output for stdout: rendered text verbatim, otherwise one value per
/// line.
#[must_use]
pub fn format_output(output: &Output) -> String {
    output.text().map_or_else(
        || {
            output
                .values()
                .iter()
                .map(|value| format!("{value}\n"))
                .collect()
        },
        ToOwned::to_owned,
    )
}

/// Writes `text` and flushes. A closed pipe on the reading side is not an
/// error.
///
/// # Errors
///
/// Returns [`CliError::Output`] for any other write failure.
pub fn write_output(writer: &mut impl Write, text: &str) -> Result<(), CliError> {
    match writer.write_all(text.as_bytes()).and_then(|()| writer.flush()) {
        Err(error) if error.kind() != io::ErrorKind::BrokenPipe => Err(CliError::Output(error)),
        _ => Ok(()),
    }
}

/// Human-readable status label.
#[must_use]
pub const fn status_label(status: Status) -> &'static str {
    match status {
        Status::Halted => "halted",
        Status::NeedsInput => "needs-input",
    }
}

/// Renders a full disassembly listing, one row per line.
#[must_use]
pub fn disassembly_listing(program: &Program, profile: Profile) -> String {
    disassemble(program.as_slice(), profile)
        .iter()
        .map(|row| format!("{row}\n"))
        .collect()
}

/// Formats one trace event as a single line.
#[must_use]
pub fn format_event(event: &TraceEvent) -> String {
    match *event {
        TraceEvent::InstructionStart { pc, raw } => format!("{pc:04}: fetch {raw}"),
        TraceEvent::MemoryWrite { address, value } => format!("      [{address}] <- {value}"),
        TraceEvent::InputConsumed { value } => format!("      in {value}"),
        TraceEvent::OutputProduced { value } => format!("      out {value}"),
        TraceEvent::Jump { from, to } => format!("      jump {from} -> {to}"),
        TraceEvent::RelativeBaseAdjusted { base } => format!("      rb = {base}"),
        TraceEvent::Suspended { pc } => format!("{pc:04}: waiting for input"),
        TraceEvent::Halted { pc } => format!("{pc:04}: halt"),
    }
}

/// Trace sink printing each event to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrTrace;

impl TraceSink for StderrTrace {
    fn on_event(&mut self, event: TraceEvent) {
        eprintln!("{}", format_event(&event));
    }
}

#[cfg(test)]
mod tests {
    use super::{
        format_event, format_output, parse_input_values, run_program, status_label,
        unescape_text, write_output, CliError, RunOptions,
    };
    use std::io::{self, Write};
    use intcode_core::{MachineError, NoopTrace, Output, Profile, Program, Status, TraceEvent};

    #[test]
    fn parses_input_lists() {
        assert_eq!(parse_input_values("1, -2,3"), Ok(vec![1, -2, 3]));
        assert_eq!(parse_input_values(""), Ok(vec![]));
        assert!(parse_input_values("1,x")
            .expect_err("bad value")
            .contains("invalid input value: x"));
    }

    #[test]
    fn unescapes_newlines() {
        assert_eq!(unescape_text("WALK\\n"), "WALK\n");
    }

    #[test]
    fn options_map_to_machine_config() {
        let options = RunOptions {
            basic: true,
            text: Some("x".to_owned()),
            ..RunOptions::default()
        };
        let config = options.machine_config();
        assert_eq!(config.profile, Profile::Basic);
        assert!(config.ascii);
        assert!(!RunOptions::default().machine_config().ascii);
    }

    #[test]
    fn runs_to_suspension_with_queued_input() {
        let options = RunOptions {
            input: vec![5],
            ..RunOptions::default()
        };
        let report = run_program(Program::from([3, 9, 4, 9, 3, 9, 4, 9, 99]), &options, &mut NoopTrace)
            .expect("runs");
        assert_eq!(report.status, Status::NeedsInput);
        assert_eq!(report.output.values(), &[5]);
        assert_eq!(report.steps, None);
    }

    #[test]
    fn counts_steps_under_a_limit() {
        let options = RunOptions {
            max_steps: Some(10),
            ..RunOptions::default()
        };
        let report =
            run_program(Program::from([104, 1, 99]), &options, &mut NoopTrace).expect("runs");
        assert_eq!(report.status, Status::Halted);
        assert_eq!(report.steps, Some(2));
    }

    #[test]
    fn infinite_loop_hits_step_limit() {
        let options = RunOptions {
            max_steps: Some(50),
            ..RunOptions::default()
        };
        let error = run_program(Program::from([1105, 1, 0]), &options, &mut NoopTrace)
            .expect_err("never halts");
        assert!(matches!(error, CliError::StepLimit { limit: 50 }));
    }

    #[test]
    fn faults_are_wrapped() {
        let error = run_program(Program::from([42]), &RunOptions::default(), &mut NoopTrace)
            .expect_err("malformed");
        assert!(matches!(
            error,
            CliError::Machine(MachineError::MalformedProgram { opcode: 42, .. })
        ));
        assert!(error.to_string().starts_with("machine fault:"));
    }

    #[test]
    fn text_options_feed_character_codes() {
        let options = RunOptions {
            text: Some("Hi".to_owned()),
            ..RunOptions::default()
        };
        let report = run_program(
            Program::from([3, 20, 3, 21, 4, 20, 4, 21, 99]),
            &options,
            &mut NoopTrace,
        )
        .expect("runs");
        assert_eq!(report.output.text(), Some("Hi"));
    }

    #[test]
    fn output_formats_as_text_or_lines() {
        assert_eq!(format_output(&Output::raw(vec![1, 2])), "1\n2\n");
        assert_eq!(format_output(&Output::rendered(vec![72, 10])), "H\n");
    }

    struct FailingWriter(io::ErrorKind);

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(self.0))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_output_to_any_writer() {
        let mut buffer = Vec::new();
        write_output(&mut buffer, "1\n2\n").expect("buffer accepts writes");
        assert_eq!(buffer, b"1\n2\n");
    }

    #[test]
    fn closed_pipe_is_not_an_error() {
        let mut writer = FailingWriter(io::ErrorKind::BrokenPipe);
        assert!(write_output(&mut writer, "42\n").is_ok());
    }

    #[test]
    fn other_write_failures_are_reported() {
        let mut writer = FailingWriter(io::ErrorKind::PermissionDenied);
        let error = write_output(&mut writer, "42\n").expect_err("write fails");
        assert!(matches!(&error, CliError::Output(source) if source.kind() == io::ErrorKind::PermissionDenied));
        assert!(error.to_string().starts_with("failed to write output:"));
    }

    #[test]
    fn labels_and_events_are_stable() {
        assert_eq!(status_label(Status::Halted), "halted");
        assert_eq!(status_label(Status::NeedsInput), "needs-input");
        assert_eq!(
            format_event(&TraceEvent::InstructionStart { pc: 4, raw: 1105 }),
            "0004: fetch 1105"
        );
        assert_eq!(
            format_event(&TraceEvent::Jump { from: 4, to: 0 }),
            "      jump 4 -> 0"
        );
    }
}
