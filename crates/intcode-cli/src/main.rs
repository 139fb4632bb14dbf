//! CLI entry point for the `intcode` binary.

use std::env;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

use intcode_cli::runner::{
    disassembly_listing, format_output, load_program, parse_input_values, run_program,
    status_label, unescape_text, write_output, CliError, RunOptions, StderrTrace,
};
use intcode_core::{NoopTrace, Profile, TraceSink};
#[cfg(test)]
use tempfile as _;

const USAGE_TEXT: &str = "\
Usage: intcode <command> [options]

Commands:
  run    <program> [options]   Run a program until it halts or needs input
  disasm <program> [--basic]   Print a disassembly listing

Options:
  -i, --input <v,v,...>  Integers to queue before running
  -t, --text <text>      Text to queue as character codes (implies --ascii)
  -a, --ascii            Render printable output as text
      --basic            Use the restricted instruction set
      --trace            Print every executed event to stderr
      --max-steps <n>    Fail when more than <n> instructions execute
  -h, --help             Show this help message

Examples:
  intcode run day09.txt -i 1
  intcode run day21.txt --text 'NOT A J\\nWALK\\n'
  intcode disasm day05.txt --basic
";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run(RunArgs),
    Disasm(DisasmArgs),
}

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    program: PathBuf,
    options: RunOptions,
}

#[derive(Debug, PartialEq, Eq)]
struct DisasmArgs {
    program: PathBuf,
    basic: bool,
}

#[derive(Debug)]
enum ParseResult {
    Command(Command),
    Help,
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let first = args.next().ok_or_else(|| "missing command".to_string())?;

    if first == "--help" || first == "-h" {
        return Ok(ParseResult::Help);
    }

    let command_str = first.to_string_lossy().to_string();

    match command_str.as_str() {
        "run" => parse_run_args(args)
            .map(Command::Run)
            .map(ParseResult::Command),
        "disasm" => parse_disasm_args(args)
            .map(Command::Disasm)
            .map(ParseResult::Command),
        other => Err(format!("unknown command: {other}")),
    }
}

fn option_value(
    args: &mut impl Iterator<Item = OsString>,
    flag: &OsString,
) -> Result<String, String> {
    args.next()
        .map(|value| value.to_string_lossy().to_string())
        .ok_or_else(|| format!("missing value for {}", flag.to_string_lossy()))
}

#[allow(clippy::while_let_on_iterator)]
fn parse_run_args(mut args: impl Iterator<Item = OsString>) -> Result<RunArgs, String> {
    let mut program: Option<PathBuf> = None;
    let mut options = RunOptions::default();

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg == "--input" || arg == "-i" {
            let value = option_value(&mut args, &arg)?;
            options.input.extend(parse_input_values(&value)?);
            continue;
        }

        if arg == "--text" || arg == "-t" {
            let value = option_value(&mut args, &arg)?;
            let text = options.text.get_or_insert_with(String::new);
            text.push_str(&unescape_text(&value));
            continue;
        }

        if arg == "--max-steps" {
            let value = option_value(&mut args, &arg)?;
            let limit = value
                .parse::<u64>()
                .map_err(|_| format!("invalid step limit: {value}"))?;
            options.max_steps = Some(limit);
            continue;
        }

        if arg == "--ascii" || arg == "-a" {
            options.ascii = true;
            continue;
        }

        if arg == "--basic" {
            options.basic = true;
            continue;
        }

        if arg == "--trace" {
            options.trace = true;
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if program.is_some() {
            return Err("multiple program paths provided".to_string());
        }
        program = Some(PathBuf::from(arg));
    }

    let program = program.ok_or_else(|| "missing program path".to_string())?;
    Ok(RunArgs { program, options })
}

fn parse_disasm_args(args: impl Iterator<Item = OsString>) -> Result<DisasmArgs, String> {
    let mut program: Option<PathBuf> = None;
    let mut basic = false;

    for arg in args {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg == "--basic" {
            basic = true;
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if program.is_some() {
            return Err("multiple program paths provided".to_string());
        }
        program = Some(PathBuf::from(arg));
    }

    let program = program.ok_or_else(|| "missing program path".to_string())?;
    Ok(DisasmArgs { program, basic })
}

fn run_run(args: &RunArgs) -> Result<(), CliError> {
    let program = load_program(&args.program)?;

    let mut stderr_trace = StderrTrace;
    let mut noop = NoopTrace;
    let sink: &mut dyn TraceSink = if args.options.trace {
        &mut stderr_trace
    } else {
        &mut noop
    };

    let report = run_program(program, &args.options, sink)?;

    write_output(&mut io::stdout().lock(), &format_output(&report.output))?;

    match report.steps {
        Some(steps) => eprintln!("status: {} ({steps} steps)", status_label(report.status)),
        None => eprintln!("status: {}", status_label(report.status)),
    }
    Ok(())
}

fn run_disasm(args: &DisasmArgs) -> Result<(), CliError> {
    let program = load_program(&args.program)?;
    let profile = if args.basic {
        Profile::Basic
    } else {
        Profile::Complete
    };
    write_output(
        &mut io::stdout().lock(),
        &disassembly_listing(&program, profile),
    )
}

fn report(result: Result<(), CliError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error}");
            1
        }
    }
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Command(Command::Run(args))) => report(run_run(&args)),
        Ok(ParseResult::Command(Command::Disasm(args))) => report(run_disasm(&args)),
        Err(error) => {
            if error.starts_with("Usage:") {
                println!("{error}");
            } else {
                eprintln!("error: {error}");
                eprintln!("{USAGE_TEXT}");
            }
            1
        }
    };

    std::process::exit(exit_code);
}
