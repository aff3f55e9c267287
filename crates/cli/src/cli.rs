// SPDX-FileCopyrightText: 2021 - 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::PathBuf;

use clap::{command, value_parser, Arg, ArgAction, Command, ValueHint};
use const_format::formatcp;
use graphshape_engine::constants::{DEFAULT_MAX_DEPTH, DEFAULT_TIMEOUT_MS_PER_UNIT};
use graphshape_engine::ValidationOptions;
use graphshape_io::Format;

use crate::config::Config;

pub const A_S_VERSION: char = 'V';
pub const A_L_VERSION: &str = "version";
pub const A_S_QUIET: char = 'q';
pub const A_L_QUIET: &str = "quiet";
pub const A_S_VERBOSE: char = 'v';
pub const A_L_VERBOSE: &str = "verbose";
pub const A_S_SHAPES: char = 's';
pub const A_L_SHAPES: &str = "shapes";
pub const A_S_OUTPUT: char = 'o';
pub const A_L_OUTPUT: &str = "output";
pub const A_S_FORMAT: char = 'f';
pub const A_L_FORMAT: &str = "format";
pub const A_L_SEQUENTIAL: &str = "sequential";
pub const A_S_JOBS: char = 'j';
pub const A_L_JOBS: &str = "jobs";
pub const A_L_TIMEOUT: &str = "timeout-ms";
pub const A_L_MAX_DEPTH: &str = "max-depth";
pub const A_L_DATA_FILE: &str = "data-file";

fn arg_version() -> Arg {
    Arg::new(A_L_VERSION)
        .help(formatcp!(
            "Print version information and exit. \
May be combined with -{A_S_QUIET},--{A_L_QUIET}, \
to really only output the version string."
        ))
        .short(A_S_VERSION)
        .long(A_L_VERSION)
        .action(ArgAction::SetTrue)
}

fn arg_quiet() -> Arg {
    Arg::new(A_L_QUIET)
        .help("Minimize or suppress output to stderr")
        .long_help("Minimize or suppress output to stderr; stdout only ever receives the report, with or without this option set.")
        .action(ArgAction::SetTrue)
        .short(A_S_QUIET)
        .long(A_L_QUIET)
        .conflicts_with(A_L_VERBOSE)
}

fn arg_verbose() -> Arg {
    Arg::new(A_L_VERBOSE)
        .help("more verbose output (useful for debugging)")
        .short(A_S_VERBOSE)
        .long(A_L_VERBOSE)
        .action(ArgAction::SetTrue)
}

fn arg_shapes() -> Arg {
    Arg::new(A_L_SHAPES)
        .help("An RDF file containing shapes; may be given multiple times")
        .short(A_S_SHAPES)
        .long(A_L_SHAPES)
        .action(ArgAction::Append)
        .value_parser(value_parser!(std::path::PathBuf))
        .value_hint(ValueHint::FilePath)
        .value_name("SHAPES_FILE")
        .required_unless_present(A_L_VERSION)
}

fn arg_output() -> Arg {
    Arg::new(A_L_OUTPUT)
        .help("Where to write the validation report to; stdout if not given")
        .short(A_S_OUTPUT)
        .long(A_L_OUTPUT)
        .action(ArgAction::Set)
        .value_parser(value_parser!(std::path::PathBuf))
        .value_hint(ValueHint::FilePath)
        .value_name("REPORT_FILE")
}

fn arg_format() -> Arg {
    Arg::new(A_L_FORMAT)
        .help(formatcp!(
            "The RDF format of the report; \
guessed from the extension of -{A_S_OUTPUT},--{A_L_OUTPUT} if not given, \
falling back to turtle"
        ))
        .short(A_S_FORMAT)
        .long(A_L_FORMAT)
        .action(ArgAction::Set)
        .value_parser(value_parser!(Format))
        .value_hint(ValueHint::Other)
        .value_name("FORMAT")
}

fn arg_sequential() -> Arg {
    Arg::new(A_L_SEQUENTIAL)
        .help("Validate one unit after the other, instead of concurrently")
        .long(A_L_SEQUENTIAL)
        .action(ArgAction::SetTrue)
        .conflicts_with(A_L_JOBS)
}

fn arg_jobs() -> Arg {
    Arg::new(A_L_JOBS)
        .help("The maximum number of units validated concurrently; defaults to the number of CPUs")
        .short(A_S_JOBS)
        .long(A_L_JOBS)
        .action(ArgAction::Set)
        .value_parser(value_parser!(u32).range(1..))
        .value_hint(ValueHint::Other)
        .value_name("N")
}

fn arg_timeout() -> Arg {
    Arg::new(A_L_TIMEOUT)
        .help(formatcp!(
            "The time in milliseconds a single unit may take, \
before it is reported as failed [default: {DEFAULT_TIMEOUT_MS_PER_UNIT}]"
        ))
        .long(A_L_TIMEOUT)
        .action(ArgAction::Set)
        .value_parser(value_parser!(u64).range(1..))
        .value_hint(ValueHint::Other)
        .value_name("MS")
}

fn arg_max_depth() -> Arg {
    Arg::new(A_L_MAX_DEPTH)
        .help(formatcp!(
            "How deep shapes may reference each other \
[default: {DEFAULT_MAX_DEPTH}]"
        ))
        .long(A_L_MAX_DEPTH)
        .action(ArgAction::Set)
        .value_parser(value_parser!(u32))
        .value_hint(ValueHint::Other)
        .value_name("N")
}

fn arg_data_file() -> Arg {
    Arg::new(A_L_DATA_FILE)
        .help("The RDF data file(s) to validate")
        .action(ArgAction::Set)
        .value_parser(value_parser!(std::path::PathBuf))
        .value_hint(ValueHint::FilePath)
        .value_name("DATA_FILE")
        .required_unless_present(A_L_VERSION)
        .num_args(1..)
}

#[must_use]
pub fn args_matcher() -> Command {
    command!()
        .about(clap::crate_description!())
        .bin_name("graphshape")
        .help_expected(true)
        .disable_version_flag(true)
        .arg(arg_version())
        .arg(arg_quiet())
        .arg(arg_verbose())
        .arg(arg_shapes())
        .arg(arg_output())
        .arg(arg_format())
        .arg(arg_sequential())
        .arg(arg_jobs())
        .arg(arg_timeout())
        .arg(arg_max_depth())
        .arg(arg_data_file())
}

#[allow(clippy::print_stdout)]
fn print_version_and_exit(quiet: bool) {
    if !quiet {
        print!("graphshape ");
    }
    println!("{}", crate::VERSION);
    std::process::exit(0);
}

#[derive(Clone, Debug)]
pub struct Args {
    pub quiet: bool,
    pub verbose: bool,
    pub config: Config,
}

fn options(args: &clap::ArgMatches) -> ValidationOptions {
    let mut options = ValidationOptions {
        parallel: !args.get_flag(A_L_SEQUENTIAL),
        ..ValidationOptions::default()
    };
    if let Some(jobs) = args.get_one::<u32>(A_L_JOBS) {
        options.max_concurrency = usize::try_from(*jobs).unwrap_or(usize::MAX);
    }
    if let Some(timeout) = args.get_one::<u64>(A_L_TIMEOUT) {
        options.timeout_ms_per_unit = *timeout;
    }
    if let Some(max_depth) = args.get_one::<u32>(A_L_MAX_DEPTH) {
        options.max_depth = usize::try_from(*max_depth).unwrap_or(usize::MAX);
    }
    options
}

/// Parses the command line arguments,
/// including verification.
///
/// # Panics
///
/// - No shapes file was supplied
/// - No data file was supplied
#[must_use]
pub fn parse() -> Args {
    let args = args_matcher().get_matches();

    let quiet = args.get_flag(A_L_QUIET);
    let version = args.get_flag(A_L_VERSION);
    if version {
        print_version_and_exit(quiet);
    }

    let verbose = args.get_flag(A_L_VERBOSE);
    let shapes: Vec<PathBuf> = args
        .get_many(A_L_SHAPES)
        .expect("At least one shapes file is required")
        .cloned()
        .collect();
    let data: Vec<PathBuf> = args
        .get_many(A_L_DATA_FILE)
        .expect("At least one data file is required")
        .cloned()
        .collect();
    let output = args.get_one::<PathBuf>(A_L_OUTPUT).cloned();
    let format = args.get_one::<Format>(A_L_FORMAT).copied();

    let config = Config {
        shapes,
        data,
        output,
        format,
        options: options(&args),
    };

    Args {
        quiet,
        verbose,
        config,
    }
}
