// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

#![allow(unused_crate_dependencies)]

mod cli;

use std::io;
use std::process::ExitCode;

use cli_utils::logging;
use cli_utils::BoxResult;
pub use graphshape_cli as graphshape;
pub use graphshape::config;
use tracing::metadata::LevelFilter;

pub use graphshape::VERSION;

const EXIT_NOT_CONFORMING: u8 = 1;
const EXIT_FAILURE: u8 = 2;

#[tokio::main]
async fn main() -> BoxResult<ExitCode> {
    let log_reload_handle = logging::setup(clap::crate_name!())?;

    let cli_args = cli::parse();

    let log_level = if cli_args.verbose {
        LevelFilter::DEBUG
    } else if cli_args.quiet {
        LevelFilter::WARN
    } else {
        LevelFilter::INFO
    };
    logging::set_log_level_tracing(&log_reload_handle, log_level)?;

    let report = match graphshape::validate(&cli_args.config).await {
        Ok(report) => report,
        Err(err) => {
            tracing::error!("{err}");
            return Ok(ExitCode::from(EXIT_FAILURE));
        }
    };
    if let Err(err) = graphshape::write_report(&report, &cli_args.config, io::stdout().lock()) {
        tracing::error!("Failed to write the report: {err}");
        return Ok(ExitCode::from(EXIT_FAILURE));
    }
    graphshape::log_summary(&report);

    Ok(if report.conforms() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_NOT_CONFORMING)
    })
}
