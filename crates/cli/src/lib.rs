// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use clap as _;
use cli_utils as _;
use const_format as _;

pub mod config;

use std::io::{self, Write};
use std::sync::Arc;

use config::Config;
use git_version::git_version;
use graphshape_engine::{
    parse_shapes, report, OxigraphExecutor, QueryError, ShapesError, ValidationReport, Validator,
};

// This tests rust code in the README with doc-tests.
// Though, It will not appear in the generated documentation.
#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;

pub const VERSION: &str = git_version!(cargo_prefix = "", fallback = "unknown");

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("No shapes file given")]
    NoShapes,

    #[error("No data file given")]
    NoData,

    #[error(transparent)]
    Rdf(#[from] graphshape_io::Error),

    #[error("Invalid shapes: {0}")]
    Shapes(#[from] ShapesError),

    #[error("Failed to set up the SPARQL store: {0}")]
    Store(#[from] QueryError),

    /// Represents all cases of `std::io::Error`.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Loads the shapes and data files of `config`,
/// and validates the data against the shapes.
///
/// # Errors
///
/// - no shapes or no data files are given
/// - one of the files can not be read or parsed
/// - the shapes are invalid
pub async fn validate(config: &Config) -> Result<ValidationReport, Error> {
    if config.shapes.is_empty() {
        return Err(Error::NoShapes);
    }
    if config.data.is_empty() {
        return Err(Error::NoData);
    }
    let shapes_graph = graphshape_io::load_all_async(&config.shapes).await?;
    tracing::debug!(
        "Loaded {} shapes triples from {} file(s)",
        shapes_graph.len(),
        config.shapes.len()
    );
    let data_graph = graphshape_io::load_all_async(&config.data).await?;
    tracing::debug!(
        "Loaded {} data triples from {} file(s)",
        data_graph.len(),
        config.data.len()
    );

    let shapes = parse_shapes(&shapes_graph)?;
    tracing::info!("Validating against {} shape(s) ...", shapes.len());
    let executor = OxigraphExecutor::from_graph(&data_graph)?;
    let report = Validator::new(Arc::new(shapes))
        .with_options(config.options.clone())
        .with_query_executor(Arc::new(executor))
        .run(Arc::new(data_graph))
        .await;
    Ok(report.sorted())
}

/// Writes `report` as RDF, to the output file of `config`,
/// or to `out` if there is none.
///
/// # Errors
///
/// - the report format does not support writing
/// - writing fails
pub fn write_report<W: Write>(
    report: &ValidationReport,
    config: &Config,
    out: W,
) -> Result<(), Error> {
    let graph = report::write(report);
    let format = config.report_format();
    if let Some(output) = &config.output {
        tracing::debug!("Writing the report to '{}' ...", output.display());
        graphshape_io::write_file(&graph, output, Some(format))?;
    } else {
        let mut written = graphshape_io::write(&graph, format, out)?;
        written.flush()?;
    }
    Ok(())
}

/// Logs a one-line summary of `report`.
pub fn log_summary(report: &ValidationReport) {
    let summary = format!(
        "{} violation(s), {} warning(s), {} info(s)",
        report.violation_count(),
        report.warning_count(),
        report.info_count()
    );
    if report.conforms() {
        tracing::info!("The data conforms: {summary}");
    } else {
        tracing::warn!("The data does NOT conform: {summary}");
    }
}
