// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::PathBuf;

use graphshape_engine::ValidationOptions;
use graphshape_io::Format;

#[derive(Clone, Debug, Default)]
pub struct Config {
    /**
     * Paths to RDF files containing the shapes;
     * they get merged into a single shapes graph.
     */
    pub shapes: Vec<PathBuf>,
    /**
     * Paths to RDF files containing the data to validate;
     * they get merged into a single data graph.
     */
    pub data: Vec<PathBuf>,
    /**
     * Where to write the validation report to.
     * If `None`, it goes to stdout.
     */
    pub output: Option<PathBuf>,
    /**
     * The serialization format of the report.
     * If `None`, it is guessed from the output file extension,
     * falling back to Turtle.
     */
    pub format: Option<Format>,
    pub options: ValidationOptions,
}

impl Config {
    /// The format the report gets written in.
    #[must_use]
    pub fn report_format(&self) -> Format {
        self.format
            .or_else(|| self.output.as_deref().and_then(Format::from_path))
            .unwrap_or_default()
    }
}
