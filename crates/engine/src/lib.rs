// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Validates RDF data graphs against SHACL-style shapes.
//!
//! 1. [`parse_shapes`] reads a shapes graph into a [`ShapesModel`].
//! 2. A [`Validator`] validates data graphs against it,
//!    producing a [`ValidationReport`].
//! 3. [`report::write`] turns the report into RDF again.

pub mod constants;
pub mod constraints;
pub mod engine;
pub mod error;
pub mod graph;
pub mod logical;
mod message;
pub mod model;
pub mod reader;
pub mod report;
pub mod sparql;

use git_version::git_version;

pub use engine::{run, select_units, ValidationOptions, Validator};
pub use error::ShapesError;
pub use graph::DataGraph;
pub use model::{Severity, ShapeId, ShapesModel};
pub use reader::parse_shapes;
pub use report::{ValidationReport, ValidationResult};
pub use sparql::{QueryError, QueryExecutor, Row};

#[cfg(feature = "oxigraph")]
pub use sparql::OxigraphExecutor;

// This tests rust code in the README with doc-tests.
// Though, It will not appear in the generated documentation.
#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;

pub const VERSION: &str = git_version!(cargo_prefix = "", fallback = "unknown");
