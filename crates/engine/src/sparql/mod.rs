// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Constraints expressed as SPARQL `SELECT` queries.
//!
//! Every solution of the query is one violation.
//! The queries are evaluated by an external [`QueryExecutor`];
//! with the `oxigraph` feature, [`OxigraphExecutor`] provides one.

#[cfg(feature = "oxigraph")]
mod store;

use std::collections::HashMap;

use once_cell::sync::Lazy;
use oxrdf::Term;
use regex::{NoExpand, Regex};

use crate::constraints::{ConstraintKind, ViolationDraft};
use crate::message;
use crate::model::SparqlConstraint;

#[cfg(feature = "oxigraph")]
pub use store::OxigraphExecutor;

/// One solution of a `SELECT` query, by variable name (without `?`).
pub type Row = HashMap<String, Term>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid SPARQL query: {0}")]
    Syntax(String),

    #[error("Failed to evaluate SPARQL query: {0}")]
    Execution(String),

    #[error("SPARQL query evaluation timed out")]
    Timeout,
}

/// Evaluates SPARQL `SELECT` queries against the data graph.
pub trait QueryExecutor: Send + Sync {
    /// # Errors
    ///
    /// If the query is invalid, or could not be evaluated.
    fn select(&self, query: &str) -> Result<Vec<Row>, QueryError>;
}

static THIS_VAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$this\b").unwrap());

/// Replaces every `$this` (but not e.g. `$thisNode`)
/// by the focus node in N-Triples syntax.
#[must_use]
pub fn substitute_this(select: &str, focus: &Term) -> String {
    THIS_VAR
        .replace_all(select, NoExpand(&focus.to_string()))
        .into_owned()
}

/// The query that is actually sent to the executor for `focus`.
#[must_use]
pub fn prepare(constraint: &SparqlConstraint, focus: &Term) -> String {
    constraint
        .prologue
        .apply(&substitute_this(&constraint.select, focus))
}

fn row_to_draft(row: &Row, focus: &Term, constraint: &SparqlConstraint) -> ViolationDraft {
    let value = row.get("value").cloned();
    let path = match row.get("path") {
        Some(Term::NamedNode(path)) => Some(path.clone()),
        _ => None,
    };
    let message = match row.get("message") {
        Some(Term::Literal(literal)) => literal.value().to_owned(),
        Some(other) => other.to_string(),
        None => constraint.message.as_deref().map_or_else(
            || format!("Focus node {focus} violates the SPARQL constraint {}", constraint.id),
            |template| message::render(template, focus, value.as_ref(), path.as_ref()),
        ),
    };
    ViolationDraft {
        kind: ConstraintKind::Sparql,
        value,
        path,
        message,
    }
}

/// Runs one SPARQL constraint for one focus node.
///
/// Any failure of the executor turns into a single draft
/// of kind [`ConstraintKind::SparqlError`].
#[must_use]
pub fn evaluate_sparql(
    focus: &Term,
    constraint: &SparqlConstraint,
    executor: &dyn QueryExecutor,
) -> Vec<ViolationDraft> {
    let query = prepare(constraint, focus);
    tracing::trace!("Evaluating SPARQL constraint {} as:\n{query}", constraint.id);
    match executor.select(&query) {
        Ok(rows) => rows
            .iter()
            .map(|row| row_to_draft(row, focus, constraint))
            .collect(),
        Err(err) => {
            tracing::warn!(
                "SPARQL constraint {} failed for focus node {focus}: {err}",
                constraint.id
            );
            vec![ViolationDraft::new(
                ConstraintKind::SparqlError,
                format!("SPARQL constraint {} could not be evaluated: {err}", constraint.id),
            )]
        }
    }
}
