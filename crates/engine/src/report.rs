// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Validation results, and their RDF form (a `sh:ValidationReport`).

use std::fmt;

use graphshape_vocab::{basics::rdf_bool, sh};
use oxrdf::vocab::rdf;
use oxrdf::{BlankNode, Graph, Literal, NamedNode, Term, Triple};

use crate::constraints::ConstraintKind;
use crate::model::{Severity, ShapeId};

/// One failed constraint, for one focus node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ValidationResult {
    pub focus_node: Term,
    pub path: Option<NamedNode>,
    pub severity: Severity,
    pub constraint_kind: ConstraintKind,
    pub message: String,
    pub offending_value: Option<Term>,
    /// The node shape that was validated;
    /// for results of property shapes, the node shape owning them.
    pub source_shape: ShapeId,
}

impl ValidationResult {
    /// A failure of the validation machinery (timeout, panic)
    /// for one validation unit.
    #[must_use]
    pub fn internal(focus_node: Term, source_shape: ShapeId, message: String) -> Self {
        Self {
            focus_node,
            path: None,
            severity: Severity::Violation,
            constraint_kind: ConstraintKind::Internal,
            message,
            offending_value: None,
            source_shape,
        }
    }

    fn sort_key(&self) -> (String, String, ConstraintKind) {
        (
            self.focus_node.to_string(),
            self.path.as_ref().map(ToString::to_string).unwrap_or_default(),
            self.constraint_kind,
        )
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.focus_node)?;
        if let Some(path) = &self.path {
            write!(f, " {path}")?;
        }
        write!(
            f,
            ": {} ({} in {})",
            self.message, self.constraint_kind, self.source_shape
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    conforms: bool,
    results: Vec<ValidationResult>,
    configuration_warnings: Vec<String>,
}

impl ValidationReport {
    #[must_use]
    pub fn new(results: Vec<ValidationResult>, configuration_warnings: Vec<String>) -> Self {
        let conforms = !results
            .iter()
            .any(|result| result.severity == Severity::Violation);
        Self {
            conforms,
            results,
            configuration_warnings,
        }
    }

    /// `true` iff there is no result of severity [`Severity::Violation`].
    #[must_use]
    pub const fn conforms(&self) -> bool {
        self.conforms
    }

    /// In no particular order, unless [`Self::sort`]ed.
    #[must_use]
    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }

    #[must_use]
    pub fn into_results(self) -> Vec<ValidationResult> {
        self.results
    }

    /// Problems with the setup of the validation,
    /// e.g. SPARQL constraints that could not be evaluated
    /// for lack of a query executor.
    /// These never influence conformance.
    #[must_use]
    pub fn configuration_warnings(&self) -> &[String] {
        &self.configuration_warnings
    }

    fn count(&self, severity: Severity) -> usize {
        self.results
            .iter()
            .filter(|result| result.severity == severity)
            .count()
    }

    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.count(Severity::Violation)
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    #[must_use]
    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    /// Orders the results by focus node, path and constraint kind.
    pub fn sort(&mut self) {
        self.results.sort_by_cached_key(ValidationResult::sort_key);
    }

    #[must_use]
    pub fn sorted(mut self) -> Self {
        self.sort();
        self
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

/// Anything RDF triples can be appended to.
pub trait TripleSink {
    fn append(&mut self, triple: Triple);
}

impl TripleSink for Graph {
    fn append(&mut self, triple: Triple) {
        self.insert(&triple);
    }
}

impl TripleSink for Vec<Triple> {
    fn append(&mut self, triple: Triple) {
        self.push(triple);
    }
}

/// Writes the report as a `sh:ValidationReport` into `sink`.
pub fn write_to<S: TripleSink + ?Sized>(report: &ValidationReport, sink: &mut S) {
    let report_node = BlankNode::default();
    sink.append(Triple::new(report_node.clone(), rdf::TYPE, sh::VALIDATION_REPORT));
    sink.append(Triple::new(
        report_node.clone(),
        sh::CONFORMS,
        rdf_bool(report.conforms()),
    ));

    for result in report.results() {
        let result_node = BlankNode::default();
        sink.append(Triple::new(report_node.clone(), sh::RESULT, result_node.clone()));
        sink.append(Triple::new(result_node.clone(), rdf::TYPE, sh::VALIDATION_RESULT));
        sink.append(Triple::new(
            result_node.clone(),
            sh::FOCUS_NODE,
            result.focus_node.clone(),
        ));
        if let Some(path) = &result.path {
            sink.append(Triple::new(result_node.clone(), sh::RESULT_PATH, path.clone()));
        }
        if let Some(value) = &result.offending_value {
            sink.append(Triple::new(result_node.clone(), sh::VALUE, value.clone()));
        }
        sink.append(Triple::new(
            result_node.clone(),
            sh::RESULT_SEVERITY,
            result.severity.iri(),
        ));
        sink.append(Triple::new(
            result_node.clone(),
            sh::RESULT_MESSAGE,
            Literal::new_simple_literal(&result.message),
        ));
        sink.append(Triple::new(
            result_node.clone(),
            sh::SOURCE_SHAPE,
            result.source_shape.to_term(),
        ));
        sink.append(Triple::new(
            result_node,
            sh::SOURCE_CONSTRAINT_COMPONENT,
            result.constraint_kind.component(),
        ));
    }
}

/// The report as a graph of its own.
#[must_use]
pub fn write(report: &ValidationReport) -> Graph {
    let mut graph = Graph::new();
    write_to(report, &mut graph);
    graph
}
