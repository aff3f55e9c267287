// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Validates a data graph against a [`ShapesModel`].
//!
//! Every combination of a targeting shape and one of its focus nodes
//! is a validation unit.
//! Units run on tokio's blocking pool, bounded by a semaphore,
//! each with its own timeout.
//! Nested shape evaluation happens synchronously inside the unit.

use std::collections::HashSet;
use std::io;
use std::num::NonZeroUsize;
use std::slice;
use std::sync::Arc;
use std::time::{Duration, Instant};

use oxrdf::{NamedNode, Term};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinSet};

use crate::constants;
use crate::constraints::{
    cardinality, range, string, types, value, ConstraintKind, ViolationDraft,
};
use crate::graph::DataGraph;
use crate::logical::{evaluate_logical, Conformance, DeadlineExceeded, ShapeEvaluator};
use crate::message;
use crate::model::{Constraint, NodeShape, Severity, ShapeHandle, ShapeId, ShapesModel};
use crate::report::{ValidationReport, ValidationResult};
use crate::sparql::{evaluate_sparql, QueryExecutor};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Whether units may run concurrently at all.
    pub parallel: bool,
    /// Upper bound of concurrently running units, if `parallel`.
    pub max_concurrency: usize,
    pub timeout_ms_per_unit: u64,
    /// How deep shapes may reference each other.
    pub max_depth: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            max_concurrency: std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
            timeout_ms_per_unit: constants::DEFAULT_TIMEOUT_MS_PER_UNIT,
            max_depth: constants::DEFAULT_MAX_DEPTH,
        }
    }
}

impl ValidationOptions {
    #[must_use]
    pub fn concurrency(&self) -> usize {
        if self.parallel {
            self.max_concurrency.max(1)
        } else {
            1
        }
    }
}

/// Validates data graphs against one set of shapes.
pub struct Validator {
    shapes: Arc<ShapesModel>,
    options: ValidationOptions,
    query_executor: Option<Arc<dyn QueryExecutor>>,
}

impl Validator {
    #[must_use]
    pub fn new(shapes: Arc<ShapesModel>) -> Self {
        Self {
            shapes,
            options: ValidationOptions::default(),
            query_executor: None,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Without an executor, SPARQL constraints are skipped
    /// (and reported as configuration warnings).
    #[must_use]
    pub fn with_query_executor(mut self, executor: Arc<dyn QueryExecutor>) -> Self {
        self.query_executor = Some(executor);
        self
    }

    #[must_use]
    pub const fn options(&self) -> &ValidationOptions {
        &self.options
    }

    #[must_use]
    pub fn shapes(&self) -> &ShapesModel {
        &self.shapes
    }

    fn configuration_warnings(&self) -> Vec<String> {
        if self.query_executor.is_some() {
            return Vec::new();
        }
        self.shapes
            .iter()
            .filter(|(_, shape)| !shape.deactivated && !shape.sparql.is_empty())
            .map(|(_, shape)| {
                let warning = format!(
                    "Shape {} has {} SPARQL constraint(s), which are skipped, because no query executor is configured",
                    shape.id,
                    shape.sparql.len()
                );
                tracing::warn!("{warning}");
                warning
            })
            .collect()
    }

    /// Validates `data`.
    ///
    /// Failures of single units (timeouts, panics)
    /// end up as results in the report,
    /// and do not stop the other units.
    pub async fn run(&self, data: Arc<dyn DataGraph>) -> ValidationReport {
        let warnings = self.configuration_warnings();
        let units = select_units(&self.shapes, data.as_ref());
        let limit = self.options.concurrency();
        tracing::debug!(
            "Validating {} units, at most {limit} at a time",
            units.len()
        );

        let semaphore = Arc::new(Semaphore::new(limit));
        let timeout = Duration::from_millis(self.options.timeout_ms_per_unit);
        let mut tasks = JoinSet::new();
        for (index, (shape, focus)) in units.iter().enumerate() {
            let unit = Unit {
                shapes: Arc::clone(&self.shapes),
                data: Arc::clone(&data),
                query: self.query_executor.clone(),
                max_depth: self.options.max_depth,
                shape: *shape,
                focus: focus.clone(),
            };
            let unit_semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let permit = unit_semaphore.acquire_owned().await.ok();
                (index, unit.run(timeout, permit).await)
            });
        }

        let mut results = Vec::new();
        let mut finished = vec![false; units.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, unit_results)) => {
                    if let Some(done) = finished.get_mut(index) {
                        *done = true;
                    }
                    results.extend(unit_results);
                }
                Err(err) => tracing::error!("Failed to join a validation unit: {err}"),
            }
        }
        results.extend(unfinished(&self.shapes, units, &finished));
        let report = ValidationReport::new(results, warnings);
        tracing::debug!(
            "Validation finished with {} violations, {} warnings and {} infos",
            report.violation_count(),
            report.warning_count(),
            report.info_count()
        );
        report
    }

    /// Like [`Self::run`], on a runtime of its own.
    ///
    /// # Errors
    ///
    /// If the runtime could not be created.
    ///
    /// # Panics
    ///
    /// If called from within an async context.
    pub fn run_blocking(&self, data: Arc<dyn DataGraph>) -> io::Result<ValidationReport> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_time()
            .build()?;
        Ok(runtime.block_on(self.run(data)))
    }
}

/// Validates `data` against `shapes`, without a query executor.
pub async fn run(
    data: Arc<dyn DataGraph>,
    shapes: Arc<ShapesModel>,
    options: ValidationOptions,
) -> ValidationReport {
    Validator::new(shapes).with_options(options).run(data).await
}

/// All (shape, focus node) pairs to validate.
/// Each shape gets each of its focus nodes only once.
#[must_use]
pub fn select_units(shapes: &ShapesModel, data: &dyn DataGraph) -> Vec<(ShapeHandle, Term)> {
    let mut units = Vec::new();
    for (handle, shape) in shapes.iter() {
        if shape.deactivated || !shape.has_targets() {
            continue;
        }
        let mut focus_nodes = Vec::new();
        for class in &shape.target_classes {
            focus_nodes.extend(data.subjects_of_type(class.as_ref()));
        }
        for node in &shape.target_nodes {
            if data.contains_node(node) {
                focus_nodes.push(node.clone());
            } else {
                tracing::debug!(
                    "Target node {node} of shape {} does not occur in the data",
                    shape.id
                );
            }
        }
        for property in &shape.target_subjects_of {
            focus_nodes.extend(data.subjects_with_property(property.as_ref()));
        }
        for property in &shape.target_objects_of {
            focus_nodes.extend(data.objects_of_property(property.as_ref()));
        }
        let mut seen = HashSet::new();
        let before = units.len();
        units.extend(
            focus_nodes
                .into_iter()
                .filter(|node| seen.insert(node.clone()))
                .map(|node| (handle, node)),
        );
        tracing::debug!(
            "Shape {} targets {} focus node(s)",
            shape.id,
            units.len() - before
        );
    }
    units
}

/// One internal error result for every unit that did not deliver its results.
fn unfinished(
    shapes: &ShapesModel,
    units: Vec<(ShapeHandle, Term)>,
    finished: &[bool],
) -> Vec<ValidationResult> {
    units
        .into_iter()
        .zip(finished)
        .filter(|(_, done)| !**done)
        .map(|((shape, focus), _)| {
            ValidationResult::internal(
                focus,
                shapes.get(shape).id.clone(),
                "Evaluation did not finish".to_owned(),
            )
        })
        .collect()
}

/// One shape and one focus node, with everything needed
/// to validate them on another thread.
struct Unit {
    shapes: Arc<ShapesModel>,
    data: Arc<dyn DataGraph>,
    query: Option<Arc<dyn QueryExecutor>>,
    max_depth: usize,
    shape: ShapeHandle,
    focus: Term,
}

fn failure_message(err: JoinError) -> String {
    if !err.is_panic() {
        return "Evaluation was cancelled".to_owned();
    }
    let payload = err.into_panic();
    payload
        .downcast_ref::<&str>()
        .map(|msg| (*msg).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .map_or_else(
            || "Evaluation panicked".to_owned(),
            |msg| format!("Evaluation panicked: {msg}"),
        )
}

impl Unit {
    /// The `permit` is held until the evaluation actually ends,
    /// which may be after the timeout.
    async fn run(
        self,
        timeout: Duration,
        permit: Option<OwnedSemaphorePermit>,
    ) -> Vec<ValidationResult> {
        let focus = self.focus.clone();
        let source_shape = self.shapes.get(self.shape).id.clone();
        let deadline = Instant::now().checked_add(timeout);
        let evaluation = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            self.evaluate(deadline)
        });
        match tokio::time::timeout(timeout, evaluation).await {
            Ok(Ok(Ok(results))) => results,
            Ok(Ok(Err(DeadlineExceeded))) | Err(_) => {
                tracing::warn!(
                    "Validating {focus} against {source_shape} timed out after {} ms",
                    timeout.as_millis()
                );
                vec![ValidationResult::internal(
                    focus,
                    source_shape,
                    format!(
                        "Evaluation exceeded the timeout of {} ms",
                        timeout.as_millis()
                    ),
                )]
            }
            Ok(Err(join_err)) => {
                let message = failure_message(join_err);
                tracing::warn!("Validating {focus} against {source_shape} failed: {message}");
                vec![ValidationResult::internal(focus, source_shape, message)]
            }
        }
    }

    fn evaluate(&self, deadline: Option<Instant>) -> Result<Vec<ValidationResult>, DeadlineExceeded> {
        let evaluator = Evaluator {
            shapes: &self.shapes,
            data: self.data.as_ref(),
            query: self.query.as_deref(),
            max_depth: self.max_depth,
            deadline,
        };
        evaluator.evaluate(self.shape, &self.focus, 0)
    }
}

/// Turns a draft into a result, by adding where it came from.
fn locate(
    draft: ViolationDraft,
    focus: &Term,
    shape: &NodeShape,
    path: Option<&NamedNode>,
    severity: Severity,
    template: Option<&str>,
) -> ValidationResult {
    let path = draft.path.or_else(|| path.cloned());
    let engine_error = draft.kind.is_engine_error();
    let message = match template {
        Some(template) if !engine_error => {
            message::render(template, focus, draft.value.as_ref(), path.as_ref())
        }
        _ => draft.message,
    };
    ValidationResult {
        focus_node: focus.clone(),
        path,
        severity: if engine_error {
            Severity::Violation
        } else {
            severity
        },
        constraint_kind: draft.kind,
        message,
        offending_value: draft.value,
        source_shape: shape.id.clone(),
    }
}

/// Evaluates shapes against focus nodes, recursively.
struct Evaluator<'a> {
    shapes: &'a ShapesModel,
    data: &'a dyn DataGraph,
    query: Option<&'a dyn QueryExecutor>,
    max_depth: usize,
    deadline: Option<Instant>,
}

impl Evaluator<'_> {
    fn evaluate(
        &self,
        handle: ShapeHandle,
        focus: &Term,
        depth: usize,
    ) -> Result<Vec<ValidationResult>, DeadlineExceeded> {
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(DeadlineExceeded);
        }
        let shape = self.shapes.get(handle);
        if depth > self.max_depth {
            return Ok(vec![ValidationResult {
                focus_node: focus.clone(),
                path: None,
                severity: Severity::Violation,
                constraint_kind: ConstraintKind::RecursionLimit,
                message: format!(
                    "Validating {focus} against {} exceeded the maximum shape nesting depth of {}",
                    shape.id, self.max_depth
                ),
                offending_value: None,
                source_shape: shape.id.clone(),
            }]);
        }
        if shape.deactivated {
            return Ok(Vec::new());
        }

        let mut results = Vec::new();
        let shape_message = shape.message.as_deref();
        for constraint in &shape.constraints {
            for draft in self.check(constraint, slice::from_ref(focus), depth)? {
                results.push(locate(draft, focus, shape, None, shape.severity, shape_message));
            }
        }

        for property in &shape.properties {
            let values = self.data.objects(focus, property.path.as_ref());
            let severity = property.severity.unwrap_or(shape.severity);
            let template = property.message.as_deref().or(shape_message);
            for constraint in &property.constraints {
                for draft in self.check(constraint, &values, depth)? {
                    results.push(locate(
                        draft,
                        focus,
                        shape,
                        Some(&property.path),
                        severity,
                        template,
                    ));
                }
            }
        }

        for draft in evaluate_logical(focus, shape, self, depth)? {
            results.push(locate(draft, focus, shape, None, shape.severity, shape_message));
        }

        if let Some(executor) = self.query {
            for sparql in &shape.sparql {
                let severity = sparql.severity.unwrap_or(shape.severity);
                for draft in evaluate_sparql(focus, sparql, executor) {
                    results.push(locate(draft, focus, shape, None, severity, None));
                }
            }
        }
        Ok(results)
    }

    fn check(
        &self,
        constraint: &Constraint,
        values: &[Term],
        depth: usize,
    ) -> Result<Vec<ViolationDraft>, DeadlineExceeded> {
        Ok(match constraint {
            Constraint::Cardinality { min, max } => cardinality::validate(values.len(), *min, *max),
            Constraint::Datatype(datatype) => types::validate_datatype(values, datatype.as_ref()),
            Constraint::Class(class) => types::validate_class(values, class.as_ref(), self.data),
            Constraint::NodeKind(kind) => types::validate_node_kind(values, *kind),
            Constraint::Pattern(pattern) => string::validate_pattern(values, pattern),
            Constraint::Length { min, max } => string::validate_length(values, *min, *max),
            Constraint::Range(bound) => range::validate(values, bound),
            Constraint::In(allowed) => value::validate_in(values, allowed),
            Constraint::HasValue(required) => value::validate_has_value(values, required),
            Constraint::Node(shape) => self.check_node(*shape, values, depth)?,
            Constraint::Qualified { shape, min, max } => {
                self.check_qualified(*shape, values, *min, *max, depth)?
            }
        })
    }

    fn check_node(
        &self,
        shape: ShapeHandle,
        values: &[Term],
        depth: usize,
    ) -> Result<Vec<ViolationDraft>, DeadlineExceeded> {
        let mut drafts = Vec::new();
        let mut escalated = None;
        for value in values {
            let conformance = self.conformance(shape, value, depth + 1)?;
            if escalated.is_none() {
                escalated = conformance.escalated.into_iter().next();
            }
            if !conformance.conforms {
                drafts.push(
                    ViolationDraft::new(
                        ConstraintKind::Node,
                        format!("Value {value} does not conform to {}", self.shape_id(shape)),
                    )
                    .with_value(value.clone()),
                );
            }
        }
        drafts.extend(escalated);
        Ok(drafts)
    }

    fn check_qualified(
        &self,
        shape: ShapeHandle,
        values: &[Term],
        min: Option<usize>,
        max: Option<usize>,
        depth: usize,
    ) -> Result<Vec<ViolationDraft>, DeadlineExceeded> {
        let mut conforming = 0_usize;
        let mut escalated = None;
        for value in values {
            let conformance = self.conformance(shape, value, depth + 1)?;
            if escalated.is_none() {
                escalated = conformance.escalated.into_iter().next();
            }
            if conformance.conforms {
                conforming += 1;
            }
        }
        let shape_id = self.shape_id(shape);
        let mut drafts = Vec::new();
        if let Some(min) = min {
            if conforming < min {
                drafts.push(ViolationDraft::new(
                    ConstraintKind::QualifiedMinCount,
                    format!("Expected at least {min} value(s) conforming to {shape_id}, found {conforming}"),
                ));
            }
        }
        if let Some(max) = max {
            if conforming > max {
                drafts.push(ViolationDraft::new(
                    ConstraintKind::QualifiedMaxCount,
                    format!("Expected at most {max} value(s) conforming to {shape_id}, found {conforming}"),
                ));
            }
        }
        drafts.extend(escalated);
        Ok(drafts)
    }
}

impl ShapeEvaluator for Evaluator<'_> {
    fn conformance(
        &self,
        shape: ShapeHandle,
        focus: &Term,
        depth: usize,
    ) -> Result<Conformance, DeadlineExceeded> {
        let results = self.evaluate(shape, focus, depth)?;
        let conforms = !results
            .iter()
            .any(|result| result.severity == Severity::Violation);
        let escalated = results
            .into_iter()
            .filter(|result| result.constraint_kind == ConstraintKind::RecursionLimit)
            .take(1)
            .map(|result| ViolationDraft::new(ConstraintKind::RecursionLimit, result.message))
            .collect();
        Ok(Conformance {
            conforms,
            escalated,
        })
    }

    fn shape_id(&self, shape: ShapeHandle) -> &ShapeId {
        &self.shapes.get(shape).id
    }
}
