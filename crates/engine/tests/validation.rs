// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use graphshape_engine::constraints::ConstraintKind;
use graphshape_engine::{
    parse_shapes, run, DataGraph, QueryError, QueryExecutor, Row, Severity, ShapesModel, ValidationOptions,
    ValidationReport, ValidationResult, Validator,
};
use graphshape_io::{parse, Format};
use oxrdf::{Graph, Literal, NamedNode, Term};

const PREFIXES: &str = "
    @prefix sh: <http://www.w3.org/ns/shacl#> .
    @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
    @prefix ex: <http://example.org/> .
";

fn graph(turtle: &str) -> Graph {
    parse(format!("{PREFIXES}{turtle}").as_bytes(), Format::Turtle).unwrap()
}

fn shapes(turtle: &str) -> Arc<ShapesModel> {
    Arc::new(parse_shapes(&graph(turtle)).unwrap())
}

fn ex(local: &str) -> Term {
    NamedNode::new_unchecked(format!("http://example.org/{local}")).into()
}

fn assert_conformance_invariant(report: &ValidationReport) {
    assert_eq!(
        report.conforms(),
        !report
            .results()
            .iter()
            .any(|result| result.severity == Severity::Violation)
    );
}

async fn validate_with(
    shapes_ttl: &str,
    data_ttl: &str,
    options: ValidationOptions,
    executor: Option<Arc<dyn QueryExecutor>>,
) -> ValidationReport {
    let mut validator = Validator::new(shapes(shapes_ttl)).with_options(options);
    if let Some(executor) = executor {
        validator = validator.with_query_executor(executor);
    }
    let report = validator.run(Arc::new(graph(data_ttl))).await;
    assert_conformance_invariant(&report);
    report
}

async fn validate(shapes_ttl: &str, data_ttl: &str) -> ValidationReport {
    validate_with(shapes_ttl, data_ttl, ValidationOptions::default(), None).await
}

fn results_for<'a>(report: &'a ValidationReport, focus: &str) -> Vec<&'a ValidationResult> {
    let focus = ex(focus);
    report
        .results()
        .iter()
        .filter(|result| result.focus_node == focus)
        .collect()
}

fn kinds_for(report: &ValidationReport, focus: &str) -> Vec<ConstraintKind> {
    let mut kinds: Vec<_> = results_for(report, focus)
        .iter()
        .map(|result| result.constraint_kind)
        .collect();
    kinds.sort_unstable();
    kinds
}

fn multiset(results: &[ValidationResult]) -> HashMap<&ValidationResult, usize> {
    let mut counts = HashMap::new();
    for result in results {
        *counts.entry(result).or_default() += 1;
    }
    counts
}

#[tokio::test]
async fn exactly_one_value() {
    let report = validate(
        "ex:S sh:targetClass ex:T ;
            sh:property [ sh:path ex:name ; sh:minCount 1 ; sh:maxCount 1 ] .",
        r#"ex:none a ex:T .
        ex:one a ex:T ; ex:name "a" .
        ex:two a ex:T ; ex:name "a", "b" ."#,
    )
    .await;
    assert_eq!(kinds_for(&report, "none"), vec![ConstraintKind::MinCount]);
    assert_eq!(kinds_for(&report, "one"), vec![]);
    assert_eq!(kinds_for(&report, "two"), vec![ConstraintKind::MaxCount]);
    let min_count = results_for(&report, "none")[0];
    assert_eq!(min_count.path, Some(NamedNode::new_unchecked("http://example.org/name")));
    assert_eq!(min_count.source_shape.to_term(), ex("S"));
    assert!(!report.conforms());
}

#[tokio::test]
async fn identifier_pattern() {
    let report = validate(
        r#"ex:S sh:targetClass ex:Fn ;
            sh:property [ sh:path ex:name ; sh:pattern "^[a-z_][a-z0-9_]*[!?]?$" ] ."#,
        r#"ex:good a ex:Fn ; ex:name "valid?" .
        ex:bad a ex:Fn ; ex:name "Invalid-Name" ."#,
    )
    .await;
    assert_eq!(kinds_for(&report, "good"), vec![]);
    assert_eq!(kinds_for(&report, "bad"), vec![ConstraintKind::Pattern]);
    assert_eq!(
        results_for(&report, "bad")[0].offending_value,
        Some(Literal::new_simple_literal("Invalid-Name").into())
    );
}

#[tokio::test]
async fn numeric_ranges() {
    let report = validate(
        "ex:S sh:targetClass ex:Byte ;
            sh:property [ sh:path ex:value ; sh:minInclusive 0 ; sh:maxInclusive 255 ] .",
        "ex:over a ex:Byte ; ex:value 300 .
        ex:max a ex:Byte ; ex:value 255 .
        ex:zero a ex:Byte ; ex:value 0 .",
    )
    .await;
    assert_eq!(kinds_for(&report, "over"), vec![ConstraintKind::MaxInclusive]);
    assert_eq!(kinds_for(&report, "max"), vec![]);
    assert_eq!(kinds_for(&report, "zero"), vec![]);
}

#[tokio::test]
async fn enumeration() {
    let report = validate(
        "ex:S sh:targetClass ex:T ;
            sh:property [ sh:path ex:grade ; sh:in ( ex:A ex:B ex:C ) ] .",
        "ex:in a ex:T ; ex:grade ex:B .
        ex:out a ex:T ; ex:grade ex:D .",
    )
    .await;
    assert_eq!(kinds_for(&report, "in"), vec![]);
    assert_eq!(kinds_for(&report, "out"), vec![ConstraintKind::In]);
}

#[tokio::test]
async fn qualified_min_count() {
    let report = validate(
        r#"ex:ModuleShape sh:targetClass ex:Module ;
            sh:property [
                sh:path ex:callback ;
                sh:qualifiedValueShape ex:InitCallback ;
                sh:qualifiedMinCount 1 ;
            ] .
        ex:InitCallback sh:property [ sh:path ex:kind ; sh:hasValue "init" ] ."#,
        r#"ex:without a ex:Module ; ex:callback ex:c1 .
        ex:c1 ex:kind "cleanup" .
        ex:with a ex:Module ; ex:callback ex:c2, ex:c3 .
        ex:c2 ex:kind "init" .
        ex:c3 ex:kind "cleanup" ."#,
    )
    .await;
    assert_eq!(kinds_for(&report, "without"), vec![ConstraintKind::QualifiedMinCount]);
    assert_eq!(kinds_for(&report, "with"), vec![]);
    // InitCallback is not targeted itself
    assert_eq!(kinds_for(&report, "c1"), vec![]);
}

#[tokio::test]
async fn exactly_one_alternative() {
    let report = validate(
        "ex:S sh:targetClass ex:T ;
            sh:xone ( [ sh:property [ sh:path ex:a ; sh:minCount 1 ] ]
                      [ sh:property [ sh:path ex:b ; sh:minCount 1 ] ] ) .",
        "ex:both a ex:T ; ex:a 1 ; ex:b 2 .
        ex:neither a ex:T .
        ex:onlyA a ex:T ; ex:a 1 .
        ex:onlyB a ex:T ; ex:b 1 .",
    )
    .await;
    assert_eq!(kinds_for(&report, "both"), vec![ConstraintKind::Xone]);
    assert_eq!(kinds_for(&report, "neither"), vec![ConstraintKind::Xone]);
    assert_eq!(kinds_for(&report, "onlyA"), vec![]);
    assert_eq!(kinds_for(&report, "onlyB"), vec![]);
}

#[tokio::test]
async fn property_shapes_as_alternatives() {
    let report = validate(
        "ex:S sh:targetClass ex:T ;
            sh:xone ( [ sh:path ex:a ; sh:minCount 1 ] [ sh:path ex:b ; sh:minCount 1 ] ) ;
            sh:or ( [ sh:path ex:a ; sh:datatype xsd:string ] ) ;
            sh:node ex:AtMostOneA .
        ex:AtMostOneA sh:path ex:a ; sh:maxCount 1 .",
        r#"ex:onlyA a ex:T ; ex:a "x" .
        ex:both a ex:T ; ex:a "x" ; ex:b "y" .
        ex:twoA a ex:T ; ex:a "x", "y" .
        ex:number a ex:T ; ex:a 1 ."#,
    )
    .await;
    assert_eq!(kinds_for(&report, "onlyA"), vec![]);
    assert_eq!(kinds_for(&report, "both"), vec![ConstraintKind::Xone]);
    assert_eq!(kinds_for(&report, "twoA"), vec![ConstraintKind::Node]);
    assert_eq!(kinds_for(&report, "number"), vec![ConstraintKind::Or]);
}

#[tokio::test]
async fn negation() {
    let report = validate(
        r#"ex:S sh:targetClass ex:Module ;
            sh:not ex:Deprecated ;
            sh:property [ sh:path ex:callback ; sh:node [ sh:not ex:Deprecated ] ] .
        ex:Deprecated sh:property [ sh:path ex:status ; sh:hasValue "deprecated" ] ."#,
        r#"ex:old a ex:Module ; ex:status "deprecated" .
        ex:new a ex:Module ; ex:status "stable" ; ex:callback ex:cb .
        ex:mixed a ex:Module ; ex:callback ex:oldCb .
        ex:cb ex:status "stable" .
        ex:oldCb ex:status "deprecated" ."#,
    )
    .await;
    assert_eq!(kinds_for(&report, "old"), vec![ConstraintKind::Not]);
    assert_eq!(kinds_for(&report, "new"), vec![]);
    assert_eq!(kinds_for(&report, "mixed"), vec![ConstraintKind::Node]);
    assert_eq!(
        results_for(&report, "mixed")[0].offending_value,
        Some(ex("oldCb"))
    );
}

#[tokio::test]
async fn cyclic_references_terminate() {
    let report = validate(
        "ex:A a sh:NodeShape ; sh:targetClass ex:T ; sh:and ( ex:B ) .
        ex:B a sh:NodeShape ; sh:and ( ex:A ) .",
        "ex:x a ex:T .",
    )
    .await;
    let kinds = kinds_for(&report, "x");
    assert!(kinds.contains(&ConstraintKind::RecursionLimit), "{kinds:?}");
    assert!(!report.conforms());
    let limit = results_for(&report, "x")
        .into_iter()
        .find(|result| result.constraint_kind == ConstraintKind::RecursionLimit)
        .unwrap();
    assert_eq!(limit.severity, Severity::Violation);
}

#[tokio::test]
async fn depth_limit_is_configurable() {
    let options = ValidationOptions {
        max_depth: 3,
        ..ValidationOptions::default()
    };
    // three levels of nesting are fine, the fourth is not
    let shapes_ttl = "ex:Top sh:targetClass ex:T ; sh:node ex:L1 .
        ex:L1 sh:node ex:L2 .
        ex:L2 sh:node ex:L3 .
        ex:L3 sh:nodeKind sh:IRI .";
    let report = validate_with(shapes_ttl, "ex:x a ex:T .", options.clone(), None).await;
    assert!(report.conforms());

    let deeper = format!("{shapes_ttl}\nex:L3 sh:node ex:L4 .\nex:L4 sh:nodeKind sh:IRI .");
    let report = validate_with(&deeper, "ex:x a ex:T .", options, None).await;
    assert!(kinds_for(&report, "x").contains(&ConstraintKind::RecursionLimit));
}

const LINE_SPAN_SHAPES: &str = r#"
    ex:SpanShape sh:targetClass ex:Span ;
        sh:sparql [
            sh:message "endLine must not be before startLine" ;
            sh:prefixes ex: ;
            sh:select """
                SELECT ?value WHERE {
                    $this ex:endLine ?value .
                    $this ex:startLine ?start .
                    FILTER (?value < ?start)
                }
                """ ;
        ] .
    ex: sh:declare [ sh:prefix "ex" ; sh:namespace "http://example.org/"^^xsd:anyURI ] .
"#;

const LINE_SPAN_DATA: &str = "
    ex:backwards a ex:Span ; ex:startLine 20 ; ex:endLine 10 .
    ex:forwards a ex:Span ; ex:startLine 10 ; ex:endLine 20 .
";

/// Answers with one row for the focus nodes listed, and records the queries.
struct Scripted {
    violating: Vec<String>,
    queries: Mutex<Vec<String>>,
}

impl QueryExecutor for Scripted {
    fn select(&self, query: &str) -> Result<Vec<Row>, QueryError> {
        self.queries.lock().unwrap().push(query.to_owned());
        Ok(self
            .violating
            .iter()
            .filter(|focus| query.contains(focus.as_str()))
            .map(|_| Row::from([("value".to_owned(), Term::from(Literal::from(10)))]))
            .collect())
    }
}

#[tokio::test]
async fn sparql_with_a_custom_executor() {
    let executor = Arc::new(Scripted {
        violating: vec!["<http://example.org/backwards>".to_owned()],
        queries: Mutex::default(),
    });
    let report = validate_with(
        LINE_SPAN_SHAPES,
        LINE_SPAN_DATA,
        ValidationOptions::default(),
        Some(Arc::clone(&executor) as Arc<dyn QueryExecutor>),
    )
    .await;
    assert_eq!(kinds_for(&report, "backwards"), vec![ConstraintKind::Sparql]);
    assert_eq!(kinds_for(&report, "forwards"), vec![]);
    let queries = executor.queries.lock().unwrap();
    assert_eq!(queries.len(), 2);
    assert!(queries.iter().all(|query| query.starts_with("PREFIX ex: <http://example.org/>")
        && !query.contains("$this")));
}

#[cfg(feature = "oxigraph")]
#[tokio::test]
async fn sparql_with_oxigraph() {
    let data = graph(LINE_SPAN_DATA);
    let executor = Arc::new(graphshape_engine::OxigraphExecutor::from_graph(&data).unwrap());
    let report = Validator::new(shapes(LINE_SPAN_SHAPES))
        .with_query_executor(executor)
        .run(Arc::new(data))
        .await;
    assert_conformance_invariant(&report);
    let backwards = results_for(&report, "backwards");
    assert_eq!(backwards.len(), 1);
    assert_eq!(backwards[0].constraint_kind, ConstraintKind::Sparql);
    assert_eq!(backwards[0].message, "endLine must not be before startLine");
    assert_eq!(backwards[0].offending_value, Some(Literal::from(10).into()));
    assert!(results_for(&report, "forwards").is_empty());
}

#[tokio::test]
async fn sparql_without_executor() {
    let report = validate(LINE_SPAN_SHAPES, LINE_SPAN_DATA).await;
    assert!(report.conforms());
    assert!(report.results().is_empty());
    assert_eq!(report.configuration_warnings().len(), 1);
    assert!(report.configuration_warnings()[0].contains("<http://example.org/SpanShape>"));
}

struct Failing(QueryError);

impl QueryExecutor for Failing {
    fn select(&self, _query: &str) -> Result<Vec<Row>, QueryError> {
        Err(self.0.clone())
    }
}

#[tokio::test]
async fn sparql_failures_are_violations() {
    let report = validate_with(
        LINE_SPAN_SHAPES,
        LINE_SPAN_DATA,
        ValidationOptions::default(),
        Some(Arc::new(Failing(QueryError::Timeout))),
    )
    .await;
    assert_eq!(kinds_for(&report, "backwards"), vec![ConstraintKind::SparqlError]);
    assert_eq!(kinds_for(&report, "forwards"), vec![ConstraintKind::SparqlError]);
    assert!(!report.conforms());
}

struct Sleeping(Duration);

impl QueryExecutor for Sleeping {
    fn select(&self, _query: &str) -> Result<Vec<Row>, QueryError> {
        std::thread::sleep(self.0);
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn timeouts_become_internal_errors() {
    let options = ValidationOptions {
        timeout_ms_per_unit: 50,
        ..ValidationOptions::default()
    };
    let report = validate_with(
        LINE_SPAN_SHAPES,
        LINE_SPAN_DATA,
        options,
        Some(Arc::new(Sleeping(Duration::from_millis(500)))),
    )
    .await;
    for focus in ["backwards", "forwards"] {
        let results = results_for(&report, focus);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].constraint_kind, ConstraintKind::Internal);
        assert_eq!(results[0].severity, Severity::Violation);
    }
}

/// Records how many queries run at the same time.
struct Crowded {
    delay: Duration,
    running: AtomicUsize,
    peak: AtomicUsize,
}

impl QueryExecutor for Crowded {
    fn select(&self, _query: &str) -> Result<Vec<Row>, QueryError> {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        self.running.fetch_sub(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn timed_out_units_keep_their_slot() {
    let executor = Arc::new(Crowded {
        delay: Duration::from_millis(150),
        running: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let options = ValidationOptions {
        parallel: true,
        max_concurrency: 1,
        timeout_ms_per_unit: 20,
        ..ValidationOptions::default()
    };
    let report = validate_with(
        r#"ex:S sh:targetClass ex:T ;
            sh:sparql [ sh:select "SELECT ?value WHERE { $this <http://example.org/p> ?value }" ] ."#,
        "ex:n1 a ex:T . ex:n2 a ex:T . ex:n3 a ex:T . ex:n4 a ex:T . ex:n5 a ex:T .",
        options,
        Some(Arc::clone(&executor) as Arc<dyn QueryExecutor>),
    )
    .await;
    assert_eq!(report.results().len(), 5);
    assert!(report
        .results()
        .iter()
        .all(|result| result.constraint_kind == ConstraintKind::Internal));
    assert_eq!(executor.peak.load(Ordering::SeqCst), 1);
}

/// Panics for one focus node, and works for all others.
struct Panicking {
    calls: AtomicUsize,
}

impl QueryExecutor for Panicking {
    fn select(&self, query: &str) -> Result<Vec<Row>, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(!query.contains("<http://example.org/backwards>"), "executor failure");
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn panics_are_isolated() {
    let executor = Arc::new(Panicking {
        calls: AtomicUsize::new(0),
    });
    let report = validate_with(
        LINE_SPAN_SHAPES,
        LINE_SPAN_DATA,
        ValidationOptions::default(),
        Some(Arc::clone(&executor) as Arc<dyn QueryExecutor>),
    )
    .await;
    assert_eq!(executor.calls.load(Ordering::SeqCst), 2);
    assert_eq!(kinds_for(&report, "backwards"), vec![ConstraintKind::Internal]);
    assert!(results_for(&report, "backwards")[0].message.contains("executor failure"));
    assert_eq!(kinds_for(&report, "forwards"), vec![]);
}

#[tokio::test]
async fn severities_and_messages() {
    let report = validate(
        r#"ex:S sh:targetClass ex:Service ;
            sh:severity sh:Warning ;
            sh:property [
                sh:path ex:port ;
                sh:maxInclusive 255 ;
                sh:message "Port {?value} of {$this} is too large" ;
            ] ;
            sh:property [
                sh:path ex:host ;
                sh:minCount 1 ;
                sh:severity sh:Info ;
            ] ."#,
        "ex:web a ex:Service ; ex:port 300 .",
    )
    .await;
    assert!(report.conforms());
    let mut results = results_for(&report, "web");
    results.sort_by_key(|result| result.constraint_kind);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].constraint_kind, ConstraintKind::MinCount);
    assert_eq!(results[0].severity, Severity::Info);
    assert_eq!(results[1].severity, Severity::Warning);
    assert_eq!(results[1].message, "Port 300 of <http://example.org/web> is too large");
}

#[tokio::test]
async fn other_targets() {
    let report = validate(
        "ex:Named sh:targetNode ex:alice, ex:ghost ; sh:class ex:Person .
        ex:Knowers sh:targetSubjectsOf ex:knows ; sh:class ex:Person .
        ex:Known sh:targetObjectsOf ex:knows ; sh:nodeKind sh:IRI .",
        r#"ex:alice a ex:Robot ; ex:knows ex:bob, "carol" .
        ex:bob a ex:Person ; ex:knows ex:alice ."#,
    )
    .await;
    // ex:ghost is not in the data, so it is not validated
    assert!(results_for(&report, "ghost").is_empty());
    // alice is targeted by Named and Knowers, with no Person type
    assert_eq!(
        kinds_for(&report, "alice"),
        vec![ConstraintKind::Class, ConstraintKind::Class]
    );
    assert_eq!(kinds_for(&report, "bob"), vec![]);
    let carol = Term::from(Literal::new_simple_literal("carol"));
    assert!(report
        .results()
        .iter()
        .any(|result| result.focus_node == carol && result.constraint_kind == ConstraintKind::NodeKind));
}

#[tokio::test]
async fn deactivated_shapes() {
    let report = validate(
        "ex:S sh:targetClass ex:T ; sh:deactivated true ;
            sh:property [ sh:path ex:name ; sh:minCount 1 ] .",
        "ex:x a ex:T .",
    )
    .await;
    assert!(report.conforms());
    assert!(report.results().is_empty());
}

const MIXED_SHAPES: &str = r#"
    ex:PersonShape sh:targetClass ex:Person ;
        sh:property [ sh:path ex:name ; sh:minCount 1 ; sh:maxCount 1 ; sh:datatype xsd:string ] ;
        sh:property [ sh:path ex:age ; sh:minInclusive 0 ; sh:maxExclusive 150 ] ;
        sh:property [ sh:path ex:email ; sh:pattern "^[^@]+@[^@]+$" ; sh:maxLength 20 ] ;
        sh:or ( [ sh:property [ sh:path ex:email ; sh:minCount 1 ] ]
                [ sh:property [ sh:path ex:phone ; sh:minCount 1 ] ] ) .
"#;

fn mixed_data() -> Graph {
    let mut turtle = String::new();
    for idx in 0..40 {
        let age = idx * 7 - 20;
        let contact = match idx % 3 {
            0 => format!(r#"ex:email "p{idx}@example.org""#),
            1 => format!(r#"ex:email "broken-address-number-{idx}""#),
            _ => r#"ex:phone "+49 123""#.to_owned(),
        };
        let names = if idx % 5 == 0 { r#""A", "B""# } else { r#""A""# };
        turtle.push_str(&format!(
            "ex:p{idx} a ex:Person ; ex:name {names} ; ex:age {age} ; {contact} .\n"
        ));
    }
    graph(&turtle)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_and_sequential_agree() {
    let model = shapes(MIXED_SHAPES);
    let data = Arc::new(mixed_data());
    let parallel = run(
        Arc::clone(&data) as Arc<dyn DataGraph>,
        Arc::clone(&model),
        ValidationOptions {
            parallel: true,
            max_concurrency: 8,
            ..ValidationOptions::default()
        },
    )
    .await;
    let sequential = run(
        data,
        model,
        ValidationOptions {
            parallel: false,
            ..ValidationOptions::default()
        },
    )
    .await;
    assert!(!parallel.results().is_empty());
    assert_conformance_invariant(&parallel);
    assert_eq!(multiset(parallel.results()), multiset(sequential.results()));
    assert_eq!(parallel.conforms(), sequential.conforms());
}

#[tokio::test]
async fn runs_are_idempotent() {
    let validator = Validator::new(shapes(MIXED_SHAPES));
    let data = Arc::new(mixed_data());
    let first = validator.run(Arc::clone(&data) as Arc<dyn DataGraph>).await;
    let second = validator.run(data).await;
    assert_eq!(multiset(first.results()), multiset(second.results()));
    assert_eq!(first.conforms(), second.conforms());
}

#[test]
fn blocking_run() {
    let validator = Validator::new(shapes(
        "ex:S sh:targetClass ex:T ; sh:property [ sh:path ex:name ; sh:minCount 1 ] .",
    ));
    let report = validator.run_blocking(Arc::new(graph("ex:x a ex:T ."))).unwrap();
    assert_eq!(report.results().len(), 1);
    assert!(!report.conforms());
}
