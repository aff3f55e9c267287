// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fs;
use std::path::{Path, PathBuf};

use graphshape_cli::config::Config;
use graphshape_cli::{validate, write_report, Error};
use graphshape_engine::ValidationOptions;
use graphshape_io::Format;
use tempfile::TempDir;

const SHAPES: &str = r#"
@prefix sh: <http://www.w3.org/ns/shacl#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix ex: <http://example.org/> .

ex:PersonShape a sh:NodeShape ;
    sh:targetClass ex:Person ;
    sh:property [
        sh:path ex:name ;
        sh:minCount 1 ;
        sh:maxCount 1 ;
        sh:datatype xsd:string ;
    ] ;
    sh:sparql [
        sh:message "Person is their own friend" ;
        sh:select """
            PREFIX ex: <http://example.org/>
            SELECT ?value WHERE { $this ex:friend ?value . FILTER(?value = $this) }
        """ ;
    ] .
"#;

const ALICE: &str = r#"
<http://example.org/alice> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://example.org/Person> .
<http://example.org/alice> <http://example.org/name> "Alice" .
"#;

const BOB: &str = r"
@prefix ex: <http://example.org/> .
ex:bob a ex:Person ;
    ex:friend ex:bob .
";

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let file = dir.join(name);
    fs::write(&file, content).unwrap();
    file
}

fn config(dir: &TempDir, data: &[(&str, &str)]) -> Config {
    Config {
        shapes: vec![write(dir.path(), "shapes.ttl", SHAPES)],
        data: data
            .iter()
            .map(|(name, content)| write(dir.path(), name, content))
            .collect(),
        output: None,
        format: None,
        options: ValidationOptions::default(),
    }
}

#[tokio::test]
async fn conforming_data() {
    let dir = TempDir::new().unwrap();
    let report = validate(&config(&dir, &[("alice.nt", ALICE)])).await.unwrap();
    assert!(report.conforms());
    assert!(report.results().is_empty());
    assert!(report.configuration_warnings().is_empty());
}

#[tokio::test]
async fn merges_data_files() {
    let dir = TempDir::new().unwrap();
    let report = validate(&config(&dir, &[("alice.nt", ALICE), ("bob.ttl", BOB)]))
        .await
        .unwrap();
    assert!(!report.conforms());
    // bob has no name and is his own friend
    assert_eq!(report.violation_count(), 2);
    assert!(report
        .results()
        .iter()
        .all(|result| result.focus_node.to_string() == "<http://example.org/bob>"));
}

#[tokio::test]
async fn writes_the_report_file() {
    let dir = TempDir::new().unwrap();
    let mut cfg = config(&dir, &[("bob.ttl", BOB)]);
    let report_file = dir.path().join("report.nt");
    cfg.output = Some(report_file.clone());
    let report = validate(&cfg).await.unwrap();

    let mut stdout = Vec::new();
    write_report(&report, &cfg, &mut stdout).unwrap();
    assert!(stdout.is_empty());

    let graph = graphshape_io::load(&report_file, None).unwrap();
    assert_eq!(graph.len(), graphshape_engine::report::write(&report).len());
    let content = fs::read_to_string(&report_file).unwrap();
    assert!(content.contains("<http://www.w3.org/ns/shacl#conforms> \"false\""));
}

#[tokio::test]
async fn writes_to_the_given_writer() {
    let dir = TempDir::new().unwrap();
    let mut cfg = config(&dir, &[("bob.ttl", BOB)]);
    cfg.format = Some(Format::NTriples);
    let report = validate(&cfg).await.unwrap();

    let mut out = Vec::new();
    write_report(&report, &cfg, &mut out).unwrap();
    let graph = graphshape_io::parse(out.as_slice(), Format::NTriples).unwrap();
    assert_eq!(graph.len(), graphshape_engine::report::write(&report).len());
}

#[tokio::test]
async fn missing_files() {
    let dir = TempDir::new().unwrap();
    let mut cfg = config(&dir, &[("alice.nt", ALICE)]);
    cfg.data.push(dir.path().join("missing.ttl"));
    let res = validate(&cfg).await;
    assert!(matches!(res, Err(Error::Rdf(graphshape_io::Error::Io(_)))));

    cfg.data.clear();
    assert!(matches!(validate(&cfg).await, Err(Error::NoData)));
}

#[tokio::test]
async fn invalid_shapes() {
    let dir = TempDir::new().unwrap();
    let mut cfg = config(&dir, &[("alice.nt", ALICE)]);
    cfg.shapes = vec![write(
        dir.path(),
        "broken.ttl",
        r#"
@prefix sh: <http://www.w3.org/ns/shacl#> .
@prefix ex: <http://example.org/> .
ex:S a sh:NodeShape ;
    sh:targetClass ex:Person ;
    sh:property [ sh:path ex:name ; sh:pattern "(" ] .
"#,
    )];
    assert!(matches!(validate(&cfg).await, Err(Error::Shapes(_))));
}
