// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The in-memory form of a shapes graph.
//!
//! Shapes live in an arena ([`ShapesModel`]);
//! references between shapes are [`ShapeHandle`]s into that arena,
//! so cyclic shape references need no shared ownership.

use std::collections::HashMap;
use std::fmt;

use graphshape_iri::Prologue;
use graphshape_vocab::sh;
use oxrdf::{BlankNode, Literal, NamedNode, NamedNodeRef, SubjectRef, Term};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use regex::{Regex, RegexBuilder};

use crate::constraints::range::Numeric;

/// Identifies a shape (or a property shape, or a SPARQL constraint)
/// by the node that describes it in the shapes graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShapeId {
    Named(NamedNode),
    Blank(BlankNode),
}

impl ShapeId {
    #[must_use]
    pub fn as_subject(&self) -> SubjectRef<'_> {
        match self {
            Self::Named(node) => node.as_ref().into(),
            Self::Blank(node) => node.as_ref().into(),
        }
    }

    #[must_use]
    pub fn to_term(&self) -> Term {
        match self {
            Self::Named(node) => node.clone().into(),
            Self::Blank(node) => node.clone().into(),
        }
    }
}

impl From<NamedNode> for ShapeId {
    fn from(node: NamedNode) -> Self {
        Self::Named(node)
    }
}

impl From<BlankNode> for ShapeId {
    fn from(node: BlankNode) -> Self {
        Self::Blank(node)
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(node) => write!(f, "{node}"),
            Self::Blank(node) => write!(f, "{node}"),
        }
    }
}

/// Index of a [`NodeShape`] within its [`ShapesModel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeHandle(pub(crate) usize);

impl ShapeHandle {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    #[default]
    Violation,
}

impl Severity {
    #[must_use]
    pub const fn iri(self) -> NamedNodeRef<'static> {
        match self {
            Self::Info => sh::INFO,
            Self::Warning => sh::WARNING,
            Self::Violation => sh::VIOLATION,
        }
    }

    #[must_use]
    pub fn from_iri(iri: NamedNodeRef<'_>) -> Option<Self> {
        [Self::Info, Self::Warning, Self::Violation]
            .into_iter()
            .find(|severity| severity.iri() == iri)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Violation => "Violation",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Iri,
    BlankNode,
    Literal,
    BlankNodeOrIri,
    BlankNodeOrLiteral,
    IriOrLiteral,
}

impl NodeKind {
    pub const ALL: [Self; 6] = [
        Self::Iri,
        Self::BlankNode,
        Self::Literal,
        Self::BlankNodeOrIri,
        Self::BlankNodeOrLiteral,
        Self::IriOrLiteral,
    ];

    #[must_use]
    pub const fn iri(self) -> NamedNodeRef<'static> {
        match self {
            Self::Iri => sh::IRI,
            Self::BlankNode => sh::BLANK_NODE,
            Self::Literal => sh::LITERAL,
            Self::BlankNodeOrIri => sh::BLANK_NODE_OR_IRI,
            Self::BlankNodeOrLiteral => sh::BLANK_NODE_OR_LITERAL,
            Self::IriOrLiteral => sh::IRI_OR_LITERAL,
        }
    }

    #[must_use]
    pub fn from_iri(iri: NamedNodeRef<'_>) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.iri() == iri)
    }

    /// Whether `term` is of this kind.
    /// Quoted triples are of no kind at all.
    #[must_use]
    pub const fn matches(self, term: &Term) -> bool {
        let (iri, blank, literal) = match term {
            Term::NamedNode(_) => (true, false, false),
            Term::BlankNode(_) => (false, true, false),
            Term::Literal(_) => (false, false, true),
            Term::Triple(_) => (false, false, false),
        };
        match self {
            Self::Iri => iri,
            Self::BlankNode => blank,
            Self::Literal => literal,
            Self::BlankNodeOrIri => blank || iri,
            Self::BlankNodeOrLiteral => blank || literal,
            Self::IriOrLiteral => iri || literal,
        }
    }
}

/// A compiled `sh:pattern`, together with its `sh:flags`.
#[derive(Clone, Debug)]
pub struct Pattern {
    pub source: String,
    pub flags: Option<String>,
    regex: Regex,
}

impl Pattern {
    /// Compiles a pattern.
    ///
    /// Supported flags are `i`, `m`, `s` and `x`
    /// (with their XPath meaning) and `q`,
    /// which treats the pattern as a literal string.
    /// Unknown flags are ignored.
    ///
    /// # Errors
    ///
    /// If the pattern is not a valid regular expression.
    pub fn new(source: String, flags: Option<String>) -> Result<Self, regex::Error> {
        let flags_str = flags.as_deref().unwrap_or_default();
        let expression = if flags_str.contains('q') {
            regex::escape(&source)
        } else {
            source.clone()
        };
        let regex = RegexBuilder::new(&expression)
            .case_insensitive(flags_str.contains('i'))
            .multi_line(flags_str.contains('m'))
            .dot_matches_new_line(flags_str.contains('s'))
            .ignore_whitespace(flags_str.contains('x'))
            .build()?;
        Ok(Self {
            source,
            flags,
            regex,
        })
    }

    /// Unanchored search, as with XPath `fn:matches`.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Comparison {
    MinInclusive,
    MaxInclusive,
    MinExclusive,
    MaxExclusive,
}

/// One numeric bound, e.g. `sh:maxExclusive 10`.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeBound {
    pub comparison: Comparison,
    pub limit: Numeric,
    /// The bound as written in the shapes graph, for messages.
    pub literal: Literal,
}

#[derive(Clone, Debug)]
pub enum Constraint {
    /// `sh:minCount`/`sh:maxCount`; only on property shapes.
    Cardinality {
        min: Option<usize>,
        max: Option<usize>,
    },
    Datatype(NamedNode),
    Class(NamedNode),
    NodeKind(NodeKind),
    Pattern(Pattern),
    Length {
        min: Option<usize>,
        max: Option<usize>,
    },
    Range(RangeBound),
    In(Vec<Term>),
    HasValue(Term),
    /// Every value has to conform to the referenced shape.
    Node(ShapeHandle),
    /// Between `min` and `max` values have to conform to `shape`.
    Qualified {
        shape: ShapeHandle,
        min: Option<usize>,
        max: Option<usize>,
    },
}

impl Constraint {
    /// The shapes this constraint evaluates values against.
    fn references(&self) -> Option<ShapeHandle> {
        match self {
            Self::Node(shape) | Self::Qualified { shape, .. } => Some(*shape),
            Self::Cardinality { .. }
            | Self::Datatype(_)
            | Self::Class(_)
            | Self::NodeKind(_)
            | Self::Pattern(_)
            | Self::Length { .. }
            | Self::Range(_)
            | Self::In(_)
            | Self::HasValue(_) => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PropertyShape {
    pub id: ShapeId,
    pub path: NamedNode,
    pub name: Option<String>,
    pub constraints: Vec<Constraint>,
    /// Overrides the severity of the owning node shape.
    pub severity: Option<Severity>,
    /// Overrides the message of the owning node shape.
    pub message: Option<String>,
}

/// A SPARQL-based constraint (`sh:sparql`).
#[derive(Clone, Debug)]
pub struct SparqlConstraint {
    pub id: ShapeId,
    /// The `SELECT` query, still containing the `$this` placeholder.
    pub select: String,
    pub prologue: Prologue,
    pub message: Option<String>,
    pub severity: Option<Severity>,
}

#[derive(Clone, Debug)]
pub struct NodeShape {
    pub id: ShapeId,
    pub target_classes: Vec<NamedNode>,
    pub target_nodes: Vec<Term>,
    pub target_subjects_of: Vec<NamedNode>,
    pub target_objects_of: Vec<NamedNode>,
    pub properties: Vec<PropertyShape>,
    /// Value constraints applying to the focus node itself.
    pub constraints: Vec<Constraint>,
    pub and: Vec<ShapeHandle>,
    pub or: Vec<ShapeHandle>,
    pub xone: Vec<ShapeHandle>,
    pub not: Option<ShapeHandle>,
    pub sparql: Vec<SparqlConstraint>,
    pub severity: Severity,
    pub message: Option<String>,
    pub deactivated: bool,
}

impl NodeShape {
    #[must_use]
    pub fn new(id: ShapeId) -> Self {
        Self {
            id,
            target_classes: Vec::new(),
            target_nodes: Vec::new(),
            target_subjects_of: Vec::new(),
            target_objects_of: Vec::new(),
            properties: Vec::new(),
            constraints: Vec::new(),
            and: Vec::new(),
            or: Vec::new(),
            xone: Vec::new(),
            not: None,
            sparql: Vec::new(),
            severity: Severity::default(),
            message: None,
            deactivated: false,
        }
    }

    /// Whether this shape selects focus nodes on its own,
    /// as opposed to only being referenced by other shapes.
    #[must_use]
    pub fn has_targets(&self) -> bool {
        !(self.target_classes.is_empty()
            && self.target_nodes.is_empty()
            && self.target_subjects_of.is_empty()
            && self.target_objects_of.is_empty())
    }

    /// All shapes this shape refers to, in any way.
    pub fn references(&self) -> impl Iterator<Item = ShapeHandle> + '_ {
        self.and
            .iter()
            .chain(&self.or)
            .chain(&self.xone)
            .chain(&self.not)
            .copied()
            .chain(self.constraints.iter().filter_map(Constraint::references))
            .chain(
                self.properties
                    .iter()
                    .flat_map(|property| &property.constraints)
                    .filter_map(Constraint::references),
            )
    }
}

/// All the shapes read from one shapes graph.
/// Immutable once read, and shared by all validation units.
#[derive(Clone, Debug, Default)]
pub struct ShapesModel {
    shapes: Vec<NodeShape>,
    index: HashMap<ShapeId, ShapeHandle>,
}

impl ShapesModel {
    /// Assembles a model.
    /// `shapes[i]` has to be the shape that `ShapeHandle(i)` refers to.
    pub(crate) fn from_shapes(shapes: Vec<NodeShape>) -> Self {
        let index = shapes
            .iter()
            .enumerate()
            .map(|(idx, shape)| (shape.id.clone(), ShapeHandle(idx)))
            .collect();
        Self { shapes, index }
    }

    /// Handles are only ever created for the model they index into.
    #[must_use]
    #[allow(clippy::indexing_slicing)]
    pub fn get(&self, handle: ShapeHandle) -> &NodeShape {
        &self.shapes[handle.0]
    }

    #[must_use]
    pub fn handle(&self, id: &ShapeId) -> Option<ShapeHandle> {
        self.index.get(id).copied()
    }

    #[must_use]
    pub fn find(&self, id: &ShapeId) -> Option<&NodeShape> {
        self.handle(id).map(|handle| self.get(handle))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShapeHandle, &NodeShape)> {
        self.shapes
            .iter()
            .enumerate()
            .map(|(idx, shape)| (ShapeHandle(idx), shape))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Groups of shapes that (transitively) refer to each other.
    /// Validating against any of these relies on the depth limit
    /// to terminate.
    #[must_use]
    pub fn reference_cycles(&self) -> Vec<Vec<ShapeHandle>> {
        let mut refs = DiGraph::<(), ()>::with_capacity(self.shapes.len(), 0);
        for _ in &self.shapes {
            refs.add_node(());
        }
        for (handle, shape) in self.iter() {
            for referenced in shape.references() {
                refs.update_edge(
                    NodeIndex::new(handle.0),
                    NodeIndex::new(referenced.0),
                    (),
                );
            }
        }
        tarjan_scc(&refs)
            .into_iter()
            .filter(|component| match component.as_slice() {
                [single] => refs.contains_edge(*single, *single),
                _ => true,
            })
            .map(|component| {
                let mut handles: Vec<_> = component
                    .into_iter()
                    .map(|node| ShapeHandle(node.index()))
                    .collect();
                handles.sort_unstable();
                handles
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_flags() {
        let plain = Pattern::new("^abc$".to_owned(), None).unwrap();
        assert!(plain.is_match("abc"));
        assert!(!plain.is_match("ABC"));

        let insensitive = Pattern::new("^abc$".to_owned(), Some("i".to_owned())).unwrap();
        assert!(insensitive.is_match("ABC"));

        let quoted = Pattern::new("a.c".to_owned(), Some("q".to_owned())).unwrap();
        assert!(quoted.is_match("xa.cx"));
        assert!(!quoted.is_match("abc"));

        assert!(Pattern::new("(".to_owned(), None).is_err());
    }

    #[test]
    fn pattern_is_unanchored() {
        let pattern = Pattern::new("b+".to_owned(), None).unwrap();
        assert!(pattern.is_match("abbbc"));
    }

    #[test]
    fn node_kinds() {
        let iri = Term::from(NamedNode::new_unchecked("http://example.org/a"));
        let blank = Term::from(BlankNode::default());
        let literal = Term::from(Literal::new_simple_literal("a"));
        assert!(NodeKind::Iri.matches(&iri));
        assert!(!NodeKind::Iri.matches(&literal));
        assert!(NodeKind::BlankNodeOrIri.matches(&blank));
        assert!(NodeKind::IriOrLiteral.matches(&literal));
        assert!(!NodeKind::BlankNodeOrLiteral.matches(&iri));
        assert_eq!(NodeKind::from_iri(sh::LITERAL), Some(NodeKind::Literal));
        assert_eq!(NodeKind::from_iri(sh::VIOLATION), None);
    }

    #[test]
    fn cycles() {
        let mut a = NodeShape::new(NamedNode::new_unchecked("http://example.org/A").into());
        let mut b = NodeShape::new(NamedNode::new_unchecked("http://example.org/B").into());
        let c = NodeShape::new(NamedNode::new_unchecked("http://example.org/C").into());
        a.and = vec![ShapeHandle(1), ShapeHandle(2)];
        b.not = Some(ShapeHandle(0));
        let model = ShapesModel::from_shapes(vec![a, b, c]);
        assert_eq!(
            model.reference_cycles(),
            vec![vec![ShapeHandle(0), ShapeHandle(1)]]
        );
    }
}
