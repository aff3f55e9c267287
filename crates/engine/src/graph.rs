// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashSet;

use oxrdf::{vocab::rdf, Graph, NamedNodeRef, SubjectRef, Term, TermRef, TripleRef};

/// Read-only access to the data graph under validation.
///
/// Validation units run on worker threads,
/// so implementations have to be shareable between them.
pub trait DataGraph: Send + Sync {
    /// All objects of the triples `subject property ?o`.
    fn objects(&self, subject: &Term, property: NamedNodeRef<'_>) -> Vec<Term>;

    /// All nodes that are directly declared to be of type `class`
    /// (no sub-class reasoning).
    fn subjects_of_type(&self, class: NamedNodeRef<'_>) -> Vec<Term>;

    fn has_type(&self, node: &Term, class: NamedNodeRef<'_>) -> bool;

    /// All distinct subjects of triples with the given predicate.
    fn subjects_with_property(&self, property: NamedNodeRef<'_>) -> Vec<Term>;

    /// All distinct objects of triples with the given predicate.
    fn objects_of_property(&self, property: NamedNodeRef<'_>) -> Vec<Term>;

    /// Whether the node occurs in the graph at all,
    /// either as subject or as object.
    fn contains_node(&self, node: &Term) -> bool;
}

/// Views a term as a triple subject, if it can be one.
#[must_use]
pub fn as_subject(term: &Term) -> Option<SubjectRef<'_>> {
    match term {
        Term::NamedNode(node) => Some(node.as_ref().into()),
        Term::BlankNode(node) => Some(node.as_ref().into()),
        Term::Triple(triple) => Some(SubjectRef::Triple(triple)),
        Term::Literal(_) => None,
    }
}

fn distinct<I: Iterator<Item = Term>>(terms: I) -> Vec<Term> {
    let mut seen = HashSet::new();
    terms.filter(|term| seen.insert(term.clone())).collect()
}

impl DataGraph for Graph {
    fn objects(&self, subject: &Term, property: NamedNodeRef<'_>) -> Vec<Term> {
        as_subject(subject).map_or_else(Vec::new, |subject| {
            self.objects_for_subject_predicate(subject, property)
                .map(TermRef::into_owned)
                .collect()
        })
    }

    fn subjects_of_type(&self, class: NamedNodeRef<'_>) -> Vec<Term> {
        self.subjects_for_predicate_object(rdf::TYPE, class)
            .map(|subject| Term::from(subject.into_owned()))
            .collect()
    }

    fn has_type(&self, node: &Term, class: NamedNodeRef<'_>) -> bool {
        as_subject(node).is_some_and(|subject| self.contains(TripleRef::new(subject, rdf::TYPE, class)))
    }

    fn subjects_with_property(&self, property: NamedNodeRef<'_>) -> Vec<Term> {
        distinct(
            self.triples_for_predicate(property)
                .map(|triple| Term::from(triple.subject.into_owned())),
        )
    }

    fn objects_of_property(&self, property: NamedNodeRef<'_>) -> Vec<Term> {
        distinct(
            self.triples_for_predicate(property)
                .map(|triple| triple.object.into_owned()),
        )
    }

    fn contains_node(&self, node: &Term) -> bool {
        let as_subject = as_subject(node)
            .is_some_and(|subject| self.triples_for_subject(subject).next().is_some());
        as_subject || self.triples_for_object(node.as_ref()).next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{Literal, NamedNode, Triple};

    fn ex(local: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{local}"))
    }

    fn sample() -> Graph {
        let mut graph = Graph::new();
        graph.insert(&Triple::new(ex("alice"), rdf::TYPE, ex("Person")));
        graph.insert(&Triple::new(ex("alice"), ex("knows"), ex("bob")));
        graph.insert(&Triple::new(ex("carol"), ex("knows"), ex("bob")));
        graph.insert(&Triple::new(ex("alice"), ex("name"), Literal::new_simple_literal("Alice")));
        graph
    }

    #[test]
    fn lookups() {
        let graph = sample();
        let alice = Term::from(ex("alice"));
        assert_eq!(graph.objects(&alice, ex("knows").as_ref()), vec![Term::from(ex("bob"))]);
        assert_eq!(graph.subjects_of_type(ex("Person").as_ref()), vec![alice.clone()]);
        assert!(graph.has_type(&alice, ex("Person").as_ref()));
        assert!(!graph.has_type(&Term::from(ex("bob")), ex("Person").as_ref()));
        assert_eq!(graph.subjects_with_property(ex("knows").as_ref()).len(), 2);
        assert_eq!(graph.objects_of_property(ex("knows").as_ref()), vec![Term::from(ex("bob"))]);
    }

    #[test]
    fn literals_have_no_properties() {
        let graph = sample();
        let name = Term::from(Literal::new_simple_literal("Alice"));
        assert!(graph.objects(&name, ex("knows").as_ref()).is_empty());
        assert!(graph.contains_node(&name));
        assert!(graph.contains_node(&Term::from(ex("bob"))));
        assert!(!graph.contains_node(&Term::from(ex("dave"))));
    }
}
