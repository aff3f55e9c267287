// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use oxrdf::Term;

use super::{ConstraintKind, ViolationDraft};
use crate::model::Pattern;

/// The string a pattern or length constraint looks at:
/// the lexical form of literals, the IRI of named nodes.
/// Blank nodes (and quoted triples) have none.
fn lexical_form(term: &Term) -> Option<&str> {
    match term {
        Term::Literal(literal) => Some(literal.value()),
        Term::NamedNode(node) => Some(node.as_str()),
        Term::BlankNode(_) | Term::Triple(_) => None,
    }
}

#[must_use]
pub fn validate_pattern(values: &[Term], pattern: &Pattern) -> Vec<ViolationDraft> {
    values
        .iter()
        .filter(|value| !lexical_form(value).is_some_and(|text| pattern.is_match(text)))
        .map(|value| {
            ViolationDraft::new(
                ConstraintKind::Pattern,
                format!("Value {value} does not match the pattern '{}'", pattern.source),
            )
            .with_value(value.clone())
        })
        .collect()
}

/// Lengths are counted in Unicode scalar values.
#[must_use]
pub fn validate_length(
    values: &[Term],
    min: Option<usize>,
    max: Option<usize>,
) -> Vec<ViolationDraft> {
    let mut drafts = Vec::new();
    for value in values {
        let length = lexical_form(value).map(|text| text.chars().count());
        if let Some(min) = min {
            if !length.is_some_and(|length| length >= min) {
                drafts.push(
                    ViolationDraft::new(
                        ConstraintKind::MinLength,
                        format!("Value {value} is shorter than {min} character(s)"),
                    )
                    .with_value(value.clone()),
                );
            }
        }
        if let Some(max) = max {
            if !length.is_some_and(|length| length <= max) {
                drafts.push(
                    ViolationDraft::new(
                        ConstraintKind::MaxLength,
                        format!("Value {value} is longer than {max} character(s)"),
                    )
                    .with_value(value.clone()),
                );
            }
        }
    }
    drafts
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{BlankNode, Literal, NamedNode};

    fn lit(value: &str) -> Term {
        Literal::new_simple_literal(value).into()
    }

    #[test]
    fn identifier_pattern() {
        let pattern = Pattern::new("^[a-z_][a-z0-9_]*[!?]?$".to_owned(), None).unwrap();
        assert!(validate_pattern(&[lit("valid?")], &pattern).is_empty());
        let drafts = validate_pattern(&[lit("Invalid-Name")], &pattern);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].value, Some(lit("Invalid-Name")));
    }

    #[test]
    fn pattern_on_iris_and_blank_nodes() {
        let pattern = Pattern::new("example".to_owned(), None).unwrap();
        let iri = Term::from(NamedNode::new_unchecked("http://example.org/a"));
        assert!(validate_pattern(&[iri], &pattern).is_empty());
        let blank = Term::from(BlankNode::new_unchecked("example"));
        assert_eq!(validate_pattern(&[blank], &pattern).len(), 1);
    }

    #[test]
    fn length_counts_characters() {
        // 4 characters, 8 bytes
        let value = lit("äöüß");
        assert!(validate_length(&[value.clone()], Some(4), Some(4)).is_empty());
        assert_eq!(validate_length(&[value.clone()], Some(5), None)[0].kind, ConstraintKind::MinLength);
        assert_eq!(validate_length(&[value], None, Some(3))[0].kind, ConstraintKind::MaxLength);
    }

    #[test]
    fn blank_nodes_have_no_length() {
        let blank = Term::from(BlankNode::default());
        assert_eq!(validate_length(&[blank], Some(0), Some(10)).len(), 2);
    }
}
