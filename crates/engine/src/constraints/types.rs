// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use oxrdf::{NamedNodeRef, Term};

use super::{ConstraintKind, ViolationDraft};
use crate::graph::DataGraph;
use crate::model::NodeKind;

/// Every value has to be a literal of exactly this datatype.
/// Lexical well-formedness is not checked.
#[must_use]
pub fn validate_datatype(values: &[Term], datatype: NamedNodeRef<'_>) -> Vec<ViolationDraft> {
    values
        .iter()
        .filter(|value| !matches!(value, Term::Literal(literal) if literal.datatype() == datatype))
        .map(|value| {
            ViolationDraft::new(
                ConstraintKind::Datatype,
                format!("Value {value} does not have the datatype {datatype}"),
            )
            .with_value(value.clone())
        })
        .collect()
}

/// Every value has to be directly typed with `class` in the data graph.
/// Sub-classes are not taken into account.
#[must_use]
pub fn validate_class(
    values: &[Term],
    class: NamedNodeRef<'_>,
    data: &dyn DataGraph,
) -> Vec<ViolationDraft> {
    values
        .iter()
        .filter(|value| matches!(value, Term::Literal(_)) || !data.has_type(value, class))
        .map(|value| {
            ViolationDraft::new(
                ConstraintKind::Class,
                format!("Value {value} is not an instance of {class}"),
            )
            .with_value(value.clone())
        })
        .collect()
}

#[must_use]
pub fn validate_node_kind(values: &[Term], kind: NodeKind) -> Vec<ViolationDraft> {
    values
        .iter()
        .filter(|value| !kind.matches(value))
        .map(|value| {
            ViolationDraft::new(
                ConstraintKind::NodeKind,
                format!("Value {value} is not of node kind {}", kind.iri()),
            )
            .with_value(value.clone())
        })
        .collect()
}
