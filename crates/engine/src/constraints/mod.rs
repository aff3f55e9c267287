// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Checks of single constraints against the value nodes of a focus node.
//!
//! These only look at the values (and, for `sh:class`, at the data graph).
//! Constraints that refer to other shapes are evaluated by the engine.

pub mod cardinality;
pub mod range;
pub mod string;
pub mod types;
pub mod value;

use std::fmt;

use graphshape_vocab::{gs, sh};
use oxrdf::{NamedNode, NamedNodeRef, Term};

/// Which kind of constraint produced a validation result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstraintKind {
    MinCount,
    MaxCount,
    Datatype,
    Class,
    NodeKind,
    Pattern,
    MinLength,
    MaxLength,
    MinInclusive,
    MaxInclusive,
    MinExclusive,
    MaxExclusive,
    In,
    HasValue,
    Node,
    QualifiedMinCount,
    QualifiedMaxCount,
    And,
    Or,
    Xone,
    Not,
    Sparql,
    /// A SPARQL constraint could not be evaluated.
    SparqlError,
    /// Shape references nested deeper than allowed.
    RecursionLimit,
    /// Evaluating a validation unit failed (timeout or panic).
    Internal,
}

impl ConstraintKind {
    /// The constraint component reported as `sh:sourceConstraintComponent`.
    #[must_use]
    pub const fn component(self) -> NamedNodeRef<'static> {
        match self {
            Self::MinCount => sh::MIN_COUNT_CONSTRAINT_COMPONENT,
            Self::MaxCount => sh::MAX_COUNT_CONSTRAINT_COMPONENT,
            Self::Datatype => sh::DATATYPE_CONSTRAINT_COMPONENT,
            Self::Class => sh::CLASS_CONSTRAINT_COMPONENT,
            Self::NodeKind => sh::NODE_KIND_CONSTRAINT_COMPONENT,
            Self::Pattern => sh::PATTERN_CONSTRAINT_COMPONENT,
            Self::MinLength => sh::MIN_LENGTH_CONSTRAINT_COMPONENT,
            Self::MaxLength => sh::MAX_LENGTH_CONSTRAINT_COMPONENT,
            Self::MinInclusive => sh::MIN_INCLUSIVE_CONSTRAINT_COMPONENT,
            Self::MaxInclusive => sh::MAX_INCLUSIVE_CONSTRAINT_COMPONENT,
            Self::MinExclusive => sh::MIN_EXCLUSIVE_CONSTRAINT_COMPONENT,
            Self::MaxExclusive => sh::MAX_EXCLUSIVE_CONSTRAINT_COMPONENT,
            Self::In => sh::IN_CONSTRAINT_COMPONENT,
            Self::HasValue => sh::HAS_VALUE_CONSTRAINT_COMPONENT,
            Self::Node => sh::NODE_CONSTRAINT_COMPONENT,
            Self::QualifiedMinCount => sh::QUALIFIED_MIN_COUNT_CONSTRAINT_COMPONENT,
            Self::QualifiedMaxCount => sh::QUALIFIED_MAX_COUNT_CONSTRAINT_COMPONENT,
            Self::And => sh::AND_CONSTRAINT_COMPONENT,
            Self::Or => sh::OR_CONSTRAINT_COMPONENT,
            Self::Xone => sh::XONE_CONSTRAINT_COMPONENT,
            Self::Not => sh::NOT_CONSTRAINT_COMPONENT,
            Self::Sparql => sh::SPARQL_CONSTRAINT_COMPONENT,
            Self::SparqlError => gs::SPARQL_ERROR_COMPONENT,
            Self::RecursionLimit => gs::RECURSION_LIMIT_COMPONENT,
            Self::Internal => gs::INTERNAL_ERROR_COMPONENT,
        }
    }

    /// Results of these kinds describe a failure of the validation itself.
    /// They are always reported as violations,
    /// and their messages are never replaced by `sh:message`.
    #[must_use]
    pub const fn is_engine_error(self) -> bool {
        matches!(self, Self::SparqlError | Self::RecursionLimit | Self::Internal)
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A constraint violation, before it gets located
/// (focus node, shape, severity) by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViolationDraft {
    pub kind: ConstraintKind,
    pub value: Option<Term>,
    /// Only set where the producer knows better than the property shape,
    /// e.g. a SPARQL `?path` binding.
    pub path: Option<NamedNode>,
    pub message: String,
}

impl ViolationDraft {
    #[must_use]
    pub fn new<M: Into<String>>(kind: ConstraintKind, message: M) -> Self {
        Self {
            kind,
            value: None,
            path: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: Term) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: NamedNode) -> Self {
        self.path = Some(path);
        self
    }
}
