// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::cmp::Ordering;

use oxrdf::vocab::xsd;
use oxrdf::{Literal, NamedNodeRef, Term};

use super::{ConstraintKind, ViolationDraft};
use crate::model::{Comparison, RangeBound};

/// A number read from a literal.
///
/// Integers are kept exact as long as both sides of a comparison are integers;
/// everything else is compared as `f64`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Numeric {
    Integer(i128),
    Float(f64),
}

const NUMERIC_DATATYPES: [NamedNodeRef<'static>; 16] = [
    xsd::INTEGER,
    xsd::DECIMAL,
    xsd::FLOAT,
    xsd::DOUBLE,
    xsd::LONG,
    xsd::INT,
    xsd::SHORT,
    xsd::BYTE,
    xsd::NON_NEGATIVE_INTEGER,
    xsd::POSITIVE_INTEGER,
    xsd::NON_POSITIVE_INTEGER,
    xsd::NEGATIVE_INTEGER,
    xsd::UNSIGNED_LONG,
    xsd::UNSIGNED_INT,
    xsd::UNSIGNED_SHORT,
    xsd::UNSIGNED_BYTE,
];

impl Numeric {
    /// Reads a number from a decimal or scientific lexical form,
    /// e.g. `"12"`, `" -3.5 "` or `"1e3"`.
    /// Named values like `"inf"` or `"NaN"` are no numbers here.
    #[must_use]
    pub fn parse(lexical: &str) -> Option<Self> {
        let trimmed = lexical.trim();
        if let Ok(integer) = trimmed.parse::<i128>() {
            return Some(Self::Integer(integer));
        }
        if !trimmed
            .chars()
            .all(|chr| chr.is_ascii_digit() || matches!(chr, '+' | '-' | '.' | 'e' | 'E'))
        {
            return None;
        }
        trimmed.parse::<f64>().ok().map(Self::Float)
    }

    /// Literals of a numeric XSD datatype,
    /// and simple (`xsd:string`) literals with a numeric lexical form.
    /// `xsd:float` and `xsd:double` also know `INF`, `-INF` and `NaN`.
    #[must_use]
    pub fn from_literal(literal: &Literal) -> Option<Self> {
        let datatype = literal.datatype();
        if datatype == xsd::FLOAT || datatype == xsd::DOUBLE {
            match literal.value().trim() {
                "INF" | "+INF" => return Some(Self::Float(f64::INFINITY)),
                "-INF" => return Some(Self::Float(f64::NEG_INFINITY)),
                "NaN" => return Some(Self::Float(f64::NAN)),
                _ => {}
            }
        }
        if datatype == xsd::STRING || NUMERIC_DATATYPES.contains(&datatype) {
            Self::parse(literal.value())
        } else {
            None
        }
    }

    /// Literals only; IRIs and blank nodes are no numbers.
    #[must_use]
    pub fn from_term(term: &Term) -> Option<Self> {
        match term {
            Term::Literal(literal) => Self::from_literal(literal),
            Term::NamedNode(_) | Term::BlankNode(_) | Term::Triple(_) => None,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    const fn as_f64(self) -> f64 {
        match self {
            Self::Integer(integer) => integer as f64,
            Self::Float(float) => float,
        }
    }

    /// `None` if either side is `NaN`.
    #[must_use]
    pub fn compare(self, other: Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(left), Self::Integer(right)) => Some(left.cmp(&right)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl Comparison {
    #[must_use]
    pub const fn kind(self) -> ConstraintKind {
        match self {
            Self::MinInclusive => ConstraintKind::MinInclusive,
            Self::MaxInclusive => ConstraintKind::MaxInclusive,
            Self::MinExclusive => ConstraintKind::MinExclusive,
            Self::MaxExclusive => ConstraintKind::MaxExclusive,
        }
    }

    const fn operator(self) -> &'static str {
        match self {
            Self::MinInclusive => ">=",
            Self::MaxInclusive => "<=",
            Self::MinExclusive => ">",
            Self::MaxExclusive => "<",
        }
    }

    /// Whether `ordering` (of value compared to limit) satisfies this bound.
    const fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::MinInclusive => !matches!(ordering, Ordering::Less),
            Self::MaxInclusive => !matches!(ordering, Ordering::Greater),
            Self::MinExclusive => matches!(ordering, Ordering::Greater),
            Self::MaxExclusive => matches!(ordering, Ordering::Less),
        }
    }
}

/// Values that are no numbers never satisfy a bound.
#[must_use]
pub fn validate(values: &[Term], bound: &RangeBound) -> Vec<ViolationDraft> {
    values
        .iter()
        .filter(|value| {
            !Numeric::from_term(value)
                .and_then(|number| number.compare(bound.limit))
                .is_some_and(|ordering| bound.comparison.accepts(ordering))
        })
        .map(|value| {
            ViolationDraft::new(
                bound.comparison.kind(),
                format!(
                    "Value {value} is not {} {}",
                    bound.comparison.operator(),
                    bound.literal.value()
                ),
            )
            .with_value(value.clone())
        })
        .collect()
}
