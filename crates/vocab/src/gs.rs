// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! graphshape report extensions.
//!
//! Results that do not stem from a SHACL constraint component
//! (engine failures, recursion limits, broken SPARQL)
//! name one of these as their `sh:sourceConstraintComponent`.

use crate::named_node;

pub const NS_BASE: &str = "https://w3id.org/graphshape/ns#";
pub const NS_PREFERRED_PREFIX: &str = "gs";

named_node!(
    INTERNAL_ERROR_COMPONENT,
    NS_BASE,
    "InternalErrorComponent",
    "The evaluation of a shape for a focus node panicked or timed out."
);
named_node!(
    RECURSION_LIMIT_COMPONENT,
    NS_BASE,
    "RecursionLimitComponent",
    "Nested shape evaluation exceeded the configured recursion depth."
);
named_node!(
    SPARQL_ERROR_COMPONENT,
    NS_BASE,
    "SparqlErrorComponent",
    "A SPARQL constraint could not be evaluated (syntax error, execution error or timeout)."
);
