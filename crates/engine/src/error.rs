// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;

use oxrdf::NamedNode;

use crate::model::ShapeId;

/// Where in the shapes graph a problem was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub shape: ShapeId,
    pub path: Option<NamedNode>,
}

impl Location {
    #[must_use]
    pub const fn shape(shape: ShapeId) -> Self {
        Self { shape, path: None }
    }

    #[must_use]
    pub fn with_path(&self, path: NamedNode) -> Self {
        Self {
            shape: self.shape.clone(),
            path: Some(path),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape {}", self.shape)?;
        if let Some(path) = &self.path {
            write!(f, " (property {path})")?;
        }
        Ok(())
    }
}

/// A malformed shapes graph.
/// Any of these aborts reading the shapes;
/// no data gets validated against a partially read shapes graph.
#[derive(thiserror::Error, Debug)]
pub enum ShapesError {
    #[error("{location}: invalid regular expression '{pattern}': {source}")]
    InvalidPattern {
        location: Location,
        pattern: String,
        source: regex::Error,
    },

    #[error("{referrer} references {reference}, which is not defined as a shape")]
    UnresolvedReference {
        referrer: Location,
        reference: ShapeId,
    },

    #[error("{location}: the property shape {property} has no sh:path")]
    MissingPath { location: Location, property: ShapeId },

    #[error("{location}: the property shape {property} uses a property path expression; only single properties are supported")]
    UnsupportedPath { location: Location, property: ShapeId },

    #[error("{location}: sh:qualifiedMinCount/sh:qualifiedMaxCount require a sh:qualifiedValueShape")]
    MissingQualifiedShape { location: Location },

    #[error("{location}: the SPARQL constraint {constraint} has no sh:select")]
    MissingSelect {
        location: Location,
        constraint: ShapeId,
    },

    #[error("{location}: invalid value '{value}' for <{property}>: {reason}")]
    InvalidValue {
        location: Location,
        property: NamedNode,
        value: String,
        reason: String,
    },

    #[error("{location}: malformed RDF list for <{property}>: {reason}")]
    MalformedList {
        location: Location,
        property: NamedNode,
        reason: String,
    },
}
