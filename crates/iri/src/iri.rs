// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;

use oxiri::{Iri as OxIri, IriParseError};

pub type Iri = OxIri<String>;

/// A single namespace prefix declaration,
/// as found in a SHACL shapes graph:
///
/// ```turtle
/// ex:
///   sh:declare [
///     sh:prefix "ex" ;
///     sh:namespace "http://example.org/"^^xsd:anyURI ;
///   ] .
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Prefix {
    /// The short form, e.g. `xsd` or `schema`.
    /// May be empty, which declares the default prefix (`:`).
    pub prefix: String,
    /// The extended/full form,
    /// e.g. `http://www.w3.org/2001/XMLSchema#`
    /// or `http://schema.org/`.
    pub iri: Iri,
}

impl Prefix {
    /// Creates a new instance of `Prefix`.
    ///
    /// # Errors
    ///
    /// Returns an `IriParseError` if the given `iri` is not an absolute IRI.
    pub fn new(prefix: String, iri: String) -> Result<Self, IriParseError> {
        Ok(Self {
            prefix,
            iri: OxIri::parse(iri)?,
        })
    }

    /// Renders this declaration as a SPARQL `PREFIX` line
    /// (without a trailing new-line).
    #[must_use]
    pub fn to_sparql(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PREFIX {}: <{}>", self.prefix, self.iri.as_str())
    }
}

/// An ordered set of prefix declarations,
/// prepended to SPARQL query templates before they get executed.
///
/// Declaring the same prefix again replaces the earlier declaration,
/// keeping its position.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Prologue {
    prefixes: Vec<Prefix>,
}

impl Prologue {
    pub fn push(&mut self, prefix: Prefix) {
        if let Some(existing) = self
            .prefixes
            .iter_mut()
            .find(|existing| existing.prefix == prefix.prefix)
        {
            *existing = prefix;
        } else {
            self.prefixes.push(prefix);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prefix> {
        self.prefixes.iter()
    }

    /// Prepends the `PREFIX` declarations to the given query.
    #[must_use]
    pub fn apply(&self, query: &str) -> String {
        let mut full = String::new();
        for prefix in &self.prefixes {
            full.push_str(&prefix.to_sparql());
            full.push('\n');
        }
        full.push_str(query);
        full
    }
}

impl Extend<Prefix> for Prologue {
    fn extend<T: IntoIterator<Item = Prefix>>(&mut self, iter: T) {
        for prefix in iter {
            self.push(prefix);
        }
    }
}
