// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use oxrdfio::RdfFormat;

/// The RDF serialization formats graphshape reads
/// (and, except for N3, writes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Format {
    N3,
    NQuads,
    NTriples,
    RdfXml,
    TriG,
    #[default]
    Turtle,
}

impl Format {
    pub const ALL: [Self; 6] = [
        Self::N3,
        Self::NQuads,
        Self::NTriples,
        Self::RdfXml,
        Self::TriG,
        Self::Turtle,
    ];

    #[must_use]
    pub const fn to_oxrdf_format(self) -> RdfFormat {
        match self {
            Self::N3 => RdfFormat::N3,
            Self::NQuads => RdfFormat::NQuads,
            Self::NTriples => RdfFormat::NTriples,
            Self::RdfXml => RdfFormat::RdfXml,
            Self::TriG => RdfFormat::TriG,
            Self::Turtle => RdfFormat::Turtle,
        }
    }

    /// The file extensions commonly used for this format,
    /// the preferred one first.
    #[must_use]
    pub const fn file_exts(self) -> &'static [&'static str] {
        match self {
            Self::N3 => &["n3"],
            Self::NQuads => &["nq"],
            Self::NTriples => &["nt"],
            Self::RdfXml => &["rdf", "owl", "xml"],
            Self::TriG => &["trig"],
            Self::Turtle => &["ttl"],
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::N3 => "n3",
            Self::NQuads => "nquads",
            Self::NTriples => "ntriples",
            Self::RdfXml => "rdfxml",
            Self::TriG => "trig",
            Self::Turtle => "turtle",
        }
    }

    #[must_use]
    pub const fn supports_writing(self) -> bool {
        !matches!(self, Self::N3)
    }

    #[must_use]
    pub fn from_ext(ext: &str) -> Option<Self> {
        let ext_lower = ext.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|fmt| fmt.file_exts().contains(&ext_lower.as_str()))
    }

    /// Guesses the format from the file extension of the given path.
    #[must_use]
    pub fn from_path(file: &Path) -> Option<Self> {
        extract_file_ext(file).and_then(Self::from_ext)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("Unknown RDF format '{0}'; supported are: turtle, ntriples, nquads, trig, n3, rdfxml (or one of their file extensions)")]
pub struct UnknownFormat(pub String);

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|fmt| fmt.name() == lower)
            .or_else(|| Self::from_ext(&lower))
            .ok_or_else(|| UnknownFormat(s.to_owned()))
    }
}

pub fn extract_file_ext(file: &Path) -> Option<&str> {
    file.extension().and_then(OsStr::to_str)
}
