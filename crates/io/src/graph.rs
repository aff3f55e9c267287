// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use oxrdf::{Graph, GraphNameRef, Triple};
use oxrdfio::{RdfParseError, RdfParser, RdfSerializer};

use crate::Format;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unable to determine the RDF format of '{}' from its file extension", .0.display())]
    UnknownFormat(PathBuf),

    #[error("Writing {0} is not supported")]
    UnsupportedOutputFormat(Format),

    #[error("The input was not syntactically valid:\n{0}")]
    Syntax(String),

    /// Represents all cases of `std::io::Error`.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn map_rdf_parse_error(parse_err: RdfParseError) -> Error {
    match parse_err {
        RdfParseError::Io(io_err) => Error::Io(io_err),
        RdfParseError::Syntax(syntax_err) => Error::Syntax(syntax_err.to_string()),
    }
}

fn format_for(file: &Path, format: Option<Format>) -> Result<Format, Error> {
    format
        .or_else(|| Format::from_path(file))
        .ok_or_else(|| Error::UnknownFormat(file.to_path_buf()))
}

/// Parses RDF into an existing graph.
/// Quads in named graphs are merged into the graph as plain triples.
/// Blank nodes get fresh identifiers,
/// so they never clash with those already in `graph`.
///
/// # Errors
///
/// - if the input can not be read
/// - if the input is not valid in the given format
pub fn parse_into<R: Read>(graph: &mut Graph, input: R, format: Format) -> Result<(), Error> {
    let mut named_graph_quads = 0_usize;
    let parser = RdfParser::from_format(format.to_oxrdf_format()).rename_blank_nodes();
    for quad_res in parser.for_reader(input) {
        let quad = quad_res.map_err(map_rdf_parse_error)?;
        if quad.graph_name.as_ref() != GraphNameRef::DefaultGraph {
            named_graph_quads += 1;
        }
        graph.insert(&Triple::new(quad.subject, quad.predicate, quad.object));
    }
    if named_graph_quads > 0 {
        tracing::debug!(
            "Merged {named_graph_quads} quads from named graphs into the default graph"
        );
    }
    Ok(())
}

/// Parses RDF into a new graph.
///
/// # Errors
///
/// - if the input can not be read
/// - if the input is not valid in the given format
pub fn parse<R: Read>(input: R, format: Format) -> Result<Graph, Error> {
    let mut graph = Graph::new();
    parse_into(&mut graph, input, format)?;
    Ok(graph)
}

/// Loads an RDF file into an existing graph.
/// If no format is given, it is guessed from the file extension.
///
/// # Errors
///
/// - if no format is given and the file extension is unknown
/// - if the file can not be read
/// - if the file content is not valid in the format
pub fn load_into(graph: &mut Graph, file: &Path, format: Option<Format>) -> Result<(), Error> {
    let fmt = format_for(file, format)?;
    tracing::debug!("Loading {fmt} file '{}' ...", file.display());
    let input = fs::File::open(file)?;
    parse_into(graph, io::BufReader::new(input), fmt)
}

/// Loads an RDF file into a new graph.
/// If no format is given, it is guessed from the file extension.
///
/// # Errors
///
/// See [`load_into`].
pub fn load(file: &Path, format: Option<Format>) -> Result<Graph, Error> {
    let mut graph = Graph::new();
    load_into(&mut graph, file, format)?;
    Ok(graph)
}

/// Loads and merges multiple RDF files into one graph.
///
/// # Errors
///
/// See [`load_into`].
pub fn load_all<P: AsRef<Path>>(files: &[P]) -> Result<Graph, Error> {
    let mut graph = Graph::new();
    for file in files {
        load_into(&mut graph, file.as_ref(), None)?;
    }
    Ok(graph)
}

/// Loads an RDF file into an existing graph - async version.
///
/// # Errors
///
/// See [`load_into`].
#[cfg(feature = "async")]
pub async fn load_into_async(
    graph: &mut Graph,
    file: &Path,
    format: Option<Format>,
) -> Result<(), Error> {
    let fmt = format_for(file, format)?;
    tracing::debug!("Loading {fmt} file '{}' (async) ...", file.display());
    let content = tokio::fs::read(file).await?;
    parse_into(graph, content.as_slice(), fmt)
}

/// Loads and merges multiple RDF files into one graph - async version.
///
/// # Errors
///
/// See [`load_into`].
#[cfg(feature = "async")]
pub async fn load_all_async<P: AsRef<Path> + Send + Sync>(files: &[P]) -> Result<Graph, Error> {
    let mut graph = Graph::new();
    for file in files {
        load_into_async(&mut graph, file.as_ref(), None).await?;
    }
    Ok(graph)
}

/// Serializes a graph.
///
/// # Errors
///
/// - if the format does not support writing
/// - if writing fails
pub fn write<W: Write>(graph: &Graph, format: Format, output: W) -> Result<W, Error> {
    if !format.supports_writing() {
        return Err(Error::UnsupportedOutputFormat(format));
    }
    let mut writer = RdfSerializer::from_format(format.to_oxrdf_format()).for_writer(output);
    for triple in graph {
        writer.serialize_triple(triple)?;
    }
    Ok(writer.finish()?)
}

/// Serializes a graph into a file.
/// If no format is given, it is guessed from the file extension.
///
/// # Errors
///
/// - if no format is given and the file extension is unknown
/// - if the format does not support writing
/// - if the file can not be written
pub fn write_file(graph: &Graph, file: &Path, format: Option<Format>) -> Result<(), Error> {
    let fmt = format_for(file, format)?;
    let out = fs::File::create(file)?;
    let mut buffered = write(graph, fmt, io::BufWriter::new(out))?;
    buffered.flush()?;
    Ok(())
}
