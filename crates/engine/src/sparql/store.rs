// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use oxigraph::model::GraphNameRef;
use oxigraph::sparql::{Query, QueryResults};
use oxigraph::store::Store;
use oxrdf::Graph;

use super::{QueryError, QueryExecutor, Row};

/// Evaluates queries against an in-memory copy of a data graph.
pub struct OxigraphExecutor {
    store: Store,
}

fn execution_error<E: ToString>(err: E) -> QueryError {
    QueryError::Execution(err.to_string())
}

impl OxigraphExecutor {
    /// Copies `graph` into a fresh in-memory store.
    ///
    /// # Errors
    ///
    /// If the store could not be created or filled.
    pub fn from_graph(graph: &Graph) -> Result<Self, QueryError> {
        let store = Store::new().map_err(execution_error)?;
        for triple in graph {
            store
                .insert(triple.in_graph(GraphNameRef::DefaultGraph))
                .map_err(execution_error)?;
        }
        tracing::debug!("Loaded {} triples into the SPARQL store", graph.len());
        Ok(Self { store })
    }
}

impl QueryExecutor for OxigraphExecutor {
    fn select(&self, query: &str) -> Result<Vec<Row>, QueryError> {
        let parsed = Query::parse(query, None).map_err(|err| QueryError::Syntax(err.to_string()))?;
        match self.store.query(parsed).map_err(execution_error)? {
            QueryResults::Solutions(solutions) => {
                let mut rows = Vec::new();
                for solution in solutions {
                    let solution = solution.map_err(execution_error)?;
                    rows.push(
                        solution
                            .iter()
                            .map(|(variable, term)| (variable.as_str().to_owned(), term.clone()))
                            .collect(),
                    );
                }
                Ok(rows)
            }
            QueryResults::Boolean(_) | QueryResults::Graph(_) => Err(QueryError::Execution(
                "only SELECT queries are supported".to_owned(),
            )),
        }
    }
}
