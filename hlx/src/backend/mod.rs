//! The storage collaborator seam.
//!
//! The index only needs three capabilities from the engine: execute a
//! statement with positional text parameters, run a query and hand back its
//! rows with column names, and optionally pre-compile a statement it will run
//! many times. [`Backend`] captures exactly that, so the mapping layer can be
//! driven by `rusqlite` in production and by an in-memory fake in tests.

use rusqlite::{params_from_iter, Connection};
use std::rc::Rc;

pub use rusqlite::types::Value;

/// Raw rows returned by a query, with their column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// A connection able to run statements against a full-text engine.
pub trait Backend {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Execute a statement; returns the number of affected rows.
    fn exec(&self, sql: &str, params: &[&str]) -> Result<usize, Self::Error>;

    /// Run a statement and collect every row it produces.
    fn fetch(&self, sql: &str, params: &[&str]) -> Result<QueryResult, Self::Error>;

    /// Compile `sql` ahead of its first use. Backends without statement
    /// caching can ignore this.
    fn prepare_statement(&self, _sql: &str) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Backend for Connection {
    type Error = rusqlite::Error;

    fn exec(&self, sql: &str, params: &[&str]) -> Result<usize, Self::Error> {
        let mut stmt = self.prepare_cached(sql)?;
        stmt.execute(params_from_iter(params.iter()))
    }

    fn fetch(&self, sql: &str, params: &[&str]) -> Result<QueryResult, Self::Error> {
        let mut stmt = self.prepare_cached(sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let width = columns.len();

        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut collected = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(row.get::<_, Value>(i)?);
            }
            collected.push(values);
        }

        Ok(QueryResult {
            columns,
            rows: collected,
        })
    }

    fn prepare_statement(&self, sql: &str) -> Result<(), Self::Error> {
        self.prepare_cached(sql)?;
        Ok(())
    }
}

impl<B: Backend + ?Sized> Backend for &B {
    type Error = B::Error;

    fn exec(&self, sql: &str, params: &[&str]) -> Result<usize, Self::Error> {
        (**self).exec(sql, params)
    }

    fn fetch(&self, sql: &str, params: &[&str]) -> Result<QueryResult, Self::Error> {
        (**self).fetch(sql, params)
    }

    fn prepare_statement(&self, sql: &str) -> Result<(), Self::Error> {
        (**self).prepare_statement(sql)
    }
}

impl<B: Backend + ?Sized> Backend for Rc<B> {
    type Error = B::Error;

    fn exec(&self, sql: &str, params: &[&str]) -> Result<usize, Self::Error> {
        (**self).exec(sql, params)
    }

    fn fetch(&self, sql: &str, params: &[&str]) -> Result<QueryResult, Self::Error> {
        (**self).fetch(sql, params)
    }

    fn prepare_statement(&self, sql: &str) -> Result<(), Self::Error> {
        (**self).prepare_statement(sql)
    }
}
