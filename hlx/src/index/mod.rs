use crate::backend::{Backend, Value};
use crate::codec;
use crate::document::Document;
use crate::error::{HlxError, Operation, Result};
use crate::fields::FieldSet;
use crate::options::IndexOptions;
use crate::record::{FromRow, Record};
use crate::storage;
use rusqlite::Connection;
use std::fmt;
use std::marker::PhantomData;

/// Statements derived once from the field set and table name.
#[derive(Debug, Clone)]
struct Statements {
    insert: String,
    select_by_id: String,
    search: String,
    delete: String,
    count: String,
}

impl Statements {
    fn new(table: &str, fields: &FieldSet) -> Self {
        let columns: Vec<&str> = fields.iter().collect();
        Statements {
            insert: storage::insert_sql(table, &columns),
            select_by_id: storage::select_by_id_sql(table, fields),
            search: storage::search_sql(table, fields),
            delete: storage::delete_sql(table),
            count: storage::count_sql(table),
        }
    }
}

/// A full-text index of documents of type `D` stored in an FTS5 table.
///
/// `D` is either a static [`Record`] type or the dynamic [`Document`]. The
/// backend defaults to an owned SQLite connection; pass `&Connection` or
/// `Rc<Connection>` to [`Index::with_backend`] to share one connection
/// between several indexes (each needs its own table).
///
/// Writes are not transactional: a batch insert that fails midway keeps the
/// rows written before the failure and skips the rest.
pub struct Index<D, B: Backend = Connection> {
    backend: B,
    fields: FieldSet,
    options: IndexOptions,
    statements: Statements,
    _doc: PhantomData<fn() -> D>,
}

impl<D, B: Backend> fmt::Debug for Index<D, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Index")
            .field("table", &self.options.table)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl<R: Record> Index<R, Connection> {
    /// Open (or create) an index for record type `R` at `uri`.
    pub fn open(uri: &str, options: IndexOptions) -> Result<Self> {
        let fields = FieldSet::infer(R::FIELDS)?;
        Self::open_with_fields(uri, fields, options)
    }
}

impl<D: FromRow> Index<D, Connection> {
    /// Open (or create) an index with an explicit field set, typically for
    /// [`Document`] values.
    pub fn open_with_fields(uri: &str, fields: FieldSet, options: IndexOptions) -> Result<Self> {
        options.validate()?;
        let conn = storage::open_connection(uri)?;
        Self::initialize(conn, fields, options)
    }
}

impl<R: Record, B: Backend> Index<R, B> {
    /// Create an index for record type `R` on an existing backend.
    pub fn with_backend(backend: B, options: IndexOptions) -> Result<Self> {
        let fields = FieldSet::infer(R::FIELDS)?;
        Self::with_backend_and_fields(backend, fields, options)
    }

    /// Insert records one row at a time. An empty identifier is replaced
    /// with a generated one. Returns the identifiers written.
    ///
    /// Stops at the first failure; rows written before it stay written.
    pub fn insert(&self, docs: &[R]) -> Result<Vec<String>> {
        let mut ids = Vec::with_capacity(docs.len());
        for doc in docs {
            let encoded = codec::encode_record(&self.fields, doc, self.options.id_strategy)?;
            self.backend
                .exec(&self.statements.insert, &encoded.value_refs())
                .map_err(|e| HlxError::backend(Operation::Insert, e))?;
            log::trace!("Inserted {} into {}", encoded.id, self.options.table);
            ids.push(encoded.id);
        }
        Ok(ids)
    }
}

impl<D: FromRow, B: Backend> Index<D, B> {
    /// Create an index with an explicit field set on an existing backend.
    ///
    /// Applies the configured directives, creates the table when missing and
    /// prepares the insert statement.
    pub fn with_backend_and_fields(
        backend: B,
        fields: FieldSet,
        options: IndexOptions,
    ) -> Result<Self> {
        options.validate()?;
        Self::initialize(backend, fields, options)
    }

    /// Construction steps shared by every constructor, run on options that
    /// have already been validated.
    fn initialize(backend: B, fields: FieldSet, options: IndexOptions) -> Result<Self> {
        storage::initialize(&backend, &options, &fields)?;

        let statements = Statements::new(&options.table, &fields);
        backend
            .prepare_statement(&statements.insert)
            .map_err(|e| HlxError::backend(Operation::Prepare, e))?;

        log::info!(
            "Opened index '{}' with fields [{}]",
            options.table,
            fields.names().join(", ")
        );

        Ok(Index {
            backend,
            fields,
            options,
            statements,
            _doc: PhantomData,
        })
    }

    /// Insert dynamic documents. Each may carry a different subset of the
    /// index fields; a missing or empty `id` is generated. Returns the
    /// identifiers written.
    ///
    /// Stops at the first failure; rows written before it stay written.
    pub fn insert_map(&self, docs: &[Document]) -> Result<Vec<String>> {
        let mut ids = Vec::with_capacity(docs.len());
        for doc in docs {
            let encoded = codec::encode_document(&self.fields, doc, self.options.id_strategy)?;
            let sql = storage::insert_sql(&self.options.table, &encoded.column_refs());
            self.backend
                .exec(&sql, &encoded.value_refs())
                .map_err(|e| HlxError::backend(Operation::Insert, e))?;
            log::trace!("Inserted {} into {}", encoded.id, self.options.table);
            ids.push(encoded.id);
        }
        Ok(ids)
    }

    /// Get the document with identifier `id`.
    pub fn get(&self, id: &str) -> Result<D> {
        let result = self
            .backend
            .fetch(&self.statements.select_by_id, &[id])
            .map_err(|e| HlxError::backend(Operation::Get, e))?;

        let matched = result.rows.len();
        let first = result
            .rows
            .into_iter()
            .next()
            .ok_or_else(|| HlxError::NotFound { id: id.to_string() })?;

        if matched > 1 {
            log::warn!(
                "{matched} rows share id {id} in {}; returning the first",
                self.options.table
            );
        }

        codec::decode(&result.columns, first)
    }

    /// Delete every row with identifier `id`. Returns how many were removed;
    /// zero is not an error.
    pub fn delete(&self, id: &str) -> Result<usize> {
        self.backend
            .exec(&self.statements.delete, &[id])
            .map_err(|e| HlxError::backend(Operation::Delete, e))
    }

    /// Run a full-text query. The query text is handed to the engine's
    /// `MATCH` operator untouched.
    pub fn search(&self, query: &str) -> Result<Vec<D>> {
        let result = self
            .backend
            .fetch(&self.statements.search, &[query])
            .map_err(|e| HlxError::backend(Operation::Search, e))?;

        let columns = result.columns;
        result
            .rows
            .into_iter()
            .map(|raw| codec::decode(&columns, raw))
            .collect()
    }

    /// Number of stored rows.
    pub fn count(&self) -> Result<usize> {
        let result = self
            .backend
            .fetch(&self.statements.count, &[])
            .map_err(|e| HlxError::backend(Operation::Count, e))?;

        match result.rows.first().and_then(|r| r.first()) {
            Some(Value::Integer(n)) => Ok(*n as usize),
            other => Err(HlxError::Decode(format!(
                "Unexpected count value: {other:?}"
            ))),
        }
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn table(&self) -> &str {
        &self.options.table
    }

    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    /// The underlying backend, e.g. to wrap writes in a transaction.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}
