use std::fmt;
use thiserror::Error;

/// The index operation a backend failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Open,
    Configure,
    CreateTable,
    Prepare,
    Insert,
    Get,
    Delete,
    Search,
    Count,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Open => "open",
            Operation::Configure => "configure",
            Operation::CreateTable => "create table",
            Operation::Prepare => "prepare",
            Operation::Insert => "insert",
            Operation::Get => "get",
            Operation::Delete => "delete",
            Operation::Search => "search",
            Operation::Count => "count",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum HlxError {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Document not found: {id}")]
    NotFound { id: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("{op} failed: {source}")]
    Backend {
        op: Operation,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl HlxError {
    pub(crate) fn backend<E>(op: Operation, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        HlxError::Backend {
            op,
            source: Box::new(source),
        }
    }

    /// True for the "no row with this id" outcome of `Index::get`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, HlxError::NotFound { .. })
    }

    /// The operation that failed, for errors raised by the storage engine.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            HlxError::Backend { op, .. } => Some(*op),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, HlxError>;
