use crate::error::{HlxError, Result};
use crate::fields::is_identifier;
use serde::{Deserialize, Serialize};

/// Table name used when none is configured.
pub const DEFAULT_TABLE: &str = "fulltext_search";

/// Storage driver used when none is configured.
pub const DEFAULT_DRIVER: &str = "sqlite";

/// Engine directives applied before the index table is created.
pub const DEFAULT_PRAGMAS: &[&str] = &[
    "PRAGMA journal_mode=WAL",
    "PRAGMA synchronous=NORMAL",
    "PRAGMA cache_size=10000",
    "PRAGMA temp_store=memory",
    "PRAGMA busy_timeout=5000",
];

/// How identifiers are generated for documents written without one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// Random (v4) UUID in canonical hyphenated form.
    #[default]
    Uuid,
    /// Lowercase ULID.
    Ulid,
}

impl IdStrategy {
    pub fn generate(&self) -> String {
        match self {
            IdStrategy::Uuid => uuid::Uuid::new_v4().to_string(),
            IdStrategy::Ulid => ulid::Ulid::new().to_string().to_lowercase(),
        }
    }
}

/// Construction options for an [`Index`](crate::Index).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexOptions {
    /// Storage engine binding.
    pub driver: String,
    /// Directives applied verbatim, in order, before the table is created.
    pub pragmas: Vec<String>,
    /// Name of the FTS5 virtual table.
    pub table: String,
    pub id_strategy: IdStrategy,
}

impl Default for IndexOptions {
    fn default() -> Self {
        IndexOptions {
            driver: DEFAULT_DRIVER.to_string(),
            pragmas: DEFAULT_PRAGMAS.iter().map(|p| p.to_string()).collect(),
            table: DEFAULT_TABLE.to_string(),
            id_strategy: IdStrategy::default(),
        }
    }
}

impl IndexOptions {
    pub fn driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = driver.into();
        self
    }

    /// Replace the directive list.
    pub fn pragmas<I, S>(mut self, pragmas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pragmas = pragmas.into_iter().map(Into::into).collect();
        self
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    /// Check the options before any storage is touched.
    pub fn validate(&self) -> Result<()> {
        match self.driver.as_str() {
            "sqlite" | "sqlite3" => {}
            other => {
                return Err(HlxError::Config(format!("Unsupported driver '{other}'")));
            }
        }

        if !is_identifier(&self.table) {
            return Err(HlxError::Config(format!(
                "Invalid table name '{}'",
                self.table
            )));
        }

        Ok(())
    }
}
