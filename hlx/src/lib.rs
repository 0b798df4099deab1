pub mod backend;
pub mod codec;
pub mod document;
pub mod error;
pub mod fields;
pub mod index;
pub mod options;
pub mod record;
pub mod schema;
pub mod storage;

pub use backend::{Backend, QueryResult, Value};
pub use document::Document;
pub use error::{HlxError, Operation, Result};
pub use fields::{FieldSet, ID_FIELD};
pub use index::Index;
pub use options::{IdStrategy, IndexOptions};
pub use record::{FieldValue, FromRow, Record, Row};
pub use schema::{FieldSpec, FieldType, IndexDefinition, SchemaDefinition};
