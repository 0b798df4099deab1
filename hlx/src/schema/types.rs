use crate::error::{HlxError, Result};
use crate::fields::FieldSet;
use crate::options::{IdStrategy, IndexOptions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level schema definition parsed from schema.yaml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDefinition {
    #[serde(default)]
    pub indexes: BTreeMap<String, IndexDefinition>,
}

impl SchemaDefinition {
    pub fn index(&self, name: &str) -> Option<&IndexDefinition> {
        self.indexes.get(name)
    }

    /// Every index must infer to a valid field set.
    pub fn validate(&self) -> Result<()> {
        for (name, index) in &self.indexes {
            index.field_set().map_err(|e| match e {
                HlxError::Schema(msg) => HlxError::Schema(format!("index '{name}': {msg}")),
                other => other,
            })?;
        }
        Ok(())
    }
}

/// Definition of a single index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Table name; the index name is used when absent.
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub id_strategy: Option<IdStrategy>,
    pub fields: Vec<FieldSpec>,
}

impl IndexDefinition {
    pub fn table_name<'a>(&'a self, index_name: &'a str) -> &'a str {
        self.table.as_deref().unwrap_or(index_name)
    }

    pub fn field_set(&self) -> Result<FieldSet> {
        FieldSet::infer(self.fields.iter().map(FieldSpec::name))
    }

    /// Default options with this index's table and id strategy applied.
    pub fn options(&self, index_name: &str) -> IndexOptions {
        let options = IndexOptions::default().table(self.table_name(index_name));
        match self.id_strategy {
            Some(strategy) => options.id_strategy(strategy),
            None => options,
        }
    }
}

/// A field given either as a bare name or as `{ name, type }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldSpec {
    Name(String),
    Typed {
        name: String,
        #[serde(rename = "type", default)]
        field_type: FieldType,
    },
}

impl FieldSpec {
    pub fn name(&self) -> &str {
        match self {
            FieldSpec::Name(name) => name,
            FieldSpec::Typed { name, .. } => name,
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            FieldSpec::Name(_) => FieldType::String,
            FieldSpec::Typed { field_type, .. } => *field_type,
        }
    }
}

/// Member type of a generated record. Everything is stored as text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    String,
    Integer,
    Number,
    Boolean,
}
