//! Row codec: records and documents to column/value lists, and result rows
//! back to records.
//!
//! # Write direction
//!
//! A static [`Record`] yields one value per field in declaration order. A
//! dynamic [`Document`] yields only the columns it carries, identifier first,
//! the rest in field-set order. In both cases an empty or missing identifier
//! is replaced with a freshly generated one, and every call is independent of
//! the previous one.
//!
//! # Read direction
//!
//! Raw engine values are turned into text (`NULL` stays distinguishable as
//! `None`) and wrapped in a [`Row`], which [`FromRow`] implementations read
//! by column name.

use crate::backend::Value;
use crate::document::Document;
use crate::error::{HlxError, Result};
use crate::fields::FieldSet;
use crate::options::IdStrategy;
use crate::record::{FromRow, Record, Row};

/// Column names and values ready for binding into an insert statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub columns: Vec<String>,
    pub values: Vec<String>,
    /// Identifier written for this row, caller-supplied or generated.
    pub id: String,
}

impl Encoded {
    pub fn column_refs(&self) -> Vec<&str> {
        self.columns.iter().map(String::as_str).collect()
    }

    pub fn value_refs(&self) -> Vec<&str> {
        self.values.iter().map(String::as_str).collect()
    }
}

/// Encode a static record against its field set.
pub fn encode_record<R: Record>(
    fields: &FieldSet,
    record: &R,
    ids: IdStrategy,
) -> Result<Encoded> {
    let mut values = record.field_values();
    if values.len() != fields.len() {
        return Err(HlxError::Encode(format!(
            "Record has {} values but the index has {} fields",
            values.len(),
            fields.len()
        )));
    }

    let id_slot = &mut values[fields.id_position()];
    if id_slot.is_empty() {
        *id_slot = ids.generate();
    }
    let id = id_slot.clone();

    Ok(Encoded {
        columns: fields.names().to_vec(),
        values,
        id,
    })
}

/// Encode a dynamic document. Only present columns are emitted; keys must
/// name fields of the index.
pub fn encode_document(fields: &FieldSet, doc: &Document, ids: IdStrategy) -> Result<Encoded> {
    let mut slots: Vec<Option<&str>> = vec![None; fields.len()];

    for (key, value) in doc.iter() {
        let pos = fields.position(key).ok_or_else(|| {
            HlxError::Encode(format!("Unknown field '{key}' for this index"))
        })?;
        if slots[pos].is_some() {
            return Err(HlxError::Encode(format!(
                "Field '{}' given more than once",
                fields.names()[pos]
            )));
        }
        slots[pos] = Some(value);
    }

    let id = match slots[fields.id_position()] {
        Some(given) if !given.is_empty() => given.to_string(),
        _ => ids.generate(),
    };

    let mut columns = vec![fields.names()[fields.id_position()].clone()];
    let mut values = vec![id.clone()];
    for (pos, slot) in slots.into_iter().enumerate() {
        if pos == fields.id_position() {
            continue;
        }
        if let Some(value) = slot {
            columns.push(fields.names()[pos].clone());
            values.push(value.to_string());
        }
    }

    Ok(Encoded {
        columns,
        values,
        id,
    })
}

/// Text form of a raw engine value; `None` for NULL.
pub fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Integer(n) => Some(n.to_string()),
        Value::Real(f) => Some(f.to_string()),
        Value::Text(s) => Some(s),
        Value::Blob(b) => Some(String::from_utf8_lossy(&b).into_owned()),
    }
}

/// Decode one result row into `T`.
pub fn decode<T: FromRow>(columns: &[String], raw: Vec<Value>) -> Result<T> {
    if raw.len() != columns.len() {
        return Err(HlxError::Decode(format!(
            "Row has {} values for {} columns",
            raw.len(),
            columns.len()
        )));
    }
    let values = raw.into_iter().map(value_to_text).collect();
    T::from_row(&Row::new(columns.to_vec(), values))
}
