// Dynamic documents - untyped column/value maps

use crate::error::{HlxError, Result};
use crate::fields::ID_FIELD;
use crate::record::{FromRow, Row};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A dynamically-shaped document: column name to text value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(BTreeMap<String, String>);

impl Document {
    pub fn new() -> Self {
        Document(BTreeMap::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Value of a column, matched case-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .or_else(|| {
                self.0
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
                    .map(|(_, v)| v)
            })
            .map(String::as_str)
    }

    /// The identifier value, if the document carries one.
    pub fn id(&self) -> Option<&str> {
        self.get(ID_FIELD)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Build a document from a JSON object. Scalars are stored as their text
    /// form; nested arrays and objects are rejected.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| HlxError::Encode("Document must be a JSON object".into()))?;

        let mut doc = Document::new();
        for (k, v) in obj {
            let text = match v {
                serde_json::Value::Null => String::new(),
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                    return Err(HlxError::Encode(format!(
                        "Field '{k}' is nested; only scalar values can be indexed"
                    )));
                }
            };
            doc.insert(k.clone(), text);
        }
        Ok(doc)
    }

    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .0
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();
        serde_json::Value::Object(map)
    }
}

impl FromRow for Document {
    /// Copies every column; NULL becomes the empty string.
    fn from_row(row: &Row) -> Result<Self> {
        let mut doc = Document::new();
        for (column, value) in row.iter() {
            doc.insert(column, value.unwrap_or_default());
        }
        Ok(doc)
    }
}

impl<K, V> FromIterator<(K, V)> for Document
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Document(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<BTreeMap<String, String>> for Document {
    fn from(map: BTreeMap<String, String>) -> Self {
        Document(map)
    }
}

impl From<Document> for BTreeMap<String, String> {
    fn from(doc: Document) -> Self {
        doc.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_lookup() {
        let doc = Document::new()
            .with("name", "greeting")
            .with("Content", "hello world");
        assert_eq!(doc.get("name"), Some("greeting"));
        assert_eq!(doc.get("content"), Some("hello world"));
        assert_eq!(doc.id(), None);
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_from_row_converts_null() {
        let row = Row::new(
            vec!["id".into(), "name".into()],
            vec![Some("x".into()), None],
        );
        let doc = Document::from_row(&row).unwrap();
        assert_eq!(doc.id(), Some("x"));
        assert_eq!(doc.get("name"), Some(""));
    }

    #[test]
    fn test_from_json_scalars() {
        let json = serde_json::json!({ "name": "a", "views": 3, "draft": false, "gone": null });
        let doc = Document::from_json(&json).unwrap();
        assert_eq!(doc.get("views"), Some("3"));
        assert_eq!(doc.get("draft"), Some("false"));
        assert_eq!(doc.get("gone"), Some(""));
        assert_eq!(doc.to_json()["name"], "a");
    }

    #[test]
    fn test_from_json_rejects_nested() {
        let json = serde_json::json!({ "tags": ["a", "b"] });
        assert!(matches!(
            Document::from_json(&json),
            Err(HlxError::Encode(_))
        ));
        assert!(Document::from_json(&serde_json::json!("text")).is_err());
    }

    #[test]
    fn test_serializes_as_map() {
        let doc: Document = [("id", "1"), ("name", "x")].into_iter().collect();
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"id":"1","name":"x"}"#);
    }
}
