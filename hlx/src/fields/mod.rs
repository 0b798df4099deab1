// Schema inference - ordered, normalized column names for an index

use crate::error::{HlxError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Name of the mandatory identifier column.
pub const ID_FIELD: &str = "id";

/// Ordered, lowercase column names of an index. Always contains `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    names: Vec<String>,
    id_position: usize,
}

impl FieldSet {
    /// Infer a field set from declared field names, keeping declaration order.
    ///
    /// Names are lowercased. Fails when no name resolves to `id`, when two
    /// names collide after lowercasing, or when a name is not a plain SQL
    /// identifier.
    pub fn infer<I, S>(declared: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = Vec::new();
        let mut id_position = None;

        for name in declared {
            let normalized = name.as_ref().to_lowercase();
            if !is_identifier(&normalized) {
                return Err(HlxError::Schema(format!(
                    "Invalid field name '{}'",
                    name.as_ref()
                )));
            }
            if names.contains(&normalized) {
                return Err(HlxError::Schema(format!(
                    "Duplicate field '{normalized}'"
                )));
            }
            if normalized == ID_FIELD {
                id_position = Some(names.len());
            }
            names.push(normalized);
        }

        let id_position =
            id_position.ok_or_else(|| HlxError::Schema("Id field is missing".into()))?;

        Ok(FieldSet { names, id_position })
    }

    /// Field set for a dynamic document type declared by its content columns.
    /// The identifier column is implied and prepended when not declared.
    pub fn dynamic<I, S>(declared: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let declared: Vec<String> = declared
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();

        if declared.iter().any(|n| n.eq_ignore_ascii_case(ID_FIELD)) {
            Self::infer(declared)
        } else {
            Self::infer(std::iter::once(ID_FIELD.to_string()).chain(declared))
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Index of the identifier column.
    pub fn id_position(&self) -> usize {
        self.id_position
    }

    /// Position of a column, matched case-insensitively.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n.eq_ignore_ascii_case(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a FieldSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

/// Whether `name` is a plain identifier (letters, digits, underscore). Keywords
/// pass; statements quote every name they splice in.
pub fn is_identifier(name: &str) -> bool {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    IDENT
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"))
        .is_match(name)
}
