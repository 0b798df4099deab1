// Record traits - the static shape of indexed documents

use crate::error::{HlxError, Result};

/// A statically-shaped document.
///
/// `FIELDS` lists member names in declaration order and `field_values`
/// returns one text value per member in that same order. The identifier
/// member (named `id`, any case) may be left empty to have one generated
/// on insert.
///
/// Implementations are usually generated by `hlx-codegen`, but writing one by
/// hand is straightforward:
///
/// ```
/// use hlx::{FromRow, Record, Row};
///
/// #[derive(Debug, Default)]
/// struct Note {
///     id: String,
///     title: String,
/// }
///
/// impl Record for Note {
///     const FIELDS: &'static [&'static str] = &["Id", "Title"];
///
///     fn field_values(&self) -> Vec<String> {
///         vec![self.id.clone(), self.title.clone()]
///     }
/// }
///
/// impl FromRow for Note {
///     fn from_row(row: &Row) -> hlx::Result<Self> {
///         Ok(Note {
///             id: row.field("id")?,
///             title: row.field("title")?,
///         })
///     }
/// }
/// ```
pub trait Record: FromRow {
    const FIELDS: &'static [&'static str];

    fn field_values(&self) -> Vec<String>;
}

/// Reconstruct a value from a result row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self>;
}

/// Conversion between a member value and its stored text.
pub trait FieldValue: Sized {
    fn to_text(&self) -> String;

    fn from_text(text: &str) -> std::result::Result<Self, String>;
}

impl FieldValue for String {
    fn to_text(&self) -> String {
        self.clone()
    }

    fn from_text(text: &str) -> std::result::Result<Self, String> {
        Ok(text.to_string())
    }
}

impl FieldValue for bool {
    fn to_text(&self) -> String {
        self.to_string()
    }

    fn from_text(text: &str) -> std::result::Result<Self, String> {
        match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" | "" => Ok(false),
            other => Err(format!("'{other}' is not a boolean")),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_text(&self) -> String {
        match self {
            Some(v) => v.to_text(),
            None => String::new(),
        }
    }

    fn from_text(text: &str) -> std::result::Result<Self, String> {
        if text.is_empty() {
            Ok(None)
        } else {
            T::from_text(text).map(Some)
        }
    }
}

macro_rules! numeric_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn to_text(&self) -> String {
                    self.to_string()
                }

                fn from_text(text: &str) -> std::result::Result<Self, String> {
                    let text = text.trim();
                    if text.is_empty() {
                        return Ok(<$ty>::default());
                    }
                    text.parse::<$ty>().map_err(|e| format!("'{text}': {e}"))
                }
            }
        )*
    };
}

numeric_field_value!(i32, i64, u32, u64, usize, f32, f64);

/// A decoded result row: column names with their text values.
///
/// `None` stands for SQL NULL. Column lookups ignore case.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Option<String>>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<Option<String>>) -> Self {
        Row { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Text of a column, `None` when the column is absent or NULL.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .and_then(|i| self.values.get(i))
            .and_then(|v| v.as_deref())
    }

    /// Populate a member from its column. Missing and NULL columns give the
    /// member's default value.
    pub fn field<T: FieldValue + Default>(&self, name: &str) -> Result<T> {
        match self.get(name) {
            Some(text) => T::from_text(text)
                .map_err(|e| HlxError::Decode(format!("column '{name}': {e}"))),
            None => Ok(T::default()),
        }
    }

    /// Columns paired with their values, in result order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(|v| v.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Row {
        Row::new(
            vec!["id".into(), "Title".into(), "views".into(), "note".into()],
            vec![
                Some("a1".into()),
                Some("hello".into()),
                Some("42".into()),
                None,
            ],
        )
    }

    #[test]
    fn test_get_case_insensitive() {
        let row = row();
        assert_eq!(row.get("title"), Some("hello"));
        assert_eq!(row.get("TITLE"), Some("hello"));
        assert_eq!(row.get("note"), None);
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn test_field_defaults_and_parsing() {
        let row = row();
        let views: i64 = row.field("views").unwrap();
        assert_eq!(views, 42);

        let missing: String = row.field("missing").unwrap();
        assert_eq!(missing, "");

        let note: Option<String> = row.field("note").unwrap();
        assert_eq!(note, None);
    }

    #[test]
    fn test_field_parse_error_is_decode_error() {
        let row = row();
        let err = row.field::<u32>("title").unwrap_err();
        assert!(matches!(err, HlxError::Decode(_)));
        assert!(err.to_string().contains("column 'title'"));
    }

    #[test]
    fn test_bool_and_option_text() {
        assert_eq!(bool::from_text("1"), Ok(true));
        assert_eq!(bool::from_text("False"), Ok(false));
        assert!(bool::from_text("maybe").is_err());

        assert_eq!(Some(3i32).to_text(), "3");
        assert_eq!(None::<i32>.to_text(), "");
        assert_eq!(Option::<i32>::from_text(""), Ok(None));
    }
}
