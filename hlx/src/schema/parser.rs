use super::types::SchemaDefinition;
use crate::error::Result;
use std::path::Path;

/// Parse a schema.yaml file and check every index in it.
pub fn parse_schema(path: &Path) -> Result<SchemaDefinition> {
    let content = std::fs::read_to_string(path)?;
    parse_schema_str(&content)
}

/// Parse a schema YAML string and check every index in it.
pub fn parse_schema_str(content: &str) -> Result<SchemaDefinition> {
    let schema: SchemaDefinition = serde_yaml::from_str(content)?;
    schema.validate()?;
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HlxError;
    use crate::schema::types::FieldType;
    use crate::IdStrategy;
    use std::io::Write;

    const SCHEMA: &str = r#"
indexes:
  notes:
    table: note_index
    id_strategy: ulid
    fields:
      - id
      - title
      - { name: views, type: integer }
  articles:
    fields: [Id, Title, Body]
"#;

    #[test]
    fn test_parse_schema_str() {
        let schema = parse_schema_str(SCHEMA).unwrap();
        assert_eq!(schema.indexes.len(), 2);

        let notes = schema.index("notes").unwrap();
        assert_eq!(notes.table_name("notes"), "note_index");
        assert_eq!(notes.fields[2].name(), "views");
        assert_eq!(notes.fields[2].field_type(), FieldType::Integer);
        assert_eq!(notes.fields[1].field_type(), FieldType::String);

        let options = notes.options("notes");
        assert_eq!(options.table, "note_index");
        assert_eq!(options.id_strategy, IdStrategy::Ulid);

        let articles = schema.index("articles").unwrap();
        assert_eq!(articles.table_name("articles"), "articles");
        assert_eq!(
            articles.field_set().unwrap().names(),
            &["id", "title", "body"]
        );
    }

    #[test]
    fn test_parse_rejects_index_without_id() {
        let err = parse_schema_str("indexes:\n  bad:\n    fields: [title]\n").unwrap_err();
        assert!(matches!(err, HlxError::Schema(_)));
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        let yaml = "indexes:\n  x:\n    fields:\n      - id\n      - { name: when, type: date }\n";
        assert!(matches!(parse_schema_str(yaml), Err(HlxError::Yaml(_))));
    }

    #[test]
    fn test_parse_schema_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SCHEMA.as_bytes()).unwrap();

        let schema = parse_schema(file.path()).unwrap();
        assert!(schema.index("notes").is_some());
        assert!(schema.index("missing").is_none());
    }
}
