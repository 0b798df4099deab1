//! hlx code generation - typed index records from schema.yaml at build time.
//!
//! The main entry point is [`generate_from_schema`], which reads a schema.yaml
//! file and writes a Rust source file with one record struct per index,
//! implementing `hlx::Record` and `hlx::FromRow`. Generated structs also
//! derive serde's traits, so the crate including them needs `serde` with the
//! `derive` feature.

mod generator;
mod struct_gen;
pub mod type_utils;

use std::path::Path;

/// Generate Rust types from a schema.yaml file.
///
/// Reads the schema at `schema_path`, generates typed Rust code, and writes
/// the output to `output_path`. This is intended to be called from a `build.rs`
/// build script.
///
/// # Example
///
/// ```no_run
/// // In build.rs:
/// let out = format!("{}/generated.rs", std::env::var("OUT_DIR").unwrap());
/// hlx_codegen::generate_from_schema("schema.yaml", &out).unwrap();
/// ```
pub fn generate_from_schema(
    schema_path: &str,
    output_path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let schema = hlx::schema::parse_schema(Path::new(schema_path))?;
    let tokens = generator::generate_all(&schema)?;
    let formatted = generator::format_token_stream(&tokens);
    std::fs::write(output_path, formatted)?;
    Ok(())
}

/// Generate Rust types from a schema YAML string.
///
/// Like [`generate_from_schema`] but takes the schema content directly
/// instead of reading from a file. Useful for testing.
pub fn generate_from_schema_str(
    schema_yaml: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let schema = hlx::schema::parse_schema_str(schema_yaml)?;
    let tokens = generator::generate_all(&schema)?;
    Ok(generator::format_token_stream(&tokens))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SCHEMA: &str = r#"
indexes:
  notes:
    table: note_index
    id_strategy: ulid
    fields:
      - Id
      - Title
      - Content
      - { name: views, type: integer }
      - { name: rating, type: number }
      - { name: draft, type: boolean }

  categories:
    fields: [id, name, type]
"#;

    #[test]
    fn test_generate_from_schema_str_full() {
        let result = generate_from_schema_str(TEST_SCHEMA);
        assert!(result.is_ok(), "Generation failed: {:?}", result.err());

        let code = result.unwrap();
        assert!(
            syn::parse_file(&code).is_ok(),
            "Generated code is not valid Rust:\n{}",
            &code[..code.len().min(2000)]
        );

        assert!(code.starts_with("// Generated by hlx-codegen"));
        assert!(code.contains("pub struct Note"), "Missing Note struct");
        assert!(code.contains("pub struct Category"), "Missing Category struct");

        assert!(code.contains("pub views: i64"));
        assert!(code.contains("pub rating: f64"));
        assert!(code.contains("pub draft: bool"));
        assert!(code.contains("pub r#type: String"));

        assert!(code.contains(r#"pub const TABLE: &'static str = "note_index""#));
        assert!(code.contains(r#"pub const TABLE: &'static str = "categories""#));
        assert!(code.contains("hlx::IdStrategy::Ulid"));
        let compact: String = code.split_whitespace().collect();
        assert!(compact.contains(r#"&["id","title","content","views","rating","draft""#));
        assert!(code.contains("serde::Deserialize"));
        assert!(code.contains("impl hlx::Record for Note"));
        assert!(code.contains("impl hlx::FromRow for Category"));
        assert!(code.contains("fn open_index"));
        assert!(code.contains("fn index_on"));
    }

    #[test]
    fn test_generate_minimal_schema() {
        let schema = "indexes:\n  items:\n    fields: [id]\n";
        let code = generate_from_schema_str(schema).unwrap();
        assert!(syn::parse_file(&code).is_ok(), "Not valid Rust");
        assert!(code.contains("pub struct Item"));
        assert!(!code.contains("IdStrategy"));
    }

    #[test]
    fn test_generate_rejects_missing_id() {
        let schema = "indexes:\n  items:\n    fields: [title]\n";
        let err = generate_from_schema_str(schema).unwrap_err();
        assert!(err.to_string().contains("Id field is missing"));
    }

    #[test]
    fn test_generate_rejects_non_text_id() {
        let schema = "indexes:\n  items:\n    fields:\n      - { name: id, type: integer }\n";
        let err = generate_from_schema_str(schema).unwrap_err();
        assert!(err.to_string().contains("must be a string"));
    }

    #[test]
    fn test_generate_from_schema_writes_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let schema_path = tmp.path().join("schema.yaml");
        let output_path = tmp.path().join("generated.rs");
        std::fs::write(&schema_path, TEST_SCHEMA).unwrap();

        generate_from_schema(
            schema_path.to_str().unwrap(),
            output_path.to_str().unwrap(),
        )
        .unwrap();

        let code = std::fs::read_to_string(&output_path).unwrap();
        assert!(code.contains("pub struct Note"));
    }
}
