use hlx::SchemaDefinition;
use proc_macro2::TokenStream;

use crate::struct_gen::generate_structs;

const HEADER: &str = "// Generated by hlx-codegen from schema.yaml. Do not edit.\n\n";

/// Generate all code for a schema.
pub fn generate_all(schema: &SchemaDefinition) -> hlx::Result<TokenStream> {
    generate_structs(schema)
}

/// Pretty-print generated tokens, falling back to the raw token string when
/// they do not parse as a file.
pub fn format_token_stream(tokens: &TokenStream) -> String {
    let body = match syn::parse2::<syn::File>(tokens.clone()) {
        Ok(file) => prettyplease::unparse(&file),
        Err(_) => tokens.to_string(),
    };
    format!("{HEADER}{body}")
}
