use heck::ToPascalCase;
use hlx::FieldType;
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

/// Convert an index name to its singular PascalCase struct name.
/// e.g. "notes" -> "Note", "categories" -> "Category", "blog_posts" -> "BlogPost"
pub fn index_struct_name(index_name: &str) -> String {
    singularize(index_name).to_pascal_case()
}

/// Rust type a column is decoded into.
pub fn field_rust_type(field_type: FieldType) -> TokenStream {
    match field_type {
        FieldType::String => quote! { String },
        FieldType::Integer => quote! { i64 },
        FieldType::Number => quote! { f64 },
        FieldType::Boolean => quote! { bool },
    }
}

/// Naive singularization of English words.
pub fn singularize(word: &str) -> String {
    let w = word.to_lowercase();
    if w.ends_with("ies") {
        format!("{}y", &w[..w.len() - 3])
    } else if w.ends_with("ses") || w.ends_with("xes") || w.ends_with("zes") {
        w[..w.len() - 2].to_string()
    } else if w.ends_with('s') && !w.ends_with("ss") {
        w[..w.len() - 1].to_string()
    } else {
        w
    }
}

/// Member identifier for a column name. Keywords get raw identifier syntax;
/// the few that cannot be raw get a trailing underscore.
pub fn safe_field_ident(name: &str) -> Ident {
    match name {
        "self" | "super" | "crate" => format_ident!("{}_", name),
        "type" | "struct" | "enum" | "fn" | "let" | "mut" | "ref" | "mod" | "use" | "pub"
        | "impl" | "trait" | "for" | "loop" | "while" | "if" | "else" | "match" | "return"
        | "break" | "continue" | "as" | "in" | "where" | "async" | "await" | "dyn" | "move"
        | "static" | "const" | "unsafe" | "extern" | "true" | "false" | "abstract"
        | "become" | "box" | "do" | "final" | "macro" | "override" | "priv" | "typeof"
        | "unsized" | "virtual" | "yield" | "try" => format_ident!("r#{}", name),
        _ => format_ident!("{}", name),
    }
}
