use hlx::{FieldType, HlxError, IdStrategy, IndexDefinition, SchemaDefinition, ID_FIELD};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::type_utils::{field_rust_type, index_struct_name, safe_field_ident};

/// Generate a record struct for every index, in name order.
pub fn generate_structs(schema: &SchemaDefinition) -> hlx::Result<TokenStream> {
    let mut tokens = TokenStream::new();
    for (index_name, index_def) in &schema.indexes {
        tokens.extend(generate_index_struct(index_name, index_def)?);
    }
    Ok(tokens)
}

/// Generate the struct, its `Record`/`FromRow` impls and its constructors.
fn generate_index_struct(index_name: &str, index_def: &IndexDefinition) -> hlx::Result<TokenStream> {
    let fields = index_def.field_set()?;
    let struct_ident = format_ident!("{}", index_struct_name(index_name));
    let table = index_def.table_name(index_name);

    let doc_comment = format!(" A document in the `{index_name}` index (table `{table}`).");

    let mut members = Vec::new();
    let mut reads = Vec::new();
    let mut writes = Vec::new();

    for (column, spec) in fields.iter().zip(&index_def.fields) {
        let field_type = spec.field_type();
        if column == ID_FIELD && field_type != FieldType::String {
            return Err(HlxError::Schema(format!(
                "index '{index_name}': the id field must be a string"
            )));
        }

        let ident = safe_field_ident(column);
        let ty = field_rust_type(field_type);
        members.push(quote! { pub #ident: #ty, });
        reads.push(quote! { #ident: row.field(#column)?, });
        writes.push(quote! { hlx::FieldValue::to_text(&self.#ident), });
    }

    let columns: Vec<&str> = fields.iter().collect();

    let strategy = match index_def.id_strategy {
        Some(IdStrategy::Uuid) => quote! { .id_strategy(hlx::IdStrategy::Uuid) },
        Some(IdStrategy::Ulid) => quote! { .id_strategy(hlx::IdStrategy::Ulid) },
        None => quote! {},
    };

    Ok(quote! {
        #[doc = #doc_comment]
        #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        pub struct #struct_ident {
            #(#members)*
        }

        impl #struct_ident {
            pub const TABLE: &'static str = #table;

            /// Open the index at `uri` with this schema's table and id strategy.
            pub fn open_index(
                uri: &str,
                options: hlx::IndexOptions,
            ) -> hlx::Result<hlx::Index<#struct_ident>> {
                hlx::Index::open(uri, options.table(Self::TABLE) #strategy)
            }

            /// Create the index on an existing backend, e.g. a shared connection.
            pub fn index_on<B: hlx::Backend>(
                backend: B,
                options: hlx::IndexOptions,
            ) -> hlx::Result<hlx::Index<#struct_ident, B>> {
                hlx::Index::with_backend(backend, options.table(Self::TABLE) #strategy)
            }
        }

        impl hlx::Record for #struct_ident {
            const FIELDS: &'static [&'static str] = &[#(#columns),*];

            fn field_values(&self) -> Vec<String> {
                vec![#(#writes)*]
            }
        }

        impl hlx::FromRow for #struct_ident {
            fn from_row(row: &hlx::Row) -> hlx::Result<Self> {
                Ok(#struct_ident {
                    #(#reads)*
                })
            }
        }
    })
}
