use clap::{Parser, Subcommand, ValueEnum};
use hlx::schema::{parse_schema, IndexDefinition, SchemaDefinition};
use hlx::{Document, Index};
use std::io::Read;
use std::path::Path;
use std::process;

/// hlx CLI - insert, fetch and search documents in a full-text index
#[derive(Parser)]
#[command(name = "hlx", version, about)]
struct Cli {
    /// Database location (`:memory:`, a path or a file:// path)
    #[arg(long, default_value = "hlx.db")]
    db: String,

    /// Schema file describing the indexes
    #[arg(long, default_value = "schema.yaml")]
    schema: String,

    /// Index to operate on; optional when the schema defines only one
    #[arg(long)]
    index: Option<String>,

    /// Directive applied before the table is created (repeatable, replaces the defaults)
    #[arg(long = "pragma")]
    pragmas: Vec<String>,

    /// Output format
    #[arg(long, default_value = "yaml")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Show the index columns
    Fields,

    /// Insert a document
    Insert {
        /// Field values (e.g. --field title="Hello world")
        #[arg(long = "field", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
        /// Read a JSON object, or an array of objects, from stdin
        #[arg(long)]
        stdin: bool,
    },

    /// Get a single document by ID
    Get {
        /// Document ID
        id: String,
    },

    /// Delete a document
    Delete {
        /// Document ID
        id: String,
    },

    /// Run a full-text query
    Search {
        /// Query in the engine's syntax, e.g. 'title: "hello world"'
        query: String,
    },

    /// Count stored documents
    Count,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("Invalid key=value pair: no '=' found in '{s}'"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("ERROR:{e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let schema = parse_schema(Path::new(&cli.schema))?;
    let (name, definition) = select_index(&schema, cli.index.as_deref())?;

    let mut options = definition.options(name);
    if !cli.pragmas.is_empty() {
        options = options.pragmas(cli.pragmas.iter());
    }
    log::debug!("Using index '{name}' in {}", cli.db);

    let index = Index::<Document>::open_with_fields(&cli.db, definition.field_set()?, options)?;

    match cli.command {
        Command::Fields => {
            let names: Vec<&str> = index.fields().iter().collect();
            print_output(&serde_json::json!(names), &cli.format)?;
        }

        Command::Insert { fields, stdin } => {
            let docs = if stdin {
                read_documents(std::io::stdin())?
            } else {
                vec![fields.into_iter().collect::<Document>()]
            };
            let ids = index.insert_map(&docs)?;
            print_output(&serde_json::json!({ "ids": ids }), &cli.format)?;
        }

        Command::Get { id } => {
            let doc = index.get(&id)?;
            print_output(&doc.to_json(), &cli.format)?;
        }

        Command::Delete { id } => {
            let deleted = index.delete(&id)?;
            print_output(
                &serde_json::json!({ "ok": true, "id": id, "deleted": deleted }),
                &cli.format,
            )?;
        }

        Command::Search { query } => {
            let docs: Vec<serde_json::Value> =
                index.search(&query)?.iter().map(Document::to_json).collect();
            print_output(&serde_json::Value::Array(docs), &cli.format)?;
        }

        Command::Count => {
            let count = index.count()?;
            print_output(&serde_json::json!({ "count": count }), &cli.format)?;
        }
    }

    Ok(())
}

fn select_index<'a>(
    schema: &'a SchemaDefinition,
    requested: Option<&str>,
) -> Result<(&'a str, &'a IndexDefinition), String> {
    match requested {
        Some(name) => schema
            .indexes
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| format!("Unknown index '{name}'")),
        None if schema.indexes.len() == 1 => schema
            .indexes
            .iter()
            .next()
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| "Schema defines no indexes".to_string()),
        None => Err(format!(
            "Schema defines {} indexes; pick one with --index",
            schema.indexes.len()
        )),
    }
}

fn read_documents(mut input: impl Read) -> Result<Vec<Document>, Box<dyn std::error::Error>> {
    let mut raw = String::new();
    input.read_to_string(&mut raw)?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;

    let docs = match &value {
        serde_json::Value::Array(items) => items
            .iter()
            .map(Document::from_json)
            .collect::<hlx::Result<Vec<_>>>()?,
        _ => vec![Document::from_json(&value)?],
    };
    Ok(docs)
}

fn print_output(
    value: &serde_json::Value,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}
