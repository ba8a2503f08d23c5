//! Tabcodec CLI - decode, encode, merge and sort delimited text
//!
//! # Commands
//!
//! ```bash
//! tabcodec parse input.csv                         # CSV → JSON records
//! tabcodec encode records.json --headers id,name   # JSON records → CSV
//! tabcodec merge base.csv updates.csv              # Upsert updates into base by id
//! tabcodec sort input.csv --key id                 # Stable type-aware sort
//! tabcodec detect input.csv                        # Show delimiter and header
//! ```
//!
//! Defaults come from `TABCODEC_*` environment variables (see `config`);
//! flags override them. Progress goes to stderr, data to stdout or `-o`.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use tabcodec::error::CliResult;
use tabcodec::models::display_char;
use tabcodec::{
    decode_bytes, encode, merge, records_from_json, sort, CliError, CodecConfig, Delimiter,
    EncodeOptions, Newline, Table,
};

#[derive(Parser)]
#[command(name = "tabcodec")]
#[command(about = "Decode, encode, merge and sort delimited text", long_about = None)]
struct Cli {
    #[command(flatten)]
    codec: CodecArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Flags overriding the environment configuration.
#[derive(clap::Args)]
struct CodecArgs {
    /// Delimiter: auto, a single character, or \t
    #[arg(short, long, global = true)]
    delimiter: Option<Delimiter>,

    /// Do not write a byte-order mark
    #[arg(long, global = true)]
    no_bom: bool,

    /// Write \r\n line endings
    #[arg(long, global = true)]
    crlf: bool,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a delimited file and output JSON records
    Parse {
        /// Input file
        input: PathBuf,
    },

    /// Encode a JSON array of records as delimited text
    Encode {
        /// Input JSON file (array of objects)
        input: PathBuf,

        /// Column order, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        headers: Vec<String>,
    },

    /// Merge an update file into a base file by identifier
    Merge {
        /// Base file
        base: PathBuf,

        /// Update file
        updates: PathBuf,

        /// Identifier field (default: TABCODEC_ID_FIELD or "id")
        #[arg(long)]
        id_field: Option<String>,

        /// Output column order (default: base header)
        #[arg(long, value_delimiter = ',')]
        headers: Vec<String>,
    },

    /// Sort a delimited file by one field
    Sort {
        /// Input file
        input: PathBuf,

        /// Field to sort by
        #[arg(short, long)]
        key: String,

        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Show the detected delimiter and header of a file
    Detect {
        /// Input file
        input: PathBuf,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config = resolve_config(&cli.codec)?;
    let output = cli.codec.output.as_deref();

    match cli.command {
        Commands::Parse { input } => cmd_parse(&input, &config, output),
        Commands::Encode { input, headers } => cmd_encode(&input, &headers, &config, output),
        Commands::Merge {
            base,
            updates,
            id_field,
            headers,
        } => cmd_merge(&base, &updates, id_field.as_deref(), &headers, &config, output),
        Commands::Sort { input, key, desc } => cmd_sort(&input, &key, desc, &config, output),
        Commands::Detect { input } => cmd_detect(&input, &config),
    }
}

fn resolve_config(args: &CodecArgs) -> CliResult<CodecConfig> {
    let mut config = CodecConfig::from_env()?;

    if let Some(delimiter) = args.delimiter {
        config.delimiter = delimiter;
    }
    if args.no_bom {
        config.include_bom = false;
    }
    if args.crlf {
        config.newline = Newline::Crlf;
    }

    Ok(config)
}

fn read_table(input: &Path, config: &CodecConfig) -> CliResult<Table> {
    let bytes = fs::read(input)?;
    let table = decode_bytes(&bytes, config.delimiter)?;

    eprintln!(
        "   Delimiter: '{}'{}",
        display_char(table.delimiter),
        if config.delimiter == Delimiter::Auto { " (auto-detected)" } else { "" }
    );
    eprintln!("   Columns: {}", table.header.join(", "));

    Ok(table)
}

/// Encoder options for a file that was decoded with `table.delimiter`.
///
/// An auto delimiter re-encodes with whatever the input used.
fn options_for(table: &Table, config: &CodecConfig) -> EncodeOptions {
    let mut options = config.encode_options();
    if config.delimiter == Delimiter::Auto {
        options.delimiter = table.delimiter;
    }
    options
}

fn cmd_parse(input: &Path, config: &CodecConfig, output: Option<&Path>) -> CliResult<()> {
    eprintln!("📄 Parsing: {}", input.display());

    let table = read_table(input, config)?;
    eprintln!("✅ Parsed {} records", table.records.len());

    let json = serde_json::to_string_pretty(&table.records)?;
    write_output(&json, output)
}

fn cmd_encode(
    input: &Path,
    headers: &[String],
    config: &CodecConfig,
    output: Option<&Path>,
) -> CliResult<()> {
    eprintln!("📄 Encoding: {}", input.display());

    let content = fs::read_to_string(input)?;
    let records = records_from_json(&content)?;
    eprintln!("   {} records, {} columns", records.len(), headers.len());

    let text = encode(&records, headers, &config.encode_options());
    write_output(&text, output)
}

fn cmd_merge(
    base: &Path,
    updates: &Path,
    id_field: Option<&str>,
    headers: &[String],
    config: &CodecConfig,
    output: Option<&Path>,
) -> CliResult<()> {
    let id_field = id_field.unwrap_or(&config.id_field);

    eprintln!("📄 Base: {}", base.display());
    let base_table = read_table(base, config)?;
    eprintln!("📄 Updates: {}", updates.display());
    let update_table = read_table(updates, config)?;

    let merged = merge(&base_table.records, &update_table.records, id_field)?;
    eprintln!(
        "🔀 Merged {} + {} records into {} (by '{}')",
        base_table.records.len(),
        update_table.records.len(),
        merged.len(),
        id_field
    );

    let headers = if headers.is_empty() {
        base_table.header.as_slice()
    } else {
        headers
    };
    if headers.is_empty() {
        return Err(CliError::Usage(
            "base file has no header; pass --headers".to_string(),
        ));
    }

    let text = encode(&merged, headers, &options_for(&base_table, config));
    write_output(&text, output)
}

fn cmd_sort(
    input: &Path,
    key: &str,
    descending: bool,
    config: &CodecConfig,
    output: Option<&Path>,
) -> CliResult<()> {
    eprintln!("📄 Sorting: {}", input.display());

    let table = read_table(input, config)?;
    let sorted = sort(&table.records, key, descending)?;
    eprintln!(
        "↕️  Sorted {} records by '{}' ({})",
        sorted.len(),
        key,
        if descending { "descending" } else { "ascending" }
    );

    let text = encode(&sorted, &table.header, &options_for(&table, config));
    write_output(&text, output)
}

fn cmd_detect(input: &Path, config: &CodecConfig) -> CliResult<()> {
    eprintln!("🔎 Detecting: {}", input.display());

    let table = read_table(input, config)?;
    println!("delimiter: {}", display_char(table.delimiter));
    println!("columns: {}", table.header.len());
    println!("header: {}", table.header.join(", "));
    println!("records: {}", table.records.len());
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> CliResult<()> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
