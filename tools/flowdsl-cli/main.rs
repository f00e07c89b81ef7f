use clap::{Parser, ValueEnum};
use flowdsl::prelude::*;
use std::fs;
use std::io::{self, Read};
use std::time::Instant;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output shape for a parsed flow.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Compact JSON, one line
    Json,
    /// Indented JSON
    Pretty,
    /// Canonical DSL text
    Dsl,
}

/// Parse workflow flow DSL text into its structured trace representation
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// DSL text to parse. Reads stdin when neither this nor --file is given
    source: Option<String>,

    /// Read the DSL text from a file
    #[arg(short, long, conflicts_with = "source")]
    file: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    /// Extra combinator keyword, as alias=keyword (e.g. loop=iteration)
    #[arg(short, long = "alias", value_parser = parse_alias)]
    aliases: Vec<(String, String)>,

    /// Maximum combinator nesting depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_alias(s: &str) -> Result<(String, String), String> {
    let (alias, keyword) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid alias '{}'. Expected alias=keyword", s))?;
    Ok((alias.trim().to_string(), keyword.trim().to_string()))
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "flowdsl=debug"
    } else {
        "flowdsl=warn"
    };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let source = read_source(&cli);

    let mut builder = FlowParser::builder();
    for (alias, keyword) in &cli.aliases {
        builder = builder.with_keyword_alias(alias, keyword);
    }
    if let Some(depth) = cli.max_depth {
        builder = builder.with_max_depth(depth);
    }
    let parser = builder.build();
    tracing::debug!(keywords = ?parser.keywords(), "parser configured");

    let parse_start = Instant::now();
    let flow = parser
        .parse(&source)
        .unwrap_or_else(|e| exit_with_error(&e.render(source.trim_end())));
    tracing::debug!(elapsed = ?parse_start.elapsed(), "parse finished");

    let output = match cli.format {
        OutputFormat::Json => serde_json::to_string(&flow),
        OutputFormat::Pretty => serde_json::to_string_pretty(&flow),
        OutputFormat::Dsl => Ok(flow.to_string()),
    }
    .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize flow: {}", e)));

    println!("{}", output);
}

fn read_source(cli: &Cli) -> String {
    if let Some(text) = &cli.source {
        return text.clone();
    }
    if let Some(path) = &cli.file {
        return fs::read_to_string(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to read DSL file '{}': {}", path, e))
        });
    }

    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read stdin: {}", e)));
    text
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
