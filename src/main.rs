#![forbid(unsafe_code)]

//! solr-engine CLI
//!
//! Index, delete, search and flush application records in Solr from the
//! command line. Records are read from JSON files in the `DynamicRecord`
//! shape: `{"class": "...", "index": "...", "key_name": "id", "fields": {...}}`.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use solr_engine::{
    logging, Config, ConfigOverrides, DynamicRecord, InMemoryModelRepository, IndexTarget,
    LogFormat, ModelClass, SearchBuilder, SearchClient, SearchEngine, SelectResult, SolrEngine,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Index and search application records in Solr
#[derive(Parser, Debug)]
#[command(name = "solr-engine", version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Solr base URL, e.g. http://localhost:8983/solr
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that an index answers its ping handler
    Ping {
        #[arg(long)]
        index: String,
    },
    /// Index records from a JSON file
    Index {
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete the records listed in a JSON file
    Delete {
        #[arg(long)]
        file: PathBuf,
    },
    /// Search an index
    Search(SearchArgs),
    /// Remove every document of one record class
    Flush {
        #[arg(long)]
        index: String,
        #[arg(long)]
        class: String,
    },
    /// Print the effective configuration
    Config,
}

#[derive(Args, Debug)]
struct SearchArgs {
    #[arg(long)]
    index: String,

    /// Query text; omit to match everything
    #[arg(default_value = "")]
    query: String,

    /// Exact-match filter as field=value, repeatable
    #[arg(long = "where", value_parser = parse_where)]
    wheres: Vec<(String, String)>,

    /// Maximum number of hits (ignored with --page)
    #[arg(long)]
    limit: Option<u32>,

    /// 1-based page number
    #[arg(long)]
    page: Option<u32>,

    #[arg(long, default_value_t = 15)]
    per_page: u32,

    /// Record file used to hydrate hits; prints ids only when absent
    #[arg(long)]
    records: Option<PathBuf>,
}

fn parse_where(raw: &str) -> std::result::Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{raw}'"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    Ok((field.to_string(), value.to_string()))
}

fn read_records(path: &Path) -> Result<Vec<DynamicRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    DynamicRecord::list_from_json(&content)
        .with_context(|| format!("failed to parse records in {}", path.display()))
}

/// Records grouped by target index; one update or delete is sent per index
fn group_by_index(records: Vec<DynamicRecord>) -> BTreeMap<String, Vec<DynamicRecord>> {
    let mut groups: BTreeMap<String, Vec<DynamicRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.searchable_as())
            .or_default()
            .push(record);
    }
    groups
}

async fn search(engine: &SolrEngine, args: SearchArgs) -> Result<()> {
    let mut builder = args
        .wheres
        .into_iter()
        .fold(SearchBuilder::new(args.index, args.query), |builder, (field, value)| {
            builder.with_where(field, Value::String(value))
        });
    if let Some(limit) = args.limit {
        builder = builder.with_limit(limit);
    }

    let results: SelectResult = match args.page {
        Some(page) => engine.paginate(&builder, args.per_page, page).await?,
        None => engine.search(&builder).await?,
    };
    println!("total: {}", engine.get_total_count(&results));

    match args.records {
        Some(path) => {
            let repository = InMemoryModelRepository::from_records(read_records(&path)?);
            let records: Vec<DynamicRecord> = engine.map(&builder, &results, &repository).await?;
            for record in records {
                println!("{}", serde_json::to_string(&record)?);
            }
        }
        None => {
            for id in engine.map_ids(&results) {
                println!("{id}");
            }
        }
    }
    Ok(())
}

async fn run(command: Command, config: &Config) -> Result<()> {
    if let Command::Config = command {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let engine = SolrEngine::from_config(&config.solr)?;

    match command {
        Command::Ping { index } => {
            let healthy = engine.client().ping(&index).await?;
            println!("{index}: {}", if healthy { "OK" } else { "NOT OK" });
        }
        Command::Index { file } => {
            for (index, records) in group_by_index(read_records(&file)?) {
                engine.update(&records).await?;
                println!("indexed {} records into {index}", records.len());
            }
        }
        Command::Delete { file } => {
            for (index, records) in group_by_index(read_records(&file)?) {
                engine.delete(&records).await?;
                println!("deleted {} records from {index}", records.len());
            }
        }
        Command::Search(args) => search(&engine, args).await?,
        Command::Flush { index, class } => {
            engine.flush(&ModelClass::new(class.clone(), index.clone())).await?;
            println!("flushed {class} from {index}");
        }
        Command::Config => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    config.apply_overrides(&ConfigOverrides {
        base_url: cli.base_url,
        timeout_secs: cli.timeout,
        log_level: cli.log_level,
        log_format: cli.json_logs.then_some(LogFormat::Json),
    });
    config.validate().context("invalid configuration")?;

    logging::init(&config.logging);
    info!("Using Solr at {}", config.solr.base_url);

    run(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_where() {
        assert_eq!(
            parse_where("status=active").unwrap(),
            ("status".to_string(), "active".to_string())
        );
        assert_eq!(
            parse_where("expr=a=b").unwrap(),
            ("expr".to_string(), "a=b".to_string())
        );
        assert!(parse_where("status").is_err());
        assert!(parse_where("=active").is_err());
    }

    #[test]
    fn test_search_args() {
        let cli = Cli::parse_from([
            "solr-engine",
            "search",
            "--index",
            "posts",
            "rust",
            "--where",
            "status=active",
            "--page",
            "2",
        ]);
        let Command::Search(args) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(args.index, "posts");
        assert_eq!(args.query, "rust");
        assert_eq!(args.wheres, vec![("status".to_string(), "active".to_string())]);
        assert_eq!(args.page, Some(2));
        assert_eq!(args.per_page, 15);
    }
}
