//! openfema - fetch openFEMA datasets from the command line
//!
//! Counts the records matching a query, pulls them all (paginating past
//! 10,000 rows) and writes the table as CSV or JSON.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use openfema::export::{export_results, ExportFormat};
use openfema::{Dataset, FilterValue, OpenFemaClient, Query};

/// openfema - openFEMA dataset downloader
#[derive(Parser, Debug)]
#[command(name = "openfema")]
#[command(about = "Download openFEMA datasets as CSV or JSON")]
#[command(version)]
struct Args {
    /// Dataset name (e.g., HousingAssistanceOwners)
    dataset: String,

    /// Equality filter: FIELD=TEXT for strings, FIELD:=LITERAL for numbers and booleans
    #[arg(short, long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, FilterValue)>,

    /// Hand-written filter clause, used instead of --filter (e.g. '$filter=disasterNumber%20gt%204000')
    #[arg(long)]
    raw_filter: Option<String>,

    /// Fields to retrieve, comma separated
    #[arg(short, long, value_delimiter = ',')]
    select: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Output file (defaults to <export dir>/<dataset>_<timestamp>.<ext>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only print the number of matching records
    #[arg(long)]
    count_only: bool,

    /// API root to query instead of the public openFEMA host
    #[arg(long, env = "OPENFEMA_BASE_URL")]
    base_url: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => ExportFormat::Csv,
            Format::Json => ExportFormat::Json,
        }
    }
}

/// Parse `FIELD=TEXT` or `FIELD:=LITERAL`
fn parse_filter(s: &str) -> Result<(String, FilterValue), String> {
    if let Some((field, literal)) = s.split_once(":=") {
        let value = if let Ok(n) = literal.parse::<i64>() {
            FilterValue::Int(n)
        } else if let Some(n) = literal.parse::<f64>().ok().filter(|n| n.is_finite()) {
            FilterValue::Float(n)
        } else if let Ok(b) = literal.parse::<bool>() {
            FilterValue::Bool(b)
        } else {
            return Err(format!("'{}' is not a number or boolean", literal));
        };
        return Ok((field.to_string(), value));
    }

    match s.split_once('=') {
        Some((field, text)) if !field.is_empty() => Ok((field.to_string(), text.into())),
        _ => Err(format!("expected FIELD=VALUE or FIELD:=LITERAL, got '{}'", s)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (set RUST_LOG=debug to see every request)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let config = Config::load().context("Failed to load configuration")?;

    let dataset: Dataset = args.dataset.parse()?;

    let base_url = args
        .base_url
        .clone()
        .or_else(|| config.base_url.clone())
        .unwrap_or_else(|| openfema::models::DEFAULT_BASE_URL.to_string());
    let client = OpenFemaClient::with_options(base_url, config.user_agent.as_deref())
        .context("Failed to create HTTP client")?;

    let mut query = Query::new(dataset).select(args.select.iter().cloned());
    for (field, value) in args.filters {
        query = query.filter(field, value);
    }
    if let Some(raw) = args.raw_filter {
        query = query.raw_filter(raw);
    }

    let count = client
        .record_count(&query)
        .await
        .context("Failed to count matching records")?;

    if args.count_only {
        println!("{}", count);
        return Ok(());
    }

    eprintln!("Found {} records in {}", count, dataset);
    let url = query.build_url(client.base_url());
    let table = client
        .all_records(&url, dataset, count)
        .await
        .context("Failed to retrieve records")?;

    let format = ExportFormat::from(args.format);
    let path = args.output.unwrap_or_else(|| {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        config
            .export_dir()
            .join(format!("{}_{}.{}", dataset, timestamp, format.extension()))
    });

    let written = export_results(&table, format, &path)?;
    eprintln!("Exported {} rows to {}", table.len(), written);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_text() {
        assert_eq!(
            parse_filter("state=PR").unwrap(),
            ("state".to_string(), FilterValue::Text("PR".to_string()))
        );
        assert_eq!(
            parse_filter("note=a=b").unwrap(),
            ("note".to_string(), FilterValue::Text("a=b".to_string()))
        );
    }

    #[test]
    fn test_parse_filter_literals() {
        assert_eq!(
            parse_filter("disasterNumber:=4339").unwrap(),
            ("disasterNumber".to_string(), FilterValue::Int(4339))
        );
        assert_eq!(
            parse_filter("ratio:=0.5").unwrap(),
            ("ratio".to_string(), FilterValue::Float(0.5))
        );
        assert_eq!(
            parse_filter("ratio:=5.0").unwrap(),
            ("ratio".to_string(), FilterValue::Float(5.0))
        );
        assert_eq!(
            parse_filter("validRegistration:=true").unwrap(),
            ("validRegistration".to_string(), FilterValue::Bool(true))
        );
    }

    #[test]
    fn test_parse_filter_errors() {
        assert!(parse_filter("state").is_err());
        assert!(parse_filter("=PR").is_err());
        assert!(parse_filter("zip:=abc").is_err());
        assert!(parse_filter("ratio:=NaN").is_err());
        assert!(parse_filter("ratio:=inf").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "openfema",
            "HousingAssistanceRenters",
            "-f",
            "state=TX",
            "--select",
            "county,zipCode",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.dataset, "HousingAssistanceRenters");
        assert_eq!(args.filters.len(), 1);
        assert_eq!(args.select, vec!["county", "zipCode"]);
        assert!(matches!(args.format, Format::Json));
    }
}
