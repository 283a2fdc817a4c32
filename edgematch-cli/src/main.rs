use clap::Parser;
use edgematch::io::FileSource;
use edgematch::{
    Aggregation, BankKind, Matcher, Metric, NumericMode, PipelineConfig, DEFAULT_SIDE,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "EdgeMatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum NumericConfig {
    Normalized,
    Quantized,
}

impl From<NumericConfig> for NumericMode {
    fn from(value: NumericConfig) -> Self {
        match value {
            NumericConfig::Normalized => NumericMode::Normalized,
            NumericConfig::Quantized => NumericMode::Quantized,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum BankConfig {
    Directional5,
    Directional3,
    Edge5,
}

impl From<BankConfig> for BankKind {
    fn from(value: BankConfig) -> Self {
        match value {
            BankConfig::Directional5 => BankKind::Directional5,
            BankConfig::Directional3 => BankKind::Directional3,
            BankConfig::Edge5 => BankKind::Edge5,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum AggregationConfig {
    Magnitude,
    PerDirection,
}

impl From<AggregationConfig> for Aggregation {
    fn from(value: AggregationConfig) -> Self {
        match value {
            AggregationConfig::Magnitude => Aggregation::Magnitude,
            AggregationConfig::PerDirection => Aggregation::PerDirection,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum MetricConfig {
    L1,
    L2,
}

impl From<MetricConfig> for Metric {
    fn from(value: MetricConfig) -> Self {
        match value {
            MetricConfig::L1 => Metric::L1,
            MetricConfig::L2 => Metric::L2,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct PipelineConfigJson {
    side: usize,
    numeric: NumericConfig,
    bank: BankConfig,
    aggregation: AggregationConfig,
    metric: MetricConfig,
    parallel: bool,
}

impl Default for PipelineConfigJson {
    fn default() -> Self {
        Self {
            side: DEFAULT_SIDE,
            numeric: NumericConfig::Normalized,
            bank: BankConfig::Directional5,
            aggregation: AggregationConfig::Magnitude,
            metric: MetricConfig::L1,
            parallel: false,
        }
    }
}

impl From<PipelineConfigJson> for PipelineConfig {
    fn from(value: PipelineConfigJson) -> Self {
        Self {
            side: value.side,
            numeric: value.numeric.into(),
            bank: value.bank.into(),
            aggregation: value.aggregation.into(),
            metric: value.metric.into(),
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    gallery_paths: Vec<String>,
    query_path: String,
    output_path: Option<String>,
    topk: usize,
    pipeline: PipelineConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gallery_paths: Vec::new(),
            query_path: String::new(),
            output_path: None,
            topk: 1,
            pipeline: PipelineConfigJson::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    ordinal: usize,
    label: String,
    distance: f32,
}

#[derive(Debug, Serialize)]
struct Output {
    best: Option<MatchRecord>,
    ranking: Vec<MatchRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("edgematch=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.query_path.is_empty() {
        return Err("query_path must be set in the config".into());
    }
    if config.topk == 0 {
        return Err("topk must be at least 1".into());
    }

    let source = FileSource::default();
    let matcher = Matcher::from_paths(config.pipeline.into(), &config.gallery_paths, &source)?;
    let query = matcher
        .pipeline()
        .describe_path(&source, Path::new(&config.query_path))?;

    let record = |m: edgematch::Match| MatchRecord {
        ordinal: m.ordinal(),
        label: matcher
            .gallery()
            .get(m.index)
            .map(|entry| entry.label().to_string())
            .unwrap_or_default(),
        distance: m.distance,
    };
    let best = matcher.match_descriptor(&query)?.map(record);
    let ranking = matcher
        .rank_descriptor(&query, config.topk)?
        .into_iter()
        .map(record)
        .collect();
    let output = Output { best, ranking };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
