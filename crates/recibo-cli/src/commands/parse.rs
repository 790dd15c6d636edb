//! Parse command - extract purchase records from a single receipt.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use recibo_core::{
    Categorizer, Category, ExtractionStrategy, ParseReport, ParserConfig, PurchaseLine,
    Receipt, ReceiptParser, ReceiptPipeline,
};

use super::config::load_config;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input text file, or "-" to read from stdin
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Extraction strategy (overrides the config)
    #[arg(short, long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Add a product category to each record
    #[arg(long)]
    categorize: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text receipt summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum StrategyArg {
    /// Delimited when the column header is present, positional otherwise
    Auto,
    /// Pipe-separated columns
    Delimited,
    /// Tokens anchored on the currency marker
    Positional,
}

impl From<StrategyArg> for ExtractionStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Auto => ExtractionStrategy::Auto,
            StrategyArg::Delimited => ExtractionStrategy::Delimited,
            StrategyArg::Positional => ExtractionStrategy::Positional,
        }
    }
}

/// A record as written out, optionally tagged with its category.
#[derive(Serialize)]
struct OutputRecord<'a> {
    #[serde(flatten)]
    line: &'a PurchaseLine,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<Category>,
}

pub fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let text = read_input(&args.input)?;
    info!("Parsing receipt from {}", args.input);

    let pipeline = build_pipeline(&config, args.strategy.map(Into::into))?;
    let report = pipeline
        .parse(&text)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", args.input, e))?;

    report_skipped(&report);

    let categorizer = args.categorize.then(|| pipeline.categorizer());
    let output = format_lines(&report.lines, args.format, categorizer)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!(
        "{} records from {} strategy",
        report.lines.len(),
        report.strategy
    );

    Ok(())
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    let path = PathBuf::from(input);
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    Ok(fs::read_to_string(&path)?)
}

/// Build a pipeline from configuration, with an optional strategy override.
pub fn build_pipeline(
    config: &ParserConfig,
    strategy: Option<ExtractionStrategy>,
) -> anyhow::Result<ReceiptPipeline> {
    let pipeline = ReceiptPipeline::from_config(config)?;
    Ok(match strategy {
        Some(strategy) => pipeline.with_strategy(strategy),
        None => pipeline,
    })
}

fn report_skipped(report: &ParseReport) {
    for row in &report.skipped {
        eprintln!(
            "{} Skipped line {}: {}",
            style("⚠").yellow(),
            row.line_number,
            row.error
        );
    }
}

/// Render parsed records in the requested format.
pub fn format_lines(
    lines: &[PurchaseLine],
    format: OutputFormat,
    categorizer: Option<&Categorizer>,
) -> anyhow::Result<String> {
    let records: Vec<OutputRecord<'_>> = lines
        .iter()
        .map(|line| OutputRecord {
            line,
            category: categorizer.map(|c| c.categorize(&line.product_name)),
        })
        .collect();

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&records)?),
        OutputFormat::Csv => format_csv(&records, categorizer.is_some()),
        OutputFormat::Text => {
            let receipt = Receipt::from_lines(lines.to_vec())?;
            let mut output = receipt.summary();
            if categorizer.is_some() {
                output.push_str("\nCategorias:\n");
                for record in &records {
                    if let Some(category) = record.category {
                        output.push_str(&format!("  {}: {}\n", record.line.product_name, category));
                    }
                }
            }
            Ok(output)
        }
    }
}

fn format_csv(records: &[OutputRecord<'_>], with_category: bool) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec![
        "product_name",
        "unit_price",
        "quantity",
        "purchase_date",
        "store",
        "line_total",
    ];
    if with_category {
        header.push("category");
    }
    wtr.write_record(&header)?;

    for record in records {
        let line = record.line;
        let mut row = vec![
            line.product_name.clone(),
            line.unit_price.to_string(),
            line.quantity.to_string(),
            line.purchase_date.to_string(),
            line.store.clone(),
            line.line_total().map(|total| total.to_string()).unwrap_or_default(),
        ];
        if let Some(category) = record.category {
            row.push(category.to_string());
        }
        wtr.write_record(&row)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}
