//! Binary entry point for acopio.
//!
//! This binary provides the CLI interface for the intake catalog.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use acopio::config::{AcopioConfig, default_config_path};
use acopio::models::{MovementType, Product, ProductDraft, ProductMetadata, Symbology};
use acopio::observability;
use acopio::services::deduplication::{DuplicateDetector, MergeChoices, suggest_merge};
use acopio::services::{
    LookupOutcome, MovementRequest, RegistrationService, Resolution, ScanHistory, StockService,
    Submission,
};
use acopio::storage::{JsonFileStore, ProductStore};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Acopio - inventory intake with duplicate detection.
#[derive(Parser)]
#[command(name = "acopio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Check a product against the catalog without registering it.
    Check {
        #[command(flatten)]
        product: ProductArgs,
    },

    /// Register a product, resolving duplicates as instructed.
    Register {
        #[command(flatten)]
        product: ProductArgs,

        /// What to do when a duplicate is found.
        #[arg(long, value_enum, default_value = "cancel")]
        on_duplicate: OnDuplicate,
    },

    /// Look up a barcode.
    Lookup {
        /// Barcode to look up.
        barcode: String,
    },

    /// Record a scanned barcode in the recent scans and look it up.
    Scan {
        /// Decoded barcode.
        code: String,

        /// Symbology reported by the reader (ean13, upca, code128, qr, ...).
        #[arg(short, long, default_value = "unknown")]
        symbology: String,
    },

    /// Show the recent scans, newest first.
    History {
        /// Forget every recorded scan.
        #[arg(long)]
        clear: bool,
    },

    /// List the catalog.
    List {
        /// Output format.
        #[arg(short, long, value_enum, default_value = "table")]
        format: ListFormat,
    },

    /// Record a stock movement.
    Movement {
        /// Product barcode.
        barcode: String,

        /// Movement type (inbound, outbound, adjustment, shrinkage).
        #[arg(value_parser = parse_movement_type)]
        movement_type: MovementType,

        /// Units moved.
        quantity: u32,

        /// Free-text notes.
        #[arg(long)]
        notes: Option<String>,

        /// Reason code.
        #[arg(long)]
        reason: Option<String>,
    },

    /// Show the suggested merge of two catalog entries.
    MergePreview {
        /// Barcode of the record to keep.
        kept: String,

        /// Barcode of the record folded into it.
        incoming: String,
    },

    /// Show the effective configuration.
    Config,
}

/// Product fields shared by `check` and `register`.
#[derive(Args)]
struct ProductArgs {
    /// Barcode.
    #[arg(short, long)]
    barcode: Option<String>,

    /// Product name.
    #[arg(short, long)]
    name: Option<String>,

    /// Description.
    #[arg(short, long)]
    description: Option<String>,

    /// Category.
    #[arg(long)]
    category: Option<String>,

    /// Initial quantity.
    #[arg(short, long)]
    quantity: Option<u32>,

    /// Brand.
    #[arg(long)]
    brand: Option<String>,

    /// Package size.
    #[arg(long)]
    size: Option<String>,

    /// Net weight.
    #[arg(long)]
    weight: Option<String>,

    /// Unit of measure.
    #[arg(long)]
    unit: Option<String>,
}

impl ProductArgs {
    fn into_draft(self) -> ProductDraft {
        let metadata = ProductMetadata {
            brand: self.brand,
            size: self.size,
            weight: self.weight,
            unit: self.unit,
        };
        ProductDraft {
            barcode: self.barcode,
            name: self.name,
            description: self.description,
            category: self.category,
            quantity: self.quantity,
            status: None,
            metadata: (!metadata.is_empty()).then_some(metadata),
        }
    }
}

/// Resolution applied when `register` finds a duplicate.
#[derive(Clone, Copy, ValueEnum)]
enum OnDuplicate {
    /// Discard the new record.
    Cancel,
    /// Fold the new record into the existing one using the suggestion.
    Merge,
    /// Store both records.
    KeepBoth,
}

/// Output format for `list`.
#[derive(Clone, Copy, ValueEnum)]
enum ListFormat {
    /// Aligned columns.
    Table,
    /// Pretty JSON array.
    Json,
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init(&config.logging.clone().with_verbose(cli.verbose)) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(command: Commands, config: AcopioConfig) -> CmdResult {
    match command {
        Commands::Check { product } => cmd_check(&config, product.into_draft()),
        Commands::Register {
            product,
            on_duplicate,
        } => cmd_register(&config, product.into_draft(), on_duplicate),
        Commands::Lookup { barcode } => cmd_lookup(&config, &barcode),
        Commands::Scan { code, symbology } => {
            cmd_scan(&config, &code, Symbology::parse(&symbology))
        },
        Commands::History { clear } => cmd_history(&config, clear),
        Commands::List { format } => cmd_list(&config, format),
        Commands::Movement {
            barcode,
            movement_type,
            quantity,
            notes,
            reason,
        } => {
            let mut request = MovementRequest::new(barcode, movement_type, quantity);
            request.notes = notes;
            request.reason = reason;
            cmd_movement(&config, request)
        },
        Commands::MergePreview { kept, incoming } => cmd_merge_preview(&config, &kept, &incoming),
        Commands::Config => cmd_config(&config),
    }
}

/// Loads configuration.
fn load_config(path: Option<&str>) -> Result<AcopioConfig, Box<dyn std::error::Error>> {
    if let Some(config_path) = path {
        return AcopioConfig::load_from_file(Path::new(config_path)).map_err(Into::into);
    }

    if let Ok(config_path) = std::env::var("ACOPIO_CONFIG_PATH") {
        if !config_path.trim().is_empty() {
            return AcopioConfig::load_from_file(Path::new(&config_path)).map_err(Into::into);
        }
    }

    let config = AcopioConfig::load_default();
    config.validate()?;
    Ok(config)
}

fn parse_movement_type(s: &str) -> Result<MovementType, String> {
    MovementType::parse(s).ok_or_else(|| {
        format!("unknown movement type '{s}' (expected inbound, outbound, adjustment or shrinkage)")
    })
}

fn open_store(config: &AcopioConfig) -> Result<JsonFileStore, Box<dyn std::error::Error>> {
    Ok(JsonFileStore::with_create(&config.data_dir)?)
}

fn print_json<T: Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Check command.
fn cmd_check(config: &AcopioConfig, draft: ProductDraft) -> CmdResult {
    let store = open_store(config)?;
    let catalog = store.get_all_products()?;
    let result = DuplicateDetector::new(config.dedup).check(&draft, &catalog);
    print_json(&result)
}

/// Register command.
fn cmd_register(
    config: &AcopioConfig,
    draft: ProductDraft,
    on_duplicate: OnDuplicate,
) -> CmdResult {
    let store = open_store(config)?;
    let mut service =
        RegistrationService::new(store).with_detector(DuplicateDetector::new(config.dedup));

    match service.submit(draft)? {
        Submission::Registered(product) => {
            println!("Registered {} ({})", product.name, product.barcode);
            Ok(())
        },
        Submission::Duplicate(pending) => {
            eprintln!("Duplicate detected: {}", pending.check.reason);
            print_json(&pending)?;

            let resolution = match on_duplicate {
                OnDuplicate::Cancel => Resolution::Cancel,
                OnDuplicate::Merge => Resolution::Merge(MergeChoices::new()),
                OnDuplicate::KeepBoth => Resolution::KeepBoth,
            };
            let outcome = service.resolve(&pending, &resolution)?;
            print_json(&outcome)
        },
    }
}

/// Lookup command.
fn cmd_lookup(config: &AcopioConfig, barcode: &str) -> CmdResult {
    let service = RegistrationService::new(open_store(config)?);
    match service.lookup(barcode)? {
        LookupOutcome::Found(product) => print_json(&product),
        LookupOutcome::NotFound => {
            println!("No product with barcode {barcode}; register it with `acopio register`.");
            Ok(())
        },
    }
}

/// Scan command.
fn cmd_scan(config: &AcopioConfig, code: &str, symbology: Symbology) -> CmdResult {
    let code = code.trim();
    if code.is_empty() {
        return Err("scanned code is empty".into());
    }

    let store = open_store(config)?;
    let mut history = ScanHistory::from_records(config.scan_history_limit, store.load_scans()?);
    history.record(code, symbology);
    store.save_scans(&history.entries().cloned().collect::<Vec<_>>())?;

    cmd_lookup(config, code)
}

/// History command.
fn cmd_history(config: &AcopioConfig, clear: bool) -> CmdResult {
    let store = open_store(config)?;
    if clear {
        store.save_scans(&[])?;
        println!("Scan history cleared");
        return Ok(());
    }

    let history = ScanHistory::from_records(config.scan_history_limit, store.load_scans()?);
    println!("{}", history.export_json()?);
    Ok(())
}

/// List command.
fn cmd_list(config: &AcopioConfig, format: ListFormat) -> CmdResult {
    let products = open_store(config)?.get_all_products()?;

    match format {
        ListFormat::Json => print_json(&products),
        ListFormat::Table => {
            println!("{:<16} {:<32} {:>8} {:<8}", "BARCODE", "NAME", "QTY", "STATUS");
            for product in &products {
                println!(
                    "{:<16} {:<32} {:>8} {:<8}",
                    product.barcode,
                    truncate(&product.name, 32),
                    product.quantity,
                    product.status
                );
            }
            println!();
            println!("{} product(s)", products.len());
            Ok(())
        },
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Movement command.
fn cmd_movement(config: &AcopioConfig, request: MovementRequest) -> CmdResult {
    let mut service = StockService::new(open_store(config)?, config.operator.clone());
    let (product, movement) = service.record(request)?;
    println!(
        "{} {} x{} -> {} now has {}",
        movement.movement_type, product.barcode, movement.quantity, product.name, product.quantity
    );
    Ok(())
}

/// Merge preview command.
fn cmd_merge_preview(config: &AcopioConfig, kept: &str, incoming: &str) -> CmdResult {
    let store = open_store(config)?;
    let find = |barcode: &str| -> Result<Product, Box<dyn std::error::Error>> {
        store
            .find_by_barcode(barcode)?
            .ok_or_else(|| format!("no product with barcode {barcode}").into())
    };
    let suggestion = suggest_merge(&find(kept)?, &find(incoming)?);
    print_json(&suggestion)
}

/// Config command.
fn cmd_config(config: &AcopioConfig) -> CmdResult {
    println!("Current Configuration");
    println!("=====================");
    println!();
    println!(
        "Default Config Path: {}",
        default_config_path().map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
    );
    println!("Data Directory: {}", config.data_dir.display());
    println!("Operator: {}", config.operator);
    println!("Scan History Limit: {}", config.scan_history_limit);
    println!();
    println!("Deduplication:");
    println!("  Threshold: {}", config.dedup.threshold);
    println!("  Weight (name): {}", config.dedup.weights.name);
    println!("  Weight (description): {}", config.dedup.weights.description);
    println!("  Weight (metadata): {}", config.dedup.weights.metadata);
    println!();
    println!("Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  Format: {:?}", config.logging.format);
    println!(
        "  File: {}",
        config
            .logging
            .file
            .as_ref()
            .map_or_else(|| "(stderr)".to_string(), |p| p.display().to_string())
    );
    Ok(())
}
