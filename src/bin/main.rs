use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use swift_message_hub::batch::{build_batch_file, BatchOptions};
use swift_message_hub::mt_message::*;
use swift_message_hub::storage::{LegacyPayload, MessageWriter};
use swift_message_hub::Config;

/// Build, validate and store SWIFT MT103 messages
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// JSON object keyed by field tag ("20", "50K", ...)
    Fields,
    /// JSON object with the legacy collaborator keys (ref, senderBank, ...)
    Legacy,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Full block-structured message
    Mt,
    /// Legacy collaborator template
    Legacy,
    /// Legacy collaborator JSON payload
    LegacyJson,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build one message from field values and amount components
    Build {
        /// JSON file with the input fields
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Shape of the input JSON
        #[arg(long, value_enum, default_value = "fields")]
        input_format: InputFormat,

        /// Extra field values as TAG=VALUE (applied after --input)
        #[arg(short, long = "field")]
        fields: Vec<String>,

        /// Value date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Currency code
        #[arg(long)]
        currency: Option<String>,

        /// Amount with a decimal point
        #[arg(long)]
        amount: Option<String>,

        /// Message variant (defaults to SWIFT_VARIANT)
        #[arg(long, value_enum)]
        variant: Option<MessageVariant>,

        #[arg(long, value_enum, default_value = "mt")]
        output_format: OutputFormat,

        /// Save the message to a timestamped file
        #[arg(long)]
        save: bool,

        /// Output folder (defaults to SWIFT_SAVE_FOLDER)
        #[arg(long)]
        save_folder: Option<PathBuf>,

        /// Save even when some fields are empty
        #[arg(long)]
        force: bool,
    },

    /// Validate a tag-keyed field map JSON file
    Validate {
        /// JSON file keyed by field tag
        input: PathBuf,
    },

    /// Print the derived 32A and 33B values
    Derive {
        #[arg(long, default_value = "")]
        date: String,

        #[arg(long, default_value = "")]
        currency: String,

        #[arg(long, default_value = "")]
        amount: String,
    },

    /// Build one message per row of a transactions CSV file
    Batch {
        /// Input CSV file
        input_file: PathBuf,

        /// Output folder (defaults to SWIFT_SAVE_FOLDER)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Variant for rows without one (defaults to SWIFT_VARIANT)
        #[arg(long, value_enum)]
        variant: Option<MessageVariant>,

        /// Number of parallel workers (defaults to BATCH_WORKERS or CPU count)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Write rows even when some fields are empty
        #[arg(long)]
        allow_incomplete: bool,
    },
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let cli = Cli::parse();
    let config = Config::from_env();
    debug!("Configuration: {:?}", config);

    match cli.command {
        Commands::Build {
            input,
            input_format,
            fields,
            date,
            currency,
            amount,
            variant,
            output_format,
            save,
            save_folder,
            force,
        } => {
            let (mut field_map, mut amounts) = match &input {
                Some(path) => read_input(path, input_format)?,
                None => (FieldMap::with_fixed_values(), AmountComponents::default()),
            };
            for raw in &fields {
                apply_field_arg(&mut field_map, raw)?;
            }
            if let Some(date) = date {
                amounts.date = AmountComponents::parse_date(&date)?;
            }
            if let Some(currency) = currency {
                amounts.currency = currency;
            }
            if let Some(amount) = amount {
                amounts.amount = amount;
            }
            let variant = variant.unwrap_or(config.variant);

            let (field_map, errors, message) = build_message(field_map, &amounts, variant);
            for e in errors.errors() {
                warn!("{}", e);
            }
            let unsafe_fields = field_map.fields_with_delimiters();
            if !unsafe_fields.is_empty() {
                warn!(
                    "Fields {:?} contain block delimiters and are written unescaped",
                    unsafe_fields.iter().map(|t| t.as_str()).collect::<Vec<_>>()
                );
            }

            let output = match output_format {
                OutputFormat::Mt => message,
                OutputFormat::Legacy => {
                    LegacyPayload::from_field_map(&field_map, &amounts, variant).render()
                }
                OutputFormat::LegacyJson => serde_json::to_string_pretty(
                    &LegacyPayload::from_field_map(&field_map, &amounts, variant),
                )?,
            };
            println!("{}", output);

            if save {
                let missing = field_map.missing_fields();
                if !missing.is_empty() && !force {
                    bail!(
                        "Not saving: fields {:?} are empty (use --force to save anyway)",
                        missing.iter().map(|t| t.as_str()).collect::<Vec<_>>()
                    );
                }
                let folder = save_folder.unwrap_or(config.save_folder);
                let writer = MessageWriter::new(&folder)?;
                let path = writer.save(&output)?;
                info!("Saved {} message to {}", variant, path.display());
                eprintln!("File saved successfully: {}", path.display());
            }
            Ok(())
        }
        Commands::Validate { input } => {
            let text = fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let field_map: FieldMap = serde_json::from_str(&text)
                .with_context(|| format!("Invalid field map in {}", input.display()))?;
            let errors = validate_all(&field_map);
            println!("{}", serde_json::to_string_pretty(&errors)?);
            let failing = errors.errors();
            if !failing.is_empty() {
                bail!("{} field(s) failed validation", failing.len());
            }
            Ok(())
        }
        Commands::Derive {
            date,
            currency,
            amount,
        } => {
            let date = AmountComponents::parse_date(&date)?;
            let derived = derive(date, &currency, &amount);
            println!(":32A:{}", derived.field_32a);
            println!(":33B:{}", derived.field_33b);
            Ok(())
        }
        Commands::Batch {
            input_file,
            output_dir,
            variant,
            workers,
            allow_incomplete,
        } => {
            let start_time = Instant::now();
            let folder = output_dir.unwrap_or(config.save_folder);
            let writer = MessageWriter::new(&folder)?;
            let options = BatchOptions {
                variant: variant.unwrap_or(config.variant),
                allow_incomplete,
                workers: workers.filter(|&w| w > 0).unwrap_or(config.batch_workers),
            };
            info!("Building messages from {} into {}", input_file.display(), folder.display());
            let report = build_batch_file(&input_file, &writer, &options)
                .context("Batch build failed")?;
            println!(
                "written: {}, skipped: {}, rejected: {}, with format errors: {}",
                report.written, report.skipped, report.rejected, report.with_format_errors
            );
            info!("Batch completed in {:.2?}", start_time.elapsed());
            Ok(())
        }
    }
}

/// Load field values and amount components from a JSON file.
fn read_input(path: &Path, format: InputFormat) -> Result<(FieldMap, AmountComponents)> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    match format {
        InputFormat::Fields => {
            let raw: BTreeMap<String, String> = serde_json::from_str(&text)
                .with_context(|| format!("Expected a tag-keyed JSON object in {}", path.display()))?;
            let mut field_map = FieldMap::with_fixed_values();
            for (key, value) in raw {
                let tag: FieldTag = key.parse()?;
                field_map
                    .set_user_field(tag, value)
                    .with_context(|| format!("Field {} cannot be set from input", tag))?;
            }
            Ok((field_map, AmountComponents::default()))
        }
        InputFormat::Legacy => {
            let payload: LegacyPayload = serde_json::from_str(&text)
                .with_context(|| format!("Invalid legacy payload in {}", path.display()))?;
            Ok(payload.to_field_map()?)
        }
    }
}

/// Apply a `TAG=VALUE` argument to the field map.
fn apply_field_arg(field_map: &mut FieldMap, raw: &str) -> Result<()> {
    let (tag, value) = raw
        .split_once('=')
        .with_context(|| format!("Expected TAG=VALUE, got '{}'", raw))?;
    let tag: FieldTag = tag.trim().parse()?;
    field_map.set_user_field(tag, value)?;
    Ok(())
}
