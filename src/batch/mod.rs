// --- Parallel batch message builder ---
//
// Reads one transaction per CSV row, builds each MT103 in parallel and saves
// it through the message writer. Validation stays advisory: rows with format
// errors are still written, only logged.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use log::{debug, error, info, warn};
use num_format::{Locale, ToFormattedString};
use rayon::prelude::*;
use serde::Deserialize;

use crate::mt_message::{
    build_message, AmountComponents, FieldMap, FieldTag, MessageError, MessageVariant,
};
use crate::storage::MessageWriter;

pub const CSV_HEADERS: [&str; 11] = [
    "reference",
    "value_date",
    "currency",
    "amount",
    "ordering_customer",
    "sender_bic",
    "receiver_bic",
    "beneficiary",
    "remittance_info",
    "charges_amount",
    "variant",
];

/// One input row. `variant` may be absent or blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TransactionRow {
    pub reference: String,
    pub value_date: String,
    pub currency: String,
    pub amount: String,
    pub ordering_customer: String,
    pub sender_bic: String,
    pub receiver_bic: String,
    pub beneficiary: String,
    pub remittance_info: String,
    pub charges_amount: String,
    #[serde(default)]
    pub variant: Option<String>,
}

impl TransactionRow {
    /// Turn the row into engine inputs.
    pub fn to_inputs(
        &self,
        default_variant: MessageVariant,
    ) -> std::result::Result<(FieldMap, AmountComponents, MessageVariant), MessageError> {
        let date = AmountComponents::parse_date(&self.value_date)?;
        let amounts = AmountComponents::new(date, &self.currency, &self.amount);
        let variant = match self.variant.as_deref().map(str::trim) {
            None | Some("") => default_variant,
            Some(raw) => raw.parse()?,
        };

        let mut fields = FieldMap::with_fixed_values();
        fields.set_user_field(FieldTag::Reference, self.reference.as_str())?;
        fields.set_user_field(FieldTag::OrderingCustomer, self.ordering_customer.as_str())?;
        fields.set_user_field(FieldTag::OrderingInstitution, self.sender_bic.as_str())?;
        fields.set_user_field(FieldTag::AccountWithInstitution, self.receiver_bic.as_str())?;
        fields.set_user_field(FieldTag::Beneficiary, self.beneficiary.as_str())?;
        fields.set_user_field(FieldTag::RemittanceInfo, self.remittance_info.as_str())?;
        fields.set_user_field(FieldTag::SenderCharges, self.charges_amount.as_str())?;
        Ok((fields, amounts, variant))
    }
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub variant: MessageVariant,
    /// Save rows even when some fields are blank.
    pub allow_incomplete: bool,
    pub workers: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            variant: MessageVariant::Standard,
            allow_incomplete: false,
            workers: num_cpus::get(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Written { path: PathBuf, format_errors: usize },
    Skipped { missing: Vec<FieldTag> },
    Rejected { reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub written: usize,
    pub skipped: usize,
    pub rejected: usize,
    /// Written rows that had at least one field format error.
    pub with_format_errors: usize,
    pub paths: Vec<PathBuf>,
}

impl BatchReport {
    fn from_outcomes(outcomes: Vec<RowOutcome>) -> Self {
        let mut report = BatchReport {
            total: outcomes.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                RowOutcome::Written {
                    path,
                    format_errors,
                } => {
                    report.written += 1;
                    if format_errors > 0 {
                        report.with_format_errors += 1;
                    }
                    report.paths.push(path);
                }
                RowOutcome::Skipped { .. } => report.skipped += 1,
                RowOutcome::Rejected { .. } => report.rejected += 1,
            }
        }
        report
    }
}

/// Build and save one message per row. `line` is the 1-based CSV line for logs.
pub fn process_row(
    line: usize,
    row: &TransactionRow,
    writer: &MessageWriter,
    options: &BatchOptions,
) -> RowOutcome {
    let (fields, amounts, variant) = match row.to_inputs(options.variant) {
        Ok(inputs) => inputs,
        Err(e) => {
            warn!("[batch] Line {}: rejected: {}", line, e);
            return RowOutcome::Rejected {
                reason: e.to_string(),
            };
        }
    };

    let (fields, errors, message) = build_message(fields, &amounts, variant);

    let missing = fields.missing_fields();
    if !missing.is_empty() && !options.allow_incomplete {
        warn!("[batch] Line {}: skipped, empty fields {:?}", line, tags(&missing));
        return RowOutcome::Skipped { missing };
    }

    let format_errors = errors.errors();
    for e in &format_errors {
        warn!("[batch] Line {}: {}", line, e);
    }
    let unsafe_fields = fields.fields_with_delimiters();
    if !unsafe_fields.is_empty() {
        warn!(
            "[batch] Line {}: values with block delimiters in {:?} are written unescaped",
            line,
            tags(&unsafe_fields)
        );
    }

    match writer.save(&message) {
        Ok(path) => {
            debug!("[batch] Line {} -> {}", line, path.display());
            RowOutcome::Written {
                path,
                format_errors: format_errors.len(),
            }
        }
        Err(e) => {
            error!("[batch] Line {}: {}", line, e);
            RowOutcome::Rejected {
                reason: e.to_string(),
            }
        }
    }
}

pub fn build_batch<R: Read>(
    input: R,
    writer: &MessageWriter,
    options: &BatchOptions,
) -> Result<BatchReport> {
    let timer = Instant::now();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Headers)
        .from_reader(input);

    // Header is line 1.
    let rows: Vec<(usize, std::result::Result<TransactionRow, String>)> = rdr
        .deserialize::<TransactionRow>()
        .enumerate()
        .map(|(i, r)| (i + 2, r.map_err(|e| e.to_string())))
        .collect();
    info!(
        "[batch] Read {} rows in {:.2?}",
        rows.len().to_formatted_string(&Locale::en),
        timer.elapsed()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers.max(1))
        .build()
        .context("Failed to build batch thread pool")?;
    debug!("[batch] Using {} workers", pool.current_num_threads());

    let build_timer = Instant::now();
    let outcomes: Vec<RowOutcome> = pool.install(|| {
        rows.par_iter()
            .map(|(line, row)| match row {
                Ok(row) => process_row(*line, row, writer, options),
                Err(reason) => {
                    warn!("[batch] Line {}: unreadable row: {}", line, reason);
                    RowOutcome::Rejected {
                        reason: reason.clone(),
                    }
                }
            })
            .collect()
    });

    let report = BatchReport::from_outcomes(outcomes);
    info!(
        "[batch] Built {} of {} messages into {} in {:.2?} (skipped: {}, rejected: {}, with format errors: {})",
        report.written.to_formatted_string(&Locale::en),
        report.total.to_formatted_string(&Locale::en),
        writer.folder().display(),
        build_timer.elapsed(),
        report.skipped.to_formatted_string(&Locale::en),
        report.rejected.to_formatted_string(&Locale::en),
        report.with_format_errors.to_formatted_string(&Locale::en)
    );
    Ok(report)
}

pub fn build_batch_file(
    input_path: &Path,
    writer: &MessageWriter,
    options: &BatchOptions,
) -> Result<BatchReport> {
    let file = File::open(input_path)
        .with_context(|| format!("Failed to open input file: {}", input_path.display()))?;
    build_batch(BufReader::new(file), writer, options)
}

fn tags(list: &[FieldTag]) -> Vec<&'static str> {
    list.iter().map(|t| t.as_str()).collect()
}
