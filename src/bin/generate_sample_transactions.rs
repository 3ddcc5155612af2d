use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use humansize::{format_size, DECIMAL};
use rand::seq::IndexedRandom;
use rand::Rng;
use rayon::prelude::*;
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Instant;

use swift_message_hub::batch::CSV_HEADERS;

const CURRENCIES: [&str; 6] = ["USD", "EUR", "GBP", "CHF", "JPY", "THB"];
const BICS: [&str; 6] = [
    "ABDIEGCAXXX",
    "BARCGB22XXX",
    "DEUTDEFFXXX",
    "BNPAFRPPXXX",
    "CHASUS33XXX",
    "BKKBTHBKXXX",
];
const NAMES: [&str; 8] = [
    "JOHN DOE", "JANE SMITH", "ACME TRADING LTD", "GLOBEX CORP", "MARIA GARCIA",
    "LI WEI", "SOMCHAI PRASERT", "OLIVIA BROWN",
];
const CITIES: [&str; 6] = ["LONDON GB", "BERLIN DE", "PARIS FR", "NEW YORK US", "BANGKOK TH", "CAIRO EG"];
const PURPOSES: [&str; 5] = [
    "/RFB/PERSONAL EXPENSES",
    "/INV/2026-0042",
    "/RFB/RENT",
    "/ROC/SALARY",
    "/INV/SERVICES",
];

fn random_iban<R: Rng>(rng: &mut R) -> String {
    format!(
        "/{}{:02}{:018}",
        ["GB", "DE", "FR", "TH"].choose(rng).copied().unwrap_or("GB"),
        rng.random_range(10..=99),
        rng.random_range(0..=999_999_999_999_999_999u64)
    )
}

/// One CSV line in the batch input layout.
fn random_transaction<R: Rng>(rng: &mut R, row: usize, start: NaiveDate) -> String {
    let pick = |rng: &mut R, list: &[&'static str]| -> &'static str {
        list.choose(rng).copied().unwrap_or_default()
    };
    let currency = pick(rng, &CURRENCIES);
    let value_date = start + Duration::days(rng.random_range(0..365));
    // Roughly one in four amounts carries a decimal part.
    let amount = if rng.random_bool(0.25) {
        format!("{}.{:02}", rng.random_range(1..1_000_000), rng.random_range(0..100))
    } else {
        rng.random_range(1..1_000_000).to_string()
    };
    let variant = if rng.random_bool(0.2) { "rtgs" } else { "" };

    format!(
        "REF{:013},{},{},{},{} {} {},{},{},{} {} {},{},{}{},{}",
        row,
        value_date.format("%Y-%m-%d"),
        currency.to_lowercase(),
        amount,
        random_iban(rng),
        pick(rng, &NAMES),
        pick(rng, &CITIES),
        pick(rng, &BICS),
        pick(rng, &BICS),
        random_iban(rng),
        pick(rng, &NAMES),
        pick(rng, &CITIES),
        pick(rng, &PURPOSES),
        currency,
        rng.random_range(5..100),
        variant
    )
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();
    pretty_env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <rows> [output_file]", args[0]);
        std::process::exit(1);
    }
    let rows: usize = args[1]
        .parse()
        .context("Please provide a valid number for rows")?;
    let output = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| "sample_transactions.csv".to_string());

    println!("📝 Generating: {} ({} rows)", output, rows);
    generate_transactions_csv(&output, rows)
        .with_context(|| format!("Failed to generate {}", output))?;
    let size = std::fs::metadata(&output)?.len();
    println!("✅ Wrote {} ({})", output, format_size(size, DECIMAL));
    Ok(())
}

fn generate_transactions_csv(file_path: &str, rows: usize) -> Result<()> {
    let start_time = Instant::now();
    let file = File::create(file_path)?;
    let mut writer = BufWriter::with_capacity(4 * 1024 * 1024, file);
    writeln!(writer, "{}", CSV_HEADERS.join(","))?;

    let start = NaiveDate::from_ymd_opt(2026, 1, 1).context("Invalid start date")?;
    let batch_size = 50_000;
    for batch_start in (0..rows).step_by(batch_size) {
        let batch_end = (batch_start + batch_size).min(rows);
        let lines: Vec<String> = (batch_start..batch_end)
            .into_par_iter()
            .map(|row| random_transaction(&mut rand::rng(), row + 1, start))
            .collect();
        for line in lines {
            writeln!(writer, "{}", line)?;
        }
    }
    writer.flush()?;
    println!("   -> Done: {} rows in {:.2?}", rows, start_time.elapsed());
    Ok(())
}
