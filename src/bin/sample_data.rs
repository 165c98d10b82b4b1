use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use bola_stats::config::arg_value;
use bola_stats::sample::generate_sample_tables;

fn main() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let out_dir = arg_value(&args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));
    let seed = arg_value(&args, "--seed")
        .and_then(|raw| raw.parse::<u64>().ok())
        .unwrap_or(2024);
    let seasons = arg_value(&args, "--seasons")
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(6)
        .clamp(1, 40);
    let start = NaiveDate::from_ymd_opt(2018, 8, 10).context("invalid season start")?;

    let tables = generate_sample_tables(seed, seasons, start);
    fs::create_dir_all(&out_dir).with_context(|| format!("create {}", out_dir.display()))?;
    let results = out_dir.join("results.csv");
    let fixtures = out_dir.join("fixtures.csv");
    fs::write(&results, &tables.results_csv)
        .with_context(|| format!("write {}", results.display()))?;
    fs::write(&fixtures, &tables.fixtures_csv)
        .with_context(|| format!("write {}", fixtures.display()))?;

    println!("Sample tables written (seed {seed}, {seasons} seasons)");
    println!("RESULTS_CSV={}", results.display());
    println!("FIXTURES_CSV={}", fixtures.display());
    Ok(())
}
