use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use bola_stats::cli::{ReportOptions, run_report};
use bola_stats::config::{self, arg_value};
use bola_stats::frontend::FrontEnd;
use bola_stats::source::{DataSource, load_tables};
use bola_stats::store;

const USAGE: &str = "usage:
  stat_blaster upload --results <results.csv> --fixtures <fixtures.csv> [--keep N]
  stat_blaster uploads
  stat_blaster report [--round N] [--digest] [--json] [--export out.xlsx]
options:
  --db <path>   upload store (default: $BOLA_STORE_DB or the user cache dir)";

fn main() -> Result<()> {
    config::load_dotenv();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let db_path = arg_value(&args, "--db")
        .map(PathBuf::from)
        .or_else(config::store_db_path)
        .context("unable to resolve upload store path")?;

    match args.first().map(String::as_str) {
        Some("upload") => upload(&args, &db_path),
        Some("uploads") => list(&db_path),
        Some("report") => {
            let opts = ReportOptions::from_args(&args)?;
            let tables = load_tables(&DataSource::Store { db_path })?;
            run_report(&tables, FrontEnd::Admin, &opts, config::today())?;
            Ok(())
        }
        _ => {
            println!("{USAGE}");
            Ok(())
        }
    }
}

fn upload(args: &[String], db_path: &Path) -> Result<()> {
    let results = arg_value(args, "--results")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("missing --results <csv>\n{USAGE}"))?;
    let fixtures = arg_value(args, "--fixtures")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("missing --fixtures <csv>\n{USAGE}"))?;
    let keep = arg_value(args, "--keep")
        .map(|raw| raw.parse::<usize>())
        .transpose()
        .context("invalid --keep value")?;

    let results_csv =
        fs::read_to_string(&results).with_context(|| format!("read {}", results.display()))?;
    let fixtures_csv =
        fs::read_to_string(&fixtures).with_context(|| format!("read {}", fixtures.display()))?;

    let mut conn = store::open_db(db_path)?;
    let summary = store::save_upload(
        &mut conn,
        &file_label(&results),
        &results_csv,
        &file_label(&fixtures),
        &fixtures_csv,
    )?;

    println!("Upload stored");
    println!("DB: {}", db_path.display());
    println!("Upload: #{} at {}", summary.upload_id, summary.uploaded_at);
    println!(
        "Results: {} ({} rows)",
        summary.results_name, summary.results_rows
    );
    println!(
        "Fixtures: {} ({} rows)",
        summary.fixtures_name, summary.fixtures_rows
    );

    if let Some(keep) = keep {
        let removed = store::prune_uploads(&conn, keep.max(1))?;
        println!("Pruned {removed} older upload(s)");
    }
    Ok(())
}

fn list(db_path: &Path) -> Result<()> {
    let conn = store::open_db(db_path)?;
    let uploads = store::list_uploads(&conn)?;
    if uploads.is_empty() {
        println!("No uploads in {}", db_path.display());
        return Ok(());
    }
    for item in uploads {
        println!(
            "#{} {} results={} ({} rows) fixtures={} ({} rows)",
            item.upload_id,
            item.uploaded_at,
            item.results_name,
            item.results_rows,
            item.fixtures_name,
            item.fixtures_rows
        );
    }
    Ok(())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
