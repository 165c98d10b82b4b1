use std::env;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};

use crate::http_cache::app_cache_dir;
use crate::source::DataSource;

pub const DEFAULT_RESULTS_URL: &str = "https://docs.google.com/spreadsheets/d/1oZJlXF6tpLLaEDNfduHzYFvLKDw7rnyzZY17CQNl1so/gviz/tq?tqx=out:csv&gid=0";
pub const DEFAULT_FIXTURES_URL: &str = "https://docs.google.com/spreadsheets/d/1oZJlXF6tpLLaEDNfduHzYFvLKDw7rnyzZY17CQNl1so/gviz/tq?tqx=out:csv&gid=1005360909";

/// Load `.env.local` then `.env`; existing environment variables win.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

/// Local CSV files when both `RESULTS_CSV` and `FIXTURES_CSV` are set,
/// otherwise the published sheet URLs.
pub fn remote_or_file_source() -> DataSource {
    if let (Some(results), Some(fixtures)) = (opt_env("RESULTS_CSV"), opt_env("FIXTURES_CSV")) {
        return DataSource::Files {
            results: PathBuf::from(results),
            fixtures: PathBuf::from(fixtures),
        };
    }
    DataSource::Remote {
        results_url: opt_env("RESULTS_URL").unwrap_or_else(|| DEFAULT_RESULTS_URL.to_string()),
        fixtures_url: opt_env("FIXTURES_URL").unwrap_or_else(|| DEFAULT_FIXTURES_URL.to_string()),
    }
}

pub fn store_db_path() -> Option<PathBuf> {
    opt_env("BOLA_STORE_DB")
        .map(PathBuf::from)
        .or_else(|| app_cache_dir().map(|dir| dir.join("uploads.sqlite")))
}

/// `BOLA_TODAY` (YYYY-MM-DD) when set and valid, otherwise the local date.
pub fn today() -> NaiveDate {
    opt_env("BOLA_TODAY")
        .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
        .unwrap_or_else(|| Local::now().date_naive())
}

pub fn http_timeout_secs() -> u64 {
    env::var("HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(10)
        .clamp(2, 120)
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Value of `--name value` or `--name=value` in `args`.
pub fn arg_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
            && !next.starts_with("--")
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

pub fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}
