use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::http_cache::fetch_text_cached;
use crate::http_client::http_client;
use crate::records::{FixtureRecord, MatchRecord};
use crate::store;
use crate::table::{ParsedTable, parse_fixtures_csv, parse_results_csv};

/// Where the results and fixtures tables come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Remote {
        results_url: String,
        fixtures_url: String,
    },
    Files {
        results: PathBuf,
        fixtures: PathBuf,
    },
    /// Latest admin upload in the SQLite store.
    Store { db_path: PathBuf },
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Remote { .. } => write!(f, "published sheets"),
            DataSource::Files { results, fixtures } => {
                write!(f, "{} + {}", results.display(), fixtures.display())
            }
            DataSource::Store { db_path } => write!(f, "upload store {}", db_path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedTables {
    pub results: ParsedTable<MatchRecord>,
    pub fixtures: ParsedTable<FixtureRecord>,
    pub origin: String,
}

impl LoadedTables {
    pub fn from_csv(results_csv: &str, fixtures_csv: &str, origin: impl Into<String>) -> Result<Self> {
        let results = parse_results_csv(results_csv).context("parse results table")?;
        let fixtures = parse_fixtures_csv(fixtures_csv).context("parse fixtures table")?;
        Ok(Self {
            results,
            fixtures,
            origin: origin.into(),
        })
    }

    pub fn warnings(&self) -> impl Iterator<Item = &String> {
        self.results.warnings.iter().chain(self.fixtures.warnings.iter())
    }
}

pub fn load_tables(source: &DataSource) -> Result<LoadedTables> {
    match source {
        DataSource::Remote {
            results_url,
            fixtures_url,
        } => {
            let client = http_client()?;
            let results = fetch_text_cached(client, results_url).context("fetch results sheet")?;
            let fixtures =
                fetch_text_cached(client, fixtures_url).context("fetch fixtures sheet")?;
            let origin = if results.revalidated && fixtures.revalidated {
                "published sheets (not modified)".to_string()
            } else {
                "published sheets".to_string()
            };
            LoadedTables::from_csv(&results.body, &fixtures.body, origin)
        }
        DataSource::Files { results, fixtures } => {
            let results_csv = read_file(results)?;
            let fixtures_csv = read_file(fixtures)?;
            LoadedTables::from_csv(&results_csv, &fixtures_csv, source.to_string())
        }
        DataSource::Store { db_path } => {
            let conn = store::open_db(db_path)?;
            let Some(upload) = store::load_latest_upload(&conn)? else {
                return Err(anyhow!(
                    "no uploads in {}; run `stat_blaster upload` first",
                    db_path.display()
                ));
            };
            LoadedTables::from_csv(
                &upload.results_csv,
                &upload.fixtures_csv,
                format!(
                    "upload #{} ({} + {}, {})",
                    upload.upload_id, upload.results_name, upload.fixtures_name, upload.uploaded_at
                ),
            )
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}
