use anyhow::Result;

use bola_stats::cli::{ReportOptions, run_report};
use bola_stats::config;
use bola_stats::frontend::FrontEnd;
use bola_stats::source::load_tables;

fn main() -> Result<()> {
    config::load_dotenv();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let opts = ReportOptions::from_args(&args)?;

    let source = config::remote_or_file_source();
    let tables = load_tables(&source)?;
    run_report(&tables, FrontEnd::Current, &opts, config::today())?;
    Ok(())
}
