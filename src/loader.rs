use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::export::export_round_report;
use crate::source::{DataSource, load_tables};
use crate::state::{Delta, ProviderCommand};

/// Background worker that owns table loading and exports so the UI thread
/// never blocks on network or disk.
pub fn spawn_loader(source: DataSource, tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        load_and_send(&source, &tx);

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::Reload => load_and_send(&source, &tx),
                ProviderCommand::Export { path, report } => {
                    match export_round_report(&path, &report) {
                        Ok(summary) => {
                            let _ = tx.send(Delta::ExportFinished {
                                path: path.display().to_string(),
                                fixtures: summary.fixtures,
                                trends: summary.trends,
                            });
                        }
                        Err(err) => {
                            let _ = tx.send(Delta::Log(format!("[WARN] Export failed: {err:#}")));
                        }
                    }
                }
            }
        }
    });
}

fn load_and_send(source: &DataSource, tx: &Sender<Delta>) {
    let _ = tx.send(Delta::Log(format!("[INFO] Loading tables from {source}")));
    let delta = match load_tables(source) {
        Ok(tables) => Delta::TablesLoaded(Box::new(tables)),
        Err(err) => Delta::LoadFailed(format!("{err:#}")),
    };
    let _ = tx.send(delta);
}
