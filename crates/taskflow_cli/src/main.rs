//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `taskflow_core` linkage and slot storage wiring end to end.
//! - Print the current collection stats for the configured slot.
//!
//! Configuration comes from `TASKFLOW_*` environment variables.

use std::process::ExitCode;
use taskflow_core::{
    compute_stats, init_logging, SlotPersistence, SqliteKvStore, TaskStore, TaskflowConfig,
};

fn main() -> ExitCode {
    println!("taskflow_core ping={}", taskflow_core::ping());
    println!("taskflow_core version={}", taskflow_core::core_version());

    let config = TaskflowConfig::from_env();
    if let Some(logging) = config.logging() {
        if let Err(err) = init_logging(&logging) {
            eprintln!("taskflow logging disabled: {err}");
        }
    }

    let conn = match config.open_connection() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("taskflow open failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    let kv = match SqliteKvStore::try_new(&conn) {
        Ok(kv) => kv,
        Err(err) => {
            eprintln!("taskflow slot store unavailable: {err}");
            return ExitCode::FAILURE;
        }
    };

    let store = TaskStore::open(SlotPersistence::new(kv, config.slot_key()));
    let stats = compute_stats(store.all());
    println!(
        "taskflow_core slot={} total={} completed={} pending={} percentage={}",
        config.slot_key(),
        stats.total,
        stats.completed,
        stats.pending,
        stats.percentage
    );
    log::info!(
        "event=cli_stats module=cli status=ok total={} completed={}",
        stats.total,
        stats.completed
    );

    ExitCode::SUCCESS
}
