use anyhow::{anyhow, Context};

use monitoringplugins::{Outcome, Runner};

// Usage: cargo run --example error

fn main() {
    // A missing state file is CRITICAL, anything else stays UNKNOWN.
    Runner::new()
        .on_error(|e: &anyhow::Error| match e.downcast_ref::<std::io::Error>() {
            Some(_) => Outcome::critical(format!("{:#}", e)),
            None => Outcome::unknown(format!("{:#}", e)),
        })
        .safe_run(do_check)
        .print_and_exit()
}

fn do_check() -> Result<Outcome, anyhow::Error> {
    let state = std::fs::read_to_string("/var/lib/backup/last_run")
        .context("can not read backup state")?;

    match state.trim() {
        "done" => Ok(Outcome::ok("last backup finished")),
        other => Err(anyhow!("unexpected backup state '{}'", other)),
    }
}
