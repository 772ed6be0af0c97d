use crate::output::{print_json, print_table};
use anyhow::Context;
use beach_core::config::Config;
use beach_core::sync::{self, BootstrapOutcome};

pub fn bootstrap(config: &Config, json: bool) -> anyhow::Result<()> {
    let seed = config.seed_catalog().context("failed to load seed catalog")?;
    let store = config.open_store().context("failed to open store")?;
    let outcome = sync::bootstrap(store.as_ref(), &seed).context("error syncing beach data")?;

    if json {
        return print_json(&outcome);
    }
    match outcome {
        BootstrapOutcome::Seeded { count } => println!("Seeded {count} beaches."),
        BootstrapOutcome::AlreadyPopulated { count } => {
            println!("Store already holds {count} beaches; nothing written.")
        }
    }
    Ok(())
}

pub fn sync_check(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = config.open_store().context("failed to open store")?;
    let report =
        sync::reconcile_all(store.as_ref()).context("error checking database synchronization")?;

    if json {
        return print_json(&report);
    }

    println!("{}", report.message());
    if !report.updated_beaches.is_empty() {
        let rows = report
            .updated_beaches
            .iter()
            .map(|c| {
                vec![
                    c.id.clone(),
                    c.name.clone(),
                    c.previous_safety
                        .map_or_else(|| "-".to_string(), |s| s.to_string()),
                    c.new_safety.to_string(),
                    c.wave_height.to_string(),
                    c.ocean_currents.clone(),
                ]
            })
            .collect();
        print_table(&["ID", "NAME", "WAS", "NOW", "WAVES", "CURRENTS"], rows);
    }
    if !report.invalid.is_empty() {
        println!("Skipped invalid entries: {}", report.invalid.join(", "));
    }
    Ok(())
}
