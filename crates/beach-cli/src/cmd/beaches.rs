use crate::output::{print_json, print_table};
use anyhow::Context;
use beach_core::config::Config;
use beach_core::service;
use serde_json::Value;

fn text(beach: &Value, field: &str) -> String {
    match beach.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "-".to_string(),
        Some(other) => other.to_string(),
    }
}

fn print_beaches(beaches: &[Value]) {
    let rows = beaches
        .iter()
        .map(|b| {
            vec![
                text(b, "id"),
                text(b, "name"),
                text(b, "location"),
                text(b, "waveHeight"),
                text(b, "oceanCurrents"),
                match b.get("isSafe").and_then(Value::as_bool) {
                    Some(true) => "safe".to_string(),
                    Some(false) => "unsafe".to_string(),
                    None => "-".to_string(),
                },
            ]
        })
        .collect();
    print_table(
        &["ID", "NAME", "LOCATION", "WAVES", "CURRENTS", "STATUS"],
        rows,
    );
}

pub fn list(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = config.open_store().context("failed to open store")?;
    let beaches = service::list_all(store.as_ref()).context("error fetching beaches")?;
    if json {
        return print_json(&beaches);
    }
    print_beaches(&beaches);
    Ok(())
}

pub fn show(config: &Config, id: &str, json: bool) -> anyhow::Result<()> {
    let store = config.open_store().context("failed to open store")?;
    let beach = service::get_by_id(store.as_ref(), id).context("error fetching beach")?;
    if json {
        return print_json(&beach);
    }
    for field in [
        "id",
        "name",
        "location",
        "temperature",
        "waveHeight",
        "oceanCurrents",
        "isSafe",
        "latitude",
        "longitude",
        "description",
    ] {
        println!("{field:<14} {}", text(&beach, field));
    }
    Ok(())
}

pub fn search(config: &Config, query: Option<&str>, json: bool) -> anyhow::Result<()> {
    let store = config.open_store().context("failed to open store")?;
    let beaches = service::search(store.as_ref(), query).context("error searching beaches")?;
    if json {
        return print_json(&beaches);
    }
    print_beaches(&beaches);
    Ok(())
}
