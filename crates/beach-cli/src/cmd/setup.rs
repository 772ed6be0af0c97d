use anyhow::Context;
use beach_core::config::{parse_service_account, Config};
use std::io::Read;
use std::path::Path;

/// Validate a Firebase service-account JSON and store it in the config file,
/// keeping every other setting already there.
pub fn run(
    config_path: &Path,
    service_account: Option<&Path>,
    database_url: Option<&str>,
) -> anyhow::Result<()> {
    let raw = match service_account {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("could not read file at {}", path.display()))?,
        None => {
            eprintln!("Paste the service-account JSON, then press Ctrl-D:");
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("could not read service account from stdin")?;
            buf
        }
    };
    let account = parse_service_account(&raw).context("invalid service account JSON")?;

    let mut config = Config::load(config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    config.service_account = Some(account);
    if let Some(url) = database_url {
        config.store.database_url = Some(url.to_string());
    }
    config
        .save(config_path)
        .with_context(|| format!("failed to write {}", config_path.display()))?;

    println!(
        "Firebase credentials saved to {} (project: {}).",
        config_path.display(),
        config.project_id().unwrap_or("-")
    );
    if let Some(url) = config.database_url() {
        println!("Database: {url}");
    }
    if let Some(email) = config
        .service_account
        .as_ref()
        .and_then(|a| a.get("client_email"))
        .and_then(|v| v.as_str())
    {
        println!("Requests will authenticate as {email}.");
    }
    println!("Start the server with: beachsafe serve");
    Ok(())
}
