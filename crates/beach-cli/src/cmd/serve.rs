use anyhow::Context;
use beach_core::config::Config;
use beach_server::state::AppState;

pub fn run(config: &Config, port: Option<u16>, no_seed: bool) -> anyhow::Result<()> {
    let port = port.unwrap_or(config.port);
    let seed = if no_seed {
        None
    } else {
        Some(config.seed_catalog().context("failed to load seed catalog")?)
    };
    // Blocking store clients must be built before entering the runtime.
    let store = config.open_store().context("failed to open store")?;
    let state = AppState::new(store);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(beach_server::serve(state, seed, port))
}
