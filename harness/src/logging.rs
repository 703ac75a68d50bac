use std::env;

use tracing_subscriber::EnvFilter;

/// Our crates log at debug, everything else at warn.
const DEFAULT_FILTER: &str = "warn,combat_physics=debug,combat_harness=debug";

/// Install a stdout `tracing` subscriber. `RUST_LOG` directives are appended to
/// the defaults. Records from the `log` facade are captured as well.
pub fn init_logging() -> anyhow::Result<()> {
    let mut filter = DEFAULT_FILTER.to_owned();
    if let Ok(env_filter) = env::var(EnvFilter::DEFAULT_ENV) {
        filter.push(',');
        filter.push_str(&env_filter);
    }

    tracing_subscriber::fmt()
        .compact()
        .with_line_number(true)
        .with_env_filter(EnvFilter::new(filter))
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;
    tracing::trace!("logging initialized");
    Ok(())
}
