use restpath::cli::run_cli;
use restpath::logging::{init_logging_with_config, LogConfig, LogFormat};
use tracing::Level;

fn main() -> anyhow::Result<()> {
    // stdout carries command output; keep logs terse unless asked otherwise.
    let config = LogConfig {
        level: Level::WARN,
        format: LogFormat::Pretty,
        ..LogConfig::default()
    }
    .with_overrides(|key| std::env::var(key).ok());
    init_logging_with_config(&config)?;

    run_cli()
}
