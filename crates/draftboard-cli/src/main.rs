// Draftboard entry point.
//
// Run sequence:
// 1. Initialize tracing (stderr)
// 2. Load config, copying defaults on first run
// 3. Load input tables and run valuation, draft board and upgrades
// 4. Write timestamped output tables

use draftboard_cli::report;
use draftboard_core::config;

use anyhow::Context;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Draftboard starting up");

    let base_dir = std::env::current_dir().context("failed to resolve working directory")?;

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: my_team={}, top_n_players={}",
        config.league.my_team, config.draft.top_n_players
    );

    let report = report::build_report(&config, &base_dir).context("pipeline run failed")?;

    let out_dir = base_dir.join(&config.data_paths.output_dir);
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;

    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    let written = report::write_report(&report, &out_dir, &stamp)
        .context("failed to write output tables")?;

    info!("Wrote {} files to {}", written.len(), out_dir.display());
    Ok(())
}

/// Initialize tracing to stderr, leaving stdout free.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("draftboard=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
