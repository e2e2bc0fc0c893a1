//! Main entry point for the fan regulator

use anyhow::Context;
use clap::Parser;
use fanreg::{args::Args, daemon, logging};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Print version and build metadata for binary identity verification
    let pkg_version = env!("CARGO_PKG_VERSION");
    let git_hash = option_env!("GIT_HASH").unwrap_or("unknown");
    let build_time = option_env!("BUILD_TIME").unwrap_or("unknown");
    eprintln!("fanreg v{} (git {}) built {}", pkg_version, git_hash, build_time);

    let args = Args::parse();

    logging::setup(args.verbose).context("failed to set up logging")?;

    let settings = args.settings().context("invalid settings")?;

    daemon::daemon(settings)
        .await
        .context("fan regulator failed to start")?;

    Ok(())
}
