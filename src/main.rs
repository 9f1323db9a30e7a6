mod cli;

use anyhow::Result;
use clap::Parser;
use pemfixture::fixture::{FixtureJob, FixturePaths};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    init_tracing();

    let cli = cli::Cli::parse();
    let paths = cli
        .key_dir
        .map(FixturePaths::in_dir)
        .unwrap_or_default();

    let job = FixtureJob::builder().paths(paths).build();
    let report = job.run(cli.mode.into())?;
    println!("{report}");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
