use anyhow::Result;
use clap::Parser;
use photoframe::cli::{Cli, Commands};
use photoframe::commands;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "photoframe=debug"
    } else {
        "photoframe=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &cli.command {
        Commands::Init => commands::init::run(&cli),
        Commands::Apply {
            input,
            output,
            percent,
        } => commands::apply::run(&cli, input, output, *percent),
        Commands::Set { id, image, percent } => commands::set::run(&cli, *id, image, *percent),
        Commands::Percent { id, percent } => commands::percent::run(&cli, *id, *percent),
        Commands::Update { ids } => commands::update::run(&cli, ids),
        Commands::Remove { ids } => commands::remove::run(&cli, ids),
        Commands::List => commands::list::run(&cli),
        Commands::Check => commands::check::run(&cli),
    }
}
