use anyhow::Result;
use clap::Parser;
use swatch_cli::{Command, SwatchCli, generate, train};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
pub async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "swatch=info,swatch_cli=info,swatch_names=info".into()),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = SwatchCli::parse();
    match cli.command {
        Command::Train(args) => train(args).await,
        Command::Generate(args) => generate(args).await,
    }
}
