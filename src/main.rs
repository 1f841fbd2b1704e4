use clap::Parser;
use epwatch::application::ejecutar_cli;
use epwatch::infrastructure::{logging, AppConfig};
use epwatch::presentation::Cli;
use std::path::Path;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    logging::init()?;
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref().map(Path::new))?;

    ejecutar_cli(cli, config).await?;

    Ok(())
}
