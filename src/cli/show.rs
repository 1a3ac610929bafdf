use crate::config::Config;
use crate::error::Result;
use clap::Subcommand;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum ShowResource {
    /// Show configuration, credentials and token paths
    Paths,
}

impl ShowResource {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        match self {
            ShowResource::Paths => show_paths(config),
        }
    }
}

fn show_paths(config: &Config) -> Result<()> {
    let config_path = Config::config_file()?;

    info!(path = ?config_path, "Config path");
    info!(path = ?config.credentials_path, "Credentials path");
    info!(path = ?config.token_path, "Token path");

    Ok(())
}
