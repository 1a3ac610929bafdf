mod auth;
mod list;
mod show;

use crate::config::{Config, Overrides};
use crate::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub use show::ShowResource;

#[derive(Parser, Debug)]
#[command(name = "sheets-roster")]
#[command(about = "Print the names and majors listed in a Google Sheets range", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Config file to read instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Client secret file downloaded from the developer console
    #[arg(long, global = true)]
    pub credentials: Option<PathBuf>,

    /// Where the access token is cached
    #[arg(long, global = true)]
    pub token: Option<PathBuf>,

    #[arg(long, global = true)]
    pub spreadsheet_id: Option<String>,

    /// Range to read, in A1 notation
    #[arg(long, global = true)]
    pub range: Option<String>,
}

impl GlobalArgs {
    fn load_config(&self) -> Result<Config> {
        let overrides = Overrides {
            credentials_path: self.credentials.clone(),
            token_path: self.token.clone(),
            spreadsheet_id: self.spreadsheet_id.clone(),
            range: self.range.clone(),
        };
        Config::load(self.config.as_deref(), &overrides)
    }
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        let config = self.global.load_config()?;

        match self.command.as_ref().unwrap_or(&Commands::List) {
            Commands::List => list::execute(&config).await,
            Commands::Auth { reset } => auth::execute(&config, *reset).await,
            Commands::Show { resource } => resource.execute(&config).await,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authorize if needed, then print the rows of the range (default)
    List,
    /// Authorize with Google and cache the token
    Auth {
        /// Delete the cached token and authorize again
        #[arg(long)]
        reset: bool,
    },
    Show {
        #[command(subcommand)]
        resource: ShowResource,
    },
}
