use crate::auth::{
    AuthorizedClient, Authorizer, ConsolePrompt, Credentials, GoogleOAuthClient, TokenStore,
};
use crate::config::Config;
use crate::error::Result;
use tracing::{info, warn};

pub async fn execute(config: &Config, reset: bool) -> Result<()> {
    if reset {
        TokenStore::new(&config.token_path).clear()?;
    }

    let authorized = authorize(config).await?;
    match authorized.token {
        Some(_) => info!("Google Sheets authorization verified"),
        None => warn!("Google Sheets authorization did not produce a token"),
    }

    Ok(())
}

/// Load credentials and obtain an authorized handle, prompting if needed.
pub(super) async fn authorize(config: &Config) -> Result<AuthorizedClient> {
    let credentials = Credentials::load(&config.credentials_path).await?;
    let server = GoogleOAuthClient::new(&credentials)?;

    let authorizer = Authorizer::new(
        credentials,
        server,
        ConsolePrompt,
        TokenStore::new(&config.token_path),
        config.scopes.clone(),
    );

    authorizer.authorize().await
}
