use crate::error::{AppError, Result};
use anyhow::Context;
use std::path::Path;
use tracing::{debug, instrument};
use yup_oauth2::ApplicationSecret;

/// Client identity issued by the API provider for this application.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_uri: String,
    pub token_uri: String,
}

impl Credentials {
    /// Read a client secret file as downloaded from the developer console.
    ///
    /// Both the `installed` and `web` wrappers are accepted. A missing or
    /// malformed file is fatal.
    #[instrument(name = "Loading client credentials", skip_all, fields(path = ?path))]
    pub async fn load(path: &Path) -> Result<Self> {
        let secret = yup_oauth2::read_application_secret(path)
            .await
            .with_context(|| format!("Error loading client secret file {:?}", path))?;

        debug!(client_id = %secret.client_id, "Loaded client credentials");

        Self::try_from(secret)
    }

    #[cfg(test)]
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let secret = yup_oauth2::parse_application_secret(contents)?;
        Self::try_from(secret)
    }
}

impl TryFrom<ApplicationSecret> for Credentials {
    type Error = AppError;

    fn try_from(secret: ApplicationSecret) -> Result<Self> {
        let redirect_uri = secret.redirect_uris.into_iter().next().ok_or_else(|| {
            AppError::Config("Client secret file has no redirect_uris".to_string())
        })?;

        if secret.client_id.is_empty() || secret.client_secret.is_empty() {
            return Err(AppError::Config(
                "client_id and client_secret must be set in the client secret file".to_string(),
            ));
        }

        Ok(Self {
            client_id: secret.client_id,
            client_secret: secret.client_secret,
            redirect_uri,
            auth_uri: secret.auth_uri,
            token_uri: secret.token_uri,
        })
    }
}
