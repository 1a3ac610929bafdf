mod credentials;
mod prompt;
mod server;
mod token;

pub use credentials::Credentials;
pub use prompt::{CodePrompt, ConsolePrompt};
pub use server::{AuthorizationServer, GoogleOAuthClient};
pub use token::{Token, TokenStore};

use crate::error::Result;
use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};

/// Credentials paired with the token used to sign API requests.
///
/// `token` is `None` only when an interactive exchange failed; requests made
/// with such a handle go out unauthenticated and are rejected by the API.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizedClient {
    pub credentials: Credentials,
    pub token: Option<Token>,
}

impl AuthorizedClient {
    pub fn new(credentials: Credentials, token: Option<Token>) -> Self {
        Self { credentials, token }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.access_token.as_str())
    }
}

/// Produces an [`AuthorizedClient`] from the cached token, or by walking the
/// user through the authorization-code flow when there is none.
pub struct Authorizer<S, P> {
    credentials: Credentials,
    server: S,
    prompt: P,
    store: TokenStore,
    scopes: Vec<String>,
}

impl<S, P> Authorizer<S, P>
where
    S: AuthorizationServer + Sync,
    P: CodePrompt,
{
    pub fn new(
        credentials: Credentials,
        server: S,
        prompt: P,
        store: TokenStore,
        scopes: Vec<String>,
    ) -> Self {
        Self {
            credentials,
            server,
            prompt,
            store,
            scopes,
        }
    }

    /// The cached token is trusted as-is: it is neither validated nor refreshed.
    #[instrument(name = "Authorizing", skip_all)]
    pub async fn authorize(&self) -> Result<AuthorizedClient> {
        match self.store.load() {
            Ok(Some(token)) => {
                if token.is_expired(Utc::now()) {
                    warn!("Cached token has expired, requests may be rejected");
                }
                debug!(path = ?self.store.path(), "Using cached token");
                return Ok(AuthorizedClient::new(self.credentials.clone(), Some(token)));
            }
            Ok(None) => debug!("No cached token found, authorizing interactively"),
            Err(e) => warn!("Ignoring cached token ({}), authorizing interactively", e),
        }

        self.authorize_interactively().await
    }

    async fn authorize_interactively(&self) -> Result<AuthorizedClient> {
        let auth_url = self.server.authorize_url(&self.scopes);
        let code = self.prompt.read_code(&auth_url)?;

        // A failed exchange still yields a handle; the API call reports it.
        let token = match self.server.exchange_code(code.trim()).await {
            Ok(token) => Some(token),
            Err(e) => {
                error!("Error while trying to retrieve access token: {}", e);
                None
            }
        };

        if let Some(token) = &token {
            match self.store.save(token) {
                Ok(()) => info!(path = ?self.store.path(), "Token stored"),
                Err(e) => error!("Failed to store token: {}", e),
            }
        }

        Ok(AuthorizedClient::new(self.credentials.clone(), token))
    }
}
