use super::credentials::Credentials;
use super::token::Token;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use oauth2::{
    AuthUrl, AuthorizationCode, Client, ClientId, ClientSecret, CsrfToken, EndpointNotSet,
    EndpointSet, RedirectUrl, Scope, StandardRevocableToken, TokenUrl,
    basic::{
        BasicClient, BasicErrorResponse, BasicRevocationErrorResponse,
        BasicTokenIntrospectionResponse, BasicTokenResponse,
    },
};
use reqwest::redirect::Policy;
use tracing::{debug, instrument};
use url::Url;

/// The authorization server side of the authorization-code flow.
#[async_trait]
pub trait AuthorizationServer {
    /// URL the user opens to grant `scopes` to this application.
    fn authorize_url(&self, scopes: &[String]) -> Url;

    async fn exchange_code(&self, code: &str) -> Result<Token>;
}

// Type alias for the client when Auth and Token URLs are set
type ConfiguredClient = Client<
    BasicErrorResponse,
    BasicTokenResponse,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
    EndpointSet,    // HasAuthUrl
    EndpointNotSet, // HasDeviceAuthUrl
    EndpointNotSet, // HasIntrospectionUrl
    EndpointNotSet, // HasRevocationUrl
    EndpointSet,    // HasTokenUrl
>;

/// Google's OAuth2 endpoints, as named in the client secret file.
pub struct GoogleOAuthClient {
    client: ConfiguredClient,
    http_client: reqwest::Client,
}

impl GoogleOAuthClient {
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let auth_url = AuthUrl::new(credentials.auth_uri.clone())
            .map_err(|e| AppError::Auth(format!("Invalid auth URL: {}", e)))?;
        let token_url = TokenUrl::new(credentials.token_uri.clone())
            .map_err(|e| AppError::Auth(format!("Invalid token URL: {}", e)))?;
        let redirect_url = RedirectUrl::new(credentials.redirect_uri.clone())
            .map_err(|e| AppError::Auth(format!("Invalid redirect URL: {}", e)))?;

        let client = BasicClient::new(ClientId::new(credentials.client_id.clone()))
            .set_client_secret(ClientSecret::new(credentials.client_secret.clone()))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url)
            .set_redirect_uri(redirect_url);

        // Token requests must not follow redirects.
        let http_client = reqwest::ClientBuilder::new()
            .redirect(Policy::none())
            .build()
            .map_err(|e| AppError::Auth(format!("Failed to build reqwest client: {}", e)))?;

        Ok(Self {
            client,
            http_client,
        })
    }
}

#[async_trait]
impl AuthorizationServer for GoogleOAuthClient {
    fn authorize_url(&self, scopes: &[String]) -> Url {
        let scopes = scopes
            .iter()
            .map(|s| Scope::new(s.clone()))
            .collect::<Vec<Scope>>();

        // State is not verified for pasted codes.
        let (url, _csrf_token) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(scopes)
            .add_extra_param("access_type", "offline")
            .url();

        url
    }

    #[instrument(name = "Exchanging authorization code", skip_all)]
    async fn exchange_code(&self, code: &str) -> Result<Token> {
        let response = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| AppError::Auth(format!("Failed to exchange code: {:?}", e)))?;

        debug!("Authorization code exchanged");

        Ok(Token::from_response(&response, chrono::Utc::now()))
    }
}
