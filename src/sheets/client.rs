use super::ValueSource;
use crate::auth::AuthorizedClient;
use crate::error::{AppError, Result};
use crate::models::Row;
use async_trait::async_trait;
use google_sheets4::Sheets;
use google_sheets4::api::ValueRange;
use google_sheets4::common::NoToken;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use tracing::{debug, instrument, warn};

pub struct SheetsClient {
    hub: Sheets<HttpsConnector<HttpConnector>>,
    scopes: Vec<String>,
}

impl SheetsClient {
    /// Create a Sheets hub that signs requests with the handle's access token
    pub fn new(authorized: &AuthorizedClient, scopes: Vec<String>) -> Result<Self> {
        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(connector);

        debug!(client_id = %authorized.credentials.client_id, "Building Sheets hub");
        let hub = match authorized.access_token() {
            Some(access_token) => Sheets::new(client, access_token.to_string()),
            None => {
                warn!("No access token available, sending unauthenticated request");
                Sheets::new(client, NoToken)
            }
        };

        Ok(Self { hub, scopes })
    }
}

#[async_trait]
impl ValueSource for SheetsClient {
    #[instrument(name = "Fetching values", skip(self))]
    async fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Row>> {
        let (_, response) = self
            .hub
            .spreadsheets()
            .values_get(spreadsheet_id, range)
            .major_dimension("ROWS")
            .add_scopes(&self.scopes)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to read range '{}': {}", range, e)))?;

        let rows = rows_from(response);
        debug!(rows = rows.len(), "Fetched values");

        Ok(rows)
    }
}

// Values are Option<Vec<Vec<serde_json::Value>>>; the API omits them for an empty range
fn rows_from(range: ValueRange) -> Vec<Row> {
    range
        .values
        .unwrap_or_default()
        .into_iter()
        .map(Row::from)
        .collect()
}
