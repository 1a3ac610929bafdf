mod client;

pub use client::SheetsClient;

use crate::error::Result;
use crate::models::Row;
use async_trait::async_trait;

#[async_trait]
pub trait ValueSource {
    /// Rows of `range` in `spreadsheet_id`, in the order the API returns them.
    async fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Row>>;
}
