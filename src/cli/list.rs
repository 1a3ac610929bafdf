use super::auth::authorize;
use crate::config::Config;
use crate::error::Result;
use crate::report::ReportPrinter;
use crate::sheets::SheetsClient;
use tracing::debug;

pub async fn execute(config: &Config) -> Result<()> {
    let authorized = authorize(config).await?;
    let sheets_client = SheetsClient::new(&authorized, config.scopes.clone())?;

    let printer = ReportPrinter::new(
        sheets_client,
        config.spreadsheet_id.clone(),
        config.range.clone(),
    );
    let printed = printer.print(&mut std::io::stdout().lock()).await?;

    debug!(rows = printed, "Report printed");

    Ok(())
}
