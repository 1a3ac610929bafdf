use crate::error::Result;
use crate::sheets::ValueSource;
use std::io::Write;
use tracing::{info, instrument};

// Columns A and E of the range
const NAME_COLUMN: usize = 0;
const MAJOR_COLUMN: usize = 4;

pub const NO_DATA_MESSAGE: &str = "No data found.";
pub const MISSING_CELL: &str = "<missing>";

/// Prints the name and major of every row in a fixed range.
pub struct ReportPrinter<VS> {
    source: VS,
    spreadsheet_id: String,
    range: String,
}

impl<VS> ReportPrinter<VS>
where
    VS: ValueSource + Sync,
{
    pub fn new(source: VS, spreadsheet_id: String, range: String) -> Self {
        Self {
            source,
            spreadsheet_id,
            range,
        }
    }

    /// Fetch the range and write one line per row to `out`, returning the
    /// number of rows written. Nothing is written if the fetch fails.
    #[instrument(name = "Printing report", skip_all, fields(range = %self.range))]
    pub async fn print<W: Write>(&self, out: &mut W) -> Result<usize> {
        let rows = self
            .source
            .get_values(&self.spreadsheet_id, &self.range)
            .await?;

        if rows.is_empty() {
            writeln!(out, "{}", NO_DATA_MESSAGE)?;
            return Ok(0);
        }

        info!("Name, Major:");
        for row in &rows {
            writeln!(
                out,
                "{}, {}",
                row.cell(NAME_COLUMN).unwrap_or(MISSING_CELL),
                row.cell(MAJOR_COLUMN).unwrap_or(MISSING_CELL),
            )?;
        }

        Ok(rows.len())
    }
}


#[cfg(test)]
mod tests {
    use super::mocks::MockValueSource;
    use super::*;
    use crate::error::AppError;
    use crate::models::Row;

    fn row(cells: &[&str]) -> Row {
        cells.iter().copied().collect()
    }

    async fn print_rows(rows: Option<Vec<Row>>) -> (Result<usize>, String, MockValueSource) {
        let source = MockValueSource {
            rows,
            ..Default::default()
        };
        let printer = ReportPrinter::new(
            source.clone(),
            "sheet-id".to_string(),
            "Class Data!A2:E".to_string(),
        );

        let mut out = Vec::new();
        let result = printer.print(&mut out).await;
        (result, String::from_utf8(out).unwrap(), source)
    }

    #[tokio::test]
    async fn test_print_no_data() {
        let (result, output, _) = print_rows(Some(Vec::new())).await;

        assert_eq!(result.unwrap(), 0);
        assert_eq!(output, "No data found.\n");
    }

    #[tokio::test]
    async fn test_print_rows_in_order() {
        let rows = vec![
            row(&["Alexandra", "Female", "4. Senior", "CA", "English", "Drama Club"]),
            row(&["Andrew", "Male", "1. Freshman", "SD", "Math", "Lacrosse"]),
            row(&["Anna", "Female", "1. Freshman", "NC", "English", "Basketball"]),
        ];

        let (result, output, source) = print_rows(Some(rows)).await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(
            output.lines().collect::<Vec<_>>(),
            vec!["Alexandra, English", "Andrew, Math", "Anna, English"]
        );
        assert_eq!(
            *source.requests.lock().unwrap(),
            vec![("sheet-id".to_string(), "Class Data!A2:E".to_string())]
        );
    }

    #[tokio::test]
    async fn test_print_short_row() {
        let rows = vec![
            row(&["Becky", "Female", "2. Sophomore", "SD", "Art"]),
            row(&["Benjamin", "Male"]),
            row(&[]),
        ];

        let (result, output, _) = print_rows(Some(rows)).await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(
            output.lines().collect::<Vec<_>>(),
            vec![
                "Becky, Art",
                "Benjamin, <missing>",
                "<missing>, <missing>"
            ]
        );
    }

    #[tokio::test]
    async fn test_print_fetch_error() {
        let (result, output, _) = print_rows(None).await;

        assert!(matches!(result, Err(AppError::Sheets(_))));
        assert!(output.is_empty());
    }
}
