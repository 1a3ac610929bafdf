use serde_json::Value;

/// One row of a value range, cells in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row(Vec<String>);

impl Row {
    /// Cell at `index`, or `None` when the row is shorter than that.
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self(values.into_iter().map(cell_text).collect())
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

// Cells come back formatted as strings; anything else is kept as JSON text.
fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
