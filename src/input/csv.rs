use std::collections::BTreeMap;

/// One CSV data line zipped against the header row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardRow {
    fields: BTreeMap<String, String>,
}

impl CardRow {
    /// Build a row from `(column, value)` pairs. Later duplicates win.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Raw value for `column` (exact, case-sensitive name).
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Trimmed value for `column`, `None` when absent or blank.
    pub fn non_empty(&self, column: &str) -> Option<&str> {
        self.get(column).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Column names present on this row.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Parse CSV text into rows.
///
/// The first line is the header. Data lines are split on commas that are followed by an even
/// number of `"` characters, which keeps commas inside balanced quotes. Escaped quotes and
/// embedded newlines are not supported. Lines whose field count differs from the header are
/// dropped.
pub fn parse_csv(text: &str) -> Vec<CardRow> {
    let mut lines = text.split('\n');
    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers: Vec<&str> = header_line.split(',').map(str::trim).collect();

    let mut rows = Vec::new();
    for (idx, line) in lines.enumerate() {
        let cols = split_quoted(line);
        if cols.len() != headers.len() {
            tracing::debug!(
                line = idx + 2,
                fields = cols.len(),
                expected = headers.len(),
                "dropping csv line with mismatched field count"
            );
            continue;
        }
        rows.push(CardRow::from_pairs(
            headers
                .iter()
                .zip(cols)
                .map(|(h, v)| ((*h).to_string(), clean_value(v).to_string())),
        ));
    }
    rows
}

fn split_quoted(line: &str) -> Vec<&str> {
    let mut quotes_after = line.bytes().filter(|b| *b == b'"').count();
    let mut out = Vec::new();
    let mut start = 0;
    for (i, b) in line.bytes().enumerate() {
        match b {
            b'"' => quotes_after -= 1,
            b',' if quotes_after % 2 == 0 => {
                out.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&line[start..]);
    out
}

fn clean_value(v: &str) -> &str {
    let v = v.strip_suffix('\r').unwrap_or(v);
    let v = v.strip_prefix('"').unwrap_or(v);
    v.strip_suffix('"').unwrap_or(v)
}

#[cfg(test)]
#[path = "../../tests/unit/input/csv.rs"]
mod tests;
