use std::collections::HashMap;
use std::io;

use crate::foundation::error::{ImprintError, ImprintResult};

/// Column-name to field-index mapping defined by the header row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnIndex {
    names: Vec<String>,
    by_name: HashMap<String, usize>,
}

impl ColumnIndex {
    /// Build the mapping from header names. A repeated name maps to its last position.
    pub fn from_header<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = header.into_iter().map(Into::into).collect();
        let by_name = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        Self { names, by_name }
    }

    /// Header names in column order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of header columns.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the header is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Field position of `name`, if the header defines it.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Resolve `key` against `row`.
    ///
    /// Fails with [`ImprintError::MissingColumn`] when the header lacks `key` or the row is too
    /// short to supply it.
    pub fn value<'r>(&self, row: &'r DataRow, key: &str) -> ImprintResult<&'r str> {
        let idx = self
            .index_of(key)
            .ok_or_else(|| ImprintError::missing_column(format!("'{key}' is not in the header")))?;
        row.get(idx).ok_or_else(|| {
            ImprintError::missing_column(format!(
                "'{key}' (field {idx}) is missing from a row with {} fields",
                row.len()
            ))
        })
    }
}

/// One record of the tabular input, fields in header order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataRow {
    fields: Vec<String>,
}

impl DataRow {
    /// Wrap record fields.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Field at `idx`.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx).map(String::as_str)
    }

    /// Number of fields supplied.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parsed tabular input: header mapping plus the rows that parsed cleanly.
#[derive(Clone, Debug, Default)]
pub struct DataTable {
    columns: ColumnIndex,
    rows: Vec<DataRow>,
    skipped_rows: u64,
}

impl DataTable {
    /// Build a table from already-parsed input.
    pub fn new(columns: ColumnIndex, rows: Vec<DataRow>) -> Self {
        Self {
            columns,
            rows,
            skipped_rows: 0,
        }
    }

    /// Read CSV with a mandatory header row.
    ///
    /// A missing or unreadable header is a [`ImprintError::Parse`]. Records may be shorter or
    /// longer than the header. A record that cannot be read is logged and skipped; reading
    /// continues with the next one.
    #[tracing::instrument(skip(reader))]
    pub fn from_csv_reader<R: io::Read>(reader: R) -> ImprintResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let header = rdr
            .headers()
            .map_err(|e| ImprintError::parse(format!("CSV header: {e}")))?
            .clone();
        if header.is_empty() {
            return Err(ImprintError::parse("CSV input has no header row"));
        }
        let columns = ColumnIndex::from_header(
            header
                .iter()
                .enumerate()
                .map(|(i, h)| if i == 0 { h.trim_start_matches('\u{feff}') } else { h }),
        );

        let mut rows = Vec::new();
        let mut skipped_rows = 0u64;
        for (record_no, record) in rdr.records().enumerate() {
            match record {
                Ok(r) => rows.push(DataRow::new(r.iter())),
                Err(error) => {
                    skipped_rows += 1;
                    tracing::warn!(record = record_no, %error, "skipping malformed CSV record");
                }
            }
        }

        Ok(Self {
            columns,
            rows,
            skipped_rows,
        })
    }

    /// Read CSV from an in-memory string.
    pub fn from_csv_str(csv_text: &str) -> ImprintResult<Self> {
        Self::from_csv_reader(csv_text.as_bytes())
    }

    /// Header mapping.
    pub fn columns(&self) -> &ColumnIndex {
        &self.columns
    }

    /// Rows in input order.
    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    /// Records dropped while reading.
    pub fn skipped_rows(&self) -> u64 {
        self.skipped_rows
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/table.rs"]
mod tests;
