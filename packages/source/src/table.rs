//! CSV reading with header lookup by normalized name.
//!
//! Source files are not guaranteed to have byte-identical headers (a BOM on
//! the first column, `"County Key"` vs `"county_key"`), so columns are found
//! through [`normalize_header`] and a list of accepted aliases rather than by
//! position.

use std::collections::BTreeMap;

use csv::StringRecord;
use tourism_map_normalize::normalize_header;

use crate::SourceError;
use crate::files::SourceKind;

/// Maps normalized header names to column positions.
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    columns: BTreeMap<String, usize>,
}

impl HeaderIndex {
    /// Builds the index. When two headers normalize to the same name, the
    /// leftmost column wins.
    pub fn new<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut columns = BTreeMap::new();
        for (i, header) in headers.into_iter().enumerate() {
            columns.entry(normalize_header(header)).or_insert(i);
        }
        Self { columns }
    }

    /// Position of the first alias present in the header row.
    #[must_use]
    pub fn find(&self, aliases: &[&str]) -> Option<usize> {
        aliases
            .iter()
            .find_map(|alias| self.columns.get(&normalize_header(alias)).copied())
    }

    /// Number of distinct normalized headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the header row was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A fully read CSV file.
#[derive(Debug)]
pub struct CsvTable {
    /// Which input this table came from (for log messages).
    pub kind: SourceKind,
    /// Header lookup.
    pub headers: HeaderIndex,
    /// Data rows in file order.
    pub records: Vec<StringRecord>,
}

impl CsvTable {
    /// Parses `bytes` as a comma-separated table with a header row.
    ///
    /// Malformed data rows are skipped with a warning; an unreadable header
    /// row is an error.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Csv`] if the header row cannot be read.
    pub fn read(kind: SourceKind, bytes: &[u8]) -> Result<Self, SourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(bytes);

        let headers = HeaderIndex::new(
            reader
                .headers()
                .map_err(|source| SourceError::Csv { kind, source })?
                .iter(),
        );

        let mut records = Vec::new();
        let mut malformed = 0_usize;
        for result in reader.records() {
            match result {
                Ok(record) => records.push(record),
                Err(e) => {
                    log::debug!("[{kind}] Skipping malformed CSV row: {e}");
                    malformed += 1;
                }
            }
        }
        if malformed > 0 {
            log::warn!("[{kind}] Skipped {malformed} malformed CSV rows");
        }

        log::debug!(
            "[{kind}] Read {} rows with {} columns",
            records.len(),
            headers.len()
        );

        Ok(Self {
            kind,
            headers,
            records,
        })
    }

    /// Looks up a column, logging a warning when none of the aliases is
    /// present. `name` is only used in the message.
    #[must_use]
    pub fn column(&self, name: &str, aliases: &[&str]) -> Option<usize> {
        let column = self.headers.find(aliases);
        if column.is_none() {
            log::warn!(
                "[{}] Column '{name}' not found (tried {aliases:?}); values will be empty",
                self.kind
            );
        }
        column
    }

    /// Like [`CsvTable::column`] but for optional columns that are allowed
    /// to be missing without a warning.
    #[must_use]
    pub fn optional_column(&self, aliases: &[&str]) -> Option<usize> {
        self.headers.find(aliases)
    }
}

/// Returns the trimmed cell at `column`, or `""` when the column is missing
/// or the row is short.
#[must_use]
pub fn cell(record: &StringRecord, column: Option<usize>) -> &str {
    column.and_then(|i| record.get(i)).map_or("", str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_columns_regardless_of_header_format() {
        let csv = "\u{feff}County Key,YEAR, month ,Tourist arrivals\nistarska,2023,6,10\n";
        let table = CsvTable::read(SourceKind::Monthly, csv.as_bytes()).unwrap();
        assert_eq!(table.headers.find(&["county_key"]), Some(0));
        assert_eq!(table.headers.find(&["year"]), Some(1));
        assert_eq!(table.headers.find(&["month"]), Some(2));
        assert_eq!(table.headers.find(&["arrivals", "tourist arrivals"]), Some(3));
        assert_eq!(table.headers.find(&["nights"]), None);
        assert_eq!(table.records.len(), 1);
    }

    #[test]
    fn short_rows_yield_empty_cells() {
        let csv = "a,b,c\n1,2\n";
        let table = CsvTable::read(SourceKind::Monthly, csv.as_bytes()).unwrap();
        let record = &table.records[0];
        assert_eq!(cell(record, Some(0)), "1");
        assert_eq!(cell(record, Some(2)), "");
        assert_eq!(cell(record, None), "");
    }

    #[test]
    fn leftmost_duplicate_header_wins() {
        let index = HeaderIndex::new(["Year", "year "]);
        assert_eq!(index.find(&["year"]), Some(0));
        assert_eq!(index.len(), 1);
    }
}
