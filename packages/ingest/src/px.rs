//! PX-Web CSV exports.
//!
//! An export starts with a title line and a blank line before the header:
//!
//! ```text
//! "Table 1.3 Tourist arrivals and nights ..."
//!
//! "Spatial unit","Countries","2023 01 Tourist arrivals",...
//! ```

use tourism_map_normalize::normalize_spaces;

use crate::IngestError;

/// Lines before the header row.
const PREAMBLE_LINES: usize = 2;

/// A wide PX table: one header row and string cells.
#[derive(Debug, Clone, Default)]
pub struct PxTable {
    /// Header cells with whitespace collapsed.
    pub headers: Vec<String>,
    /// Data rows, padded to the header width.
    pub rows: Vec<Vec<String>>,
}

impl PxTable {
    /// Index of the header equal to `name`, ignoring ASCII case.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    }

    /// Like [`PxTable::position`], failing with [`IngestError::MissingColumn`].
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::MissingColumn`] if no header matches.
    pub fn require(&self, table: &'static str, name: &'static str) -> Result<usize, IngestError> {
        self.position(name)
            .ok_or(IngestError::MissingColumn { table, column: name })
    }
}

/// Decodes an export. Invalid UTF-8 is replaced rather than rejected.
fn decode(table: &'static str, bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) => {
            log::warn!("[{table}] Not valid UTF-8 ({e}); replacing invalid bytes");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

/// Drops the first `n` lines.
fn skip_lines(text: &str, n: usize) -> &str {
    let mut rest = text;
    for _ in 0..n {
        match rest.find('\n') {
            Some(i) => rest = &rest[i + 1..],
            None => return "",
        }
    }
    rest
}

/// Reads a PX-Web CSV export.
///
/// # Errors
///
/// Returns [`IngestError::Csv`] if the body is not valid CSV.
pub fn read_px_csv(table: &'static str, bytes: &[u8]) -> Result<PxTable, IngestError> {
    let text = decode(table, bytes);
    let body = skip_lines(text.trim_start_matches('\u{feff}'), PREAMBLE_LINES);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| IngestError::Csv { table, source })?
        .iter()
        .map(|h| normalize_spaces(h.trim_start_matches('\u{feff}')))
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv { table, source })?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    log::debug!("[{table}] {} columns, {} rows", headers.len(), rows.len());
    Ok(PxTable { headers, rows })
}
