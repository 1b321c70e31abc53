//! Turns fetched file payloads into the small tables shown in previews.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Reader};

use crate::error::DecodeError;

/// Maximum number of rows kept in any [`PreviewGrid`].
pub const PREVIEW_ROW_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewGrid {
    rows: Vec<Vec<String>>,
}

impl PreviewGrid {
    /// Keeps at most [`PREVIEW_ROW_LIMIT`] rows.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        Self {
            rows: rows.into_iter().take(PREVIEW_ROW_LIMIT).collect(),
        }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub trait TabularDecoder {
    /// Decodes up to `limit` rows from a non-empty payload.
    fn decode_rows(&self, payload: &[u8], limit: usize) -> Result<Vec<Vec<String>>, DecodeError>;
}

/// Comma-separated text. Lines are split on `\n` and cells on every `,`;
/// quoted fields are not recognised, so a quoted comma still splits.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedTextDecoder;

impl TabularDecoder for DelimitedTextDecoder {
    fn decode_rows(&self, payload: &[u8], limit: usize) -> Result<Vec<Vec<String>>, DecodeError> {
        let text = std::str::from_utf8(payload)?.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        Ok(text
            .split('\n')
            .take(limit)
            .map(|line| {
                line.strip_suffix('\r')
                    .unwrap_or(line)
                    .split(',')
                    .map(str::to_owned)
                    .collect()
            })
            .collect())
    }
}

/// Workbook formats calamine understands (xlsx, xlsm, xlsb, xls, ods).
/// Only the first declared sheet is read, starting at its first used row.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadsheetDecoder;

impl TabularDecoder for SpreadsheetDecoder {
    fn decode_rows(&self, payload: &[u8], limit: usize) -> Result<Vec<Vec<String>>, DecodeError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(payload))
            .map_err(|e| DecodeError::Workbook(e.to_string()))?;

        let first_sheet = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(DecodeError::NoSheets)?;
        let range = workbook
            .worksheet_range(&first_sheet)
            .map_err(|e| DecodeError::Workbook(e.to_string()))?;

        Ok(range
            .rows()
            .take(limit)
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect())
    }
}

/// Decodes `payload` into a preview grid. An empty payload is an empty grid
/// for every decoder.
pub fn decode_preview(
    decoder: &dyn TabularDecoder,
    payload: &[u8],
) -> Result<PreviewGrid, DecodeError> {
    if payload.is_empty() {
        return Ok(PreviewGrid::default());
    }
    decoder
        .decode_rows(payload, PREVIEW_ROW_LIMIT)
        .map(PreviewGrid::from_rows)
}
