//! File data extractor: spreadsheet and CSV ingestion.
//!
//! Dispatches on the file extension. Spreadsheets read the first sheet only;
//! CSVs read header + records positionally. File-sourced data carries a
//! fixed 0.9 confidence — more trustworthy than free-text extraction.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use tracing::debug;

use crate::error::{ChartError, Result, Stage};
use crate::types::{DataRow, DataValue, ExtractedData, ExtractionMethod};

const FILE_CONFIDENCE: f32 = 0.9;

/// Extract a row set from an uploaded file.
///
/// `.xlsx`/`.xls` go through the spreadsheet reader, `.csv` through the
/// line reader; anything else is a fatal `InvalidRequest`. Zero content
/// rows is `InsufficientData`.
pub fn extract_from_file(name: &str, bytes: &[u8]) -> Result<ExtractedData> {
    let extension = name
        .rsplit('.')
        .next()
        .map(str::to_lowercase)
        .unwrap_or_default();

    let data = match extension.as_str() {
        "xlsx" | "xls" => read_spreadsheet(name, bytes)?,
        "csv" => read_csv(name, bytes)?,
        other => {
            return Err(ChartError::invalid_request(
                Stage::DataExtraction,
                format!("unsupported file type '.{other}' for '{name}' (expected .xlsx, .xls, or .csv)"),
            ))
        }
    };

    if data.is_empty() {
        return Err(ChartError::insufficient_data(
            Stage::DataExtraction,
            format!("file '{name}' contains no data rows"),
        ));
    }

    debug!(file = name, rows = data.len(), "extracted rows from file");

    Ok(ExtractedData {
        data,
        confidence: FILE_CONFIDENCE,
        extraction_method: ExtractionMethod::FileParsing,
        warnings: Vec::new(),
    })
}

/// First sheet only: first row is the header row, fully-blank rows dropped,
/// each data row zipped against headers (blank header → synthetic
/// `Column_N`).
fn read_spreadsheet(name: &str, bytes: &[u8]) -> Result<Vec<DataRow>> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| wrap_read_error(name, &e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| {
            ChartError::insufficient_data(
                Stage::DataExtraction,
                format!("file '{name}' has no sheets"),
            )
        })?
        .map_err(|e| wrap_read_error(name, &e.to_string()))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };

    let headers: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let text = cell.to_string().trim().to_string();
            if text.is_empty() {
                format!("Column_{}", i + 1)
            } else {
                text
            }
        })
        .collect();

    let data = rows
        .filter(|cells| !cells.iter().all(cell_is_blank))
        .map(|cells| {
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let value = cells.get(i).map_or(DataValue::Null, convert_cell);
                    (header.clone(), value)
                })
                .collect()
        })
        .collect();

    Ok(data)
}

fn cell_is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn convert_cell(cell: &Data) -> DataValue {
    match cell {
        Data::Empty | Data::Error(_) => DataValue::Null,
        Data::Int(i) => DataValue::Number(*i as f64),
        Data::Float(f) => DataValue::Number(*f),
        Data::Bool(b) => DataValue::Bool(*b),
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                DataValue::Null
            } else {
                DataValue::Text(trimmed.to_string())
            }
        }
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or(DataValue::Null, |ndt| DataValue::Date(ndt.date())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => DataValue::Text(s.clone()),
    }
}

/// First record is the header (comma-split, trimmed); subsequent records are
/// zipped positionally. Short rows are null-padded; surplus cells land in
/// synthetic `Column_N` fields.
fn read_csv(name: &str, bytes: &[u8]) -> Result<Vec<DataRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records = reader.records();

    let headers: Vec<String> = match records.next() {
        Some(record) => record
            .map_err(|e| wrap_read_error(name, &e.to_string()))?
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let text = cell.trim().to_string();
                if text.is_empty() {
                    format!("Column_{}", i + 1)
                } else {
                    text
                }
            })
            .collect(),
        None => return Ok(Vec::new()),
    };

    let mut data = Vec::new();
    for record in records {
        let record = record.map_err(|e| wrap_read_error(name, &e.to_string()))?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let width = headers.len().max(record.len());
        let row: DataRow = (0..width)
            .map(|i| {
                let header = headers
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("Column_{}", i + 1));
                let value = match record.get(i).map(str::trim) {
                    None | Some("") => DataValue::Null,
                    Some(cell) => DataValue::Text(cell.to_string()),
                };
                (header, value)
            })
            .collect();
        data.push(row);
    }

    Ok(data)
}

fn wrap_read_error(name: &str, detail: &str) -> ChartError {
    ChartError::unknown(
        Stage::DataExtraction,
        format!("failed to read '{name}': {detail}"),
        Some(detail.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_csv_happy_path() {
        let csv = b"city,sales\nBeijing,1200\nShanghai,950\n";
        let extracted = extract_from_file("sales.csv", csv).unwrap();

        assert_eq!(extracted.extraction_method, ExtractionMethod::FileParsing);
        assert_eq!(extracted.confidence, 0.9);
        assert_eq!(extracted.data.len(), 2);
        assert_eq!(extracted.data[0]["city"], DataValue::Text("Beijing".into()));
        assert_eq!(extracted.data[1]["sales"], DataValue::Text("950".into()));
    }

    #[test]
    fn test_csv_blank_rows_and_padding() {
        let csv = b"a,b\n1,2\n,\n3\n";
        let extracted = extract_from_file("data.csv", csv).unwrap();

        // Fully-blank row dropped; short row null-padded.
        assert_eq!(extracted.data.len(), 2);
        assert_eq!(extracted.data[1]["a"], DataValue::Text("3".into()));
        assert_eq!(extracted.data[1]["b"], DataValue::Null);
    }

    #[test]
    fn test_csv_synthetic_headers() {
        let csv = b"a,,c\n1,2,3\n";
        let extracted = extract_from_file("data.csv", csv).unwrap();
        let keys: Vec<&str> = extracted.data[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "Column_2", "c"]);
    }

    #[test]
    fn test_empty_csv_is_insufficient_data() {
        let err = extract_from_file("empty.csv", b"a,b\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientData);
        assert!(err.to_string().contains("empty.csv"));
    }

    #[test]
    fn test_unsupported_extension_is_invalid_request() {
        let err = extract_from_file("notes.txt", b"hello").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn test_corrupt_spreadsheet_wraps_filename() {
        let err = extract_from_file("broken.xlsx", b"definitely not a workbook").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownError);
        assert!(err.to_string().contains("broken.xlsx"));
    }
}
