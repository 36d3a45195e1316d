// CSV adapter between text and frames
// Author: Gabriel Demetrios Lafis

use std::fs;
use std::path::Path;

use log::info;

use crate::data::Value;
use crate::frame::DataFrame;
use crate::utils::{PipelineError, PipelineResult};

use super::CsvOptions;

/// Parse CSV text into a frame of string-valued cells
///
/// Every cell is a string value; empty cells become the absent sentinel.
/// Without a header row, columns are named column_0, column_1, ...
pub fn from_csv(text: &str, options: &CsvOptions) -> PipelineResult<DataFrame> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter as u8)
        .has_headers(options.has_header)
        .from_reader(text.as_bytes());

    let mut column_names: Vec<String> = if options.has_header {
        reader
            .headers()
            .map_err(|err| PipelineError::ParseError(err.to_string()))?
            .iter()
            .map(|name| name.to_string())
            .collect()
    } else {
        Vec::new()
    };

    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|err| PipelineError::ParseError(err.to_string()))?;

        let row: Vec<Value> = record
            .iter()
            .map(|cell| {
                if cell.is_empty() {
                    Value::Absent
                } else {
                    Value::String(cell.to_string())
                }
            })
            .collect();

        rows.push(row);
    }

    if !options.has_header {
        let width = rows.first().map_or(0, |row: &Vec<Value>| row.len());
        column_names = (0..width).map(|slot| format!("column_{}", slot)).collect();
    }

    DataFrame::from_rows(column_names, rows)
}

/// Serialize a frame into CSV text
///
/// Headers are the declared column names; absent and null cells render
/// empty. Quoting follows RFC 4180 via the CSV writer.
pub fn to_csv(frame: &DataFrame, options: &CsvOptions) -> PipelineResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter as u8)
        .from_writer(Vec::new());

    let column_names = frame.column_names()?;

    writer
        .write_record(&column_names)
        .map_err(|err| PipelineError::ParseError(err.to_string()))?;

    for row in frame.to_rows()? {
        let cells: Vec<String> = row.iter().map(|value| value.display_string()).collect();

        writer
            .write_record(&cells)
            .map_err(|err| PipelineError::ParseError(err.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| PipelineError::ParseError(err.to_string()))?;

    String::from_utf8(bytes).map_err(|err| PipelineError::ParseError(err.to_string()))
}

/// Load a frame from a CSV file
pub fn load_csv_file<P: AsRef<Path>>(path: P, options: &CsvOptions) -> PipelineResult<DataFrame> {
    let text = fs::read_to_string(&path)?;
    let frame = from_csv(&text, options)?;
    info!("loaded CSV file {}", path.as_ref().display());
    Ok(frame)
}

/// Save a frame to a CSV file
pub fn save_csv_file<P: AsRef<Path>>(
    frame: &DataFrame,
    path: P,
    options: &CsvOptions,
) -> PipelineResult<()> {
    let text = to_csv(frame, options)?;
    fs::write(&path, text)?;
    info!("saved CSV file {}", path.as_ref().display());
    Ok(())
}

impl DataFrame {
    /// Serialize this frame into CSV text with default options
    pub fn to_csv(&self) -> PipelineResult<String> {
        to_csv(self, &CsvOptions::default())
    }
}
