// JSON adapter between text and frames
// Author: Gabriel Demetrios Lafis

use std::fs;
use std::path::Path;

use log::info;
use serde_json::Value as JsonValue;

use crate::data::{json_to_value, value_to_json, Record, Value};
use crate::frame::DataFrame;
use crate::utils::{PipelineError, PipelineResult};

use super::JsonOptions;

/// Parse JSON text into a frame
///
/// The root must be an array of objects; JSON null becomes the explicit
/// null value and missing keys stay absent.
pub fn from_json(text: &str) -> PipelineResult<DataFrame> {
    let json: JsonValue = serde_json::from_str(text)
        .map_err(|err| PipelineError::ParseError(err.to_string()))?;

    let array = json.as_array().ok_or_else(|| {
        PipelineError::ParseError("JSON root must be an array of objects".to_string())
    })?;

    let mut records = Vec::with_capacity(array.len());

    for item in array {
        let object = item.as_object().ok_or_else(|| {
            PipelineError::ParseError("JSON array element must be an object".to_string())
        })?;

        let mut record = Record::new();

        for (name, value) in object {
            record.set(name, json_to_value(value));
        }

        records.push(record);
    }

    Ok(DataFrame::from_records(records))
}

/// Serialize a frame into JSON text as an array of records
///
/// Absent fields are omitted; only declared columns are exposed.
pub fn to_json(frame: &DataFrame, options: &JsonOptions) -> PipelineResult<String> {
    let mut array = Vec::new();

    for record in frame.to_records()? {
        array.push(value_to_json(&Value::Record(record))?);
    }

    let json = JsonValue::Array(array);

    let text = if options.pretty {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    };

    text.map_err(|err| PipelineError::ParseError(err.to_string()))
}

/// Load a frame from a JSON file
pub fn load_json_file<P: AsRef<Path>>(path: P) -> PipelineResult<DataFrame> {
    let text = fs::read_to_string(&path)?;
    let frame = from_json(&text)?;
    info!("loaded JSON file {}", path.as_ref().display());
    Ok(frame)
}

/// Save a frame to a JSON file
pub fn save_json_file<P: AsRef<Path>>(
    frame: &DataFrame,
    path: P,
    options: &JsonOptions,
) -> PipelineResult<()> {
    let text = to_json(frame, options)?;
    fs::write(&path, text)?;
    info!("saved JSON file {}", path.as_ref().display());
    Ok(())
}

impl DataFrame {
    /// Serialize this frame into JSON text with default options
    pub fn to_json(&self) -> PipelineResult<String> {
        to_json(self, &JsonOptions::default())
    }
}
