// Format adapters at the pipeline boundary
// Author: Gabriel Demetrios Lafis

mod csv;
mod json;

pub use csv::*;
pub use json::*;

use serde::{Deserialize, Serialize};

/// CSV adapter options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvOptions {
    pub delimiter: char,
    pub has_header: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: ',',
            has_header: true,
        }
    }
}

/// JSON adapter options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOptions {
    pub pretty: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        JsonOptions { pretty: false }
    }
}
