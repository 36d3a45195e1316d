// Utility module for common functionality
// Author: Gabriel Demetrios Lafis

mod dates;
mod error;
mod logging;

pub use dates::*;
pub use error::*;
pub use logging::*;
