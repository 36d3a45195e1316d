// Rust Frame Pipeline Engine
// Author: Gabriel Demetrios Lafis

//! # Rust Frame Pipeline Engine
//!
//! A lazy, composable pipeline engine for indexed one- and
//! two-dimensional tabular data.
//!
//! ## Features
//!
//! - Indexed `Series` and `DataFrame` pipelines over dynamic values
//! - Lazy, re-startable operator chains that never mutate their sources
//! - Filtering, projection, flattening, windowing, joining and set operations
//! - Multi-key stable sorting with order-by / then-by chains
//! - Pivoting, merging and column management for frames
//! - CSV and JSON adapters at the boundary
//!
//! ## Example
//!
//! ```rust
//! use rust_frame_pipeline_engine::{Series, Value};
//!
//! // Build a series; nothing evaluates until a terminal call
//! let series = Series::new(vec![
//!     Value::Integer(10),
//!     Value::Integer(20),
//!     Value::Integer(30),
//! ]);
//!
//! let doubled = series
//!     .filter(|value, _| matches!(value, Value::Integer(i) if *i > 10))
//!     .select(|value, _| match value {
//!         Value::Integer(i) => Value::Integer(i * 2),
//!         other => other.clone(),
//!     });
//!
//! assert_eq!(
//!     doubled.to_values().unwrap(),
//!     vec![Value::Integer(40), Value::Integer(60)],
//! );
//! ```

pub mod data;
pub mod format;
pub mod frame;
pub mod iterate;
pub mod series;
pub mod utils;

// Re-export main types
pub use data::{Record, Value};
pub use frame::{Column, DataFrame, FrameSource, SeriesData, SortColumn, SortedDataFrame};
pub use series::{Series, SortedSeries, ValueSource};
pub use utils::{PipelineError, PipelineResult};
