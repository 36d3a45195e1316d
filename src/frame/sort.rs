// Sort engine for frames
// Author: Gabriel Demetrios Lafis

use std::ops::Deref;
use std::sync::Arc;

use crate::data::Value;
use crate::iterate::{collect_pairs, CachedIterable, Selector, SharedPairs};
use crate::series::{sort_pairs, SortKey};

use super::{ColumnSource, DataFrame};

/// Sort column forms accepted by the frame sort engine
///
/// A column may be named, addressed by its position in the declared
/// column list, or computed by a selector over the row.
#[derive(Clone)]
pub enum SortColumn {
    Name(String),
    Position(usize),
    Selector(Selector),
}

impl SortColumn {
    /// Create a sort column computed by a selector over the row
    pub fn selector(selector: impl Fn(&Value, &Value) -> Value + 'static) -> SortColumn {
        SortColumn::Selector(Arc::new(selector))
    }
}

impl From<&str> for SortColumn {
    fn from(name: &str) -> Self {
        SortColumn::Name(name.to_string())
    }
}

impl From<String> for SortColumn {
    fn from(name: String) -> Self {
        SortColumn::Name(name)
    }
}

impl From<usize> for SortColumn {
    fn from(position: usize) -> Self {
        SortColumn::Position(position)
    }
}

impl From<Selector> for SortColumn {
    fn from(selector: Selector) -> Self {
        SortColumn::Selector(selector)
    }
}

/// Build a selector that reads one named field of each row
fn field_selector(name: String) -> Selector {
    Arc::new(move |value: &Value, _: &Value| match value {
        Value::Record(record) => record.get(&name).cloned().unwrap_or(Value::Absent),
        _ => Value::Absent,
    })
}

/// Resolve a sort column against the declared column list
///
/// Positions address the declared column order, which stays
/// authoritative even when a record's own field order disagrees with
/// it. A position beyond the declared list keys on absent.
fn column_selector(column: &SortColumn, declared: &[String]) -> Selector {
    match column {
        SortColumn::Name(name) => field_selector(name.clone()),
        SortColumn::Position(position) => match declared.get(*position) {
            Some(name) => field_selector(name.clone()),
            None => Arc::new(|_: &Value, _: &Value| Value::Absent),
        },
        SortColumn::Selector(selector) => selector.clone(),
    }
}

/// A frame sorted by an accumulated sort column batch
///
/// Mirrors the series sort engine: sorting is deferred and cached, and
/// each `then_by` extends a cloned batch.
#[derive(Clone)]
pub struct SortedDataFrame {
    frame: DataFrame,
    source: SharedPairs,
    columns: ColumnSource,
    specs: Vec<(SortColumn, bool)>,
}

impl SortedDataFrame {
    /// Build a sorted frame over a source and sort column batch
    ///
    /// Column positions resolve at first consumption, against the
    /// declared column names of the unsorted frame.
    fn build(
        source: SharedPairs,
        columns: ColumnSource,
        specs: Vec<(SortColumn, bool)>,
    ) -> SortedDataFrame {
        let sort_source = source.clone();
        let sort_columns = columns.clone();
        let sort_specs = specs.clone();

        let iterable = Arc::new(CachedIterable::new(move || {
            let declared = DataFrame::from_pipeline(sort_source.clone(), sort_columns.clone())
                .column_names()?;

            let keys: Vec<SortKey> = sort_specs
                .iter()
                .map(|(column, descending)| {
                    SortKey::new(column_selector(column, &declared), *descending)
                })
                .collect();

            let pairs = collect_pairs(sort_source.as_ref())?;
            Ok(sort_pairs(pairs, &keys))
        }));

        SortedDataFrame {
            frame: DataFrame::from_pipeline(iterable, columns.clone()),
            source,
            columns,
            specs,
        }
    }

    /// Add a further ascending sort column
    pub fn then_by(&self, column: impl Into<SortColumn>) -> SortedDataFrame {
        let mut specs = self.specs.clone();
        specs.push((column.into(), false));
        SortedDataFrame::build(self.source.clone(), self.columns.clone(), specs)
    }

    /// Add a further descending sort column
    pub fn then_by_descending(&self, column: impl Into<SortColumn>) -> SortedDataFrame {
        let mut specs = self.specs.clone();
        specs.push((column.into(), true));
        SortedDataFrame::build(self.source.clone(), self.columns.clone(), specs)
    }

    /// Get the sorted pipeline as a plain frame
    pub fn as_frame(&self) -> DataFrame {
        self.frame.clone()
    }
}

impl Deref for SortedDataFrame {
    type Target = DataFrame;

    fn deref(&self) -> &DataFrame {
        &self.frame
    }
}

impl DataFrame {
    /// Sort rows ascending by a column
    pub fn order_by(&self, column: impl Into<SortColumn>) -> SortedDataFrame {
        SortedDataFrame::build(
            self.shared(),
            self.columns.clone(),
            vec![(column.into(), false)],
        )
    }

    /// Sort rows descending by a column
    pub fn order_by_descending(&self, column: impl Into<SortColumn>) -> SortedDataFrame {
        SortedDataFrame::build(
            self.shared(),
            self.columns.clone(),
            vec![(column.into(), true)],
        )
    }
}
