// Frame module for the indexed two-dimensional pipeline
// Author: Gabriel Demetrios Lafis

mod reshape;
mod sort;

pub use sort::*;

use std::fmt;
use std::sync::Arc;

use crate::data::{Record, Value};
use crate::iterate::{
    collect_pairs, ensure_restartable, ArrayPairs, ArrayValues, CachedIterable, ConcatIterable,
    CountValues, EmptyPairs, ExtractValues, FallibleSelectIterable, FilterIterable, MultiValues,
    Pair, PairZipIterable, SelectIterable, SelectManyIterable, SelectPairsIterable, SharedPairs,
    SharedValues, SkipIterable, SkipWhileIterable, TakeIterable, TakeWhileIterable, ZipPairs,
};
use crate::series::{Series, ValueSource};
use crate::utils::{PipelineError, PipelineResult};

/// Where a frame's column names come from
///
/// An explicit list is authoritative; otherwise names are inferred from
/// the first record, or from the distinct union over every record when
/// all rows are considered.
#[derive(Clone)]
pub enum ColumnSource {
    Known(Arc<Vec<String>>),
    Infer { consider_all_rows: bool },
}

impl ColumnSource {
    /// Column names declared explicitly
    pub fn known(names: Vec<String>) -> ColumnSource {
        ColumnSource::Known(Arc::new(names))
    }

    /// Column names inferred from the first record
    pub fn infer_first() -> ColumnSource {
        ColumnSource::Infer {
            consider_all_rows: false,
        }
    }

    /// Column names inferred from every record
    pub fn infer_all() -> ColumnSource {
        ColumnSource::Infer {
            consider_all_rows: true,
        }
    }
}

/// Payload forms accepted by the frame constructor
///
/// Exactly one form is active at a time; the tagged variant makes
/// incompatible combinations unrepresentable.
pub enum FrameSource {
    Empty,
    Records(Vec<Record>),
    Rows {
        column_names: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
    Columns(Vec<(String, Vec<Value>)>),
    Iterable(SharedPairs),
}

/// A named column paired with its value series
pub struct Column {
    pub name: String,
    pub series: Series,
}

/// Data forms accepted when setting a series on a frame
pub enum SeriesData {
    Values(Vec<Value>),
    Series(Series),
}

impl From<Vec<Value>> for SeriesData {
    fn from(values: Vec<Value>) -> Self {
        SeriesData::Values(values)
    }
}

impl From<Series> for SeriesData {
    fn from(series: Series) -> Self {
        SeriesData::Series(series)
    }
}

impl From<&Series> for SeriesData {
    fn from(series: &Series) -> Self {
        SeriesData::Series(series.clone())
    }
}

/// Check a column name list for duplicates
fn check_unique(names: &[String]) -> PipelineResult<()> {
    for i in 0..names.len() {
        for j in (i + 1)..names.len() {
            if names[i] == names[j] {
                return Err(PipelineError::InvalidArgument(
                    format!("duplicate column name '{}'", names[i])
                ));
            }
        }
    }

    Ok(())
}

/// Extract the record payload of a pair value
fn expect_record(value: &Value) -> PipelineResult<&Record> {
    match value {
        Value::Record(record) => Ok(record),
        other => Err(PipelineError::TypeMismatch(
            format!("frame rows must be records, got {}", other.type_name())
        )),
    }
}

/// Represents an indexed two-dimensional sequence of record pairs
///
/// A frame is a series whose values are records, together with an
/// ordered column-name vector that governs iteration and serialization
/// order. Records may carry extra fields; only declared columns are
/// exposed by the serializers.
#[derive(Clone)]
pub struct DataFrame {
    iterable: SharedPairs,
    columns: ColumnSource,
}

impl fmt::Debug for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "DataFrame {{ .. }}")
    }
}

impl DataFrame {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create an empty frame with no columns
    pub fn empty() -> DataFrame {
        DataFrame {
            iterable: Arc::new(EmptyPairs),
            columns: ColumnSource::known(Vec::new()),
        }
    }

    /// Create a frame from one of the accepted payload forms
    pub fn new(source: FrameSource) -> PipelineResult<DataFrame> {
        match source {
            FrameSource::Empty => Ok(DataFrame::empty()),
            FrameSource::Records(records) => Ok(DataFrame::from_records(records)),
            FrameSource::Rows { column_names, rows } => {
                DataFrame::from_rows(column_names, rows)
            },
            FrameSource::Columns(columns) => DataFrame::from_columns(columns),
            FrameSource::Iterable(iterable) => {
                Ok(DataFrame::from_pipeline(iterable, ColumnSource::infer_first()))
            },
        }
    }

    /// Create a frame from records, inferring columns from the first one
    pub fn from_records(records: Vec<Record>) -> DataFrame {
        let pairs = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| {
                (Value::Integer(position as i64), Value::Record(record))
            })
            .collect();

        DataFrame {
            iterable: Arc::new(ArrayPairs::new(pairs)),
            columns: ColumnSource::infer_first(),
        }
    }

    /// Create a frame from records, inferring columns from every record
    ///
    /// This is the consider-all-rows form: the column list is the
    /// distinct union of field names in first-occurrence order.
    pub fn from_records_all(records: Vec<Record>) -> DataFrame {
        let frame = DataFrame::from_records(records);

        DataFrame {
            iterable: frame.iterable,
            columns: ColumnSource::infer_all(),
        }
    }

    /// Create a frame from explicit column names and rows of values
    pub fn from_rows(column_names: Vec<String>, rows: Vec<Vec<Value>>) -> PipelineResult<DataFrame> {
        check_unique(&column_names)?;

        let pairs = rows
            .into_iter()
            .enumerate()
            .map(|(position, row)| {
                let mut record = Record::new();

                for (slot, name) in column_names.iter().enumerate() {
                    let value = row.get(slot).cloned().unwrap_or(Value::Absent);

                    if !value.is_absent() {
                        record.set(name, value);
                    }
                }

                (Value::Integer(position as i64), Value::Record(record))
            })
            .collect();

        Ok(DataFrame {
            iterable: Arc::new(ArrayPairs::new(pairs)),
            columns: ColumnSource::known(column_names),
        })
    }

    /// Create a frame from named column arrays
    ///
    /// Columns are zipped in lockstep, so the row count is the length of
    /// the shortest column.
    pub fn from_columns(columns: Vec<(String, Vec<Value>)>) -> PipelineResult<DataFrame> {
        let names: Vec<String> = columns.iter().map(|(name, _)| name.clone()).collect();
        check_unique(&names)?;

        let sources: Vec<SharedValues> = columns
            .into_iter()
            .map(|(_, values)| Arc::new(ArrayValues::new(values)) as SharedValues)
            .collect();

        let zipped = Arc::new(ZipPairs::new(
            Arc::new(CountValues),
            Arc::new(MultiValues::new(sources)),
        ));

        let record_names = names.clone();
        let iterable = Arc::new(SelectIterable::new(
            zipped,
            Arc::new(move |value: &Value, _: &Value| {
                let mut record = Record::new();

                if let Value::Array(items) = value {
                    for (slot, name) in record_names.iter().enumerate() {
                        if let Some(item) = items.get(slot) {
                            if !item.is_absent() {
                                record.set(name, item.clone());
                            }
                        }
                    }
                }

                Value::Record(record)
            }),
        ));

        Ok(DataFrame {
            iterable,
            columns: ColumnSource::known(names),
        })
    }

    /// Create a frame from a payload form re-paired with an index source
    pub fn with_index(
        source: FrameSource,
        index: impl Into<ValueSource>,
    ) -> PipelineResult<DataFrame> {
        let frame = DataFrame::new(source)?;

        Ok(DataFrame {
            iterable: Arc::new(ZipPairs::new(
                index.into().into_values(),
                Arc::new(ExtractValues::values(frame.iterable)),
            )),
            columns: frame.columns,
        })
    }

    /// Create a frame over an existing pipeline with a column source
    pub(crate) fn from_pipeline(iterable: SharedPairs, columns: ColumnSource) -> DataFrame {
        DataFrame { iterable, columns }
    }

    /// Get the underlying pair iterable
    pub fn shared(&self) -> SharedPairs {
        self.iterable.clone()
    }

    /// Check whether two frames share the same pipeline
    pub(crate) fn same_pipeline(&self, other: &DataFrame) -> bool {
        Arc::ptr_eq(&self.iterable, &other.iterable)
    }

    /// Wrap a derived pipeline that keeps this frame's columns
    fn derive(&self, iterable: SharedPairs) -> DataFrame {
        DataFrame {
            iterable,
            columns: self.columns.clone(),
        }
    }

    /// View the record stream as a plain series
    pub fn as_series(&self) -> Series {
        Series::from_iterable(self.shared())
    }

    // ------------------------------------------------------------------
    // Column names
    // ------------------------------------------------------------------

    /// Get the ordered column names of this frame
    pub fn column_names(&self) -> PipelineResult<Vec<String>> {
        match &self.columns {
            ColumnSource::Known(names) => Ok((**names).clone()),
            ColumnSource::Infer { consider_all_rows } => {
                let mut cursor = self.iterable.cursor();
                let mut names: Vec<String> = Vec::new();

                while cursor.advance()? {
                    let (_, value) = cursor.current();
                    let record = expect_record(&value)?;

                    for name in record.field_names() {
                        if !names.contains(&name) {
                            names.push(name);
                        }
                    }

                    if !consider_all_rows {
                        break;
                    }
                }

                Ok(names)
            },
        }
    }

    /// Check whether the frame declares the given column
    pub fn has_series(&self, name: &str) -> PipelineResult<bool> {
        Ok(self.column_names()?.iter().any(|column| column == name))
    }

    // ------------------------------------------------------------------
    // Column access
    // ------------------------------------------------------------------

    /// Get a column as a series of its non-absent values
    pub fn get_series(&self, name: &str) -> Series {
        let field = name.to_string();

        let selected = Arc::new(SelectIterable::new(
            self.shared(),
            Arc::new(move |value: &Value, _: &Value| match value {
                Value::Record(record) => {
                    record.get(&field).cloned().unwrap_or(Value::Absent)
                },
                _ => Value::Absent,
            }),
        ));

        Series::from_iterable(Arc::new(FilterIterable::new(
            selected,
            Arc::new(|value: &Value, _: &Value| !value.is_absent()),
        )))
    }

    /// Get a column as a series, failing if the column is not declared
    pub fn expect_series(&self, name: &str) -> PipelineResult<Series> {
        if self.has_series(name)? {
            Ok(self.get_series(name))
        } else {
            Err(PipelineError::UnknownColumn(name.to_string()))
        }
    }

    /// Get every declared column paired with its series
    pub fn get_columns(&self) -> PipelineResult<Vec<Column>> {
        Ok(self
            .column_names()?
            .into_iter()
            .map(|name| {
                let series = self.get_series(&name);
                Column { name, series }
            })
            .collect())
    }

    // ------------------------------------------------------------------
    // Column mutation
    // ------------------------------------------------------------------

    /// Extend a column list with a name unless already present
    fn columns_with(&self, name: &str) -> PipelineResult<ColumnSource> {
        let mut names = self.column_names()?;

        if !names.iter().any(|column| column == name) {
            names.push(name.to_string());
        }

        Ok(ColumnSource::known(names))
    }

    /// Replace or append a column from positional values or a series
    ///
    /// Positional values zip row by row, so the frame truncates to the
    /// shorter of the two streams; a series is re-paired through the
    /// frame's index, missing indexes contributing the absent sentinel.
    pub fn set_series(
        &self,
        name: &str,
        data: impl Into<SeriesData>,
    ) -> PipelineResult<DataFrame> {
        let columns = self.columns_with(name)?;

        let iterable: SharedPairs = match data.into() {
            SeriesData::Values(values) => {
                let field = name.to_string();
                let value_pairs = Arc::new(ZipPairs::new(
                    Arc::new(CountValues),
                    Arc::new(ArrayValues::new(values)),
                ));

                Arc::new(PairZipIterable::new(
                    vec![self.shared(), value_pairs],
                    Arc::new(move |pairs: &[Pair]| {
                        let mut record = match &pairs[0].1 {
                            Value::Record(record) => record.clone(),
                            _ => Record::new(),
                        };
                        record.set(&field, pairs[1].1.clone());
                        Value::Record(record)
                    }),
                ))
            },
            SeriesData::Series(series) => {
                let field = name.to_string();
                let source = self.shared();
                let other = series.shared();

                Arc::new(CachedIterable::new(move || {
                    let other_pairs = collect_pairs(other.as_ref())?;
                    let pairs = collect_pairs(source.as_ref())?;
                    let mut result = Vec::with_capacity(pairs.len());

                    for (index, value) in pairs {
                        let mut record = expect_record(&value)?.clone();

                        let looked_up = other_pairs
                            .iter()
                            .find(|(other_index, _)| *other_index == index)
                            .map(|(_, other_value)| other_value.clone())
                            .unwrap_or(Value::Absent);

                        record.set(&field, looked_up);
                        result.push((index, Value::Record(record)));
                    }

                    Ok(result)
                }))
            },
        };

        Ok(DataFrame { iterable, columns })
    }

    /// Replace or append a column computed from each row
    pub fn set_series_with(
        &self,
        name: &str,
        generator: impl Fn(&Value, &Value) -> Value + 'static,
    ) -> PipelineResult<DataFrame> {
        let columns = self.columns_with(name)?;
        let field = name.to_string();

        let iterable = Arc::new(SelectIterable::new(
            self.shared(),
            Arc::new(move |value: &Value, index: &Value| {
                let mut record = match value {
                    Value::Record(record) => record.clone(),
                    _ => Record::new(),
                };
                record.set(&field, generator(value, index));
                Value::Record(record)
            }),
        ));

        Ok(DataFrame { iterable, columns })
    }

    /// Remove columns from the declared list
    pub fn drop_series(&self, names: &[&str]) -> PipelineResult<DataFrame> {
        let kept: Vec<String> = self
            .column_names()?
            .into_iter()
            .filter(|column| !names.contains(&column.as_str()))
            .collect();

        Ok(DataFrame {
            iterable: self.shared(),
            columns: ColumnSource::known(kept),
        })
    }

    /// Keep only the requested columns, in the requested order
    pub fn keep_series(&self, names: &[&str]) -> PipelineResult<DataFrame> {
        let declared = self.column_names()?;

        let kept: Vec<String> = names
            .iter()
            .filter(|name| declared.iter().any(|column| column == *name))
            .map(|name| name.to_string())
            .collect();

        Ok(DataFrame {
            iterable: self.shared(),
            columns: ColumnSource::known(kept),
        })
    }

    /// Rename columns, rewriting both the declared list and the records
    pub fn rename_series(&self, renames: &[(&str, &str)]) -> PipelineResult<DataFrame> {
        let mut names = self.column_names()?;

        for (old, new) in renames {
            let slot = names
                .iter()
                .position(|column| column == old)
                .ok_or_else(|| PipelineError::UnknownColumn(old.to_string()))?;
            names[slot] = new.to_string();
        }

        check_unique(&names)?;

        let mapping: Vec<(String, String)> = renames
            .iter()
            .map(|(old, new)| (old.to_string(), new.to_string()))
            .collect();

        let iterable = Arc::new(SelectIterable::new(
            self.shared(),
            Arc::new(move |value: &Value, _: &Value| {
                let record = match value {
                    Value::Record(record) => record,
                    _ => return value.clone(),
                };

                let fields = record
                    .iter()
                    .map(|(field, field_value)| {
                        let renamed = mapping
                            .iter()
                            .find(|(old, _)| old == field)
                            .map(|(_, new)| new.clone())
                            .unwrap_or_else(|| field.clone());
                        (renamed, field_value.clone())
                    })
                    .collect();

                Value::Record(Record::from_fields(fields))
            }),
        ));

        Ok(DataFrame {
            iterable,
            columns: ColumnSource::known(names),
        })
    }

    /// Replace the declared column list outright
    ///
    /// Reorders and prunes existing columns; names with no record field
    /// serialize as absent.
    pub fn remap_columns(&self, names: &[&str]) -> PipelineResult<DataFrame> {
        let remapped: Vec<String> = names.iter().map(|name| name.to_string()).collect();
        check_unique(&remapped)?;

        Ok(DataFrame {
            iterable: self.shared(),
            columns: ColumnSource::known(remapped),
        })
    }

    /// Move the given columns to the front of the declared order
    pub fn bring_to_front(&self, names: &[&str]) -> PipelineResult<DataFrame> {
        let declared = self.column_names()?;
        let mut reordered: Vec<String> = Vec::with_capacity(declared.len());

        for name in names {
            if declared.iter().any(|column| column == name) {
                reordered.push(name.to_string());
            }
        }

        for column in declared {
            if !reordered.contains(&column) {
                reordered.push(column);
            }
        }

        Ok(DataFrame {
            iterable: self.shared(),
            columns: ColumnSource::known(reordered),
        })
    }

    /// Move the given columns to the back of the declared order
    pub fn bring_to_back(&self, names: &[&str]) -> PipelineResult<DataFrame> {
        let declared = self.column_names()?;
        let mut reordered: Vec<String> = declared
            .iter()
            .filter(|column| !names.contains(&column.as_str()))
            .cloned()
            .collect();

        for name in names {
            if declared.iter().any(|column| column == name) {
                reordered.push(name.to_string());
            }
        }

        Ok(DataFrame {
            iterable: self.shared(),
            columns: ColumnSource::known(reordered),
        })
    }

    // ------------------------------------------------------------------
    // Column derivation
    // ------------------------------------------------------------------

    /// Transform the values of an existing column
    ///
    /// The selector receives the column value and the row index.
    pub fn transform_series(
        &self,
        name: &str,
        selector: impl Fn(&Value, &Value) -> Value + 'static,
    ) -> PipelineResult<DataFrame> {
        if !self.has_series(name)? {
            return Err(PipelineError::UnknownColumn(name.to_string()));
        }

        let field = name.to_string();

        let iterable = Arc::new(SelectIterable::new(
            self.shared(),
            Arc::new(move |value: &Value, index: &Value| {
                let mut record = match value {
                    Value::Record(record) => record.clone(),
                    _ => return value.clone(),
                };

                let current = record.get(&field).cloned().unwrap_or(Value::Absent);
                record.set(&field, selector(&current, index));
                Value::Record(record)
            }),
        ));

        Ok(self.derive(iterable))
    }

    /// Generate a column computed from each row
    pub fn generate_series(
        &self,
        name: &str,
        generator: impl Fn(&Value, &Value) -> Value + 'static,
    ) -> PipelineResult<DataFrame> {
        self.set_series_with(name, generator)
    }

    /// Collapse each row to a single value, producing a series
    pub fn deflate(&self, selector: impl Fn(&Value, &Value) -> Value + 'static) -> Series {
        Series::from_iterable(Arc::new(SelectIterable::new(
            self.shared(),
            Arc::new(selector),
        )))
    }

    // ------------------------------------------------------------------
    // Row projection
    // ------------------------------------------------------------------

    /// Keep only rows that satisfy the predicate
    pub fn filter(&self, predicate: impl Fn(&Value, &Value) -> bool + 'static) -> DataFrame {
        self.derive(Arc::new(FilterIterable::new(
            self.shared(),
            Arc::new(predicate),
        )))
    }

    /// Replace each row with the selector result
    ///
    /// The selector must produce a record; anything else fails when the
    /// frame is evaluated. Columns are re-inferred from the new records.
    pub fn select(&self, selector: impl Fn(&Value, &Value) -> Value + 'static) -> DataFrame {
        let iterable = Arc::new(FallibleSelectIterable::new(
            self.shared(),
            Arc::new(move |value: &Value, index: &Value| {
                let selected = selector(value, index);
                expect_record(&selected)?;
                Ok(selected)
            }),
        ));

        DataFrame::from_pipeline(iterable, ColumnSource::infer_first())
    }

    /// Replace each pair with the selector result
    pub fn select_pairs(
        &self,
        selector: impl Fn(&Value, &Value) -> (Value, Value) + 'static,
    ) -> DataFrame {
        let checked = Arc::new(SelectPairsIterable::new(
            self.shared(),
            Arc::new(selector),
        ));

        let iterable = Arc::new(FallibleSelectIterable::new(
            checked,
            Arc::new(|value: &Value, _: &Value| {
                expect_record(value)?;
                Ok(value.clone())
            }),
        ));

        DataFrame::from_pipeline(iterable, ColumnSource::infer_first())
    }

    /// Flatten a producer collection of records per row
    pub fn select_many(&self, producer: impl Fn(&Value, &Value) -> Value + 'static) -> DataFrame {
        let flattened = Arc::new(SelectManyIterable::values(
            self.shared(),
            Arc::new(producer),
        ));

        let iterable = Arc::new(FallibleSelectIterable::new(
            flattened,
            Arc::new(|value: &Value, _: &Value| {
                expect_record(value)?;
                Ok(value.clone())
            }),
        ));

        DataFrame::from_pipeline(iterable, ColumnSource::infer_first())
    }

    /// Flatten a producer collection of explicit record pairs per row
    pub fn select_many_pairs(
        &self,
        producer: impl Fn(&Value, &Value) -> Value + 'static,
    ) -> DataFrame {
        let flattened = Arc::new(SelectManyIterable::pairs(
            self.shared(),
            Arc::new(producer),
        ));

        let iterable = Arc::new(FallibleSelectIterable::new(
            flattened,
            Arc::new(|value: &Value, _: &Value| {
                expect_record(value)?;
                Ok(value.clone())
            }),
        ));

        DataFrame::from_pipeline(iterable, ColumnSource::infer_first())
    }

    // ------------------------------------------------------------------
    // Slicing
    // ------------------------------------------------------------------

    /// Discard the first `count` rows
    pub fn skip(&self, count: usize) -> DataFrame {
        self.derive(Arc::new(SkipIterable::new(self.shared(), count)))
    }

    /// Keep only the first `count` rows
    pub fn take(&self, count: usize) -> DataFrame {
        self.derive(Arc::new(TakeIterable::new(self.shared(), count)))
    }

    /// Keep only the first `count` rows
    pub fn head(&self, count: usize) -> DataFrame {
        self.take(count)
    }

    /// Keep only the last `count` rows
    pub fn tail(&self, count: usize) -> DataFrame {
        let source = self.shared();

        self.derive(Arc::new(CachedIterable::new(move || {
            let mut pairs = collect_pairs(source.as_ref())?;
            let drop = pairs.len().saturating_sub(count);
            Ok(pairs.split_off(drop))
        })))
    }

    /// Discard rows while the predicate holds
    pub fn skip_while(&self, predicate: impl Fn(&Value, &Value) -> bool + 'static) -> DataFrame {
        self.derive(Arc::new(SkipWhileIterable::new(
            self.shared(),
            Arc::new(predicate),
        )))
    }

    /// Keep rows while the predicate holds
    pub fn take_while(&self, predicate: impl Fn(&Value, &Value) -> bool + 'static) -> DataFrame {
        self.derive(Arc::new(TakeWhileIterable::new(
            self.shared(),
            Arc::new(predicate),
        )))
    }

    /// Emit the rows in reverse order
    pub fn reverse(&self) -> DataFrame {
        let source = self.shared();

        self.derive(Arc::new(CachedIterable::new(move || {
            let mut pairs = collect_pairs(source.as_ref())?;
            pairs.reverse();
            Ok(pairs)
        })))
    }

    /// Emit this frame's rows followed by another's
    ///
    /// Columns merge left then right, keeping first occurrences.
    pub fn concat(&self, other: &DataFrame) -> PipelineResult<DataFrame> {
        let mut names = self.column_names()?;

        for name in other.column_names()? {
            if !names.contains(&name) {
                names.push(name);
            }
        }

        Ok(DataFrame {
            iterable: Arc::new(ConcatIterable::new(
                self.shared(),
                other.shared(),
            )),
            columns: ColumnSource::known(names),
        })
    }

    /// Keep the first occurrence of each distinct row
    pub fn distinct(&self) -> DataFrame {
        self.distinct_by(|row| row.clone())
    }

    /// Keep the first row per distinct key
    pub fn distinct_by(&self, key: impl Fn(&Value) -> Value + 'static) -> DataFrame {
        let source = self.shared();

        self.derive(Arc::new(CachedIterable::new(move || {
            let pairs = collect_pairs(source.as_ref())?;
            let mut seen: Vec<Value> = Vec::new();
            let mut result = Vec::new();

            for (index, value) in pairs {
                let candidate = key(&value);

                if !seen.iter().any(|existing| *existing == candidate) {
                    seen.push(candidate);
                    result.push((index, value));
                }
            }

            Ok(result)
        })))
    }

    // ------------------------------------------------------------------
    // Index management
    // ------------------------------------------------------------------

    /// Promote a column's values to be the index
    ///
    /// The column stays in the records; rows lacking the field index as
    /// absent.
    pub fn set_index(&self, name: &str) -> PipelineResult<DataFrame> {
        if !self.has_series(name)? {
            return Err(PipelineError::UnknownColumn(name.to_string()));
        }

        let field = name.to_string();

        let iterable = Arc::new(SelectPairsIterable::new(
            self.shared(),
            Arc::new(move |value: &Value, _: &Value| {
                let index = match value {
                    Value::Record(record) => {
                        record.get(&field).cloned().unwrap_or(Value::Absent)
                    },
                    _ => Value::Absent,
                };
                (index, value.clone())
            }),
        ));

        Ok(self.derive(iterable))
    }

    /// Reassign the index to 0 .. n-1
    pub fn reset_index(&self) -> DataFrame {
        self.derive(Arc::new(ZipPairs::new(
            Arc::new(CountValues),
            Arc::new(ExtractValues::values(self.shared())),
        )))
    }

    /// Get a series whose values are this frame's indexes
    pub fn get_index(&self) -> Series {
        Series::from_iterable(Arc::new(ZipPairs::new(
            Arc::new(CountValues),
            Arc::new(ExtractValues::indexes(self.shared())),
        )))
    }

    // ------------------------------------------------------------------
    // Windowing
    // ------------------------------------------------------------------

    /// Split the frame into non-overlapping windows of `period` rows
    pub fn window(&self, period: usize) -> Series {
        let source = self.shared();
        let columns = self.columns.clone();

        Series::from_deferred(move || {
            if period == 0 {
                return Err(PipelineError::InvalidArgument(
                    "window period must be greater than zero".to_string()
                ));
            }

            ensure_restartable(source.as_ref(), "window")?;

            let total = collect_pairs(source.as_ref())?.len();
            let mut windows = Vec::new();
            let mut start = 0;

            while start < total {
                let length = period.min(total - start);
                windows.push((
                    Value::Integer(windows.len() as i64),
                    Value::Frame(sub_frame(&source, &columns, start, length)),
                ));
                start += period;
            }

            Ok(windows)
        })
    }

    /// Emit every contiguous window of exactly `period` rows
    pub fn rolling_window(&self, period: usize) -> Series {
        let source = self.shared();
        let columns = self.columns.clone();

        Series::from_deferred(move || {
            if period == 0 {
                return Err(PipelineError::InvalidArgument(
                    "rolling window period must be greater than zero".to_string()
                ));
            }

            ensure_restartable(source.as_ref(), "rolling_window")?;

            let total = collect_pairs(source.as_ref())?.len();
            let mut windows = Vec::new();

            if total >= period {
                for start in 0..=(total - period) {
                    windows.push((
                        Value::Integer(windows.len() as i64),
                        Value::Frame(sub_frame(&source, &columns, start, period)),
                    ));
                }
            }

            Ok(windows)
        })
    }

    /// Split the frame into variable-length windows of adjacent rows
    pub fn variable_window(
        &self,
        comparer: impl Fn(&Value, &Value) -> bool + 'static,
    ) -> Series {
        let source = self.shared();
        let columns = self.columns.clone();

        Series::from_deferred(move || {
            ensure_restartable(source.as_ref(), "variable_window")?;

            let pairs = collect_pairs(source.as_ref())?;
            let mut windows = Vec::new();
            let mut start = 0;

            for position in 1..=pairs.len() {
                let boundary = position == pairs.len()
                    || !comparer(&pairs[position - 1].1, &pairs[position].1);

                if boundary {
                    windows.push((
                        Value::Integer(windows.len() as i64),
                        Value::Frame(sub_frame(&source, &columns, start, position - start)),
                    ));
                    start = position;
                }
            }

            Ok(windows)
        })
    }

    // ------------------------------------------------------------------
    // Materialization and queries
    // ------------------------------------------------------------------

    /// Collect every pair of this frame
    pub(crate) fn pairs_all(&self) -> PipelineResult<Vec<Pair>> {
        collect_pairs(self.iterable.as_ref())
    }

    /// Collect the pairs, dropping pairs whose value is absent
    pub fn to_pairs(&self) -> PipelineResult<Vec<Pair>> {
        let pairs = self.pairs_all()?;
        Ok(pairs.into_iter().filter(|(_, value)| !value.is_absent()).collect())
    }

    /// Collect the rows as records projected onto the declared columns
    pub fn to_records(&self) -> PipelineResult<Vec<Record>> {
        let columns = self.column_names()?;
        let pairs = self.pairs_all()?;
        let mut records = Vec::with_capacity(pairs.len());

        for (_, value) in &pairs {
            records.push(expect_record(value)?.project(&columns));
        }

        Ok(records)
    }

    /// Collect the rows as value arrays aligned to the declared columns
    ///
    /// Missing fields surface as the absent sentinel.
    pub fn to_rows(&self) -> PipelineResult<Vec<Vec<Value>>> {
        let columns = self.column_names()?;
        let pairs = self.pairs_all()?;
        let mut rows = Vec::with_capacity(pairs.len());

        for (_, value) in &pairs {
            let record = expect_record(value)?;

            rows.push(
                columns
                    .iter()
                    .map(|column| record.get(column).cloned().unwrap_or(Value::Absent))
                    .collect(),
            );
        }

        Ok(rows)
    }

    /// Count the rows in the frame
    pub fn count(&self) -> PipelineResult<usize> {
        let mut cursor = self.iterable.cursor();
        let mut count = 0;

        while cursor.advance()? {
            count += 1;
        }

        Ok(count)
    }

    /// Get the first pair
    pub fn first_pair(&self) -> PipelineResult<Pair> {
        let mut cursor = self.iterable.cursor();

        if cursor.advance()? {
            Ok(cursor.current())
        } else {
            Err(PipelineError::EmptySequence(
                "first_pair called on an empty frame".to_string()
            ))
        }
    }

    /// Get the last pair
    pub fn last_pair(&self) -> PipelineResult<Pair> {
        let mut cursor = self.iterable.cursor();
        let mut last = None;

        while cursor.advance()? {
            last = Some(cursor.current());
        }

        last.ok_or_else(|| PipelineError::EmptySequence(
            "last_pair called on an empty frame".to_string()
        ))
    }

    /// Get the row at the given index by linear scan
    pub fn at(&self, index: &Value) -> PipelineResult<Value> {
        let mut cursor = self.iterable.cursor();

        while cursor.advance()? {
            let (current_index, value) = cursor.current();

            if current_index == *index {
                return Ok(value);
            }
        }

        Ok(Value::Absent)
    }

    /// Force a single pass and replace the pipeline with an array-backed one
    pub fn bake(&self) -> PipelineResult<DataFrame> {
        let pairs = self.pairs_all()?;

        Ok(DataFrame {
            iterable: Arc::new(ArrayPairs::new(pairs)),
            columns: ColumnSource::known(self.column_names()?),
        })
    }

    /// Invoke a callback for every row
    pub fn for_each(&self, callback: impl Fn(&Value, &Value)) -> PipelineResult<()> {
        let mut cursor = self.iterable.cursor();

        while cursor.advance()? {
            let (index, value) = cursor.current();
            callback(&value, &index);
        }

        Ok(())
    }
}

/// Build a sub-frame over a contiguous subrange of a source
fn sub_frame(
    source: &SharedPairs,
    columns: &ColumnSource,
    start: usize,
    length: usize,
) -> DataFrame {
    DataFrame::from_pipeline(
        Arc::new(TakeIterable::new(
            Arc::new(SkipIterable::new(source.clone(), start)),
            length,
        )),
        columns.clone(),
    )
}
