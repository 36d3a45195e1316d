// Series module for the indexed one-dimensional pipeline
// Author: Gabriel Demetrios Lafis

mod aggregate;
mod group;
mod join;
mod sort;
mod window;

pub use sort::*;

use std::fmt;
use std::sync::Arc;

use crate::data::{
    compare_values, format_string_value, parse_date_value, parse_float_value, parse_int_value,
    Record, Value,
};
use crate::frame::{ColumnSource, DataFrame};
use crate::iterate::{
    collect_pairs, collect_values, AppendIterable, ArrayPairs, ArrayValues, CachedIterable,
    ConcatIterable, CountValues, EmptyPairs, EmptyValues, ExtractValues, FallibleSelectIterable,
    FilterIterable, GeneratorValues, InsertIterable, Pair, PairZipIterable, SelectIterable,
    SelectManyIterable, SelectPairsIterable, SharedPairs, SharedValues, SkipIterable,
    SkipWhileIterable, TakeIterable, TakeWhileIterable, ValueZipIterable, ZipPairs,
};
use crate::utils::{PipelineError, PipelineResult};

/// Source of values or indexes for constructing a series
///
/// Constructor inputs are polymorphic; normalizing them through this
/// tagged variant keeps the constructors themselves simple.
pub enum ValueSource {
    Empty,
    Array(Vec<Value>),
    Series(Series),
    Generator(Box<dyn Iterator<Item = Value>>),
}

impl ValueSource {
    /// Normalize this source into a value iterable
    ///
    /// A series used as a source contributes its value channel.
    pub(crate) fn into_values(self) -> SharedValues {
        match self {
            ValueSource::Empty => Arc::new(EmptyValues),
            ValueSource::Array(values) => Arc::new(ArrayValues::new(values)),
            ValueSource::Series(series) => Arc::new(ExtractValues::values(series.shared())),
            ValueSource::Generator(iterator) => Arc::new(GeneratorValues::new(iterator)),
        }
    }
}

impl From<Vec<Value>> for ValueSource {
    fn from(values: Vec<Value>) -> Self {
        ValueSource::Array(values)
    }
}

impl From<Series> for ValueSource {
    fn from(series: Series) -> Self {
        ValueSource::Series(series)
    }
}

impl From<&Series> for ValueSource {
    fn from(series: &Series) -> Self {
        ValueSource::Series(series.clone())
    }
}

/// Represents an indexed one-dimensional sequence of pairs
///
/// A series holds a single pair iterable; every transformation wraps it
/// in a new operator iterable without evaluating anything. Terminal
/// calls drive a fresh cursor from the sources.
#[derive(Clone)]
pub struct Series {
    iterable: SharedPairs,
}

impl fmt::Debug for Series {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Series {{ .. }}")
    }
}

impl Series {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create an empty series
    pub fn empty() -> Series {
        Series {
            iterable: Arc::new(EmptyPairs),
        }
    }

    /// Create a series from a value source, auto-indexed 0, 1, 2, ...
    pub fn new(values: impl Into<ValueSource>) -> Series {
        Series {
            iterable: Arc::new(ZipPairs::new(
                Arc::new(CountValues),
                values.into().into_values(),
            )),
        }
    }

    /// Create a series pairing a value source with an explicit index source
    pub fn with_index(
        values: impl Into<ValueSource>,
        index: impl Into<ValueSource>,
    ) -> Series {
        Series {
            iterable: Arc::new(ZipPairs::new(
                index.into().into_values(),
                values.into().into_values(),
            )),
        }
    }

    /// Create a series from explicit pairs
    pub fn from_pairs(pairs: Vec<Pair>) -> Series {
        Series {
            iterable: Arc::new(ArrayPairs::new(pairs)),
        }
    }

    /// Create a series over an existing pair iterable
    pub fn from_iterable(iterable: SharedPairs) -> Series {
        Series { iterable }
    }

    /// Create a single-shot series from a user-supplied iterator
    ///
    /// The resulting pipeline is not restartable; operations that need a
    /// second pass fail at evaluation time.
    pub fn from_generator(iterator: impl Iterator<Item = Value> + 'static) -> Series {
        Series::new(ValueSource::Generator(Box::new(iterator)))
    }

    /// Create a series backed by a deferred computation
    pub(crate) fn from_deferred(
        compute: impl Fn() -> PipelineResult<Vec<Pair>> + 'static,
    ) -> Series {
        Series {
            iterable: Arc::new(CachedIterable::new(compute)),
        }
    }

    /// Get the underlying pair iterable
    pub fn shared(&self) -> SharedPairs {
        self.iterable.clone()
    }

    /// Check whether two series share the same pipeline
    pub(crate) fn same_pipeline(&self, other: &Series) -> bool {
        Arc::ptr_eq(&self.iterable, &other.iterable)
    }

    // ------------------------------------------------------------------
    // Index operations
    // ------------------------------------------------------------------

    /// Get a new series whose values are this series' indexes
    pub fn get_index(&self) -> Series {
        Series {
            iterable: Arc::new(ZipPairs::new(
                Arc::new(CountValues),
                Arc::new(ExtractValues::indexes(self.shared())),
            )),
        }
    }

    /// Re-pair the current values with a new index stream
    pub fn set_index(&self, index: impl Into<ValueSource>) -> Series {
        Series {
            iterable: Arc::new(ZipPairs::new(
                index.into().into_values(),
                Arc::new(ExtractValues::values(self.shared())),
            )),
        }
    }

    /// Reassign the index to 0 .. n-1
    pub fn reset_index(&self) -> Series {
        Series {
            iterable: Arc::new(ZipPairs::new(
                Arc::new(CountValues),
                Arc::new(ExtractValues::values(self.shared())),
            )),
        }
    }

    /// Left-join this series onto a new index
    ///
    /// Indexes missing from the source produce the absent sentinel.
    /// Duplicate indexes in the source fail with a duplicate index error
    /// when the result is evaluated.
    pub fn reindex(&self, index: impl Into<ValueSource>) -> Series {
        let source = self.shared();
        let new_index = index.into().into_values();

        Series::from_deferred(move || {
            let pairs = collect_pairs(source.as_ref())?;

            for i in 0..pairs.len() {
                for j in (i + 1)..pairs.len() {
                    if pairs[i].0 == pairs[j].0 {
                        return Err(PipelineError::DuplicateIndex(
                            format!("index value '{}' occurs more than once",
                                pairs[i].0.display_string())
                        ));
                    }
                }
            }

            let indexes = collect_values(new_index.as_ref())?;
            let mut result = Vec::with_capacity(indexes.len());

            for index_value in indexes {
                let found = pairs
                    .iter()
                    .find(|(index, _)| *index == index_value)
                    .map(|(_, value)| value.clone())
                    .unwrap_or(Value::Absent);

                result.push((index_value, found));
            }

            Ok(result)
        })
    }

    // ------------------------------------------------------------------
    // Slicing
    // ------------------------------------------------------------------

    /// Discard the first `count` pairs
    pub fn skip(&self, count: usize) -> Series {
        Series {
            iterable: Arc::new(SkipIterable::new(self.shared(), count)),
        }
    }

    /// Keep only the first `count` pairs
    pub fn take(&self, count: usize) -> Series {
        Series {
            iterable: Arc::new(TakeIterable::new(self.shared(), count)),
        }
    }

    /// Keep only the first `count` pairs
    pub fn head(&self, count: usize) -> Series {
        self.take(count)
    }

    /// Keep only the last `count` pairs
    ///
    /// Forces a pass over the source to find its length.
    pub fn tail(&self, count: usize) -> Series {
        let source = self.shared();

        Series::from_deferred(move || {
            let mut pairs = collect_pairs(source.as_ref())?;
            let drop = pairs.len().saturating_sub(count);
            Ok(pairs.split_off(drop))
        })
    }

    /// Discard pairs while the predicate holds
    pub fn skip_while(&self, predicate: impl Fn(&Value, &Value) -> bool + 'static) -> Series {
        Series {
            iterable: Arc::new(SkipWhileIterable::new(self.shared(), Arc::new(predicate))),
        }
    }

    /// Discard pairs until the predicate holds
    pub fn skip_until(&self, predicate: impl Fn(&Value, &Value) -> bool + 'static) -> Series {
        self.skip_while(move |value, index| !predicate(value, index))
    }

    /// Keep pairs while the predicate holds
    pub fn take_while(&self, predicate: impl Fn(&Value, &Value) -> bool + 'static) -> Series {
        Series {
            iterable: Arc::new(TakeWhileIterable::new(self.shared(), Arc::new(predicate))),
        }
    }

    /// Keep pairs until the predicate holds
    pub fn take_until(&self, predicate: impl Fn(&Value, &Value) -> bool + 'static) -> Series {
        self.take_while(move |value, index| !predicate(value, index))
    }

    /// Keep pairs whose index lies in the range [start, end)
    pub fn slice(&self, start: Value, end: Value) -> Series {
        self.slice_by(
            move |index| compare_values(index, &start) == std::cmp::Ordering::Less,
            move |index| compare_values(index, &end) == std::cmp::Ordering::Less,
        )
    }

    /// Predicate form of slice
    ///
    /// Skips while the first predicate holds on the index, then takes
    /// while the second one does.
    pub fn slice_by(
        &self,
        skip_while: impl Fn(&Value) -> bool + 'static,
        take_while: impl Fn(&Value) -> bool + 'static,
    ) -> Series {
        self.skip_while(move |_, index| skip_while(index))
            .take_while(move |_, index| take_while(index))
    }

    // ------------------------------------------------------------------
    // Projection
    // ------------------------------------------------------------------

    /// Keep only pairs that satisfy the predicate
    pub fn filter(&self, predicate: impl Fn(&Value, &Value) -> bool + 'static) -> Series {
        Series {
            iterable: Arc::new(FilterIterable::new(self.shared(), Arc::new(predicate))),
        }
    }

    /// Replace each value with the selector result; the index is unchanged
    pub fn select(&self, selector: impl Fn(&Value, &Value) -> Value + 'static) -> Series {
        Series {
            iterable: Arc::new(SelectIterable::new(self.shared(), Arc::new(selector))),
        }
    }

    /// Replace each pair with the selector result
    pub fn select_pairs(
        &self,
        selector: impl Fn(&Value, &Value) -> (Value, Value) + 'static,
    ) -> Series {
        Series {
            iterable: Arc::new(SelectPairsIterable::new(self.shared(), Arc::new(selector))),
        }
    }

    /// Flatten a producer collection per pair; elements keep the parent index
    pub fn select_many(&self, producer: impl Fn(&Value, &Value) -> Value + 'static) -> Series {
        Series {
            iterable: Arc::new(SelectManyIterable::values(self.shared(), Arc::new(producer))),
        }
    }

    /// Flatten a producer collection of explicit pairs
    pub fn select_many_pairs(
        &self,
        producer: impl Fn(&Value, &Value) -> Value + 'static,
    ) -> Series {
        Series {
            iterable: Arc::new(SelectManyIterable::pairs(self.shared(), Arc::new(producer))),
        }
    }

    /// Zip this series with others value-wise, adopting this series' index
    pub fn zip_with(
        &self,
        others: &[Series],
        zipper: impl Fn(&[Value]) -> Value + 'static,
    ) -> Series {
        let mut sources = vec![self.shared()];
        sources.extend(others.iter().map(|s| s.shared()));

        Series {
            iterable: Arc::new(ValueZipIterable::new(sources, Arc::new(zipper))),
        }
    }

    /// Zip this series with others pair-wise, adopting this series' index
    pub fn zip_pairs_with(
        &self,
        others: &[Series],
        zipper: impl Fn(&[Pair]) -> Value + 'static,
    ) -> Series {
        let mut sources = vec![self.shared()];
        sources.extend(others.iter().map(|s| s.shared()));

        Series {
            iterable: Arc::new(PairZipIterable::new(sources, Arc::new(zipper))),
        }
    }

    /// Emit this series followed by another
    pub fn concat(&self, other: &Series) -> Series {
        Series {
            iterable: Arc::new(ConcatIterable::new(self.shared(), other.shared())),
        }
    }

    /// Emit the pairs in reverse order
    pub fn reverse(&self) -> Series {
        let source = self.shared();

        Series::from_deferred(move || {
            let mut pairs = collect_pairs(source.as_ref())?;
            pairs.reverse();
            Ok(pairs)
        })
    }

    // ------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------

    /// Prepend a pair to the series
    pub fn insert_pair(&self, pair: Pair) -> Series {
        Series {
            iterable: Arc::new(InsertIterable::new(self.shared(), pair)),
        }
    }

    /// Append a pair to the series
    pub fn append_pair(&self, pair: Pair) -> Series {
        Series {
            iterable: Arc::new(AppendIterable::new(self.shared(), pair)),
        }
    }

    // ------------------------------------------------------------------
    // Materialization
    // ------------------------------------------------------------------

    /// Collect every pair, keeping absent values
    pub(crate) fn pairs_all(&self) -> PipelineResult<Vec<Pair>> {
        collect_pairs(self.iterable.as_ref())
    }

    /// Collect the pairs, dropping pairs whose value is absent
    pub fn to_pairs(&self) -> PipelineResult<Vec<Pair>> {
        let pairs = self.pairs_all()?;
        Ok(pairs.into_iter().filter(|(_, value)| !value.is_absent()).collect())
    }

    /// Collect the values, dropping absent values
    pub fn to_values(&self) -> PipelineResult<Vec<Value>> {
        let pairs = self.pairs_all()?;
        Ok(pairs
            .into_iter()
            .filter(|(_, value)| !value.is_absent())
            .map(|(_, value)| value)
            .collect())
    }

    /// Force a single pass and replace the pipeline with an array-backed one
    pub fn bake(&self) -> PipelineResult<Series> {
        Ok(Series::from_pairs(self.pairs_all()?))
    }

    /// Invoke a callback for every pair
    pub fn for_each(&self, callback: impl Fn(&Value, &Value)) -> PipelineResult<()> {
        let mut cursor = self.iterable.cursor();

        while cursor.advance()? {
            let (index, value) = cursor.current();
            callback(&value, &index);
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Get the first pair
    pub fn first_pair(&self) -> PipelineResult<Pair> {
        let mut cursor = self.iterable.cursor();

        if cursor.advance()? {
            Ok(cursor.current())
        } else {
            Err(PipelineError::EmptySequence(
                "first_pair called on an empty series".to_string()
            ))
        }
    }

    /// Get the first value
    pub fn first(&self) -> PipelineResult<Value> {
        self.first_pair().map(|(_, value)| value)
    }

    /// Get the last pair
    pub fn last_pair(&self) -> PipelineResult<Pair> {
        let mut cursor = self.iterable.cursor();
        let mut last = None;

        while cursor.advance()? {
            last = Some(cursor.current());
        }

        last.ok_or_else(|| PipelineError::EmptySequence(
            "last_pair called on an empty series".to_string()
        ))
    }

    /// Get the last value
    pub fn last(&self) -> PipelineResult<Value> {
        self.last_pair().map(|(_, value)| value)
    }

    /// Get the value at the given index by linear scan
    ///
    /// Returns the absent sentinel when the index is not found.
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

    /// Check whether the series contains a value equal to the given one
    pub fn contains(&self, value: &Value) -> PipelineResult<bool> {
        let mut cursor = self.iterable.cursor();

        while cursor.advance()? {
            let (_, current) = cursor.current();

            if current == *value {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Check whether every pair satisfies the predicate
    ///
    /// An empty series never satisfies `all`.
    pub fn all(&self, predicate: impl Fn(&Value, &Value) -> bool) -> PipelineResult<bool> {
        let mut cursor = self.iterable.cursor();
        let mut any = false;

        while cursor.advance()? {
            let (index, value) = cursor.current();

            if !predicate(&value, &index) {
                return Ok(false);
            }

            any = true;
        }

        Ok(any)
    }

    /// Check whether the series has at least one pair
    pub fn any(&self) -> PipelineResult<bool> {
        let mut cursor = self.iterable.cursor();
        cursor.advance()
    }

    /// Check whether any pair satisfies the predicate
    pub fn any_where(&self, predicate: impl Fn(&Value, &Value) -> bool) -> PipelineResult<bool> {
        let mut cursor = self.iterable.cursor();

        while cursor.advance()? {
            let (index, value) = cursor.current();

            if predicate(&value, &index) {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Check whether the series is empty
    pub fn none(&self) -> PipelineResult<bool> {
        Ok(!self.any()?)
    }

    /// Check whether no pair satisfies the predicate
    pub fn none_where(&self, predicate: impl Fn(&Value, &Value) -> bool) -> PipelineResult<bool> {
        Ok(!self.any_where(predicate)?)
    }

    // ------------------------------------------------------------------
    // Type coercion
    // ------------------------------------------------------------------

    /// Parse string values into integers
    pub fn parse_ints(&self) -> Series {
        Series {
            iterable: Arc::new(FallibleSelectIterable::new(
                self.shared(),
                Arc::new(|value, _| parse_int_value(value)),
            )),
        }
    }

    /// Parse string values into floats
    pub fn parse_floats(&self) -> Series {
        Series {
            iterable: Arc::new(FallibleSelectIterable::new(
                self.shared(),
                Arc::new(|value, _| parse_float_value(value)),
            )),
        }
    }

    /// Parse string values into dates using an explicit format
    pub fn parse_dates(&self, format: &str) -> Series {
        let format = format.to_string();

        Series {
            iterable: Arc::new(FallibleSelectIterable::new(
                self.shared(),
                Arc::new(move |value, _| parse_date_value(value, &format)),
            )),
        }
    }

    /// Format values into strings
    ///
    /// Date values require an explicit format string.
    pub fn to_strings(&self, format: Option<&str>) -> Series {
        let format = format.map(|f| f.to_string());

        Series {
            iterable: Arc::new(FallibleSelectIterable::new(
                self.shared(),
                Arc::new(move |value, _| format_string_value(value, format.as_deref())),
            )),
        }
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Build a frequency table of the value types in this series
    pub fn detect_types(&self) -> PipelineResult<DataFrame> {
        let pairs = self.pairs_all()?;
        let total = pairs.len();
        let mut counts: Vec<(&'static str, usize)> = Vec::new();

        for (_, value) in &pairs {
            let name = value.type_name();

            match counts.iter_mut().find(|(existing, _)| *existing == name) {
                Some((_, count)) => *count += 1,
                None => counts.push((name, 1)),
            }
        }

        let records = counts
            .into_iter()
            .map(|(name, count)| {
                Record::new()
                    .with("Type", Value::String(name.to_string()))
                    .with("Frequency", Value::Float(count as f64 * 100.0 / total as f64))
            })
            .collect();

        Ok(DataFrame::from_records(records))
    }

    /// Build a frequency table of the distinct values in this series
    pub fn detect_values(&self) -> PipelineResult<DataFrame> {
        let pairs = self.pairs_all()?;
        let total = pairs.len();
        let mut counts: Vec<(Value, usize)> = Vec::new();

        for (_, value) in &pairs {
            match counts.iter_mut().find(|(existing, _)| existing == value) {
                Some((_, count)) => *count += 1,
                None => counts.push((value.clone(), 1)),
            }
        }

        let records = counts
            .into_iter()
            .map(|(value, count)| {
                Record::new()
                    .with("Value", value)
                    .with("Frequency", Value::Float(count as f64 * 100.0 / total as f64))
            })
            .collect();

        Ok(DataFrame::from_records(records))
    }

    // ------------------------------------------------------------------
    // Shape conversion
    // ------------------------------------------------------------------

    /// Convert a series of records into a frame
    ///
    /// Values that are not records fail with a type mismatch when the
    /// frame is evaluated.
    pub fn inflate(&self) -> DataFrame {
        let iterable = Arc::new(FallibleSelectIterable::new(
            self.shared(),
            Arc::new(|value: &Value, _: &Value| match value {
                Value::Record(_) => Ok(value.clone()),
                other => Err(PipelineError::TypeMismatch(
                    format!("inflate expects record values, got {}", other.type_name())
                )),
            }),
        ));

        DataFrame::from_pipeline(iterable, ColumnSource::infer_first())
    }

    /// Convert a series into a frame through a record selector
    pub fn inflate_with(&self, selector: impl Fn(&Value, &Value) -> Value + 'static) -> DataFrame {
        self.select(selector).inflate()
    }
}
