// Join operations for series
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use crate::data::Value;
use crate::frame::{ColumnSource, DataFrame};
use crate::iterate::{collect_pairs, CachedIterable, Pair, SharedPairs};
use crate::utils::{PipelineError, PipelineResult};

use super::Series;

/// Key selector over a pair's value
type KeyFn = Arc<dyn Fn(&Value) -> Value>;

/// Combiner of an outer and inner value into a result record
type CombineFn = Arc<dyn Fn(&Value, &Value) -> Value>;

/// Combine two sides into a record, failing on a non-record result
fn combined_record(combine: &CombineFn, outer: &Value, inner: &Value) -> PipelineResult<Value> {
    let combined = combine(outer, inner);

    match combined {
        Value::Record(_) => Ok(combined),
        other => Err(PipelineError::TypeMismatch(
            format!("join combiner must produce a record, got {}", other.type_name())
        )),
    }
}

/// Run a nested-loop join over two materialized pair batches
///
/// Emits unmatched outer pairs (inner side absent), then the inner join,
/// then unmatched inner pairs (outer side absent), according to the
/// include flags. The output index is reset to 0 .. n-1.
fn join_records(
    outer_pairs: &[Pair],
    inner_pairs: &[Pair],
    outer_key: &KeyFn,
    inner_key: &KeyFn,
    combine: &CombineFn,
    include_left: bool,
    include_right: bool,
) -> PipelineResult<Vec<Pair>> {
    let outer_keys: Vec<Value> = outer_pairs.iter().map(|(_, value)| outer_key(value)).collect();
    let inner_keys: Vec<Value> = inner_pairs.iter().map(|(_, value)| inner_key(value)).collect();

    let mut records = Vec::new();

    if include_left {
        for (position, (_, value)) in outer_pairs.iter().enumerate() {
            if !inner_keys.iter().any(|key| *key == outer_keys[position]) {
                records.push(combined_record(combine, value, &Value::Absent)?);
            }
        }
    }

    for (outer_position, (_, outer_value)) in outer_pairs.iter().enumerate() {
        for (inner_position, (_, inner_value)) in inner_pairs.iter().enumerate() {
            if outer_keys[outer_position] == inner_keys[inner_position] {
                records.push(combined_record(combine, outer_value, inner_value)?);
            }
        }
    }

    if include_right {
        for (position, (_, value)) in inner_pairs.iter().enumerate() {
            if !outer_keys.iter().any(|key| *key == inner_keys[position]) {
                records.push(combined_record(combine, &Value::Absent, value)?);
            }
        }
    }

    Ok(records
        .into_iter()
        .enumerate()
        .map(|(position, record)| (Value::Integer(position as i64), record))
        .collect())
}

/// Build the deferred frame pipeline for a join flavour
fn join_frame(
    outer: SharedPairs,
    inner: SharedPairs,
    outer_key: KeyFn,
    inner_key: KeyFn,
    combine: CombineFn,
    include_left: bool,
    include_right: bool,
) -> DataFrame {
    let iterable = Arc::new(CachedIterable::new(move || {
        let outer_pairs = collect_pairs(outer.as_ref())?;
        let inner_pairs = collect_pairs(inner.as_ref())?;

        join_records(
            &outer_pairs,
            &inner_pairs,
            &outer_key,
            &inner_key,
            &combine,
            include_left,
            include_right,
        )
    }));

    let columns = if include_left || include_right {
        ColumnSource::infer_all()
    } else {
        ColumnSource::infer_first()
    };

    DataFrame::from_pipeline(iterable, columns)
}

impl Series {
    /// Inner join with another series on equal keys
    ///
    /// The combiner runs for every matching outer/inner pair and must
    /// produce a record; the results form a frame indexed 0 .. n-1.
    pub fn join(
        &self,
        inner: &Series,
        outer_key: impl Fn(&Value) -> Value + 'static,
        inner_key: impl Fn(&Value) -> Value + 'static,
        combine: impl Fn(&Value, &Value) -> Value + 'static,
    ) -> DataFrame {
        join_frame(
            self.shared(),
            inner.shared(),
            Arc::new(outer_key),
            Arc::new(inner_key),
            Arc::new(combine),
            false,
            false,
        )
    }

    /// Full outer join with another series on equal keys
    ///
    /// Unmatched pairs on either side pass the absent sentinel to the
    /// missing side of the combiner.
    pub fn join_outer(
        &self,
        inner: &Series,
        outer_key: impl Fn(&Value) -> Value + 'static,
        inner_key: impl Fn(&Value) -> Value + 'static,
        combine: impl Fn(&Value, &Value) -> Value + 'static,
    ) -> DataFrame {
        join_frame(
            self.shared(),
            inner.shared(),
            Arc::new(outer_key),
            Arc::new(inner_key),
            Arc::new(combine),
            true,
            true,
        )
    }

    /// Left outer join with another series on equal keys
    pub fn join_outer_left(
        &self,
        inner: &Series,
        outer_key: impl Fn(&Value) -> Value + 'static,
        inner_key: impl Fn(&Value) -> Value + 'static,
        combine: impl Fn(&Value, &Value) -> Value + 'static,
    ) -> DataFrame {
        join_frame(
            self.shared(),
            inner.shared(),
            Arc::new(outer_key),
            Arc::new(inner_key),
            Arc::new(combine),
            true,
            false,
        )
    }

    /// Right outer join with another series on equal keys
    pub fn join_outer_right(
        &self,
        inner: &Series,
        outer_key: impl Fn(&Value) -> Value + 'static,
        inner_key: impl Fn(&Value) -> Value + 'static,
        combine: impl Fn(&Value, &Value) -> Value + 'static,
    ) -> DataFrame {
        join_frame(
            self.shared(),
            inner.shared(),
            Arc::new(outer_key),
            Arc::new(inner_key),
            Arc::new(combine),
            false,
            true,
        )
    }
}
