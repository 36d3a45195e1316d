// Windowing operations for series
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use crate::data::Value;
use crate::iterate::{
    collect_pairs, ensure_restartable, Pair, SharedPairs, SkipIterable, TakeIterable,
};
use crate::utils::{PipelineError, PipelineResult};

use super::Series;

/// Build a window over a contiguous subrange of a source
///
/// The window is a lazy skip-and-take sub-pipeline, so re-iterating it
/// replays the same pairs from the source.
fn sub_window(source: &SharedPairs, start: usize, length: usize) -> Series {
    Series::from_iterable(Arc::new(TakeIterable::new(
        Arc::new(SkipIterable::new(source.clone(), start)),
        length,
    )))
}

/// Subtract two numeric values, failing on non-numeric input
fn numeric_delta(previous: &Value, current: &Value, operation: &str) -> PipelineResult<f64> {
    match (previous.as_f64(), current.as_f64()) {
        (Some(a), Some(b)) => Ok(b - a),
        _ => Err(PipelineError::TypeMismatch(
            format!("{} expects numeric values, got {} and {}",
                operation, previous.type_name(), current.type_name())
        )),
    }
}

impl Series {
    /// Split the series into non-overlapping windows of `period` pairs
    ///
    /// A final short window carries any remainder. Windows are indexed
    /// by emission order.
    pub fn window(&self, period: usize) -> Series {
        let source = self.shared();

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
                let window = sub_window(&source, start, length);
                windows.push((
                    Value::Integer(windows.len() as i64),
                    Value::Series(window),
                ));
                start += period;
            }

            Ok(windows)
        })
    }

    /// Emit every contiguous window of exactly `period` pairs
    ///
    /// Emits nothing when the series is shorter than the period.
    pub fn rolling_window(&self, period: usize) -> Series {
        let source = self.shared();

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
                    let window = sub_window(&source, start, period);
                    windows.push((
                        Value::Integer(windows.len() as i64),
                        Value::Series(window),
                    ));
                }
            }

            Ok(windows)
        })
    }

    /// Split the series into variable-length windows
    ///
    /// A window accumulates while the comparer holds between adjacent
    /// values; the first failure starts a new window.
    pub fn variable_window(
        &self,
        comparer: impl Fn(&Value, &Value) -> bool + 'static,
    ) -> Series {
        let source = self.shared();

        Series::from_deferred(move || {
            ensure_restartable(source.as_ref(), "variable_window")?;

            let pairs = collect_pairs(source.as_ref())?;
            let mut windows = Vec::new();
            let mut start = 0;

            for position in 1..=pairs.len() {
                let boundary = position == pairs.len()
                    || !comparer(&pairs[position - 1].1, &pairs[position].1);

                if boundary {
                    let window = sub_window(&source, start, position - start);
                    windows.push((
                        Value::Integer(windows.len() as i64),
                        Value::Series(window),
                    ));
                    start = position;
                }
            }

            Ok(windows)
        })
    }

    /// Group adjacent pairs whose keys are equal into windows
    pub fn group_sequential_by(
        &self,
        key: impl Fn(&Value) -> Value + 'static,
    ) -> Series {
        self.variable_window(move |previous, current| key(previous) == key(current))
    }

    /// Group adjacent equal values into windows
    pub fn group_sequential(&self) -> Series {
        self.variable_window(|previous, current| previous == current)
    }

    /// Fill gaps between adjacent pairs
    ///
    /// For each adjacent pair the detector decides whether a gap exists;
    /// if so the filler produces the pairs to insert between them.
    pub fn fill_gaps(
        &self,
        is_gap: impl Fn(&Pair, &Pair) -> bool + 'static,
        fill: impl Fn(&Pair, &Pair) -> Vec<Pair> + 'static,
    ) -> Series {
        let source = self.shared();

        Series::from_deferred(move || {
            let pairs = collect_pairs(source.as_ref())?;
            let mut result = Vec::with_capacity(pairs.len());

            for position in 0..pairs.len() {
                result.push(pairs[position].clone());

                if position + 1 < pairs.len() {
                    let a = &pairs[position];
                    let b = &pairs[position + 1];

                    if is_gap(a, b) {
                        result.extend(fill(a, b));
                    }
                }
            }

            Ok(result)
        })
    }

    /// Compute the proportional change between adjacent numeric values
    ///
    /// Each emitted pair carries the index of the later value.
    pub fn percent_change(&self) -> Series {
        let source = self.shared();

        Series::from_deferred(move || {
            let pairs = collect_pairs(source.as_ref())?;
            let mut changes = Vec::new();

            for position in 1..pairs.len() {
                let previous = &pairs[position - 1].1;
                let current = &pairs[position].1;
                let delta = numeric_delta(previous, current, "percent_change")?;
                let base = previous.as_f64().unwrap_or(f64::NAN);

                changes.push((pairs[position].0.clone(), Value::Float(delta / base)));
            }

            Ok(changes)
        })
    }

    /// Compute the absolute change between adjacent numeric values
    pub fn amount_change(&self) -> Series {
        let source = self.shared();

        Series::from_deferred(move || {
            let pairs = collect_pairs(source.as_ref())?;
            let mut changes = Vec::new();

            for position in 1..pairs.len() {
                let previous = &pairs[position - 1].1;
                let current = &pairs[position].1;

                let change = match (previous, current) {
                    (Value::Integer(a), Value::Integer(b)) => Value::Integer(b - a),
                    _ => Value::Float(numeric_delta(previous, current, "amount_change")?),
                };

                changes.push((pairs[position].0.clone(), change));
            }

            Ok(changes)
        })
    }
}
