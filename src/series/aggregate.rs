// Aggregation operations for series
// Author: Gabriel Demetrios Lafis

use crate::data::{compare_values, Value};
use crate::utils::{PipelineError, PipelineResult};

use super::Series;

/// Accumulate a numeric value onto a running sum
///
/// Integer sums stay integral until the first float arrives; values that
/// are not numeric are ignored.
fn accumulate(total: Value, value: &Value) -> Value {
    match (total, value) {
        (Value::Integer(a), Value::Integer(b)) => Value::Integer(a + b),
        (Value::Integer(a), Value::Float(b)) => Value::Float(a as f64 + b),
        (Value::Float(a), Value::Integer(b)) => Value::Float(a + *b as f64),
        (Value::Float(a), Value::Float(b)) => Value::Float(a + b),
        (total, _) => total,
    }
}

impl Series {
    /// Count the pairs in the series
    pub fn count(&self) -> PipelineResult<usize> {
        let mut cursor = self.shared().cursor();
        let mut count = 0;

        while cursor.advance()? {
            count += 1;
        }

        Ok(count)
    }

    /// Sum the numeric values of the series
    ///
    /// An empty series sums to zero.
    pub fn sum(&self) -> PipelineResult<Value> {
        let values = self.to_values()?;
        let mut total = Value::Integer(0);

        for value in &values {
            total = accumulate(total, value);
        }

        Ok(total)
    }

    /// Average the numeric values of the series
    ///
    /// An empty series averages to zero rather than NaN.
    pub fn average(&self) -> PipelineResult<Value> {
        let values = self.to_values()?;
        let mut total = 0.0;
        let mut count = 0;

        for value in &values {
            if let Some(number) = value.as_f64() {
                total += number;
                count += 1;
            }
        }

        if count == 0 {
            Ok(Value::Integer(0))
        } else {
            Ok(Value::Float(total / count as f64))
        }
    }

    /// Get the smallest value in the series
    pub fn min(&self) -> PipelineResult<Value> {
        let values = self.to_values()?;

        values
            .into_iter()
            .reduce(|a, b| {
                if compare_values(&b, &a) == std::cmp::Ordering::Less {
                    b
                } else {
                    a
                }
            })
            .ok_or_else(|| PipelineError::EmptySequence(
                "min called on an empty series".to_string()
            ))
    }

    /// Get the largest value in the series
    pub fn max(&self) -> PipelineResult<Value> {
        let values = self.to_values()?;

        values
            .into_iter()
            .reduce(|a, b| {
                if compare_values(&b, &a) == std::cmp::Ordering::Greater {
                    b
                } else {
                    a
                }
            })
            .ok_or_else(|| PipelineError::EmptySequence(
                "max called on an empty series".to_string()
            ))
    }

    /// Fold the values with an explicit seed
    pub fn aggregate(
        &self,
        seed: Value,
        reducer: impl Fn(&Value, &Value) -> Value,
    ) -> PipelineResult<Value> {
        let values = self.to_values()?;
        let mut accumulator = seed;

        for value in &values {
            accumulator = reducer(&accumulator, value);
        }

        Ok(accumulator)
    }

    /// Fold the values using the first value as the seed
    pub fn reduce(&self, reducer: impl Fn(&Value, &Value) -> Value) -> PipelineResult<Value> {
        let values = self.to_values()?;
        let mut iterator = values.iter();

        let mut accumulator = iterator
            .next()
            .cloned()
            .ok_or_else(|| PipelineError::EmptySequence(
                "reduce called on an empty series".to_string()
            ))?;

        for value in iterator {
            accumulator = reducer(&accumulator, value);
        }

        Ok(accumulator)
    }
}
