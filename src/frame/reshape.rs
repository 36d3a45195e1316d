// Reshaping operations for frames
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use crate::data::{Record, Value};
use crate::iterate::{CachedIterable, FallibleSelectIterable, Selector};
use crate::utils::PipelineError;

use super::{expect_record, ColumnSource, DataFrame};

impl DataFrame {
    /// Pivot a key column and a value column into new columns
    ///
    /// Each row contributes its value-column cell to the column named
    /// after its key-column cell; distinct keys become the new columns
    /// in first-occurrence order and row indexes are preserved. Missing
    /// key or value columns fail when the pivot is evaluated.
    pub fn pivot(&self, key_column: &str, value_column: &str) -> DataFrame {
        let frame = self.clone();
        let key = key_column.to_string();
        let cell = value_column.to_string();

        let iterable = Arc::new(CachedIterable::new(move || {
            let names = frame.column_names()?;

            if !names.contains(&key) {
                return Err(PipelineError::UnknownColumn(key.clone()));
            }

            if !names.contains(&cell) {
                return Err(PipelineError::UnknownColumn(cell.clone()));
            }

            let pairs = frame.pairs_all()?;
            let mut result = Vec::with_capacity(pairs.len());

            for (index, row) in pairs {
                let record = expect_record(&row)?;
                let key_value = record.get(&key).cloned().unwrap_or(Value::Absent);
                let cell_value = record.get(&cell).cloned().unwrap_or(Value::Absent);

                let mut pivoted = Record::new();

                if !key_value.is_absent() {
                    pivoted.set(&key_value.display_string(), cell_value);
                }

                result.push((index, Value::Record(pivoted)));
            }

            Ok(result)
        }));

        DataFrame::from_pipeline(iterable, ColumnSource::infer_all())
    }

    /// Merge another frame into this one
    ///
    /// With a column name the join key is that column's cell, otherwise
    /// the frame indexes. Matching rows merge field-wise with the right
    /// side overriding name clashes; unmatched rows of either side pass
    /// through, left rows first.
    pub fn merge(&self, other: &DataFrame, on: Option<&str>) -> DataFrame {
        let left = self.clone();
        let right = other.clone();
        let on = on.map(|name| name.to_string());

        let iterable = Arc::new(CachedIterable::new(move || {
            let left_pairs = left.pairs_all()?;
            let right_pairs = right.pairs_all()?;

            let key_of = |index: &Value, row: &Value| -> crate::utils::PipelineResult<Value> {
                match &on {
                    Some(column) => {
                        Ok(expect_record(row)?.get(column).cloned().unwrap_or(Value::Absent))
                    },
                    None => Ok(index.clone()),
                }
            };

            let mut left_keys = Vec::with_capacity(left_pairs.len());
            for (index, row) in &left_pairs {
                left_keys.push(key_of(index, row)?);
            }

            let mut right_keys = Vec::with_capacity(right_pairs.len());
            for (index, row) in &right_pairs {
                right_keys.push(key_of(index, row)?);
            }

            let mut result = Vec::new();

            for (position, (index, row)) in left_pairs.iter().enumerate() {
                let record = expect_record(row)?;

                let matches: Vec<usize> = right_keys
                    .iter()
                    .enumerate()
                    .filter(|(_, key)| **key == left_keys[position])
                    .map(|(slot, _)| slot)
                    .collect();

                if matches.is_empty() {
                    result.push((index.clone(), row.clone()));
                } else {
                    for slot in matches {
                        let other_record = expect_record(&right_pairs[slot].1)?;
                        let mut merged = record.clone();

                        for (name, value) in other_record.iter() {
                            merged.set(name, value.clone());
                        }

                        result.push((index.clone(), Value::Record(merged)));
                    }
                }
            }

            for (position, (index, row)) in right_pairs.iter().enumerate() {
                if !left_keys.iter().any(|key| *key == right_keys[position]) {
                    result.push((index.clone(), row.clone()));
                }
            }

            Ok(result)
        }));

        DataFrame::from_pipeline(iterable, ColumnSource::infer_all())
    }

    /// Expand a record-valued column into columns of its fields
    pub fn inflate_column(&self, name: &str) -> DataFrame {
        self.inflate_column_inner(name, None)
    }

    /// Expand a column into record fields through a selector
    pub fn inflate_column_with(
        &self,
        name: &str,
        selector: impl Fn(&Value, &Value) -> Value + 'static,
    ) -> DataFrame {
        self.inflate_column_inner(name, Some(Arc::new(selector)))
    }

    /// Shared machinery of the column inflation flavours
    ///
    /// The inflated fields replace the source column at its position;
    /// name clashes keep the first occurrence.
    fn inflate_column_inner(&self, name: &str, selector: Option<Selector>) -> DataFrame {
        let field = name.to_string();

        let iterable = Arc::new(FallibleSelectIterable::new(
            self.shared(),
            Arc::new(move |value: &Value, index: &Value| {
                let record = expect_record(value)?;
                let mut nested_value = record.get(&field).cloned().unwrap_or(Value::Absent);

                if let Some(apply) = &selector {
                    nested_value = apply(&nested_value, index);
                }

                let nested = match nested_value {
                    Value::Record(inner) => inner,
                    Value::Absent => Record::new(),
                    other => {
                        return Err(PipelineError::TypeMismatch(
                            format!("inflate_column expects record values in column '{}', \
                                got {}", field, other.type_name())
                        ));
                    },
                };

                let mut inflated = Record::new();

                for (current, current_value) in record.iter() {
                    if current == &field {
                        for (nested_name, nested_field) in nested.iter() {
                            inflated.set(nested_name, nested_field.clone());
                        }
                    } else {
                        inflated.set(current, current_value.clone());
                    }
                }

                Ok(Value::Record(inflated))
            }),
        ));

        DataFrame::from_pipeline(iterable, ColumnSource::infer_all())
    }
}
