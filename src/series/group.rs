// Distinctness, grouping and set operations for series
// Author: Gabriel Demetrios Lafis

use crate::data::Value;
use crate::iterate::collect_pairs;

use super::Series;

impl Series {
    /// Keep the first occurrence of each distinct key
    ///
    /// Comparison is structural with no hashing, so the cost is
    /// quadratic in the number of pairs.
    pub fn distinct_by(&self, key: impl Fn(&Value) -> Value + 'static) -> Series {
        let source = self.shared();

        Series::from_deferred(move || {
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
        })
    }

    /// Keep the first occurrence of each distinct value
    pub fn distinct(&self) -> Series {
        self.distinct_by(|value| value.clone())
    }

    /// Collapse runs of adjacent pairs with equal keys to their first pair
    pub fn sequential_distinct_by(&self, key: impl Fn(&Value) -> Value + 'static) -> Series {
        let source = self.shared();

        Series::from_deferred(move || {
            let pairs = collect_pairs(source.as_ref())?;
            let mut previous: Option<Value> = None;
            let mut result = Vec::new();

            for (index, value) in pairs {
                let candidate = key(&value);

                if previous.as_ref() != Some(&candidate) {
                    previous = Some(candidate);
                    result.push((index, value));
                }
            }

            Ok(result)
        })
    }

    /// Collapse runs of adjacent equal values to their first pair
    pub fn sequential_distinct(&self) -> Series {
        self.sequential_distinct_by(|value| value.clone())
    }

    /// Group the pairs by a key selector
    ///
    /// The result is indexed by group key; each value is a sub-series of
    /// the original pairs, in first-occurrence order.
    pub fn group_by(&self, key: impl Fn(&Value, &Value) -> Value + 'static) -> Series {
        let source = self.shared();

        Series::from_deferred(move || {
            let pairs = collect_pairs(source.as_ref())?;
            let mut groups: Vec<(Value, Vec<(Value, Value)>)> = Vec::new();

            for (index, value) in pairs {
                let group_key = key(&value, &index);

                match groups.iter_mut().find(|(existing, _)| *existing == group_key) {
                    Some((_, members)) => members.push((index, value)),
                    None => groups.push((group_key, vec![(index, value)])),
                }
            }

            Ok(groups
                .into_iter()
                .map(|(group_key, members)| {
                    (group_key, Value::Series(Series::from_pairs(members)))
                })
                .collect())
        })
    }

    /// Concatenate another series and keep the first occurrence per key
    pub fn union_by(&self, other: &Series, key: impl Fn(&Value) -> Value + 'static) -> Series {
        self.concat(other).distinct_by(key)
    }

    /// Concatenate another series and keep the first occurrence per value
    pub fn union(&self, other: &Series) -> Series {
        self.concat(other).distinct()
    }

    /// Keep pairs whose value also occurs in the other series
    ///
    /// Nested comparison without hashing; cost is the product of the two
    /// lengths.
    pub fn intersection_by(
        &self,
        other: &Series,
        equal: impl Fn(&Value, &Value) -> bool + 'static,
    ) -> Series {
        let source = self.shared();
        let other = other.shared();

        Series::from_deferred(move || {
            let pairs = collect_pairs(source.as_ref())?;
            let other_pairs = collect_pairs(other.as_ref())?;

            Ok(pairs
                .into_iter()
                .filter(|(_, value)| {
                    other_pairs.iter().any(|(_, candidate)| equal(value, candidate))
                })
                .collect())
        })
    }

    /// Keep pairs whose value also occurs in the other series
    pub fn intersection(&self, other: &Series) -> Series {
        self.intersection_by(other, |a, b| a == b)
    }

    /// Keep pairs whose value does not occur in the other series
    pub fn except_by(
        &self,
        other: &Series,
        equal: impl Fn(&Value, &Value) -> bool + 'static,
    ) -> Series {
        let source = self.shared();
        let other = other.shared();

        Series::from_deferred(move || {
            let pairs = collect_pairs(source.as_ref())?;
            let other_pairs = collect_pairs(other.as_ref())?;

            Ok(pairs
                .into_iter()
                .filter(|(_, value)| {
                    !other_pairs.iter().any(|(_, candidate)| equal(value, candidate))
                })
                .collect())
        })
    }

    /// Keep pairs whose value does not occur in the other series
    pub fn except(&self, other: &Series) -> Series {
        self.except_by(other, |a, b| a == b)
    }
}
