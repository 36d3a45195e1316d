// Sort engine for series
// Author: Gabriel Demetrios Lafis

use std::cmp::Ordering;
use std::ops::Deref;

use crate::data::{compare_values, Value};
use crate::iterate::{collect_pairs, Pair, Selector, SharedPairs};

use super::Series;

/// One entry of an accumulated sort batch
#[derive(Clone)]
pub struct SortKey {
    selector: Selector,
    descending: bool,
}

impl SortKey {
    /// Create a sort key from a selector and direction
    pub fn new(selector: Selector, descending: bool) -> Self {
        SortKey {
            selector,
            descending,
        }
    }
}

/// Stably sort a materialized pair batch by a composite key list
///
/// Keys are computed once per pair; the comparator takes the first
/// non-equal key, honoring each key's direction.
pub fn sort_pairs(pairs: Vec<Pair>, keys: &[SortKey]) -> Vec<Pair> {
    let mut decorated: Vec<(Vec<Value>, Pair)> = pairs
        .into_iter()
        .map(|(index, value)| {
            let computed = keys
                .iter()
                .map(|key| (key.selector)(&value, &index))
                .collect();
            (computed, (index, value))
        })
        .collect();

    decorated.sort_by(|(a_keys, _), (b_keys, _)| {
        for (slot, key) in keys.iter().enumerate() {
            let mut ordering = compare_values(&a_keys[slot], &b_keys[slot]);

            if key.descending {
                ordering = ordering.reverse();
            }

            if ordering != Ordering::Equal {
                return ordering;
            }
        }

        Ordering::Equal
    });

    decorated.into_iter().map(|(_, pair)| pair).collect()
}

/// A series sorted by an accumulated key batch
///
/// Sorting is deferred until the first consumption, which materializes
/// the source and caches the sorted pairs. `then_by` extends a cloned
/// batch and leaves this pipeline untouched.
#[derive(Clone)]
pub struct SortedSeries {
    series: Series,
    source: SharedPairs,
    keys: Vec<SortKey>,
}

impl SortedSeries {
    /// Build a sorted series over a source and key batch
    pub(crate) fn build(source: SharedPairs, keys: Vec<SortKey>) -> SortedSeries {
        let sort_source = source.clone();
        let sort_keys = keys.clone();

        let series = Series::from_deferred(move || {
            let pairs = collect_pairs(sort_source.as_ref())?;
            Ok(sort_pairs(pairs, &sort_keys))
        });

        SortedSeries {
            series,
            source,
            keys,
        }
    }

    /// Add a further ascending sort key
    pub fn then_by(&self, selector: impl Fn(&Value, &Value) -> Value + 'static) -> SortedSeries {
        let mut keys = self.keys.clone();
        keys.push(SortKey::new(std::sync::Arc::new(selector), false));
        SortedSeries::build(self.source.clone(), keys)
    }

    /// Add a further descending sort key
    pub fn then_by_descending(
        &self,
        selector: impl Fn(&Value, &Value) -> Value + 'static,
    ) -> SortedSeries {
        let mut keys = self.keys.clone();
        keys.push(SortKey::new(std::sync::Arc::new(selector), true));
        SortedSeries::build(self.source.clone(), keys)
    }

    /// Get the sorted pipeline as a plain series
    pub fn as_series(&self) -> Series {
        self.series.clone()
    }
}

impl Deref for SortedSeries {
    type Target = Series;

    fn deref(&self) -> &Series {
        &self.series
    }
}

impl Series {
    /// Sort ascending by a key selector
    pub fn order_by(&self, selector: impl Fn(&Value, &Value) -> Value + 'static) -> SortedSeries {
        SortedSeries::build(
            self.shared(),
            vec![SortKey::new(std::sync::Arc::new(selector), false)],
        )
    }

    /// Sort descending by a key selector
    pub fn order_by_descending(
        &self,
        selector: impl Fn(&Value, &Value) -> Value + 'static,
    ) -> SortedSeries {
        SortedSeries::build(
            self.shared(),
            vec![SortKey::new(std::sync::Arc::new(selector), true)],
        )
    }
}
