// Iteration module for the lazy pipeline contracts
// Author: Gabriel Demetrios Lafis

mod cache;
mod operator;
mod source;

pub use cache::*;
pub use operator::*;
pub use source::*;

use std::sync::Arc;

use crate::data::Value;
use crate::utils::{PipelineError, PipelineResult};

/// Represents an index/value pair, the universal element of every pipeline
pub type Pair = (Value, Value);

/// Single-pass cursor over a stream of values
///
/// `current` is defined only after a successful `advance`; once `advance`
/// has returned false the cursor is terminal.
pub trait ValueCursor {
    /// Attempt to move to the next value
    fn advance(&mut self) -> PipelineResult<bool>;

    /// Get the current value
    fn current(&self) -> Value;
}

/// Re-startable producer of value cursors
pub trait ValueIterable {
    /// Get a fresh cursor positioned before the first value
    fn cursor(&self) -> Box<dyn ValueCursor>;

    /// Check whether a second cursor replays the same sequence
    fn restartable(&self) -> bool {
        true
    }
}

/// Single-pass cursor over a stream of pairs
pub trait PairCursor {
    /// Attempt to move to the next pair
    fn advance(&mut self) -> PipelineResult<bool>;

    /// Get the current pair
    fn current(&self) -> Pair;
}

/// Re-startable producer of pair cursors
pub trait PairIterable {
    /// Get a fresh cursor positioned before the first pair
    fn cursor(&self) -> Box<dyn PairCursor>;

    /// Check whether a second cursor replays the same sequence
    fn restartable(&self) -> bool {
        true
    }
}

/// Shared handle to a value iterable
pub type SharedValues = Arc<dyn ValueIterable>;

/// Shared handle to a pair iterable
pub type SharedPairs = Arc<dyn PairIterable>;

/// Predicate over a (value, index) pair
pub type Predicate = Arc<dyn Fn(&Value, &Value) -> bool>;

/// Selector mapping (value, index) to a replacement value
pub type Selector = Arc<dyn Fn(&Value, &Value) -> Value>;

/// Selector whose evaluation may fail
pub type FallibleSelector = Arc<dyn Fn(&Value, &Value) -> PipelineResult<Value>>;

/// Selector mapping (value, index) to a replacement pair
pub type PairSelector = Arc<dyn Fn(&Value, &Value) -> Pair>;

/// N-ary zipper over the values of parallel pair streams
pub type ValueZipper = Arc<dyn Fn(&[Value]) -> Value>;

/// N-ary zipper over the pairs of parallel pair streams
pub type PairZipper = Arc<dyn Fn(&[Pair]) -> Value>;

/// Drive a pair cursor to completion and collect every pair
pub fn collect_pairs(iterable: &dyn PairIterable) -> PipelineResult<Vec<Pair>> {
    let mut cursor = iterable.cursor();
    let mut pairs = Vec::new();

    while cursor.advance()? {
        pairs.push(cursor.current());
    }

    Ok(pairs)
}

/// Drive a value cursor to completion and collect every value
pub fn collect_values(iterable: &dyn ValueIterable) -> PipelineResult<Vec<Value>> {
    let mut cursor = iterable.cursor();
    let mut values = Vec::new();

    while cursor.advance()? {
        values.push(cursor.current());
    }

    Ok(values)
}

/// Check that a pipeline can be consumed more than once
///
/// Operations that re-iterate their source fail on generator-backed
/// pipelines instead of silently replaying an exhausted stream.
pub fn ensure_restartable(iterable: &dyn PairIterable, operation: &str) -> PipelineResult<()> {
    if iterable.restartable() {
        Ok(())
    } else {
        Err(PipelineError::InvalidArgument(
            format!("{} requires a restartable pipeline", operation)
        ))
    }
}
