// Source iterables that start every pipeline
// Author: Gabriel Demetrios Lafis

use std::cell::RefCell;
use std::sync::Arc;

use crate::data::Value;
use crate::utils::{PipelineError, PipelineResult};

use super::{Pair, PairCursor, PairIterable, SharedPairs, SharedValues, ValueCursor, ValueIterable};

/// Value source that is always exhausted
pub struct EmptyValues;

impl ValueIterable for EmptyValues {
    fn cursor(&self) -> Box<dyn ValueCursor> {
        Box::new(EmptyValuesCursor)
    }
}

struct EmptyValuesCursor;

impl ValueCursor for EmptyValuesCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        Ok(false)
    }

    fn current(&self) -> Value {
        Value::Absent
    }
}

/// Value source stepping through a shared buffer
pub struct ArrayValues {
    values: Arc<Vec<Value>>,
}

impl ArrayValues {
    /// Create a value source over the given buffer
    pub fn new(values: Vec<Value>) -> Self {
        ArrayValues {
            values: Arc::new(values),
        }
    }
}

impl ValueIterable for ArrayValues {
    fn cursor(&self) -> Box<dyn ValueCursor> {
        Box::new(ArrayValuesCursor {
            values: self.values.clone(),
            position: None,
        })
    }
}

struct ArrayValuesCursor {
    values: Arc<Vec<Value>>,
    position: Option<usize>,
}

impl ValueCursor for ArrayValuesCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        let next = self.position.map_or(0, |p| p + 1);

        if next < self.values.len() {
            self.position = Some(next);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn current(&self) -> Value {
        self.position
            .and_then(|p| self.values.get(p))
            .cloned()
            .unwrap_or(Value::Absent)
    }
}

/// Infinite integer source 0, 1, 2, ... used as the default auto-index
pub struct CountValues;

impl ValueIterable for CountValues {
    fn cursor(&self) -> Box<dyn ValueCursor> {
        Box::new(CountValuesCursor { current: None })
    }
}

struct CountValuesCursor {
    current: Option<i64>,
}

impl ValueCursor for CountValuesCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        self.current = Some(self.current.map_or(0, |c| c + 1));
        Ok(true)
    }

    fn current(&self) -> Value {
        self.current.map(Value::Integer).unwrap_or(Value::Absent)
    }
}

/// Which slot of a pair an extraction source reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairSlot {
    Index,
    Value,
}

/// Value source extracting one slot of every pair of a pair stream
pub struct ExtractValues {
    source: SharedPairs,
    slot: PairSlot,
}

impl ExtractValues {
    /// Create an extraction source over the index slot
    pub fn indexes(source: SharedPairs) -> Self {
        ExtractValues {
            source,
            slot: PairSlot::Index,
        }
    }

    /// Create an extraction source over the value slot
    pub fn values(source: SharedPairs) -> Self {
        ExtractValues {
            source,
            slot: PairSlot::Value,
        }
    }
}

impl ValueIterable for ExtractValues {
    fn cursor(&self) -> Box<dyn ValueCursor> {
        Box::new(ExtractValuesCursor {
            inner: self.source.cursor(),
            slot: self.slot,
        })
    }

    fn restartable(&self) -> bool {
        self.source.restartable()
    }
}

struct ExtractValuesCursor {
    inner: Box<dyn PairCursor>,
    slot: PairSlot,
}

impl ValueCursor for ExtractValuesCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        self.inner.advance()
    }

    fn current(&self) -> Value {
        let (index, value) = self.inner.current();

        match self.slot {
            PairSlot::Index => index,
            PairSlot::Value => value,
        }
    }
}

/// N-ary lockstep zip of value streams into array values
///
/// Terminates as soon as any input exhausts. Used to build row records
/// from parallel column arrays.
pub struct MultiValues {
    sources: Vec<SharedValues>,
}

impl MultiValues {
    /// Create a lockstep zip over the given value streams
    pub fn new(sources: Vec<SharedValues>) -> Self {
        MultiValues { sources }
    }
}

impl ValueIterable for MultiValues {
    fn cursor(&self) -> Box<dyn ValueCursor> {
        Box::new(MultiValuesCursor {
            inners: self.sources.iter().map(|s| s.cursor()).collect(),
        })
    }

    fn restartable(&self) -> bool {
        self.sources.iter().all(|s| s.restartable())
    }
}

struct MultiValuesCursor {
    inners: Vec<Box<dyn ValueCursor>>,
}

impl ValueCursor for MultiValuesCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        if self.inners.is_empty() {
            return Ok(false);
        }

        for inner in &mut self.inners {
            if !inner.advance()? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn current(&self) -> Value {
        Value::Array(self.inners.iter().map(|c| c.current()).collect())
    }
}

/// Single-shot value source backed by a user-supplied iterator
///
/// The first cursor drains the iterator; any later cursor fails on its
/// first advance because the sequence cannot be replayed.
pub struct GeneratorValues {
    iterator: RefCell<Option<Box<dyn Iterator<Item = Value>>>>,
}

impl GeneratorValues {
    /// Create a single-shot source from an iterator
    pub fn new(iterator: impl Iterator<Item = Value> + 'static) -> Self {
        GeneratorValues {
            iterator: RefCell::new(Some(Box::new(iterator))),
        }
    }
}

impl ValueIterable for GeneratorValues {
    fn cursor(&self) -> Box<dyn ValueCursor> {
        match self.iterator.borrow_mut().take() {
            Some(iterator) => Box::new(GeneratorValuesCursor {
                iterator,
                current: None,
            }),
            None => Box::new(SpentGeneratorCursor),
        }
    }

    fn restartable(&self) -> bool {
        false
    }
}

struct GeneratorValuesCursor {
    iterator: Box<dyn Iterator<Item = Value>>,
    current: Option<Value>,
}

impl ValueCursor for GeneratorValuesCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        self.current = self.iterator.next();
        Ok(self.current.is_some())
    }

    fn current(&self) -> Value {
        self.current.clone().unwrap_or(Value::Absent)
    }
}

struct SpentGeneratorCursor;

impl ValueCursor for SpentGeneratorCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        Err(PipelineError::InvalidArgument(
            "a generator-backed pipeline cannot be consumed twice".to_string()
        ))
    }

    fn current(&self) -> Value {
        Value::Absent
    }
}

/// Pair source that is always exhausted
pub struct EmptyPairs;

impl PairIterable for EmptyPairs {
    fn cursor(&self) -> Box<dyn PairCursor> {
        Box::new(EmptyPairsCursor)
    }
}

struct EmptyPairsCursor;

impl PairCursor for EmptyPairsCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        Ok(false)
    }

    fn current(&self) -> Pair {
        (Value::Absent, Value::Absent)
    }
}

/// Pair source stepping through a shared buffer
///
/// This is the baked representation every materializing operation
/// produces.
pub struct ArrayPairs {
    pairs: Arc<Vec<Pair>>,
}

impl ArrayPairs {
    /// Create a pair source over the given buffer
    pub fn new(pairs: Vec<Pair>) -> Self {
        ArrayPairs {
            pairs: Arc::new(pairs),
        }
    }

    /// Create a pair source over an already shared buffer
    pub fn shared(pairs: Arc<Vec<Pair>>) -> Self {
        ArrayPairs { pairs }
    }
}

impl PairIterable for ArrayPairs {
    fn cursor(&self) -> Box<dyn PairCursor> {
        Box::new(ArrayPairsCursor {
            pairs: self.pairs.clone(),
            position: None,
        })
    }
}

struct ArrayPairsCursor {
    pairs: Arc<Vec<Pair>>,
    position: Option<usize>,
}

impl PairCursor for ArrayPairsCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        let next = self.position.map_or(0, |p| p + 1);

        if next < self.pairs.len() {
            self.position = Some(next);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn current(&self) -> Pair {
        self.position
            .and_then(|p| self.pairs.get(p))
            .cloned()
            .unwrap_or((Value::Absent, Value::Absent))
    }
}

/// Pair source zipping an index stream with a value stream
///
/// Terminates when either side exhausts.
pub struct ZipPairs {
    indexes: SharedValues,
    values: SharedValues,
}

impl ZipPairs {
    /// Create a pair source from parallel index and value streams
    pub fn new(indexes: SharedValues, values: SharedValues) -> Self {
        ZipPairs { indexes, values }
    }
}

impl PairIterable for ZipPairs {
    fn cursor(&self) -> Box<dyn PairCursor> {
        Box::new(ZipPairsCursor {
            indexes: self.indexes.cursor(),
            values: self.values.cursor(),
        })
    }

    fn restartable(&self) -> bool {
        self.indexes.restartable() && self.values.restartable()
    }
}

struct ZipPairsCursor {
    indexes: Box<dyn ValueCursor>,
    values: Box<dyn ValueCursor>,
}

impl PairCursor for ZipPairsCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        let has_index = self.indexes.advance()?;
        let has_value = self.values.advance()?;
        Ok(has_index && has_value)
    }

    fn current(&self) -> Pair {
        (self.indexes.current(), self.values.current())
    }
}
