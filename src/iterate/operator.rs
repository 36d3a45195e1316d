// Operator iterables that transform pair streams
// Author: Gabriel Demetrios Lafis

use crate::data::Value;
use crate::utils::{PipelineError, PipelineResult};

use super::{
    collect_pairs, FallibleSelector, Pair, PairCursor, PairIterable, PairSelector, PairZipper,
    Predicate, Selector, SharedPairs, ValueZipper,
};

/// Discards the first `count` pairs, then passes through
pub struct SkipIterable {
    source: SharedPairs,
    count: usize,
}

impl SkipIterable {
    /// Create a skip operator over the source
    pub fn new(source: SharedPairs, count: usize) -> Self {
        SkipIterable { source, count }
    }
}

impl PairIterable for SkipIterable {
    fn cursor(&self) -> Box<dyn PairCursor> {
        Box::new(SkipCursor {
            inner: self.source.cursor(),
            remaining: self.count,
        })
    }

    fn restartable(&self) -> bool {
        self.source.restartable()
    }
}

struct SkipCursor {
    inner: Box<dyn PairCursor>,
    remaining: usize,
}

impl PairCursor for SkipCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        while self.remaining > 0 {
            self.remaining -= 1;

            if !self.inner.advance()? {
                self.remaining = 0;
                return Ok(false);
            }
        }

        self.inner.advance()
    }

    fn current(&self) -> Pair {
        self.inner.current()
    }
}

/// Passes through the first `count` pairs, then terminates
pub struct TakeIterable {
    source: SharedPairs,
    count: usize,
}

impl TakeIterable {
    /// Create a take operator over the source
    pub fn new(source: SharedPairs, count: usize) -> Self {
        TakeIterable { source, count }
    }
}

impl PairIterable for TakeIterable {
    fn cursor(&self) -> Box<dyn PairCursor> {
        Box::new(TakeCursor {
            inner: self.source.cursor(),
            remaining: self.count,
        })
    }

    fn restartable(&self) -> bool {
        self.source.restartable()
    }
}

struct TakeCursor {
    inner: Box<dyn PairCursor>,
    remaining: usize,
}

impl PairCursor for TakeCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        if self.remaining == 0 {
            return Ok(false);
        }

        self.remaining -= 1;
        self.inner.advance()
    }

    fn current(&self) -> Pair {
        self.inner.current()
    }
}

/// Discards pairs while the predicate holds, then passes through
///
/// The first failing pair is emitted; the predicate is not re-evaluated
/// afterwards.
pub struct SkipWhileIterable {
    source: SharedPairs,
    predicate: Predicate,
}

impl SkipWhileIterable {
    /// Create a skip-while operator over the source
    pub fn new(source: SharedPairs, predicate: Predicate) -> Self {
        SkipWhileIterable { source, predicate }
    }
}

impl PairIterable for SkipWhileIterable {
    fn cursor(&self) -> Box<dyn PairCursor> {
        Box::new(SkipWhileCursor {
            inner: self.source.cursor(),
            predicate: self.predicate.clone(),
            skipping: true,
        })
    }

    fn restartable(&self) -> bool {
        self.source.restartable()
    }
}

struct SkipWhileCursor {
    inner: Box<dyn PairCursor>,
    predicate: Predicate,
    skipping: bool,
}

impl PairCursor for SkipWhileCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        if !self.skipping {
            return self.inner.advance();
        }

        while self.inner.advance()? {
            let (index, value) = self.inner.current();

            if !(self.predicate)(&value, &index) {
                self.skipping = false;
                return Ok(true);
            }
        }

        self.skipping = false;
        Ok(false)
    }

    fn current(&self) -> Pair {
        self.inner.current()
    }
}

/// Passes through pairs while the predicate holds, then terminates
///
/// The pair that fails the predicate is consumed to test it but never
/// emitted.
pub struct TakeWhileIterable {
    source: SharedPairs,
    predicate: Predicate,
}

impl TakeWhileIterable {
    /// Create a take-while operator over the source
    pub fn new(source: SharedPairs, predicate: Predicate) -> Self {
        TakeWhileIterable { source, predicate }
    }
}

impl PairIterable for TakeWhileIterable {
    fn cursor(&self) -> Box<dyn PairCursor> {
        Box::new(TakeWhileCursor {
            inner: self.source.cursor(),
            predicate: self.predicate.clone(),
            done: false,
        })
    }

    fn restartable(&self) -> bool {
        self.source.restartable()
    }
}

struct TakeWhileCursor {
    inner: Box<dyn PairCursor>,
    predicate: Predicate,
    done: bool,
}

impl PairCursor for TakeWhileCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        if self.done {
            return Ok(false);
        }

        if !self.inner.advance()? {
            self.done = true;
            return Ok(false);
        }

        let (index, value) = self.inner.current();

        if (self.predicate)(&value, &index) {
            Ok(true)
        } else {
            self.done = true;
            Ok(false)
        }
    }

    fn current(&self) -> Pair {
        self.inner.current()
    }
}

/// Pass-through filter keeping pairs that satisfy the predicate
pub struct FilterIterable {
    source: SharedPairs,
    predicate: Predicate,
}

impl FilterIterable {
    /// Create a filter operator over the source
    pub fn new(source: SharedPairs, predicate: Predicate) -> Self {
        FilterIterable { source, predicate }
    }
}

impl PairIterable for FilterIterable {
    fn cursor(&self) -> Box<dyn PairCursor> {
        Box::new(FilterCursor {
            inner: self.source.cursor(),
            predicate: self.predicate.clone(),
        })
    }

    fn restartable(&self) -> bool {
        self.source.restartable()
    }
}

struct FilterCursor {
    inner: Box<dyn PairCursor>,
    predicate: Predicate,
}

impl PairCursor for FilterCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        while self.inner.advance()? {
            let (index, value) = self.inner.current();

            if (self.predicate)(&value, &index) {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn current(&self) -> Pair {
        self.inner.current()
    }
}

/// Replaces each value with the selector result; the index is unchanged
pub struct SelectIterable {
    source: SharedPairs,
    selector: Selector,
}

impl SelectIterable {
    /// Create a select operator over the source
    pub fn new(source: SharedPairs, selector: Selector) -> Self {
        SelectIterable { source, selector }
    }
}

impl PairIterable for SelectIterable {
    fn cursor(&self) -> Box<dyn PairCursor> {
        Box::new(SelectCursor {
            inner: self.source.cursor(),
            selector: self.selector.clone(),
            current: None,
        })
    }

    fn restartable(&self) -> bool {
        self.source.restartable()
    }
}

struct SelectCursor {
    inner: Box<dyn PairCursor>,
    selector: Selector,
    current: Option<Pair>,
}

impl PairCursor for SelectCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        if !self.inner.advance()? {
            self.current = None;
            return Ok(false);
        }

        let (index, value) = self.inner.current();
        let selected = (self.selector)(&value, &index);
        self.current = Some((index, selected));
        Ok(true)
    }

    fn current(&self) -> Pair {
        self.current.clone().unwrap_or((Value::Absent, Value::Absent))
    }
}

/// Select operator whose selector may fail at evaluation time
///
/// Carries the parse family and other coercions; errors surface from the
/// terminal call that drives the cursor.
pub struct FallibleSelectIterable {
    source: SharedPairs,
    selector: FallibleSelector,
}

impl FallibleSelectIterable {
    /// Create a fallible select operator over the source
    pub fn new(source: SharedPairs, selector: FallibleSelector) -> Self {
        FallibleSelectIterable { source, selector }
    }
}

impl PairIterable for FallibleSelectIterable {
    fn cursor(&self) -> Box<dyn PairCursor> {
        Box::new(FallibleSelectCursor {
            inner: self.source.cursor(),
            selector: self.selector.clone(),
            current: None,
        })
    }

    fn restartable(&self) -> bool {
        self.source.restartable()
    }
}

struct FallibleSelectCursor {
    inner: Box<dyn PairCursor>,
    selector: FallibleSelector,
    current: Option<Pair>,
}

impl PairCursor for FallibleSelectCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        if !self.inner.advance()? {
            self.current = None;
            return Ok(false);
        }

        let (index, value) = self.inner.current();
        let selected = (self.selector)(&value, &index)?;
        self.current = Some((index, selected));
        Ok(true)
    }

    fn current(&self) -> Pair {
        self.current.clone().unwrap_or((Value::Absent, Value::Absent))
    }
}

/// Replaces the entire pair with the selector result
pub struct SelectPairsIterable {
    source: SharedPairs,
    selector: PairSelector,
}

impl SelectPairsIterable {
    /// Create a pair-select operator over the source
    pub fn new(source: SharedPairs, selector: PairSelector) -> Self {
        SelectPairsIterable { source, selector }
    }
}

impl PairIterable for SelectPairsIterable {
    fn cursor(&self) -> Box<dyn PairCursor> {
        Box::new(SelectPairsCursor {
            inner: self.source.cursor(),
            selector: self.selector.clone(),
            current: None,
        })
    }

    fn restartable(&self) -> bool {
        self.source.restartable()
    }
}

struct SelectPairsCursor {
    inner: Box<dyn PairCursor>,
    selector: PairSelector,
    current: Option<Pair>,
}

impl PairCursor for SelectPairsCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        if !self.inner.advance()? {
            self.current = None;
            return Ok(false);
        }

        let (index, value) = self.inner.current();
        self.current = Some((self.selector)(&value, &index));
        Ok(true)
    }

    fn current(&self) -> Pair {
        self.current.clone().unwrap_or((Value::Absent, Value::Absent))
    }
}

/// Flatten a producer value into plain values carrying the parent index
fn flatten_values(produced: Value, parent_index: &Value) -> PipelineResult<Vec<Pair>> {
    match produced {
        Value::Array(items) => Ok(items
            .into_iter()
            .map(|item| (parent_index.clone(), item))
            .collect()),
        Value::Series(series) => {
            let pairs = collect_pairs(series.shared().as_ref())?;
            Ok(pairs
                .into_iter()
                .map(|(_, value)| (parent_index.clone(), value))
                .collect())
        },
        Value::Frame(frame) => {
            let pairs = collect_pairs(frame.shared().as_ref())?;
            Ok(pairs
                .into_iter()
                .map(|(_, record)| (parent_index.clone(), record))
                .collect())
        },
        other => Err(PipelineError::ProducerShape(
            format!("select_many producer must yield an array, series or frame, got {}",
                other.type_name())
        )),
    }
}

/// Flatten a producer value into explicit pairs
fn flatten_pairs(produced: Value) -> PipelineResult<Vec<Pair>> {
    match produced {
        Value::Array(items) => {
            let mut pairs = Vec::new();

            for item in items {
                match item {
                    Value::Array(mut entry) if entry.len() == 2 => {
                        let value = entry.pop().unwrap_or(Value::Absent);
                        let index = entry.pop().unwrap_or(Value::Absent);
                        pairs.push((index, value));
                    },
                    other => {
                        return Err(PipelineError::ProducerShape(
                            format!("select_many_pairs producer must yield [index, value] \
                                pairs, got {}", other.type_name())
                        ));
                    },
                }
            }

            Ok(pairs)
        },
        Value::Series(series) => collect_pairs(series.shared().as_ref()),
        Value::Frame(frame) => collect_pairs(frame.shared().as_ref()),
        other => Err(PipelineError::ProducerShape(
            format!("select_many_pairs producer must yield an array, series or frame, got {}",
                other.type_name())
        )),
    }
}

/// Which flattening a select-many operator applies to its producer
#[derive(Debug, Clone, Copy, PartialEq)]
enum ManyShape {
    Values,
    Pairs,
}

/// One-to-many operator flattening producer collections
///
/// Each produced element carries the parent index; the pair flavour takes
/// the produced pairs as they are.
pub struct SelectManyIterable {
    source: SharedPairs,
    producer: Selector,
    shape: ManyShape,
}

impl SelectManyIterable {
    /// Create a select-many operator producing values
    pub fn values(source: SharedPairs, producer: Selector) -> Self {
        SelectManyIterable {
            source,
            producer,
            shape: ManyShape::Values,
        }
    }

    /// Create a select-many operator producing pairs
    pub fn pairs(source: SharedPairs, producer: Selector) -> Self {
        SelectManyIterable {
            source,
            producer,
            shape: ManyShape::Pairs,
        }
    }
}

impl PairIterable for SelectManyIterable {
    fn cursor(&self) -> Box<dyn PairCursor> {
        Box::new(SelectManyCursor {
            inner: self.source.cursor(),
            producer: self.producer.clone(),
            shape: self.shape,
            buffer: Vec::new(),
            position: None,
        })
    }

    fn restartable(&self) -> bool {
        self.source.restartable()
    }
}

struct SelectManyCursor {
    inner: Box<dyn PairCursor>,
    producer: Selector,
    shape: ManyShape,
    buffer: Vec<Pair>,
    position: Option<usize>,
}

impl PairCursor for SelectManyCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        loop {
            let next = self.position.map_or(0, |p| p + 1);

            if next < self.buffer.len() {
                self.position = Some(next);
                return Ok(true);
            }

            if !self.inner.advance()? {
                return Ok(false);
            }

            let (index, value) = self.inner.current();
            let produced = (self.producer)(&value, &index);

            self.buffer = match self.shape {
                ManyShape::Values => flatten_values(produced, &index)?,
                ManyShape::Pairs => flatten_pairs(produced)?,
            };
            self.position = None;
        }
    }

    fn current(&self) -> Pair {
        self.position
            .and_then(|p| self.buffer.get(p))
            .cloned()
            .unwrap_or((Value::Absent, Value::Absent))
    }
}

/// N-ary zip over the values of parallel pair streams
///
/// Advances every input in lockstep, terminates when any input exhausts,
/// and adopts the first input's index.
pub struct ValueZipIterable {
    sources: Vec<SharedPairs>,
    zipper: ValueZipper,
}

impl ValueZipIterable {
    /// Create a value zip over the given pair streams
    pub fn new(sources: Vec<SharedPairs>, zipper: ValueZipper) -> Self {
        ValueZipIterable { sources, zipper }
    }
}

impl PairIterable for ValueZipIterable {
    fn cursor(&self) -> Box<dyn PairCursor> {
        Box::new(ValueZipCursor {
            inners: self.sources.iter().map(|s| s.cursor()).collect(),
            zipper: self.zipper.clone(),
            current: None,
        })
    }

    fn restartable(&self) -> bool {
        self.sources.iter().all(|s| s.restartable())
    }
}

struct ValueZipCursor {
    inners: Vec<Box<dyn PairCursor>>,
    zipper: ValueZipper,
    current: Option<Pair>,
}

impl PairCursor for ValueZipCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        if self.inners.is_empty() {
            return Ok(false);
        }

        for inner in &mut self.inners {
            if !inner.advance()? {
                self.current = None;
                return Ok(false);
            }
        }

        let pairs: Vec<Pair> = self.inners.iter().map(|c| c.current()).collect();
        let values: Vec<Value> = pairs.iter().map(|(_, value)| value.clone()).collect();
        let index = pairs[0].0.clone();
        self.current = Some((index, (self.zipper)(&values)));
        Ok(true)
    }

    fn current(&self) -> Pair {
        self.current.clone().unwrap_or((Value::Absent, Value::Absent))
    }
}

/// N-ary zip over the full pairs of parallel pair streams
///
/// Like the value zip but the zipper sees whole pairs; the output still
/// adopts the first input's index.
pub struct PairZipIterable {
    sources: Vec<SharedPairs>,
    zipper: PairZipper,
}

impl PairZipIterable {
    /// Create a pair zip over the given pair streams
    pub fn new(sources: Vec<SharedPairs>, zipper: PairZipper) -> Self {
        PairZipIterable { sources, zipper }
    }
}

impl PairIterable for PairZipIterable {
    fn cursor(&self) -> Box<dyn PairCursor> {
        Box::new(PairZipCursor {
            inners: self.sources.iter().map(|s| s.cursor()).collect(),
            zipper: self.zipper.clone(),
            current: None,
        })
    }

    fn restartable(&self) -> bool {
        self.sources.iter().all(|s| s.restartable())
    }
}

struct PairZipCursor {
    inners: Vec<Box<dyn PairCursor>>,
    zipper: PairZipper,
    current: Option<Pair>,
}

impl PairCursor for PairZipCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        if self.inners.is_empty() {
            return Ok(false);
        }

        for inner in &mut self.inners {
            if !inner.advance()? {
                self.current = None;
                return Ok(false);
            }
        }

        let pairs: Vec<Pair> = self.inners.iter().map(|c| c.current()).collect();
        let index = pairs[0].0.clone();
        self.current = Some((index, (self.zipper)(&pairs)));
        Ok(true)
    }

    fn current(&self) -> Pair {
        self.current.clone().unwrap_or((Value::Absent, Value::Absent))
    }
}

/// Emits the left stream, then the right stream
pub struct ConcatIterable {
    first: SharedPairs,
    second: SharedPairs,
}

impl ConcatIterable {
    /// Create a concatenation of two pair streams
    pub fn new(first: SharedPairs, second: SharedPairs) -> Self {
        ConcatIterable { first, second }
    }
}

impl PairIterable for ConcatIterable {
    fn cursor(&self) -> Box<dyn PairCursor> {
        Box::new(ConcatCursor {
            first: self.first.cursor(),
            second: self.second.cursor(),
            on_second: false,
        })
    }

    fn restartable(&self) -> bool {
        self.first.restartable() && self.second.restartable()
    }
}

struct ConcatCursor {
    first: Box<dyn PairCursor>,
    second: Box<dyn PairCursor>,
    on_second: bool,
}

impl PairCursor for ConcatCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        if !self.on_second {
            if self.first.advance()? {
                return Ok(true);
            }

            self.on_second = true;
        }

        self.second.advance()
    }

    fn current(&self) -> Pair {
        if self.on_second {
            self.second.current()
        } else {
            self.first.current()
        }
    }
}

/// Emits one pair before the source stream
pub struct InsertIterable {
    source: SharedPairs,
    pair: Pair,
}

impl InsertIterable {
    /// Create a prepend operator over the source
    pub fn new(source: SharedPairs, pair: Pair) -> Self {
        InsertIterable { source, pair }
    }
}

impl PairIterable for InsertIterable {
    fn cursor(&self) -> Box<dyn PairCursor> {
        Box::new(InsertCursor {
            inner: self.source.cursor(),
            pair: self.pair.clone(),
            emitted: false,
            on_inner: false,
        })
    }

    fn restartable(&self) -> bool {
        self.source.restartable()
    }
}

struct InsertCursor {
    inner: Box<dyn PairCursor>,
    pair: Pair,
    emitted: bool,
    on_inner: bool,
}

impl PairCursor for InsertCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        if !self.emitted {
            self.emitted = true;
            return Ok(true);
        }

        self.on_inner = true;
        self.inner.advance()
    }

    fn current(&self) -> Pair {
        if self.on_inner {
            self.inner.current()
        } else {
            self.pair.clone()
        }
    }
}

/// Emits one pair after the source stream
pub struct AppendIterable {
    source: SharedPairs,
    pair: Pair,
}

impl AppendIterable {
    /// Create an append operator over the source
    pub fn new(source: SharedPairs, pair: Pair) -> Self {
        AppendIterable { source, pair }
    }
}

impl PairIterable for AppendIterable {
    fn cursor(&self) -> Box<dyn PairCursor> {
        Box::new(AppendCursor {
            inner: self.source.cursor(),
            pair: self.pair.clone(),
            on_pair: false,
            emitted: false,
        })
    }

    fn restartable(&self) -> bool {
        self.source.restartable()
    }
}

struct AppendCursor {
    inner: Box<dyn PairCursor>,
    pair: Pair,
    on_pair: bool,
    emitted: bool,
}

impl PairCursor for AppendCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        if !self.on_pair {
            if self.inner.advance()? {
                return Ok(true);
            }

            self.on_pair = true;
        }

        if self.emitted {
            return Ok(false);
        }

        self.emitted = true;
        Ok(true)
    }

    fn current(&self) -> Pair {
        if self.on_pair {
            self.pair.clone()
        } else {
            self.inner.current()
        }
    }
}
