// Deferred materialization with replayable caching
// Author: Gabriel Demetrios Lafis

use std::cell::RefCell;
use std::sync::Arc;

use crate::data::Value;
use crate::utils::PipelineResult;

use super::{Pair, PairCursor, PairIterable};

/// Pair iterable backed by a deferred computation
///
/// The first cursor to advance runs the compute closure and caches the
/// produced pair array; later cursors replay the cache. A failed
/// computation is not cached, so a new consumer retries.
pub struct CachedIterable {
    state: Arc<CachedState>,
}

struct CachedState {
    compute: Box<dyn Fn() -> PipelineResult<Vec<Pair>>>,
    cache: RefCell<Option<Arc<Vec<Pair>>>>,
}

impl CachedIterable {
    /// Create a deferred iterable from a compute closure
    pub fn new(compute: impl Fn() -> PipelineResult<Vec<Pair>> + 'static) -> Self {
        CachedIterable {
            state: Arc::new(CachedState {
                compute: Box::new(compute),
                cache: RefCell::new(None),
            }),
        }
    }
}

impl PairIterable for CachedIterable {
    fn cursor(&self) -> Box<dyn PairCursor> {
        Box::new(CachedCursor {
            state: self.state.clone(),
            pairs: None,
            position: None,
        })
    }
}

struct CachedCursor {
    state: Arc<CachedState>,
    pairs: Option<Arc<Vec<Pair>>>,
    position: Option<usize>,
}

impl CachedCursor {
    /// Resolve the cached pair array, computing it on first use
    fn resolve(&mut self) -> PipelineResult<Arc<Vec<Pair>>> {
        if let Some(pairs) = &self.pairs {
            return Ok(pairs.clone());
        }

        let cached = self.state.cache.borrow().clone();

        let pairs = match cached {
            Some(pairs) => pairs,
            None => {
                let computed = Arc::new((self.state.compute)()?);
                *self.state.cache.borrow_mut() = Some(computed.clone());
                computed
            },
        };

        self.pairs = Some(pairs.clone());
        Ok(pairs)
    }
}

impl PairCursor for CachedCursor {
    fn advance(&mut self) -> PipelineResult<bool> {
        let pairs = self.resolve()?;
        let next = self.position.map_or(0, |p| p + 1);

        if next < pairs.len() {
            self.position = Some(next);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn current(&self) -> Pair {
        self.position
            .and_then(|p| self.pairs.as_ref().and_then(|pairs| pairs.get(p)))
            .cloned()
            .unwrap_or((Value::Absent, Value::Absent))
    }
}
