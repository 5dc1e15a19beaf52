//! Execution engines for batches of independent trials
//!
//! Monte Carlo trials share nothing but a read-only model, so a batch can
//! run sequentially in the current thread or across a Rayon pool. Results
//! always come back indexed by trial, whichever engine ran them.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Execution strategy for batch operations
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStrategy {
    /// Process items sequentially
    #[default]
    Sequential,
    /// Process items in parallel
    Parallel,
}

/// Trait for execution engines that control how a batch is performed
pub trait ExecutionEngine: Clone + Send + Sync {
    /// Execute `f` for every index in `0..count`, collecting results in index order
    fn execute_batch<F, R>(&self, count: usize, f: F) -> Vec<R>
    where
        F: Fn(usize) -> R + Sync + Send,
        R: Send;

    /// Get the execution strategy
    fn strategy(&self) -> ExecutionStrategy;

    /// Get the number of threads available
    fn num_threads(&self) -> usize;
}

/// Sequential execution engine
///
/// Executes all operations sequentially in the current thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialEngine;

impl ExecutionEngine for SequentialEngine {
    fn execute_batch<F, R>(&self, count: usize, f: F) -> Vec<R>
    where
        F: Fn(usize) -> R + Sync + Send,
        R: Send,
    {
        (0..count).map(f).collect()
    }

    fn strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Sequential
    }

    fn num_threads(&self) -> usize {
        1
    }
}

/// Parallel execution engine using Rayon
///
/// Executes operations in parallel using Rayon's thread pool.
#[cfg(feature = "parallel")]
#[derive(Clone, Debug, Default)]
pub struct ParallelEngine {
    thread_pool: Option<std::sync::Arc<rayon::ThreadPool>>,
}

#[cfg(feature = "parallel")]
impl ParallelEngine {
    /// Create a new parallel engine with the global thread pool
    pub fn new() -> Self {
        Self { thread_pool: None }
    }

    /// Create with a specific number of threads
    pub fn with_num_threads(num_threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|e| Error::Execution(format!("Failed to create thread pool: {e}")))?;

        Ok(Self {
            thread_pool: Some(std::sync::Arc::new(pool)),
        })
    }
}

#[cfg(feature = "parallel")]
impl ExecutionEngine for ParallelEngine {
    fn execute_batch<F, R>(&self, count: usize, f: F) -> Vec<R>
    where
        F: Fn(usize) -> R + Sync + Send,
        R: Send,
    {
        use rayon::prelude::*;

        if let Some(pool) = &self.thread_pool {
            pool.install(|| (0..count).into_par_iter().map(f).collect())
        } else {
            (0..count).into_par_iter().map(f).collect()
        }
    }

    fn strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Parallel
    }

    fn num_threads(&self) -> usize {
        if let Some(pool) = &self.thread_pool {
            pool.current_num_threads()
        } else {
            rayon::current_num_threads()
        }
    }
}

/// Run a batch with the engine selected by `strategy`
///
/// # Errors
///
/// [`Error::FeatureNotAvailable`] when `Parallel` is requested but the
/// crate was built without the `parallel` feature.
pub fn execute_batch<F, R>(strategy: ExecutionStrategy, count: usize, f: F) -> Result<Vec<R>>
where
    F: Fn(usize) -> R + Sync + Send,
    R: Send,
{
    match strategy {
        ExecutionStrategy::Sequential => {
            tracing::debug!(count, "running sequential batch");
            Ok(SequentialEngine.execute_batch(count, f))
        }
        #[cfg(feature = "parallel")]
        ExecutionStrategy::Parallel => {
            let engine = ParallelEngine::new();
            tracing::debug!(threads = engine.num_threads(), count, "running parallel batch");
            Ok(engine.execute_batch(count, f))
        }
        #[cfg(not(feature = "parallel"))]
        ExecutionStrategy::Parallel => Err(Error::FeatureNotAvailable(
            "parallel execution requires the `parallel` feature".to_string(),
        )),
    }
}
