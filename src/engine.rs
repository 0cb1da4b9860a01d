//! Thin adapter to the external task executor.
//!
//! The runtime itself manages no OS threads; leaf jobs are handed to a rayon
//! thread pool. One process-global [`Engine`] is built lazily with default
//! tunables, or explicitly via [`init`] before the first loop.

use crate::config::Config;
use std::sync::OnceLock;
use thiserror::Error;

/// Failure to set up the task engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// [`init`] was called after the engine had already been built.
    #[error("task engine is already initialized")]
    AlreadyInitialized,
    /// The underlying worker pool could not be constructed.
    #[error("failed to build the worker pool")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

pub(crate) struct Engine {
    pool: rayon::ThreadPool,
    grain: u64,
}

static ENGINE: OnceLock<Engine> = OnceLock::new();

/// Builds the process-global engine from `config`.
///
/// Must run before the first loop; afterwards the engine is fixed for the
/// lifetime of the process.
///
/// # Errors
/// If the engine was already initialized (explicitly or by a prior loop), or
/// if the worker pool cannot be built.
pub fn init(config: Config) -> Result<(), EngineError> {
    let engine = Engine::new(config)?;
    ENGINE
        .set(engine)
        .map_err(|_| EngineError::AlreadyInitialized)
}

pub(crate) fn global() -> &'static Engine {
    ENGINE.get_or_init(|| {
        Engine::new(Config::default()).expect("engine: default worker pool construction")
    })
}

impl Engine {
    fn new(config: Config) -> Result<Self, EngineError> {
        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(|index| format!("loop-tree-{index}"));
        if let Some(threads) = config.threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build()?;
        tracing::debug!(
            threads = pool.current_num_threads(),
            grain = config.grain,
            "task engine initialized"
        );
        Ok(Self {
            pool,
            grain: config.grain.max(1),
        })
    }

    /// Leaf volume threshold the scheduler splits down to.
    #[inline]
    pub(crate) fn grain(&self) -> u64 {
        self.grain
    }

    /// Submits a ready job to the pool.
    #[inline]
    pub(crate) fn spawn(&self, job: impl FnOnce() + Send + 'static) {
        self.pool.spawn(job);
    }
}
