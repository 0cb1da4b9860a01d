/// Tunables for the process-global task engine.
///
/// Passed to [`crate::engine::init`] before the first loop runs; loops
/// started without an explicit `init` use the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Volume threshold at or below which a sub-range becomes a leaf instead
    /// of splitting further. The default of 1 recurses to single-point
    /// leaves; larger grains are a performance knob and do not change the
    /// ordering guarantees.
    pub grain: u64,
    /// Number of worker threads; `None` uses the pool's own default.
    pub threads: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grain: 1,
            threads: None,
        }
    }
}
