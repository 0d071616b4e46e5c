//! Engine configuration.

/// Configuration for a map engine.
#[derive(Debug, Clone)]
pub struct Config {
    /// Initial capacity of the base store.
    pub initial_capacity: usize,

    /// Whether to reclaim terminal contexts immediately on commit/rollback.
    ///
    /// When disabled (the default), terminal contexts stay registered until
    /// `forget` or `reap_terminal`, so a double commit is reported as an
    /// invalid state instead of an unknown transaction.
    pub auto_reap: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            auto_reap: false,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial base store capacity.
    #[must_use]
    pub const fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Sets whether terminal contexts are reclaimed immediately.
    #[must_use]
    pub const fn auto_reap(mut self, value: bool) -> Self {
        self.auto_reap = value;
        self
    }
}
