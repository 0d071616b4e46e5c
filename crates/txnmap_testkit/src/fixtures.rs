//! Test fixtures and engine helpers.
//!
//! Provides convenience wrappers for setting up test engines, sessions, and
//! pre-seeded committed state.

use std::sync::Arc;
use txnmap_core::{Config, MapEngine, Session};

/// A test engine over `String` keys and values.
#[derive(Debug, Default)]
pub struct TestMap {
    /// The shared engine.
    pub engine: Arc<MapEngine<String, String>>,
}

impl TestMap {
    /// Creates a new empty test engine.
    #[must_use]
    pub fn new() -> Self {
        Self {
            engine: Arc::new(MapEngine::new()),
        }
    }

    /// Creates a test engine with custom configuration.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            engine: Arc::new(MapEngine::with_config(config)),
        }
    }

    /// Creates a test engine with entries already committed.
    #[must_use]
    pub fn seeded(entries: &[(&str, &str)]) -> Self {
        let map = Self::new();
        map.engine
            .put_all(
                None,
                entries
                    .iter()
                    .map(|(k, v)| ((*k).to_owned(), (*v).to_owned())),
            )
            .expect("seeding outside a transaction cannot fail");
        map
    }

    /// Opens a fresh session on the shared engine.
    #[must_use]
    pub fn session(&self) -> Session<String, String> {
        Session::new(Arc::clone(&self.engine))
    }
}

/// Initializes tracing for tests, honoring `RUST_LOG`.
///
/// Safe to call from multiple tests; only the first call installs the
/// subscriber.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
