//! Configuration snapshot provider
//!
//! Holds the last loaded [`LoggerConfig`] behind an atomically swappable
//! pointer. Readers never block and never see a half-updated configuration:
//! they either get the old `Arc` or the new one.

use super::config::LoggerConfig;
use super::diagnostics::DiagnosticSink;
use super::error::Result;
use arc_swap::ArcSwapOption;
use std::sync::Arc;

/// Produces a fresh configuration on every call
pub trait ConfigSource: Send + Sync {
    /// Load a complete configuration.
    ///
    /// Recoverable problems with individual values are reported to
    /// `diagnostics` and replaced by defaults. Only a fatal problem is
    /// returned as an error.
    fn load(&self, diagnostics: &dyn DiagnosticSink) -> Result<LoggerConfig>;
}

/// A source that always yields the same configuration
#[derive(Debug, Clone)]
pub struct StaticSource(pub LoggerConfig);

impl ConfigSource for StaticSource {
    fn load(&self, _diagnostics: &dyn DiagnosticSink) -> Result<LoggerConfig> {
        Ok(self.0.clone())
    }
}

pub struct ConfigProvider {
    source: Box<dyn ConfigSource>,
    cached: ArcSwapOption<LoggerConfig>,
    use_cache: bool,
}

impl ConfigProvider {
    pub fn new(source: impl ConfigSource + 'static) -> Self {
        Self::from_boxed(Box::new(source))
    }

    pub fn from_boxed(source: Box<dyn ConfigSource>) -> Self {
        Self {
            source,
            cached: ArcSwapOption::empty(),
            use_cache: true,
        }
    }

    /// Disable caching so every [`get`](Self::get) reloads from the source.
    ///
    /// Makes tests deterministic at the cost of a reload per log call.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    #[must_use]
    pub fn uses_cache(&self) -> bool {
        self.use_cache
    }

    /// Current configuration, loading it first if nothing is cached or
    /// caching is disabled
    pub fn get(&self, diagnostics: &dyn DiagnosticSink) -> Result<Arc<LoggerConfig>> {
        if self.use_cache {
            if let Some(config) = self.cached.load_full() {
                return Ok(config);
            }
        }
        self.refresh(diagnostics)
    }

    /// Reload from the source and atomically replace the cached snapshot.
    ///
    /// On error the previous snapshot is left in place.
    pub fn refresh(&self, diagnostics: &dyn DiagnosticSink) -> Result<Arc<LoggerConfig>> {
        let config = Arc::new(self.source.load(diagnostics)?);
        self.cached.store(Some(Arc::clone(&config)));
        Ok(config)
    }

    /// Last successfully loaded snapshot, without touching the source
    #[must_use]
    pub fn current(&self) -> Option<Arc<LoggerConfig>> {
        self.cached.load_full()
    }
}

impl std::fmt::Debug for ConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigProvider")
            .field("cached", &self.cached.load_full())
            .field("use_cache", &self.use_cache)
            .finish_non_exhaustive()
    }
}
