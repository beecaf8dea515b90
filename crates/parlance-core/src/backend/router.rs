//! Backend router: prefix-based selection among configured backends.
//!
//! Model ids may carry a routing prefix (e.g. `ollama/llama3:8b`). The
//! router scans backends in configuration order; the first whose prefix
//! matches wins and the prefix is stripped, so backends always see their
//! native model names. Ids without a matching prefix go to the first
//! configured backend unchanged, which keeps single-backend deployments
//! working with no prefixes at all. Routing is deterministic -- there is
//! no fallback chain.

use super::box_adapter::BoxBackend;

struct RouteEntry {
    prefix: Option<String>,
    backend: BoxBackend,
}

/// A routing decision: the selected backend and the model id it should see.
pub struct Routed<'a> {
    pub backend: &'a BoxBackend,
    /// Model id with the matched prefix stripped (or unchanged when no
    /// prefix matched).
    pub model: String,
}

/// Ordered collection of configured backends with their routing prefixes.
pub struct BackendRouter {
    backends: Vec<RouteEntry>,
}

impl BackendRouter {
    /// Create an empty router.
    pub fn new() -> Self {
        Self {
            backends: Vec::new(),
        }
    }

    /// Register a backend with an optional routing prefix.
    ///
    /// Registration order is configuration order; earlier entries win on
    /// overlapping prefixes.
    pub fn register(&mut self, prefix: Option<String>, backend: BoxBackend) {
        self.backends.push(RouteEntry { prefix, backend });
    }

    /// Select the backend for a model id.
    ///
    /// Returns `None` only when no backends are registered.
    pub fn route(&self, model: &str) -> Option<Routed<'_>> {
        for entry in &self.backends {
            if let Some(prefix) = &entry.prefix {
                if let Some(stripped) = model.strip_prefix(prefix.as_str()) {
                    return Some(Routed {
                        backend: &entry.backend,
                        model: stripped.to_string(),
                    });
                }
            }
        }

        self.backends.first().map(|entry| Routed {
            backend: &entry.backend,
            model: model.to_string(),
        })
    }

    /// Look up a backend by its configured name (used by the model-list
    /// pass-through's explicit `?backend=` selector).
    pub fn by_name(&self, name: &str) -> Option<&BoxBackend> {
        self.backends
            .iter()
            .map(|entry| &entry.backend)
            .find(|backend| backend.name() == name)
    }

    /// The first configured backend, if any.
    pub fn first(&self) -> Option<&BoxBackend> {
        self.backends.first().map(|entry| &entry.backend)
    }

    /// Names of all registered backends, in configuration order.
    pub fn names(&self) -> Vec<&str> {
        self.backends
            .iter()
            .map(|entry| entry.backend.name())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

impl Default for BackendRouter {
    fn default() -> Self {
        Self::new()
    }
}
