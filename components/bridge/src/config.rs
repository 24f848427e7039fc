//! Context configuration

/// Default prefix of host failures raised inside the embedded runtime.
pub const DEFAULT_HOST_LABEL: &str = "Host";

/// Configuration applied when a [`Context`](crate::Context) is constructed.
///
/// # Examples
///
/// ```
/// use bridge::BridgeConfig;
///
/// let config = BridgeConfig::default()
///     .with_host_label("Python")
///     .with_memory_limit(64 * 1024 * 1024);
///
/// assert_eq!(config.host_label, "Python");
/// assert_eq!(config.memory_limit, Some(64 * 1024 * 1024));
/// assert_eq!(config.max_stack_size, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Name of the host runtime, used as `"<label> Exception: <text>"` when a
    /// host callable fails
    pub host_label: String,
    /// Heap limit of the embedded runtime in bytes
    pub memory_limit: Option<usize>,
    /// Maximum native stack the embedded runtime may use, in bytes
    pub max_stack_size: Option<usize>,
    /// Allocation volume that triggers an embedded collection, in bytes
    pub gc_threshold: Option<usize>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host_label: DEFAULT_HOST_LABEL.to_string(),
            memory_limit: None,
            max_stack_size: None,
            gc_threshold: None,
        }
    }
}

impl BridgeConfig {
    /// Set the host label
    pub fn with_host_label(mut self, label: impl Into<String>) -> Self {
        self.host_label = label.into();
        self
    }

    /// Set the embedded heap limit
    pub fn with_memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = Some(bytes);
        self
    }

    /// Set the embedded stack limit
    pub fn with_max_stack_size(mut self, bytes: usize) -> Self {
        self.max_stack_size = Some(bytes);
        self
    }

    /// Set the collection threshold
    pub fn with_gc_threshold(mut self, bytes: usize) -> Self {
        self.gc_threshold = Some(bytes);
        self
    }

    pub(crate) fn apply(&self, runtime: &rquickjs::Runtime) {
        if let Some(limit) = self.memory_limit {
            runtime.set_memory_limit(limit);
        }
        if let Some(limit) = self.max_stack_size {
            runtime.set_max_stack_size(limit);
        }
        if let Some(threshold) = self.gc_threshold {
            runtime.set_gc_threshold(threshold);
        }
    }
}
