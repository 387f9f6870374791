//! Factory configuration.
//!
//! Options can be built in code, read from environment variables, or (with
//! the `config` feature) deserialized from JSON.

use std::env;

use crate::selection::ConstructorPolicy;

/// Default recursion limit for a single resolution chain.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Default environment variable prefix used by [`FactoryOptions::from_env`].
pub const DEFAULT_ENV_PREFIX: &str = "BEAN_FACTORY";

/// Tunables for a [`BeanFactory`](crate::BeanFactory).
///
/// # Examples
///
/// ```rust
/// use bean_factory::{ConstructorPolicy, FactoryOptions};
///
/// let options = FactoryOptions::default()
///     .with_constructor_policy(ConstructorPolicy::RequireInjectionPoint)
///     .with_max_depth(64);
///
/// assert_eq!(options.max_depth, 64);
/// assert!(options.record_graph);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct FactoryOptions {
    /// How a constructor is chosen when none is marked
    pub constructor_policy: ConstructorPolicy,
    /// Deepest resolution chain allowed before failing
    pub max_depth: usize,
    /// Whether to record the dependency graph while initializing
    pub record_graph: bool,
}

impl Default for FactoryOptions {
    fn default() -> Self {
        Self {
            constructor_policy: ConstructorPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            record_graph: true,
        }
    }
}

impl FactoryOptions {
    pub fn with_constructor_policy(mut self, policy: ConstructorPolicy) -> Self {
        self.constructor_policy = policy;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_record_graph(mut self, record_graph: bool) -> Self {
        self.record_graph = record_graph;
        self
    }

    /// Defaults overridden by `BEAN_FACTORY_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_env_with_prefix(DEFAULT_ENV_PREFIX)
    }

    /// Defaults overridden by `<PREFIX>_CONSTRUCTOR_POLICY`,
    /// `<PREFIX>_MAX_DEPTH` and `<PREFIX>_RECORD_GRAPH`.
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn from_env_with_prefix(prefix: &str) -> Self {
        let mut options = Self::default();
        let prefix = prefix.to_uppercase();

        if let Some(policy) = read_env(&prefix, "CONSTRUCTOR_POLICY") {
            options.constructor_policy = policy;
        }
        if let Some(depth) = read_env(&prefix, "MAX_DEPTH") {
            options.max_depth = depth;
        }
        if let Some(record) = read_env(&prefix, "RECORD_GRAPH") {
            options.record_graph = record;
        }
        options
    }

    /// Parses options from a JSON document. Missing fields keep their
    /// defaults.
    ///
    /// ```rust
    /// # #[cfg(feature = "config")]
    /// # {
    /// use bean_factory::{ConstructorPolicy, FactoryOptions};
    ///
    /// let options = FactoryOptions::from_json_str(
    ///     r#"{ "constructor_policy": "require-injection-point" }"#,
    /// ).unwrap();
    /// assert_eq!(options.constructor_policy, ConstructorPolicy::RequireInjectionPoint);
    /// assert_eq!(options.max_depth, bean_factory::DEFAULT_MAX_DEPTH);
    /// # }
    /// ```
    #[cfg(feature = "config")]
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn read_env<T: std::str::FromStr>(prefix: &str, name: &str) -> Option<T> {
    let var = format!("{}_{}", prefix, name);
    let raw = env::var(&var).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(variable = %var, value = %raw, "ignoring unparsable option");
            None
        }
    }
}
