//! Error types for the bean factory.

use thiserror::Error;

/// Boxed error produced by a failing constructor.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while resolving a single component.
///
/// Every variant is terminal for the initialization pass that raised it: the
/// resolver never retries, substitutes defaults or skips a component.
///
/// # Examples
///
/// ```rust
/// use bean_factory::BeanError;
///
/// let missing = BeanError::NoConstructor("app::UserService");
/// assert_eq!(missing.to_string(), "No usable constructor for: app::UserService");
///
/// let cycle = BeanError::CircularDependency(vec!["A", "B", "A"]);
/// assert_eq!(cycle.to_string(), "Circular dependency: A -> B -> A");
/// ```
#[derive(Debug, Error)]
pub enum BeanError {
    /// The type has no usable constructor (none declared, none marked under a
    /// strict policy, or the type is not catalogued at all)
    #[error("No usable constructor for: {0}")]
    NoConstructor(&'static str),

    /// A constructor parameter names a type the factory can neither build nor
    /// supply
    #[error("Cannot resolve parameter {position} of {component}: {parameter} is not a known component")]
    UnresolvableParameter {
        /// Component whose constructor declared the parameter
        component: &'static str,
        /// Type of the unresolvable parameter
        parameter: &'static str,
        /// Zero-based position in the constructor's parameter list
        position: usize,
    },

    /// The constructor itself failed or panicked
    #[error("Failed to instantiate {component}: {source}")]
    Instantiation {
        /// Component being built
        component: &'static str,
        /// Underlying constructor failure
        #[source]
        source: BoxError,
    },

    /// More than one constructor is marked as the injection point
    #[error("Ambiguous constructor for {component}: {count} injection points")]
    AmbiguousConstructor {
        /// Component with the conflicting markers
        component: &'static str,
        /// Number of constructors marked as injection points
        count: usize,
    },

    /// A type was requested while it was still being resolved (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    CircularDependency(Vec<&'static str>),

    /// Maximum recursion depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),

    /// A resolved argument could not be downcast to the declared parameter
    /// type, or the selected constructor builds a different type than the
    /// component it is registered for
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
}

impl BeanError {
    /// Wraps a constructor failure for `component`.
    pub fn instantiation(component: &'static str, source: impl Into<BoxError>) -> Self {
        BeanError::Instantiation {
            component,
            source: source.into(),
        }
    }
}

/// Payload of a constructor that panicked instead of returning.
///
/// Appears as the source of [`BeanError::Instantiation`].
#[derive(Debug, Error)]
#[error("constructor panicked: {message}")]
pub struct ConstructorPanic {
    message: String,
}

impl ConstructorPanic {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The panic message, or a placeholder for non-string payloads.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Top-level failure of [`BeanFactory::initialize`](crate::BeanFactory::initialize).
///
/// Carries the candidate whose resolution failed and the first error raised
/// anywhere in its dependency chain. After this error the factory must be
/// treated as unusable.
#[derive(Debug, Error)]
#[error("Failed to initialize {candidate}: {source}")]
pub struct InitializationError {
    candidate: &'static str,
    #[source]
    source: BeanError,
}

impl InitializationError {
    pub(crate) fn new(candidate: &'static str, source: BeanError) -> Self {
        Self { candidate, source }
    }

    /// Name of the candidate being initialized when the pass failed.
    pub fn candidate(&self) -> &'static str {
        self.candidate
    }

    /// The underlying resolution error.
    pub fn cause(&self) -> &BeanError {
        &self.source
    }

    /// Consumes the error, returning the underlying resolution error.
    pub fn into_cause(self) -> BeanError {
        self.source
    }
}

/// Result type for resolution operations.
pub type BeanResult<T> = Result<T, BeanError>;
