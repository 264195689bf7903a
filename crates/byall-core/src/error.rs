use thiserror::Error;

/// Failures reported by the browser driver for a single query or read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// The query ran but matched nothing.
    #[error("No such element: {0}")]
    NoSuchElement(String),

    /// The query string was rejected by the engine.
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// The element handle no longer refers to a node in the document.
    #[error("Stale element reference: {0}")]
    StaleElement(String),

    /// Anything else: transport, session, or protocol failures.
    #[error("Session error: {0}")]
    Session(String),
}

impl DriverError {
    pub fn is_no_such_element(&self) -> bool {
        matches!(self, DriverError::NoSuchElement(_))
    }

    pub fn is_invalid_selector(&self) -> bool {
        matches!(self, DriverError::InvalidSelector(_))
    }
}

/// Errors surfaced to callers of a [`Locator`](crate::locator::Locator).
#[derive(Debug, Clone, Error)]
pub enum LocatorError {
    /// Every strategy was tried and none matched.
    #[error("Element could not be located using any strategy (tried: {})", .tried.join(", "))]
    NoLocatorSucceeded { tried: Vec<String> },

    /// A strategy failed in a way the resolver does not skip.
    #[error("Strategy '{strategy}' failed: {source}")]
    Driver {
        strategy: String,
        #[source]
        source: DriverError,
    },
}

impl LocatorError {
    /// Name of the strategy that produced the failure, if any single one did.
    pub fn strategy(&self) -> Option<&str> {
        match self {
            LocatorError::Driver { strategy, .. } => Some(strategy),
            LocatorError::NoLocatorSucceeded { .. } => None,
        }
    }
}
