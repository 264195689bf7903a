//! Fallback element location.
//!
//! Derives an ordered set of alternative queries from a reference element so
//! the "same" element can be found again after the page changes.

pub mod element;
pub mod error;
pub mod locator;
pub mod strategy;
pub mod xpath;

pub use element::{ElementSnapshot, PROBE_ATTRIBUTES, ReferenceElement, SearchContext};
pub use error::{DriverError, LocatorError};
pub use locator::{ByAll, Locator};
pub use strategy::{StrategyEntry, StrategyKind, StrategyMap};
pub use xpath::QuotePolicy;
