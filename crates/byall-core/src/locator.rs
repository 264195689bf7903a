//! Multi-strategy element resolution.
//!
//! [`ByAll`] tries each query of its [`StrategyMap`] in order against a
//! [`SearchContext`]. Every query is evaluated as XPath, including the raw
//! `id`, `name`, `css`, `tagName` and `linkText` entries.

use crate::element::{ReferenceElement, SearchContext};
use crate::error::{DriverError, LocatorError};
use crate::strategy::StrategyMap;
use crate::xpath::QuotePolicy;
use async_trait::async_trait;
use std::fmt;
use tracing::{debug, info, warn};

/// Something usable wherever a single- or multi-element lookup is expected.
#[async_trait]
pub trait Locator: Send + Sync + fmt::Display {
    async fn find_element<C>(&self, context: &C) -> Result<C::Element, LocatorError>
    where
        C: SearchContext + ?Sized;

    async fn find_elements<C>(&self, context: &C) -> Result<Vec<C::Element>, LocatorError>
    where
        C: SearchContext + ?Sized;

    fn display_name(&self) -> String {
        self.to_string()
    }
}

/// Locator that re-finds an element through every strategy derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByAll {
    strategies: StrategyMap,
}

impl ByAll {
    pub fn new(strategies: StrategyMap) -> Self {
        Self { strategies }
    }

    pub async fn from_element<E>(element: &E) -> Result<Self, DriverError>
    where
        E: ReferenceElement + ?Sized,
    {
        Self::from_element_with(element, QuotePolicy::default()).await
    }

    pub async fn from_element_with<E>(element: &E, policy: QuotePolicy) -> Result<Self, DriverError>
    where
        E: ReferenceElement + ?Sized,
    {
        let strategies = StrategyMap::build(element, policy).await?;
        debug!(strategies = ?strategies.names(), "Built locator strategies");
        Ok(Self::new(strategies))
    }

    pub fn strategies(&self) -> &StrategyMap {
        &self.strategies
    }
}

#[async_trait]
impl Locator for ByAll {
    async fn find_element<C>(&self, context: &C) -> Result<C::Element, LocatorError>
    where
        C: SearchContext + ?Sized,
    {
        for entry in &self.strategies {
            let strategy = entry.strategy.name();
            debug!(strategy, query = %entry.query, "Trying locator");

            match context.find_xpath(&entry.query).await {
                Ok(element) => {
                    info!(strategy, "Element found");
                    return Ok(element);
                }
                Err(DriverError::NoSuchElement(_)) => {
                    debug!(strategy, "Element not found");
                }
                Err(DriverError::InvalidSelector(reason)) => {
                    debug!(strategy, query = %entry.query, %reason, "Invalid selector");
                }
                Err(source) => {
                    warn!(strategy, error = %source, "Locator failed");
                    return Err(LocatorError::Driver {
                        strategy: strategy.to_string(),
                        source,
                    });
                }
            }
        }

        Err(LocatorError::NoLocatorSucceeded {
            tried: self.strategies.names().into_iter().map(String::from).collect(),
        })
    }

    async fn find_elements<C>(&self, context: &C) -> Result<Vec<C::Element>, LocatorError>
    where
        C: SearchContext + ?Sized,
    {
        let mut found = Vec::new();
        for entry in &self.strategies {
            let strategy = entry.strategy.name();
            debug!(strategy, query = %entry.query, "Trying locator");

            match context.find_all_xpath(&entry.query).await {
                Ok(elements) if !elements.is_empty() => {
                    debug!(strategy, count = elements.len(), "Elements found");
                    found.extend(elements);
                }
                Ok(_) => {}
                Err(DriverError::InvalidSelector(reason)) => {
                    debug!(strategy, query = %entry.query, %reason, "Invalid selector");
                }
                Err(source) => {
                    warn!(strategy, error = %source, "Locator failed");
                    return Err(LocatorError::Driver {
                        strategy: strategy.to_string(),
                        source,
                    });
                }
            }
        }
        Ok(found)
    }
}

impl fmt::Display for ByAll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByAll with strategies: [{}]", self.strategies.names().join(", "))
    }
}
