//! Element and search-context capabilities.
//!
//! The resolver never talks to a browser directly. It reads a reference
//! element through [`ReferenceElement`] and evaluates queries through
//! [`SearchContext`]; the WebDriver adapter and the test mocks implement both.

use crate::error::DriverError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attributes read from the reference element, in the order they are
/// conjoined into the `xpath-allattributes` query.
pub const PROBE_ATTRIBUTES: [&str; 6] = ["id", "name", "class", "placeholder", "data-id", "data-lp-id"];

/// Read-only view of a previously located element.
#[async_trait]
pub trait ReferenceElement: Send + Sync {
    /// Returns `Ok(None)` when the attribute is not set.
    async fn attribute(&self, name: &str) -> Result<Option<String>, DriverError>;

    async fn tag_name(&self) -> Result<String, DriverError>;

    /// Visible text of the element.
    async fn text(&self) -> Result<String, DriverError>;
}

/// A document or element subtree that XPath queries run against.
#[async_trait]
pub trait SearchContext: Send + Sync {
    type Element: Send;

    /// First match. A query that matches nothing fails with
    /// [`DriverError::NoSuchElement`].
    async fn find_xpath(&self, xpath: &str) -> Result<Self::Element, DriverError>;

    /// All matches in document order, possibly empty.
    async fn find_all_xpath(&self, xpath: &str) -> Result<Vec<Self::Element>, DriverError>;
}

/// Point-in-time copy of everything the strategy builder reads from an element.
///
/// Empty strings count as absent: `attribute("id")` and `text()` only ever
/// return non-empty values, however the snapshot was constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    pub tag_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl ElementSnapshot {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = non_empty(text.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        match non_empty(value.into()) {
            Some(value) => {
                self.attributes.insert(name, value);
            }
            None => {
                self.attributes.remove(&name);
            }
        }
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    /// Reads the tag name, the visible text and every probe attribute once.
    pub async fn capture<E>(element: &E) -> Result<Self, DriverError>
    where
        E: ReferenceElement + ?Sized,
    {
        let mut snapshot = Self::new(element.tag_name().await?);
        snapshot.text = non_empty(element.text().await?);
        for name in PROBE_ATTRIBUTES {
            if let Some(value) = element.attribute(name).await?.and_then(non_empty) {
                snapshot.attributes.insert(name.to_string(), value);
            }
        }
        Ok(snapshot)
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
