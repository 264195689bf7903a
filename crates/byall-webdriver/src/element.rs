use crate::error::map_cmd_error;
use async_trait::async_trait;
use byall_core::{DriverError, ReferenceElement, SearchContext};
use fantoccini::Locator;
use fantoccini::elements::Element;

/// A located DOM element backed by a WebDriver session.
#[derive(Debug, Clone)]
pub struct WebElement(pub Element);

impl WebElement {
    pub async fn click(&self) -> Result<(), DriverError> {
        self.0.click().await.map_err(map_cmd_error)
    }

    pub async fn send_keys(&self, text: &str) -> Result<(), DriverError> {
        self.0.send_keys(text).await.map_err(map_cmd_error)
    }

    pub async fn is_displayed(&self) -> Result<bool, DriverError> {
        self.0.is_displayed().await.map_err(map_cmd_error)
    }
}

impl From<Element> for WebElement {
    fn from(element: Element) -> Self {
        Self(element)
    }
}

#[async_trait]
impl ReferenceElement for WebElement {
    async fn attribute(&self, name: &str) -> Result<Option<String>, DriverError> {
        self.0.attr(name).await.map_err(map_cmd_error)
    }

    async fn tag_name(&self) -> Result<String, DriverError> {
        self.0.tag_name().await.map_err(map_cmd_error)
    }

    async fn text(&self) -> Result<String, DriverError> {
        self.0.text().await.map_err(map_cmd_error)
    }
}

/// Queries scoped to the element's subtree.
#[async_trait]
impl SearchContext for WebElement {
    type Element = WebElement;

    async fn find_xpath(&self, xpath: &str) -> Result<WebElement, DriverError> {
        self.0
            .find(Locator::XPath(xpath))
            .await
            .map(WebElement)
            .map_err(map_cmd_error)
    }

    async fn find_all_xpath(&self, xpath: &str) -> Result<Vec<WebElement>, DriverError> {
        let elements = self
            .0
            .find_all(Locator::XPath(xpath))
            .await
            .map_err(map_cmd_error)?;
        Ok(elements.into_iter().map(WebElement).collect())
    }
}

/// How the reference element is first located on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seed {
    Id(String),
    Name(String),
    Css(String),
    XPath(String),
    LinkText(String),
}

impl Seed {
    /// CSS selector for seeds WebDriver has no native strategy for.
    pub(crate) fn name_selector(name: &str) -> String {
        format!("[name=\"{}\"]", name.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Seed::Id(v) => write!(f, "id={}", v),
            Seed::Name(v) => write!(f, "name={}", v),
            Seed::Css(v) => write!(f, "css={}", v),
            Seed::XPath(v) => write!(f, "xpath={}", v),
            Seed::LinkText(v) => write!(f, "link-text={}", v),
        }
    }
}
