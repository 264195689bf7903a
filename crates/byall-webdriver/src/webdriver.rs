use crate::element::{Seed, WebElement};
use crate::error::{map_cmd_error, map_session_error};
use async_trait::async_trait;
use byall_core::{DriverError, SearchContext};
use fantoccini::wd::WindowHandle;
use fantoccini::{Client, ClientBuilder, Locator};
use tracing::{debug, info};

pub struct WebDriverClient {
    pub client: Client,
}

impl WebDriverClient {
    pub async fn connect(
        url: &str,
        capabilities: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<Self, DriverError> {
        let mut caps = serde_json::Map::new();
        if let Some(user_caps) = capabilities {
            for (k, v) in user_caps {
                caps.insert(k, v);
            }
        }

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(url)
            .await
            .map_err(|e| map_session_error(url, e))?;

        info!("Connected to WebDriver at {}", url);
        Ok(Self { client })
    }

    pub async fn close(self) -> Result<(), DriverError> {
        self.client.close().await.map_err(map_cmd_error)
    }

    pub async fn goto(&self, url: &str) -> Result<(), DriverError> {
        info!("Navigating to: {}", url);
        self.client.goto(url).await.map_err(map_cmd_error)
    }

    /// Locates the reference element with a plain single-strategy query.
    pub async fn find(&self, seed: &Seed) -> Result<WebElement, DriverError> {
        debug!("Finding seed element {}", seed);
        let found = match seed {
            Seed::Id(id) => self.client.find(Locator::Id(id)).await,
            Seed::Name(name) => {
                let selector = Seed::name_selector(name);
                self.client.find(Locator::Css(&selector)).await
            }
            Seed::Css(selector) => self.client.find(Locator::Css(selector)).await,
            Seed::XPath(xpath) => self.client.find(Locator::XPath(xpath)).await,
            Seed::LinkText(text) => self.client.find(Locator::LinkText(text)).await,
        };
        found.map(WebElement).map_err(map_cmd_error)
    }

    pub async fn windows(&self) -> Result<Vec<WindowHandle>, DriverError> {
        self.client.windows().await.map_err(map_cmd_error)
    }

    /// Switches to the `index`-th open window, in the order the driver reports them.
    pub async fn switch_to_window(&self, index: usize) -> Result<(), DriverError> {
        let mut handles = self.windows().await?;
        let count = handles.len();
        if index >= count {
            return Err(DriverError::Session(format!(
                "No window at index {} ({} open)",
                index, count
            )));
        }
        let handle = handles.swap_remove(index);
        self.client
            .switch_to_window(handle)
            .await
            .map_err(map_cmd_error)?;
        info!("Switched to window {}", index);
        Ok(())
    }
}

/// Queries scoped to the whole current document.
#[async_trait]
impl SearchContext for WebDriverClient {
    type Element = WebElement;

    async fn find_xpath(&self, xpath: &str) -> Result<WebElement, DriverError> {
        self.client
            .find(Locator::XPath(xpath))
            .await
            .map(WebElement)
            .map_err(map_cmd_error)
    }

    async fn find_all_xpath(&self, xpath: &str) -> Result<Vec<WebElement>, DriverError> {
        let elements = self
            .client
            .find_all(Locator::XPath(xpath))
            .await
            .map_err(map_cmd_error)?;
        Ok(elements.into_iter().map(WebElement).collect())
    }
}
