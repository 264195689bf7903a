//! Explicit visibility waits.
//!
//! The resolver itself never waits; callers poll around it with these.

use crate::element::WebElement;
use async_trait::async_trait;
use byall_core::DriverError;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum WaitError {
    #[error("Timed out after {0:?} waiting for visibility")]
    Timeout(Duration),

    #[error(transparent)]
    Driver(#[from] DriverError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(250),
        }
    }
}

/// Anything whose visibility can be polled.
#[async_trait]
pub trait Displayed: Send + Sync {
    async fn is_displayed(&self) -> Result<bool, DriverError>;
}

#[async_trait]
impl Displayed for WebElement {
    async fn is_displayed(&self) -> Result<bool, DriverError> {
        WebElement::is_displayed(self).await
    }
}

pub async fn wait_until_visible<D>(element: &D, options: WaitOptions) -> Result<(), WaitError>
where
    D: Displayed + ?Sized,
{
    poll(options, move || async move { element.is_displayed().await }).await
}

/// Waits until every element is visible at the same time.
pub async fn wait_until_all_visible<D>(elements: &[D], options: WaitOptions) -> Result<(), WaitError>
where
    D: Displayed,
{
    poll(options, move || async move {
        for element in elements {
            match element.is_displayed().await {
                Ok(true) => {}
                other => return other,
            }
        }
        Ok(true)
    })
    .await
}

async fn poll<F, Fut>(options: WaitOptions, mut check: F) -> Result<(), WaitError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<bool, DriverError>>,
{
    let waiting = async {
        loop {
            match check().await {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(err) => return Err(WaitError::Driver(err)),
            }
            debug!("Not visible yet, polling again in {:?}", options.poll_interval);
            tokio::time::sleep(options.poll_interval).await;
        }
    };

    match tokio::time::timeout(options.timeout, waiting).await {
        Ok(result) => result,
        Err(_) => Err(WaitError::Timeout(options.timeout)),
    }
}
