pub mod config;
pub mod element;
pub mod error;
pub mod wait;
pub mod webdriver;

pub use config::{ByAllConfig, ConfigError, ConfigLoader, LoadedConfig};
pub use element::{Seed, WebElement};
pub use wait::{WaitError, WaitOptions, wait_until_all_visible, wait_until_visible};
pub use webdriver::WebDriverClient;
