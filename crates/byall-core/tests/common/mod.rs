#![allow(dead_code)]

use async_trait::async_trait;
use byall_core::{DriverError, ReferenceElement, SearchContext};
use std::collections::HashMap;
use std::sync::Mutex;

/// Reference element with fixed attributes.
#[derive(Debug, Default)]
pub struct MockElement {
    pub tag_name: String,
    pub text: String,
    pub attributes: HashMap<String, String>,
    pub reads: Mutex<usize>,
}

impl MockElement {
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn read_count(&self) -> usize {
        *self.reads.lock().unwrap()
    }

    fn bump(&self) {
        *self.reads.lock().unwrap() += 1;
    }
}

#[async_trait]
impl ReferenceElement for MockElement {
    async fn attribute(&self, name: &str) -> Result<Option<String>, DriverError> {
        self.bump();
        Ok(self.attributes.get(name).cloned())
    }

    async fn tag_name(&self) -> Result<String, DriverError> {
        self.bump();
        Ok(self.tag_name.clone())
    }

    async fn text(&self) -> Result<String, DriverError> {
        self.bump();
        Ok(self.text.clone())
    }
}

/// Element whose reads always fail, e.g. after the page navigated away.
pub struct StaleElement;

#[async_trait]
impl ReferenceElement for StaleElement {
    async fn attribute(&self, _name: &str) -> Result<Option<String>, DriverError> {
        Err(DriverError::StaleElement("element detached".into()))
    }

    async fn tag_name(&self) -> Result<String, DriverError> {
        Err(DriverError::StaleElement("element detached".into()))
    }

    async fn text(&self) -> Result<String, DriverError> {
        Err(DriverError::StaleElement("element detached".into()))
    }
}

/// Document stand-in: maps exact query strings to node ids.
///
/// Queries that start with `.`, contain an empty predicate, or leave a string
/// literal unterminated are rejected as invalid selectors, roughly the way a
/// browser's XPath engine would treat them.
#[derive(Debug, Default)]
pub struct MockDom {
    matches: HashMap<String, Vec<u32>>,
    failures: HashMap<String, DriverError>,
    queries: Mutex<Vec<String>>,
}

impl MockDom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_match(mut self, query: &str, ids: &[u32]) -> Self {
        self.matches.insert(query.to_string(), ids.to_vec());
        self
    }

    pub fn with_failure(mut self, query: &str, error: DriverError) -> Self {
        self.failures.insert(query.to_string(), error);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    fn evaluate(&self, xpath: &str) -> Result<Vec<u32>, DriverError> {
        self.queries.lock().unwrap().push(xpath.to_string());

        if let Some(err) = self.failures.get(xpath) {
            return Err(err.clone());
        }
        if xpath.starts_with('.') || xpath.contains("[]") || !literals_terminated(xpath) {
            return Err(DriverError::InvalidSelector(xpath.to_string()));
        }
        Ok(self.matches.get(xpath).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl SearchContext for MockDom {
    type Element = u32;

    async fn find_xpath(&self, xpath: &str) -> Result<u32, DriverError> {
        self.evaluate(xpath)?
            .first()
            .copied()
            .ok_or_else(|| DriverError::NoSuchElement(xpath.to_string()))
    }

    async fn find_all_xpath(&self, xpath: &str) -> Result<Vec<u32>, DriverError> {
        self.evaluate(xpath)
    }
}

fn literals_terminated(xpath: &str) -> bool {
    let mut open: Option<char> = None;
    for c in xpath.chars() {
        match open {
            Some(q) if c == q => open = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => open = Some(c),
            None => {}
        }
    }
    open.is_none()
}
