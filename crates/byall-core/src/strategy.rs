//! Strategy derivation.
//!
//! A [`StrategyMap`] is built once from an [`ElementSnapshot`] and lists the
//! alternative queries for that element in a fixed precedence order.

use crate::element::{ElementSnapshot, PROBE_ATTRIBUTES, ReferenceElement};
use crate::error::DriverError;
use crate::xpath::QuotePolicy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named locator strategies, declared in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrategyKind {
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "css")]
    Css,
    #[serde(rename = "tagName")]
    TagName,
    #[serde(rename = "linkText")]
    LinkText,
    #[serde(rename = "xpath")]
    XPath,
    #[serde(rename = "xpath-div")]
    XPathDiv,
    #[serde(rename = "xpath-button")]
    XPathButton,
    #[serde(rename = "xpath-span")]
    XPathSpan,
    #[serde(rename = "xpath-text")]
    XPathText,
    #[serde(rename = "xpath-text-div")]
    XPathTextDiv,
    #[serde(rename = "xpath-text-button")]
    XPathTextButton,
    #[serde(rename = "xpath-text-span")]
    XPathTextSpan,
    #[serde(rename = "xpath-text-i")]
    XPathTextI,
    #[serde(rename = "xpath-text-li")]
    XPathTextLi,
    #[serde(rename = "xpath-text-ul")]
    XPathTextUl,
    #[serde(rename = "xpath-allattributes")]
    XPathAllAttributes,
}

/// Tag-scoped id queries, in insertion order.
const ID_SCOPED: [(StrategyKind, &str); 3] = [
    (StrategyKind::XPathDiv, "div"),
    (StrategyKind::XPathButton, "button"),
    (StrategyKind::XPathSpan, "span"),
];

/// Text-equality queries, in insertion order.
const TEXT_SCOPED: [(StrategyKind, &str); 7] = [
    (StrategyKind::XPathText, "*"),
    (StrategyKind::XPathTextDiv, "div"),
    (StrategyKind::XPathTextButton, "button"),
    (StrategyKind::XPathTextSpan, "span"),
    (StrategyKind::XPathTextI, "i"),
    (StrategyKind::XPathTextLi, "li"),
    (StrategyKind::XPathTextUl, "ul"),
];

impl StrategyKind {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Id => "id",
            StrategyKind::Name => "name",
            StrategyKind::Css => "css",
            StrategyKind::TagName => "tagName",
            StrategyKind::LinkText => "linkText",
            StrategyKind::XPath => "xpath",
            StrategyKind::XPathDiv => "xpath-div",
            StrategyKind::XPathButton => "xpath-button",
            StrategyKind::XPathSpan => "xpath-span",
            StrategyKind::XPathText => "xpath-text",
            StrategyKind::XPathTextDiv => "xpath-text-div",
            StrategyKind::XPathTextButton => "xpath-text-button",
            StrategyKind::XPathTextSpan => "xpath-text-span",
            StrategyKind::XPathTextI => "xpath-text-i",
            StrategyKind::XPathTextLi => "xpath-text-li",
            StrategyKind::XPathTextUl => "xpath-text-ul",
            StrategyKind::XPathAllAttributes => "xpath-allattributes",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|kind| kind.name() == name)
    }

    /// Every strategy in precedence order.
    pub fn all() -> Vec<StrategyKind> {
        let mut kinds = vec![
            StrategyKind::Id,
            StrategyKind::Name,
            StrategyKind::Css,
            StrategyKind::TagName,
            StrategyKind::LinkText,
            StrategyKind::XPath,
        ];
        kinds.extend(ID_SCOPED.iter().map(|(kind, _)| *kind));
        kinds.extend(TEXT_SCOPED.iter().map(|(kind, _)| *kind));
        kinds.push(StrategyKind::XPathAllAttributes);
        kinds
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyEntry {
    pub strategy: StrategyKind,
    pub query: String,
}

/// Insertion-ordered strategy → query mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyMap {
    entries: Vec<StrategyEntry>,
}

impl StrategyMap {
    /// Captures a snapshot of `element` and derives its strategies.
    pub async fn build<E>(element: &E, policy: QuotePolicy) -> Result<Self, DriverError>
    where
        E: ReferenceElement + ?Sized,
    {
        let snapshot = ElementSnapshot::capture(element).await?;
        Ok(Self::from_snapshot(&snapshot, policy))
    }

    pub fn from_snapshot(snapshot: &ElementSnapshot, policy: QuotePolicy) -> Self {
        let mut map = Self::default();
        let id = snapshot.attribute("id");
        let tag = snapshot.tag_name.as_str();
        let text = snapshot.text();

        if let Some(id) = id {
            map.insert(StrategyKind::Id, id);
        }
        if let Some(name) = snapshot.attribute("name") {
            map.insert(StrategyKind::Name, name);
        }
        if let Some(css) = snapshot.attribute("class").and_then(class_selector) {
            map.insert(StrategyKind::Css, css);
        }
        if !tag.is_empty() {
            map.insert(StrategyKind::TagName, tag);
        }
        if tag.eq_ignore_ascii_case("a") {
            if let Some(text) = text {
                map.insert(StrategyKind::LinkText, text);
            }
        }

        if let Some(id) = id {
            let literal = policy.literal(id);
            map.insert(StrategyKind::XPath, format!("//*[@id={}]", literal));
            for (kind, scope) in ID_SCOPED {
                map.insert(kind, format!("//{}[@id={}]", scope, literal));
            }
        }

        if let Some(text) = text {
            let literal = policy.literal(text);
            for (kind, scope) in TEXT_SCOPED {
                map.insert(kind, format!("//{}[text()={}]", scope, literal));
            }
        }

        let predicates: Vec<String> = PROBE_ATTRIBUTES
            .iter()
            .filter_map(|name| {
                snapshot
                    .attribute(name)
                    .map(|value| format!("@{}={}", name, policy.literal(value)))
            })
            .collect();
        map.insert(
            StrategyKind::XPathAllAttributes,
            format!("//{}[{}]", tag, predicates.join(" and ")),
        );

        map
    }

    /// Later inserts for an existing key replace the query in place.
    fn insert(&mut self, strategy: StrategyKind, query: impl Into<String>) {
        let query = query.into();
        match self.entries.iter_mut().find(|e| e.strategy == strategy) {
            Some(entry) => entry.query = query,
            None => self.entries.push(StrategyEntry { strategy, query }),
        }
    }

    pub fn get(&self, strategy: StrategyKind) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.strategy == strategy)
            .map(|e| e.query.as_str())
    }

    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        StrategyKind::from_name(name).and_then(|kind| self.get(kind))
    }

    pub fn contains(&self, strategy: StrategyKind) -> bool {
        self.get(strategy).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = StrategyKind> + '_ {
        self.entries.iter().map(|e| e.strategy)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.keys().map(|k| k.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StrategyEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a StrategyMap {
    type Item = &'a StrategyEntry;
    type IntoIter = std::slice::Iter<'a, StrategyEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// `"a  b"` → `.a.b`. Whitespace-only input yields `None`.
fn class_selector(class: &str) -> Option<String> {
    let classes: Vec<&str> = class.split_whitespace().collect();
    if classes.is_empty() {
        return None;
    }
    Some(format!(".{}", classes.join(".")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_selector() {
        assert_eq!(class_selector("a b").as_deref(), Some(".a.b"));
        assert_eq!(class_selector("  a \t b\n").as_deref(), Some(".a.b"));
        assert_eq!(class_selector("btn").as_deref(), Some(".btn"));
        assert_eq!(class_selector("   "), None);
    }

    #[test]
    fn test_strategy_names_round_trip() {
        for kind in StrategyKind::all() {
            assert_eq!(StrategyKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(StrategyKind::from_name("aria"), None);
    }

    #[test]
    fn test_all_is_declaration_order() {
        let all = StrategyKind::all();
        assert_eq!(all.len(), 17);
        let mut sorted = all.clone();
        sorted.sort();
        assert_eq!(all, sorted);
    }

    #[test]
    fn test_serializes_as_ordered_records() {
        let snapshot = ElementSnapshot::new("input").with_attribute("name", "q");
        let map = StrategyMap::from_snapshot(&snapshot, QuotePolicy::Verbatim);
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"strategy": "name", "query": "q"},
                {"strategy": "tagName", "query": "input"},
                {"strategy": "xpath-allattributes", "query": "//input[@name='q']"},
            ])
        );
    }
}
