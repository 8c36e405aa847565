#![cfg_attr(docsrs, feature(doc_cfg))]
//! Parameter tree: named attributes, named sub-trees and an optional text
//! payload per node.
//!
//! Every lookup is mandatory. A missing attribute or child is reported as an
//! error listing the keys that do exist; callers that want a default check
//! with [`ParameterTree::has_attribute`] / [`ParameterTree::has_child`] first.
//!
//! ```rust
//! use param_tree::ParameterTree;
//!
//! let mut tree = ParameterTree::new();
//! tree.set_attribute("placed_option", "keep_scale");
//! tree.new_child("latex")
//!     .set_text("E=mc^2")
//!     .set_int_attribute("cursor_position", 3);
//!
//! assert_eq!(tree.attribute("placed_option").unwrap(), "keep_scale");
//! assert_eq!(tree.child("latex").unwrap().text(), Some("E=mc^2"));
//! assert!(tree.attribute("missing").is_err());
//! ```

use std::collections::BTreeMap;

use thiserror::Error;

/// Error type produced by tree lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The requested attribute is not stored on this node.
    #[error("attribute '{key}' not found (existing: {})", join_keys(existing))]
    MissingKey { key: String, existing: Vec<String> },
    /// The requested sub-tree is not stored on this node.
    #[error("child '{tag}' not found (existing: {})", join_keys(existing))]
    MissingChild { tag: String, existing: Vec<String> },
    /// The attribute exists but does not convert to the requested type.
    #[error("attribute '{key}' has invalid value '{value}': expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
    /// More than one of a set of alternative keys is present.
    #[error("attributes '{first}' and '{second}' are both set")]
    AmbiguousKey { first: String, second: String },
}

fn join_keys(keys: &[String]) -> String {
    if keys.is_empty() {
        "none".to_string()
    } else {
        keys.join(", ")
    }
}

/// Recursive attributed tree.
///
/// The node does not know its own name: a child is named by the key it is
/// stored under in its parent, the root by whoever encodes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterTree {
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "BTreeMap::is_empty")
    )]
    attributes: BTreeMap<String, String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "BTreeMap::is_empty")
    )]
    children: BTreeMap<String, ParameterTree>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    text: Option<String>,
}

impl ParameterTree {
    /// Create an empty tree: no attributes, no children, no text.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if the node carries nothing at all.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty() && self.text.is_none()
    }

    /// Read a mandatory attribute.
    pub fn attribute(&self, key: &str) -> Result<&str, TreeError> {
        self.attributes
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| TreeError::MissingKey {
                key: key.to_string(),
                existing: self.attributes.keys().cloned().collect(),
            })
    }

    /// Read a mandatory attribute and parse it as a signed integer.
    pub fn int_attribute(&self, key: &str) -> Result<i64, TreeError> {
        let value = self.attribute(key)?;
        value.trim().parse().map_err(|_| TreeError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: "an integer",
        })
    }

    /// Read a mandatory `"0"`/`"1"` flag.
    pub fn flag(&self, key: &str) -> Result<bool, TreeError> {
        match self.attribute(key)? {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(TreeError::InvalidValue {
                key: key.to_string(),
                value: other.to_string(),
                expected: "\"0\" or \"1\"",
            }),
        }
    }

    /// Insert or overwrite an attribute.
    pub fn set_attribute(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn set_int_attribute(&mut self, key: impl Into<String>, value: i64) -> &mut Self {
        self.set_attribute(key, value.to_string())
    }

    pub fn set_flag(&mut self, key: impl Into<String>, value: bool) -> &mut Self {
        self.set_attribute(key, if value { "1" } else { "0" })
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        self.attributes.remove(key)
    }

    /// Look up an attribute that may be stored under one of several keys,
    /// e.g. after an option was renamed.
    ///
    /// Returns the matching `(key, value)` pair, `None` if no key is present,
    /// and an error if more than one is.
    pub fn find_attribute<'a>(
        &'a self,
        keys: &[&str],
    ) -> Result<Option<(&'a str, &'a str)>, TreeError> {
        let mut found: Option<(&str, &str)> = None;
        for key in keys {
            if let Some((stored, value)) = self.attributes.get_key_value(*key) {
                if let Some((first, _)) = found {
                    return Err(TreeError::AmbiguousKey {
                        first: first.to_string(),
                        second: stored.clone(),
                    });
                }
                found = Some((stored.as_str(), value.as_str()));
            }
        }
        Ok(found)
    }

    /// Iterate over attributes in key order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Read a mandatory sub-tree.
    pub fn child(&self, tag: &str) -> Result<&ParameterTree, TreeError> {
        self.children.get(tag).ok_or_else(|| self.missing_child(tag))
    }

    pub fn child_mut(&mut self, tag: &str) -> Result<&mut ParameterTree, TreeError> {
        if !self.children.contains_key(tag) {
            return Err(self.missing_child(tag));
        }
        Ok(self.children.entry(tag.to_string()).or_default())
    }

    /// Store `tree` under `tag`, returning the sub-tree it replaced.
    pub fn set_child(
        &mut self,
        tag: impl Into<String>,
        tree: ParameterTree,
    ) -> Option<ParameterTree> {
        self.children.insert(tag.into(), tree)
    }

    /// Store an empty sub-tree under `tag` (replacing any existing one) and
    /// return it for population.
    pub fn new_child(&mut self, tag: impl Into<String>) -> &mut ParameterTree {
        let tag = tag.into();
        self.children.insert(tag.clone(), ParameterTree::new());
        self.children.entry(tag).or_default()
    }

    /// Remove a mandatory sub-tree and hand over ownership.
    pub fn take_child(&mut self, tag: &str) -> Result<ParameterTree, TreeError> {
        match self.children.remove(tag) {
            Some(child) => Ok(child),
            None => Err(self.missing_child(tag)),
        }
    }

    pub fn has_child(&self, tag: &str) -> bool {
        self.children.contains_key(tag)
    }

    pub fn remove_child(&mut self, tag: &str) -> Option<ParameterTree> {
        self.children.remove(tag)
    }

    /// Iterate over sub-trees in tag order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &ParameterTree)> {
        self.children.iter().map(|(tag, child)| (tag.as_str(), child))
    }

    /// Scalar payload of this node. `None` and `Some("")` are distinct.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, value: impl Into<String>) -> &mut Self {
        self.text = Some(value.into());
        self
    }

    pub fn clear_text(&mut self) -> Option<String> {
        self.text.take()
    }

    fn missing_child(&self, tag: &str) -> TreeError {
        TreeError::MissingChild {
            tag: tag.to_string(),
            existing: self.children.keys().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParameterTree {
        let mut tree = ParameterTree::new();
        tree.set_attribute("key0", "bad_value")
            .set_attribute("key0", "value0")
            .set_attribute("key1", "value1")
            .set_int_attribute("key2", 2)
            .set_attribute("key4", "");
        let sub = tree.new_child("sublist_key0");
        sub.set_attribute("subkey0", "0").set_text("main option");
        tree
    }

    #[test]
    fn set_attribute_is_an_upsert() {
        let tree = sample();
        assert_eq!(tree.attribute("key0").unwrap(), "value0");
        assert_eq!(tree.attribute("key4").unwrap(), "");
        assert_eq!(tree.int_attribute("key2").unwrap(), 2);
        assert_eq!(tree.attributes().count(), 4);
    }

    #[test]
    fn missing_attribute_lists_existing_keys() {
        let tree = sample();
        let err = tree.attribute("nope").unwrap_err();
        match &err {
            TreeError::MissingKey { key, existing } => {
                assert_eq!(key, "nope");
                assert_eq!(existing, &["key0", "key1", "key2", "key4"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("key1"));
    }

    #[test]
    fn missing_child_is_an_error() {
        let mut tree = sample();
        assert!(matches!(
            tree.child("other"),
            Err(TreeError::MissingChild { ref tag, .. }) if tag == "other"
        ));
        assert!(tree.child_mut("other").is_err());
        assert!(tree.take_child("other").is_err());
    }

    #[test]
    fn attribute_and_child_namespaces_are_independent() {
        let mut tree = ParameterTree::new();
        tree.set_attribute("latex", "attr");
        tree.new_child("latex").set_text("child");
        assert_eq!(tree.attribute("latex").unwrap(), "attr");
        assert_eq!(tree.child("latex").unwrap().text(), Some("child"));
    }

    #[test]
    fn set_child_replaces_and_returns_previous() {
        let mut tree = sample();
        let mut replacement = ParameterTree::new();
        replacement.set_attribute("subkey0", "666");
        let previous = tree.set_child("sublist_key0", replacement).expect("replaced");
        assert_eq!(previous.text(), Some("main option"));
        let current = tree.child("sublist_key0").unwrap();
        assert_eq!(current.attribute("subkey0").unwrap(), "666");
        assert_eq!(current.text(), None);
    }

    #[test]
    fn child_mut_edits_in_place() {
        let mut tree = sample();
        tree.child_mut("sublist_key0")
            .unwrap()
            .set_int_attribute("subkey0", 666);
        assert_eq!(
            tree.child("sublist_key0").unwrap().attribute("subkey0").unwrap(),
            "666"
        );
    }

    #[test]
    fn empty_text_differs_from_absent_text() {
        let mut with_empty = ParameterTree::new();
        with_empty.set_text("");
        let without = ParameterTree::new();
        assert_ne!(with_empty, without);
        assert!(without.is_empty());
        assert!(!with_empty.is_empty());
        assert_eq!(with_empty.text(), Some(""));
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let mut a = ParameterTree::new();
        a.set_attribute("x", "1").set_attribute("y", "2");
        a.new_child("b");
        a.new_child("c");
        let mut b = ParameterTree::new();
        b.new_child("c");
        b.new_child("b");
        b.set_attribute("y", "2").set_attribute("x", "1");
        assert_eq!(a, b);
    }

    #[test]
    fn flags_and_integers_are_validated() {
        let mut tree = ParameterTree::new();
        tree.set_flag("on", true)
            .set_flag("off", false)
            .set_attribute("bad", "yes");
        assert!(tree.flag("on").unwrap());
        assert!(!tree.flag("off").unwrap());
        assert!(matches!(
            tree.flag("bad"),
            Err(TreeError::InvalidValue { .. })
        ));
        assert!(matches!(
            tree.int_attribute("bad"),
            Err(TreeError::InvalidValue { .. })
        ));
    }

    #[test]
    fn find_attribute_across_renamed_keys() {
        let mut tree = ParameterTree::new();
        tree.set_int_attribute("new_key", 1);
        let found = tree.find_attribute(&["old_key", "new_key"]).unwrap();
        assert_eq!(found, Some(("new_key", "1")));
        assert_eq!(tree.find_attribute(&["other"]).unwrap(), None);

        tree.set_attribute("old_key", "0");
        assert!(matches!(
            tree.find_attribute(&["old_key", "new_key"]),
            Err(TreeError::AmbiguousKey { .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_skips_empty_parts() {
        let mut tree = ParameterTree::new();
        tree.set_attribute("a", "1");
        let json = serde_json::to_string(&tree).unwrap();
        assert_eq!(json, r#"{"attributes":{"a":"1"}}"#);
        let back: ParameterTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }
}
