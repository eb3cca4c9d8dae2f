//! Term specifications and the predicate that tests one against an element.

use std::fmt;

use mechanize_dom::{DomTree, ElementData, NodeId};
use serde::Serialize;

/// Element name that matches every element.
pub const WILDCARD: &str = "*";

/// The criteria for one position in a [`Chain`](crate::Chain).
///
/// A term is either an ID term (only `id` set) or an element term
/// (`element_name` and optionally `class_name`). The compiler never produces
/// a term mixing both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct TermSpec {
    /// Exact value of the `id` attribute. When set, nothing else is checked.
    pub id: Option<String>,
    /// Tag name to match; `""` or `"*"` match any element.
    pub element_name: Option<String>,
    /// Text that must occur somewhere in a `class` attribute value.
    pub class_name: Option<String>,
}

impl TermSpec {
    /// `#id`
    #[must_use]
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// `name`
    #[must_use]
    pub fn element(name: impl Into<String>) -> Self {
        Self {
            element_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// `*`
    #[must_use]
    pub fn wildcard() -> Self {
        Self::element(WILDCARD)
    }

    /// Add a `.class` suffix.
    #[must_use]
    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Whether this is an ID term.
    #[must_use]
    pub fn is_id_term(&self) -> bool {
        self.id().is_some()
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref().filter(|name| !name.is_empty())
    }

    /// Test this term against a node of `tree`. Non-element nodes, and ids
    /// that are not part of the tree, never match.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        tree.as_element(node)
            .is_some_and(|element| self.matches_element(element))
    }

    /// Test this term against an element.
    ///
    /// Class matching is a substring test on the raw attribute value, so
    /// `.nav` matches `class="navbar"`.
    #[must_use]
    pub fn matches_element(&self, element: &ElementData) -> bool {
        if let Some(id) = self.id() {
            return element.attrs_named("id").any(|value| value == id);
        }

        let any_element = self
            .element_name
            .as_deref()
            .is_none_or(|name| name.is_empty() || name == WILDCARD);
        if !any_element && self.element_name.as_deref() != Some(element.tag_name.as_str()) {
            return false;
        }

        match self.class_name() {
            Some(class_name) => element
                .attrs_named("class")
                .any(|value| value.contains(class_name)),
            None => true,
        }
    }
}

impl fmt::Display for TermSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(id) = self.id() {
            return write!(f, "#{id}");
        }
        match self.element_name.as_deref() {
            Some(name) if !name.is_empty() => f.write_str(name)?,
            _ => f.write_str(WILDCARD)?,
        }
        if let Some(class_name) = self.class_name() {
            write!(f, ".{class_name}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tag: &str, attrs: &[(&str, &str)]) -> ElementData {
        attrs
            .iter()
            .fold(ElementData::new(tag), |data, (k, v)| data.with_attr(*k, *v))
    }

    #[test]
    fn element_term_compares_tag_name() {
        let li = element("li", &[]);
        assert!(TermSpec::element("li").matches_element(&li));
        assert!(!TermSpec::element("ul").matches_element(&li));
    }

    #[test]
    fn wildcard_matches_any_element() {
        let div = element("div", &[]);
        assert!(TermSpec::wildcard().matches_element(&div));
        assert!(TermSpec::element("").matches_element(&div));
        assert!(TermSpec::default().matches_element(&div));
    }

    #[test]
    fn class_is_a_substring_test() {
        let nav = element("div", &[("class", "navbar fixed")]);
        assert!(TermSpec::wildcard().with_class("nav").matches_element(&nav));
        assert!(TermSpec::wildcard().with_class("bar fix").matches_element(&nav));
        assert!(!TermSpec::wildcard().with_class("menu").matches_element(&nav));
    }

    #[test]
    fn class_requires_a_class_attribute() {
        let plain = element("p", &[("id", "nav")]);
        assert!(!TermSpec::element("p").with_class("nav").matches_element(&plain));
    }

    #[test]
    fn any_class_attribute_may_satisfy_the_term() {
        let doubled = element("p", &[("class", "a"), ("class", "b")]);
        assert!(TermSpec::element("p").with_class("b").matches_element(&doubled));
    }

    #[test]
    fn id_term_ignores_other_criteria() {
        let mut term = TermSpec::by_id("main");
        term.element_name = Some("span".to_string());
        let div = element("div", &[("id", "main")]);
        assert!(term.matches_element(&div));
        assert!(!TermSpec::by_id("mai").matches_element(&div));
        assert!(!TermSpec::by_id("main").matches_element(&element("div", &[])));
    }

    #[test]
    fn empty_id_and_class_count_as_unset() {
        let div = element("div", &[]);
        let term = TermSpec {
            id: Some(String::new()),
            element_name: Some("div".to_string()),
            class_name: Some(String::new()),
        };
        assert!(!term.is_id_term());
        assert!(term.matches_element(&div));
    }

    #[test]
    fn display_round_trips_the_source_form() {
        assert_eq!(TermSpec::by_id("x").to_string(), "#x");
        assert_eq!(TermSpec::element("li").with_class("item").to_string(), "li.item");
        assert_eq!(TermSpec::wildcard().with_class("nav").to_string(), "*.nav");
    }
}
