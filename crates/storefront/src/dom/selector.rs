//! Element selectors.
//!
//! A [`Selector`] is a list of compound alternatives, each made of an
//! optional tag name plus class and `[attr]` / `[attr="value"]` parts. They
//! are built with the constructors below; scope a query with
//! [`Document::query_selector_all_in`](super::Document::query_selector_all_in)
//! rather than a descendant combinator.

use super::ElementData;

/// A selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Class(String),
    Attr { name: String, value: Option<String> },
}

impl Selector {
    /// Match elements with the given tag name.
    #[must_use]
    pub fn tag(name: &str) -> Self {
        Self::single(Compound {
            tag: Some(name.to_ascii_lowercase()),
            parts: Vec::new(),
        })
    }

    /// Match elements carrying the given class.
    #[must_use]
    pub fn class(class: &str) -> Self {
        Self::single(Compound {
            tag: None,
            parts: vec![Part::Class(class.to_string())],
        })
    }

    /// Match elements that have the given attribute, whatever its value.
    #[must_use]
    pub fn attr(name: &str) -> Self {
        Self::single(Compound {
            tag: None,
            parts: vec![Part::Attr {
                name: name.to_ascii_lowercase(),
                value: None,
            }],
        })
    }

    /// Additionally require `name="value"` on every alternative.
    #[must_use]
    pub fn with_attr_value(mut self, name: &str, value: &str) -> Self {
        for compound in &mut self.alternatives {
            compound.parts.push(Part::Attr {
                name: name.to_ascii_lowercase(),
                value: Some(value.to_string()),
            });
        }
        self
    }

    fn single(compound: Compound) -> Self {
        Self {
            alternatives: vec![compound],
        }
    }

    pub(super) fn matches(&self, element: &ElementData) -> bool {
        self.alternatives.iter().any(|c| c.matches(element))
    }
}

impl Compound {
    fn matches(&self, element: &ElementData) -> bool {
        if let Some(tag) = &self.tag
            && tag != &element.tag
        {
            return false;
        }
        self.parts.iter().all(|part| match part {
            Part::Class(class) => element.classes.iter().any(|c| c == class),
            Part::Attr { name, value } => {
                if name == "class" {
                    let joined = element.classes.join(" ");
                    return value.as_ref().is_none_or(|v| *v == joined);
                }
                match (element.attributes.get(name), value) {
                    (Some(_), None) => true,
                    (Some(actual), Some(expected)) => actual == expected,
                    (None, _) => false,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    fn data(element: Element) -> ElementData {
        element.into_data()
    }

    #[test]
    fn test_class_and_attribute_matching() {
        let el = data(
            Element::new("button")
                .class("btn")
                .data("quantity-btn", "increase"),
        );
        assert!(Selector::class("btn").matches(&el));
        assert!(!Selector::class("bt").matches(&el));
        assert!(Selector::attr("data-quantity-btn").matches(&el));
        assert!(
            Selector::attr("data-quantity-btn")
                .with_attr_value("data-quantity-btn", "increase")
                .matches(&el)
        );
        assert!(
            !Selector::attr("data-quantity-btn")
                .with_attr_value("data-quantity-btn", "decrease")
                .matches(&el)
        );
        assert!(!Selector::tag("input").matches(&el));
    }

    #[test]
    fn test_tag_with_attribute_value() {
        let number = data(Element::new("INPUT").attr("type", "number"));
        let text = data(Element::new("input").attr("type", "text"));
        let selector = Selector::tag("input").with_attr_value("type", "number");
        assert!(selector.matches(&number));
        assert!(!selector.matches(&text));
    }

    #[test]
    fn test_attribute_names_are_case_insensitive() {
        let el = data(Element::new("div").attr("Data-Dropdown", ""));
        assert!(Selector::attr("data-dropdown").matches(&el));
        assert!(Selector::attr("DATA-DROPDOWN").matches(&el));
    }

    #[test]
    fn test_class_attribute_matches_whole_list() {
        let el = data(Element::new("img").class("ring-2 ring-primary-500"));
        assert!(Selector::attr("class").matches(&el));
        assert!(
            Selector::tag("img")
                .with_attr_value("class", "ring-2 ring-primary-500")
                .matches(&el)
        );
        assert!(
            !Selector::tag("img")
                .with_attr_value("class", "ring-2")
                .matches(&el)
        );
    }
}
