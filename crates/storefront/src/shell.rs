//! The site header every storefront page shares.
//!
//! Builds the elements the controllers look for: cart badges in the header
//! and the mobile menu, the cart total, the search box and the mobile menu
//! toggle. Used by the CLI to host controllers outside a browser.

use rust_decimal::Decimal;

use crate::cart::{CART_COUNT_CLASS, CART_TOTAL_CLASS, format_total};
use crate::dom::{Document, Element, HIDDEN, NodeId};
use crate::search::{SEARCH_INPUT_ID, SEARCH_RESULTS_ID};
use crate::widgets::{MOBILE_MENU_ID, MOBILE_MENU_TOGGLE_ID};

/// Handles to the header elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shell {
    pub header: NodeId,
    pub cart_count: NodeId,
    pub mobile_cart_count: NodeId,
    pub cart_total: NodeId,
    pub search_input: NodeId,
    pub search_results: NodeId,
    pub mobile_menu_toggle: NodeId,
    pub mobile_menu: NodeId,
}

impl Shell {
    /// Append the header to `doc`'s body. The cart starts empty.
    pub fn build(doc: &mut Document) -> Self {
        let body = doc.body();
        let header = doc.append(body, Element::new("header").class("sticky top-0 z-40 bg-white"));

        let search = doc.append(header, Element::new("div").class("relative"));
        let search_input = doc.append(
            search,
            Element::new("input")
                .id(SEARCH_INPUT_ID)
                .attr("type", "search")
                .attr("placeholder", "Search products...")
                .attr("autocomplete", "off"),
        );
        let search_results = doc.append(
            search,
            Element::new("div")
                .id(SEARCH_RESULTS_ID)
                .class("absolute top-full left-0 right-0 mt-2 bg-white rounded-xl shadow-lg")
                .class(HIDDEN),
        );

        let cart_link = doc.append(header, Element::new("a").attr("href", "/cart/").class("relative"));
        let cart_count = doc.append(cart_link, count_badge());
        let cart_total = doc.append(
            cart_link,
            Element::new("span")
                .class(CART_TOTAL_CLASS)
                .text(&format_total(Decimal::ZERO)),
        );

        let mobile_menu_toggle = doc.append(
            header,
            Element::new("button")
                .id(MOBILE_MENU_TOGGLE_ID)
                .attr("type", "button")
                .class("md:hidden")
                .child(Element::new("svg").class("w-6 h-6")),
        );
        let mobile_menu = doc.append(header, Element::new("nav").id(MOBILE_MENU_ID).class(HIDDEN));
        let mobile_cart = doc.append(
            mobile_menu,
            Element::new("a").attr("href", "/cart/").text("Cart "),
        );
        let mobile_cart_count = doc.append(mobile_cart, count_badge());

        Self {
            header,
            cart_count,
            mobile_cart_count,
            cart_total,
            search_input,
            search_results,
            mobile_menu_toggle,
            mobile_menu,
        }
    }
}

fn count_badge() -> Element {
    Element::new("span")
        .class(CART_COUNT_CLASS)
        .class("badge")
        .class(HIDDEN)
        .text("0")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dom::Selector;

    #[test]
    fn test_shell_exposes_controller_hooks() {
        let mut doc = Document::new();
        let shell = Shell::build(&mut doc);

        assert_eq!(doc.get_element_by_id(SEARCH_INPUT_ID), Some(shell.search_input));
        assert_eq!(doc.get_element_by_id(SEARCH_RESULTS_ID), Some(shell.search_results));
        assert_eq!(doc.get_element_by_id(MOBILE_MENU_ID), Some(shell.mobile_menu));
        assert_eq!(
            doc.query_selector_all(&Selector::class(CART_COUNT_CLASS)),
            vec![shell.cart_count, shell.mobile_cart_count]
        );
        assert_eq!(doc.text_content(shell.cart_total), "€0.00");
        assert!(doc.has_class(shell.cart_count, HIDDEN));
    }
}
