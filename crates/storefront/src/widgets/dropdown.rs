//! Dropdown panels opened by `[data-dropdown-toggle]` controls.

use tracing::debug;

use crate::dom::{HIDDEN, NodeId, Page, Selector};

/// Attribute naming the id of the dropdown a control opens.
pub const DROPDOWN_TOGGLE_ATTR: &str = "data-dropdown-toggle";

/// Marker on every dropdown panel.
pub const DROPDOWN_ATTR: &str = "data-dropdown";

/// Toggles dropdown panels and closes them on outside clicks.
#[derive(Debug, Clone)]
pub struct Dropdowns {
    page: Page,
}

impl Dropdowns {
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    /// A click inside a toggle flips its panel; any other click closes every
    /// panel that does not contain the target.
    pub fn on_click(&self, target: NodeId) {
        self.page.write(|doc| {
            if let Some(toggle) = doc.closest(target, &Selector::attr(DROPDOWN_TOGGLE_ATTR)) {
                let panel = doc
                    .attribute(toggle, DROPDOWN_TOGGLE_ATTR)
                    .and_then(|id| doc.get_element_by_id(id));
                match panel {
                    Some(panel) => {
                        doc.toggle_class(panel, HIDDEN);
                    }
                    None => debug!("Dropdown toggle without a matching panel"),
                }
                return;
            }

            for panel in doc.query_selector_all(&Selector::attr(DROPDOWN_ATTR)) {
                if !doc.contains(panel, target) {
                    doc.add_class(panel, HIDDEN);
                }
            }
        });
    }
}
