//! Hamburger toggle for the mobile navigation.

use crate::dom::{HIDDEN, NodeId, Page};

pub const MOBILE_MENU_ID: &str = "mobile-menu";
pub const MOBILE_MENU_TOGGLE_ID: &str = "mobile-menu-toggle";

/// Shows and hides the mobile navigation.
#[derive(Debug, Clone)]
pub struct MobileMenu {
    page: Page,
    toggle: NodeId,
    menu: NodeId,
}

impl MobileMenu {
    /// Bind to `#mobile-menu-toggle` and `#mobile-menu`; `None` unless both exist.
    #[must_use]
    pub fn attach(page: Page) -> Option<Self> {
        let (toggle, menu) = page.read(|doc| {
            Some((
                doc.get_element_by_id(MOBILE_MENU_TOGGLE_ID)?,
                doc.get_element_by_id(MOBILE_MENU_ID)?,
            ))
        })?;
        Some(Self { page, toggle, menu })
    }

    /// Toggle the menu when the click lands inside the toggle button.
    /// Returns whether the click was consumed.
    pub fn on_click(&self, target: NodeId) -> bool {
        self.page.write(|doc| {
            if !doc.contains(self.toggle, target) {
                return false;
            }
            doc.toggle_class(self.menu, HIDDEN);
            true
        })
    }
}
