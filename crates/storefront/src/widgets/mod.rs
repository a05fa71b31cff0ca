//! Small page widgets driven by document clicks.
//!
//! Each widget binds to the elements it needs when the storefront starts and
//! stays inactive when they are missing.

mod dropdown;
mod gallery;
mod mobile_menu;
mod quantity;

pub use dropdown::{DROPDOWN_ATTR, DROPDOWN_TOGGLE_ATTR, Dropdowns};
pub use gallery::{ACTIVE_THUMBNAIL_CLASSES, GALLERY_THUMBNAIL_ATTR, ImageGallery, MAIN_IMAGE_ID};
pub use mobile_menu::{MOBILE_MENU_ID, MOBILE_MENU_TOGGLE_ID, MobileMenu};
pub use quantity::{QUANTITY_BTN_ATTR, QUANTITY_WRAPPER_ATTR, QuantityStepper, step_quantity};
