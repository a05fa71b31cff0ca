//! Product image gallery: thumbnails swap the main image.

use tracing::debug;

use crate::dom::{NodeId, Page, Selector};

/// Attribute on gallery thumbnails holding the full-size image URL.
pub const GALLERY_THUMBNAIL_ATTR: &str = "data-thumbnail";

pub const MAIN_IMAGE_ID: &str = "main-product-image";

/// Classes marking the selected thumbnail.
pub const ACTIVE_THUMBNAIL_CLASSES: [&str; 2] = ["ring-2", "ring-primary-500"];

/// Product image gallery: clicking a thumbnail shows it as the main image.
#[derive(Debug, Clone)]
pub struct ImageGallery {
    page: Page,
    main_image: NodeId,
    thumbnails: Vec<NodeId>,
}

impl ImageGallery {
    /// Bind to `#main-product-image` and the thumbnails present now;
    /// `None` unless both exist.
    #[must_use]
    pub fn attach(page: Page) -> Option<Self> {
        let (main_image, thumbnails) = page.read(|doc| {
            let main_image = doc.get_element_by_id(MAIN_IMAGE_ID)?;
            let thumbnails = doc.query_selector_all(&Selector::attr(GALLERY_THUMBNAIL_ATTR));
            (!thumbnails.is_empty()).then_some((main_image, thumbnails))
        })?;
        debug!(count = thumbnails.len(), "Image gallery attached");
        Some(Self {
            page,
            main_image,
            thumbnails,
        })
    }

    /// Handle a click; returns whether it selected a thumbnail.
    pub fn on_click(&self, target: NodeId) -> bool {
        self.page.write(|doc| {
            let Some(thumb) = self
                .thumbnails
                .iter()
                .copied()
                .find(|t| doc.contains(*t, target))
            else {
                return false;
            };
            let src = doc
                .attribute(thumb, GALLERY_THUMBNAIL_ATTR)
                .unwrap_or_default()
                .to_string();
            doc.set_attribute(self.main_image, "src", &src);
            for other in &self.thumbnails {
                for class in ACTIVE_THUMBNAIL_CLASSES {
                    doc.remove_class(*other, class);
                }
            }
            for class in ACTIVE_THUMBNAIL_CLASSES {
                doc.add_class(thumb, class);
            }
            true
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dom::{Document, Element};

    fn setup() -> (Page, NodeId, Vec<NodeId>) {
        let mut doc = Document::new();
        let body = doc.body();
        let main = doc.append(
            body,
            Element::new("img").id(MAIN_IMAGE_ID).attr("src", "/media/a.jpg"),
        );
        let strip = doc.append(body, Element::new("div").class("flex gap-2"));
        let thumbs: Vec<NodeId> = ["/media/a.jpg", "/media/b.jpg"]
            .iter()
            .map(|src| {
                doc.append(
                    strip,
                    Element::new("button")
                        .attr(GALLERY_THUMBNAIL_ATTR, src)
                        .child(Element::new("img").attr("src", src)),
                )
            })
            .collect();
        (Page::new(doc), main, thumbs)
    }

    #[test]
    fn test_click_swaps_main_image_and_ring() {
        let (page, main, thumbs) = setup();
        let gallery = ImageGallery::attach(page.clone()).unwrap();
        page.write(|doc| {
            for class in ACTIVE_THUMBNAIL_CLASSES {
                doc.add_class(thumbs[0], class);
            }
        });

        let inner_img = page.read(|doc| doc.children(thumbs[1])[0]);
        assert!(gallery.on_click(inner_img));

        page.read(|doc| {
            assert_eq!(doc.attribute(main, "src"), Some("/media/b.jpg"));
            assert!(doc.has_class(thumbs[1], "ring-2"));
            assert!(doc.has_class(thumbs[1], "ring-primary-500"));
            assert!(!doc.has_class(thumbs[0], "ring-2"));
        });
    }

    #[test]
    fn test_click_elsewhere_ignored() {
        let (page, main, _) = setup();
        let gallery = ImageGallery::attach(page.clone()).unwrap();
        assert!(!gallery.on_click(main));
        page.read(|doc| assert_eq!(doc.attribute(main, "src"), Some("/media/a.jpg")));
    }

    #[test]
    fn test_inactive_without_thumbnails() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append(body, Element::new("img").id(MAIN_IMAGE_ID));
        assert!(ImageGallery::attach(Page::new(doc)).is_none());
    }
}
