//! Transient notification banners.
//!
//! A banner is appended to `<body>`, fades after the display period and is
//! removed once the fade completes. Banners stack; there is no queue.

use askama::Template;
use tokio::runtime::Handle;
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::config::NotificationConfig;
use crate::dom::{Element, NodeId, Page, Selector};

/// Classes shared by every banner.
pub const BASE_CLASSES: &str = "fixed bottom-4 right-4 z-50 p-4 rounded-xl shadow-lg animate-slide-up";

/// Classes added when the fade-out starts.
pub const FADE_CLASSES: [&str; 3] = ["opacity-0", "transition-opacity", "duration-300"];

/// Marker attribute on every banner.
pub const NOTIFICATION_ATTR: &str = "data-notification";

/// Marker attribute on the close button inside a banner.
pub const CLOSE_ATTR: &str = "data-notification-close";

/// Visual style of a banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationKind {
    #[default]
    Success,
    Error,
    Info,
}

impl NotificationKind {
    #[must_use]
    pub const fn classes(self) -> &'static str {
        match self {
            Self::Success => "bg-success-500 text-white",
            Self::Error => "bg-error-500 text-white",
            Self::Info => "bg-secondary-800 text-white",
        }
    }
}

#[derive(Template)]
#[template(path = "partials/notification.html")]
struct NotificationTemplate<'a> {
    message: &'a str,
}

/// Render the inner markup of a banner. The message is HTML-escaped.
///
/// # Errors
///
/// Returns error if template rendering fails.
pub fn render_notification(message: &str) -> Result<String, askama::Error> {
    NotificationTemplate { message }.render()
}

/// Shows banners on a page.
#[derive(Debug, Clone)]
pub struct Notifier {
    page: Page,
    timing: NotificationConfig,
}

impl Notifier {
    #[must_use]
    pub const fn new(page: Page, timing: NotificationConfig) -> Self {
        Self { page, timing }
    }

    /// Append a banner and schedule its removal.
    ///
    /// Outside a Tokio runtime the banner is shown but never auto-dismissed.
    pub fn show(&self, message: &str, kind: NotificationKind) -> NodeId {
        let markup = render_notification(message);
        let node = self.page.write(|doc| {
            let body = doc.body();
            let node = doc.append(
                body,
                Element::new("div")
                    .class(BASE_CLASSES)
                    .class(kind.classes())
                    .attr(NOTIFICATION_ATTR, "")
                    .attr("role", "status"),
            );
            match &markup {
                Ok(html) => doc.set_inner_html(node, html),
                Err(e) => {
                    error!(error = %e, "Failed to render notification");
                    doc.set_text(node, message);
                }
            }
            node
        });
        debug!(?kind, message, "Notification shown");

        let Ok(handle) = Handle::try_current() else {
            warn!("No runtime available, notification will not auto-dismiss");
            return node;
        };
        let page = self.page.clone();
        let timing = self.timing;
        handle.spawn(async move {
            sleep(timing.display).await;
            page.write(|doc| {
                for class in FADE_CLASSES {
                    doc.add_class(node, class);
                }
            });
            sleep(timing.fade).await;
            page.write(|doc| doc.remove(node));
        });

        node
    }

    /// Remove a banner immediately.
    pub fn dismiss(&self, node: NodeId) {
        self.page.write(|doc| doc.remove(node));
    }

    /// Handle a click; closes the banner when the target is inside its close
    /// button. Returns whether the click was consumed.
    pub fn on_click(&self, target: NodeId) -> bool {
        let banner = self.page.read(|doc| {
            let close = doc.closest(target, &Selector::attr(CLOSE_ATTR))?;
            doc.closest(close, &Selector::attr(NOTIFICATION_ATTR))
        });
        match banner {
            Some(node) => {
                self.dismiss(node);
                true
            }
            None => false,
        }
    }
}
