//! Live product search.
//!
//! Typing into `#search-input` schedules a search once the input has been
//! quiet for the debounce period. Results are rendered into
//! `#search-results`, which opens on render and closes on a click anywhere
//! outside the search box.
//!
//! Requests already sent are never cancelled. Each scheduled search carries
//! a generation number instead, and a response whose generation is no longer
//! current is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use askama::Template;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

use crate::api::{SearchResult, StorefrontApi};
use crate::config::SearchConfig;
use crate::dom::{HIDDEN, NodeId, Page};

pub const SEARCH_INPUT_ID: &str = "search-input";
pub const SEARCH_RESULTS_ID: &str = "search-results";

/// Marker on result thumbnails.
pub const THUMBNAIL_ATTR: &str = "data-search-thumbnail";
/// Image to swap in when a thumbnail fails to load.
pub const FALLBACK_SRC_ATTR: &str = "data-fallback-src";
/// Set once the fallback has been applied.
pub const FALLBACK_APPLIED_ATTR: &str = "data-fallback-applied";
/// Padding added around the placeholder image.
pub const FALLBACK_CLASS: &str = "p-2";

struct ResultRow<'a> {
    href: &'a str,
    image: &'a str,
    name: &'a str,
    price: &'a str,
}

#[derive(Template)]
#[template(path = "partials/search_results.html")]
struct SearchResultsTemplate<'a> {
    rows: Vec<ResultRow<'a>>,
    placeholder: &'a str,
}

/// Render the dropdown markup for `results`.
///
/// Names, prices and URLs are HTML-escaped. Results without an image use
/// `placeholder`.
///
/// # Errors
///
/// Returns error if template rendering fails.
pub fn render_results(results: &[SearchResult], placeholder: &str) -> Result<String, askama::Error> {
    let rows = results
        .iter()
        .map(|result| ResultRow {
            href: safe_href(&result.url),
            image: result
                .image
                .as_deref()
                .filter(|i| !i.trim().is_empty())
                .unwrap_or(placeholder),
            name: &result.name,
            price: &result.price,
        })
        .collect();
    SearchResultsTemplate { rows, placeholder }.render()
}

/// Neutralize script URLs in result links.
fn safe_href(url: &str) -> &str {
    let scheme = url
        .trim_start()
        .split_once(':')
        .map(|(scheme, _)| scheme.to_ascii_lowercase());
    match scheme.as_deref() {
        Some("javascript" | "vbscript" | "data") => "#",
        _ => url,
    }
}

/// Whether a search is waiting on its debounce timer or response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchPhase {
    #[default]
    Idle,
    Pending,
}

#[derive(Debug, Default)]
struct DebounceState {
    /// Timer not yet fired; `None` once the request is in flight
    timer: Option<JoinHandle<()>>,
    generation: u64,
    phase: SearchPhase,
}

struct SearchInner<A> {
    api: Arc<A>,
    page: Page,
    input: NodeId,
    results: NodeId,
    config: SearchConfig,
    state: Mutex<DebounceState>,
}

/// Debounced live search over one input and one results container.
pub struct SearchController<A> {
    inner: Arc<SearchInner<A>>,
}

impl<A> Clone for SearchController<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: StorefrontApi> SearchController<A> {
    pub fn new(
        api: Arc<A>,
        page: Page,
        input: NodeId,
        results: NodeId,
        config: SearchConfig,
    ) -> Self {
        Self {
            inner: Arc::new(SearchInner {
                api,
                page,
                input,
                results,
                config,
                state: Mutex::new(DebounceState::default()),
            }),
        }
    }

    /// Bind to `#search-input` and `#search-results`; `None` unless both exist.
    pub fn attach(api: Arc<A>, page: Page, config: SearchConfig) -> Option<Self> {
        let (input, results) = page.read(|doc| {
            Some((
                doc.get_element_by_id(SEARCH_INPUT_ID)?,
                doc.get_element_by_id(SEARCH_RESULTS_ID)?,
            ))
        })?;
        Some(Self::new(api, page, input, results, config))
    }

    #[must_use]
    pub fn input(&self) -> NodeId {
        self.inner.input
    }

    #[must_use]
    pub fn results(&self) -> NodeId {
        self.inner.results
    }

    #[must_use]
    pub fn phase(&self) -> SearchPhase {
        self.inner.lock_state().phase
    }

    /// Handle an input event on the search box.
    pub fn on_input(&self) {
        let query = self
            .inner
            .page
            .read(|doc| doc.value(self.inner.input).unwrap_or_default().to_string());
        self.on_query(&query);
    }

    /// Restart the debounce cycle for `query`.
    ///
    /// A query shorter than the minimum (after trimming, in characters)
    /// closes the results at once and sends nothing.
    #[instrument(skip(self))]
    pub fn on_query(&self, query: &str) {
        let query = query.trim();
        let inner = &self.inner;
        let mut state = inner.lock_state();

        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.generation += 1;
        let generation = state.generation;

        if query.chars().count() < inner.config.min_query_length {
            state.phase = SearchPhase::Idle;
            inner.page.write(|doc| doc.add_class(inner.results, HIDDEN));
            return;
        }

        let Ok(handle) = Handle::try_current() else {
            warn!("No runtime available, search not scheduled");
            state.phase = SearchPhase::Idle;
            return;
        };
        state.phase = SearchPhase::Pending;
        let task = Arc::clone(inner);
        let query = query.to_string();
        state.timer = Some(handle.spawn(async move { task.run(generation, query).await }));
    }

    /// Close the results when a click lands outside the search box.
    pub fn on_document_click(&self, target: NodeId) {
        let inner = &self.inner;
        inner.page.write(|doc| {
            if !doc.contains(inner.input, target) && !doc.contains(inner.results, target) {
                doc.add_class(inner.results, HIDDEN);
            }
        });
    }

    /// Swap a broken result thumbnail for the placeholder, once.
    ///
    /// Returns whether the fallback was applied.
    pub fn on_image_error(&self, target: NodeId) -> bool {
        let inner = &self.inner;
        inner.page.write(|doc| {
            if !doc.contains(inner.results, target)
                || doc.attribute(target, THUMBNAIL_ATTR).is_none()
                || doc.attribute(target, FALLBACK_APPLIED_ATTR).is_some()
            {
                return false;
            }
            let fallback = doc
                .attribute(target, FALLBACK_SRC_ATTR)
                .unwrap_or(&inner.config.placeholder_image)
                .to_string();
            doc.set_attribute(target, "src", &fallback);
            doc.add_class(target, FALLBACK_CLASS);
            doc.set_attribute(target, FALLBACK_APPLIED_ATTR, "");
            true
        })
    }
}

impl<A: StorefrontApi> SearchInner<A> {
    fn lock_state(&self) -> MutexGuard<'_, DebounceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run(self: Arc<Self>, generation: u64, query: String) {
        sleep(self.config.debounce).await;
        {
            let mut state = self.lock_state();
            if state.generation != generation {
                return;
            }
            // Fired: later keystrokes must not abort the request.
            state.timer = None;
        }

        debug!(query, "Searching products");
        let result = self.api.search(&query).await;

        let mut state = self.lock_state();
        if state.generation != generation {
            debug!(query, "Discarding stale search response");
            return;
        }
        state.phase = SearchPhase::Idle;

        match result {
            Ok(response) => self.render(&response.results),
            Err(e) => error!(error = %e, query, "Search failed"),
        }
    }

    fn render(&self, results: &[SearchResult]) {
        match render_results(results, &self.config.placeholder_image) {
            Ok(html) => self.page.write(|doc| {
                doc.set_inner_html(self.results, &html);
                doc.remove_class(self.results, HIDDEN);
            }),
            Err(e) => error!(error = %e, "Failed to render search results"),
        }
    }
}
