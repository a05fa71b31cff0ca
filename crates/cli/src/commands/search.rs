//! Live search command.
//!
//! # Usage
//!
//! ```bash
//! vc-cli search "party tent"
//! vc-cli search tent --html
//! ```

use std::time::Duration;

use verzend_storefront::dom::{HIDDEN, Selector};
use verzend_storefront::search::SearchPhase;
use verzend_storefront::{Event, StorefrontConfig};

use super::Session;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Type `query` into the search box and print the dropdown once it settles.
///
/// # Errors
///
/// Returns error if the session cannot be created.
#[allow(clippy::print_stdout)]
pub async fn run(config: &StorefrontConfig, query: &str, html: bool) -> verzend_storefront::Result<()> {
    let session = Session::connect(config)?;
    let page = session.app.page();
    let Some(search) = session.app.search() else {
        tracing::error!("Page has no search box");
        return Ok(());
    };

    page.write(|doc| doc.set_value(session.shell.search_input, query));
    session
        .app
        .dispatch(Event::Input {
            target: session.shell.search_input,
        })
        .await;

    while search.phase() == SearchPhase::Pending {
        tokio::time::sleep(POLL_INTERVAL).await;
    }

    let results = session.shell.search_results;
    if page.read(|doc| doc.has_class(results, HIDDEN)) {
        println!(
            "No search performed (queries need at least {} characters, or the request failed)",
            config.search.min_query_length
        );
        return Ok(());
    }

    if html {
        println!("{}", page.read(|doc| doc.inner_html(results)));
        return Ok(());
    }

    let rows = page.read(|doc| {
        let rows = doc.query_selector_all_in(results, &Selector::class("dropdown-item"));
        rows.into_iter()
            .map(|row| {
                let text = |class: &str| {
                    doc.query_selector_in(row, &Selector::class(class))
                        .map(|n| doc.text_content(n))
                        .unwrap_or_default()
                };
                (
                    text("font-medium"),
                    text("text-primary-600"),
                    doc.attribute(row, "href").unwrap_or_default().to_string(),
                )
            })
            .collect::<Vec<_>>()
    });

    if rows.is_empty() {
        println!("No products found");
    }
    for (name, price, href) in rows {
        println!("{name:<40} {price:>10}  {href}");
    }
    Ok(())
}
