//! Site adapter for the Pangea (BNP) search portal.
//!
//! Owns every assumption about the portal's DOM: selectors, the "X de N"
//! pagination markup, the results-per-page control. DOM reads go through
//! injected JS so the Angular re-renders between reads cannot leave us
//! holding references into a discarded tree.

pub mod card;
pub mod pagination;

pub use pagination::{collect_all, NextControl, PageLabel, PaginatorConfig, ResultsSession};

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::Page;
use tracing::{debug, info};

use super::browser::BrowserSession;

/// Search entry point; an empty submit lists every published precedent.
pub const SEARCH_URL: &str = "https://pangeabnp.pdpj.jus.br/pesquisa";

/// Result cards as the live site renders them.
const CARD_SELECTOR: &str = "app-resultados > div.card.card-body";
/// Generic fallback used when the scoped selector matches nothing.
const CARD_FALLBACK_SELECTOR: &str = "div.card.card-body";

/// Results-per-page select, by its accessible label.
const PAGE_SIZE_SELECT: &str =
    "select[aria-label='Selecione o número de resultados por página']";
const PAGE_SIZE_VALUE: &str = "100";

/// Poll interval for bounded DOM waits.
const POLL_INTERVAL: Duration = Duration::from_millis(250);
/// Settle delay after the results-per-page control reloads page one.
const PAGE_SIZE_SETTLE: Duration = Duration::from_millis(400);

/// Poll `probe` until it reports true or `timeout` elapses.
async fn wait_until<F, Fut>(timeout: Duration, mut probe: F) -> Result<bool>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if probe().await? {
            return Ok(true);
        }
        if tokio::time::Instant::now() >= deadline {
            return Ok(false);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// A live results view on the Pangea portal.
pub struct PangeaSearch {
    page: Page,
    timeout: Duration,
}

impl PangeaSearch {
    /// Open the search page in `session` and prepare it for collection:
    /// submit the default (empty) search, wait for the first card, then
    /// try to raise the results-per-page to the maximum. Both setup steps
    /// are best effort; on timeout the run proceeds with site defaults.
    pub async fn open(session: &BrowserSession) -> Result<Self> {
        let page = session.open(SEARCH_URL).await?;
        let search = Self {
            page,
            timeout: session.timeout(),
        };

        search.submit_default_search().await?;
        search.wait_for_cards().await?;
        search.negotiate_page_size().await?;

        Ok(search)
    }

    /// Send Enter to the search field; the submit button varies between
    /// builds of the site, the keypress does not. Non-fatal when the
    /// field never shows up.
    async fn submit_default_search(&self) -> Result<()> {
        let appeared = wait_until(self.timeout, move || async move {
            Ok(self.page.find_element("input[type='text']").await.is_ok())
        })
        .await?;

        if !appeared {
            debug!("search field not found; proceeding with default listing");
            return Ok(());
        }

        if let Ok(field) = self.page.find_element("input[type='text']").await {
            if let Err(e) = field.press_key("Enter").await {
                debug!("could not submit search: {}", e);
            }
        }
        Ok(())
    }

    /// Best-effort switch of the results-per-page control to the maximum.
    async fn negotiate_page_size(&self) -> Result<()> {
        let js = format!(
            r#"
            (() => {{
                const sel = document.querySelector("{PAGE_SIZE_SELECT}");
                if (!sel) return false;
                sel.value = "{PAGE_SIZE_VALUE}";
                sel.dispatchEvent(new Event("change", {{ bubbles: true }}));
                return true;
            }})()
            "#
        );

        let js = &js;
        let applied = wait_until(self.timeout, move || async move {
            let value = self.page.evaluate(js.clone()).await?;
            Ok(value.into_value::<bool>().unwrap_or(false))
        })
        .await?;

        if !applied {
            debug!("results-per-page control not found; keeping site default");
            return Ok(());
        }

        info!("results per page set to {}", PAGE_SIZE_VALUE);
        // The control reloads page one; give it a moment to re-render.
        self.wait_for_cards().await?;
        tokio::time::sleep(PAGE_SIZE_SETTLE).await;
        Ok(())
    }

    /// Number of result cards currently in the DOM.
    async fn card_count(&self) -> Result<u64> {
        let js = format!(
            r#"
            (() => {{
                let cards = document.querySelectorAll("{CARD_SELECTOR}");
                if (cards.length === 0) cards = document.querySelectorAll("{CARD_FALLBACK_SELECTOR}");
                return cards.length;
            }})()
            "#
        );
        let value = self
            .page
            .evaluate(js)
            .await
            .context("failed to count result cards")?;
        Ok(value.into_value::<u64>().unwrap_or(0))
    }
}

#[async_trait]
impl ResultsSession for PangeaSearch {
    async fn card_texts(&self) -> Result<Vec<String>> {
        let mut elements = self.page.find_elements(CARD_SELECTOR).await.unwrap_or_default();
        if elements.is_empty() {
            elements = self
                .page
                .find_elements(CARD_FALLBACK_SELECTOR)
                .await
                .unwrap_or_default();
        }

        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            match element.inner_text().await {
                Ok(Some(text)) => texts.push(text),
                Ok(None) => {}
                // The Angular app re-rendered under us; drop this card
                // and keep going.
                Err(e) => debug!("skipping detached card: {}", e),
            }
        }
        Ok(texts)
    }

    async fn page_label(&self) -> Result<String> {
        let js = r#"
            (() => {
                const span = document.querySelector(
                    "ngb-pagination ul.pagination [class*='ngb-custom-pages-item'] span");
                return span ? span.innerText.trim() : "";
            })()
        "#;
        let value = self
            .page
            .evaluate(js)
            .await
            .context("failed to read pagination label")?;
        Ok(value.into_value::<String>().unwrap_or_default())
    }

    async fn next_control(&self) -> Result<NextControl> {
        let js = r#"
            (() => {
                const a = document.querySelector(
                    "ngb-pagination ul.pagination a[aria-label='Next']");
                if (!a) return "absent";
                const li = a.closest("li");
                const cls = (li && li.className) || "";
                return cls.indexOf("disabled") >= 0 ? "disabled" : "enabled";
            })()
        "#;
        let value = self
            .page
            .evaluate(js)
            .await
            .context("failed to inspect next control")?;
        let state = value.into_value::<String>().unwrap_or_default();
        Ok(match state.as_str() {
            "enabled" => NextControl::Enabled,
            "disabled" => NextControl::Disabled,
            _ => NextControl::Absent,
        })
    }

    async fn activate_next(&self) -> Result<()> {
        // Scroll-then-click through JS; a plain CDP click can land on an
        // overlay while the list is still settling.
        let js = r#"
            (() => {
                const a = document.querySelector(
                    "ngb-pagination ul.pagination a[aria-label='Next']");
                if (!a) return false;
                a.scrollIntoView({ block: "center" });
                a.click();
                return true;
            })()
        "#;
        let value = self
            .page
            .evaluate(js)
            .await
            .context("failed to activate next control")?;
        if !value.into_value::<bool>().unwrap_or(false) {
            debug!("next control vanished before activation");
        }
        Ok(())
    }

    async fn wait_page_past(&self, previous: u32) -> Result<bool> {
        wait_until(self.timeout, move || async move {
            let label = PageLabel::parse(&self.page_label().await?);
            Ok(label.current > previous)
        })
        .await
    }

    async fn wait_for_cards(&self) -> Result<()> {
        let appeared = wait_until(self.timeout, move || async move {
            Ok(self.card_count().await? > 0)
        })
        .await?;
        if !appeared {
            debug!("no result cards appeared within the wait window");
        }
        Ok(())
    }
}
