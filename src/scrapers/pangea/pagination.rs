//! Pagination control.
//!
//! The portal reports progress through a single "X de N" label, which is
//! the sole source of page-progress truth. The loop here walks every page,
//! collecting card texts and advancing until the next control disappears,
//! reports disabled, or the page number refuses to move.

use std::sync::LazyLock;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use tracing::info;

use super::card::parse_card;
use crate::models::Precedent;

static PAGE_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s+de\s+(\d+)").unwrap());

/// Parsed "X de N" pagination label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLabel {
    pub current: u32,
    pub total: u32,
}

impl PageLabel {
    /// Parse a pagination label. Anything that does not contain an
    /// "X de N" run (including an absent, empty label) means a
    /// single-page result set: current and total both default to 1.
    pub fn parse(text: &str) -> Self {
        PAGE_LABEL_RE
            .captures(text)
            .and_then(|caps| {
                let current = caps[1].parse().ok()?;
                let total = caps[2].parse().ok()?;
                Some(Self { current, total })
            })
            .unwrap_or(Self {
                current: 1,
                total: 1,
            })
    }
}

/// Observed state of the "next page" control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextControl {
    /// No next control in the DOM.
    Absent,
    /// Control present but visually disabled.
    Disabled,
    /// Control present and activatable.
    Enabled,
}

/// One live search-results view, as seen by the pagination loop.
///
/// The production implementation drives a browser page; tests drive a
/// scripted mock. All waits are bounded by the implementation.
#[async_trait]
pub trait ResultsSession {
    /// Raw rendered text of every result card currently visible.
    /// Cards that detach mid-read are skipped, not errors.
    async fn card_texts(&self) -> Result<Vec<String>>;

    /// Current pagination label text, empty when the label is absent.
    async fn page_label(&self) -> Result<String>;

    /// Observe the next control.
    async fn next_control(&self) -> Result<NextControl>;

    /// Activate the next control.
    async fn activate_next(&self) -> Result<()>;

    /// Bounded wait until the current page number strictly exceeds
    /// `previous`. Returns false when the wait times out.
    async fn wait_page_past(&self, previous: u32) -> Result<bool>;

    /// Bounded wait until at least one card is rendered.
    async fn wait_for_cards(&self) -> Result<()>;
}

/// Tunables for the collection loop.
#[derive(Debug, Clone)]
pub struct PaginatorConfig {
    /// Fixed delay after re-activating a next control that did not take.
    pub retry_settle: Duration,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            retry_settle: Duration::from_millis(600),
        }
    }
}

/// Walk every result page, parsing all visible cards into records.
///
/// Terminal conditions, all of which end the loop normally:
/// - the next control is absent or disabled,
/// - the page number fails to advance after one retried activation,
/// - as many pages as the label's total have been visited. The last bound
///   guarantees termination even against a next control that never
///   reports disabled.
pub async fn collect_all<S>(session: &S, config: &PaginatorConfig) -> Result<Vec<Precedent>>
where
    S: ResultsSession + ?Sized,
{
    let label = PageLabel::parse(&session.page_label().await?);
    let total = label.total;
    let mut page = label.current;
    let mut pages_seen: u32 = 1;

    info!("page {} of {}: starting", page, total);

    let mut records = Vec::new();
    loop {
        for text in session.card_texts().await? {
            records.push(parse_card(&text));
        }
        info!("page {}: {} records collected so far", page, records.len());

        if pages_seen >= total {
            break;
        }

        match session.next_control().await? {
            NextControl::Absent | NextControl::Disabled => break,
            NextControl::Enabled => {}
        }

        session.activate_next().await?;
        if !session.wait_page_past(page).await? {
            // One retry, then a final check after a short settle delay.
            session.activate_next().await?;
            tokio::time::sleep(config.retry_settle).await;
            let current = PageLabel::parse(&session.page_label().await?).current;
            if current <= page {
                // Did not advance: treat as the end of the results.
                break;
            }
        }

        session.wait_for_cards().await?;
        page = PageLabel::parse(&session.page_label().await?).current;
        pages_seen += 1;
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_parses_current_and_total() {
        let label = PageLabel::parse("3 de 10");
        assert_eq!(label.current, 3);
        assert_eq!(label.total, 10);
    }

    #[test]
    fn label_parses_inside_surrounding_text() {
        let label = PageLabel::parse("  Página 2 de 7 ");
        assert_eq!(label.current, 2);
        assert_eq!(label.total, 7);
    }

    #[test]
    fn absent_label_defaults_to_single_page() {
        assert_eq!(PageLabel::parse(""), PageLabel { current: 1, total: 1 });
        assert_eq!(
            PageLabel::parse("sem resultados"),
            PageLabel { current: 1, total: 1 }
        );
    }
}
