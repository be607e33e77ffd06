//! End-to-end pagination loop tests against a scripted results session.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use pangeascrape::scrapers::pangea::{
    collect_all, NextControl, PaginatorConfig, ResultsSession,
};

/// A scripted portal: fixed pages of card texts, a pagination label and a
/// next control whose behavior the test controls.
struct MockPortal {
    pages: Vec<Vec<String>>,
    /// Total reported by the label; None renders no label at all.
    label_total: Option<usize>,
    /// Whether activating the next control actually advances the page.
    advance_works: bool,
    /// Keep the next control enabled even on the last page.
    always_enabled: bool,
    current: Mutex<usize>,
    activations: AtomicUsize,
}

impl MockPortal {
    fn new(pages: Vec<Vec<String>>) -> Self {
        let label_total = Some(pages.len());
        Self {
            pages,
            label_total,
            advance_works: true,
            always_enabled: false,
            current: Mutex::new(0),
            activations: AtomicUsize::new(0),
        }
    }

    fn card(page: usize, card: usize) -> String {
        format!("STJ\nPage {page} Card {card}\nTese: t{page}.{card}")
    }

    fn with_pages(page_count: usize, cards_per_page: usize) -> Self {
        let pages = (1..=page_count)
            .map(|p| (1..=cards_per_page).map(|c| Self::card(p, c)).collect())
            .collect();
        Self::new(pages)
    }

    fn current(&self) -> usize {
        *self.current.lock().unwrap()
    }
}

#[async_trait]
impl ResultsSession for MockPortal {
    async fn card_texts(&self) -> Result<Vec<String>> {
        Ok(self.pages[self.current()].clone())
    }

    async fn page_label(&self) -> Result<String> {
        match self.label_total {
            Some(total) => Ok(format!("{} de {}", self.current() + 1, total)),
            None => Ok(String::new()),
        }
    }

    async fn next_control(&self) -> Result<NextControl> {
        if self.always_enabled || self.current() + 1 < self.pages.len() {
            Ok(NextControl::Enabled)
        } else {
            Ok(NextControl::Disabled)
        }
    }

    async fn activate_next(&self) -> Result<()> {
        self.activations.fetch_add(1, Ordering::SeqCst);
        if self.advance_works {
            let mut current = self.current.lock().unwrap();
            if *current + 1 < self.pages.len() {
                *current += 1;
            }
        }
        Ok(())
    }

    async fn wait_page_past(&self, previous: u32) -> Result<bool> {
        Ok(self.current() as u32 + 1 > previous)
    }

    async fn wait_for_cards(&self) -> Result<()> {
        Ok(())
    }
}

fn no_settle() -> PaginatorConfig {
    PaginatorConfig {
        retry_settle: Duration::ZERO,
    }
}

#[tokio::test]
async fn three_pages_of_two_cards_yield_six_records_in_order() {
    let portal = MockPortal::with_pages(3, 2);

    let records = collect_all(&portal, &no_settle()).await.unwrap();

    assert_eq!(records.len(), 6);
    let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        [
            "Page 1 Card 1",
            "Page 1 Card 2",
            "Page 2 Card 1",
            "Page 2 Card 2",
            "Page 3 Card 1",
            "Page 3 Card 2",
        ]
    );
    // Card bodies came through the extractor as well.
    assert_eq!(records[0].thesis, "t1.1");
    assert_eq!(records[5].thesis, "t3.2");
}

#[tokio::test]
async fn disabled_next_control_ends_the_run() {
    // Label promises a third page that never materializes; the disabled
    // control is what stops the loop.
    let mut portal = MockPortal::with_pages(2, 1);
    portal.label_total = Some(3);

    let records = collect_all(&portal, &no_settle()).await.unwrap();

    assert_eq!(records.len(), 2);
    // One activation per page transition, none on the disabled last page.
    assert_eq!(portal.activations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn stuck_page_terminates_after_one_retry() {
    let mut portal = MockPortal::with_pages(1, 2);
    portal.label_total = Some(5);
    portal.advance_works = false;
    portal.always_enabled = true;

    let records = collect_all(&portal, &no_settle()).await.unwrap();

    // Only the first page was readable; the failed advance is an end
    // condition, not an error.
    assert_eq!(records.len(), 2);
    // Initial activation plus exactly one retry.
    assert_eq!(portal.activations.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn loop_is_bounded_by_the_label_total_when_next_never_disables() {
    let mut portal = MockPortal::with_pages(3, 2);
    portal.always_enabled = true;

    let records = collect_all(&portal, &no_settle()).await.unwrap();

    // Visits exactly `total` pages; the stuck-enabled control on the last
    // page is never activated.
    assert_eq!(records.len(), 6);
    assert_eq!(portal.activations.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn absent_label_means_a_single_page_run() {
    let mut portal = MockPortal::with_pages(3, 2);
    portal.label_total = None;
    portal.always_enabled = true;

    let records = collect_all(&portal, &no_settle()).await.unwrap();

    // No label: current and total both default to 1, so only the first
    // page is collected even though more exist.
    assert_eq!(records.len(), 2);
    assert_eq!(portal.activations.load(Ordering::SeqCst), 0);
}
