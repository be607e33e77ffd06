//! Browser session lifecycle.
//!
//! Wraps chromiumoxide (CDP) behind an explicitly-owned session object so
//! the caller controls acquisition and release: launch, open pages, close.
//! Nothing here knows about the site being scraped.

mod config;

pub use config::{default_headless, default_timeout, BrowserSessionConfig};

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// An exclusively-owned browser automation session.
///
/// Consuming [`close`](Self::close) is the only way to give the session up,
/// which keeps release visible at every exit path of the caller.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    timeout: Duration,
}

/// Common Chrome executable paths to check before falling back to PATH.
const CHROME_PATHS: &[&str] = &[
    // Linux
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    // macOS
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    // Common install locations
    "/opt/google/chrome/google-chrome",
];

/// Find a Chrome/Chromium executable on this system.
fn find_chrome() -> Result<PathBuf> {
    for path in CHROME_PATHS {
        let p = std::path::Path::new(path);
        if p.exists() {
            info!("Found Chrome at: {}", path);
            return Ok(p.to_path_buf());
        }
    }

    for cmd in &[
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
    ] {
        if let Ok(path) = which::which(cmd) {
            info!("Found Chrome in PATH: {}", path.display());
            return Ok(path);
        }
    }

    Err(anyhow::anyhow!(
        "Chrome/Chromium not found. Please install it:\n\
         - Arch/Manjaro: sudo pacman -S chromium\n\
         - Ubuntu/Debian: sudo apt install chromium-browser\n\
         - Fedora: sudo dnf install chromium\n\
         - Or download from: https://www.google.com/chrome/"
    ))
}

impl BrowserSession {
    /// Launch a browser according to `config`.
    pub async fn launch(config: &BrowserSessionConfig) -> Result<Self> {
        info!("Launching browser (headless={})", config.headless);

        let chrome_path = find_chrome()?;

        let mut builder = BrowserConfig::builder().chrome_executable(chrome_path);

        // with_head means NOT headless, confusingly
        if !config.headless {
            builder = builder.with_head();
        }

        builder = builder
            .arg("--no-sandbox") // Needed for headless in containers/restricted environments
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu") // Recommended for headless
            .arg("--no-first-run")
            .arg("--no-default-browser-check");

        for arg in &config.chrome_args {
            builder = builder.arg(arg);
        }

        let browser_config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build browser config: {}", e))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .context("Failed to launch browser")?;

        // The handler drives the CDP connection and must be polled for the
        // browser to make progress.
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            browser,
            handler_task,
            timeout: Duration::from_secs(config.timeout),
        })
    }

    /// Timeout for bounded DOM waits on pages opened by this session.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Open a new tab and navigate it to `url`.
    pub async fn open(&self, url: &str) -> Result<Page> {
        let page = self
            .browser
            .new_page(url)
            .await
            .with_context(|| format!("Failed to open {}", url))?;
        // Best effort; single-page apps keep loading after the event anyway.
        let _ = page.wait_for_navigation().await;
        Ok(page)
    }

    /// Shut the browser down, consuming the session.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Browser did not close cleanly: {}", e);
        }
        let _ = self.browser.wait().await;
        self.handler_task.abort();
    }
}
