//! Browser session configuration types.

use serde::{Deserialize, Serialize};

/// Browser session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserSessionConfig {
    /// Run in headless mode (default: true).
    /// Set to false to watch the scrape in a visible window.
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Timeout in seconds for bounded DOM waits (default: 25).
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Additional Chrome arguments.
    #[serde(default)]
    pub chrome_args: Vec<String>,
}

impl Default for BrowserSessionConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            timeout: default_timeout(),
            chrome_args: Vec::new(),
        }
    }
}

pub fn default_headless() -> bool {
    true
}

pub fn default_timeout() -> u64 {
    25
}
