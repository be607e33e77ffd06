//! Scraping layers: browser session lifecycle and the Pangea site adapter.

pub mod browser;
pub mod pangea;

pub use browser::{BrowserSession, BrowserSessionConfig};
pub use pangea::PangeaSearch;
