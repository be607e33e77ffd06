//! PangeaScrape - precedent collection from the Pangea (BNP) portal.
//!
//! Drives a Chromium instance through the public search interface at
//! pangeabnp.pdpj.jus.br, walks every result page, parses each result
//! card into a flat record and writes the whole run to a spreadsheet.

pub mod cli;
pub mod export;
pub mod models;
pub mod scrapers;
