//! Collaborator seams used by the enrichment steps.
//!
//! Each trait has one production implementation; tests plug in fakes.

use crate::data::Record;
use crate::error::Result;
use enricher_scanner::{ContentFetcher, Crawler};
use std::future::Future;
use std::path::Path;

/// Returns the textual content behind a URL.
pub trait ContentSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Returns the deduplicated sub-pages reachable from a base URL.
pub trait PageSource {
    fn unique_pages(&self, base_url: &str) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// Parses a delimited file into records, one per row, in file order.
pub trait TabularSource {
    fn parse_csv(&self, path: &Path) -> Result<Vec<Record>>;
}

/// Returns the full text of a document.
pub trait DocumentSource {
    fn extract_text(&self, path: &Path) -> Result<String>;
}

impl ContentSource for ContentFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send {
        async move { Ok(self.fetch_text(url).await?) }
    }
}

impl PageSource for Crawler {
    fn unique_pages(&self, base_url: &str) -> impl Future<Output = Result<Vec<String>>> + Send {
        async move { Ok(self.unique_page_list(base_url).await?) }
    }
}
