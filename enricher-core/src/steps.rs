//! The four enrichment steps.
//!
//! Every step writes into a caller-owned [`ExternalData`]. Three of them
//! contain their failures: they log at error level, write a well-typed
//! default and report [`Outcome::Defaulted`]. PDF extraction is the exception
//! and hands its error back to the caller without touching the mapping.
//!
//! | Step                 | Per-item isolation | Default on failure      | Propagates |
//! |----------------------|--------------------|-------------------------|------------|
//! | `scrape_url_content` | yes, list input    | `""` (per item or all)  | no         |
//! | `find_sub_pages`     | n/a                | `[]`                    | no         |
//! | `read_csv`           | n/a                | `[]` under caller `key` | no         |
//! | `read_pdf`           | n/a                | none                    | yes        |

use crate::data::{ExternalData, FieldValue};
use crate::error::{EnrichError, SourceError};
use crate::sources::{ContentSource, DocumentSource, PageSource, TabularSource};
use std::fmt;
use std::path::Path;
use tracing::{error, info};

pub const URL_CONTENT_KEY: &str = "URL Content";
pub const SUB_PAGES_KEY: &str = "Sub Pages";
pub const CSV_DATA_KEY: &str = "CSV Data";

/// A single URL or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlInput {
    Single(String),
    Many(Vec<String>),
}

impl From<&str> for UrlInput {
    fn from(url: &str) -> Self {
        UrlInput::Single(url.to_string())
    }
}

impl From<String> for UrlInput {
    fn from(url: String) -> Self {
        UrlInput::Single(url)
    }
}

impl From<Vec<String>> for UrlInput {
    fn from(urls: Vec<String>) -> Self {
        UrlInput::Many(urls)
    }
}

impl From<Vec<&str>> for UrlInput {
    fn from(urls: Vec<&str>) -> Self {
        UrlInput::Many(urls.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for UrlInput {
    fn from(urls: &[&str]) -> Self {
        UrlInput::Many(urls.iter().map(|u| u.to_string()).collect())
    }
}

impl fmt::Display for UrlInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlInput::Single(url) => f.write_str(url),
            UrlInput::Many(urls) => write!(f, "[{}]", urls.join(", ")),
        }
    }
}

/// How a step ended, as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every value written came from the collaborator.
    Enriched,
    /// List input where the listed URLs failed and were written as `""`.
    PartiallyEnriched { failed: Vec<String> },
    /// The step failed and wrote its default instead.
    Defaulted { reason: String },
}

impl Outcome {
    pub fn is_defaulted(&self) -> bool {
        matches!(self, Outcome::Defaulted { .. })
    }
}

/// Fetch the content behind `urls` into `"URL Content"`.
///
/// A list input yields a list of the same length and order, failed entries
/// replaced by `""`. A single URL yields its text. Any failure outside the
/// per-item handling resets `"URL Content"` to `""`.
pub async fn scrape_url_content<S: ContentSource>(
    output: &mut ExternalData,
    source: &S,
    urls: impl Into<UrlInput>,
) -> Outcome {
    let urls = urls.into();

    match fetch_url_content(source, &urls).await {
        Ok((value, failed)) => {
            output.insert(URL_CONTENT_KEY, value);
            if failed.is_empty() {
                Outcome::Enriched
            } else {
                Outcome::PartiallyEnriched { failed }
            }
        }
        Err(e) => {
            error!("Error scraping URL content for URLs {}: {}", urls, e);
            output.insert(URL_CONTENT_KEY, FieldValue::empty_text());
            Outcome::Defaulted {
                reason: e.to_string(),
            }
        }
    }
}

async fn fetch_url_content<S: ContentSource>(
    source: &S,
    urls: &UrlInput,
) -> Result<(FieldValue, Vec<String>), SourceError> {
    match urls {
        UrlInput::Many(list) => {
            let mut contents = Vec::with_capacity(list.len());
            let mut failed = Vec::new();

            for url in list {
                match source.fetch(url).await {
                    Ok(content) => contents.push(content),
                    Err(e) => {
                        error!("Error scraping URL content for URL {}: {}", url, e);
                        contents.push(String::new());
                        failed.push(url.clone());
                    }
                }
            }

            info!("Scraped {}/{} URLs", list.len() - failed.len(), list.len());
            Ok((FieldValue::TextList(contents), failed))
        }
        UrlInput::Single(url) => {
            let content = source.fetch(url).await?;
            Ok((FieldValue::Text(content), Vec::new()))
        }
    }
}

/// Crawl `base_url` and store the discovered pages under `"Sub Pages"`,
/// or `[]` when the crawl fails.
pub async fn find_sub_pages<P: PageSource>(
    output: &mut ExternalData,
    source: &P,
    base_url: &str,
) -> Outcome {
    match source.unique_pages(base_url).await {
        Ok(pages) => {
            info!("Found {} sub-pages for {}", pages.len(), base_url);
            output.insert(SUB_PAGES_KEY, FieldValue::TextList(pages));
            Outcome::Enriched
        }
        Err(e) => {
            error!("Error finding sub-pages for domain {}: {}", base_url, e);
            output.insert(SUB_PAGES_KEY, FieldValue::empty_list());
            Outcome::Defaulted {
                reason: e.to_string(),
            }
        }
    }
}

/// Read the CSV at `file_path` into records.
///
/// On success the records always land under `"CSV Data"` and `key` is
/// ignored. On failure `[]` is written under `key` instead, so a failed read
/// never creates `"CSV Data"` unless `key` is `"CSV Data"`.
pub fn read_csv<T: TabularSource>(
    output: &mut ExternalData,
    source: &T,
    file_path: impl AsRef<Path>,
    key: &str,
) -> Outcome {
    let file_path = file_path.as_ref();

    match source.parse_csv(file_path) {
        Ok(records) => {
            output.insert(CSV_DATA_KEY, FieldValue::Records(records));
            Outcome::Enriched
        }
        Err(e) => {
            error!("Error reading CSV file at {}: {}", file_path.display(), e);
            output.insert(key, FieldValue::Records(Vec::new()));
            Outcome::Defaulted {
                reason: e.to_string(),
            }
        }
    }
}

/// Extract the full text of the PDF at `file_path` into `key`.
///
/// Extraction errors are returned as-is and nothing is written.
pub fn read_pdf<D: DocumentSource>(
    output: &mut ExternalData,
    source: &D,
    file_path: impl AsRef<Path>,
    key: &str,
) -> Result<Outcome, EnrichError> {
    let file_path = file_path.as_ref();

    let text = source
        .extract_text(file_path)
        .map_err(|err| EnrichError::Pdf {
            path: file_path.to_path_buf(),
            source: err,
        })?;

    output.insert(key, FieldValue::Text(text));
    Ok(Outcome::Enriched)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_input_conversions() {
        assert_eq!(
            UrlInput::from("http://a.example/"),
            UrlInput::Single("http://a.example/".to_string())
        );
        assert_eq!(
            UrlInput::from(vec!["http://a.example/", "http://b.example/"]),
            UrlInput::Many(vec![
                "http://a.example/".to_string(),
                "http://b.example/".to_string()
            ])
        );
        assert_eq!(UrlInput::from(Vec::<String>::new()), UrlInput::Many(Vec::new()));
    }

    #[test]
    fn test_url_input_display() {
        assert_eq!(UrlInput::from("http://a/").to_string(), "http://a/");
        assert_eq!(
            UrlInput::from(vec!["http://a/", "http://b/"]).to_string(),
            "[http://a/, http://b/]"
        );
    }
}
