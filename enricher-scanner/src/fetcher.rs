use crate::client::ScanConfig;
use crate::error::{Result, ScanError};
use reqwest::Client;
use scraper::{ElementRef, Html, Node};
use tracing::debug;
use url::Url;

/// Elements whose text never reaches the reader.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Fetches a page and reduces it to its visible text.
#[derive(Clone)]
pub struct ContentFetcher {
    client: Client,
}

impl ContentFetcher {
    pub fn new(config: &ScanConfig) -> Result<Self> {
        Ok(Self {
            client: config.build_client()?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;

        debug!("Fetching {}", parsed);
        let response = self.client.get(parsed).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::StatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_ascii_lowercase());

        let body = response.text().await?;

        let is_html = match content_type {
            Some(ct) => ct.contains("text/html") || ct.contains("application/xhtml"),
            None => looks_like_html(&body),
        };

        if is_html {
            Ok(html_to_text(&body))
        } else {
            Ok(body.trim().to_string())
        }
    }
}

fn looks_like_html(body: &str) -> bool {
    let head: String = body.trim_start().chars().take(15).collect();
    let head = head.to_ascii_lowercase();
    head.starts_with("<!doctype html") || head.starts_with("<html")
}

/// Visible text of an HTML document with whitespace collapsed.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut chunks = Vec::new();
    collect_text(document.root_element(), &mut chunks);

    chunks
        .iter()
        .flat_map(|chunk| chunk.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

fn collect_text<'a>(element: ElementRef<'a>, chunks: &mut Vec<&'a str>) {
    if SKIPPED_ELEMENTS.contains(&element.value().name()) {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => chunks.push(&**text),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, chunks);
                }
            }
            _ => {}
        }
    }
}
