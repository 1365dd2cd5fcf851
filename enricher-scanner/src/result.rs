use serde::Serialize;

/// One fetched page of a crawl.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    pub url: String,
    pub depth: usize,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub links_found: Vec<String>,
}

impl CrawlResult {
    pub fn new(url: String, depth: usize) -> Self {
        Self {
            url,
            depth,
            status_code: 0,
            content_type: None,
            links_found: Vec::new(),
        }
    }

    pub fn is_html(&self) -> bool {
        self.content_type
            .as_ref()
            .map(|ct| ct.contains("text/html"))
            .unwrap_or(false)
    }
}
