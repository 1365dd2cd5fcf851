use crate::client::ScanConfig;
use crate::error::{Result, ScanError};
use crate::result::CrawlResult;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

type WorkQueue = Mutex<VecDeque<(String, usize)>>;

/// Crawls a single site and reports every page it discovers on that site.
pub struct Crawler {
    client: Client,
    max_depth: usize,
    workers: usize,
}

/// Everything a worker needs, shared across the pool for one crawl.
struct CrawlState {
    client: Client,
    base_domain: String,
    max_depth: usize,
    visited: Mutex<HashSet<String>>,
    results: Mutex<Vec<CrawlResult>>,
    queues: Vec<WorkQueue>,
    pending: AtomicUsize,
}

impl Crawler {
    pub fn new(config: &ScanConfig) -> Result<Self> {
        Ok(Self::with_client(config.build_client()?))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            max_depth: 2,
            workers: 1,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Crawl from `base_url` and return the sorted, deduplicated list of
    /// same-site page URLs discovered, the base URL included.
    pub async fn unique_page_list(&self, base_url: &str) -> Result<Vec<String>> {
        let (_, discovered) = self.crawl(base_url).await?;
        Ok(discovered.into_iter().collect())
    }

    /// Fetch the base page, then walk same-site links breadth-first up to the
    /// configured depth. Fails only when the base page itself cannot be fetched.
    pub async fn crawl(&self, base_url: &str) -> Result<(Vec<CrawlResult>, BTreeSet<String>)> {
        info!("Starting crawl of {} with {} workers", base_url, self.workers);

        let mut start = Url::parse(base_url)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        start.set_fragment(None);

        let base_domain = start
            .host_str()
            .ok_or_else(|| ScanError::InvalidUrl(format!("{} has no host", base_url)))?
            .to_string();
        let start = start.to_string();

        let (root, links) = Self::fetch_and_parse(&self.client, &start, 0, &base_domain).await?;

        let state = Arc::new(CrawlState {
            client: self.client.clone(),
            base_domain,
            max_depth: self.max_depth,
            visited: Mutex::new(HashSet::from([start.clone()])),
            results: Mutex::new(vec![root]),
            queues: (0..self.workers).map(|_| Mutex::new(VecDeque::new())).collect(),
            pending: AtomicUsize::new(0),
        });

        Self::enqueue(&state, links, 1).await;

        let mut handles = Vec::new();
        for worker_id in 0..self.workers {
            let state = state.clone();
            handles.push(tokio::spawn(async move {
                Self::run_worker(worker_id, state).await;
            }));
        }

        for handle in handles {
            handle.await?;
        }

        let results = state.results.lock().await.clone();
        let discovered: BTreeSet<String> = state.visited.lock().await.iter().cloned().collect();
        info!(
            "Crawl complete. Fetched {} pages, discovered {}",
            results.len(),
            discovered.len()
        );
        Ok((results, discovered))
    }

    async fn run_worker(worker_id: usize, state: Arc<CrawlState>) {
        debug!("Worker {} started", worker_id);

        loop {
            let work_item = {
                let mut queue = state.queues[worker_id].lock().await;
                queue.pop_front()
            };

            let Some((url, depth)) = work_item else {
                if state.pending.load(Ordering::SeqCst) == 0 {
                    break;
                }
                tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
                continue;
            };

            // Pages at the depth limit are recorded as discovered but never fetched
            if depth < state.max_depth {
                match Self::fetch_and_parse(&state.client, &url, depth, &state.base_domain).await {
                    Ok((result, links)) => {
                        state.results.lock().await.push(result);
                        Self::enqueue(&state, links, depth + 1).await;
                    }
                    Err(e) => {
                        warn!("Crawl error for {}: {}", url, e);
                    }
                }
            }

            state.pending.fetch_sub(1, Ordering::SeqCst);
        }

        debug!("Worker {} finished", worker_id);
    }

    /// Mark unseen links as visited and spread them round-robin over the worker queues.
    async fn enqueue(state: &CrawlState, links: Vec<String>, depth: usize) {
        let mut target_worker = 0;
        for link in links {
            let is_new = state.visited.lock().await.insert(link.clone());
            if !is_new {
                continue;
            }

            state.pending.fetch_add(1, Ordering::SeqCst);
            state.queues[target_worker]
                .lock()
                .await
                .push_back((link, depth));
            target_worker = (target_worker + 1) % state.queues.len();
        }
    }

    async fn fetch_and_parse(
        client: &Client,
        url: &str,
        depth: usize,
        base_domain: &str,
    ) -> Result<(CrawlResult, Vec<String>)> {
        debug!("Fetching {}", url);

        let response = client.get(url).send().await?;
        // Relative links resolve against where redirects ended up
        let final_url = response.url().to_string();

        let mut result = CrawlResult::new(url.to_string(), depth);
        result.status_code = response.status().as_u16();
        result.content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        if depth == 0 && !response.status().is_success() {
            return Err(ScanError::StatusError {
                url: url.to_string(),
                status: result.status_code,
            });
        }

        if !result.is_html() {
            return Ok((result, Vec::new()));
        }

        let body = response.text().await?;
        let links = Self::extract_links(&body, &final_url, base_domain);
        result.links_found = links.clone();

        Ok((result, links))
    }

    fn extract_links(html: &str, current_url: &str, base_domain: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let Ok(link_selector) = Selector::parse("a[href]") else {
            return Vec::new();
        };

        let mut links = Vec::new();
        for element in document.select(&link_selector) {
            if let Some(href) = element.value().attr("href")
                && let Some(absolute_url) = Self::resolve_url(current_url, href)
            {
                if Self::is_same_domain(&absolute_url, base_domain) {
                    debug!("Found link: {}", absolute_url);
                    links.push(absolute_url);
                } else {
                    debug!("Skipping cross-domain link: {}", absolute_url);
                }
            }
        }

        links
    }

    fn resolve_url(base: &str, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty()
            || href.starts_with("javascript:")
            || href.starts_with("mailto:")
            || href.starts_with("tel:")
            || href.starts_with('#')
        {
            return None;
        }

        let mut resolved = Url::parse(base).ok()?.join(href).ok()?;
        resolved.set_fragment(None);

        match resolved.scheme() {
            "http" | "https" => Some(resolved.to_string()),
            _ => None,
        }
    }

    fn is_same_domain(url: &str, base_domain: &str) -> bool {
        if let Ok(parsed) = Url::parse(url)
            && let Some(host) = parsed.host_str()
        {
            return host == base_domain || host.ends_with(&format!(".{}", base_domain));
        }
        false
    }
}
