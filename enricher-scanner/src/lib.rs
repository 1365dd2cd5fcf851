pub mod client;
pub mod crawler;
pub mod error;
pub mod fetcher;
pub mod result;

pub use client::ScanConfig;
pub use crawler::Crawler;
pub use error::ScanError;
pub use fetcher::ContentFetcher;
pub use result::CrawlResult;
