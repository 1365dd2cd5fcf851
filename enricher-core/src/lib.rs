pub mod data;
pub mod document;
pub mod error;
pub mod sources;
pub mod steps;
pub mod tabular;

pub use data::{ExternalData, FieldValue, Record, Scalar};
pub use document::PdfExtractor;
pub use error::{EnrichError, SourceError};
pub use sources::{ContentSource, DocumentSource, PageSource, TabularSource};
pub use steps::{
    CSV_DATA_KEY, Outcome, SUB_PAGES_KEY, URL_CONTENT_KEY, UrlInput, find_sub_pages, read_csv,
    read_pdf, scrape_url_content,
};
pub use tabular::CsvReader;
