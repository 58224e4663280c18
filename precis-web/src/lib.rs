//! Page acquisition and HTML text extraction.
//!
//! - Page fetch trait and HTTP-backed implementation (`fetch`)
//! - Paragraph/title extraction with `scraper` (`extract`)

pub mod extract;
pub mod fetch;

pub use extract::{paragraphs, title, validate_url};
pub use fetch::{HttpPageFetcher, PageFetcher};
