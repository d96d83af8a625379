pub mod client;
pub mod error;
pub mod traits;
pub mod types;

pub use client::HttpSearchService;
pub use error::SearchError;
pub use traits::SearchService;
