use reqwest::{Error as ReqwestError, StatusCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] ReqwestError),
    #[error("Search service returned status {0}")]
    Status(StatusCode),
    #[error("Malformed search response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid results selector: {0}")]
    InvalidSelector(String),
    #[error("No element matching {0} in the initial page")]
    MissingContainer(String),
}
