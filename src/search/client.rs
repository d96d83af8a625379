use crate::config::Config;
use crate::models::SearchRecord;
use crate::search::error::SearchError;
use crate::search::traits::SearchService;
use crate::search::types::SearchRequest;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

/// Search service reached over HTTP
pub struct HttpSearchService {
    client: Client,
    search_url: String,
    page_url: String,
    results_selector: String,
}

impl HttpSearchService {
    /// Create a client for the service described by `config`
    pub fn new(config: &Config) -> Result<Self, SearchError> {
        // Fail early on a selector that could never match.
        parse_selector(&config.results_selector)?;

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            search_url: config.search_url(),
            page_url: config.page_url(),
            results_selector: config.results_selector.clone(),
        })
    }
}

#[async_trait]
impl SearchService for HttpSearchService {
    async fn search(&self, term: &str) -> Result<Vec<SearchRecord>, SearchError> {
        debug!("Posting term {:?} to {}", term, self.search_url);

        let response = self
            .client
            .post(&self.search_url)
            .json(&SearchRequest::new(term))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Search service returned status: {}", status);
            return Err(SearchError::Status(status));
        }

        let body = response.bytes().await?;
        let records: Vec<SearchRecord> = serde_json::from_slice(&body)?;

        debug!("Found {} units for {:?}", records.len(), term);
        Ok(records)
    }

    async fn initial_view(&self) -> Result<String, SearchError> {
        info!("Fetching initial view from {}", self.page_url);

        let response = self.client.get(&self.page_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Initial page returned status: {}", status);
            return Err(SearchError::Status(status));
        }

        let page = response.text().await?;
        debug!("Downloaded {} bytes of HTML", page.len());

        extract_container(&page, &self.results_selector)
    }
}

fn parse_selector(selector: &str) -> Result<Selector, SearchError> {
    Selector::parse(selector).map_err(|_| SearchError::InvalidSelector(selector.to_string()))
}

/// Inner HTML of the first element in `page` matching `selector`
pub fn extract_container(page: &str, selector: &str) -> Result<String, SearchError> {
    let parsed = parse_selector(selector)?;
    let document = Html::parse_document(page);

    document
        .select(&parsed)
        .next()
        .map(|element| element.inner_html())
        .ok_or_else(|| SearchError::MissingContainer(selector.to_string()))
}
