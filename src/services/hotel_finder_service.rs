use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use scraper::{Html, Node};
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::services::llm_service::{CompletionModel, CompletionOptions, LlmError};
use crate::services::prompt_templates::hotel_prompt;

/// How much page text is handed to the model as search context.
pub const SEARCH_TEXT_LIMIT: usize = 8000;
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)";

#[derive(Debug)]
pub enum HotelSearchError {
    InvalidUrl(String),
    HttpError(reqwest::Error),
    LlmError(LlmError),
}

impl fmt::Display for HotelSearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HotelSearchError::InvalidUrl(msg) => write!(f, "Invalid search URL: {}", msg),
            HotelSearchError::HttpError(err) => write!(f, "HTTP error: {}", err),
            HotelSearchError::LlmError(err) => write!(f, "Hotel suggestion failed: {}", err),
        }
    }
}

impl Error for HotelSearchError {}

impl From<reqwest::Error> for HotelSearchError {
    fn from(err: reqwest::Error) -> Self {
        HotelSearchError::HttpError(err)
    }
}

impl From<LlmError> for HotelSearchError {
    fn from(err: LlmError) -> Self {
        HotelSearchError::LlmError(err)
    }
}

/// Fetches a page and returns its readable text.
pub trait WebFetcher: Send + Sync {
    fn fetch_text<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, HotelSearchError>>;
}

pub fn hotel_query(city: &str, days: u32, date_of_arrive: &str) -> String {
    format!("hotel in {} for {} days from {}", city, days, date_of_arrive)
}

/// `base?q=query` with spaces sent as `+`.
pub fn search_url(base: &str, query: &str) -> Result<String, HotelSearchError> {
    let url = url::Url::parse_with_params(base, &[("q", query)])
        .map_err(|e| HotelSearchError::InvalidUrl(format!("{}: {}", base, e)))?;
    Ok(url.to_string())
}

const HIDDEN_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

/// Visible text of an HTML page, whitespace collapsed, cut to `limit` characters.
/// Entities are decoded by the parser.
pub fn page_text(html: &str, limit: usize) -> String {
    let document = Html::parse_document(html);

    let mut words = Vec::new();
    for node in document.tree.root().descendants() {
        let text = match node.value() {
            Node::Text(text) => text,
            _ => continue,
        };
        let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
            Node::Element(element) => HIDDEN_ELEMENTS.contains(&element.name()),
            _ => false,
        });
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }

    words.join(" ").chars().take(limit).collect()
}

pub struct HttpWebFetcher {
    client: Client,
}

impl HttpWebFetcher {
    pub fn new(timeout: Duration) -> Result<Self, HotelSearchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    async fn execute(&self, url: &str) -> Result<String, HotelSearchError> {
        let response = self.client.get(url).send().await?;

        // rate-limit and consent pages still go to the model as context
        let status = response.status();
        if !status.is_success() {
            log::warn!("Search request returned {}, using the page as is", status);
        }

        let html = response.text().await?;
        Ok(page_text(&html, SEARCH_TEXT_LIMIT))
    }
}

impl WebFetcher for HttpWebFetcher {
    fn fetch_text<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, HotelSearchError>> {
        self.execute(url).boxed()
    }
}

/// Asks the model for five hotels, with a web search for the same query as context.
pub struct HotelFinder {
    llm: Arc<dyn CompletionModel>,
    fetcher: Arc<dyn WebFetcher>,
    search_base_url: String,
}

impl HotelFinder {
    pub fn new(
        llm: Arc<dyn CompletionModel>,
        fetcher: Arc<dyn WebFetcher>,
        search_base_url: &str,
    ) -> Self {
        Self {
            llm,
            fetcher,
            search_base_url: search_base_url.to_string(),
        }
    }

    /// Returns the model's raw answer; `response_parser::parse_hotels` reads it.
    pub async fn search(&self, query: &str) -> Result<String, HotelSearchError> {
        let url = search_url(&self.search_base_url, query)?;
        log::info!("Searching hotels: {}", url);

        let search_results = self.fetcher.fetch_text(&url).await?;
        let prompt = hotel_prompt(query, &search_results);

        Ok(self
            .llm
            .complete(&prompt, CompletionOptions::default())
            .await?)
    }
}
