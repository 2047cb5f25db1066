//! Open Trivia DB client.

use climatask_core::{
    status_error, with_retry, NetworkError, ReqwestErrorExt, RetryConfig, TriviaConfig,
};
use reqwest::{Client, Response};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::error::TriviaError;
use crate::types::{Category, CategoryListResponse, QuestionResponse, QuizQuestion, ResponseCode};

const USER_AGENT: &str = "Climatask/0.1.0 (daily quiz)";

#[derive(Debug, Clone)]
pub struct TriviaClient {
    client: Arc<Client>,
    api_url: Url,
    categories_url: Url,
    retry: RetryConfig,
}

fn parse_endpoint(raw: &str) -> Result<Url, TriviaError> {
    Url::parse(raw).map_err(|e| TriviaError::InvalidEndpoint(format!("{}: {}", raw, e)))
}

async fn check_status(response: Response, what: &str) -> Result<Response, TriviaError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!("Trivia {} request failed with {}: {}", what, status, body);
    Err(TriviaError::Unavailable(status_error(status, &body)))
}

impl TriviaClient {
    pub fn new(config: &TriviaConfig) -> Result<Self, TriviaError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TriviaError::Unavailable(e.into_network_error()))?;

        Ok(Self {
            client: Arc::new(client),
            api_url: parse_endpoint(&config.api_url)?,
            categories_url: parse_endpoint(&config.categories_url)?,
            retry: RetryConfig::default(),
        })
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// List categories in the order the service returns them.
    pub async fn list_categories(&self) -> Result<Vec<Category>, TriviaError> {
        tracing::debug!("Fetching trivia categories");

        let response = with_retry(&self.retry, || {
            self.client.get(self.categories_url.clone()).send()
        })
        .await
        .map_err(|e| TriviaError::Unavailable(e.into_network_error()))?;

        let list: CategoryListResponse = check_status(response, "category")
            .await?
            .json()
            .await
            .map_err(|e| TriviaError::Malformed(format!("category list: {}", e)))?;

        tracing::info!("Fetched {} trivia categories", list.trivia_categories.len());
        Ok(list.trivia_categories)
    }

    /// Fetch one multiple-choice question.
    ///
    /// Returns `Ok(None)` when the service has nothing left for the category.
    /// Options come back unshuffled.
    pub async fn fetch_question(&self, category_id: u32) -> Result<Option<QuizQuestion>, TriviaError> {
        tracing::debug!("Fetching trivia question for category {}", category_id);

        let category = category_id.to_string();
        let params = [
            ("amount", "1"),
            ("category", category.as_str()),
            ("type", "multiple"),
            ("encode", "url3986"),
        ];

        let response = with_retry(&self.retry, || {
            self.client.get(self.api_url.clone()).query(&params).send()
        })
        .await
        .map_err(|e| TriviaError::Unavailable(e.into_network_error()))?;

        let body: QuestionResponse = check_status(response, "question")
            .await?
            .json()
            .await
            .map_err(|e| TriviaError::Malformed(format!("question response: {}", e)))?;

        match ResponseCode::from(body.response_code) {
            ResponseCode::Success => {}
            ResponseCode::NoResults | ResponseCode::TokenEmpty => {
                tracing::info!("No trivia questions left for category {}", category_id);
                return Ok(None);
            }
            ResponseCode::RateLimit => {
                return Err(TriviaError::Unavailable(NetworkError::RateLimited(
                    "Open Trivia DB response code 5".into(),
                )));
            }
            other => {
                return Err(TriviaError::Malformed(format!(
                    "request rejected with {:?}",
                    other
                )));
            }
        }

        let raw = body.results.into_iter().next().ok_or_else(|| {
            TriviaError::Malformed("success response without results".into())
        })?;

        raw.into_question().map(Some)
    }
}
