use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A failed query. Both variants mean the backend gave no usable answer.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("query backend returned status {0}")]
    Status(StatusCode),
}

#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryResponse {
    pub response: String,
}

#[derive(Debug, Clone)]
pub struct QueryClient {
    client: Client,
    base_url: String,
}

impl QueryClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Post one query and wait for the reply. No retry and no timeout.
    pub async fn send_query(&self, text: &str) -> Result<QueryResponse, QueryError> {
        let url = format!("{}/query", self.base_url);
        tracing::debug!(%url, chars = text.chars().count(), "sending query");

        let result = self.post_query(&url, text).await;
        if let Err(ref e) = result {
            tracing::warn!(error = %e, "error querying the backend");
        }
        result
    }

    async fn post_query(&self, url: &str, text: &str) -> Result<QueryResponse, QueryError> {
        let response = self
            .client
            .post(url)
            .json(&QueryRequest { query: text })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QueryError::Status(response.status()));
        }

        Ok(response.json::<QueryResponse>().await?)
    }
}
