use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::PROVIDER_TIMEOUT;

const SERPAPI_URL: &str = "https://serpapi.com/search";
const GOOGLE_CSE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Google Custom Search rejects `num` above 10.
const GOOGLE_CSE_MAX_RESULTS: usize = 10;

pub const DEMO_LINK: &str = "https://example.com/demo";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub link: Option<String>,
}

/// What a search call hands back to the agent. Serialized untagged so an
/// observation is either a plain result array or an `{"error": ...}`
/// object; the tool never returns `Err`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchOutcome {
    Results(Vec<SearchResult>),
    Failure { error: String },
}

pub struct SearchTool {
    client: reqwest::Client,
    serpapi_key: Option<String>,
    google_api_key: Option<String>,
    google_cse_id: Option<String>,
    serpapi_url: String,
    google_url: String,
}

impl SearchTool {
    pub fn new(
        serpapi_key: Option<String>,
        google_api_key: Option<String>,
        google_cse_id: Option<String>,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            serpapi_key,
            google_api_key,
            google_cse_id,
            serpapi_url: SERPAPI_URL.to_string(),
            google_url: GOOGLE_CSE_URL.to_string(),
        })
    }

    /// Runs the query against the first configured backend, falling back
    /// to fixed demonstration data when none is configured.
    pub async fn search(&self, query: &str, num_results: usize) -> SearchOutcome {
        info!("Web search: {}", query);

        let outcome = if let Some(key) = self.serpapi_key.clone() {
            self.search_serpapi(&key, query, num_results).await
        } else if let (Some(key), Some(cse_id)) =
            (self.google_api_key.clone(), self.google_cse_id.clone())
        {
            self.search_google(&key, &cse_id, query, num_results).await
        } else {
            warn!("No web search API keys configured, using demo data");
            SearchOutcome::Results(demo_results(query))
        };

        match &outcome {
            SearchOutcome::Results(results) => {
                info!("Web search returned {} results", results.len());
            }
            SearchOutcome::Failure { error } => error!("Web search failed: {}", error),
        }
        outcome
    }

    async fn search_serpapi(&self, key: &str, query: &str, num_results: usize) -> SearchOutcome {
        let num = num_results.to_string();
        debug!("SerpAPI request for '{}'", query);

        let response = match self
            .client
            .get(&self.serpapi_url)
            .query(&[
                ("q", query),
                ("api_key", key),
                ("engine", "google"),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(response) => response,
            Err(e) => {
                return SearchOutcome::Failure {
                    error: format!("Error performing web search: {e}"),
                }
            }
        };

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                return SearchOutcome::Failure {
                    error: format!("Error decoding API response: {e}"),
                }
            }
        };

        SearchOutcome::Results(simplify(&body["organic_results"], num_results))
    }

    async fn search_google(
        &self,
        key: &str,
        cse_id: &str,
        query: &str,
        num_results: usize,
    ) -> SearchOutcome {
        let num = num_results.min(GOOGLE_CSE_MAX_RESULTS).to_string();
        debug!("Google Custom Search request for '{}'", query);

        let response = match self
            .client
            .get(&self.google_url)
            .query(&[
                ("q", query),
                ("key", key),
                ("cx", cse_id),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(response) => response,
            Err(e) => {
                return SearchOutcome::Failure {
                    error: format!("Error performing Google search: {e}"),
                }
            }
        };

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                return SearchOutcome::Failure {
                    error: format!("Error decoding API response: {e}"),
                }
            }
        };

        SearchOutcome::Results(simplify(&body["items"], num_results))
    }

    #[cfg(test)]
    fn with_serpapi_url(mut self, url: impl Into<String>) -> Self {
        self.serpapi_url = url.into();
        self
    }

    #[cfg(test)]
    fn with_google_url(mut self, url: impl Into<String>) -> Self {
        self.google_url = url.into();
        self
    }
}

fn simplify(items: &Value, num_results: usize) -> Vec<SearchResult> {
    items
        .as_array()
        .map(|items| {
            items
                .iter()
                .take(num_results)
                .map(|item| SearchResult {
                    title: item["title"].as_str().map(str::to_string),
                    snippet: item["snippet"].as_str().map(str::to_string),
                    link: item["link"].as_str().map(str::to_string),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Fixed placeholder results used when no search backend is configured.
/// A deliberate degraded mode, not a failure.
fn demo_results(query: &str) -> Vec<SearchResult> {
    vec![
        SearchResult {
            title: Some(format!("Search result for {query}")),
            snippet: Some(
                "This is demonstration data shown because no web search API keys were \
                 configured. In a real deployment, this would be actual search results."
                    .to_string(),
            ),
            link: Some(DEMO_LINK.to_string()),
        },
        SearchResult {
            title: Some(format!("Another result for {query}")),
            snippet: Some(
                "The system can use SerpAPI or Google Custom Search API when properly \
                 configured with API keys."
                    .to_string(),
            ),
            link: Some(DEMO_LINK.to_string()),
        },
    ]
}
