use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::PROVIDER_TIMEOUT;

const OPENWEATHER_URL: &str = "http://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: Option<String>,
    pub temperature: Option<f64>,
    pub description: Option<String>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Weather lookup result handed to the agent; like search, failures are
/// typed values and never `Err`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WeatherOutcome {
    Report(WeatherReport),
    Failure { error: String },
}

pub struct WeatherTool {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl WeatherTool {
    pub fn new(api_key: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url: OPENWEATHER_URL.to_string(),
        })
    }

    pub async fn get_weather(&self, location: &str) -> WeatherOutcome {
        info!("Weather lookup: {}", location);

        let Some(key) = self.api_key.clone() else {
            warn!("OpenWeather API key not configured, using demo data");
            return WeatherOutcome::Report(demo_weather(location));
        };

        debug!("OpenWeather request for '{}'", location);
        let response = match self
            .client
            .get(&self.base_url)
            .query(&[("q", location), ("appid", key.as_str()), ("units", "metric")])
            .send()
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(response) => response,
            Err(e) => {
                error!("Weather lookup failed due to a request error: {}", e);
                return WeatherOutcome::Failure {
                    error: format!("Error fetching weather: {e}"),
                };
            }
        };

        let data: Value = match response.json().await {
            Ok(data) => data,
            Err(e) => {
                error!("Weather lookup failed due to a decoding error: {}", e);
                return WeatherOutcome::Failure {
                    error: format!("Error decoding API response: {e}"),
                };
            }
        };

        // The provider embeds its status code in the payload
        if data["cod"].as_i64() != Some(200) {
            let message = data["message"].as_str().unwrap_or("Unknown error");
            error!("OpenWeather API error: {}", message);
            return WeatherOutcome::Failure {
                error: format!("Error fetching weather: {message}"),
            };
        }

        info!("Weather lookup successful for {}", location);
        WeatherOutcome::Report(WeatherReport {
            location: data["name"].as_str().map(str::to_string),
            temperature: data["main"]["temp"].as_f64(),
            description: data["weather"][0]["description"].as_str().map(str::to_string),
            humidity: data["main"]["humidity"].as_f64(),
            wind_speed: data["wind"]["speed"].as_f64(),
            source: None,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Fixed placeholder report used when no API key is configured.
fn demo_weather(location: &str) -> WeatherReport {
    WeatherReport {
        location: Some(location.to_string()),
        temperature: Some(22.0),
        description: Some("Partly cloudy".to_string()),
        humidity: Some(65.0),
        wind_speed: Some(3.5),
        source: Some("demo_data".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn unconfigured_lookup_returns_demo_report() {
        let tool = WeatherTool::new(None).unwrap();
        let outcome = tool.get_weather("jaipur").await;

        let WeatherOutcome::Report(report) = outcome else {
            panic!("demo mode is not a failure");
        };
        assert_eq!(report.location.as_deref(), Some("jaipur"));
        assert_eq!(report.temperature, Some(22.0));
        assert_eq!(report.source.as_deref(), Some("demo_data"));
    }

    #[tokio::test]
    async fn native_schema_maps_into_the_fixed_output_schema() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({
            "cod": 200,
            "name": "Jaipur",
            "main": {"temp": 31.4, "humidity": 40},
            "weather": [{"description": "clear sky"}],
            "wind": {"speed": 2.1}
        });
        server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("units".into(), "metric".into()))
            .with_status(200)
            .with_body(body.to_string())
            .create_async()
            .await;

        let tool = WeatherTool::new(Some("secret".into()))
            .unwrap()
            .with_base_url(server.url());
        let outcome = tool.get_weather("Jaipur").await;

        assert_eq!(
            outcome,
            WeatherOutcome::Report(WeatherReport {
                location: Some("Jaipur".to_string()),
                temperature: Some(31.4),
                description: Some("clear sky".to_string()),
                humidity: Some(40.0),
                wind_speed: Some(2.1),
                source: None,
            })
        );
    }

    #[tokio::test]
    async fn embedded_error_code_becomes_a_typed_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"cod": 404, "message": "city not found"}).to_string())
            .create_async()
            .await;

        let tool = WeatherTool::new(Some("secret".into()))
            .unwrap()
            .with_base_url(server.url());
        let outcome = tool.get_weather("atlantis").await;

        assert_eq!(
            outcome,
            WeatherOutcome::Failure {
                error: "Error fetching weather: city not found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn decode_failure_becomes_a_typed_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let tool = WeatherTool::new(Some("secret".into()))
            .unwrap()
            .with_base_url(server.url());
        let outcome = tool.get_weather("jaipur").await;

        let WeatherOutcome::Failure { error } = outcome else {
            panic!("expected a typed failure");
        };
        assert!(error.starts_with("Error decoding API response:"));
    }
}
