use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub mongodb_collection: String,
    pub openai_api_key: Option<String>,
    pub serpapi_key: Option<String>,
    pub google_api_key: Option<String>,
    pub google_cse_id: Option<String>,
    pub openweather_api_key: Option<String>,
}

impl Config {
    /// Loads configuration from the environment (and `.env` if present).
    ///
    /// The persistence settings are required; every API key is optional.
    /// A missing search or weather key switches that tool into its
    /// demo-data mode instead of failing startup.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid port number")?,
            mongodb_uri: std::env::var("MONGODB_URI")
                .context("MONGODB_URI must be set")?,
            mongodb_db: std::env::var("MONGODB_DB")
                .context("MONGODB_DB must be set")?,
            mongodb_collection: std::env::var("MONGODB_COLLECTION")
                .context("MONGODB_COLLECTION must be set")?,
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            serpapi_key: std::env::var("SERPAPI_KEY").ok(),
            google_api_key: std::env::var("GOOGLE_API_KEY").ok(),
            google_cse_id: std::env::var("GOOGLE_CSE_ID").ok(),
            openweather_api_key: std::env::var("OPENWEATHER_API_KEY").ok(),
        })
    }
}
