use crate::traits::{Tool, ToolName};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com/v1";

const MISSING_CITY: &str = "City name is required";
const NO_READING: &str = "N/A";
const UNAVAILABLE: &str = "Weather unavailable";

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    current: Option<Current>,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: Option<f64>,
}

/// Current-temperature lookup against the weather API.
///
/// Every failure mode collapses into a sentinel observation string; the
/// model interprets "Weather unavailable" as data, so this tool never
/// surfaces an error to the loop.
pub struct WeatherTool {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl WeatherTool {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_temp_c(&self, city: &str) -> anyhow::Result<Option<f64>> {
        let response = self
            .client
            .get(format!("{}/current.json", self.base_url))
            .query(&[("key", self.api_key.as_str()), ("q", city)])
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("weather API returned {}", response.status());
        }

        let conditions: CurrentConditions = response.json().await?;
        Ok(conditions.current.and_then(|c| c.temp_c))
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> ToolName {
        ToolName::CurrentWeather
    }

    fn description(&self) -> &str {
        "Accepts a city name and returns the current temperature of that city"
    }

    async fn invoke(&self, input: &str) -> String {
        let city = input.trim();
        if city.is_empty() {
            return MISSING_CITY.to_string();
        }

        match self.fetch_temp_c(city).await {
            Ok(Some(temp_c)) => format!("{}°C", temp_c),
            Ok(None) => NO_READING.to_string(),
            Err(e) => {
                warn!(city, error = %e, "weather fetch failed");
                UNAVAILABLE.to_string()
            }
        }
    }
}
