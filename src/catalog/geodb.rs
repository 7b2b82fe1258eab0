//! GeoDB Cities API client (RapidAPI)

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use super::CatalogProvider;
use crate::config::{FlagConfig, TravelConfig};
use crate::models::{City, Country, GeoDbCity};
use crate::{Result, TravelError};

const API_KEY_HEADER: &str = "X-RapidAPI-Key";
const API_HOST_HEADER: &str = "X-RapidAPI-Host";

/// Every GeoDB list endpoint wraps its rows in `{ "data": [...] }`
#[derive(Debug, Deserialize)]
struct GeoDbPage<T> {
    data: Vec<T>,
}

/// HTTP client for the country and city endpoints
pub struct GeoDbClient {
    client: Client,
    base_url: String,
    host: String,
    api_key: Option<String>,
    city_limit: u32,
    flags: FlagConfig,
}

impl GeoDbClient {
    /// Create a new client from the loaded configuration
    pub fn new(config: &TravelConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.geodb.timeout_seconds.into()))
            .user_agent(concat!("TravelWorld/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TravelError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.geodb.base_url.trim_end_matches('/').to_string(),
            host: config.geodb.host.clone(),
            api_key: config.geodb.api_key.clone(),
            city_limit: config.geodb.city_limit,
            flags: config.flags.clone(),
        })
    }

    fn countries_url(&self) -> String {
        format!("{}/countries", self.base_url)
    }

    fn cities_url(&self, country_code: &str) -> String {
        format!(
            "{}/cities?countryIds={}&limit={}",
            self.base_url,
            urlencoding::encode(country_code),
            self.city_limit
        )
    }

    fn request(&self, url: &str) -> RequestBuilder {
        let mut request = self.client.get(url).header(API_HOST_HEADER, &self.host);
        if let Some(api_key) = &self.api_key {
            request = request.header(API_KEY_HEADER, api_key);
        }
        request
    }

    /// GET a list endpoint and unwrap its `data` array
    async fn get_page<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        debug!("GeoDB request URL: {}", url);
        let start = Instant::now();

        let response = self
            .request(url)
            .send()
            .await
            .map_err(|e| TravelError::network(format!("GeoDB request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => TravelError::authentication(format!(
                    "GeoDB rejected the API key ({status})"
                )),
                429 => TravelError::rate_limit("GeoDB rate limit exceeded"),
                code => TravelError::api(code, error_text),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TravelError::network(format!("Failed to read GeoDB response: {e}")))?;
        let page: GeoDbPage<T> = serde_json::from_str(&body)
            .map_err(|e| TravelError::parse(format!("Unexpected GeoDB response: {e}")))?;

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 5 {
            warn!("Slow GeoDB response: {:.3}s", elapsed.as_secs_f64());
        }

        Ok(page.data)
    }
}

#[async_trait]
impl CatalogProvider for GeoDbClient {
    #[instrument(skip(self))]
    async fn fetch_countries(&self) -> Result<Vec<Country>> {
        let countries: Vec<Country> = self.get_page(&self.countries_url()).await?;
        info!("Fetched {} countries", countries.len());
        Ok(countries)
    }

    #[instrument(skip(self))]
    async fn fetch_cities(&self, country_code: &str) -> Result<Vec<City>> {
        let records: Vec<GeoDbCity> = self.get_page(&self.cities_url(country_code)).await?;
        let cities: Vec<City> = records
            .into_iter()
            .map(|record| City::from_record(record, &self.flags))
            .collect();
        info!("Fetched {} cities for {}", cities.len(), country_code);
        Ok(cities)
    }
}
