//! Country and city catalogs
//!
//! [`CatalogProvider`] is the seam between the selection state machine and
//! the network. [`GeoDbClient`] talks to the GeoDB API; [`StaticCatalog`]
//! serves fixed data from memory.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::FlagConfig;
use crate::models::{City, Country, flag_url};
use crate::{Result, TravelError};

pub mod geodb;

pub use geodb::GeoDbClient;

#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Full country catalog
    async fn fetch_countries(&self) -> Result<Vec<Country>>;
    /// Candidate cities for one country code
    async fn fetch_cities(&self, country_code: &str) -> Result<Vec<City>>;
}

/// In-memory catalog with switchable failure modes
#[derive(Debug, Default)]
pub struct StaticCatalog {
    countries: Vec<Country>,
    cities: HashMap<String, Vec<City>>,
    flags: FlagConfig,
    failing: AtomicBool,
    city_delay_ms: AtomicU64,
    city_requests: AtomicUsize,
}

impl StaticCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a country and its cities as `(city, region, population)` rows
    #[must_use]
    pub fn with_country(mut self, code: &str, name: &str, cities: &[(&str, &str, u64)]) -> Self {
        let code = code.to_uppercase();
        let rows = cities
            .iter()
            .map(|(city, region, population)| City {
                city: (*city).to_string(),
                country: name.to_string(),
                country_code: code.clone(),
                region: (*region).to_string(),
                population: *population,
                flag: flag_url(&self.flags, &code),
            })
            .collect();
        self.countries.push(Country::new(code.clone(), name));
        self.cities.insert(code, rows);
        self
    }

    /// Make every subsequent fetch fail with a network error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Hold every subsequent city fetch for `delay` before answering
    pub fn set_city_delay(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.city_delay_ms.store(millis, Ordering::SeqCst);
    }

    /// Number of city fetches served so far
    #[must_use]
    pub fn city_requests(&self) -> usize {
        self.city_requests.load(Ordering::SeqCst)
    }

    fn check_failing(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(TravelError::network("static catalog is offline"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalog {
    async fn fetch_countries(&self) -> Result<Vec<Country>> {
        self.check_failing()?;
        Ok(self.countries.clone())
    }

    async fn fetch_cities(&self, country_code: &str) -> Result<Vec<City>> {
        self.city_requests.fetch_add(1, Ordering::SeqCst);
        let delay = self.city_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.check_failing()?;
        Ok(self
            .cities
            .get(&country_code.to_uppercase())
            .cloned()
            .unwrap_or_default())
    }
}
