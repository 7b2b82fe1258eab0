//! City model and the raw GeoDB record it is derived from

use crate::config::FlagConfig;
use serde::{Deserialize, Serialize};

/// City as shown to the user. Rebuilt from the API on every fetch.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct City {
    pub city: String,
    /// Country display name
    pub country: String,
    /// Upper-case ISO code, used for ban checks
    pub country_code: String,
    pub region: String,
    pub population: u64,
    /// Flag image URL derived from the country code
    pub flag: String,
}

/// City record as returned by `GET /cities`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoDbCity {
    pub city: String,
    pub country: String,
    pub country_code: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub population: Option<u64>,
}

/// Flag image URL for a country code, e.g. `https://flagcdn.com/w320/fr.png`
#[must_use]
pub fn flag_url(flags: &FlagConfig, country_code: &str) -> String {
    format!(
        "{}/{}/{}.png",
        flags.base_url.trim_end_matches('/'),
        flags.width,
        country_code.to_lowercase()
    )
}

impl City {
    /// Map a raw record into the displayed shape
    #[must_use]
    pub fn from_record(record: GeoDbCity, flags: &FlagConfig) -> Self {
        let flag = flag_url(flags, &record.country_code);
        Self {
            city: record.city,
            country: record.country,
            country_code: record.country_code.to_uppercase(),
            region: record.region.unwrap_or_default(),
            population: record.population.unwrap_or(0),
            flag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARIS: &str = r#"{
        "id": 144571,
        "wikiDataId": "Q90",
        "type": "CITY",
        "city": "Paris",
        "name": "Paris",
        "country": "France",
        "countryCode": "fr",
        "region": "Île-de-France",
        "regionCode": "IDF",
        "latitude": 48.856666666,
        "longitude": 2.352222222,
        "population": 2148271
    }"#;

    #[test]
    fn test_flag_url_is_lowercased() {
        let flags = FlagConfig::default();
        assert_eq!(flag_url(&flags, "FR"), "https://flagcdn.com/w320/fr.png");
    }

    #[test]
    fn test_from_record_derives_flag() {
        let record: GeoDbCity = serde_json::from_str(PARIS).unwrap();
        let city = City::from_record(record, &FlagConfig::default());

        assert_eq!(city.flag, "https://flagcdn.com/w320/fr.png");
        assert_eq!(city.city, "Paris");
        assert_eq!(city.country, "France");
        assert_eq!(city.country_code, "FR");
        assert_eq!(city.region, "Île-de-France");
        assert_eq!(city.population, 2_148_271);
    }

    #[test]
    fn test_custom_flag_template() {
        let flags = FlagConfig {
            base_url: "http://localhost:9000/".to_string(),
            width: "w80".to_string(),
        };
        assert_eq!(flag_url(&flags, "De"), "http://localhost:9000/w80/de.png");
    }

    #[test]
    fn test_missing_country_code_is_malformed() {
        let json = r#"{"city":"Nowhere","country":"Atlantis","region":"Deep"}"#;
        assert!(serde_json::from_str::<GeoDbCity>(json).is_err());
    }

    #[test]
    fn test_missing_population_defaults_to_zero() {
        let json = r#"{"city":"Vaduz","country":"Liechtenstein","countryCode":"LI"}"#;
        let record: GeoDbCity = serde_json::from_str(json).unwrap();
        let city = City::from_record(record, &FlagConfig::default());
        assert_eq!(city.population, 0);
        assert_eq!(city.region, "");
    }
}
