//! Selection state machine
//!
//! [`AppState::apply`] is the single place where state changes. It takes an
//! [`Action`] (a user command or a fetch completion) and may return an
//! [`Effect`] describing network work the caller must perform and report
//! back as another action.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::ban_list::{BanList, BannedCountry};
use crate::models::{City, Country};
use crate::selector::{RandomSource, select};

/// Stage of the current selection cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum Phase {
    Idle,
    CountriesLoading,
    CountryChosen { code: String, name: String },
    CitiesLoading { code: String, name: String },
    CitySelected,
    NoCitiesAvailable,
}

/// Inputs to the state machine
#[derive(Debug, Clone)]
pub enum Action {
    /// Initial load, or reload after the catalog fetch failed
    Load,
    /// "Find City"
    FindCity,
    /// Ban or unban a country
    ToggleBan(BannedCountry),
    CountriesLoaded(Vec<Country>),
    CountriesFailed(String),
    /// The city fetch for `cycle` has been sent
    CitiesRequested { cycle: u64 },
    CitiesLoaded { cycle: u64, cities: Vec<City> },
    CitiesFailed { cycle: u64, reason: String },
}

/// Network work requested by the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchCountries,
    FetchCities { cycle: u64, country_code: String },
}

impl Effect {
    /// Action to apply once the request has gone out, if any
    #[must_use]
    pub fn started(&self) -> Option<Action> {
        match self {
            Effect::FetchCountries => None,
            Effect::FetchCities { cycle, .. } => Some(Action::CitiesRequested { cycle: *cycle }),
        }
    }
}

/// Whole application state for one session
#[derive(Debug, Clone)]
pub struct AppState {
    countries: Vec<Country>,
    catalog_loaded: bool,
    cities: Vec<City>,
    current: Option<City>,
    banned: BanList,
    phase: Phase,
    cycle: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            countries: Vec::new(),
            catalog_loaded: false,
            cities: Vec::new(),
            current: None,
            banned: BanList::new(),
            phase: Phase::Idle,
            cycle: 0,
        }
    }
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with bans already in place, e.g. from the command line
    #[must_use]
    pub fn with_bans(bans: impl IntoIterator<Item = BannedCountry>) -> Self {
        let mut state = Self::default();
        for entry in bans {
            if !state.banned.contains_code(&entry.code) {
                state.banned.toggle(entry);
            }
        }
        state
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub fn current(&self) -> Option<&City> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    #[must_use]
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    #[must_use]
    pub fn banned(&self) -> &BanList {
        &self.banned
    }

    #[must_use]
    pub fn catalog_loaded(&self) -> bool {
        self.catalog_loaded
    }

    /// Ticket of the most recent selection cycle
    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Find a country name for a code in the catalog, ban list or display
    #[must_use]
    pub fn country_name(&self, code: &str) -> Option<String> {
        self.countries
            .iter()
            .find(|c| c.has_code(code))
            .map(|c| c.name.clone())
            .or_else(|| self.banned.find(code).map(|b| b.name.clone()))
            .or_else(|| {
                self.current
                    .as_ref()
                    .filter(|city| city.country_code.eq_ignore_ascii_case(code))
                    .map(|city| city.country.clone())
            })
    }

    /// Toggle for a known country code
    #[must_use]
    pub fn toggle_ban_action(&self, code: &str) -> Option<Action> {
        self.country_name(code)
            .map(|name| Action::ToggleBan(BannedCountry::new(code, name)))
    }

    /// Ban for the country of the displayed city
    #[must_use]
    pub fn ban_current_action(&self) -> Option<Action> {
        self.current.as_ref().map(|city| {
            Action::ToggleBan(BannedCountry::new(city.country_code.clone(), city.country.clone()))
        })
    }

    /// Unban for the entry matching a code or name
    #[must_use]
    pub fn unban_action(&self, query: &str) -> Option<Action> {
        self.banned.find(query).cloned().map(Action::ToggleBan)
    }

    /// Feed one action through the state machine
    pub fn apply<R>(&mut self, action: Action, rng: &mut R) -> Option<Effect>
    where
        R: RandomSource + ?Sized,
    {
        match action {
            Action::Load => {
                self.phase = Phase::CountriesLoading;
                Some(Effect::FetchCountries)
            }
            Action::FindCity => {
                if self.catalog_loaded {
                    self.start_cycle(rng)
                } else {
                    debug!("Country catalog not loaded yet, fetching it first");
                    self.phase = Phase::CountriesLoading;
                    Some(Effect::FetchCountries)
                }
            }
            Action::ToggleBan(entry) => {
                let code = entry.code.clone();
                let now_banned = self.banned.toggle(entry);
                info!(code = %code, banned = now_banned, "Toggled ban");

                if now_banned
                    && self
                        .current
                        .as_ref()
                        .is_some_and(|city| city.country_code.eq_ignore_ascii_case(&code))
                {
                    self.current = None;
                }

                if self.catalog_loaded {
                    self.start_cycle(rng)
                } else {
                    None
                }
            }
            Action::CountriesLoaded(countries) => {
                info!("Country catalog loaded with {} entries", countries.len());
                for country in &countries {
                    if self.banned.contains_code(&country.code) {
                        self.banned.rename(&country.code, &country.name);
                    }
                }
                self.countries = countries;
                self.catalog_loaded = true;
                self.start_cycle(rng)
            }
            Action::CountriesFailed(reason) => {
                warn!("Country catalog unavailable: {}", reason);
                self.settle();
                None
            }
            Action::CitiesRequested { cycle } => {
                if cycle == self.cycle {
                    if let Phase::CountryChosen { code, name } = self.phase.clone() {
                        self.phase = Phase::CitiesLoading { code, name };
                    }
                }
                None
            }
            Action::CitiesLoaded { cycle, cities } => {
                if cycle != self.cycle {
                    debug!(cycle, current = self.cycle, "Dropping stale city result");
                    return None;
                }
                self.cities = cities;
                let picked = select(
                    &self.cities,
                    |city| self.banned.contains_code(&city.country_code),
                    rng,
                )
                .cloned();
                match picked {
                    Some(city) => {
                        info!("Selected {} ({})", city.city, city.country);
                        self.current = Some(city);
                        self.phase = Phase::CitySelected;
                    }
                    None => {
                        info!("No unbanned cities in the fetched list");
                        self.current = None;
                        self.phase = Phase::NoCitiesAvailable;
                    }
                }
                None
            }
            Action::CitiesFailed { cycle, reason } => {
                if cycle == self.cycle {
                    warn!("City list unavailable: {}", reason);
                    self.settle();
                }
                None
            }
        }
    }

    /// Pick a random unbanned country and ask for its cities
    fn start_cycle<R>(&mut self, rng: &mut R) -> Option<Effect>
    where
        R: RandomSource + ?Sized,
    {
        self.cycle += 1;
        let chosen = select(
            &self.countries,
            |country| self.banned.contains_code(&country.code),
            rng,
        )
        .cloned();

        match chosen {
            Some(country) => {
                debug!(cycle = self.cycle, "Chose {} ({})", country.name, country.code);
                self.phase = Phase::CountryChosen {
                    code: country.code.clone(),
                    name: country.name,
                };
                Some(Effect::FetchCities {
                    cycle: self.cycle,
                    country_code: country.code,
                })
            }
            None => {
                info!("Every country is banned");
                self.current = None;
                self.phase = Phase::NoCitiesAvailable;
                None
            }
        }
    }

    /// Leave the display as it was after a failed fetch
    fn settle(&mut self) {
        self.phase = if self.current.is_some() {
            Phase::CitySelected
        } else {
            Phase::Idle
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FlagConfig;
    use crate::models::flag_url;
    use crate::selector::SequenceRandom;

    fn catalog() -> Vec<Country> {
        vec![
            Country::new("US", "United States"),
            Country::new("FR", "France"),
            Country::new("JP", "Japan"),
        ]
    }

    fn city(name: &str, country: &str, code: &str) -> City {
        City {
            city: name.to_string(),
            country: country.to_string(),
            country_code: code.to_string(),
            region: "Somewhere".to_string(),
            population: 1000,
            flag: flag_url(&FlagConfig::default(), code),
        }
    }

    fn loaded(rng: &mut SequenceRandom) -> (AppState, Effect) {
        let mut state = AppState::new();
        assert_eq!(state.apply(Action::Load, rng), Some(Effect::FetchCountries));
        let effect = state.apply(Action::CountriesLoaded(catalog()), rng).unwrap();
        (state, effect)
    }

    #[test]
    fn test_load_flows_into_city_selection() {
        let mut rng = SequenceRandom::new(vec![0.5]);
        let mut state = AppState::new();

        assert_eq!(state.apply(Action::Load, &mut rng), Some(Effect::FetchCountries));
        assert_eq!(state.phase(), &Phase::CountriesLoading);

        let effect = state.apply(Action::CountriesLoaded(catalog()), &mut rng);
        assert_eq!(
            effect,
            Some(Effect::FetchCities {
                cycle: 1,
                country_code: "FR".to_string()
            })
        );
        assert!(matches!(state.phase(), Phase::CountryChosen { code, .. } if code == "FR"));

        state.apply(Action::CitiesRequested { cycle: 1 }, &mut rng);
        assert!(matches!(state.phase(), Phase::CitiesLoading { .. }));

        let cities = vec![city("Paris", "France", "FR"), city("Lyon", "France", "FR")];
        assert_eq!(
            state.apply(Action::CitiesLoaded { cycle: 1, cities }, &mut rng),
            None
        );
        assert_eq!(state.phase(), &Phase::CitySelected);
        assert_eq!(state.current().map(|c| c.city.as_str()), Some("Lyon"));
    }

    #[test]
    fn test_banned_us_leaves_france() {
        let mut rng = SequenceRandom::new(vec![0.0, 0.99]);
        let mut state = AppState::with_bans([BannedCountry::new("US", "United States")]);
        state.apply(Action::Load, &mut rng);
        let effect = state.apply(
            Action::CountriesLoaded(vec![
                Country::new("US", "United States"),
                Country::new("FR", "France"),
            ]),
            &mut rng,
        );
        assert_eq!(
            effect,
            Some(Effect::FetchCities {
                cycle: 1,
                country_code: "FR".to_string()
            })
        );
    }

    #[test]
    fn test_everything_banned_means_no_cities() {
        let mut rng = SequenceRandom::new(vec![0.3]);
        let bans = catalog()
            .into_iter()
            .map(|c| BannedCountry::new(c.code, c.name));
        let mut state = AppState::with_bans(bans);
        state.apply(Action::Load, &mut rng);

        let effect = state.apply(Action::CountriesLoaded(catalog()), &mut rng);
        assert_eq!(effect, None);
        assert_eq!(state.phase(), &Phase::NoCitiesAvailable);
        assert!(state.current().is_none());
    }

    #[test]
    fn test_city_list_without_unbanned_entries() {
        let mut rng = SequenceRandom::new(vec![0.0]);
        let (mut state, _) = loaded(&mut rng);
        state.apply(Action::CitiesLoaded { cycle: 1, cities: vec![] }, &mut rng);
        assert_eq!(state.phase(), &Phase::NoCitiesAvailable);
        assert!(state.current().is_none());
    }

    #[test]
    fn test_ban_current_clears_display_and_restarts() {
        let mut rng = SequenceRandom::new(vec![0.0]);
        let (mut state, effect) = loaded(&mut rng);
        assert_eq!(
            effect,
            Effect::FetchCities {
                cycle: 1,
                country_code: "US".to_string()
            }
        );
        state.apply(
            Action::CitiesLoaded {
                cycle: 1,
                cities: vec![city("Boston", "United States", "US")],
            },
            &mut rng,
        );
        assert_eq!(state.current().map(|c| c.country.as_str()), Some("United States"));

        let effect = state.apply(
            Action::ToggleBan(BannedCountry::new("US", "United States")),
            &mut rng,
        );
        assert!(state.current().is_none());
        assert_eq!(
            effect,
            Some(Effect::FetchCities {
                cycle: 2,
                country_code: "FR".to_string()
            })
        );
    }

    #[test]
    fn test_unban_restarts_cycle() {
        let mut rng = SequenceRandom::new(vec![0.0]);
        let (mut state, _) = loaded(&mut rng);
        let us = BannedCountry::new("US", "United States");
        state.apply(Action::ToggleBan(us.clone()), &mut rng);
        let effect = state.apply(Action::ToggleBan(us), &mut rng);

        assert!(state.banned().is_empty());
        assert_eq!(
            effect,
            Some(Effect::FetchCities {
                cycle: 3,
                country_code: "US".to_string()
            })
        );
    }

    #[test]
    fn test_stale_city_result_is_ignored() {
        let mut rng = SequenceRandom::new(vec![0.0]);
        let (mut state, _) = loaded(&mut rng);
        // Second trigger before the first city fetch resolves.
        state.apply(Action::FindCity, &mut rng);
        assert_eq!(state.cycle(), 2);

        state.apply(
            Action::CitiesLoaded {
                cycle: 2,
                cities: vec![city("Osaka", "Japan", "JP")],
            },
            &mut rng,
        );
        state.apply(
            Action::CitiesLoaded {
                cycle: 1,
                cities: vec![city("Denver", "United States", "US")],
            },
            &mut rng,
        );
        assert_eq!(state.current().map(|c| c.city.as_str()), Some("Osaka"));

        state.apply(
            Action::CitiesFailed {
                cycle: 1,
                reason: "late timeout".to_string(),
            },
            &mut rng,
        );
        assert_eq!(state.phase(), &Phase::CitySelected);
    }

    #[test]
    fn test_failures_leave_previous_display() {
        let mut rng = SequenceRandom::new(vec![0.0]);
        let (mut state, _) = loaded(&mut rng);
        state.apply(
            Action::CitiesLoaded {
                cycle: 1,
                cities: vec![city("Boston", "United States", "US")],
            },
            &mut rng,
        );

        state.apply(Action::FindCity, &mut rng);
        state.apply(
            Action::CitiesFailed {
                cycle: 2,
                reason: "connection reset".to_string(),
            },
            &mut rng,
        );
        assert_eq!(state.phase(), &Phase::CitySelected);
        assert_eq!(state.current().map(|c| c.city.as_str()), Some("Boston"));
    }

    #[test]
    fn test_find_without_catalog_refetches_countries() {
        let mut rng = SequenceRandom::new(vec![0.0]);
        let mut state = AppState::new();
        state.apply(Action::Load, &mut rng);
        state.apply(Action::CountriesFailed("401".to_string()), &mut rng);
        assert_eq!(state.phase(), &Phase::Idle);

        assert_eq!(state.apply(Action::FindCity, &mut rng), Some(Effect::FetchCountries));
    }

    #[test]
    fn test_preseeded_ban_names_follow_catalog() {
        let mut rng = SequenceRandom::new(vec![0.0]);
        let mut state = AppState::with_bans([BannedCountry::new("jp", "JP")]);
        state.apply(Action::CountriesLoaded(catalog()), &mut rng);
        assert_eq!(state.banned().find("JP").map(|b| b.name.as_str()), Some("Japan"));
        assert_eq!(state.country_name("jp").as_deref(), Some("Japan"));
    }

    #[test]
    fn test_effect_started_and_ban_actions() {
        let mut rng = SequenceRandom::new(vec![0.5]);
        let (mut state, effect) = loaded(&mut rng);
        assert!(Effect::FetchCountries.started().is_none());
        let started = effect.started().unwrap();
        assert!(matches!(started, Action::CitiesRequested { cycle: 1 }));
        state.apply(started, &mut rng);
        assert!(matches!(state.phase(), Phase::CitiesLoading { .. }));

        assert!(state.toggle_ban_action("ZZ").is_none());
        assert!(state.ban_current_action().is_none());
        let ban = state.toggle_ban_action("jp").unwrap();
        state.apply(ban, &mut rng);
        assert!(state.unban_action("Japan").is_some());
        assert!(state.unban_action("France").is_none());
    }
}
