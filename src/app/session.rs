//! Drives [`AppState`] against a [`CatalogProvider`]

use tracing::{error, instrument};

use super::state::{Action, AppState, Effect};
use crate::catalog::CatalogProvider;
use crate::models::City;
use crate::selector::{RandomSource, ThreadRandom};

/// One user's picker: state, catalog source and random source
pub struct Session<P, R = ThreadRandom> {
    provider: P,
    rng: R,
    state: AppState,
}

impl<P: CatalogProvider> Session<P> {
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self::with_state(provider, AppState::new(), ThreadRandom)
    }
}

impl<P, R> Session<P, R>
where
    P: CatalogProvider,
    R: RandomSource,
{
    #[must_use]
    pub fn with_state(provider: P, state: AppState, rng: R) -> Self {
        Self {
            provider,
            rng,
            state,
        }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    #[must_use]
    pub fn current(&self) -> Option<&City> {
        self.state.current()
    }

    /// Fetch the catalog and run the first selection cycle
    pub async fn load(&mut self) {
        self.dispatch(Action::Load).await;
    }

    /// "Find City"
    pub async fn find_city(&mut self) {
        self.dispatch(Action::FindCity).await;
    }

    /// Ban or unban a country by code. Returns `false` if the code is unknown.
    pub async fn toggle_ban_code(&mut self, code: &str) -> bool {
        let action = self.state.toggle_ban_action(code);
        self.dispatch_some(action).await
    }

    /// Ban the country of the displayed city. Returns `false` if nothing is shown.
    pub async fn ban_current(&mut self) -> bool {
        let action = self.state.ban_current_action();
        self.dispatch_some(action).await
    }

    /// Unban by code or name. Returns `false` if no ban matches.
    pub async fn unban(&mut self, query: &str) -> bool {
        let action = self.state.unban_action(query);
        self.dispatch_some(action).await
    }

    /// Apply an action and run every effect it chains into, in order
    pub async fn dispatch(&mut self, action: Action) {
        let mut next = self.state.apply(action, &mut self.rng);
        while let Some(effect) = next {
            if let Some(started) = effect.started() {
                self.state.apply(started, &mut self.rng);
            }
            let outcome = execute(&self.provider, effect).await;
            next = self.state.apply(outcome, &mut self.rng);
        }
    }

    async fn dispatch_some(&mut self, action: Option<Action>) -> bool {
        match action {
            Some(action) => {
                self.dispatch(action).await;
                true
            }
            None => false,
        }
    }
}

/// Perform one effect against the provider and turn its outcome into an action
#[instrument(skip(provider))]
pub(crate) async fn execute<P: CatalogProvider>(provider: &P, effect: Effect) -> Action {
    match effect {
        Effect::FetchCountries => match provider.fetch_countries().await {
            Ok(countries) => Action::CountriesLoaded(countries),
            Err(e) => {
                error!("Error fetching countries: {}", e);
                Action::CountriesFailed(e.to_string())
            }
        },
        Effect::FetchCities {
            cycle,
            country_code,
        } => match provider.fetch_cities(&country_code).await {
            Ok(cities) => Action::CitiesLoaded { cycle, cities },
            Err(e) => {
                error!("Error fetching cities for {}: {}", country_code, e);
                Action::CitiesFailed {
                    cycle,
                    reason: e.to_string(),
                }
            }
        },
    }
}
