//! A session shared between concurrent callers
//!
//! The state lock is held only while an action is applied. Provider calls
//! run with the lock released, so readers see the in-between phases and a
//! slow fetch never blocks them. Results of superseded cycles are dropped by
//! [`AppState::apply`].

use std::sync::Arc;

use tokio::sync::Mutex;

use super::session::execute;
use super::state::{Action, AppState, Effect};
use crate::catalog::CatalogProvider;
use crate::selector::{RandomSource, ThreadRandom};

struct Core<R> {
    state: AppState,
    rng: R,
}

/// Cloneable handle to one picker, used by the HTTP API
pub struct SharedSession<P, R = ThreadRandom> {
    provider: Arc<P>,
    core: Arc<Mutex<Core<R>>>,
}

impl<P, R> Clone for SharedSession<P, R> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            core: Arc::clone(&self.core),
        }
    }
}

impl<P: CatalogProvider> SharedSession<P> {
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self::with_state(provider, AppState::new(), ThreadRandom)
    }
}

impl<P, R> SharedSession<P, R>
where
    P: CatalogProvider,
    R: RandomSource + Send,
{
    #[must_use]
    pub fn with_state(provider: P, state: AppState, rng: R) -> Self {
        Self {
            provider: Arc::new(provider),
            core: Arc::new(Mutex::new(Core { state, rng })),
        }
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Read the current state under the lock
    pub async fn view<T>(&self, f: impl FnOnce(&AppState) -> T) -> T {
        let core = self.core.lock().await;
        f(&core.state)
    }

    pub async fn snapshot(&self) -> AppState {
        self.view(AppState::clone).await
    }

    pub async fn load(&self) {
        self.dispatch(Action::Load).await;
    }

    pub async fn find_city(&self) {
        self.dispatch(Action::FindCity).await;
    }

    /// Ban or unban a country by code. Returns `false` if the code is unknown.
    pub async fn toggle_ban_code(&self, code: &str) -> bool {
        match self.view(|state| state.toggle_ban_action(code)).await {
            Some(action) => {
                self.dispatch(action).await;
                true
            }
            None => false,
        }
    }

    /// Apply an action and run its effects, releasing the lock around each fetch
    pub async fn dispatch(&self, action: Action) {
        let mut next = self.apply(action).await;
        while let Some(effect) = next {
            if let Some(started) = effect.started() {
                self.apply(started).await;
            }
            let outcome = execute(self.provider.as_ref(), effect).await;
            next = self.apply(outcome).await;
        }
    }

    async fn apply(&self, action: Action) -> Option<Effect> {
        let mut core = self.core.lock().await;
        let Core { state, rng } = &mut *core;
        state.apply(action, rng)
    }
}
