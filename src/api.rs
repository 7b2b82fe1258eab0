use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::app::{AppState, Phase, SharedSession};
use crate::ban_list::BanList;
use crate::catalog::CatalogProvider;
use crate::models::City;
use crate::render::NO_CITIES_MESSAGE;

#[derive(Debug, Serialize)]
pub struct SelectionView {
    pub phase: Phase,
    pub city: Option<City>,
    pub banned: BanList,
    /// Set when there is nothing to show
    pub message: Option<&'static str>,
    pub generated_at: DateTime<Utc>,
}

impl From<&AppState> for SelectionView {
    fn from(state: &AppState) -> Self {
        let city = state.current().cloned();
        Self {
            phase: state.phase().clone(),
            message: city.is_none().then_some(NO_CITIES_MESSAGE),
            city,
            banned: state.banned().clone(),
            generated_at: Utc::now(),
        }
    }
}

pub fn router<P: CatalogProvider + 'static>(session: SharedSession<P>) -> Router {
    Router::new()
        .route("/selection", get(get_selection::<P>))
        .route("/find", post(find_city::<P>))
        .route("/bans/{code}", post(toggle_ban::<P>))
        .with_state(session)
}

async fn get_selection<P: CatalogProvider>(
    State(session): State<SharedSession<P>>,
) -> Json<SelectionView> {
    Json(session.view(|state| SelectionView::from(state)).await)
}

async fn find_city<P: CatalogProvider>(
    State(session): State<SharedSession<P>>,
) -> Json<SelectionView> {
    session.find_city().await;
    Json(session.view(|state| SelectionView::from(state)).await)
}

async fn toggle_ban<P: CatalogProvider>(
    State(session): State<SharedSession<P>>,
    Path(code): Path<String>,
) -> Result<Json<SelectionView>, StatusCode> {
    if !session.toggle_ban_code(&code).await {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(session.view(|state| SelectionView::from(state)).await))
}
