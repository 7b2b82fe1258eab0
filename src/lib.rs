//! `TravelWorld` - pick a random city to travel to
//!
//! Fetches the country catalog from the GeoDB API, picks a random country
//! that is not on the session ban list, fetches its cities and picks one of
//! those. The same pipeline backs the terminal shell and the JSON API.

pub mod api;
pub mod app;
pub mod ban_list;
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod render;
pub mod selector;
pub mod shell;
pub mod web;

// Re-export core types for public API
pub use app::{Action, AppState, Effect, Phase, Session, SharedSession};
pub use ban_list::{BanList, BannedCountry};
pub use catalog::{CatalogProvider, GeoDbClient, StaticCatalog};
pub use config::TravelConfig;
pub use error::TravelError;
pub use models::{City, Country};
pub use selector::{RandomSource, SequenceRandom, ThreadRandom, select};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TravelError>;
