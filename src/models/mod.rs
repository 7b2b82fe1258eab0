//! Data models for `TravelWorld`
//!
//! - Country: catalog entries the random pick starts from
//! - City: the displayed destination, with its derived flag URL

pub mod city;
pub mod country;

pub use city::{City, GeoDbCity, flag_url};
pub use country::Country;
