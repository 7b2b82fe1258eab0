//! Plain-text rendering of the selection and the ban list

use num_format::{Locale, ToFormattedString};

use crate::app::AppState;
use crate::ban_list::BanList;
use crate::models::City;

/// Shown whenever there is no selection
pub const NO_CITIES_MESSAGE: &str = "No cities available";

/// `2148271` -> `2,148,271`
#[must_use]
pub fn format_population(population: u64) -> String {
    population.to_formatted_string(&Locale::en)
}

#[must_use]
pub fn render_city(city: &City) -> String {
    [
        format!("🏳️  {}", city.flag),
        city.city.clone(),
        format!("   Country: {}", city.country),
        format!("   Region: {}", city.region),
        format!("   Population: {}", format_population(city.population)),
    ]
    .join("\n")
}

/// The current city, or the no-cities message
#[must_use]
pub fn render_selection(state: &AppState) -> String {
    state
        .current()
        .map_or_else(|| NO_CITIES_MESSAGE.to_string(), render_city)
}

#[must_use]
pub fn render_ban_list(bans: &BanList) -> String {
    if bans.is_empty() {
        return "Ban list is empty".to_string();
    }
    let mut lines = vec!["Ban list (unban <name> to remove):".to_string()];
    lines.extend(
        bans.iter()
            .map(|entry| format!("   {} ({}) ❌", entry.name, entry.code)),
    );
    lines.join("\n")
}
