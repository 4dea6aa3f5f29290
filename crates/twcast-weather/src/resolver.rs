//! Turn device coordinates into a city slug.
//!
//! Best effort: every path ends with some city selected.

use crate::cities::{CityEntry, CityRegistry};
use crate::geocode::Geocoder;
use crate::location::LocationSource;
use crate::types::LocationError;
use twcast_core::{location_denied_notice, WeatherError};

/// English administrative names Nominatim commonly returns for the big cities.
const ENGLISH_FALLBACK: &[(&str, &str)] = &[
    ("Taipei", "臺北市"),
    ("New Taipei", "新北市"),
    ("Taoyuan", "桃園市"),
    ("Taichung", "臺中市"),
    ("Tainan", "臺南市"),
    ("Kaohsiung", "高雄市"),
];

/// Outcome of city resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub slug: String,
    /// Message to show the user once, if any
    pub notice: Option<String>,
}

impl Resolution {
    fn silent(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            notice: None,
        }
    }
}

/// Map a geocoded area name to a slug: registry match, then the English
/// fallback table, then the default city.
pub fn resolve_county(registry: &CityRegistry, county: &str, default: &CityEntry) -> String {
    if let Some(slug) = registry.slug_for(county) {
        return slug.to_string();
    }

    let display_name = ENGLISH_FALLBACK
        .iter()
        .find(|(english, _)| *english == county)
        .map(|(_, chinese)| *chinese)
        .unwrap_or(default.display_name.as_str());

    match registry.slug_for(display_name) {
        Some(slug) => slug.to_string(),
        None => {
            tracing::warn!("No city matches {:?}, using {}", county, default.slug);
            default.slug.clone()
        }
    }
}

/// Resolve the city to show on start-up.
pub async fn resolve_city(
    source: &LocationSource,
    geocoder: &Geocoder,
    registry: &CityRegistry,
    default: &CityEntry,
) -> Resolution {
    let location = match source.current_location().await {
        Ok(location) => location,
        Err(LocationError::PermissionDenied) => {
            tracing::info!("Location denied, showing {}", default.slug);
            let short_name = default.display_name.trim_end_matches(['市', '縣']);
            return Resolution {
                slug: default.slug.clone(),
                notice: Some(location_denied_notice(short_name)),
            };
        }
        Err(e) => {
            let err = WeatherError::from(e);
            tracing::info!("{}, showing {}", err, default.slug);
            return Resolution::silent(&default.slug);
        }
    };

    match geocoder.reverse(&location).await {
        Ok(county) => {
            let slug = resolve_county(registry, &county, default);
            tracing::info!("Resolved {:?} to {}", county, slug);
            Resolution::silent(&slug)
        }
        Err(e) => {
            let err = WeatherError::GeocodeFailure(e.to_string());
            tracing::warn!("{}, showing {}", err, default.slug);
            Resolution::silent(&default.slug)
        }
    }
}
