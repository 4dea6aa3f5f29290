//! Weather dashboard for Taiwanese cities.
//!
//! Resolves a city from device location, fetches the forecast feed and
//! derives clothing, umbrella and food advice for display, with seasonal
//! theming and decoration.

pub mod advice;
pub mod cities;
pub mod dashboard;
pub mod decoration;
pub mod geocode;
pub mod location;
pub mod provider;
pub mod render;
pub mod resolver;
pub mod theme;
pub mod types;

pub use advice::{advice, day_part, food_advice, is_night, weather_icon, Advice, DayPart, FoodAdvice};
pub use cities::{CityEntry, CityRegistry, RegistryError};
pub use dashboard::{Dashboard, DashboardError, DashboardState};
pub use decoration::{spawn_decoration_loop, DecorationField, Starfield};
pub use geocode::Geocoder;
pub use location::LocationSource;
pub use provider::{ForecastClient, ForecastError};
pub use render::{render_html, render_text, DashboardView};
pub use resolver::{resolve_city, Resolution};
pub use theme::{Theme, ThemeMode};
pub use types::*;
