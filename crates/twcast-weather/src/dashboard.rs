//! Dashboard controller: owns the clients, the registry and everything that
//! lives across renders (theme, starfield, current view).

use chrono::{NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cities::{CityEntry, CityRegistry, RegistryError};
use crate::decoration::Starfield;
use crate::geocode::{GeocodeError, Geocoder};
use crate::location::LocationSource;
use crate::provider::{ForecastClient, ForecastError};
use crate::render::{Background, DashboardView, RenderError};
use crate::resolver::{resolve_city, Resolution};
use crate::theme::Theme;
use crate::types::taiwan_now;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("City registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("Unknown city: {0}")]
    UnknownCity(String),
    #[error("Geocoder setup failed: {0}")]
    Geocode(#[from] GeocodeError),
    #[error(transparent)]
    Forecast(#[from] ForecastError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl DashboardError {
    /// True for failures that surface as the forecast alert.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Forecast(_) | Self::Render(_))
    }
}

impl From<DashboardError> for twcast_core::WeatherError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::Forecast(e) => e.into(),
            DashboardError::Render(e) => Self::ForecastFetchFailure(e.to_string()),
            DashboardError::UnknownCity(city) => Self::UnknownCity(city),
            DashboardError::Geocode(e) => Self::GeocodeFailure(e.to_string()),
            DashboardError::Registry(e) => Self::UnknownCity(e.to_string()),
        }
    }
}

/// Either still loading, or fully rendered. Never anything in between.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardState {
    Loading,
    Rendered(DashboardView),
}

pub struct Dashboard {
    registry: CityRegistry,
    default_city: CityEntry,
    forecast: ForecastClient,
    geocoder: Geocoder,
    theme: Theme,
    starfield: Starfield,
    state: DashboardState,
    rng: StdRng,
}

impl Dashboard {
    /// Build a dashboard from configuration; the theme is fixed from `today`.
    pub fn new(config: &twcast_core::Config, today: NaiveDate) -> Result<Self, DashboardError> {
        let registry = CityRegistry::taiwan()?;
        let default_city = registry
            .lookup(&config.weather.default_city)
            .cloned()
            .ok_or_else(|| DashboardError::UnknownCity(config.weather.default_city.clone()))?;

        Ok(Self {
            forecast: ForecastClient::new(&config.weather.forecast_url)?,
            geocoder: Geocoder::new(&config.weather.geocode_url)?,
            theme: Theme::for_date(today),
            starfield: Starfield::new(config.decoration.star_count),
            state: DashboardState::Loading,
            rng: StdRng::from_os_rng(),
            registry,
            default_city,
        })
    }

    pub fn registry(&self) -> &CityRegistry {
        &self.registry
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    /// Pick the start-up city from the device location. Never fails.
    pub async fn resolve(&self, source: &LocationSource) -> Resolution {
        resolve_city(source, &self.geocoder, &self.registry, &self.default_city).await
    }

    /// Fetch and render a city given by display name or slug.
    pub async fn select_city(&mut self, input: &str) -> Result<DashboardView, DashboardError> {
        self.select_city_at(input, taiwan_now()).await
    }

    /// As [`Self::select_city`], with an explicit Taiwan-local "now".
    ///
    /// On failure the previous state is left untouched.
    pub async fn select_city_at(
        &mut self,
        input: &str,
        now: NaiveDateTime,
    ) -> Result<DashboardView, DashboardError> {
        let city = self
            .registry
            .lookup(input)
            .ok_or_else(|| DashboardError::UnknownCity(input.to_string()))?;

        tracing::info!("Loading forecast for {} ({})", city.display_name, city.slug);
        let data = self.forecast.fetch_forecast(&city.slug).await?;
        let view = DashboardView::build(city, &data, self.theme, now, &mut self.rng)?;

        if view.background == Background::Night {
            self.starfield.generate(&mut self.rng);
        } else {
            self.starfield.clear();
        }

        self.state = DashboardState::Rendered(view.clone());
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeMode;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> twcast_core::Config {
        let mut config = twcast_core::Config::default();
        config.weather.forecast_url = server.uri();
        config.weather.geocode_url = format!("{}/reverse", server.uri());
        config.decoration.star_count = 10;
        config
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 20).unwrap()
    }

    fn now(time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("2025-12-20 {time}"), "%Y-%m-%d %H:%M").unwrap()
    }

    async fn mount_forecast(server: &MockServer, slug: &str, start: &str, weather: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/api/weather/{slug}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": {"forecasts": [
                    {"startTime": start, "weather": weather, "minTemp": "20", "maxTemp": "26", "rain": "10%"},
                    {"startTime": "2025-12-21 06:00:00", "weather": "晴", "minTemp": "19", "maxTemp": "25", "rain": "0%"}
                ]}
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_new_rejects_unknown_default_city() {
        let mut config = twcast_core::Config::default();
        config.weather.default_city = "tokyo".into();
        let result = Dashboard::new(&config, today());
        assert!(matches!(result, Err(DashboardError::UnknownCity(c)) if c == "tokyo"));
    }

    #[tokio::test]
    async fn test_theme_fixed_from_date() {
        let dashboard = Dashboard::new(&twcast_core::Config::default(), today()).unwrap();
        assert_eq!(dashboard.theme().mode, ThemeMode::Christmas);
        assert_eq!(dashboard.state(), &DashboardState::Loading);
    }

    #[tokio::test]
    async fn test_select_city_renders() {
        let server = MockServer::start().await;
        mount_forecast(&server, "tainan", "2025-12-20 12:00:00", "多雲").await;

        let mut dashboard = Dashboard::new(&config_for(&server), today()).unwrap();
        let view = dashboard.select_city_at("臺南市", now("12:10")).await.unwrap();

        assert_eq!(view.slug, "tainan");
        assert_eq!(view.background, Background::Cloudy);
        assert_eq!(view.upcoming[0].label, "明天早晨");
        assert!(dashboard.starfield().is_empty());
        assert!(matches!(dashboard.state(), DashboardState::Rendered(_)));
    }

    #[tokio::test]
    async fn test_night_render_generates_stars() {
        let server = MockServer::start().await;
        mount_forecast(&server, "keelung", "2025-12-20 18:00:00", "陰").await;

        let mut dashboard = Dashboard::new(&config_for(&server), today()).unwrap();
        let view = dashboard.select_city_at("keelung", now("18:05")).await.unwrap();

        assert_eq!(view.background, Background::Night);
        assert_eq!(dashboard.starfield().stars().len(), 10);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_view() {
        let server = MockServer::start().await;
        mount_forecast(&server, "tainan", "2025-12-20 12:00:00", "多雲").await;
        Mock::given(method("GET"))
            .and(path("/api/weather/taipei"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false
            })))
            .mount(&server)
            .await;

        let mut dashboard = Dashboard::new(&config_for(&server), today()).unwrap();
        dashboard.select_city_at("tainan", now("12:10")).await.unwrap();

        let err = dashboard.select_city_at("taipei", now("12:11")).await.unwrap_err();
        assert!(err.is_fetch_failure());

        assert!(
            matches!(dashboard.state(), DashboardState::Rendered(view) if view.slug == "tainan"),
            "previous view was discarded"
        );
    }

    #[tokio::test]
    async fn test_unknown_city() {
        let dashboard_config = twcast_core::Config::default();
        let mut dashboard = Dashboard::new(&dashboard_config, today()).unwrap();
        let err = dashboard.select_city("osaka").await.unwrap_err();
        assert!(matches!(err, DashboardError::UnknownCity(_)));
        assert!(!err.is_fetch_failure());
    }

    #[tokio::test]
    async fn test_resolve_via_geocoder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "address": {"county": "Kaohsiung"}
            })))
            .mount(&server)
            .await;

        let dashboard = Dashboard::new(&config_for(&server), today()).unwrap();
        let source = LocationSource::Fixed(crate::types::Location {
            latitude: 22.63,
            longitude: 120.30,
        });

        let resolution = dashboard.resolve(&source).await;
        assert_eq!(resolution.slug, "kaohsiung");
        assert!(resolution.notice.is_none());
    }
}
