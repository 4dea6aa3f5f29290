//! Dashboard rendering.
//!
//! [`DashboardView`] is the presentation-neutral snapshot built from a
//! forecast; `html` and `text` bind it to markup or terminal output.

pub mod html;
pub mod text;

use chrono::{Datelike, NaiveDateTime, Timelike};
use rand::Rng;
use serde::Serialize;

use crate::advice::{
    advice, average_temp, day_part, food_advice_with, is_night, mentions_rain, weather_icon,
    Advice, FoodAdvice,
};
use crate::cities::CityEntry;
use crate::theme::Theme;
use crate::types::{ForecastData, ForecastSlot};

pub use html::render_html;
pub use text::render_text;

const WEEKDAYS: [&str; 7] = ["週日", "週一", "週二", "週三", "週四", "週五", "週六"];
const TOMORROW_PREFIX: &str = "明天";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("Forecast contains no slots")]
    NoForecast,
}

/// Page background, from the current weather and time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Background {
    Night,
    Sunny,
    Cloudy,
    Rainy,
}

impl Background {
    pub fn classify(weather: &str, hour: u32) -> Self {
        if is_night(hour) {
            Self::Night
        } else if weather.contains('晴') {
            Self::Sunny
        } else if weather.contains('雲') {
            Self::Cloudy
        } else if mentions_rain(weather) {
            Self::Rainy
        } else {
            Self::Sunny
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Night => "night",
            Self::Sunny => "sunny",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
        }
    }

    /// Gradient behind the loading placeholder, matching the page.
    pub fn loading_gradient(&self) -> &'static str {
        match self {
            Self::Night => "linear-gradient(to bottom, #001f3f, #000)",
            Self::Sunny => "linear-gradient(to bottom, #87CEFA, #7DE1A9)",
            Self::Cloudy => "linear-gradient(to bottom, #B0C4DE, #E0E5EC)",
            Self::Rainy => "linear-gradient(to bottom, #4B79A1, #283E51)",
        }
    }
}

/// Current conditions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroCard {
    pub period: &'static str,
    pub icon: &'static str,
    pub average_temp: Option<i32>,
    pub description: String,
    pub advice: Advice,
    pub food: FoodAdvice,
    pub rain: String,
    pub max_temp: String,
}

/// One upcoming forecast period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastCard {
    pub label: String,
    pub icon: &'static str,
    pub min_temp: String,
    pub max_temp: String,
    pub rain: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub city: String,
    pub slug: String,
    pub theme: Theme,
    pub background: Background,
    pub hero: HeroCard,
    pub upcoming: Vec<ForecastCard>,
    pub update_time: String,
}

impl DashboardView {
    /// Build the view for `city`. `now` is Taiwan local time.
    pub fn build<R: Rng + ?Sized>(
        city: &CityEntry,
        data: &ForecastData,
        theme: Theme,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Result<Self, RenderError> {
        let current = data.current().ok_or(RenderError::NoForecast)?;

        let hero = HeroCard {
            period: day_part(&current.start_time).label(),
            icon: weather_icon(&current.weather),
            average_temp: average_temp(current.min_temp.as_str(), current.max_temp.as_str()),
            description: current.weather.clone(),
            advice: advice(current.rain.as_str(), current.max_temp.as_str()),
            food: food_advice_with(
                rng,
                &current.weather,
                current.max_temp.as_str(),
                current.rain.as_str(),
            ),
            rain: current.rain.to_string(),
            max_temp: current.max_temp.to_string(),
        };

        let upcoming = data
            .upcoming()
            .iter()
            .map(|slot| forecast_card(slot, now))
            .collect();

        Ok(Self {
            city: city.display_name.clone(),
            slug: city.slug.clone(),
            theme,
            background: Background::classify(&current.weather, current.start_time.hour()),
            hero,
            upcoming,
            update_time: update_time_label(now),
        })
    }
}

fn forecast_card(slot: &ForecastSlot, now: NaiveDateTime) -> ForecastCard {
    let period = day_part(&slot.start_time).label();
    let label = if slot.start_time.date() != now.date() {
        format!("{TOMORROW_PREFIX}{period}")
    } else {
        period.to_string()
    };

    ForecastCard {
        label,
        icon: weather_icon(&slot.weather),
        min_temp: slot.min_temp.to_string(),
        max_temp: slot.max_temp.to_string(),
        rain: slot.rain.to_string(),
    }
}

/// e.g. "12月20日 週六"
pub fn update_time_label(now: NaiveDateTime) -> String {
    let weekday = WEEKDAYS[now.weekday().num_days_from_sunday() as usize];
    format!("{}月{}日 {}", now.month(), now.day(), weekday)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::cities::CityRegistry;
    use crate::theme::ThemeMode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2025-12-20 11:30", "%Y-%m-%d %H:%M").unwrap()
    }

    fn build(data: &ForecastData) -> Result<DashboardView, RenderError> {
        let registry = CityRegistry::taiwan().unwrap();
        let city = registry.lookup("taipei").unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        DashboardView::build(city, data, Theme::for_mode(ThemeMode::Christmas), now(), &mut rng)
    }

    #[test]
    fn test_background_classification() {
        assert_eq!(Background::classify("晴", 18), Background::Night);
        assert_eq!(Background::classify("晴", 5), Background::Night);
        assert_eq!(Background::classify("多雲時晴", 12), Background::Sunny);
        assert_eq!(Background::classify("多雲", 12), Background::Cloudy);
        assert_eq!(Background::classify("陰短暫雨", 12), Background::Rainy);
        assert_eq!(Background::classify("陰", 12), Background::Sunny);
        assert_eq!(
            Background::Rainy.loading_gradient(),
            "linear-gradient(to bottom, #4B79A1, #283E51)"
        );
    }

    #[test]
    fn test_hero_from_first_slot() {
        let view = build(&sample_forecast()).unwrap();

        assert_eq!(view.city, "臺北市");
        assert_eq!(view.hero.period, "中午");
        assert_eq!(view.hero.icon, "☀️");
        assert_eq!(view.hero.average_temp, Some(22));
        assert_eq!(view.hero.advice.rain_text, "不用帶傘");
        assert_eq!(view.hero.advice.cloth_text, "舒適穿搭");
        assert_eq!(view.hero.food.icon, "🎁");
        assert_eq!(view.hero.rain, "20%");
        assert_eq!(view.background, Background::Sunny);
    }

    #[test]
    fn test_upcoming_cards_prefix_tomorrow() {
        let view = build(&sample_forecast()).unwrap();

        let labels: Vec<_> = view.upcoming.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["晚上", "明天早晨"]);
        assert_eq!(view.upcoming[0].icon, "☁️");
        assert_eq!(view.upcoming[1].min_temp, "15");
    }

    #[test]
    fn test_update_time_label() {
        assert_eq!(update_time_label(now()), "12月20日 週六");
    }

    #[test]
    fn test_empty_forecast_is_error() {
        let data = ForecastData { forecasts: vec![] };
        assert_eq!(build(&data).unwrap_err(), RenderError::NoForecast);
    }

    #[test]
    fn test_single_slot_has_no_upcoming() {
        let data = ForecastData {
            forecasts: vec![slot("2025-12-20 20:00", "晴", "10", "14", "0%")],
        };
        let view = build(&data).unwrap();
        assert!(view.upcoming.is_empty());
        assert_eq!(view.background, Background::Night);
        assert_eq!(view.hero.food.icon, "🍲");
        assert_eq!(view.hero.advice.cloth_text, "加件外套");
    }
}
