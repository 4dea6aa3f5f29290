//! Seasonal theme, chosen purely from the calendar date.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThemeMode {
    NewYear,
    Christmas,
    Daily,
}

impl ThemeMode {
    /// New Year runs 2026-01-01 through 2026-03-03 inclusive; anything up to
    /// the end of 2025 is Christmas.
    pub fn for_date(date: NaiveDate) -> Self {
        let new_year = (2026, 1, 1)..=(2026, 3, 3);
        if new_year.contains(&(date.year(), date.month(), date.day())) {
            Self::NewYear
        } else if date.year() <= 2025 {
            Self::Christmas
        } else {
            Self::Daily
        }
    }
}

/// Seasonal ornament shown next to the hero card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Ornament {
    ChristmasTree,
    NewYear,
}

/// Presentation tokens driven by the theme mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub mode: ThemeMode,
    /// Glyph of the falling decoration particles
    pub particle: &'static str,
    /// CSS accent colour
    pub accent: &'static str,
    pub title: &'static str,
    pub food_heading: &'static str,
    pub ornament: Option<Ornament>,
}

impl Theme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Christmas => Self {
                mode,
                particle: "❄️",
                accent: "#b08d57",
                title: "聖誕天氣小站",
                food_heading: "聖誕美食建議：",
                ornament: Some(Ornament::ChristmasTree),
            },
            ThemeMode::NewYear => Self {
                mode,
                particle: "🧨",
                accent: "#c0392b",
                title: "新春天氣小站",
                food_heading: "新年美食建議：",
                ornament: Some(Ornament::NewYear),
            },
            ThemeMode::Daily => Self {
                mode,
                particle: "🍃",
                accent: "#2e8b57",
                title: "天氣小站",
                food_heading: "今日美食建議：",
                ornament: None,
            },
        }
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Self::for_mode(ThemeMode::for_date(date))
    }
}
