//! Advice derived from forecast fields: weather icon, umbrella and clothing
//! hints, a food suggestion and the day-part label.
//!
//! Numeric inputs are feed text; see [`parse_leading_int`]. A value that does
//! not parse never satisfies any threshold.

use chrono::{NaiveDateTime, Timelike};
use rand::Rng;
use serde::Serialize;

use crate::types::parse_leading_int;

pub const DEFAULT_WEATHER_ICON: &str = "🌤️";

/// Sentinel keyword → icon, checked in order; first hit wins.
const WEATHER_ICONS: &[(&str, &str)] = &[
    ("晴", "☀️"),
    ("多雲", "⛅"),
    ("陰", "☁️"),
    ("雨", "🌧️"),
    ("雷", "⛈️"),
];

/// Candidates for the pleasant-weather food suggestion.
pub const FESTIVE_FOODS: [&str; 4] = ["烤雞", "聖誕熱紅酒", "義大利麵", "暖心拿鐵"];

const RAIN_THRESHOLD: i32 = 30;
const HOT_THRESHOLD: i32 = 28;
const COLD_THRESHOLD: i32 = 20;
const STAY_IN_RAIN_THRESHOLD: i32 = 40;

pub fn weather_icon(description: &str) -> &'static str {
    if description.is_empty() {
        return DEFAULT_WEATHER_ICON;
    }
    WEATHER_ICONS
        .iter()
        .find(|(keyword, _)| description.contains(keyword))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_WEATHER_ICON)
}

/// True when the description mentions rain or thunder.
pub fn mentions_rain(description: &str) -> bool {
    description.contains('雨') || description.contains('雷')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Advice {
    pub rain_icon: &'static str,
    pub rain_text: &'static str,
    pub cloth_icon: &'static str,
    pub cloth_text: &'static str,
}

/// Umbrella advice above 30% rain; short sleeves from 28°, a jacket at 20° or below.
pub fn advice(rain_prob: &str, max_temp: &str) -> Advice {
    let (rain_icon, rain_text) = match parse_leading_int(rain_prob) {
        Some(r) if r > RAIN_THRESHOLD => ("☂️", "記得帶傘！"),
        _ => ("🌂", "不用帶傘"),
    };

    let (cloth_icon, cloth_text) = match parse_leading_int(max_temp) {
        Some(t) if t >= HOT_THRESHOLD => ("🎽", "短袖出發"),
        Some(t) if t <= COLD_THRESHOLD => ("🧥", "加件外套"),
        _ => ("👕", "舒適穿搭"),
    };

    Advice {
        rain_icon,
        rain_text,
        cloth_icon,
        cloth_text,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoodAdvice {
    pub icon: &'static str,
    pub text: String,
}

/// Food suggestion using the thread-local RNG for the pleasant-weather pick.
pub fn food_advice(weather: &str, temp: &str, rain_prob: &str) -> FoodAdvice {
    food_advice_with(&mut rand::rng(), weather, temp, rain_prob)
}

/// Cold beats rain, rain beats heat, heat beats the random default.
pub fn food_advice_with<R: Rng + ?Sized>(
    rng: &mut R,
    weather: &str,
    temp: &str,
    rain_prob: &str,
) -> FoodAdvice {
    let t = parse_leading_int(temp);
    let r = parse_leading_int(rain_prob);

    if let Some(t) = t.filter(|t| *t <= COLD_THRESHOLD) {
        return FoodAdvice {
            icon: "🍲",
            text: format!("外面只有 {t} 度！這種天氣不吃火鍋或拉麵真的對不起自己。"),
        };
    }

    if let Some(r) = r.filter(|r| mentions_rain(weather) && *r >= STAY_IN_RAIN_THRESHOLD) {
        return FoodAdvice {
            icon: "🍗",
            text: format!("降雨率 {r}%，外面濕答答，點份炸雞配電影最爽！"),
        };
    }

    if t.is_some_and(|t| t >= HOT_THRESHOLD) {
        return FoodAdvice {
            icon: "🍦",
            text: "氣溫有點高耶，要不要來支聖誕限定冰淇淋？".to_string(),
        };
    }

    let food = FESTIVE_FOODS[rng.random_range(0..FESTIVE_FOODS.len())];
    FoodAdvice {
        icon: "🎁",
        text: format!("氣候宜人，今天適合犒賞自己吃個{food}！"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayPart {
    Morning,
    Midday,
    Afternoon,
    Evening,
    LateNight,
}

impl DayPart {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Morning => "早晨",
            Self::Midday => "中午",
            Self::Afternoon => "下午",
            Self::Evening => "晚上",
            Self::LateNight => "深夜",
        }
    }
}

pub fn day_part_for_hour(hour: u32) -> DayPart {
    match hour {
        5..=10 => DayPart::Morning,
        11..=13 => DayPart::Midday,
        14..=17 => DayPart::Afternoon,
        18..=22 => DayPart::Evening,
        _ => DayPart::LateNight,
    }
}

pub fn day_part(start_time: &NaiveDateTime) -> DayPart {
    day_part_for_hour(start_time.hour())
}

/// Night for background purposes. 18:00 is both night and 晚上.
pub fn is_night(hour: u32) -> bool {
    !(6..18).contains(&hour)
}

/// Mean of min and max, halves rounded up.
pub fn average_temp(min_temp: &str, max_temp: &str) -> Option<i32> {
    let sum = i64::from(parse_leading_int(min_temp)?) + i64::from(parse_leading_int(max_temp)?);
    i32::try_from((sum + 1).div_euclid(2)).ok()
}
