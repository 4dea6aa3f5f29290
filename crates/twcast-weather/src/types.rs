use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Hours Taiwan local time is ahead of UTC.
pub const TAIWAN_UTC_OFFSET_HOURS: i64 = 8;

/// Current wall-clock time in Taiwan.
pub fn taiwan_now() -> NaiveDateTime {
    to_taiwan_local(Utc::now())
}

fn to_taiwan_local(instant: DateTime<Utc>) -> NaiveDateTime {
    instant.naive_utc() + chrono::Duration::hours(TAIWAN_UTC_OFFSET_HOURS)
}

/// Parse the leading integer of a feed value: `"30%"` is 30, `" -2°"` is -2.
///
/// Returns `None` when the text does not start with a number; callers treat
/// that as "no comparison holds".
pub fn parse_leading_int(text: &str) -> Option<i32> {
    let text = text.trim_start();
    let (sign, digits) = match text.as_bytes().first() {
        Some(b'-') => (-1, &text[1..]),
        Some(b'+') => (1, &text[1..]),
        _ => (1, text),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // All digits, so parsing only fails on overflow
    let value = match digits[..end].parse::<i64>() {
        Ok(v) => sign * v,
        Err(_) => sign * i64::MAX,
    };
    Some(value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

/// A numeric feed field that arrives as text, kept verbatim for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(transparent)]
pub struct Reading(String);

impl Reading {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Raw text as delivered by the feed
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading integer value, if any
    pub fn value(&self) -> Option<i32> {
        parse_leading_int(&self.0)
    }
}

impl std::fmt::Display for Reading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Reading {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl<'de> Deserialize<'de> for Reading {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
            Float(f64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Reading(s),
            Raw::Int(n) => Reading(n.to_string()),
            Raw::Float(n) => Reading(n.to_string()),
        })
    }
}

/// Parse a feed timestamp into Taiwan local time.
///
/// Offset-carrying timestamps are converted; naive ones are taken as local.
pub fn parse_start_time(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(to_taiwan_local(dt.with_timezone(&Utc)));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

fn deserialize_start_time<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<NaiveDateTime, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse_start_time(&text)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid startTime: {text}")))
}

/// One discrete time period in the forecast feed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSlot {
    /// Period start, Taiwan local time
    #[serde(deserialize_with = "deserialize_start_time")]
    pub start_time: NaiveDateTime,
    /// Free-text description, e.g. "多雲時晴"
    #[serde(default)]
    pub weather: String,
    pub min_temp: Reading,
    pub max_temp: Reading,
    pub rain: Reading,
}

/// Forecast payload; the first slot is the current period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastData {
    pub forecasts: Vec<ForecastSlot>,
}

impl ForecastData {
    pub fn current(&self) -> Option<&ForecastSlot> {
        self.forecasts.first()
    }

    pub fn upcoming(&self) -> &[ForecastSlot] {
        self.forecasts.get(1..).unwrap_or_default()
    }
}

/// Envelope returned by the forecast endpoint
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ForecastResponse {
    pub success: bool,
    pub data: Option<ForecastData>,
}

/// Geographic location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Location service errors
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
}

impl From<LocationError> for twcast_core::WeatherError {
    fn from(err: LocationError) -> Self {
        Self::LocationUnavailable(err.to_string())
    }
}
