//! Error taxonomy shared by the twcast crates.
//!
//! Component crates keep their own detailed errors and convert into these
//! at the application boundary, where `user_message()` picks the text the
//! user sees. The `Display` output is for logs only.

use thiserror::Error;

/// Alert shown whenever forecast data cannot be loaded.
pub const FORECAST_FAILURE_MESSAGE: &str = "天氣資料讀取失敗，狸克把網路線咬斷了！";

/// One-time notice shown when the user has turned location off.
///
/// `city` is the short display name of the fallback city, e.g. "高雄".
pub fn location_denied_notice(city: &str) -> String {
    format!("未開啟定位，已顯示預設城市（{city}）\n可手動選擇其他城市")
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Config(e) => e.user_message(),
            Self::Weather(e) => e.user_message(),
            Self::Io(_) => "檔案寫入失敗，請檢查路徑。",
        }
    }
}

/// Transport-level failure detail, used to describe HTTP errors in logs.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Undecodable response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Invalid(_) => "設定內容有誤，請檢查設定檔。",
            Self::ParseError(_) => "設定檔格式錯誤，請檢查設定檔。",
        }
    }
}

/// Weather failures as seen by the application.
///
/// Location and geocoding failures fall back to the default city rather
/// than reaching the user; only a failed forecast raises the alert.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("Reverse geocoding failed: {0}")]
    GeocodeFailure(String),

    #[error("Forecast fetch failed: {0}")]
    ForecastFetchFailure(String),

    #[error("Unknown city: {0}")]
    UnknownCity(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::LocationUnavailable(_) | Self::GeocodeFailure(_) => {
                "無法取得位置，已顯示預設城市。"
            }
            Self::ForecastFetchFailure(_) => FORECAST_FAILURE_MESSAGE,
            Self::UnknownCity(_) => "找不到這個城市，請從清單中選擇。",
        }
    }
}

/// Classify a `reqwest::Error` into a [`NetworkError`].
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            return NetworkError::Timeout;
        }
        if self.is_decode() {
            return NetworkError::Decode(self.to_string());
        }
        match self.status() {
            Some(status) => NetworkError::Status {
                status: status.as_u16(),
                message: self.to_string(),
            },
            None => NetworkError::ConnectionFailed(self.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_failure_uses_alert_text() {
        let err = WeatherError::ForecastFetchFailure("API Error".into());
        assert_eq!(err.user_message(), FORECAST_FAILURE_MESSAGE);
    }

    #[test]
    fn test_weather_error_wraps_into_app_error() {
        let app_err: AppError = WeatherError::UnknownCity("tokyo".into()).into();
        assert!(matches!(app_err, AppError::Weather(WeatherError::UnknownCity(_))));
        assert_eq!(app_err.user_message(), "找不到這個城市，請從清單中選擇。");
    }

    #[test]
    fn test_config_error_message() {
        let app_err: AppError = ConfigError::ParseError("line 1".into()).into();
        assert_eq!(app_err.user_message(), "設定檔格式錯誤，請檢查設定檔。");
    }

    #[test]
    fn test_location_denied_notice_names_city() {
        assert_eq!(
            location_denied_notice("高雄"),
            "未開啟定位，已顯示預設城市（高雄）\n可手動選擇其他城市"
        );
    }

    #[test]
    fn test_location_failures_share_fallback_message() {
        assert_eq!(
            WeatherError::LocationUnavailable("x".into()).user_message(),
            WeatherError::GeocodeFailure("y".into()).user_message()
        );
    }

    #[tokio::test]
    async fn test_refused_connection_classified() {
        let err = reqwest::get("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err.into_network_error(), NetworkError::ConnectionFailed(_)));
    }
}
