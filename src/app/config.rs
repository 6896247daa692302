use std::{fs, io::ErrorKind, path::Path, time::Duration};
use serde::Deserialize;

use crate::{
    error::ConfigError,
    mapper::{ColorGradient, Range},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    #[serde(default)]
    update_interval: Option<u64>,
    #[serde(default)]
    retry_delay: Option<u64>,
    #[serde(default)]
    request_timeout: Option<u64>,
    #[serde(default)]
    server: Option<String>,
    #[serde(default)]
    power_range: Option<[f64; 2]>,
    #[serde(default)]
    temperature_range: Option<[f64; 2]>,
    #[serde(default)]
    show_temperature: Option<bool>,
    #[serde(default)]
    show_title: Option<bool>,
    #[serde(default)]
    show_meter_title: Option<bool>,
    #[serde(default)]
    show_insufficient_status: Option<bool>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    debug: Option<bool>,
    #[serde(default)]
    colors: Option<ColorsFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColorsFile {
    #[serde(default)]
    production: Option<[ColorGradient; 2]>,
    #[serde(default)]
    consumption: Option<[ColorGradient; 2]>,
    #[serde(default)]
    temperature_positive: Option<ColorGradient>,
    #[serde(default)]
    temperature_negative: Option<ColorGradient>,
}

/// Positive and negative gradient used by one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientPair {
    pub positive: ColorGradient,
    pub negative: ColorGradient,
}

impl From<[ColorGradient; 2]> for GradientPair {
    fn from(pair: [ColorGradient; 2]) -> Self {
        Self { positive: pair[0], negative: pair[1] }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub power: GradientPair,
    pub consumption: GradientPair,
    pub temperature: GradientPair,
}

impl Default for Palette {
    fn default() -> Self {
        let power = GradientPair {
            positive: ColorGradient::LIME_TO_GREEN,
            negative: ColorGradient::YELLOW_TO_RED,
        };
        Self {
            power,
            consumption: power,
            temperature: GradientPair {
                positive: ColorGradient::BLUE_TO_RED,
                negative: ColorGradient::BLUE_TO_PURPLE,
            },
        }
    }
}

/// Resolved configuration. Every range in here has already been validated.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub update_interval: Duration,
    pub retry_delay: Duration,
    pub request_timeout: Duration,
    pub server: String,
    pub power_range: Range,
    pub temperature_range: Range,
    pub show_temperature: bool,
    pub show_title: bool,
    pub show_meter_title: bool,
    pub show_insufficient_status: bool,
    pub language: String,
    pub debug: bool,
    pub palette: Palette,
}

impl AppConfig {
    pub const DEFAULT_PATH: &str = "./config_example.yaml";
    const UPDATE_INTERVAL_MS: u64 = 10_000;
    const RETRY_DELAY_MS: u64 = 5_000;
    const REQUEST_TIMEOUT_MS: u64 = 5_000;
    const SERVER: &str = "http://localhost:8081/data?k=1234";
    const POWER_RANGE: [f64; 2] = [-2500.0, 2200.0];
    const TEMPERATURE_RANGE: [f64; 2] = [0.0, 60.0];
    const LANGUAGE: &str = "en";

    /// Loads the YAML file at `config_path`. Only a missing file falls back
    /// to defaults; an unreadable or unparsable file is an error.
    pub fn new<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_path = config_path.as_ref();
        match fs::read_to_string(config_path) {
            Ok(yaml) => Self::from_yaml(&yaml),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                eprintln!("Config file {} not found, using defaults", config_path.display());
                Self::resolve(ConfigFile::default())
            }
            Err(err) => Err(ConfigError::Unreadable {
                path: config_path.display().to_string(),
                reason: err.to_string(),
            }),
        }
    }

    pub(crate) fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let blank = yaml.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        });
        if blank {
            return Self::resolve(ConfigFile::default());
        }
        let file = serde_yml::from_str(yaml).map_err(|err| ConfigError::Parse(err.to_string()))?;
        Self::resolve(file)
    }

    fn interval(name: &str, value: Option<u64>, default_ms: u64) -> Result<Duration, ConfigError> {
        match value.unwrap_or(default_ms) {
            0 => Err(ConfigError::zero_interval(name)),
            ms => Ok(Duration::from_millis(ms)),
        }
    }

    fn resolve(file: ConfigFile) -> Result<Self, ConfigError> {
        let [pmin, pmax] = file.power_range.unwrap_or(Self::POWER_RANGE);
        let [tmin, tmax] = file.temperature_range.unwrap_or(Self::TEMPERATURE_RANGE);

        let mut palette = Palette::default();
        if let Some(colors) = file.colors {
            if let Some(pair) = colors.production {
                palette.power = pair.into();
            }
            if let Some(pair) = colors.consumption {
                palette.consumption = pair.into();
            }
            if let Some(g) = colors.temperature_positive {
                palette.temperature.positive = g;
            }
            if let Some(g) = colors.temperature_negative {
                palette.temperature.negative = g;
            }
        }

        Ok(Self {
            update_interval: Self::interval(
                "updateInterval",
                file.update_interval,
                Self::UPDATE_INTERVAL_MS,
            )?,
            retry_delay: Self::interval("retryDelay", file.retry_delay, Self::RETRY_DELAY_MS)?,
            request_timeout: Self::interval(
                "requestTimeout",
                file.request_timeout,
                Self::REQUEST_TIMEOUT_MS,
            )?,
            server: file.server.unwrap_or_else(|| Self::SERVER.to_string()),
            power_range: Range::two_sided("powerRange", pmin, pmax)?,
            temperature_range: Range::named("temperatureRange", tmin, tmax)?,
            show_temperature: file.show_temperature.unwrap_or(true),
            show_title: file.show_title.unwrap_or(true),
            show_meter_title: file.show_meter_title.unwrap_or(false),
            show_insufficient_status: file.show_insufficient_status.unwrap_or(true),
            language: file.language.unwrap_or_else(|| Self::LANGUAGE.to_string()),
            debug: file.debug.unwrap_or(false),
            palette,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        // The built-in ranges are valid, so resolving an empty file cannot fail.
        Self::resolve(ConfigFile::default()).unwrap_or_else(|err| unreachable!("{err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::Rgb;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_yaml("").unwrap();
        assert_eq!(config.update_interval, Duration::from_secs(10));
        assert_eq!(config.retry_delay, Duration::from_secs(5));
        assert_eq!(config.server, "http://localhost:8081/data?k=1234");
        assert_eq!(config.power_range.min(), -2500.0);
        assert_eq!(config.power_range.max(), 2200.0);
        assert_eq!(config.temperature_range.max(), 60.0);
        assert!(config.show_temperature);
        assert!(config.show_insufficient_status);
        assert_eq!(config.palette, Palette::default());
    }

    #[test]
    fn test_overrides() {
        let yaml = r#"
updateInterval: 2000
retryDelay: 500
server: "http://inverter.lan/data"
powerRange: [-4000, 5000]
showTemperature: false
language: es
colors:
  temperaturePositive: [[0, 0, 0], [255, 255, 255]]
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.update_interval, Duration::from_millis(2000));
        assert_eq!(config.retry_delay, Duration::from_millis(500));
        assert_eq!(config.server, "http://inverter.lan/data");
        assert_eq!(config.power_range.min(), -4000.0);
        assert!(!config.show_temperature);
        assert_eq!(config.language, "es");
        assert_eq!(config.palette.temperature.positive.end, Rgb(255, 255, 255));
        assert_eq!(config.palette.temperature.negative, ColorGradient::BLUE_TO_PURPLE);
    }

    #[test]
    fn test_degenerate_range_is_fatal() {
        let err = AppConfig::from_yaml("powerRange: [0, 0]").unwrap_err();
        assert!(matches!(err, ConfigError::DegenerateRange { .. }));

        let err = AppConfig::from_yaml("temperatureRange: [25, 25]").unwrap_err();
        assert!(matches!(err, ConfigError::DegenerateRange { .. }));
    }

    #[test]
    fn test_malformed_range_is_fatal() {
        let yaml = "updateInterval: 2000\nserver: \"http://inverter.lan/x\"\npowerRange: [100]\n";
        let err = AppConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = AppConfig::from_yaml("temperatureRange: hot").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_comment_only_file_uses_defaults() {
        let config = AppConfig::from_yaml("# nothing here\n\n").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_zero_intervals_rejected() {
        for key in ["updateInterval", "retryDelay", "requestTimeout"] {
            let err = AppConfig::from_yaml(&format!("{key}: 0")).unwrap_err();
            assert_eq!(err, ConfigError::ZeroInterval { name: key.to_string() });
        }
    }

    #[test]
    fn test_request_timeout_independent_of_retry_delay() {
        let config = AppConfig::from_yaml("retryDelay: 1").unwrap();
        assert_eq!(config.retry_delay, Duration::from_millis(1));
        assert_eq!(config.request_timeout, Duration::from_secs(5));

        let config = AppConfig::from_yaml("requestTimeout: 1500").unwrap();
        assert_eq!(config.request_timeout, Duration::from_millis(1500));
        assert_eq!(config.retry_delay, Duration::from_secs(5));
    }

    #[test]
    fn test_unreadable_path_is_an_error() {
        let err = AppConfig::new(std::env::temp_dir()).unwrap_err();
        assert!(matches!(err, ConfigError::Unreadable { .. }));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::new("/nonexistent/solar-monitor.yaml").unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
