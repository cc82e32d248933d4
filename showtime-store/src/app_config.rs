use serde::Deserialize;
use showtime_catalog::PricingConfig;
use showtime_core::{IdStrategy, NotificationChannel};
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub booking: BookingRules,
    pub pricing: PricingConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
    #[serde(default)]
    pub ids: IdConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingRules {
    /// How long seats stay held when the caller does not ask for a TTL
    #[serde(default = "default_hold_seconds")]
    pub hold_seconds: u64,
    /// Upper bound on a caller-supplied TTL
    #[serde(default = "default_max_hold_seconds")]
    pub max_hold_seconds: u64,
}

fn default_hold_seconds() -> u64 { 300 }

fn default_max_hold_seconds() -> u64 { 3600 }

impl BookingRules {
    pub fn hold_ttl(&self) -> Duration {
        Duration::from_secs(self.hold_seconds)
    }

    pub fn max_hold_ttl(&self) -> Duration {
        Duration::from_secs(self.max_hold_seconds)
    }
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            hold_seconds: default_hold_seconds(),
            max_hold_seconds: default_max_hold_seconds(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct NotificationConfig {
    #[serde(default)]
    pub channel: NotificationChannel,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct IdConfig {
    #[serde(default)]
    pub strategy: IdStrategy,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides are optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `SHOWTIME_BOOKING__HOLD_SECONDS=60`
            .add_source(config::Environment::with_prefix("SHOWTIME").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showtime_catalog::PricingModel;

    #[test]
    fn test_config_from_toml_source() {
        let toml = r#"
            [server]
            port = 8080

            [booking]
            hold_seconds = 120

            [pricing]
            strategy = "dynamic"
            base_price = 1200
            weekend_surcharge = 250

            [notification]
            channel = "sms"
        "#;

        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.booking.hold_ttl(), Duration::from_secs(120));
        assert_eq!(config.booking.max_hold_ttl(), Duration::from_secs(3600));
        assert_eq!(config.pricing.strategy, PricingModel::Dynamic);
        assert_eq!(config.pricing.weekend_surcharge, 250);
        assert_eq!(config.notification.channel, NotificationChannel::Sms);
        assert_eq!(config.ids.strategy, IdStrategy::Uuid);
    }
}
