use serde::Deserialize;
use std::env;
use wayfare_core::validate::BookingPolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub qr: QrConfig,
    pub planner: Option<PlannerGatewayConfig>,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QrConfig {
    pub signing_secret: String,
    /// Accept pre-signature QR payloads (unauthenticated). On for rollout;
    /// flip off once old tickets have aged out.
    #[serde(default = "default_allow_legacy")]
    pub allow_legacy: bool,
}

fn default_allow_legacy() -> bool {
    true
}

/// Chat-completions gateway used by the itinerary planner. Absent section
/// disables the planner endpoints.
#[derive(Debug, Deserialize, Clone)]
pub struct PlannerGatewayConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    #[serde(default = "default_max_advance_days")]
    pub max_advance_days: i64,
    #[serde(default = "default_max_price_inr")]
    pub max_price_inr: i64,
    #[serde(default = "default_max_segments")]
    pub max_segments_per_trip: u32,
    #[serde(default = "default_max_shares")]
    pub max_shares_per_trip: u32,
}

fn default_max_advance_days() -> i64 {
    365
}

fn default_max_price_inr() -> i64 {
    1_000_000
}

fn default_max_segments() -> u32 {
    10
}

fn default_max_shares() -> u32 {
    20
}

impl BusinessRules {
    pub fn booking_policy(&self) -> BookingPolicy {
        BookingPolicy {
            max_advance_days: self.max_advance_days,
            max_price_inr: self.max_price_inr,
            max_segments_per_trip: self.max_segments_per_trip,
            max_shares_per_trip: self.max_shares_per_trip,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file (optional)
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Environment variables, e.g. WAYFARE__SERVER__PORT=8080
            .add_source(config::Environment::with_prefix("WAYFARE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_rule_defaults_match_product_policy() {
        let rules: BusinessRules = serde_json::from_str("{}").unwrap();
        assert_eq!(rules.max_advance_days, 365);
        assert_eq!(rules.max_price_inr, 1_000_000);
        assert_eq!(rules.max_segments_per_trip, 10);
        assert_eq!(rules.max_shares_per_trip, 20);

        let policy = rules.booking_policy();
        assert_eq!(policy.max_advance_days, 365);
    }
}
