use std::env;

use failure::Fail;

#[derive(Debug, Fail, PartialEq)]
pub enum ConfigError {
    #[fail(display = "{} is mandatory", name)]
    MissingVar { name: &'static str },
    #[fail(
        display = "incomplete SMS configuration: TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN and TWILIO_NUMBER must be set together"
    )]
    IncompleteSmsConfig,
}

#[derive(Debug, Clone)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    /// `None` runs the app with notifications disabled.
    pub sms: Option<SmsConfig>,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());
        let database_url = get("DATABASE_URL").ok_or(ConfigError::MissingVar {
            name: "DATABASE_URL",
        })?;
        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8088".to_string());
        let sms = match (
            get("TWILIO_ACCOUNT_SID"),
            get("TWILIO_AUTH_TOKEN"),
            get("TWILIO_NUMBER"),
        ) {
            (Some(account_sid), Some(auth_token), Some(from_number)) => Some(SmsConfig {
                account_sid,
                auth_token,
                from_number,
            }),
            (None, None, None) => None,
            _ => return Err(ConfigError::IncompleteSmsConfig),
        };
        Ok(Config {
            database_url,
            bind_addr,
            sms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_minimal_config() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "lucky_draw.db")])).unwrap();
        assert_eq!(config.database_url, "lucky_draw.db");
        assert_eq!(config.bind_addr, "127.0.0.1:8088");
        assert!(config.sms.is_none());
    }

    #[test]
    fn test_database_url_is_mandatory() {
        let error = Config::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(
            error,
            ConfigError::MissingVar {
                name: "DATABASE_URL"
            }
        );
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let error = Config::from_lookup(lookup(&[("DATABASE_URL", "")])).unwrap_err();
        assert_eq!(
            error,
            ConfigError::MissingVar {
                name: "DATABASE_URL"
            }
        );
    }

    #[test]
    fn test_full_sms_config() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "lucky_draw.db"),
            ("BIND_ADDR", "0.0.0.0:9000"),
            ("TWILIO_ACCOUNT_SID", "AC123"),
            ("TWILIO_AUTH_TOKEN", "secret"),
            ("TWILIO_NUMBER", "+15005550006"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        let sms = config.sms.unwrap();
        assert_eq!(sms.account_sid, "AC123");
        assert_eq!(sms.auth_token, "secret");
        assert_eq!(sms.from_number, "+15005550006");
    }

    #[test]
    fn test_partial_sms_config_is_an_error() {
        let error = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "lucky_draw.db"),
            ("TWILIO_ACCOUNT_SID", "AC123"),
        ]))
        .unwrap_err();
        assert_eq!(error, ConfigError::IncompleteSmsConfig);
    }
}
