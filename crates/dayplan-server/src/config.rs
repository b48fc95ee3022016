use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Duration;

use dayplan_auth::config::DEFAULT_TOKEN_TTL_HOURS;
use dayplan_auth::{AdminCredential, AuthConfig};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

/// Startup configuration, read once from the environment.
pub struct Config {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub admin_username: String,
    pub admin_password: String,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = get("DAYPLAN_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("DAYPLAN_JWT_SECRET is unset or still a placeholder");
        }

        let admin_password = get("DAYPLAN_ADMIN_PASSWORD").unwrap_or_default();
        if admin_password.is_empty() {
            bail!("DAYPLAN_ADMIN_PASSWORD must be set");
        }

        let token_ttl_hours = match get("DAYPLAN_TOKEN_TTL_HOURS") {
            Some(v) => v.parse().context("DAYPLAN_TOKEN_TTL_HOURS must be a whole number of hours")?,
            None => DEFAULT_TOKEN_TTL_HOURS,
        };
        if token_ttl_hours <= 0 {
            bail!("DAYPLAN_TOKEN_TTL_HOURS must be positive");
        }

        let port = match get("DAYPLAN_PORT") {
            Some(v) => v.parse().context("DAYPLAN_PORT must be a port number")?,
            None => 8080,
        };

        Ok(Self {
            jwt_secret,
            token_ttl_hours,
            admin_username: get("DAYPLAN_ADMIN_USERNAME").unwrap_or_else(|| "admin".into()),
            admin_password,
            db_path: get("DAYPLAN_DB_PATH").unwrap_or_else(|| "dayplan.db".into()).into(),
            host: get("DAYPLAN_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("DAYPLAN_HOST {:?} is not an IP address", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Build the immutable auth settings handed to the token service and
    /// the admin login.
    pub fn auth(&self) -> Result<AuthConfig> {
        let admin = AdminCredential::new(&self.admin_username, &self.admin_password)
            .context("hashing admin password")?;

        Ok(AuthConfig::new(
            self.jwt_secret.clone(),
            Duration::hours(self.token_ttl_hours),
            admin,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[
            ("DAYPLAN_JWT_SECRET", "a-real-secret"),
            ("DAYPLAN_ADMIN_PASSWORD", "pw"),
        ]))
        .unwrap();

        assert_eq!(config.token_ttl_hours, DEFAULT_TOKEN_TTL_HOURS);
        assert_eq!(config.admin_username, "admin");
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_path, PathBuf::from("dayplan.db"));
        assert_eq!(config.addr().unwrap().port(), 8080);
    }

    #[test]
    fn placeholder_or_missing_secret_is_fatal() {
        assert!(Config::from_lookup(lookup(&[("DAYPLAN_ADMIN_PASSWORD", "pw")])).is_err());
        assert!(
            Config::from_lookup(lookup(&[
                ("DAYPLAN_JWT_SECRET", "dev-secret-change-me"),
                ("DAYPLAN_ADMIN_PASSWORD", "pw"),
            ]))
            .is_err()
        );
    }

    #[test]
    fn admin_password_is_required() {
        assert!(Config::from_lookup(lookup(&[("DAYPLAN_JWT_SECRET", "a-real-secret")])).is_err());
    }

    #[test]
    fn bad_numbers_are_rejected() {
        for (key, value) in [("DAYPLAN_PORT", "http"), ("DAYPLAN_TOKEN_TTL_HOURS", "0"), ("DAYPLAN_TOKEN_TTL_HOURS", "soon")] {
            let result = Config::from_lookup(lookup(&[
                ("DAYPLAN_JWT_SECRET", "a-real-secret"),
                ("DAYPLAN_ADMIN_PASSWORD", "pw"),
                (key, value),
            ]));
            assert!(result.is_err(), "{key}={value}");
        }
    }

    #[test]
    fn host_may_be_ipv4_or_ipv6() {
        for (host, expected) in [("127.0.0.1", "127.0.0.1:9000"), ("::", "[::]:9000"), ("::1", "[::1]:9000")] {
            let config = Config::from_lookup(lookup(&[
                ("DAYPLAN_JWT_SECRET", "a-real-secret"),
                ("DAYPLAN_ADMIN_PASSWORD", "pw"),
                ("DAYPLAN_HOST", host),
                ("DAYPLAN_PORT", "9000"),
            ]))
            .unwrap();

            assert_eq!(config.addr().unwrap().to_string(), expected);
        }
    }

    #[test]
    fn host_must_be_an_address() {
        let config = Config::from_lookup(lookup(&[
            ("DAYPLAN_JWT_SECRET", "a-real-secret"),
            ("DAYPLAN_ADMIN_PASSWORD", "pw"),
            ("DAYPLAN_HOST", "not a host"),
        ]))
        .unwrap();

        assert!(config.addr().is_err());
    }

    #[test]
    fn auth_config_carries_ttl_and_admin() {
        let config = Config::from_lookup(lookup(&[
            ("DAYPLAN_JWT_SECRET", "a-real-secret"),
            ("DAYPLAN_ADMIN_PASSWORD", "pw"),
            ("DAYPLAN_ADMIN_USERNAME", "root"),
            ("DAYPLAN_TOKEN_TTL_HOURS", "2"),
        ]))
        .unwrap();

        let auth = config.auth().unwrap();
        assert_eq!(auth.token_ttl, Duration::hours(2));
        assert!(auth.admin.matches("root", "pw"));
    }
}
