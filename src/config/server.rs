/// Server configuration.
///
/// Bind address defaults, overridable through the environment.
use log::warn;

/// Host the HTTP server binds to when `MYSTIC_MATCH_HOST` is unset.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Port the HTTP server binds to when `MYSTIC_MATCH_PORT` is unset or invalid.
pub const DEFAULT_PORT: u16 = 8080;

pub const HOST_ENV: &str = "MYSTIC_MATCH_HOST";
pub const PORT_ENV: &str = "MYSTIC_MATCH_PORT";

/// Resolved bind address for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindConfig {
    pub host: String,
    pub port: u16,
}

impl BindConfig {
    /// Read the bind address from the process environment.
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var(HOST_ENV).ok(),
            std::env::var(PORT_ENV).ok(),
        )
    }

    fn from_values(host: Option<String>, port: Option<String>) -> Self {
        let host = host
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match port {
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
                warn!("[Config] Invalid {} value '{}', using {}", PORT_ENV, raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self { host, port }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let cfg = BindConfig::from_values(None, None);
        assert_eq!(cfg.host, DEFAULT_HOST);
        assert_eq!(cfg.port, DEFAULT_PORT);
    }

    #[test]
    fn explicit_values_are_used() {
        let cfg = BindConfig::from_values(Some("0.0.0.0".into()), Some("9000".into()));
        assert_eq!(cfg, BindConfig { host: "0.0.0.0".into(), port: 9000 });
    }

    #[test]
    fn invalid_port_falls_back() {
        let cfg = BindConfig::from_values(Some("   ".into()), Some("not-a-port".into()));
        assert_eq!(cfg.host, DEFAULT_HOST);
        assert_eq!(cfg.port, DEFAULT_PORT);
    }
}
