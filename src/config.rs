/// Environment variable naming the host interpreter.
pub const HOST_ENV: &str = "EPOXY_HOST";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Command used to execute the generated script.
    pub host: String,
    /// Print the assembled host text instead of running it.
    pub emit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "node".to_string(),
            emit: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::with_host(std::env::var(HOST_ENV).ok())
    }

    fn with_host(host: Option<String>) -> Self {
        match host.filter(|host| !host.trim().is_empty()) {
            Some(host) => Config {
                host,
                ..Config::default()
            },
            None => Config::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_override() {
        assert_eq!(Config::with_host(None).host, "node");
        assert_eq!(Config::with_host(Some("  ".to_string())).host, "node");
        assert_eq!(Config::with_host(Some("bun".to_string())).host, "bun");
        assert!(!Config::with_host(Some("bun".to_string())).emit);
    }
}
