//! Environment overrides.
//!
//! Applied after the file is parsed and before validation.

use std::net::SocketAddr;

use crate::config::schema::{ServerConfig, DEFAULT_GC_PERCENT};
use crate::runtime::gc_percent_from_env;

pub const PORT: &str = "PORT";
pub const CUSTOM_GOGC: &str = "CUSTOM_GOGC";
pub const UPSTREAM_URL: &str = "UPSTREAM_URL";
pub const OTEL_SERVICE_NAME: &str = "OTEL_SERVICE_NAME";

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut ServerConfig) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

/// Apply overrides from an arbitrary lookup.
pub fn apply_overrides<F>(config: &mut ServerConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup(PORT) {
        match port.trim().parse::<u16>() {
            Ok(port) => config.listener.bind_address = with_port(&config.listener.bind_address, port),
            Err(_) => tracing::warn!(port = %port, "Ignoring unparsable PORT"),
        }
    }

    if let Some(gogc) = lookup(CUSTOM_GOGC) {
        config.runtime.gc_percent = gc_percent_from_env(Some(&gogc));
    }
    // A zero target from the file means "unset", same as the variable.
    if config.runtime.gc_percent == 0 {
        config.runtime.gc_percent = DEFAULT_GC_PERCENT;
    }

    if let Some(url) = lookup(UPSTREAM_URL) {
        config.upstream.url = url;
    }

    if let Some(name) = lookup(OTEL_SERVICE_NAME) {
        config.tracing.service_name = name;
    }
}

fn with_port(bind_address: &str, port: u16) -> String {
    match bind_address.parse::<SocketAddr>() {
        Ok(mut addr) => {
            addr.set_port(port);
            addr.to_string()
        }
        Err(_) => format!("0.0.0.0:{port}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_port_replaces_only_port() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "127.0.0.1:8080".into();
        apply_overrides(&mut config, lookup(&[("PORT", "3000")]));
        assert_eq!(config.listener.bind_address, "127.0.0.1:3000");
    }

    #[test]
    fn test_bad_port_ignored() {
        let mut config = ServerConfig::default();
        apply_overrides(&mut config, lookup(&[("PORT", "eighty")]));
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_gc_percent_rules() {
        let mut config = ServerConfig::default();
        apply_overrides(&mut config, lookup(&[("CUSTOM_GOGC", "50")]));
        assert_eq!(config.runtime.gc_percent, 50);

        apply_overrides(&mut config, lookup(&[("CUSTOM_GOGC", "0")]));
        assert_eq!(config.runtime.gc_percent, 100);

        apply_overrides(&mut config, lookup(&[("CUSTOM_GOGC", "lots")]));
        assert_eq!(config.runtime.gc_percent, 100);

        config.runtime.gc_percent = 75;
        apply_overrides(&mut config, lookup(&[]));
        assert_eq!(config.runtime.gc_percent, 75);
    }

    #[test]
    fn test_zero_gc_percent_from_file_normalized() {
        let mut config: ServerConfig = toml::from_str("[runtime]\ngc_percent = 0").unwrap();
        assert_eq!(config.runtime.gc_percent, 0);

        apply_overrides(&mut config, lookup(&[]));
        assert_eq!(config.runtime.gc_percent, 100);
    }

    #[test]
    fn test_upstream_and_service_name() {
        let mut config = ServerConfig::default();
        apply_overrides(
            &mut config,
            lookup(&[
                ("UPSTREAM_URL", "http://127.0.0.1:9/x"),
                ("OTEL_SERVICE_NAME", "pokedex"),
            ]),
        );
        assert_eq!(config.upstream.url, "http://127.0.0.1:9/x");
        assert_eq!(config.tracing.service_name, "pokedex");
    }
}
