use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_when_unset() {
    let config = HostConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config.port, 3000);
    assert_eq!(config.bind_addr, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    assert_eq!(config.dist_dir, PathBuf::from("client/dist"));
    assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
}

#[test]
fn reads_every_variable() {
    let config =
        HostConfig::from_lookup(lookup(&[("PORT", "8080"), ("BIND_ADDR", "127.0.0.1"), ("DIST_DIR", "/srv/app")]))
            .unwrap();
    assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
    assert_eq!(config.dist_dir, PathBuf::from("/srv/app"));
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let config = HostConfig::from_lookup(lookup(&[("PORT", "  "), ("DIST_DIR", "")])).unwrap();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.dist_dir, PathBuf::from(DEFAULT_DIST_DIR));
}

#[test]
fn invalid_port_is_rejected() {
    assert_eq!(
        HostConfig::from_lookup(lookup(&[("PORT", "http")])),
        Err(ConfigError::InvalidPort("http".to_owned()))
    );
    assert_eq!(
        HostConfig::from_lookup(lookup(&[("PORT", "70000")])),
        Err(ConfigError::InvalidPort("70000".to_owned()))
    );
}

#[test]
fn invalid_bind_addr_is_rejected() {
    assert_eq!(
        HostConfig::from_lookup(lookup(&[("BIND_ADDR", "localhost")])),
        Err(ConfigError::InvalidBindAddr("localhost".to_owned()))
    );
}

#[test]
fn ipv6_bind_addr_is_accepted() {
    let config = HostConfig::from_lookup(lookup(&[("BIND_ADDR", "::1"), ("PORT", "9000")])).unwrap();
    assert_eq!(config.socket_addr().to_string(), "[::1]:9000");
}
