use std::collections::HashMap;

use super::*;

fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
    let vars: HashMap<String, String> = vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    AppConfig::from_lookup(|key| vars.get(key).cloned())
}

// =============================================================================
// parse_bool
// =============================================================================

#[test]
fn parse_bool_variants() {
    for raw in ["1", "true", "YES", " On "] {
        assert_eq!(parse_bool(raw), Some(true), "expected true for {raw:?}");
    }
    for raw in ["0", "false", "No", "OFF"] {
        assert_eq!(parse_bool(raw), Some(false), "expected false for {raw:?}");
    }
    assert_eq!(parse_bool("maybe"), None);
    assert_eq!(parse_bool(""), None);
}

// =============================================================================
// AppConfig
// =============================================================================

#[test]
fn defaults_apply_when_unset() {
    let cfg = config(&[]).unwrap();
    assert_eq!(cfg.host, DEFAULT_HOST);
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.static_cache_id, env!("CARGO_PKG_VERSION"));
    assert!(cfg.content_dir.ends_with("content"));
    assert!(cfg.static_dir.ends_with("static"));
    assert!(cfg.admin_logins.is_empty());
    assert!(!cfg.cookie_secure);
    assert_eq!(cfg.bind_addr(), "0.0.0.0:8080");
}

#[test]
fn explicit_values_override_defaults() {
    let cfg = config(&[
        ("HOST", "127.0.0.1"),
        ("PORT", "3000"),
        ("BASE_URL", "https://example.dev/"),
        ("STATIC_CACHE_ID", "abc123"),
        ("ADMIN_LOGINS", " alice, ,bob "),
        ("CONTENT_DIR", "/srv/content"),
    ])
    .unwrap();
    assert_eq!(cfg.bind_addr(), "127.0.0.1:3000");
    assert_eq!(cfg.base_url, "https://example.dev");
    assert_eq!(cfg.static_prefix(), "/static/abc123");
    assert_eq!(cfg.admin_logins, vec!["alice", "bob"]);
    assert_eq!(cfg.content_dir, PathBuf::from("/srv/content"));
    assert!(cfg.cookie_secure, "https base url implies secure cookies");
}

#[test]
fn cookie_secure_flag_wins_over_scheme() {
    let cfg = config(&[("BASE_URL", "https://example.dev"), ("COOKIE_SECURE", "off")]).unwrap();
    assert!(!cfg.cookie_secure);
}

#[test]
fn blank_values_count_as_unset() {
    let cfg = config(&[("PORT", "  "), ("HOST", "")]).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.host, DEFAULT_HOST);
}

#[test]
fn invalid_values_are_errors() {
    let err = config(&[("PORT", "eighty")]).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));
    assert!(err.to_string().starts_with("PORT=\"eighty\""));

    let err = config(&[("PORT", "70000")]).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));

    let err = config(&[("COOKIE_SECURE", "sometimes")]).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "COOKIE_SECURE", .. }));

    let err = config(&[("STATIC_CACHE_ID", "a/b")]).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "STATIC_CACHE_ID", .. }));
}


#[test]
fn admin_sessions_pair_sessions_with_admin_logins() {
    let cfg = config(&[("ADMIN_LOGINS", "alice,bob"), ("ADMIN_SESSIONS", " s1:alice , s2:bob,")]).unwrap();
    assert_eq!(cfg.admin_sessions, vec![("s1".to_owned(), "alice".to_owned()), ("s2".to_owned(), "bob".to_owned())]);

    assert!(config(&[]).unwrap().admin_sessions.is_empty());
}

#[test]
fn malformed_admin_sessions_are_errors() {
    for raw in ["s1", "s1:", ":alice", "s1:mallory", "s1:alice,s1:alice"] {
        let err = config(&[("ADMIN_LOGINS", "alice"), ("ADMIN_SESSIONS", raw)]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "ADMIN_SESSIONS", .. }), "{raw}");
    }
}
