//! Integration tests for layered configuration loading.
//!
//! Uses figment::Jail for sandboxed files and env vars.

use ev_config::EvConfig;
use ev_core::enums::Authority;
use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;

#[test]
fn loads_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = "/tmp/evidence-test.db"
lock_timeout_ms = 250

[query]
max_page_size = 50
default_page_size = 10

[identity]
user = "alice"
authorities = ["CRE", "UPD"]
"#,
        )?;

        let figment = Figment::from(Serialized::defaults(EvConfig::default()))
            .merge(Toml::file("config.toml"));
        let config = EvConfig::from_figment(&figment).expect("config loads");

        assert_eq!(config.database.path, "/tmp/evidence-test.db");
        assert_eq!(config.database.lock_timeout_ms, 250);
        assert_eq!(config.query.max_page_size, 50);
        assert_eq!(config.query.default_page_size, 10);
        assert_eq!(config.identity.user, "alice");
        assert_eq!(
            config.identity.authorities,
            vec![Authority::Create, Authority::Update]
        );
        Ok(())
    });
}

#[test]
fn project_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".evidence")?;
        jail.create_file(
            ".evidence/config.toml",
            r#"
[database]
lock_timeout_ms = 1200
"#,
        )?;

        let config = EvConfig::load().expect("config loads");
        assert_eq!(config.database.lock_timeout_ms, 1200);
        assert_eq!(config.database.path, ".evidence/evidence.db");
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".evidence")?;
        jail.create_file(
            ".evidence/config.toml",
            r#"
[query]
max_page_size = 200
"#,
        )?;
        jail.set_env("EVIDENCE_QUERY__MAX_PAGE_SIZE", "300");
        jail.set_env("EVIDENCE_IDENTITY__USER", "bob");

        let config = EvConfig::load().expect("config loads");
        assert_eq!(config.query.max_page_size, 300);
        assert_eq!(config.identity.user, "bob");
        assert_eq!(config.identity.authorities, vec![Authority::Admin]);
        Ok(())
    });
}

#[test]
fn invalid_values_fail_loading() {
    Jail::expect_with(|jail| {
        jail.set_env("EVIDENCE_DATABASE__LOCK_TIMEOUT_MS", "0");
        let err = EvConfig::load().unwrap_err();
        assert!(err.to_string().contains("lock_timeout_ms"));
        Ok(())
    });
}

#[test]
fn malformed_value_is_a_figment_error() {
    Jail::expect_with(|jail| {
        jail.set_env("EVIDENCE_QUERY__MAX_PAGE_SIZE", "lots");
        assert!(matches!(
            EvConfig::load(),
            Err(ev_config::ConfigError::Figment(_))
        ));
        Ok(())
    });
}
