use super::{BalanceFields, Config, ConfigError};

use anyhow::Result;
use chrono::TimeDelta;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

#[test]
fn test_empty_file_yields_defaults() -> Result<()> {
    let file = NamedTempFile::new()?;

    assert_eq!(Config::from_file(file.path())?, Config::default());

    Ok(())
}

#[test]
fn test_partial_file_overrides_only_named_fields() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "base_url = \"https://ledger.example.com/api\"")?;
    writeln!(file, "balance_path = \"api/saldos\"")?;
    writeln!(file, "balance_fields = \"capitalized\"")?;
    writeln!(file, "max_retries = 1")?;
    writeln!(file, "cache_dir = \"/tmp/cc-cache\"")?;

    let config = Config::from_file(file.path())?;

    assert_eq!(config.base_url, "https://ledger.example.com/api");
    assert_eq!(config.balance_path, "api/saldos");
    assert_eq!(config.balance_fields, BalanceFields::Capitalized);
    assert_eq!(config.max_retries, 1);
    assert_eq!(config.cache_directory(), Some(PathBuf::from("/tmp/cc-cache")));
    assert_eq!(config.timeout_secs, 30);
    assert_eq!(config.cache_ttl_hours, 24);

    Ok(())
}

#[test]
fn test_balance_field_casing_names() {
    assert_eq!(BalanceFields::Lower.amount(), "monto");
    assert_eq!(BalanceFields::Lower.last_modified(), "ultimaModificacion");
    assert_eq!(BalanceFields::Capitalized.date(), "Fecha");
    assert_eq!(BalanceFields::Capitalized.last_modified(), "UltimaModificacion");
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let result = Config::load(Some(PathBuf::from("does/not/exist.toml").as_path()));

    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn test_invalid_toml_is_reported_with_path() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "max_retries = \"three\"")?;

    let result = Config::from_file(file.path());

    assert!(matches!(result, Err(ConfigError::Parse { .. })));

    Ok(())
}

#[test]
fn test_zero_health_interval_is_rejected() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "health_interval_secs = 0")?;

    let result = Config::from_file(file.path());

    assert!(matches!(result, Err(ConfigError::Invalid { field: "health_interval_secs", .. })));

    Ok(())
}

#[test]
fn test_unusable_cache_ttl_is_rejected() -> Result<()> {
    for value in ["0", "-5", "9223372036854775807"] {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "cache_ttl_hours = {value}")?;

        let result = Config::from_file(file.path());

        assert!(matches!(result, Err(ConfigError::Invalid { field: "cache_ttl_hours", .. })), "value {value}");
    }

    Ok(())
}

#[test]
fn test_cache_ttl_never_panics_on_out_of_range_hours() {
    let huge = Config { cache_ttl_hours: i64::MAX, ..Config::default() };
    let negative = Config { cache_ttl_hours: -1, ..Config::default() };

    assert_eq!(huge.cache_ttl(), TimeDelta::hours(24));
    assert_eq!(negative.cache_ttl(), TimeDelta::hours(24));
    assert_eq!(Config::default().cache_ttl(), TimeDelta::hours(24));
}
