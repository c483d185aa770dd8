//! Config loading and defaults integration tests

use std::io::Write;

use qearn_client::constants::{DEFAULT_EXPIRY_TICK_OFFSET, MIN_LOCK_AMOUNT, UNLOCK_INPUT_TYPE};
use qearn_client::{AggregateEpoch, QearnConfig};

#[test]
fn test_empty_config_uses_defaults() {
    let config = QearnConfig::from_toml_str("").expect("empty TOML");
    assert_eq!(config, QearnConfig::default());
    assert_eq!(config.rpc.base_url, "https://rpc.qubic.org");
    assert_eq!(config.protocol.query_contract_index, 6);
    assert_eq!(config.protocol.transaction_contract_index, 1);
    assert_eq!(config.protocol.unlock_input_type, UNLOCK_INPUT_TYPE);
    assert_eq!(config.protocol.expiry_tick_offset, DEFAULT_EXPIRY_TICK_OFFSET);
    assert_eq!(config.protocol.min_lock_amount, MIN_LOCK_AMOUNT);
    assert_eq!(config.history.aggregate_epoch, AggregateEpoch::PerIteration);
}

#[test]
fn test_config_with_overrides() {
    let toml_str = r#"
[rpc]
base_url = "http://localhost:8000"

[protocol]
version = "qearn-next"
unlock_input_type = 12
expiry_tick_offset = 5
min_lock_amount = 1000

[history]
max_concurrent_queries = 1
aggregate_epoch = "latest"
"#;

    let config = QearnConfig::from_toml_str(toml_str).expect("valid TOML");
    assert_eq!(config.rpc.base_url, "http://localhost:8000");
    assert_eq!(config.rpc.timeout_secs, 30);
    assert_eq!(config.protocol.version, "qearn-next");
    assert_eq!(config.protocol.unlock_input_type, 12);
    assert_eq!(config.protocol.lock_input_type, 1);
    assert_eq!(config.protocol.expiry_tick_offset, 5);
    assert_eq!(config.protocol.min_lock_amount, 1000);
    assert_eq!(config.history.max_concurrent_queries, 1);
    assert_eq!(config.history.aggregate_epoch, AggregateEpoch::Latest);
}

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[rpc]\ntimeout_secs = 3").unwrap();

    let config = QearnConfig::from_file(file.path()).unwrap();
    assert_eq!(config.rpc.timeout_secs, 3);
}

#[test]
fn test_invalid_config() {
    assert!(QearnConfig::from_toml_str("[history]\naggregate_epoch = \"sometimes\"").is_err());
    assert!(QearnConfig::from_file("/nonexistent/qearn.toml").is_err());
}
