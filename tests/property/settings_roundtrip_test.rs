//! Property-based tests for AppSettings serialization round-trip.
//!
//! These tests verify that AppSettings can be serialized to JSON and
//! deserialized back without data loss for arbitrary valid inputs.

use proptest::prelude::*;

use tab_collections::types::settings::{
    AppSettings, ExportSettings, LoggingSettings, StorageBackend, StorageSettings,
};

fn arb_backend() -> impl Strategy<Value = StorageBackend> {
    prop_oneof![
        Just(StorageBackend::Json),
        Just(StorageBackend::Sqlite),
        Just(StorageBackend::Memory),
    ]
}

fn arb_storage_settings() -> impl Strategy<Value = StorageSettings> {
    (
        arb_backend(),
        proptest::option::of("/[a-z0-9_/-]{1,40}"),
        "[A-Za-z0-9_-]{1,20}",
    )
        .prop_map(|(backend, data_dir, key)| StorageSettings {
            backend,
            data_dir,
            key,
        })
}

fn arb_export_settings() -> impl Strategy<Value = ExportSettings> {
    (any::<bool>(), proptest::option::of("/[a-z0-9_/-]{1,40}"))
        .prop_map(|(pretty, directory)| ExportSettings { pretty, directory })
}

fn arb_logging_settings() -> impl Strategy<Value = LoggingSettings> {
    prop_oneof![
        Just("error"),
        Just("warn"),
        Just("info"),
        Just("debug"),
        Just("trace"),
    ]
    .prop_map(|level| LoggingSettings {
        level: level.to_string(),
    })
}

fn arb_app_settings() -> impl Strategy<Value = AppSettings> {
    (
        arb_storage_settings(),
        arb_export_settings(),
        arb_logging_settings(),
    )
        .prop_map(|(storage, export, logging)| AppSettings {
            storage,
            export,
            logging,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Serializing then deserializing settings yields an equal value.
    #[test]
    fn settings_json_roundtrip(settings in arb_app_settings()) {
        let json = serde_json::to_string_pretty(&settings).unwrap();
        let decoded: AppSettings = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(decoded, settings);
    }
}
