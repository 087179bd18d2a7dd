//! Settings of the locally hosted model, edited through the `local-url`, `local-model`
//! and `local-timeout` fields and kept in local storage.

use crate::component::alert::{AlertLevel, create_alert};
use crate::storage::JsonStorage;
use crate::utils::{get_document, get_input_value, set_input_value};
use chrono::{DateTime, Utc};
use dto::model_endpoint_config::{DEFAULT_TIMEOUT, ModelEndpointConfig};
use wasm_bindgen::prelude::wasm_bindgen;

pub const LOCAL_CONFIG_KEY: &str = "local_config";
const URL_FIELD_ID: &str = "local-url";
const MODEL_FIELD_ID: &str = "local-model";
const TIMEOUT_FIELD_ID: &str = "local-timeout";

/// Build the configuration from raw field values.
/// A missing or invalid timeout falls back to the default.
pub fn config_from_fields(
    url: Option<String>,
    model: Option<String>,
    timeout: Option<String>,
    now: DateTime<Utc>,
) -> ModelEndpointConfig {
    let timeout = timeout
        .and_then(|timeout| timeout.trim().parse::<u32>().ok())
        .filter(|timeout| *timeout > 0)
        .unwrap_or(DEFAULT_TIMEOUT);
    ModelEndpointConfig::new(
        url.unwrap_or_default().trim().to_owned(),
        model.unwrap_or_default().trim().to_owned(),
        timeout,
        Some(now),
    )
}

pub fn save_config(storage: &JsonStorage, config: &ModelEndpointConfig) -> bool {
    storage.set(LOCAL_CONFIG_KEY, config)
}

pub fn load_config(storage: &JsonStorage) -> Option<ModelEndpointConfig> {
    storage.get(LOCAL_CONFIG_KEY)
}

/// Save the content of the configuration fields.
#[wasm_bindgen]
pub fn save_local_config() -> bool {
    let Ok(document) = get_document() else {
        return false;
    };
    let config = config_from_fields(
        get_input_value(&document, URL_FIELD_ID),
        get_input_value(&document, MODEL_FIELD_ID),
        get_input_value(&document, TIMEOUT_FIELD_ID),
        Utc::now(),
    );

    let saved = save_config(&JsonStorage::local_or_memory(), &config);
    if saved {
        log::info!("Local model configuration saved");
        create_alert("Configuration saved", AlertLevel::Success);
    } else {
        create_alert("Can't save the configuration", AlertLevel::Error);
    }
    saved
}

/// Fill the configuration fields with the saved configuration, if any.
#[wasm_bindgen]
pub fn load_local_config() -> bool {
    let Ok(document) = get_document() else {
        return false;
    };
    let Some(config) = load_config(&JsonStorage::local_or_memory()) else {
        log::debug!("No local model configuration to load");
        return false;
    };

    set_input_value(&document, URL_FIELD_ID, config.url());
    set_input_value(&document, MODEL_FIELD_ID, config.model());
    set_input_value(&document, TIMEOUT_FIELD_ID, &config.timeout().to_string());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};
    use chrono::TimeZone;
    use parameterized::{ide, parameterized};

    ide!();

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
    }

    #[parameterized(
        timeout = { Some("60"), Some(" 45 "), Some(""), Some("soon"), Some("0"), None },
        expected = { 60, 45, 30, 30, 30, 30 }
    )]
    fn should_read_timeout(timeout: Option<&str>, expected: u32) {
        let config = config_from_fields(None, None, timeout.map(str::to_owned), now());
        assert_eq!(expected, *config.timeout());
    }

    #[test]
    fn should_trim_fields() {
        let config = config_from_fields(
            Some(" http://localhost:11434 ".to_owned()),
            Some("llama3\n".to_owned()),
            None,
            now(),
        );
        assert_eq!("http://localhost:11434", config.url());
        assert_eq!("llama3", config.model());
        assert_eq!(&Some(now()), config.timestamp());
    }

    #[test]
    fn should_save_and_load_config() {
        let store = MemoryStore::new();
        let storage = JsonStorage::new(store.clone());
        let config = config_from_fields(
            Some("http://localhost:8000".to_owned()),
            Some("qwen".to_owned()),
            Some("10".to_owned()),
            now(),
        );

        assert!(save_config(&storage, &config));

        assert!(store.get_item(LOCAL_CONFIG_KEY).unwrap().is_some());
        assert_eq!(Some(config), load_config(&storage));
    }

    #[test]
    fn should_load_config_written_by_older_pages() {
        let store = MemoryStore::new();
        store
            .set_item(
                LOCAL_CONFIG_KEY,
                r#"{"url": "http://localhost:8000", "model": "qwen", "timeout": "45"}"#,
            )
            .unwrap();

        let config = load_config(&JsonStorage::new(store)).unwrap();

        assert_eq!(45, *config.timeout());
        assert_eq!(&None, config.timestamp());
    }
}
