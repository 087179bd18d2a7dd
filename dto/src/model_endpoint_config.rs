use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_TIMEOUT: u32 = 30;

/// Connection settings of a locally hosted model, kept in local storage by the settings page.
#[derive(Debug, Getters, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct ModelEndpointConfig {
    #[serde(default)]
    url: String,
    #[serde(default)]
    model: String,
    #[serde(default = "default_timeout", deserialize_with = "deserialize_timeout")]
    timeout: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
}

impl ModelEndpointConfig {
    pub fn new(url: String, model: String, timeout: u32, timestamp: Option<DateTime<Utc>>) -> Self {
        Self {
            url,
            model,
            timeout,
            timestamp,
        }
    }
}

impl Default for ModelEndpointConfig {
    fn default() -> Self {
        Self::new(String::new(), String::new(), DEFAULT_TIMEOUT, None)
    }
}

fn default_timeout() -> u32 {
    DEFAULT_TIMEOUT
}

/// Form fields store the timeout as text, so both `30` and `"30"` are accepted.
fn deserialize_timeout<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Timeout {
        Number(u32),
        Text(String),
    }

    Ok(match Timeout::deserialize(deserializer)? {
        Timeout::Number(timeout) => timeout,
        Timeout::Text(text) => text.trim().parse().unwrap_or(DEFAULT_TIMEOUT),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use parameterized::{ide, parameterized};

    ide!();

    #[parameterized(
        body = {
            r#"{"url": "http://localhost:11434/api/generate", "model": "deepseek-r1", "timeout": 45}"#,
            r#"{"url": "http://localhost:11434/api/generate", "model": "deepseek-r1", "timeout": "45"}"#,
            r#"{"url": "http://localhost:11434/api/generate", "model": "deepseek-r1", "timeout": "oops"}"#,
            r#"{"url": "http://localhost:11434/api/generate", "model": "deepseek-r1"}"#,
        },
        expected_timeout = { 45, 45, DEFAULT_TIMEOUT, DEFAULT_TIMEOUT }
    )]
    fn should_read_timeout(body: &str, expected_timeout: u32) {
        let config: ModelEndpointConfig = serde_json::from_str(body).unwrap();
        assert_eq!(expected_timeout, *config.timeout());
        assert_eq!("deepseek-r1", config.model());
    }

    #[test]
    fn should_keep_timestamp() {
        let timestamp = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let config = ModelEndpointConfig::new(
            "http://localhost:11434".to_owned(),
            "deepseek-r1".to_owned(),
            30,
            Some(timestamp),
        );
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("2025-03-14T09:26:53Z"));
        let config_back: ModelEndpointConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, config_back);
    }
}
