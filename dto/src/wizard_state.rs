use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub type WizardValues = BTreeMap<String, Value>;

/// Progress of a multi-step wizard, as persisted in local storage.
#[derive(Debug, Getters, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    current_step: u32,
    data: WizardValues,
    validation: WizardValues,
}

impl WizardState {
    pub fn new(current_step: u32) -> Self {
        Self {
            current_step,
            data: WizardValues::new(),
            validation: WizardValues::new(),
        }
    }

    pub fn set_current_step(&mut self, current_step: u32) {
        self.current_step = current_step;
    }

    pub fn insert_data(&mut self, key: String, value: Value) {
        self.data.insert(key, value);
    }

    pub fn insert_validation(&mut self, key: String, value: Value) {
        self.validation.insert(key, value);
    }

    /// Back to the first step, forgetting everything collected so far.
    pub fn reset(&mut self) {
        self.current_step = 1;
        self.data.clear();
        self.validation.clear();
    }

    /// Overwrite the fields present in `patch`, keeping the others.
    pub fn apply(&mut self, patch: WizardStatePatch) {
        if let Some(current_step) = patch.current_step {
            self.current_step = current_step;
        }
        if let Some(data) = patch.data {
            self.data = data;
        }
        if let Some(validation) = patch.validation {
            self.validation = validation;
        }
    }
}

/// A stored wizard state where any field may be missing.
#[derive(Debug, Getters, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WizardStatePatch {
    #[serde(default)]
    current_step: Option<u32>,
    #[serde(default)]
    data: Option<WizardValues>,
    #[serde(default)]
    validation: Option<WizardValues>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_serialize_with_camel_case_keys() {
        let mut state = WizardState::new(2);
        state.insert_data("source".to_owned(), json!("mysql"));

        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json!({"currentStep": 2, "data": {"source": "mysql"}, "validation": {}}),
            value
        );
    }

    #[test]
    fn should_reset_everything() {
        let mut state = WizardState::new(3);
        state.insert_data("rows".to_owned(), json!(1000));
        state.insert_validation("rows".to_owned(), json!(true));

        state.reset();

        assert_eq!(WizardState::new(1), state);
    }

    #[test]
    fn should_apply_partial_patch() {
        let mut state = WizardState::new(1);
        state.insert_data("kept".to_owned(), json!(true));
        let patch: WizardStatePatch = serde_json::from_str(r#"{"currentStep": 3}"#).unwrap();

        state.apply(patch);

        assert_eq!(3, *state.current_step());
        assert_eq!(Some(&json!(true)), state.data().get("kept"));
    }

    #[test]
    fn should_apply_full_patch() {
        let mut state = WizardState::new(1);
        state.insert_data("dropped".to_owned(), json!(true));
        let patch: WizardStatePatch = serde_json::from_str(
            r#"{"currentStep": 2, "data": {"name": "demo"}, "validation": {"name": false}}"#,
        )
        .unwrap();

        state.apply(patch);

        assert_eq!(2, *state.current_step());
        assert_eq!(None, state.data().get("dropped"));
        assert_eq!(Some(&json!("demo")), state.data().get("name"));
        assert_eq!(Some(&json!(false)), state.validation().get("name"));
    }

    #[test]
    fn should_reject_wrong_shape() {
        assert!(serde_json::from_str::<WizardStatePatch>(r#"{"currentStep": "two"}"#).is_err());
        assert!(serde_json::from_str::<WizardStatePatch>("[1, 2]").is_err());
    }
}
