//! Multi-step wizard: a linear state machine over steps `1..=total_steps`, persisted in
//! local storage after every change.

mod bindings;
mod controller;
mod view;

pub use bindings::Wizard;
pub use controller::{Guard, WizardController, WizardEvent};
pub use view::{DomWizardView, WizardView, panel_step};

use dto::wizard_state::WizardState;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::rc::Rc;

const DEFAULT_TOTAL_STEPS: u32 = 4;
const DEFAULT_WIZARD_ID: &str = "default";

pub struct WizardConfig {
    pub total_steps: u32,
    pub initial_step: u32,
    /// Step titles, first step first.
    pub steps: Vec<String>,
    pub wizard_id: Option<String>,
    /// Conditions to leave a step forward, by step number.
    pub guards: BTreeMap<u32, Guard>,
    /// Shown when `next` is refused by a guard.
    pub blocked_message: Option<String>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            total_steps: DEFAULT_TOTAL_STEPS,
            initial_step: 1,
            steps: vec![],
            wizard_id: None,
            guards: BTreeMap::new(),
            blocked_message: None,
        }
    }
}

impl WizardConfig {
    pub fn with_guard(mut self, step: u32, guard: impl Fn(&WizardState) -> bool + 'static) -> Self {
        self.guards.insert(step, Rc::new(guard));
        self
    }

    pub fn storage_key(&self) -> String {
        let wizard_id = self
            .wizard_id
            .as_deref()
            .filter(|wizard_id| !wizard_id.is_empty())
            .unwrap_or(DEFAULT_WIZARD_ID);
        format!("wizard_{wizard_id}_data")
    }

    /// At least one step, and an initial step within bounds.
    fn normalized(mut self) -> Self {
        self.total_steps = self.total_steps.max(1);
        self.initial_step = self.initial_step.clamp(1, self.total_steps);
        self
    }
}

/// Wizard settings as given by page scripts.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct WizardOptions {
    total_steps: Option<u32>,
    current_step: Option<u32>,
    steps: Vec<String>,
    wizard_id: Option<String>,
    blocked_message: Option<String>,
}

impl From<WizardOptions> for WizardConfig {
    fn from(options: WizardOptions) -> Self {
        let default = WizardConfig::default();
        WizardConfig {
            total_steps: options.total_steps.unwrap_or(default.total_steps),
            initial_step: options.current_step.unwrap_or(default.initial_step),
            steps: options.steps,
            wizard_id: options.wizard_id,
            guards: BTreeMap::new(),
            blocked_message: options.blocked_message,
        }
    }
}
