use crate::listeners::{ListenerId, Listeners};
use crate::storage::JsonStorage;
use crate::wizard::WizardConfig;
use crate::wizard::view::WizardView;
use dto::wizard_state::{WizardState, WizardStatePatch};
use serde::Serialize;
use serde_json::Value;
use std::rc::Rc;

pub type Guard = Rc<dyn Fn(&WizardState) -> bool>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WizardEvent {
    StepChanged { step: u32 },
    Restarted,
}

pub struct WizardController<V: WizardView> {
    config: WizardConfig,
    state: WizardState,
    storage: JsonStorage,
    view: V,
    listeners: Listeners<WizardEvent>,
}

impl<V: WizardView> WizardController<V> {
    /// Resume the state stored for this wizard, if any and valid, then render it.
    pub fn new(config: WizardConfig, storage: JsonStorage, view: V) -> Self {
        let config = config.normalized();
        let state = load_state(&config, &storage)
            .unwrap_or_else(|| WizardState::new(config.initial_step));
        let controller = Self {
            config,
            state,
            storage,
            view,
            listeners: Listeners::default(),
        };
        controller.refresh();
        controller
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn current_step(&self) -> u32 {
        *self.state.current_step()
    }

    pub fn total_steps(&self) -> u32 {
        self.config.total_steps
    }

    pub fn step_title(&self, step: u32) -> Option<&str> {
        let index = usize::try_from(step).ok()?.checked_sub(1)?;
        self.config.steps.get(index).map(String::as_str)
    }

    /// Whether the guard of `step` lets the user move forward. Steps without guard always do.
    pub fn can_proceed(&self, step: u32) -> bool {
        self.config
            .guards
            .get(&step)
            .is_none_or(|guard| guard(&self.state))
    }

    /// Whether `next` would be refused by a guard rather than by the last step.
    pub fn is_blocked(&self) -> bool {
        self.current_step() < self.total_steps() && !self.can_proceed(self.current_step())
    }

    // region Transitions
    pub fn next(&mut self) -> bool {
        let current_step = self.current_step();
        if !self.can_proceed(current_step) || current_step >= self.total_steps() {
            return false;
        }
        self.move_to(current_step + 1);
        true
    }

    pub fn prev(&mut self) -> bool {
        let current_step = self.current_step();
        if current_step <= 1 {
            return false;
        }
        self.move_to(current_step - 1);
        true
    }

    /// Jump to `step` without consulting any guard. Out of range steps are ignored.
    pub fn go_to_step(&mut self, step: u32) -> bool {
        if !(1..=self.total_steps()).contains(&step) {
            log::debug!("Ignoring step {step} out of 1..={}", self.total_steps());
            return false;
        }
        self.move_to(step);
        true
    }

    pub fn restart(&mut self) {
        self.state.reset();
        self.refresh();
        self.save();
        self.notify(&WizardEvent::Restarted);
    }

    fn move_to(&mut self, step: u32) {
        self.state.set_current_step(step);
        self.refresh();
        self.save();
        self.notify(&WizardEvent::StepChanged { step });
    }
    // endregion

    // region Data
    pub fn set_wizard_data(&mut self, key: &str, value: Value) {
        self.state.insert_data(key.to_owned(), value);
        self.save();
        self.refresh_navigation();
    }

    pub fn get_wizard_data(&self, key: &str) -> Option<&Value> {
        self.state.data().get(key)
    }

    pub fn set_validation(&mut self, key: &str, value: Value) {
        self.state.insert_validation(key.to_owned(), value);
        self.save();
        self.refresh_navigation();
    }

    pub fn validation(&self, key: &str) -> Option<&Value> {
        self.state.validation().get(key)
    }
    // endregion

    // region Listeners
    pub fn subscribe(&mut self, listener: impl Fn(&WizardEvent) + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn notify(&self, event: &WizardEvent) {
        self.listeners.notify(event);
    }
    // endregion

    fn refresh(&self) {
        self.view.render_step(self.current_step(), self.total_steps());
        self.refresh_navigation();
    }

    fn refresh_navigation(&self) {
        let current_step = self.current_step();
        let prev_enabled = current_step > 1;
        let next_enabled = self.can_proceed(current_step) && current_step < self.total_steps();
        self.view.set_navigation(prev_enabled, next_enabled);
    }

    fn save(&self) {
        self.storage.set(&self.config.storage_key(), &self.state);
    }
}

/// The stored state merged over the initial one. Anything unreadable or out of bounds is ignored.
fn load_state(config: &WizardConfig, storage: &JsonStorage) -> Option<WizardState> {
    let key = config.storage_key();
    let patch = match storage.try_get::<WizardStatePatch>(&key) {
        Ok(patch) => patch?,
        Err(error) => {
            log::warn!("Ignoring stored wizard state `{key}`: {error}");
            return None;
        }
    };

    let mut state = WizardState::new(config.initial_step);
    state.apply(patch);
    let step = *state.current_step();
    if !(1..=config.total_steps).contains(&step) {
        log::warn!(
            "Ignoring stored wizard state `{key}`: step {step} out of 1..={}",
            config.total_steps
        );
        return None;
    }
    Some(state)
}
