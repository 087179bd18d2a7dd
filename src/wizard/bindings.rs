use crate::Result;
use crate::component::alert::{AlertLevel, create_alert, unwrap_or_alert};
use crate::storage::JsonStorage;
use crate::timing::Throttler;
use crate::utils::{add_event_handler, get_document};
use crate::wizard::controller::{Guard, WizardController, WizardEvent};
use crate::wizard::view::DomWizardView;
use crate::wizard::{WizardConfig, WizardOptions};
use dto::wizard_state::WizardState;
use js_sys::{Array, Function, Object};
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, KeyboardEvent};

const KEYBOARD_THROTTLE: u32 = 200;

type SharedController = Rc<RefCell<WizardController<DomWizardView>>>;

/// A wizard bound to the current page. Each page creates and keeps its own.
#[wasm_bindgen]
pub struct Wizard {
    controller: SharedController,
}

#[wasm_bindgen]
impl Wizard {
    /// `options` follows `{ totalSteps, currentStep, steps, wizardId, blockedMessage }`,
    /// `guards` maps step numbers to functions receiving the wizard state.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue, guards: Option<Object>) -> Wizard {
        let options = if options.is_undefined() || options.is_null() {
            WizardOptions::default()
        } else {
            unwrap_or_alert(serde_wasm_bindgen::from_value(options).map_err(Into::into))
        };
        let mut config = WizardConfig::from(options);
        if let Some(guards) = guards {
            config.guards = read_guards(&guards);
        }

        let view = match get_document() {
            Ok(document) => DomWizardView::new(&document),
            Err(error) => {
                log::error!("Can't bind wizard to the page: {error:?}");
                return Self::detached(config);
            }
        };
        let mut controller = WizardController::new(config, JsonStorage::local_or_memory(), view);
        controller.subscribe(log_event);

        let wizard = Wizard {
            controller: Rc::new(RefCell::new(controller)),
        };
        unwrap_or_alert(wizard.bind_events());
        wizard
    }

    pub fn next(&self) {
        next(&self.controller);
    }

    pub fn prev(&self) {
        with_controller(&self.controller, |controller| {
            controller.prev();
        });
    }

    pub fn go_to_step(&self, step: u32) {
        with_controller(&self.controller, |controller| {
            controller.go_to_step(step);
        });
    }

    pub fn restart(&self) {
        with_controller(&self.controller, WizardController::restart);
    }

    pub fn can_proceed(&self, step: u32) -> bool {
        read_controller(&self.controller, |controller| controller.can_proceed(step))
    }

    pub fn current_step(&self) -> u32 {
        read_controller(&self.controller, WizardController::current_step)
    }

    pub fn total_steps(&self) -> u32 {
        read_controller(&self.controller, WizardController::total_steps)
    }

    pub fn step_title(&self, step: u32) -> Option<String> {
        read_controller(&self.controller, |controller| {
            controller.step_title(step).map(str::to_owned)
        })
    }

    pub fn set_wizard_data(&self, key: &str, value: JsValue) {
        if let Some(value) = read_value(value) {
            with_controller(&self.controller, |controller| {
                controller.set_wizard_data(key, value)
            });
        }
    }

    pub fn get_wizard_data(&self, key: &str) -> JsValue {
        read_controller(&self.controller, |controller| {
            write_value(controller.get_wizard_data(key))
        })
    }

    pub fn set_validation(&self, key: &str, value: JsValue) {
        if let Some(value) = read_value(value) {
            with_controller(&self.controller, |controller| {
                controller.set_validation(key, value)
            });
        }
    }

    pub fn validation(&self, key: &str) -> JsValue {
        read_controller(&self.controller, |controller| {
            write_value(controller.validation(key))
        })
    }

    /// The whole state, as persisted.
    pub fn state(&self) -> JsValue {
        read_controller(&self.controller, |controller| state_to_js(controller.state()))
    }

    /// Call `listener` with `{type: "stepChanged", step}` or `{type: "restarted"}` after each
    /// change. Returns 0 when the wizard is busy and the listener was not registered.
    pub fn subscribe(&self, listener: Function) -> u32 {
        with_controller(&self.controller, |controller| {
            let id = controller.subscribe(move |event| {
                let listener = listener.clone();
                let event = event
                    .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
                    .unwrap_or(JsValue::NULL);
                // Deferred so that the listener may drive the wizard itself.
                spawn_local(async move {
                    if let Err(error) = listener.call1(&JsValue::NULL, &event) {
                        log::error!("Wizard listener failed: {error:?}");
                    }
                });
            });
            u32::from(id)
        })
    }

    pub fn unsubscribe(&self, id: u32) -> bool {
        with_controller(&self.controller, |controller| {
            controller.unsubscribe(id.into())
        })
    }
}

impl Wizard {
    /// A wizard that works without a page, for instance when the document can't be reached.
    fn detached(config: WizardConfig) -> Wizard {
        let view = DomWizardView::empty();
        let controller = WizardController::new(config, JsonStorage::local_or_memory(), view);
        Wizard {
            controller: Rc::new(RefCell::new(controller)),
        }
    }

    fn bind_events(&self) -> Result<()> {
        let document = get_document()?;
        let (indicators, prev_button, next_button) = {
            let controller = self.controller.borrow();
            let view = controller.view();
            (
                view.indicators().to_vec(),
                view.prev_button().cloned(),
                view.next_button().cloned(),
            )
        };

        for (step, indicator) in (1..).zip(indicators) {
            let controller = self.controller.clone();
            add_event_handler(&indicator, "click", move |_: Event| {
                with_controller(&controller, |controller| {
                    if step <= controller.current_step() {
                        controller.go_to_step(step);
                    }
                });
            })?;
        }

        if let Some(prev_button) = prev_button {
            let controller = self.controller.clone();
            add_event_handler(&prev_button, "click", move |_: Event| {
                with_controller(&controller, |controller| {
                    controller.prev();
                });
            })?;
        }

        if let Some(next_button) = next_button {
            let controller = self.controller.clone();
            add_event_handler(&next_button, "click", move |_: Event| next(&controller))?;
        }

        let controller = self.controller.clone();
        let throttler = Throttler::new(KEYBOARD_THROTTLE);
        add_event_handler(&document, "keydown", move |event: KeyboardEvent| {
            if !event.ctrl_key() {
                return;
            }
            match event.key().as_str() {
                "ArrowLeft" => {
                    event.prevent_default();
                    throttler.call(|| {
                        with_controller(&controller, |controller| {
                            controller.prev();
                        })
                    });
                }
                "ArrowRight" => {
                    event.prevent_default();
                    throttler.call(|| next(&controller));
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}

// Guards run while the controller is borrowed, and may call back into the handle.
fn with_controller<T: Default>(
    controller: &SharedController,
    action: impl FnOnce(&mut WizardController<DomWizardView>) -> T,
) -> T {
    match controller.try_borrow_mut() {
        Ok(mut controller) => action(&mut controller),
        Err(_) => {
            log::warn!("Wizard is busy, ignoring change");
            T::default()
        }
    }
}

fn read_controller<T: Default>(
    controller: &SharedController,
    read: impl FnOnce(&WizardController<DomWizardView>) -> T,
) -> T {
    match controller.try_borrow() {
        Ok(controller) => read(&controller),
        Err(_) => {
            log::warn!("Wizard is busy, use the state given to the guard instead");
            T::default()
        }
    }
}

/// Move forward, telling the user when a guard refuses to.
fn next(controller: &SharedController) {
    with_controller(controller, |controller| {
        if controller.is_blocked() {
            if let Some(message) = &controller.config().blocked_message {
                create_alert(message, AlertLevel::Warning);
            }
            return;
        }
        controller.next();
    });
}

fn log_event(event: &WizardEvent) {
    match event {
        WizardEvent::StepChanged { step } => log::info!("Wizard step changed to {step}"),
        WizardEvent::Restarted => log::info!("Wizard restarted"),
    }
}

fn read_guards(guards: &Object) -> BTreeMap<u32, Guard> {
    let mut result = BTreeMap::new();
    for entry in Object::entries(guards).iter() {
        let entry = Array::from(&entry);
        let step = entry.get(0).as_string().and_then(|step| step.parse::<u32>().ok());
        let function = entry.get(1).dyn_into::<Function>().ok();
        match (step, function) {
            (Some(step), Some(function)) => {
                result.insert(step, js_guard(function));
            }
            _ => log::warn!("Ignoring wizard guard {:?}", entry.get(0)),
        }
    }
    result
}

/// A guard delegating to a page function. A function that throws blocks the step.
fn js_guard(function: Function) -> Guard {
    Rc::new(move |state: &WizardState| {
        match function.call1(&JsValue::NULL, &state_to_js(state)) {
            Ok(result) => result.is_truthy(),
            Err(error) => {
                log::error!("Wizard guard failed: {error:?}");
                false
            }
        }
    })
}

fn state_to_js(state: &WizardState) -> JsValue {
    state
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

fn read_value(value: JsValue) -> Option<Value> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|error| log::error!("Can't store wizard value: {error}"))
        .ok()
}

fn write_value(value: Option<&Value>) -> JsValue {
    value
        .and_then(|value| {
            value
                .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
                .ok()
        })
        .unwrap_or(JsValue::UNDEFINED)
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn should_drive_wizard_from_script() {
        let options = serde_wasm_bindgen::to_value(&serde_json::json!({
            "totalSteps": 3,
            "wizardId": "browser_test",
        }))
        .unwrap();
        let wizard = Wizard::new(options, None);
        wizard.restart();

        wizard.next();
        wizard.set_wizard_data("source", JsValue::from_str("csv"));

        assert_eq!(2, wizard.current_step());
        assert_eq!(Some("csv".to_owned()), wizard.get_wizard_data("source").as_string());
        assert!(wizard.get_wizard_data("missing").is_undefined());
        wizard.restart();
        assert_eq!(1, wizard.current_step());
    }

    #[wasm_bindgen_test]
    fn should_apply_script_guards() {
        let options = serde_wasm_bindgen::to_value(&serde_json::json!({
            "wizardId": "browser_guard_test",
        }))
        .unwrap();
        let guards = Object::new();
        js_sys::Reflect::set(
            &guards,
            &JsValue::from_str("1"),
            &Function::new_with_args("state", "return state.data.ready === true"),
        )
        .unwrap();
        let wizard = Wizard::new(options, Some(guards));
        wizard.restart();

        wizard.next();
        assert_eq!(1, wizard.current_step());

        wizard.set_wizard_data("ready", JsValue::TRUE);
        wizard.next();
        assert_eq!(2, wizard.current_step());
        wizard.restart();
    }

    #[wasm_bindgen_test]
    fn should_survive_guard_reading_the_wizard() {
        let shared: Rc<RefCell<Option<SharedController>>> = Rc::new(RefCell::new(None));
        let guard_calls = Rc::new(RefCell::new(0));
        let guard = {
            let shared = shared.clone();
            let guard_calls = guard_calls.clone();
            Closure::wrap(Box::new(move |_state: JsValue| -> bool {
                *guard_calls.borrow_mut() += 1;
                let Some(controller) = shared.borrow().clone() else {
                    return true;
                };
                let wizard = Wizard { controller };
                // The controller is busy here: reads fall back to neutral values.
                wizard.get_wizard_data("file").is_truthy() && wizard.can_proceed(2)
            }) as Box<dyn Fn(JsValue) -> bool>)
        };
        let guards = Object::new();
        js_sys::Reflect::set(&guards, &JsValue::from_str("1"), guard.as_ref()).unwrap();
        guard.forget();

        let options = serde_wasm_bindgen::to_value(&serde_json::json!({
            "wizardId": "browser_reentrant_guard_test",
        }))
        .unwrap();
        let wizard = Wizard::new(options, Some(guards));
        wizard.restart();
        shared.replace(Some(wizard.controller.clone()));

        wizard.set_wizard_data("file", JsValue::from_str("members.csv"));
        wizard.next();

        assert!(*guard_calls.borrow() > 0);
        assert_eq!(1, wizard.current_step());
        assert_eq!(
            Some("members.csv".to_owned()),
            wizard.get_wizard_data("file").as_string()
        );
        {
            let _busy = wizard.controller.borrow_mut();
            assert_eq!(0, wizard.current_step());
            assert!(wizard.get_wizard_data("file").is_undefined());
            assert_eq!(0, wizard.subscribe(Function::new_no_args("")));
            assert!(!wizard.unsubscribe(1));
        }
        wizard.restart();
    }
}
