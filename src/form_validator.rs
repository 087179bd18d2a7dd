//! Declarative field validation: every field has at most one rule, and the first failing
//! check of a rule gives the field its error.

use crate::Result;
use crate::component::alert::unwrap_or_alert;
use crate::error::Error;
use crate::timing::Debouncer;
use crate::utils::{
    add_event_handler, get_document, get_element_by_id_dyn, query_selector_optional,
    toggle_class,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Element, Event, HtmlFormElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement,
};

pub type ValidationErrors = BTreeMap<String, String>;

const LIVE_VALIDATION_DELAY: u32 = 300;
const INVALID_CLASS: &str = "is-invalid";

#[derive(Debug, Clone, Default)]
pub struct FieldRule {
    required: bool,
    pattern: Option<Regex>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    message: Option<String>,
}

impl FieldRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Message replacing every default one for this field.
    pub fn message(mut self, message: &str) -> Self {
        self.message = Some(message.to_owned());
        self
    }

    /// The error for `field` holding `value`, if any.
    /// Optional checks only apply to non-empty values.
    pub fn check(&self, field: &str, value: Option<&str>) -> Option<String> {
        let value = value.unwrap_or_default();
        let default_message = if value.trim().is_empty() {
            if !self.required {
                return None;
            }
            format!("{field} is required")
        } else if self.pattern.as_ref().is_some_and(|pattern| !pattern.is_match(value)) {
            format!("{field} has an invalid format")
        } else if let Some(min_length) =
            self.min_length.filter(|min| value.chars().count() < *min)
        {
            format!("{field} must be at least {min_length} characters long")
        } else if let Some(max_length) =
            self.max_length.filter(|max| value.chars().count() > *max)
        {
            format!("{field} must be at most {max_length} characters long")
        } else {
            return None;
        };
        Some(self.message.clone().unwrap_or(default_message))
    }
}

/// A rule as written by page scripts, e.g. `{ required: true, minLength: 3 }`.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldRuleDefinition {
    required: bool,
    pattern: Option<String>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    message: Option<String>,
}

impl TryFrom<FieldRuleDefinition> for FieldRule {
    type Error = Error;

    fn try_from(definition: FieldRuleDefinition) -> Result<Self> {
        let pattern = definition
            .pattern
            .map(|pattern| {
                Regex::new(&pattern).map_err(|error| {
                    Error::new(
                        "Invalid validation rule.",
                        &format!("Can't compile pattern `{pattern}`: {error}"),
                    )
                })
            })
            .transpose()?;
        Ok(FieldRule {
            required: definition.required,
            pattern,
            min_length: definition.min_length,
            max_length: definition.max_length,
            message: definition.message,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: BTreeMap<String, FieldRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, field: &str, rule: FieldRule) -> Self {
        self.rules.insert(field.to_owned(), rule);
        self
    }

    pub fn from_definitions(definitions: BTreeMap<String, FieldRuleDefinition>) -> Result<Self> {
        let rules = definitions
            .into_iter()
            .map(|(field, definition)| Ok((field, FieldRule::try_from(definition)?)))
            .collect::<Result<_>>()?;
        Ok(Self { rules })
    }

    pub fn fields(&self) -> impl Iterator<Item = &String> {
        self.rules.keys()
    }

    /// Check every field from scratch.
    pub fn validate(&self, values: &BTreeMap<String, String>) -> ValidationErrors {
        self.rules
            .iter()
            .filter_map(|(field, rule)| {
                rule.check(field, values.get(field).map(String::as_str))
                    .map(|message| (field.clone(), message))
            })
            .collect()
    }
}

/// Read form values given as a plain object. `null` counts as missing.
pub fn values_from_json(values: BTreeMap<String, Value>) -> BTreeMap<String, String> {
    values
        .into_iter()
        .filter_map(|(field, value)| match value {
            Value::Null => None,
            Value::String(text) => Some((field, text)),
            value => Some((field, value.to_string())),
        })
        .collect()
}

#[derive(Default)]
struct ValidatorState {
    rules: RuleSet,
    errors: ValidationErrors,
}

impl ValidatorState {
    fn validate(&mut self, values: &BTreeMap<String, String>) -> bool {
        self.errors = self.rules.validate(values);
        self.errors.is_empty()
    }
}

#[wasm_bindgen]
pub struct FormValidator {
    state: Rc<RefCell<ValidatorState>>,
    debouncer: Rc<Debouncer>,
}

#[wasm_bindgen]
impl FormValidator {
    /// Rules that can't be read are reported and leave the validator empty.
    #[wasm_bindgen(constructor)]
    pub fn new(rules: JsValue) -> FormValidator {
        let rules = unwrap_or_alert(parse_rules(rules));
        Self::from_rules(rules)
    }

    pub fn validate(&self, values: JsValue) -> bool {
        let values = match serde_wasm_bindgen::from_value::<BTreeMap<String, Value>>(values) {
            Ok(values) => values_from_json(values),
            Err(error) => {
                log::warn!("Can't read form values: {error}");
                BTreeMap::new()
            }
        };
        self.state.borrow_mut().validate(&values)
    }

    pub fn errors(&self) -> JsValue {
        let state = self.state.borrow();
        state
            .errors
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .unwrap_or(JsValue::NULL)
    }

    pub fn field_error(&self, field: &str) -> Option<String> {
        self.state.borrow().errors.get(field).cloned()
    }

    /// Validate the form `form_id` while the user types, and block its submission while invalid.
    pub fn bind_form(&self, form_id: &str) {
        unwrap_or_alert(self.try_bind_form(form_id));
    }
}

impl FormValidator {
    pub fn from_rules(rules: RuleSet) -> Self {
        Self {
            state: Rc::new(RefCell::new(ValidatorState {
                rules,
                errors: ValidationErrors::new(),
            })),
            debouncer: Rc::new(Debouncer::new(LIVE_VALIDATION_DELAY)),
        }
    }

    fn try_bind_form(&self, form_id: &str) -> Result<()> {
        let document = get_document()?;
        let form = get_element_by_id_dyn::<HtmlFormElement>(&document, form_id)?;

        let state = self.state.clone();
        let debouncer = self.debouncer.clone();
        let input_form = form.clone();
        add_event_handler(&form, "input", move |_: Event| {
            let state = state.clone();
            let form = input_form.clone();
            debouncer.call(move || {
                validate_and_render(&state, &form);
            });
        })?;

        let state = self.state.clone();
        let debouncer = self.debouncer.clone();
        let submitted_form = form.clone();
        add_event_handler(&form, "submit", move |event: Event| {
            debouncer.cancel();
            if !validate_and_render(&state, &submitted_form) {
                event.prevent_default();
            }
        })?;
        Ok(())
    }
}

fn parse_rules(rules: JsValue) -> Result<RuleSet> {
    let definitions: BTreeMap<String, FieldRuleDefinition> = serde_wasm_bindgen::from_value(rules)?;
    RuleSet::from_definitions(definitions)
}

fn validate_and_render(state: &Rc<RefCell<ValidatorState>>, form: &HtmlFormElement) -> bool {
    let fields: Vec<(String, Option<Element>)> = state
        .borrow()
        .rules
        .fields()
        .map(|field| {
            let element = query_selector_optional(form, &format!("[name=\"{field}\"]"));
            (field.clone(), element)
        })
        .collect();

    let values = fields
        .iter()
        .filter_map(|(field, element)| {
            element
                .as_ref()
                .and_then(field_value)
                .map(|value| (field.clone(), value))
        })
        .collect();
    let valid = state.borrow_mut().validate(&values);

    let state = state.borrow();
    for (field, element) in &fields {
        if let Some(element) = element {
            render_field_error(element, state.errors.get(field).map(String::as_str));
        }
    }
    valid
}

fn field_value(element: &Element) -> Option<String> {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        Some(input.value())
    } else if let Some(text_area) = element.dyn_ref::<HtmlTextAreaElement>() {
        Some(text_area.value())
    } else {
        element.dyn_ref::<HtmlSelectElement>().map(HtmlSelectElement::value)
    }
}

/// Mark the field and fill the `.invalid-feedback` next to it.
fn render_field_error(element: &Element, error: Option<&str>) {
    toggle_class(element, INVALID_CLASS, error.is_some());
    let feedback = element
        .parent_element()
        .and_then(|parent| query_selector_optional(&parent, ".invalid-feedback"));
    if let Some(feedback) = feedback {
        feedback.set_text_content(error);
    }
}
