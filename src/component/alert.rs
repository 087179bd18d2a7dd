use crate::Result;
use crate::error::Error;
use crate::utils::{
    append_child, create_element, create_element_with_class, get_body, get_document,
    query_selector_all,
};
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::{Document, Element};

pub const ALERT_CONTAINER_ID: &str = "alert-container";
pub const DEFAULT_ALERT_DURATION: u32 = 5000;

#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info = 0,
    Error = 1,
    Success = 2,
    Warning = 3,
}

impl AlertLevel {
    fn class_name(&self) -> &'static str {
        match self {
            AlertLevel::Info => "alert-info",
            AlertLevel::Error => "alert-danger",
            AlertLevel::Success => "alert-success",
            AlertLevel::Warning => "alert-warning",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            AlertLevel::Info => "info-circle",
            AlertLevel::Error => "exclamation-triangle",
            AlertLevel::Success => "check-circle",
            AlertLevel::Warning => "exclamation-circle",
        }
    }
}

/// Display a dismissible alert that closes itself after the default duration.
#[wasm_bindgen]
pub fn create_alert(text: &str, level: AlertLevel) {
    create_alert_with_duration(text, level, DEFAULT_ALERT_DURATION);
}

/// Display a dismissible alert. A `duration` of 0 keeps it until the user closes it.
#[wasm_bindgen]
pub fn create_alert_with_duration(text: &str, level: AlertLevel, duration: u32) {
    if let Err(error) = try_create_alert(text, level, duration) {
        // Nowhere left to report to but the console.
        log::error!("Can't display alert `{text}`: {error:?}");
    }
}

fn try_create_alert(text: &str, level: AlertLevel, duration: u32) -> Result<()> {
    let document = get_document()?;
    let container = get_alert_container(&document)?;

    let alert = build_alert(&document, text, level)?;
    append_child(&container, &alert)?;

    if duration > 0 {
        let alert = alert.clone();
        Timeout::new(duration, move || alert.remove()).forget();
    }

    Ok(())
}

fn get_alert_container(document: &Document) -> Result<Element> {
    match document.get_element_by_id(ALERT_CONTAINER_ID) {
        Some(container) => Ok(container),
        None => Ok(get_body()?.into()),
    }
}

fn build_alert(document: &Document, text: &str, level: AlertLevel) -> Result<Element> {
    let alert = create_element(document, "div")?;
    alert.set_class_name(&format!(
        "alert {} alert-dismissible fade show",
        level.class_name()
    ));
    alert.set_attribute("role", "alert")?;

    create_element_with_class(
        document,
        "i",
        Some(&alert),
        None,
        &format!("fas fa-{} me-2", level.icon()),
    )?;
    create_element_with_class(document, "span", Some(&alert), Some(text), "alert-content")?;
    let close_button =
        create_element_with_class(document, "button", Some(&alert), None, "btn-close")?;
    close_button.set_attribute("type", "button")?;
    close_button.set_attribute("aria-label", "Close")?;

    let alert_to_close = alert.clone();
    let closure = Closure::once(move || alert_to_close.remove());
    close_button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();

    Ok(alert)
}

/// Remove every alert currently displayed.
#[wasm_bindgen]
pub fn hide_alerts() {
    let Ok(document) = get_document() else {
        return;
    };
    query_selector_all(&document, ".alert")
        .iter()
        .for_each(Element::remove);
}

/// Unwrap the result; on error, show its user message and log the technical chain.
pub fn unwrap_or_alert<T: Default>(result: Result<T>) -> T {
    ok_or_alert(result).unwrap_or_default()
}

pub fn ok_or_alert<T>(result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            alert_error(&error);
            None
        }
    }
}

/// Unwrap the result; on error, only log it.
pub fn unwrap_without_alert<T: Default>(result: Result<T>) -> T {
    result.unwrap_or_else(|error| {
        log::error!("{error:?}");
        T::default()
    })
}

pub fn alert_error(error: &Error) {
    log::error!("{error:?}");
    create_alert(error.msg(), AlertLevel::Error);
}
