use crate::Result;
use crate::component::alert::{AlertLevel, create_alert, unwrap_without_alert};
use crate::error::{DEFAULT_ERROR_MESSAGE, Error};
use crate::timing::{REFRESH_DELAY, RELOAD_DELAY, reload_after};
use crate::user_interface::with_loading;
use crate::utils::{add_event_handler, get_window, query_selector_all};
use crate::web::{Response, fetch_with_body};
use js_sys::{Function, Reflect};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, FormData, HtmlFormElement};

const FORM_SUCCESS_MESSAGE: &str = "Operation succeeded";
const FORM_FAILURE_MESSAGE: &str = "Operation failed, please try again later";
const DELETE_SUCCESS_MESSAGE: &str = "Deleted successfully";
const DELETE_FAILURE_MESSAGE: &str = "Delete failed, please try again later";
const DEFAULT_ITEM_NAME: &str = "this item";
const DEFAULT_FORM_METHOD: &str = "POST";

/// The `method` attribute as written, `POST` when missing or blank.
pub fn form_method(method_attribute: Option<String>) -> String {
    method_attribute
        .map(|method| method.trim().to_owned())
        .filter(|method| !method.is_empty())
        .unwrap_or_else(|| DEFAULT_FORM_METHOD.to_owned())
}

/// Whether a `data-refresh` attribute asks for a reload. `"false"` and `"0"` do not.
pub fn refresh_requested(refresh_attribute: Option<String>) -> bool {
    refresh_attribute.is_some_and(|refresh| !matches!(refresh.trim(), "false" | "0"))
}

/// Message to show for the answer to `request`: `Ok` when the server acknowledged it.
/// Messages sent by the server replace the defaults.
pub fn request_outcome(
    request: &str,
    response: &Response,
    success_message: &str,
    failure_message: &str,
) -> Result<String> {
    let acknowledgement = response.api_response();
    if *acknowledgement.success() {
        Ok(acknowledgement.message_or(success_message).to_owned())
    } else {
        Err(Error::new(
            acknowledgement.message_or(failure_message),
            &format!("{request} refused [status: {}]", response.status()),
        ))
    }
}

pub fn delete_confirmation_message(item_name: Option<String>) -> String {
    let item_name = item_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ITEM_NAME.to_owned());
    format!("Delete {item_name}? This cannot be undone.")
}

// region Forms
/// Send `form` through AJAX, then report the outcome.
pub async fn submit_form(form: HtmlFormElement) {
    let url = form.action();
    let method = form_method(form.get_attribute("method"));

    with_loading(async || {
        let body = FormData::new_with_form(&form)
            .map_err(|error| Error::from_parent(FORM_FAILURE_MESSAGE, error.into()))?;
        let response = fetch_with_body(&url, &method, None, Some(body.into()))
            .await
            .map_err(|error| Error::from_parent(FORM_FAILURE_MESSAGE, error))?;

        let message = request_outcome(
            &format!("Form submission to `{url}`"),
            &response,
            FORM_SUCCESS_MESSAGE,
            FORM_FAILURE_MESSAGE,
        )?;

        create_alert(&message, AlertLevel::Success);
        let result = response.json::<Value>().unwrap_or(Value::Null);
        after_successful_submit(&form, &result);
        Ok(())
    })
    .await;
}

fn after_successful_submit(form: &HtmlFormElement, result: &Value) {
    if let Some(callback) = form.get_attribute("data-callback") {
        unwrap_without_alert(call_window_function(&callback, result));
    }

    if let Ok(Some(modal)) = form.closest(".modal") {
        hide_modal(&modal);
    }

    if refresh_requested(form.get_attribute("data-refresh")) {
        reload_after(RELOAD_DELAY);
    }
}

/// Call the global function `name` with `argument` converted to a JS object.
fn call_window_function(name: &str, argument: &Value) -> Result<()> {
    let window = get_window()?;
    let function = Reflect::get(&window, &JsValue::from_str(name))?
        .dyn_into::<Function>()
        .map_err(|_| {
            Error::new(
                DEFAULT_ERROR_MESSAGE,
                &format!("`{name}` is not a global function"),
            )
        })?;
    let argument = argument.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?;
    function.call1(&window, &argument)?;
    Ok(())
}

/// Hide a Bootstrap modal, when Bootstrap is loaded.
fn hide_modal(modal: &Element) {
    match Modal::get_or_create_instance(modal) {
        Ok(instance) => instance.hide(),
        Err(error) => log::debug!("Modal left open, Bootstrap unavailable: {error:?}"),
    }
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = bootstrap)]
    type Modal;

    #[wasm_bindgen(
        static_method_of = Modal,
        js_namespace = bootstrap,
        js_name = getOrCreateInstance,
        catch
    )]
    fn get_or_create_instance(element: &Element) -> Result<Modal, JsValue>;

    #[wasm_bindgen(method)]
    fn hide(this: &Modal);
}

pub fn init_ajax_forms(document: &Document) -> Result<()> {
    for form in query_selector_all(document, ".ajax-form") {
        let Ok(form) = form.dyn_into::<HtmlFormElement>() else {
            log::warn!("`.ajax-form` element is not a form");
            continue;
        };
        let target = form.clone();
        add_event_handler(&target, "submit", move |event: Event| {
            event.prevent_default();
            spawn_local(submit_form(form.clone()));
        })?;
    }
    Ok(())
}
// endregion

// region Delete buttons
pub async fn delete_item(url: String) {
    with_loading(async || {
        let response = fetch_with_body(&url, "DELETE", Some("application/json"), None)
            .await
            .map_err(|error| Error::from_parent(DELETE_FAILURE_MESSAGE, error))?;

        // Success always reads the same, whatever the server says.
        request_outcome(
            &format!("Deletion of `{url}`"),
            &response,
            DELETE_SUCCESS_MESSAGE,
            DELETE_FAILURE_MESSAGE,
        )?;
        create_alert(DELETE_SUCCESS_MESSAGE, AlertLevel::Success);
        reload_after(RELOAD_DELAY);
        Ok(())
    })
    .await;
}

fn confirm_delete(button: &Element) {
    let Some(url) = button.get_attribute("href") else {
        log::warn!("`.delete-btn` without `href`");
        return;
    };
    let message = delete_confirmation_message(button.get_attribute("data-item-name"));
    let confirmed = get_window()
        .and_then(|window| window.confirm_with_message(&message).map_err(Error::from))
        .unwrap_or(false);
    if confirmed {
        spawn_local(delete_item(url));
    }
}

pub fn init_delete_buttons(document: &Document) -> Result<()> {
    for button in query_selector_all(document, ".delete-btn") {
        let target = button.clone();
        add_event_handler(&target, "click", move |event: Event| {
            event.prevent_default();
            confirm_delete(&button);
        })?;
    }
    Ok(())
}
// endregion

pub fn init_refresh_buttons(document: &Document) -> Result<()> {
    for button in query_selector_all(document, ".refresh-btn") {
        add_event_handler(&button, "click", |event: Event| {
            event.prevent_default();
            reload_after(REFRESH_DELAY);
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parameterized::{ide, parameterized};

    ide!();

    #[parameterized(
        method_attribute = { None, Some(""), Some("  "), Some("put"), Some("POST") },
        expected = { "POST", "POST", "POST", "put", "POST" }
    )]
    fn should_compute_form_method(method_attribute: Option<&str>, expected: &str) {
        assert_eq!(expected, form_method(method_attribute.map(str::to_owned)));
    }

    #[parameterized(
        item_name = { Some("user jon"), None, Some("") },
        expected = {
            "Delete user jon? This cannot be undone.",
            "Delete this item? This cannot be undone.",
            "Delete this item? This cannot be undone.",
        }
    )]
    fn should_build_delete_confirmation(item_name: Option<&str>, expected: &str) {
        assert_eq!(expected, delete_confirmation_message(item_name.map(str::to_owned)));
    }

    #[parameterized(
        refresh_attribute = { None, Some(""), Some("true"), Some("1"), Some("false"), Some(" 0 ") },
        expected = { false, true, true, true, false, false }
    )]
    fn should_detect_refresh_request(refresh_attribute: Option<&str>, expected: bool) {
        assert_eq!(expected, refresh_requested(refresh_attribute.map(str::to_owned)));
    }

    #[parameterized(
        body = {
            Some(r#"{"success": true, "message": "User created"}"#),
            Some(r#"{"success": true}"#),
            Some(r#"{"success": true, "message": "  "}"#),
            Some(r#"{"success": false, "message": "Name already taken"}"#),
            Some(r#"{"success": false}"#),
            Some("<html><body>Bad gateway</body></html>"),
            None,
        },
        expected = {
            Ok("User created"),
            Ok(FORM_SUCCESS_MESSAGE),
            Ok(FORM_SUCCESS_MESSAGE),
            Err("Name already taken"),
            Err(FORM_FAILURE_MESSAGE),
            Err(FORM_FAILURE_MESSAGE),
            Err(FORM_FAILURE_MESSAGE),
        }
    )]
    fn should_decide_request_outcome(body: Option<&str>, expected: Result<&str, &str>) {
        let response = Response::new(200, None, body.map(str::to_owned));

        let outcome = request_outcome(
            "Form submission to `/users`",
            &response,
            FORM_SUCCESS_MESSAGE,
            FORM_FAILURE_MESSAGE,
        );

        let outcome = outcome.map_err(|error| error.msg().to_owned());
        assert_eq!(expected.map(str::to_owned).map_err(str::to_owned), outcome);
    }

    #[test]
    fn should_keep_status_in_refusal_details() {
        let response = Response::new(500, None, Some(r#"{"success": false}"#.to_owned()));

        let error = request_outcome(
            "Deletion of `/users/3`",
            &response,
            DELETE_SUCCESS_MESSAGE,
            DELETE_FAILURE_MESSAGE,
        )
        .unwrap_err();

        assert_eq!(DELETE_FAILURE_MESSAGE, error.msg());
        assert_eq!("Deletion of `/users/3` refused [status: 500]", error.technical_msg());
    }
}
