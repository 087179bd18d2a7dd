//! Placeholders rendered inside a container while its content is loading, missing or failed.

use crate::Result;
use crate::component::alert::unwrap_without_alert;
use crate::utils::{clear_element, create_element_with_class, get_document};
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::{Document, Element};

pub const DEFAULT_LOADING_TEXT: &str = "Loading...";
pub const DEFAULT_EMPTY_MESSAGE: &str = "No data";
pub const DEFAULT_ERROR_STATE_MESSAGE: &str = "Failed to load";
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Operation succeeded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Empty,
    Error,
    Success,
}

impl StatusKind {
    fn class_name(&self) -> &'static str {
        match self {
            StatusKind::Empty => "empty-state",
            StatusKind::Error => "error-state",
            StatusKind::Success => "success-state",
        }
    }

    fn default_icon(&self) -> &'static str {
        match self {
            StatusKind::Empty => "inbox",
            StatusKind::Error => "exclamation-triangle",
            StatusKind::Success => "check-circle",
        }
    }
}

/// Replace the content of `container` with a spinner and `text`.
pub fn show_loading(document: &Document, container: &Element, text: &str) -> Result<()> {
    clear_element(container);
    let wrapper = create_element_with_class(document, "div", Some(container), None, "text-center")?;
    create_element_with_class(
        document,
        "i",
        Some(&wrapper),
        None,
        "fas fa-spinner fa-spin fa-2x text-primary mb-3",
    )?;
    create_element_with_class(document, "p", Some(&wrapper), Some(text), "text-muted")?;
    Ok(())
}

/// Replace the spinner with `content`, given as HTML.
pub fn hide_loading(container: &Element, content: &str) {
    container.set_inner_html(content);
}

pub fn show_status(
    document: &Document,
    container: &Element,
    kind: StatusKind,
    message: &str,
    icon: Option<&str>,
) -> Result<()> {
    clear_element(container);
    let wrapper =
        create_element_with_class(document, "div", Some(container), None, kind.class_name())?;
    let icon = icon.unwrap_or(kind.default_icon());
    create_element_with_class(document, "i", Some(&wrapper), None, &format!("fas fa-{icon}"))?;
    create_element_with_class(document, "p", Some(&wrapper), Some(message), "")?;
    Ok(())
}

pub fn show_empty_state(document: &Document, container: &Element, message: &str) -> Result<()> {
    show_status(document, container, StatusKind::Empty, message, None)
}

pub fn show_error_state(document: &Document, container: &Element, message: &str) -> Result<()> {
    show_status(document, container, StatusKind::Error, message, None)
}

pub fn show_success_state(document: &Document, container: &Element, message: &str) -> Result<()> {
    show_status(document, container, StatusKind::Success, message, None)
}

// region Exported helpers working on element ids; a missing container is ignored
fn with_container(container_id: &str, action: impl FnOnce(&Document, &Element) -> Result<()>) {
    let Some(document) = get_document().ok() else {
        return;
    };
    if let Some(container) = document.get_element_by_id(container_id) {
        unwrap_without_alert(action(&document, &container));
    }
}

#[wasm_bindgen]
pub fn show_loading_in(container_id: &str, text: Option<String>) {
    with_container(container_id, |document, container| {
        show_loading(
            document,
            container,
            text.as_deref().unwrap_or(DEFAULT_LOADING_TEXT),
        )
    });
}

#[wasm_bindgen]
pub fn hide_loading_in(container_id: &str, content: Option<String>) {
    with_container(container_id, |_, container| {
        hide_loading(container, content.as_deref().unwrap_or_default());
        Ok(())
    });
}

#[wasm_bindgen]
pub fn show_empty_state_in(container_id: &str, message: Option<String>, icon: Option<String>) {
    with_container(container_id, |document, container| {
        show_status(
            document,
            container,
            StatusKind::Empty,
            message.as_deref().unwrap_or(DEFAULT_EMPTY_MESSAGE),
            icon.as_deref(),
        )
    });
}

#[wasm_bindgen]
pub fn show_error_state_in(container_id: &str, message: Option<String>, icon: Option<String>) {
    with_container(container_id, |document, container| {
        show_status(
            document,
            container,
            StatusKind::Error,
            message.as_deref().unwrap_or(DEFAULT_ERROR_STATE_MESSAGE),
            icon.as_deref(),
        )
    });
}

#[wasm_bindgen]
pub fn show_success_state_in(container_id: &str, message: Option<String>, icon: Option<String>) {
    with_container(container_id, |document, container| {
        show_status(
            document,
            container,
            StatusKind::Success,
            message.as_deref().unwrap_or(DEFAULT_SUCCESS_MESSAGE),
            icon.as_deref(),
        )
    });
}
// endregion
