//! Small helpers around the browser window: clipboard, downloads, scrolling and query string.

use crate::Result;
use crate::component::alert::{AlertLevel, create_alert, unwrap_without_alert};
use crate::error::Error;
use crate::utils::{append_child, create_element, get_body, get_document, get_location, get_window};
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    HtmlAnchorElement, HtmlElement, ScrollBehavior, ScrollToOptions, Url, UrlSearchParams,
};

const MOBILE_MAX_WIDTH: f64 = 768.0;
const ID_SUFFIX_LENGTH: usize = 9;
const DEFAULT_ID_PREFIX: &str = "id";
const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Copy `text` into the clipboard and tell the user how it went.
#[wasm_bindgen]
pub async fn copy_to_clipboard(text: String) -> bool {
    let result = write_to_clipboard(&text).await;
    match result {
        Ok(()) => {
            create_alert("Copied to clipboard", AlertLevel::Success);
            true
        }
        Err(error) => {
            log::warn!("Can't copy to clipboard: {error:?}");
            create_alert("Copy failed", AlertLevel::Error);
            false
        }
    }
}

async fn write_to_clipboard(text: &str) -> Result<()> {
    let clipboard = get_window()?.navigator().clipboard();
    // Only exposed in secure contexts.
    if clipboard.is_undefined() {
        return Err(Error::new(
            "Copy failed",
            "Clipboard API is not available in this context",
        ));
    }
    JsFuture::from(clipboard.write_text(text)).await?;
    Ok(())
}

/// Start downloading `url`, saved as `file_name`.
#[wasm_bindgen]
pub fn download_file(url: &str, file_name: &str) {
    unwrap_without_alert(try_download_file(url, file_name));
}

fn try_download_file(url: &str, file_name: &str) -> Result<()> {
    let document = get_document()?;
    let body = get_body()?;
    let link = create_element(&document, "a")?.dyn_into::<HtmlAnchorElement>()?;
    link.set_href(url);
    link.set_download(file_name);
    append_child(&body, &link)?;
    link.click();
    link.remove();
    Ok(())
}

/// Base 36 digits of a number in `[0, 1)`, e.g. `0.5` gives `"i"`.
pub fn base36_fraction(mut fraction: f64, length: usize) -> String {
    let mut digits = String::with_capacity(length);
    for _ in 0..length {
        fraction *= 36.0;
        let digit = (fraction.floor() as usize).min(35);
        digits.push(BASE36_DIGITS[digit] as char);
        fraction -= digit as f64;
    }
    digits
}

/// Random identifier such as `id_k2j9x0a1b`.
#[wasm_bindgen]
pub fn generate_id(prefix: Option<String>) -> String {
    let prefix = prefix.as_deref().unwrap_or(DEFAULT_ID_PREFIX);
    let suffix = base36_fraction(js_sys::Math::random(), ID_SUFFIX_LENGTH);
    format!("{prefix}_{suffix}")
}

pub fn is_mobile_width(width: f64) -> bool {
    width <= MOBILE_MAX_WIDTH
}

#[wasm_bindgen]
pub fn is_mobile() -> bool {
    get_window()
        .and_then(|window| Ok(window.inner_width()?))
        .ok()
        .and_then(|width| width.as_f64())
        .is_some_and(is_mobile_width)
}

/// Smoothly scroll so that the element `id` sits `offset` pixels below the top.
#[wasm_bindgen]
pub fn scroll_to_element(id: &str, offset: Option<f64>) {
    unwrap_without_alert(get_document().and_then(|document| {
        let Some(element) = document.get_element_by_id(id) else {
            return Ok(());
        };
        let element = element.dyn_into::<HtmlElement>()?;
        let options = ScrollToOptions::new();
        options.set_top(f64::from(element.offset_top()) - offset.unwrap_or_default());
        options.set_behavior(ScrollBehavior::Smooth);
        get_window()?.scroll_to_with_scroll_to_options(&options);
        Ok(())
    }));
}

// region Query string
#[wasm_bindgen]
pub fn get_url_parameter(name: &str) -> Option<String> {
    let search = get_location()
        .and_then(|location| Ok(location.search()?))
        .ok()?;
    UrlSearchParams::new_with_str(&search).ok()?.get(name)
}

#[wasm_bindgen]
pub fn set_url_parameter(name: &str, value: &str) {
    unwrap_without_alert(replace_current_url(|url| url.search_params().set(name, value)));
}

#[wasm_bindgen]
pub fn remove_url_parameter(name: &str) {
    unwrap_without_alert(replace_current_url(|url| url.search_params().delete(name)));
}

/// Rewrite the address bar without adding a history entry.
fn replace_current_url(edit: impl FnOnce(&Url)) -> Result<()> {
    let window = get_window()?;
    let url = Url::new(&window.location().href()?)?;
    edit(&url);
    window
        .history()?
        .replace_state_with_url(&JsValue::NULL, "", Some(&url.href()))?;
    Ok(())
}
// endregion

#[cfg(test)]
mod tests {
    use super::*;
    use parameterized::{ide, parameterized};

    ide!();

    #[parameterized(
        fraction = { 0.0, 0.5, 0.25, 0.999_999_999 },
        length = { 3, 1, 2, 2 },
        expected = { "000", "i", "90", "zz" }
    )]
    fn should_write_fraction_in_base36(fraction: f64, length: usize, expected: &str) {
        assert_eq!(expected, base36_fraction(fraction, length));
    }

    #[parameterized(
        width = { 320.0, 768.0, 769.0, 1920.0 },
        expected = { true, true, false, false }
    )]
    fn should_detect_mobile_width(width: f64, expected: bool) {
        assert_eq!(expected, is_mobile_width(width));
    }
}
