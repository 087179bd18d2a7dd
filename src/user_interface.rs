use crate::Result;
use crate::component::alert::{alert_error, unwrap_without_alert};
use crate::utils::{append_child, create_element_with_class, get_body, get_document};

pub const GLOBAL_LOADING_ID: &str = "global-loading";

/// Cover the page with a spinner overlay, or remove it.
pub fn set_loading(loading: bool) -> Result<()> {
    let document = get_document()?;
    let existing_overlay = document.get_element_by_id(GLOBAL_LOADING_ID);
    match (loading, existing_overlay) {
        (true, None) => {
            let overlay = create_element_with_class(
                &document,
                "div",
                None,
                None,
                "position-fixed top-0 start-0 w-100 h-100 d-flex justify-content-center align-items-center loading-overlay",
            )?;
            overlay.set_id(GLOBAL_LOADING_ID);
            let spinner = create_element_with_class(
                &document,
                "div",
                Some(&overlay),
                None,
                "spinner-border text-light",
            )?;
            spinner.set_attribute("role", "status")?;
            create_element_with_class(
                &document,
                "span",
                Some(&spinner),
                Some("Loading..."),
                "visually-hidden",
            )?;
            let body = get_body()?;
            append_child(&body, &overlay)?;
        }
        (false, Some(overlay)) => overlay.remove(),
        _ => {}
    }
    Ok(())
}

/// Run `action` behind the loading overlay. Its error, if any, is shown to the user.
pub async fn with_loading(action: impl AsyncFnOnce() -> Result<()>) {
    unwrap_without_alert(set_loading(true));
    let result = action().await;
    unwrap_without_alert(set_loading(false));
    if let Err(error) = result {
        alert_error(&error);
    }
}
