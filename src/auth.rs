use crate::Result;
use crate::component::alert::{AlertLevel, create_alert, unwrap_without_alert};
use crate::error::Error;
use crate::timing::{RELOAD_DELAY, reload_after};
use crate::user_interface::with_loading;
use crate::utils::{add_event_handler, get_window, query_selector_all, set_visible};
use crate::web::{Response, fetch};
use dto::auth_status::{AuthStatus, User};
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event};

const CHECK_AUTH_URL: &str = "/auth/check-auth";
const LOGOUT_URL: &str = "/auth/logout";

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Session {
    Guest,
    Authenticated(User),
}

/// Only a successful JSON answer confirming the authentication yields a user.
pub fn session_from_response(response: &Response) -> Session {
    if !response.is_success() {
        log::warn!("Auth status check failed [status: {}]", response.status());
        return Session::Guest;
    }
    if !response.is_json() {
        log::warn!("Auth status check returned a non-JSON response");
        return Session::Guest;
    }

    match response.json::<AuthStatus>() {
        Ok(status) => status
            .authenticated_user()
            .cloned()
            .map_or(Session::Guest, Session::Authenticated),
        Err(error) => {
            log::warn!("Can't read auth status: {error:?}");
            Session::Guest
        }
    }
}

/// Ask the server who the visitor is, once, and adapt the menus accordingly.
/// Any failure leaves the page in guest mode without telling the user.
pub async fn check_auth_status(document: &Document) -> Session {
    let session = match fetch(CHECK_AUTH_URL, "get", None, None).await {
        Ok(response) => session_from_response(&response),
        Err(error) => {
            log::warn!("Can't check auth status: {error:?}");
            Session::Guest
        }
    };
    render_session(document, &session);
    session
}

pub fn render_session(document: &Document, session: &Session) {
    let authenticated = matches!(session, Session::Authenticated(_));
    for menu in query_selector_all(document, ".authenticated-menu") {
        set_visible(&menu, authenticated);
    }
    for menu in query_selector_all(document, ".guest-menu") {
        set_visible(&menu, !authenticated);
    }

    if let Session::Authenticated(user) = session {
        for element in query_selector_all(document, ".user-name") {
            element.set_text_content(Some(user.username()));
        }
        for element in query_selector_all(document, ".user-email") {
            element.set_text_content(Some(user.email()));
        }
    }
}

/// Log out after confirmation, then reload the page.
#[wasm_bindgen]
pub async fn logout() {
    let confirmed = get_window()
        .and_then(|window| {
            window
                .confirm_with_message("Are you sure you want to log out?")
                .map_err(Error::from)
        })
        .unwrap_or(false);
    if !confirmed {
        return;
    }

    with_loading(async || {
        let response = fetch(LOGOUT_URL, "post", Some("application/json"), None)
            .await
            .map_err(|error| Error::from_parent("Logout failed.", error))?;

        if *response.api_response().success() {
            create_alert("Logged out successfully.", AlertLevel::Success);
            reload_after(RELOAD_DELAY);
            Ok(())
        } else {
            Err(Error::new(
                "Logout failed.",
                &format!("Logout refused [status: {}]", response.status()),
            ))
        }
    })
    .await;
}

pub fn init_logout_buttons(document: &Document) -> Result<()> {
    for button in query_selector_all(document, ".logout-btn") {
        add_event_handler(&button, "click", |event: Event| {
            event.prevent_default();
            spawn_local(logout());
        })?;
    }
    Ok(())
}

/// Entry point used at page start.
pub fn init_session(document: &Document) {
    unwrap_without_alert(init_logout_buttons(document));
    let document = document.clone();
    spawn_local(async move {
        check_auth_status(&document).await;
    });
}
