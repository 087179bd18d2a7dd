//! Browser side of the administration console: page components, form handling, wizards
//! and uploads, compiled to WebAssembly.

pub mod ajax_form;
pub mod auth;
pub mod browser;
pub mod component;
pub mod error;
pub mod form_validator;
pub mod format;
pub mod listeners;
pub mod local_config;
pub mod storage;
pub mod timing;
pub mod upload;
pub mod user_interface;
pub mod utils;
pub mod validators;
pub mod web;
pub mod wizard;

use crate::ajax_form::{init_ajax_forms, init_delete_buttons, init_refresh_buttons};
use crate::auth::init_session;
use crate::component::alert::unwrap_without_alert;
use crate::utils::get_document;
use wasm_bindgen::prelude::*;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(all(test, target_arch = "wasm32"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen(start)]
fn run() {
    utils::set_panic_hook();
    wasm_logger::init(wasm_logger::Config::default());

    let Ok(document) = get_document() else {
        log::warn!("No document, console left unbound");
        return;
    };
    init_session(&document);
    unwrap_without_alert(init_ajax_forms(&document));
    unwrap_without_alert(init_delete_buttons(&document));
    unwrap_without_alert(init_refresh_buttons(&document));
}
