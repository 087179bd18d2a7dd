use crate::Result;
use crate::error::Error;
use crate::utils::get_window;
use dto::api_response::ApiResponse;
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Headers, Request, RequestInit};

#[derive(Debug)]
pub struct Response {
    status: u16,
    content_type: Option<String>,
    body: Option<String>,
}

impl Response {
    pub fn new(status: u16, content_type: Option<String>, body: Option<String>) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &Option<String> {
        &self.body
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|content_type| content_type.contains("application/json"))
    }

    /// Decode the body, whatever the status, as servers describe failures in JSON too.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let body = self.body.as_deref().unwrap_or_default();
        Ok(serde_json::from_str(body)?)
    }

    /// Decode the usual `{success, message}` acknowledgement.
    /// Anything unreadable is a failure without message.
    pub fn api_response(&self) -> ApiResponse {
        self.json::<ApiResponse>().unwrap_or_else(|error| {
            log::warn!("Unreadable response [status: {}]: {error:?}", self.status);
            ApiResponse::default()
        })
    }
}

/// A function to make simple AJAX requests.
pub async fn fetch(
    url: &str,
    method: &str,
    content_type: Option<&str>,
    body: Option<&str>,
) -> Result<Response> {
    fetch_with_body(url, method, content_type, body.map(JsValue::from_str)).await
}

/// Same as [`fetch`], for bodies that are not text, such as `FormData`.
pub async fn fetch_with_body(
    url: &str,
    method: &str,
    content_type: Option<&str>,
    body: Option<JsValue>,
) -> Result<Response> {
    let window = get_window()?;
    let request_init = RequestInit::new();
    if let Some(body) = body {
        request_init.set_body(&body);
    }
    request_init.set_method(method);
    let headers = Headers::new()?;
    if let Some(content_type) = content_type {
        headers.append("Content-Type", content_type)?;
    }
    request_init.set_headers(&JsValue::from(&headers));
    let request = Request::new_with_str_and_init(url, &request_init).map_err(|error| {
        Error::from_parent("The request could not be built.", Error::from(error))
    })?;
    let promise = window.fetch_with_request(&request);
    let response = wasm_bindgen_futures::JsFuture::from(promise)
        .await?
        .dyn_into::<web_sys::Response>()?;
    let status = response.status();
    let content_type = response.headers().get("content-type")?;
    Ok(Response {
        status,
        content_type,
        body: wasm_bindgen_futures::JsFuture::from(response.text()?)
            .await?
            .as_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use parameterized::{ide, parameterized};

    ide!();

    #[parameterized(
        content_type = { Some("application/json"), Some("application/json; charset=utf-8"), Some("text/html"), None },
        expected = { true, true, false, false }
    )]
    fn should_detect_json(content_type: Option<&str>, expected: bool) {
        let response = Response::new(200, content_type.map(str::to_owned), None);
        assert_eq!(expected, response.is_json());
    }

    #[parameterized(
        body = { Some(r#"{"success": true, "message": "Done"}"#), Some("<html></html>"), None },
        expected = {
            ApiResponse::new(true, Some("Done".to_owned())),
            ApiResponse::default(),
            ApiResponse::default(),
        }
    )]
    fn should_decode_api_response(body: Option<&str>, expected: ApiResponse) {
        let response = Response::new(200, None, body.map(str::to_owned));
        assert_eq!(expected, response.api_response());
    }
}
