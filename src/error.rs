use std::fmt::{Debug, Display, Formatter};
use wasm_bindgen::JsValue;
use web_sys::{Element, Node};

pub const DEFAULT_ERROR_MESSAGE: &str = "An error has occurred. Please try again.";
pub const DEFAULT_SERVER_ERROR_MESSAGE: &str =
    "The server encountered an error while processing the request. Please try again later.";

/// Error carrying a message fit for the user and a technical one fit for the logs.
pub struct Error {
    msg: String,
    technical_msg: String,
    parent: Option<Box<Error>>,
}

impl Error {
    pub fn new(msg: &str, technical_msg: &str) -> Self {
        Self {
            msg: msg.to_owned(),
            technical_msg: technical_msg.to_owned(),
            parent: None,
        }
    }

    pub fn from_parent(msg: &str, parent: Error) -> Self {
        Self {
            msg: msg.to_owned(),
            technical_msg: msg.to_owned(),
            parent: Some(Box::from(parent)),
        }
    }

    pub fn msg(&self) -> &str {
        &self.msg
    }

    pub fn technical_msg(&self) -> &str {
        &self.technical_msg
    }
}

impl Default for Error {
    fn default() -> Self {
        Error::new(DEFAULT_ERROR_MESSAGE, DEFAULT_ERROR_MESSAGE)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.parent {
            None => {
                write!(f, "{}", self.technical_msg)
            }
            Some(parent) => {
                write!(f, "{}: caused by:\n{:?}", self.technical_msg, parent)
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.msg)
    }
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        let technical_msg = value
            .as_string()
            .unwrap_or_else(|| format!("Unknown error has happened: {value:?}"));
        Self::new(DEFAULT_ERROR_MESSAGE, &technical_msg)
    }
}

impl From<Element> for Error {
    fn from(element: Element) -> Self {
        let text = format!("A cast has failed for element: {element:?}");
        Self::new(DEFAULT_ERROR_MESSAGE, &text)
    }
}

impl From<Node> for Error {
    fn from(node: Node) -> Self {
        let text = format!("A cast has failed for node: {node:?}");
        Self::new(DEFAULT_ERROR_MESSAGE, &text)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::new(
            DEFAULT_SERVER_ERROR_MESSAGE,
            &format!("Invalid JSON: {error}"),
        )
    }
}

impl From<serde_wasm_bindgen::Error> for Error {
    fn from(error: serde_wasm_bindgen::Error) -> Self {
        Self::new(
            DEFAULT_ERROR_MESSAGE,
            &format!("Can't convert value for JavaScript: {error}"),
        )
    }
}
