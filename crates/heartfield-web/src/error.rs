use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("missing element {0}")]
    MissingElement(String),
    #[error("element {0} has an unexpected type")]
    WrongType(String),
    #[error("2d context unavailable on {0}")]
    NoContext(String),
    #[error("page setup failed: {0}")]
    Setup(String),
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        WebError::Js(describe(&value))
    }
}

pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Boxes a JS exception for the platform trait signatures.
pub(crate) fn js_error(value: JsValue) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(WebError::from(value))
}
