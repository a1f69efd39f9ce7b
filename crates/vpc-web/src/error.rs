#![forbid(unsafe_code)]

//! Errors raised while attaching the runtime to a page.

use std::fmt;

/// Failure to reach a browser object or complete a DOM call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebError {
    /// A global the bootstrap needs is absent (`window`, `document`,
    /// `document.documentElement`). Happens in workers and detached frames.
    MissingGlobal(&'static str),
    /// A DOM call threw.
    Js {
        operation: &'static str,
        message: String,
    },
}

impl WebError {
    /// The missing global or failing operation.
    #[must_use]
    pub fn target(&self) -> &'static str {
        match self {
            Self::MissingGlobal(name) => name,
            Self::Js { operation, .. } => operation,
        }
    }
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingGlobal(name) => write!(f, "{name} is not available"),
            Self::Js { operation, message } => write!(f, "{operation} failed: {message}"),
        }
    }
}

impl std::error::Error for WebError {}

#[cfg(target_arch = "wasm32")]
impl WebError {
    pub(crate) fn js(operation: &'static str, value: &wasm_bindgen::JsValue) -> Self {
        Self::Js {
            operation,
            message: describe(value),
        }
    }
}

/// Best-effort text for a thrown JavaScript value.
#[cfg(target_arch = "wasm32")]
pub(crate) fn describe(value: &wasm_bindgen::JsValue) -> String {
    use wasm_bindgen::JsCast;

    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{value:?}")
}

#[cfg(target_arch = "wasm32")]
impl From<WebError> for wasm_bindgen::JsValue {
    fn from(err: WebError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
