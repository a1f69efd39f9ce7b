#![forbid(unsafe_code)]

//! `web-sys` implementations of the runtime seams.

use tracing::debug;
use vpc_runtime::{
    ColorScheme, ColorSchemeSource, CookieJar, DocumentRoot, DurableStorage, StorageError,
    StorageResult,
};
use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, HtmlElement, Storage, Window};

use crate::error::{WebError, describe};
use crate::markup::{PREFERS_DARK_QUERY, PREFERS_LIGHT_QUERY};

/// `window.localStorage`.
///
/// Browsers may refuse access (privacy modes, sandboxed frames); every call
/// then reports [`StorageError::Unavailable`] and the store keeps working in
/// memory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    #[must_use]
    pub fn from_window(window: &Window) -> Self {
        let storage = match window.local_storage() {
            Ok(storage) => storage,
            Err(err) => {
                debug!(reason = %describe(&err), "localStorage access denied");
                None
            }
        };
        Self { storage }
    }

    fn storage(&self) -> StorageResult<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage".into()))
    }
}

impl DurableStorage for LocalStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|err| StorageError::Read {
                key: key.to_string(),
                reason: describe(&err),
            })
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| StorageError::Write {
                key: key.to_string(),
                reason: describe(&err),
            })
    }
}

/// `document.cookie`.
#[derive(Debug, Clone)]
pub struct DocumentCookies {
    document: HtmlDocument,
}

impl DocumentCookies {
    pub fn new(document: &web_sys::Document) -> Result<Self, WebError> {
        let document = document
            .clone()
            .dyn_into::<HtmlDocument>()
            .map_err(|_| WebError::MissingGlobal("HTMLDocument"))?;
        Ok(Self { document })
    }
}

impl CookieJar for DocumentCookies {
    fn read_all(&self) -> StorageResult<String> {
        self.document.cookie().map_err(|err| StorageError::Read {
            key: "document.cookie".into(),
            reason: describe(&err),
        })
    }

    fn write(&self, assignment: &str) -> StorageResult<()> {
        self.document
            .set_cookie(assignment)
            .map_err(|err| StorageError::Write {
                key: "document.cookie".into(),
                reason: describe(&err),
            })
    }
}

/// The `<html>` element.
#[derive(Debug, Clone)]
pub struct HtmlRoot {
    element: HtmlElement,
}

impl HtmlRoot {
    pub fn new(document: &web_sys::Document) -> Result<Self, WebError> {
        let element = document
            .document_element()
            .ok_or(WebError::MissingGlobal("document.documentElement"))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| WebError::MissingGlobal("document.documentElement"))?;
        Ok(Self { element })
    }
}

impl DocumentRoot for HtmlRoot {
    fn set_data_attribute(&self, name: &str, value: &str) {
        if let Err(err) = self.element.dataset().set(name, value) {
            debug!(name, reason = %describe(&err), "dataset write rejected");
        }
    }

    fn add_class(&self, token: &str) {
        if let Err(err) = self.element.class_list().add_1(token) {
            debug!(token, reason = %describe(&err), "classList.add rejected");
        }
    }

    fn remove_class(&self, token: &str) {
        if let Err(err) = self.element.class_list().remove_1(token) {
            debug!(token, reason = %describe(&err), "classList.remove rejected");
        }
    }

    fn set_style_property(&self, name: &str, value: &str) {
        if let Err(err) = self.element.style().set_property(name, value) {
            debug!(name, reason = %describe(&err), "style.setProperty rejected");
        }
    }
}

/// `matchMedia("(prefers-color-scheme: ...)")`, queried on each call.
#[derive(Debug, Clone)]
pub struct MediaQueryScheme {
    window: Window,
}

impl MediaQueryScheme {
    #[must_use]
    pub fn new(window: &Window) -> Self {
        Self {
            window: window.clone(),
        }
    }

    fn matches(&self, query: &str) -> bool {
        matches!(self.window.match_media(query), Ok(Some(list)) if list.matches())
    }
}

impl ColorSchemeSource for MediaQueryScheme {
    fn preferred(&self) -> ColorScheme {
        if self.matches(PREFERS_LIGHT_QUERY) {
            ColorScheme::Light
        } else if self.matches(PREFERS_DARK_QUERY) {
            ColorScheme::Dark
        } else {
            ColorScheme::NoPreference
        }
    }
}
