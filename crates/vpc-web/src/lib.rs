#![forbid(unsafe_code)]

//! Browser bindings for the VPC theme runtime.
//!
//! `vpc-runtime` defines seams; this crate fills them with `web-sys`:
//!
//! | seam                | browser implementation |
//! |---------------------|------------------------|
//! | `DurableStorage`    | `LocalStorage` (`window.localStorage`) |
//! | `CookieJar`         | `DocumentCookies` (`document.cookie`) |
//! | `DocumentRoot`      | `HtmlRoot` (`<html>` dataset, classes, style) |
//! | `ColorSchemeSource` | `MediaQueryScheme` (`prefers-color-scheme`) |
//! | `ThemeControl`      | `DomToggle`, `DomSelect` |
//!
//! `install` (exported to JavaScript as `installTheme`) performs the whole
//! page bootstrap: query overrides, store initialization, control discovery
//! and the system colour-scheme listener.
//!
//! Only [`markup`] and [`error`] compile on native targets; they carry the
//! DOM-independent logic so it can be tested without a browser.

pub mod error;
pub mod markup;

#[cfg(target_arch = "wasm32")]
mod adapters;
#[cfg(target_arch = "wasm32")]
mod bootstrap;
#[cfg(target_arch = "wasm32")]
mod controls;

pub use error::WebError;

#[cfg(target_arch = "wasm32")]
pub use adapters::{DocumentCookies, HtmlRoot, LocalStorage, MediaQueryScheme};
#[cfg(target_arch = "wasm32")]
pub use bootstrap::{PageTheme, ThemeApi, install};
#[cfg(target_arch = "wasm32")]
pub use controls::{DomSelect, DomToggle};
