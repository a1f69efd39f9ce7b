#![forbid(unsafe_code)]

//! VPC theme runtime.
//!
//! This crate owns the theme state of a page and everything that reads or
//! writes it, behind injected seams so the same code runs in the browser,
//! in server-side templates and in tests.
//!
//! # Key Components
//!
//! - [`ThemeStore`] - resolves, applies, persists and broadcasts the theme
//! - [`StyleStore`] - the same for the `classic` / `aurora` style variant
//! - [`Broadcaster`] - synchronous observer list with RAII [`Subscription`]s
//! - [`ThemeControls`] - binds toggle and select controls to a store
//! - [`DurableStorage`], [`CookieJar`], [`DocumentRoot`], [`ColorSchemeSource`] -
//!   the seams, each with an in-memory and a no-op implementation
//! - [`ThemeConfig`] - keys, cookie attributes and defaults
//! - [`LaunchOverrides`] - `?theme=` / `?style=` query pinning
//! - [`first_paint::root_attributes`] - server-side `<html>` attributes
//!
//! # How it fits in the system
//! `vpc-style` supplies the vocabulary, this crate the behaviour, and
//! `vpc-web` plugs browser implementations into the seams.

pub mod bindings;
pub mod broadcast;
pub mod color_scheme;
pub mod config;
pub mod cookie;
pub mod document;
pub mod first_paint;
pub mod launch;
pub mod persistence;
pub mod store;
pub mod variant_store;

pub use bindings::{
    ControlAction, ControlKind, ControlView, MemoryControl, ThemeControl, ThemeControls,
};
pub use broadcast::{Broadcaster, Subscription};
pub use color_scheme::{ColorScheme, ColorSchemeSource, FixedColorScheme};
pub use config::{ConfigError, ThemeConfig};
pub use cookie::{CookieAttributes, CookieJar, MemoryCookies, NoopCookies, SameSite};
pub use document::{DocumentRoot, MemoryDocument, NoopDocument, RootAttributes};
pub use launch::LaunchOverrides;
pub use persistence::{DurableStorage, MemoryStorage, NoopStorage, StorageError, StorageResult};
pub use store::{InvalidTheme, ThemeChange, ThemeSource, ThemeStore, ThemeStoreBuilder};
pub use variant_store::{InvalidVariant, StyleStore, VariantChange};
