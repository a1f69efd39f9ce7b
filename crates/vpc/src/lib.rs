#![forbid(unsafe_code)]

//! VPC theme layer public facade.
//!
//! This crate provides the stable surface for pages and templates. It
//! re-exports the vocabulary from `vpc-style`, the store and bindings from
//! `vpc-runtime`, the browser adapters from `vpc-web`, and offers a
//! [`ThemeLayer`] that assembles a store with in-memory backends for
//! server-side rendering and tests.

pub mod error;

pub use error::{Degradation, Error, Result};

// --- Style re-exports ------------------------------------------------------

pub use vpc_style::{
    Palette, Rgb, StyleVariant, ThemeName, UnknownTheme, UnknownVariant, label_for,
};

// --- Runtime re-exports ----------------------------------------------------

pub use vpc_runtime::first_paint::root_attributes;
pub use vpc_runtime::{
    ColorScheme, ColorSchemeSource, ConfigError, ControlAction, ControlKind, ControlView,
    CookieAttributes, CookieJar, DocumentRoot, DurableStorage, FixedColorScheme, InvalidTheme,
    InvalidVariant, LaunchOverrides, MemoryControl, MemoryCookies, MemoryDocument, MemoryStorage,
    NoopCookies, NoopDocument, NoopStorage, RootAttributes, SameSite, StorageError, StyleStore,
    Subscription, ThemeChange, ThemeConfig, ThemeControl, ThemeControls, ThemeSource, ThemeStore,
    ThemeStoreBuilder, VariantChange,
};

// --- Web re-exports --------------------------------------------------------

pub use vpc_web::WebError;
#[cfg(target_arch = "wasm32")]
pub use vpc_web::{
    DocumentCookies, DomSelect, DomToggle, HtmlRoot, LocalStorage, MediaQueryScheme, PageTheme,
    ThemeApi, install,
};

// --- In-memory layer -------------------------------------------------------

/// A theme store and style store over shared in-memory backends.
///
/// Handles are clones of the backends the stores write to, so callers can
/// inspect what a page would have persisted and painted.
#[derive(Debug, Clone)]
pub struct ThemeLayer {
    pub store: ThemeStore,
    pub styles: StyleStore,
    pub storage: MemoryStorage,
    pub cookies: MemoryCookies,
    pub document: MemoryDocument,
    pub scheme: FixedColorScheme,
}

impl ThemeLayer {
    /// Empty backends and no system preference.
    ///
    /// An invalid `config` is logged and replaced by the defaults.
    #[must_use]
    pub fn in_memory(config: ThemeConfig) -> Self {
        Self::with_backends(config, MemoryStorage::new(), MemoryCookies::new())
    }

    /// Backends seeded from a request's `Cookie` header.
    #[must_use]
    pub fn from_cookie_header(header: &str, config: ThemeConfig) -> Self {
        Self::with_backends(config, MemoryStorage::new(), MemoryCookies::from_header(header))
    }

    fn with_backends(config: ThemeConfig, storage: MemoryStorage, cookies: MemoryCookies) -> Self {
        let config = match config.validated() {
            Ok(config) => config,
            Err(err) => {
                let err = Error::from(err);
                tracing::warn!(error = %err, degradation = %err.degradation(), "theme config rejected");
                ThemeConfig::default()
            }
        };
        let document = MemoryDocument::new();
        let scheme = FixedColorScheme::default();
        let store = ThemeStore::builder()
            .config(config.clone())
            .storage(storage.clone())
            .cookies(cookies.clone())
            .document(document.clone())
            .color_scheme(scheme.clone())
            .build();
        let styles = StyleStore::new(config, storage.clone(), cookies.clone(), document.clone());
        Self {
            store,
            styles,
            storage,
            cookies,
            document,
            scheme,
        }
    }

    /// Initialize both stores, as a page does on load.
    pub fn init(&self) -> (ThemeChange, VariantChange) {
        (self.store.init(), self.styles.init())
    }

    /// `<html>` attributes for the current theme and variant.
    #[must_use]
    pub fn root_attributes(&self) -> RootAttributes {
        RootAttributes::relative_to(self.store.get_theme(), self.store.config().default_theme)
            .with_variant(self.styles.get_variant())
    }

    /// Set a theme by name, unifying the error type.
    pub fn set_theme(&self, name: &str) -> Result<ThemeChange> {
        Ok(self.store.set_theme_str(name)?)
    }

    /// Set a style variant by name, unifying the error type.
    pub fn set_variant(&self, name: &str) -> Result<VariantChange> {
        Ok(self.styles.set_variant_str(name)?)
    }
}

/// Prelude for day-to-day usage.
pub mod prelude {
    pub use crate::{
        ControlAction, ControlKind, Degradation, Error, Result, StyleVariant, ThemeChange,
        ThemeConfig, ThemeControls, ThemeLayer, ThemeName, ThemeStore,
    };

    pub use crate::{runtime, style, web};
}

pub use vpc_runtime as runtime;
pub use vpc_style as style;
pub use vpc_web as web;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_layer_paints_default() {
        let layer = ThemeLayer::in_memory(ThemeConfig::default());
        let (theme, variant) = layer.init();
        assert_eq!(theme.theme, ThemeName::Dark);
        assert_eq!(variant.variant, StyleVariant::Classic);
        assert_eq!(
            layer.document.data_attribute("theme").as_deref(),
            Some("dark")
        );
    }

    #[test]
    fn set_theme_maps_rejection() {
        let layer = ThemeLayer::in_memory(ThemeConfig::default());
        let err = layer.set_theme("neon").expect_err("unknown name");
        assert_eq!(err.degradation(), Degradation::RejectChange);
        assert_eq!(layer.store.get_theme(), ThemeName::Dark);
    }

    #[test]
    fn invalid_config_falls_back() {
        let config = ThemeConfig {
            storage_key: String::new(),
            ..ThemeConfig::default()
        };
        let layer = ThemeLayer::in_memory(config);
        assert_eq!(layer.store.config().storage_key, "vpc_theme");
    }

    #[test]
    fn root_attributes_follow_configured_default() {
        let config = ThemeConfig {
            default_theme: ThemeName::Vpc,
            ..ThemeConfig::default()
        };
        let layer = ThemeLayer::in_memory(config);
        layer.init();
        assert_eq!(layer.root_attributes().class_token, None);

        layer.set_theme("dark").expect("known theme");
        assert_eq!(layer.root_attributes().class_token, Some("theme-dark"));
    }
}
