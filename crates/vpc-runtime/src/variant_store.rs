#![forbid(unsafe_code)]

//! Style-variant store: the `classic` / `aurora` page chrome selection.
//!
//! Follows the same rules as the theme store (storage, then cookie, then
//! default; rejected unknown names; best-effort persistence) but has no
//! system preference and no palette.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::{error, info, warn};
use vpc_style::StyleVariant;

use crate::broadcast::{Broadcaster, Subscription};
use crate::config::ThemeConfig;
use crate::cookie::{CookieJar, NoopCookies, format_assignment};
use crate::document::{DocumentRoot, NoopDocument, STYLE_DATA_ATTRIBUTE};
use crate::persistence::{DurableStorage, NoopStorage};

/// Variant change notification payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantChange {
    pub variant: StyleVariant,
    pub previous: StyleVariant,
}

/// A requested variant name outside the built-in set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidVariant {
    pub requested: String,
}

impl fmt::Display for InvalidVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid style variant {:?}", self.requested)
    }
}

impl std::error::Error for InvalidVariant {}

struct VariantInner {
    config: ThemeConfig,
    storage: Box<dyn DurableStorage>,
    cookies: Box<dyn CookieJar>,
    document: Box<dyn DocumentRoot>,
    current: Cell<Option<StyleVariant>>,
    changes: Broadcaster<VariantChange>,
}

/// Page-wide style variant state. Clones share state.
#[derive(Clone)]
pub struct StyleStore {
    inner: Rc<VariantInner>,
}

impl fmt::Debug for StyleStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleStore")
            .field("current", &self.inner.current.get())
            .finish_non_exhaustive()
    }
}

impl StyleStore {
    /// Store with no persistence and no document.
    #[must_use]
    pub fn detached(config: ThemeConfig) -> Self {
        Self::new(config, NoopStorage, NoopCookies, NoopDocument)
    }

    #[must_use]
    pub fn new(
        config: ThemeConfig,
        storage: impl DurableStorage + 'static,
        cookies: impl CookieJar + 'static,
        document: impl DocumentRoot + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(VariantInner {
                config,
                storage: Box::new(storage),
                cookies: Box::new(cookies),
                document: Box::new(document),
                current: Cell::new(None),
                changes: Broadcaster::new("stylechange"),
            }),
        }
    }

    #[must_use]
    pub fn get_variant(&self) -> StyleVariant {
        self.inner.current.get().unwrap_or_else(|| self.resolve())
    }

    /// Storage, then cookie, then the configured default.
    #[must_use]
    pub fn resolve(&self) -> StyleVariant {
        let inner = &self.inner;
        let stored = match inner.storage.get(&inner.config.style_storage_key) {
            Ok(value) => value.as_deref().and_then(StyleVariant::parse),
            Err(err) => {
                warn!(error = %err, "durable storage unavailable");
                None
            }
        };
        let from_cookie = || match inner.cookies.get(&inner.config.style_cookie_name) {
            Ok(value) => value.as_deref().and_then(StyleVariant::parse),
            Err(err) => {
                warn!(error = %err, "cookies unavailable");
                None
            }
        };
        stored
            .or_else(from_cookie)
            .unwrap_or(inner.config.default_variant)
    }

    /// Resolve and apply once at page load.
    pub fn init(&self) -> VariantChange {
        let change = self.set_variant(self.resolve());
        info!(variant = %change.variant, "style variant initialized");
        change
    }

    pub fn set_variant(&self, variant: StyleVariant) -> VariantChange {
        let inner = &self.inner;
        let previous = inner.current.get().unwrap_or(inner.config.default_variant);
        inner.current.set(Some(variant));

        inner
            .document
            .set_data_attribute(STYLE_DATA_ATTRIBUTE, variant.as_str());

        if let Err(err) = inner
            .storage
            .set(&inner.config.style_storage_key, variant.as_str())
        {
            warn!(error = %err, "unable to write style variant to durable storage");
        }
        let assignment = format_assignment(
            &inner.config.style_cookie_name,
            variant.as_str(),
            &inner.config.cookie,
        );
        if let Err(err) = inner.cookies.write(&assignment) {
            warn!(error = %err, "unable to write style variant cookie");
        }

        let change = VariantChange { variant, previous };
        inner.changes.publish(&change);
        change
    }

    pub fn set_variant_str(&self, name: &str) -> Result<VariantChange, InvalidVariant> {
        match StyleVariant::parse(name) {
            Some(variant) => Ok(self.set_variant(variant)),
            None => {
                error!(requested = name, "invalid style variant");
                Err(InvalidVariant {
                    requested: name.to_string(),
                })
            }
        }
    }

    /// Advance to the next variant in cycle order.
    pub fn cycle_variant(&self) -> VariantChange {
        self.set_variant(self.get_variant().next())
    }

    #[must_use]
    pub fn variant_label(&self, name: &str) -> String {
        StyleVariant::parse(name)
            .map(|variant| variant.label().to_string())
            .unwrap_or_else(|| name.to_string())
    }

    pub fn subscribe(&self, callback: impl Fn(&VariantChange) + 'static) -> Subscription {
        self.inner.changes.subscribe(callback)
    }
}
