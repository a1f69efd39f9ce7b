#![forbid(unsafe_code)]

//! The theme store: single source of truth for the active theme on a page.
//!
//! # Resolution order
//!
//! Until [`ThemeStore::init`] or a set operation runs, [`ThemeStore::get_theme`]
//! resolves on every call:
//!
//! 1. durable storage, if it holds a valid name
//! 2. the theme cookie, if it holds a valid name
//! 3. `light` when the system prefers a light colour scheme
//! 4. the configured default
//!
//! # Failure Modes
//!
//! - **Unknown name**: [`ThemeStore::set_theme_str`] logs and returns
//!   [`InvalidTheme`]; nothing changes.
//! - **Storage failure**: logged at `warn`; the in-memory value and the
//!   document still change, only persistence across reloads is lost.
//!
//! # Example
//!
//! ```
//! use vpc_runtime::{MemoryDocument, MemoryStorage, ThemeStore};
//! use vpc_style::ThemeName;
//!
//! let document = MemoryDocument::new();
//! let store = ThemeStore::builder()
//!     .storage(MemoryStorage::new())
//!     .document(document.clone())
//!     .build();
//!
//! store.set_theme(ThemeName::VpcLight);
//! assert_eq!(store.get_theme(), ThemeName::VpcLight);
//! assert_eq!(document.data_attribute("theme").as_deref(), Some("vpc-light"));
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, error, info, warn};
use vpc_style::ThemeName;

use crate::broadcast::{Broadcaster, Subscription};
use crate::color_scheme::{ColorScheme, ColorSchemeSource, FixedColorScheme};
use crate::config::ThemeConfig;
use crate::cookie::{CookieJar, NoopCookies, format_assignment};
use crate::document::{DocumentRoot, NoopDocument, RootAttributes};
use crate::persistence::{DurableStorage, NoopStorage};

/// Change notification payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeChange {
    pub theme: ThemeName,
    pub previous: ThemeName,
}

/// Where a resolved theme came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    Storage,
    Cookie,
    System,
    Default,
}

impl ThemeSource {
    /// Storage and cookie values are choices the user made; the rest are not.
    #[must_use]
    pub const fn is_explicit(self) -> bool {
        matches!(self, Self::Storage | Self::Cookie)
    }
}

/// A requested theme name outside the built-in set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTheme {
    pub requested: String,
}

impl fmt::Display for InvalidTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid theme {:?}", self.requested)
    }
}

impl std::error::Error for InvalidTheme {}

struct StoreInner {
    config: ThemeConfig,
    storage: Box<dyn DurableStorage>,
    cookies: Box<dyn CookieJar>,
    document: Box<dyn DocumentRoot>,
    scheme: Box<dyn ColorSchemeSource>,
    current: Cell<Option<ThemeName>>,
    /// Set once the user chose a theme on this page or one was recovered
    /// from storage or the cookie; survives unavailable persistence.
    explicit: Cell<bool>,
    changes: Broadcaster<ThemeChange>,
}

/// Page-wide theme state with injected persistence and presentation.
///
/// Cloning creates another handle to the **same** store; controls keep
/// clones so they can call back into it from event handlers.
#[derive(Clone)]
pub struct ThemeStore {
    inner: Rc<StoreInner>,
}

impl fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeStore")
            .field("current", &self.inner.current.get())
            .field("storage_key", &self.inner.config.storage_key)
            .field("subscribers", &self.inner.changes.subscriber_count())
            .finish()
    }
}

/// Builder for [`ThemeStore`]. Every dependency defaults to a no-op.
pub struct ThemeStoreBuilder {
    config: ThemeConfig,
    storage: Box<dyn DurableStorage>,
    cookies: Box<dyn CookieJar>,
    document: Box<dyn DocumentRoot>,
    scheme: Box<dyn ColorSchemeSource>,
}

impl Default for ThemeStoreBuilder {
    fn default() -> Self {
        Self {
            config: ThemeConfig::default(),
            storage: Box::new(NoopStorage),
            cookies: Box::new(NoopCookies),
            document: Box::new(NoopDocument),
            scheme: Box::new(FixedColorScheme::default()),
        }
    }
}

impl ThemeStoreBuilder {
    #[must_use]
    pub fn config(mut self, config: ThemeConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn storage(mut self, storage: impl DurableStorage + 'static) -> Self {
        self.storage = Box::new(storage);
        self
    }

    #[must_use]
    pub fn cookies(mut self, cookies: impl CookieJar + 'static) -> Self {
        self.cookies = Box::new(cookies);
        self
    }

    #[must_use]
    pub fn document(mut self, document: impl DocumentRoot + 'static) -> Self {
        self.document = Box::new(document);
        self
    }

    #[must_use]
    pub fn color_scheme(mut self, scheme: impl ColorSchemeSource + 'static) -> Self {
        self.scheme = Box::new(scheme);
        self
    }

    /// Build an uninitialized store. Nothing is read or written yet.
    #[must_use]
    pub fn build(self) -> ThemeStore {
        ThemeStore {
            inner: Rc::new(StoreInner {
                config: self.config,
                storage: self.storage,
                cookies: self.cookies,
                document: self.document,
                scheme: self.scheme,
                current: Cell::new(None),
                explicit: Cell::new(false),
                changes: Broadcaster::new("themechange"),
            }),
        }
    }
}

impl ThemeStore {
    #[must_use]
    pub fn builder() -> ThemeStoreBuilder {
        ThemeStoreBuilder::default()
    }

    #[must_use]
    pub fn config(&self) -> &ThemeConfig {
        &self.inner.config
    }

    /// Whether `init` or a set operation has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.inner.current.get().is_some()
    }

    /// The current theme. Never fails.
    #[must_use]
    pub fn get_theme(&self) -> ThemeName {
        self.inner
            .current
            .get()
            .unwrap_or_else(|| self.resolve().0)
    }

    /// Whether the current palette is a dark one.
    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.get_theme().is_dark()
    }

    /// Resolve from persistence and system preference, ignoring the
    /// in-memory value.
    #[must_use]
    pub fn resolve(&self) -> (ThemeName, ThemeSource) {
        if let Some(theme) = self.stored_theme() {
            return (theme, ThemeSource::Storage);
        }
        if let Some(theme) = self.cookie_theme() {
            return (theme, ThemeSource::Cookie);
        }
        if self.inner.scheme.preferred() == ColorScheme::Light {
            return (ThemeName::Light, ThemeSource::System);
        }
        (self.inner.config.default_theme, ThemeSource::Default)
    }

    /// Page-load initialization: resolve, apply, notify.
    ///
    /// A theme recovered from storage or the cookie is written back to both
    /// so they agree. A theme derived from the system preference or the
    /// default is applied but not persisted, which keeps later system
    /// colour-scheme changes effective until the user chooses.
    pub fn init(&self) -> ThemeChange {
        let (theme, source) = self.resolve();
        if source.is_explicit() {
            self.inner.explicit.set(true);
        }
        let change = self.commit(theme, source.is_explicit());
        info!(theme = %theme, source = ?source, "theme initialized");
        change
    }

    /// Set the theme, persist it, and notify subscribers.
    ///
    /// Always notifies, even when `theme` equals the current value.
    pub fn set_theme(&self, theme: ThemeName) -> ThemeChange {
        self.inner.explicit.set(true);
        self.commit(theme, true)
    }

    /// String entry point for select controls and query overrides.
    pub fn set_theme_str(&self, name: &str) -> Result<ThemeChange, InvalidTheme> {
        match ThemeName::parse(name) {
            Some(theme) => Ok(self.set_theme(theme)),
            None => {
                error!(requested = name, "invalid theme");
                Err(InvalidTheme {
                    requested: name.to_string(),
                })
            }
        }
    }

    /// Switch to the paired counterpart of the current theme.
    pub fn toggle_theme(&self) -> ThemeChange {
        self.set_theme(self.get_theme().toggled())
    }

    /// Display label for `name`; the raw name when unknown.
    #[must_use]
    pub fn theme_label(&self, name: &str) -> String {
        vpc_style::label_for(name)
    }

    /// Whether the user chose a theme on this page, or durable storage or
    /// the cookie holds a valid choice.
    #[must_use]
    pub fn has_explicit_choice(&self) -> bool {
        self.inner.explicit.get()
            || self.stored_theme().is_some()
            || self.cookie_theme().is_some()
    }

    /// React to an operating-system colour-scheme change.
    ///
    /// Ignored once the user has made an explicit choice. Otherwise the page
    /// follows the system and the result is not persisted.
    pub fn on_system_scheme_change(&self, prefers_dark: bool) -> Option<ThemeChange> {
        if self.has_explicit_choice() {
            debug!(prefers_dark, "system scheme change ignored, explicit choice made");
            return None;
        }
        let theme = if prefers_dark {
            ThemeName::Dark
        } else {
            ThemeName::Light
        };
        Some(self.commit(theme, false))
    }

    /// Register for change notifications.
    pub fn subscribe(&self, callback: impl Fn(&ThemeChange) + 'static) -> Subscription {
        self.inner.changes.subscribe(callback)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.changes.subscriber_count()
    }

    fn commit(&self, theme: ThemeName, persist: bool) -> ThemeChange {
        let inner = &self.inner;
        let previous = inner.current.get().unwrap_or(inner.config.default_theme);
        inner.current.set(Some(theme));

        RootAttributes::relative_to(theme, inner.config.default_theme)
            .apply_theme(inner.document.as_ref());

        if persist {
            self.persist(theme);
        }

        let change = ThemeChange { theme, previous };
        let delivered = inner.changes.publish(&change);
        debug!(theme = %theme, previous = %previous, delivered, "theme changed");
        change
    }

    fn persist(&self, theme: ThemeName) {
        let inner = &self.inner;
        if let Err(err) = inner.storage.set(&inner.config.storage_key, theme.as_str()) {
            warn!(error = %err, "unable to write theme to durable storage");
        }
        let assignment =
            format_assignment(&inner.config.cookie_name, theme.as_str(), &inner.config.cookie);
        if let Err(err) = inner.cookies.write(&assignment) {
            warn!(error = %err, "unable to write theme cookie");
        }
    }

    fn stored_theme(&self) -> Option<ThemeName> {
        match self.inner.storage.get(&self.inner.config.storage_key) {
            Ok(value) => value.as_deref().and_then(ThemeName::parse),
            Err(err) => {
                warn!(error = %err, "durable storage unavailable");
                None
            }
        }
    }

    fn cookie_theme(&self) -> Option<ThemeName> {
        match self.inner.cookies.get(&self.inner.config.cookie_name) {
            Ok(value) => value.as_deref().and_then(ThemeName::parse),
            Err(err) => {
                warn!(error = %err, "cookies unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookie::MemoryCookies;
    use crate::document::MemoryDocument;
    use crate::persistence::MemoryStorage;
    use std::cell::RefCell;
    use tracing_test::traced_test;

    struct Fixture {
        storage: MemoryStorage,
        cookies: MemoryCookies,
        document: MemoryDocument,
        scheme: FixedColorScheme,
        store: ThemeStore,
    }

    fn fixture() -> Fixture {
        let storage = MemoryStorage::new();
        let cookies = MemoryCookies::new();
        let document = MemoryDocument::new();
        let scheme = FixedColorScheme::default();
        let store = ThemeStore::builder()
            .storage(storage.clone())
            .cookies(cookies.clone())
            .document(document.clone())
            .color_scheme(scheme.clone())
            .build();
        Fixture {
            storage,
            cookies,
            document,
            scheme,
            store,
        }
    }

    #[test]
    fn uninitialized_store_resolves_default() {
        let fx = fixture();
        assert!(!fx.store.is_initialized());
        assert_eq!(fx.store.get_theme(), ThemeName::Dark);
        assert_eq!(fx.store.resolve().1, ThemeSource::Default);
    }

    #[test]
    fn storage_beats_cookie() {
        let fx = fixture();
        fx.storage.set("vpc_theme", "chaos").expect("seed");
        fx.cookies
            .write("vpc_theme=vpc; path=/")
            .expect("seed cookie");
        assert_eq!(fx.store.resolve(), (ThemeName::Chaos, ThemeSource::Storage));
    }

    #[test]
    fn invalid_storage_value_falls_through_to_cookie() {
        let fx = fixture();
        fx.storage.set("vpc_theme", "sepia").expect("seed");
        fx.cookies.write("vpc_theme=vpc-light").expect("seed cookie");
        assert_eq!(fx.store.resolve(), (ThemeName::VpcLight, ThemeSource::Cookie));
    }

    #[test]
    fn system_light_preference_used_last() {
        let fx = fixture();
        fx.scheme.set(ColorScheme::Light);
        assert_eq!(fx.store.resolve(), (ThemeName::Light, ThemeSource::System));
        fx.scheme.set(ColorScheme::Dark);
        assert_eq!(fx.store.resolve(), (ThemeName::Dark, ThemeSource::Default));
    }

    #[test]
    fn configured_default_applies() {
        let store = ThemeStore::builder()
            .config(ThemeConfig {
                default_theme: ThemeName::Vpc,
                ..ThemeConfig::default()
            })
            .build();
        assert_eq!(store.get_theme(), ThemeName::Vpc);
    }

    #[test]
    fn set_theme_persists_and_applies() {
        let fx = fixture();
        let change = fx.store.set_theme(ThemeName::ChaosLight);
        assert_eq!(
            change,
            ThemeChange {
                theme: ThemeName::ChaosLight,
                previous: ThemeName::Dark,
            }
        );
        assert_eq!(fx.storage.peek("vpc_theme").as_deref(), Some("chaos-light"));
        assert_eq!(
            fx.cookies.assignments(),
            vec!["vpc_theme=chaos-light; path=/; max-age=31536000; SameSite=Lax".to_string()]
        );
        assert_eq!(fx.document.data_attribute("theme").as_deref(), Some("chaos-light"));
        assert_eq!(fx.document.classes(), vec!["theme-chaos-light".to_string()]);
    }

    #[test]
    fn previous_tracks_last_value() {
        let fx = fixture();
        fx.store.set_theme(ThemeName::Vpc);
        let change = fx.store.set_theme(ThemeName::Light);
        assert_eq!(change.previous, ThemeName::Vpc);
    }

    #[test]
    #[traced_test]
    fn invalid_name_is_rejected_and_logged() {
        let fx = fixture();
        fx.store.set_theme(ThemeName::Light);
        let writes = fx.document.write_count();

        let err = fx.store.set_theme_str("neon").expect_err("unknown theme");
        assert_eq!(err.requested, "neon");
        assert_eq!(fx.store.get_theme(), ThemeName::Light);
        assert_eq!(fx.document.write_count(), writes);
        assert!(logs_contain("invalid theme"));
    }

    #[test]
    #[traced_test]
    fn storage_failure_does_not_block_switching() {
        let fx = fixture();
        fx.storage.set_unavailable(true);
        let change = fx.store.set_theme(ThemeName::Vpc);
        assert_eq!(change.theme, ThemeName::Vpc);
        assert_eq!(fx.store.get_theme(), ThemeName::Vpc);
        assert_eq!(fx.document.data_attribute("theme").as_deref(), Some("vpc"));
        assert_eq!(fx.cookies.get("vpc_theme").expect("cookie"), Some("vpc".into()));
        assert!(logs_contain("unable to write theme to durable storage"));
    }

    #[test]
    fn toggle_uses_pair_table() {
        let fx = fixture();
        fx.store.set_theme(ThemeName::Vpc);
        assert_eq!(fx.store.toggle_theme().theme, ThemeName::VpcLight);
        assert_eq!(fx.store.toggle_theme().theme, ThemeName::Vpc);
    }

    #[test]
    fn toggle_before_init_starts_from_resolved() {
        let fx = fixture();
        fx.cookies.write("vpc_theme=chaos").expect("seed cookie");
        assert_eq!(fx.store.toggle_theme().theme, ThemeName::ChaosLight);
    }

    #[test]
    fn labels_pass_through_unknown() {
        let fx = fixture();
        assert_eq!(fx.store.theme_label("vpc"), "VPC Dark");
        assert_eq!(fx.store.theme_label("mystery"), "mystery");
    }

    #[test]
    #[traced_test]
    fn init_from_cookie_rewrites_storage() {
        let fx = fixture();
        fx.cookies.write("vpc_theme=light").expect("seed cookie");
        let change = fx.store.init();
        assert_eq!(change.theme, ThemeName::Light);
        assert!(fx.store.is_initialized());
        assert_eq!(fx.storage.peek("vpc_theme").as_deref(), Some("light"));
        assert!(logs_contain("theme initialized"));
    }

    #[test]
    fn init_from_system_does_not_persist() {
        let fx = fixture();
        fx.scheme.set(ColorScheme::Light);
        let change = fx.store.init();
        assert_eq!(change.theme, ThemeName::Light);
        assert_eq!(fx.storage.peek("vpc_theme"), None);
        assert!(fx.cookies.assignments().is_empty());
        assert_eq!(fx.document.data_attribute("theme").as_deref(), Some("light"));
    }

    #[test]
    fn system_change_followed_until_explicit_choice() {
        let fx = fixture();
        fx.store.init();
        let change = fx.store.on_system_scheme_change(false).expect("follows system");
        assert_eq!(change.theme, ThemeName::Light);
        assert!(!fx.store.has_explicit_choice());

        fx.store.set_theme(ThemeName::Chaos);
        assert_eq!(fx.store.on_system_scheme_change(false), None);
        assert_eq!(fx.store.get_theme(), ThemeName::Chaos);
    }

    #[test]
    fn choice_survives_unavailable_persistence() {
        let storage = MemoryStorage::new();
        storage.set_unavailable(true);
        let store = ThemeStore::builder()
            .storage(storage)
            .cookies(NoopCookies)
            .build();
        store.init();
        assert!(!store.has_explicit_choice());

        store.set_theme(ThemeName::Chaos);
        assert!(store.has_explicit_choice());
        assert_eq!(store.on_system_scheme_change(false), None);
        assert_eq!(store.get_theme(), ThemeName::Chaos);
    }

    #[test]
    fn configured_default_theme_has_no_class_token() {
        let document = MemoryDocument::new();
        let store = ThemeStore::builder()
            .config(ThemeConfig {
                default_theme: ThemeName::Vpc,
                ..ThemeConfig::default()
            })
            .document(document.clone())
            .build();

        store.init();
        assert!(document.classes().is_empty());
        store.set_theme(ThemeName::Dark);
        assert_eq!(document.classes(), vec!["theme-dark".to_string()]);
        store.set_theme(ThemeName::Vpc);
        assert!(document.classes().is_empty());
    }

    #[test]
    fn notifications_carry_theme_and_previous() {
        let fx = fixture();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _sub = fx.store.subscribe(move |change| seen_clone.borrow_mut().push(*change));

        fx.store.set_theme(ThemeName::Light);
        fx.store.set_theme(ThemeName::Light);
        assert_eq!(
            *seen.borrow(),
            vec![
                ThemeChange {
                    theme: ThemeName::Light,
                    previous: ThemeName::Dark,
                },
                ThemeChange {
                    theme: ThemeName::Light,
                    previous: ThemeName::Light,
                },
            ]
        );
    }

    #[test]
    fn subscriber_sees_committed_state() {
        let fx = fixture();
        let store = fx.store.clone();
        let observed = Rc::new(Cell::new(None));
        let observed_clone = Rc::clone(&observed);
        let _sub = fx
            .store
            .subscribe(move |_| observed_clone.set(Some(store.get_theme())));
        fx.store.set_theme(ThemeName::VpcLight);
        assert_eq!(observed.get(), Some(ThemeName::VpcLight));
    }

    #[test]
    fn same_value_reentrant_set_is_harmless() {
        let fx = fixture();
        let store = fx.store.clone();
        let calls = Rc::new(Cell::new(0u32));
        let calls_clone = Rc::clone(&calls);
        let _sub = fx.store.subscribe(move |change| {
            calls_clone.set(calls_clone.get() + 1);
            if calls_clone.get() < 3 {
                store.set_theme(change.theme);
            }
        });
        fx.store.set_theme(ThemeName::Chaos);
        assert_eq!(calls.get(), 3);
        assert_eq!(fx.store.get_theme(), ThemeName::Chaos);
    }
}
