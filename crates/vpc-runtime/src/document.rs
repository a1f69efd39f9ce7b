#![forbid(unsafe_code)]

//! Document-root presentation seam and the attribute set a theme implies.
//!
//! [`RootAttributes`] is computed once per selection and then either applied
//! to a live [`DocumentRoot`] or rendered as an attribute string for
//! server-side templates. Both paths share the same data so the first paint
//! and the live page cannot disagree.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use vpc_style::{Rgb, StyleVariant, ThemeName};

/// Data attribute (without the `data-` prefix) holding the theme name.
pub const THEME_DATA_ATTRIBUTE: &str = "theme";
/// Data attribute (without the `data-` prefix) holding the style variant.
pub const STYLE_DATA_ATTRIBUTE: &str = "style";
/// Background custom property.
pub const BG_PROPERTY: &str = "--color-bg";
/// Text custom property.
pub const TEXT_PROPERTY: &str = "--color-text";

/// Mutable presentation attributes on the document root (`<html>`).
///
/// Implementations are infallible from the caller's view: a missing element
/// is a no-op, never an error.
pub trait DocumentRoot {
    /// Set `data-<name>` to `value`.
    fn set_data_attribute(&self, name: &str, value: &str);
    fn add_class(&self, token: &str);
    fn remove_class(&self, token: &str);
    /// Set an inline style property, including custom properties.
    fn set_style_property(&self, name: &str, value: &str);
}

/// A document root that ignores every write.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDocument;

impl DocumentRoot for NoopDocument {
    fn set_data_attribute(&self, _name: &str, _value: &str) {}
    fn add_class(&self, _token: &str) {}
    fn remove_class(&self, _token: &str) {}
    fn set_style_property(&self, _name: &str, _value: &str) {}
}

#[derive(Debug, Default)]
struct MemoryDocumentInner {
    data: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    style: BTreeMap<String, String>,
    writes: u64,
}

/// Recording document root for tests and headless rendering. Clones share
/// state.
#[derive(Debug, Default, Clone)]
pub struct MemoryDocument {
    inner: Rc<RefCell<MemoryDocumentInner>>,
}

impl MemoryDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn data_attribute(&self, name: &str) -> Option<String> {
        self.inner.borrow().data.get(name).cloned()
    }

    #[must_use]
    pub fn has_class(&self, token: &str) -> bool {
        self.inner.borrow().classes.contains(token)
    }

    /// All class tokens, sorted.
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.inner.borrow().classes.iter().cloned().collect()
    }

    #[must_use]
    pub fn style_property(&self, name: &str) -> Option<String> {
        self.inner.borrow().style.get(name).cloned()
    }

    /// Total number of mutations applied.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.inner.borrow().writes
    }
}

impl DocumentRoot for MemoryDocument {
    fn set_data_attribute(&self, name: &str, value: &str) {
        let mut inner = self.inner.borrow_mut();
        inner.data.insert(name.to_string(), value.to_string());
        inner.writes += 1;
    }

    fn add_class(&self, token: &str) {
        let mut inner = self.inner.borrow_mut();
        inner.classes.insert(token.to_string());
        inner.writes += 1;
    }

    fn remove_class(&self, token: &str) {
        let mut inner = self.inner.borrow_mut();
        inner.classes.remove(token);
        inner.writes += 1;
    }

    fn set_style_property(&self, name: &str, value: &str) {
        let mut inner = self.inner.borrow_mut();
        inner.style.insert(name.to_string(), value.to_string());
        inner.writes += 1;
    }
}

/// Everything a selection writes onto the document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootAttributes {
    pub theme: ThemeName,
    pub class_token: Option<&'static str>,
    pub background: Rgb,
    pub text: Rgb,
    pub variant: Option<StyleVariant>,
}

impl RootAttributes {
    /// Attributes for a theme alone, with [`ThemeName::DEFAULT`] as the
    /// page default.
    #[must_use]
    pub fn for_theme(theme: ThemeName) -> Self {
        Self::relative_to(theme, ThemeName::DEFAULT)
    }

    /// Attributes for `theme` on a page whose default is `default_theme`;
    /// only the default goes without a class token.
    #[must_use]
    pub fn relative_to(theme: ThemeName, default_theme: ThemeName) -> Self {
        let palette = theme.palette();
        Self {
            theme,
            class_token: theme.class_token_for(default_theme),
            background: palette.background,
            text: palette.text,
            variant: None,
        }
    }

    #[must_use]
    pub fn with_variant(mut self, variant: StyleVariant) -> Self {
        self.variant = Some(variant);
        self
    }

    /// Apply the theme part: clear every theme class, add this theme's
    /// token, set `data-theme` and both colour properties.
    pub fn apply_theme(&self, document: &dyn DocumentRoot) {
        for token in ThemeName::all_class_tokens() {
            document.remove_class(token);
        }
        if let Some(token) = self.class_token {
            document.add_class(token);
        }
        document.set_data_attribute(THEME_DATA_ATTRIBUTE, self.theme.as_str());
        document.set_style_property(BG_PROPERTY, &self.background.to_hex());
        document.set_style_property(TEXT_PROPERTY, &self.text.to_hex());
    }

    /// Apply everything, including `data-style` when a variant is set.
    pub fn apply(&self, document: &dyn DocumentRoot) {
        self.apply_theme(document);
        if let Some(variant) = self.variant {
            document.set_data_attribute(STYLE_DATA_ATTRIBUTE, variant.as_str());
        }
    }

    /// Render as an HTML attribute list for the `<html>` tag.
    ///
    /// Every value is a wire name or a hex colour, so no escaping is needed.
    #[must_use]
    pub fn to_html_attributes(&self) -> String {
        let mut out = format!("data-theme=\"{}\"", self.theme.as_str());
        if let Some(variant) = self.variant {
            out.push_str(&format!(" data-style=\"{}\"", variant.as_str()));
        }
        if let Some(token) = self.class_token {
            out.push_str(&format!(" class=\"{token}\""));
        }
        out.push_str(&format!(
            " style=\"{BG_PROPERTY}: {}; {TEXT_PROPERTY}: {};\"",
            self.background.to_hex(),
            self.text.to_hex()
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_theme_swaps_class_tokens() {
        let doc = MemoryDocument::new();
        RootAttributes::for_theme(ThemeName::Vpc).apply_theme(&doc);
        assert_eq!(doc.classes(), vec!["theme-vpc".to_string()]);

        RootAttributes::for_theme(ThemeName::ChaosLight).apply_theme(&doc);
        assert_eq!(doc.classes(), vec!["theme-chaos-light".to_string()]);

        RootAttributes::for_theme(ThemeName::Dark).apply_theme(&doc);
        assert!(doc.classes().is_empty());
        assert_eq!(doc.data_attribute("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn configured_default_drops_its_own_token() {
        let doc = MemoryDocument::new();
        RootAttributes::relative_to(ThemeName::Vpc, ThemeName::Vpc).apply_theme(&doc);
        assert!(doc.classes().is_empty());

        RootAttributes::relative_to(ThemeName::Dark, ThemeName::Vpc).apply_theme(&doc);
        assert_eq!(doc.classes(), vec!["theme-dark".to_string()]);
    }

    #[test]
    fn apply_theme_sets_colour_properties() {
        let doc = MemoryDocument::new();
        RootAttributes::for_theme(ThemeName::Light).apply_theme(&doc);
        assert_eq!(doc.style_property(BG_PROPERTY).as_deref(), Some("#f7f9fc"));
        assert_eq!(doc.style_property(TEXT_PROPERTY).as_deref(), Some("#0f172a"));
    }

    #[test]
    fn apply_leaves_style_alone_without_variant() {
        let doc = MemoryDocument::new();
        RootAttributes::for_theme(ThemeName::Light).apply(&doc);
        assert_eq!(doc.data_attribute("style"), None);
        RootAttributes::for_theme(ThemeName::Light)
            .with_variant(StyleVariant::Aurora)
            .apply(&doc);
        assert_eq!(doc.data_attribute("style").as_deref(), Some("aurora"));
    }

    #[test]
    fn noop_document_accepts_everything() {
        RootAttributes::for_theme(ThemeName::Chaos).apply(&NoopDocument);
    }
}
