#![forbid(unsafe_code)]

//! Query-string overrides applied before the stores initialize.
//!
//! `?theme=light&style=aurora` on any page URL pins the selection: valid
//! values are written to durable storage, so they win resolution on this
//! load and persist to the next. The theme parameter accepts only `light`
//! and `dark`; brand themes are chosen through the page controls. Invalid or
//! missing values change nothing.

use tracing::{debug, warn};
use vpc_style::{StyleVariant, ThemeName};

use crate::config::ThemeConfig;
use crate::persistence::DurableStorage;

/// Parsed `theme` / `style` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LaunchOverrides {
    pub theme: Option<ThemeName>,
    pub variant: Option<StyleVariant>,
}

impl LaunchOverrides {
    /// Parse a query string, with or without the leading `?`.
    ///
    /// The last valid occurrence of each parameter wins.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut overrides = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "theme" => {
                    if let Some(theme) = query_theme(value) {
                        overrides.theme = Some(theme);
                    }
                }
                "style" => {
                    if let Some(variant) = StyleVariant::parse(value) {
                        overrides.variant = Some(variant);
                    }
                }
                _ => {}
            }
        }
        overrides
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.theme.is_none() && self.variant.is_none()
    }

    /// Write the overrides into `storage` under the configured keys.
    pub fn persist(&self, storage: &dyn DurableStorage, config: &ThemeConfig) {
        if let Some(theme) = self.theme {
            match storage.set(&config.storage_key, theme.as_str()) {
                Ok(()) => debug!(theme = %theme, "theme pinned by query"),
                Err(err) => warn!(error = %err, "unable to persist theme override"),
            }
        }
        if let Some(variant) = self.variant {
            match storage.set(&config.style_storage_key, variant.as_str()) {
                Ok(()) => debug!(variant = %variant, "style pinned by query"),
                Err(err) => warn!(error = %err, "unable to persist style override"),
            }
        }
    }
}

fn query_theme(value: &str) -> Option<ThemeName> {
    match ThemeName::parse(value)? {
        theme @ (ThemeName::Light | ThemeName::Dark) => Some(theme),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn parses_both_parameters() {
        let overrides = LaunchOverrides::from_query("?theme=light&style=aurora&page=2");
        assert_eq!(overrides.theme, Some(ThemeName::Light));
        assert_eq!(overrides.variant, Some(StyleVariant::Aurora));
    }

    #[test]
    fn ignores_invalid_and_bare_keys() {
        let overrides = LaunchOverrides::from_query("theme=sepia&style&theme");
        assert!(overrides.is_empty());
        assert!(LaunchOverrides::from_query("").is_empty());
    }

    #[test]
    fn last_valid_value_wins() {
        let overrides = LaunchOverrides::from_query("theme=light&theme=dark&theme=bogus");
        assert_eq!(overrides.theme, Some(ThemeName::Dark));
    }

    #[test]
    fn brand_themes_are_not_query_overrides() {
        for name in ["vpc", "vpc-light", "chaos", "chaos-light"] {
            let overrides = LaunchOverrides::from_query(&format!("?theme={name}"));
            assert_eq!(overrides.theme, None, "{name}");
        }
        let overrides = LaunchOverrides::from_query("theme=dark&theme=vpc");
        assert_eq!(overrides.theme, Some(ThemeName::Dark));
    }

    #[test]
    fn persist_writes_configured_keys() {
        let storage = MemoryStorage::new();
        LaunchOverrides::from_query("theme=light&style=aurora")
            .persist(&storage, &ThemeConfig::default());
        assert_eq!(storage.peek("vpc_theme").as_deref(), Some("light"));
        assert_eq!(storage.peek("vpc_style").as_deref(), Some("aurora"));
    }

    #[test]
    fn empty_overrides_write_nothing() {
        let storage = MemoryStorage::new();
        LaunchOverrides::default().persist(&storage, &ThemeConfig::default());
        assert_eq!(storage.write_count(), 0);
    }
}
