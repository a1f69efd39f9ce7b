#![forbid(unsafe_code)]

//! Server-side first-paint attributes.
//!
//! Durable storage is only readable once scripts run, but the theme cookie
//! arrives with the page request. Templates use [`root_attributes`] to emit
//! `<html data-theme=... class=... style=...>` so the first paint already has
//! the right palette.

use tracing::trace;
use vpc_style::{StyleVariant, ThemeName};

use crate::config::ThemeConfig;
use crate::cookie::find_cookie;
use crate::document::RootAttributes;

/// Root attributes for a request carrying `cookie_header` (may be empty).
///
/// Unknown or missing cookie values fall back to the configured defaults.
#[must_use]
pub fn root_attributes(cookie_header: &str, config: &ThemeConfig) -> RootAttributes {
    let theme = find_cookie(cookie_header, &config.cookie_name)
        .and_then(ThemeName::parse)
        .unwrap_or(config.default_theme);
    let variant = find_cookie(cookie_header, &config.style_cookie_name)
        .and_then(StyleVariant::parse)
        .unwrap_or(config.default_variant);
    trace!(theme = %theme, variant = %variant, "first-paint attributes");
    RootAttributes::relative_to(theme, config.default_theme).with_variant(variant)
}
