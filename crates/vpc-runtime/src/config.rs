#![forbid(unsafe_code)]

//! Configuration for the theme layer.
//!
//! Every field defaults to the value the shop pages have always used, so
//! `ThemeConfig::default()` needs no file at all. Deployments that share a
//! domain with another app can rename the keys to avoid collisions.
//!
//! # Loading
//!
//! ```toml
//! # vpc-theme.toml
//! storage_key = "vpc_theme"
//! default_theme = "dark"
//!
//! [cookie]
//! path = "/"
//! max_age_secs = 31536000
//! same_site = "Lax"
//! ```
//!
//! ```rust,ignore
//! let config = ThemeConfig::from_toml_file("vpc-theme.toml")?;
//! ```

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use std::fmt;

use vpc_style::{StyleVariant, ThemeName};

use crate::cookie::CookieAttributes;

/// Theme layer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ThemeConfig {
    /// Durable storage key for the theme name. Default: `vpc_theme`.
    pub storage_key: String,
    /// Cookie carrying the theme name. Default: `vpc_theme`.
    pub cookie_name: String,
    /// Durable storage key for the style variant. Default: `vpc_style`.
    pub style_storage_key: String,
    /// Cookie carrying the style variant. Default: `vpc_style`.
    pub style_cookie_name: String,
    /// Theme used when nothing else resolves. Default: `dark`.
    pub default_theme: ThemeName,
    /// Variant used when nothing else resolves. Default: `classic`.
    pub default_variant: StyleVariant,
    /// Attributes on every cookie written.
    pub cookie: CookieAttributes,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "vpc_theme".into(),
            cookie_name: "vpc_theme".into(),
            style_storage_key: "vpc_style".into(),
            style_cookie_name: "vpc_style".into(),
            default_theme: ThemeName::DEFAULT,
            default_variant: StyleVariant::DEFAULT,
            cookie: CookieAttributes::default(),
        }
    }
}

/// Failure loading a [`ThemeConfig`].
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Parsed, but [`ThemeConfig::validate`] reported problems.
    Invalid(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "config I/O error: {err}"),
            #[cfg(feature = "config")]
            Self::Toml(err) => write!(f, "config TOML error: {err}"),
            #[cfg(feature = "config")]
            Self::Json(err) => write!(f, "config JSON error: {err}"),
            Self::Invalid(problems) => write!(f, "invalid config: {}", problems.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            #[cfg(feature = "config")]
            Self::Toml(err) => Some(err),
            #[cfg(feature = "config")]
            Self::Json(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

fn is_cookie_token(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b))
}

impl ThemeConfig {
    /// Load from a TOML string and validate.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(s)
            .map_err(ConfigError::Toml)?
            .validated()
    }

    /// Load from a TOML file on disk and validate.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string and validate.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(s)
            .map_err(ConfigError::Json)?
            .validated()
    }

    /// Validate every field. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (field, key) in [
            ("storage_key", &self.storage_key),
            ("style_storage_key", &self.style_storage_key),
        ] {
            if key.is_empty() {
                errors.push(format!("{field} must not be empty"));
            }
        }

        for (field, name) in [
            ("cookie_name", &self.cookie_name),
            ("style_cookie_name", &self.style_cookie_name),
        ] {
            if !is_cookie_token(name) {
                errors.push(format!("{field} is not a valid cookie name: {name:?}"));
            }
        }

        if self.storage_key == self.style_storage_key && !self.storage_key.is_empty() {
            errors.push("storage_key and style_storage_key must differ".into());
        }
        if self.cookie_name == self.style_cookie_name && !self.cookie_name.is_empty() {
            errors.push("cookie_name and style_cookie_name must differ".into());
        }

        if !self.cookie.path.starts_with('/') || self.cookie.path.contains(';') {
            errors.push(format!(
                "cookie.path must start with '/' and contain no ';', got {:?}",
                self.cookie.path
            ));
        }
        if self.cookie.max_age_secs == 0 {
            errors.push("cookie.max_age_secs must be > 0".into());
        }

        errors
    }

    /// `self` if valid, otherwise [`ConfigError::Invalid`].
    pub fn validated(self) -> Result<Self, ConfigError> {
        let problems = self.validate();
        if problems.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }
}
