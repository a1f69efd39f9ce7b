#![forbid(unsafe_code)]

//! Theme layer error model and graceful degradation.
//!
//! No error stops the page. Each variant maps to a [`Degradation`]: the
//! recovery the layer already applied, which callers can log or surface.
//!
//! | error                       | degradation |
//! |-----------------------------|-------------|
//! | unknown theme / variant     | [`Degradation::RejectChange`] |
//! | storage or cookie failure   | [`Degradation::InMemoryOnly`] |
//! | missing DOM global / target | [`Degradation::SkipControl`] |
//! | invalid configuration       | [`Degradation::UseDefaults`] |

use std::fmt;

use vpc_runtime::{ConfigError, InvalidTheme, InvalidVariant, StorageError};
use vpc_web::WebError;

/// Top-level error type for the theme layer.
#[derive(Debug)]
pub enum Error {
    /// Durable storage or cookie access failed.
    Storage(StorageError),
    /// A theme name outside the built-in set.
    InvalidTheme(InvalidTheme),
    /// A style variant outside the built-in set.
    InvalidVariant(InvalidVariant),
    /// Configuration failed to load or validate.
    Config(ConfigError),
    /// A browser object or DOM call was unavailable.
    Web(WebError),
}

/// Standard result type for theme layer APIs.
pub type Result<T> = std::result::Result<T, Error>;

// ── Graceful Degradation ────────────────────────────────────────────────

/// What the layer does instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degradation {
    /// The request is dropped; theme, document and storage are unchanged.
    RejectChange,
    /// The change applies to this page only and is lost on reload.
    InMemoryOnly,
    /// The affected control or listener is left unwired.
    SkipControl,
    /// Built-in keys, cookie attributes and defaults are used.
    UseDefaults,
}

impl Error {
    #[must_use]
    pub fn degradation(&self) -> Degradation {
        match self {
            Self::InvalidTheme(_) | Self::InvalidVariant(_) => Degradation::RejectChange,
            Self::Storage(_) => Degradation::InMemoryOnly,
            Self::Web(_) => Degradation::SkipControl,
            Self::Config(_) => Degradation::UseDefaults,
        }
    }

    /// Error type label for tracing fields.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Storage(_) => "storage",
            Self::InvalidTheme(_) => "invalid_theme",
            Self::InvalidVariant(_) => "invalid_variant",
            Self::Config(_) => "config",
            Self::Web(_) => "web",
        }
    }

    /// Always true: every degradation keeps the page usable.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        true
    }
}

// ── Display ─────────────────────────────────────────────────────────────

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "storage: {err}"),
            Self::InvalidTheme(err) => write!(f, "{err}"),
            Self::InvalidVariant(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "config: {err}"),
            Self::Web(err) => write!(f, "web: {err}"),
        }
    }
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RejectChange => write!(f, "reject_change"),
            Self::InMemoryOnly => write!(f, "in_memory_only"),
            Self::SkipControl => write!(f, "skip_control"),
            Self::UseDefaults => write!(f, "use_defaults"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::InvalidTheme(err) => Some(err),
            Self::InvalidVariant(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Web(err) => Some(err),
        }
    }
}

// ── From conversions ────────────────────────────────────────────────────

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<InvalidTheme> for Error {
    fn from(err: InvalidTheme) -> Self {
        Self::InvalidTheme(err)
    }
}

impl From<InvalidVariant> for Error {
    fn from(err: InvalidVariant) -> Self {
        Self::InvalidVariant(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<WebError> for Error {
    fn from(err: WebError) -> Self {
        Self::Web(err)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::error::Error as StdError;

    use super::*;

    #[test]
    fn invalid_names_reject_change() {
        let err = Error::from(InvalidTheme {
            requested: "sepia".into(),
        });
        assert_eq!(err.degradation(), Degradation::RejectChange);
        assert_eq!(err.error_type(), "invalid_theme");
        assert!(format!("{err}").contains("sepia"));
    }

    #[test]
    fn storage_failure_keeps_memory() {
        let err = Error::from(StorageError::Unavailable("localStorage".into()));
        assert_eq!(err.degradation(), Degradation::InMemoryOnly);
        assert!(format!("{err}").starts_with("storage: "));
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn missing_global_skips_control() {
        let err = Error::from(WebError::MissingGlobal("document"));
        assert_eq!(err.degradation(), Degradation::SkipControl);
        assert_eq!(format!("{err}"), "web: document is not available");
    }

    #[test]
    fn invalid_config_uses_defaults() {
        let err = Error::from(ConfigError::Invalid(vec!["cookie_name is empty".into()]));
        assert_eq!(err.degradation(), Degradation::UseDefaults);
        assert!(err.is_recoverable());
    }

    #[test]
    fn degradation_labels() {
        assert_eq!(Degradation::RejectChange.to_string(), "reject_change");
        assert_eq!(Degradation::InMemoryOnly.to_string(), "in_memory_only");
        assert_eq!(Degradation::SkipControl.to_string(), "skip_control");
        assert_eq!(Degradation::UseDefaults.to_string(), "use_defaults");
    }
}
