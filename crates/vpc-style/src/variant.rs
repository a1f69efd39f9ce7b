#![forbid(unsafe_code)]

//! Layout style variants, orthogonal to the colour theme.

use std::fmt;
use std::str::FromStr;

/// Page chrome variant, exposed on the document root as `data-style`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum StyleVariant {
    #[default]
    Classic,
    Aurora,
}

impl StyleVariant {
    /// Cycle order.
    pub const ALL: [StyleVariant; 2] = [StyleVariant::Classic, StyleVariant::Aurora];

    pub const DEFAULT: StyleVariant = StyleVariant::Classic;

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Aurora => "aurora",
        }
    }

    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|variant| variant.as_str() == name)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Classic => "Classic",
            Self::Aurora => "Aurora",
        }
    }

    /// Next variant in cycle order, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Classic => Self::Aurora,
            Self::Aurora => Self::Classic,
        }
    }
}

impl fmt::Display for StyleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the style variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown style variant {:?}", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

impl FromStr for StyleVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_visits_every_variant() {
        let mut seen = vec![StyleVariant::DEFAULT];
        let mut current = StyleVariant::DEFAULT.next();
        while current != StyleVariant::DEFAULT {
            seen.push(current);
            current = current.next();
        }
        assert_eq!(seen, StyleVariant::ALL.to_vec());
    }

    #[test]
    fn parse_and_labels() {
        assert_eq!(StyleVariant::parse("aurora"), Some(StyleVariant::Aurora));
        assert_eq!(StyleVariant::parse("neon"), None);
        assert_eq!(StyleVariant::Classic.label(), "Classic");
        assert!("Aurora".parse::<StyleVariant>().is_err());
    }
}
