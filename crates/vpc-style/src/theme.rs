#![forbid(unsafe_code)]

//! The closed set of shop themes and their fixed lookup tables.
//!
//! Every table (labels, toggle pairs, palettes, indicator colours) is a
//! `match` on [`ThemeName`], so adding a theme is a compile error until each
//! table covers it.

use std::fmt;
use std::str::FromStr;

use crate::color::Rgb;

/// Built-in theme identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ThemeName {
    /// Neutral dark palette (default).
    #[default]
    Dark,
    /// Neutral light palette.
    Light,
    /// VPC brand, dark.
    Vpc,
    /// VPC brand, light.
    VpcLight,
    /// Chaotic brand, dark.
    Chaos,
    /// Chaotic brand, light.
    ChaosLight,
}

/// Background and text colour applied to the document root before the
/// stylesheet loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub text: Rgb,
}

impl ThemeName {
    pub const ALL: [ThemeName; 6] = [
        ThemeName::Dark,
        ThemeName::Light,
        ThemeName::Vpc,
        ThemeName::VpcLight,
        ThemeName::Chaos,
        ThemeName::ChaosLight,
    ];

    /// Theme used when nothing valid is stored and the system has no
    /// light preference.
    pub const DEFAULT: ThemeName = ThemeName::Dark;

    /// Wire name, as stored in durable storage, cookies and `data-theme`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::Vpc => "vpc",
            Self::VpcLight => "vpc-light",
            Self::Chaos => "chaos",
            Self::ChaosLight => "chaos-light",
        }
    }

    /// Parse a wire name. Exact match only; anything else is `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|theme| theme.as_str() == name)
    }

    /// Human-readable label for menus and toggle buttons.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
            Self::Vpc => "VPC Dark",
            Self::VpcLight => "VPC Light",
            Self::Chaos => "Chaotic Dark",
            Self::ChaosLight => "Chaotic Light",
        }
    }

    /// The paired counterpart used by the toggle control.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
            Self::Vpc => Self::VpcLight,
            Self::VpcLight => Self::Vpc,
            Self::Chaos => Self::ChaosLight,
            Self::ChaosLight => Self::Chaos,
        }
    }

    /// Class name on the document root, `theme-<name>`.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Dark => "theme-dark",
            Self::Light => "theme-light",
            Self::Vpc => "theme-vpc",
            Self::VpcLight => "theme-vpc-light",
            Self::Chaos => "theme-chaos",
            Self::ChaosLight => "theme-chaos-light",
        }
    }

    /// Class token when `default` is the page default. The default theme has
    /// none; every other theme carries its [`class_name`](Self::class_name).
    #[must_use]
    pub fn class_token_for(self, default: Self) -> Option<&'static str> {
        (self != default).then(|| self.class_name())
    }

    /// Class token relative to [`ThemeName::DEFAULT`].
    #[must_use]
    pub fn class_token(self) -> Option<&'static str> {
        self.class_token_for(Self::DEFAULT)
    }

    /// Every class token any theme may set, for clearing before applying.
    #[must_use]
    pub fn all_class_tokens() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().map(Self::class_name)
    }

    /// First-paint palette.
    #[must_use]
    pub const fn palette(self) -> Palette {
        let (background, text) = match self {
            Self::Dark => (0x0e141b, 0xe6edf3),
            Self::Light => (0xf7f9fc, 0x0f172a),
            Self::Vpc => (0x0b1220, 0xe6edf7),
            Self::VpcLight => (0xf7faff, 0x0f172a),
            Self::Chaos => (0x0d0b12, 0xf1eafe),
            Self::ChaosLight => (0xfbfaff, 0x0f172a),
        };
        Palette {
            background: Rgb::from_u32(background),
            text: Rgb::from_u32(text),
        }
    }

    /// Dot colour shown next to the label on toggle buttons.
    #[must_use]
    pub const fn indicator(self) -> Rgb {
        Rgb::from_u32(match self {
            Self::Dark => 0x22c55e,
            Self::Light => 0xf97316,
            Self::Vpc => 0x38bdf8,
            Self::VpcLight | Self::ChaosLight => 0x0f172a,
            Self::Chaos => 0xa855f7,
        })
    }

    /// Whether the palette background is darker than its text.
    #[must_use]
    pub fn is_dark(self) -> bool {
        let palette = self.palette();
        palette.background.relative_luminance() < palette.text.relative_luminance()
    }
}

/// Label lookup for arbitrary strings: the known label, or the raw input.
#[must_use]
pub fn label_for(name: &str) -> String {
    ThemeName::parse(name)
        .map(|theme| theme.label().to_string())
        .unwrap_or_else(|| name.to_string())
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the built-in theme names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTheme(pub String);

impl fmt::Display for UnknownTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown theme {:?}", self.0)
    }
}

impl std::error::Error for UnknownTheme {}

impl FromStr for ThemeName {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownTheme(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::meets_wcag_aa;

    #[test]
    fn wire_names_round_trip() {
        for theme in ThemeName::ALL {
            assert_eq!(ThemeName::parse(theme.as_str()), Some(theme));
            assert_eq!(theme.as_str().parse::<ThemeName>(), Ok(theme));
        }
    }

    #[test]
    fn parse_is_exact() {
        assert_eq!(ThemeName::parse("Dark"), None);
        assert_eq!(ThemeName::parse(" dark"), None);
        assert_eq!(ThemeName::parse("midnight"), None);
        assert_eq!(
            "midnight".parse::<ThemeName>(),
            Err(UnknownTheme("midnight".into()))
        );
    }

    #[test]
    fn toggle_pairs_are_involutions() {
        for theme in ThemeName::ALL {
            assert_ne!(theme.toggled(), theme);
            assert_eq!(theme.toggled().toggled(), theme);
        }
    }

    #[test]
    fn only_default_has_no_class_token() {
        for theme in ThemeName::ALL {
            assert_eq!(theme.class_token().is_none(), theme == ThemeName::DEFAULT);
        }
        assert_eq!(ThemeName::all_class_tokens().count(), 6);
    }

    #[test]
    fn class_token_follows_configured_default() {
        assert_eq!(ThemeName::Vpc.class_token_for(ThemeName::Vpc), None);
        assert_eq!(
            ThemeName::Dark.class_token_for(ThemeName::Vpc),
            Some("theme-dark")
        );
        for theme in ThemeName::ALL {
            for default in ThemeName::ALL {
                assert_eq!(theme.class_token_for(default).is_none(), theme == default);
            }
        }
    }

    #[test]
    fn class_token_embeds_wire_name() {
        for theme in ThemeName::ALL {
            assert_eq!(theme.class_name(), format!("theme-{}", theme.as_str()));
        }
    }

    #[test]
    fn labels_fall_back_to_raw_name() {
        assert_eq!(label_for("vpc-light"), "VPC Light");
        assert_eq!(label_for("chaos"), "Chaotic Dark");
        assert_eq!(label_for("sepia"), "sepia");
    }

    #[test]
    fn dark_and_light_members_of_each_pair() {
        assert!(ThemeName::Dark.is_dark());
        assert!(!ThemeName::Light.is_dark());
        for theme in ThemeName::ALL {
            assert_ne!(theme.is_dark(), theme.toggled().is_dark());
        }
    }

    #[test]
    fn palettes_are_readable() {
        for theme in ThemeName::ALL {
            let palette = theme.palette();
            assert!(
                meets_wcag_aa(palette.text, palette.background),
                "{theme} text/background contrast below AA"
            );
        }
    }

    #[test]
    fn default_matches_derive() {
        assert_eq!(ThemeName::default(), ThemeName::DEFAULT);
    }
}
