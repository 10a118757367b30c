//! Shared domain types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Color theme applied to the preview document.
///
/// The theme is an explicit input to preview assembly. Hosts forward theme
/// changes from their chrome instead of the pipeline observing global state.
///
/// # Examples
///
/// ```
/// use uigen_core::Theme;
///
/// let theme = Theme::from_dark_flag(true);
/// assert_eq!(theme, Theme::Dark);
/// assert_eq!(theme.root_class(), "dark");
/// assert_eq!(Theme::Light.root_class(), "");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light theme (no root class)
    #[default]
    Light,
    /// Dark theme (`dark` class on the document and mount root)
    Dark,
}

impl Theme {
    /// Maps the host's dark-mode flag to a theme.
    #[must_use]
    pub const fn from_dark_flag(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }

    /// Returns `true` for the dark theme.
    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Class name applied to `<html>` and the mount root.
    #[must_use]
    pub const fn root_class(self) -> &'static str {
        match self {
            Self::Light => "",
            Self::Dark => "dark",
        }
    }

    /// Returns the string representation of the theme.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(crate::Error::InvalidArgument(format!(
                "invalid theme: '{s}' (expected: light or dark)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_default_is_light() {
        assert_eq!(Theme::default(), Theme::Light);
        assert!(!Theme::default().is_dark());
    }

    #[test]
    fn test_theme_from_str() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!("LIGHT".parse::<Theme>().unwrap(), Theme::Light);
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn test_theme_serde_lowercase() {
        let json = serde_json::to_string(&Theme::Dark).unwrap();
        assert_eq!(json, "\"dark\"");
        let theme: Theme = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(theme, Theme::Light);
    }
}
