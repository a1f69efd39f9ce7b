#![forbid(unsafe_code)]

//! Theme vocabulary for the VPC shop frontend.
//!
//! # Role in the workspace
//! `vpc-style` is the shared vocabulary for colour themes. The runtime store,
//! the web adapters and server-side templates all speak in these types so the
//! closed set of theme names lives in exactly one place.
//!
//! # This crate provides
//! - [`ThemeName`] with its labels, toggle pairs, class tokens and palettes.
//! - [`StyleVariant`] for the orthogonal page-chrome variant.
//! - [`Rgb`] with hex output and relative luminance.
//!
//! # How it fits in the system
//! `vpc-runtime` persists and broadcasts these values, `vpc-web` writes them
//! into the browser document. This crate has no I/O and no runtime
//! dependencies beyond optional `serde` support.

/// sRGB colours.
pub mod color;
/// Built-in theme names and lookup tables.
pub mod theme;
/// Page-chrome style variants.
pub mod variant;

pub use color::Rgb;
pub use theme::{Palette, ThemeName, UnknownTheme, label_for};
pub use variant::{StyleVariant, UnknownVariant};
