//! Font catalog and the font loading collaborator.
//!
//! Only families in [`FONT_CATALOG`] can be put on a text shape, and only with the
//! variants listed for them. Faces are looked up among the system fonts through
//! `fontdb`; when a face is missing the registry hands out egui's bundled face instead,
//! so rasterized text degrades to a fallback render rather than disappearing.

use std::collections::HashMap;
use std::sync::Arc;

use rusttype::Font;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_FONT_FAMILY: &str = "Nunito";

/// Face name inside egui's default font definitions used as the fallback
const FALLBACK_FACE: &str = "Ubuntu-Light";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontVariant {
    #[default]
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "italic")]
    Italic,
    #[serde(rename = "bold")]
    Bold,
    #[serde(rename = "italic bold")]
    ItalicBold,
}

/// Which style button was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleToggle {
    Bold,
    Italic,
}

impl FontVariant {
    pub fn is_bold(&self) -> bool {
        matches!(self, FontVariant::Bold | FontVariant::ItalicBold)
    }

    pub fn is_italic(&self) -> bool {
        matches!(self, FontVariant::Italic | FontVariant::ItalicBold)
    }

    /// CSS-style weight of the face backing this variant
    pub fn weight(&self) -> u16 {
        if self.is_bold() { 700 } else { 400 }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FontVariant::Normal => "normal",
            FontVariant::Italic => "italic",
            FontVariant::Bold => "bold",
            FontVariant::ItalicBold => "italic bold",
        }
    }

    /// Variant after pressing the bold or italic button
    pub fn toggled(self, toggle: StyleToggle) -> FontVariant {
        let (bold, italic) = match toggle {
            StyleToggle::Bold => (!self.is_bold(), self.is_italic()),
            StyleToggle::Italic => (self.is_bold(), !self.is_italic()),
        };
        match (bold, italic) {
            (false, false) => FontVariant::Normal,
            (false, true) => FontVariant::Italic,
            (true, false) => FontVariant::Bold,
            (true, true) => FontVariant::ItalicBold,
        }
    }
}

impl std::fmt::Display for FontVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontFamily {
    pub family: &'static str,
    pub variants: &'static [FontVariant],
}

impl FontFamily {
    pub fn supports(&self, variant: FontVariant) -> bool {
        self.variants.contains(&variant)
    }
}

const ALL_VARIANTS: &[FontVariant] = &[
    FontVariant::Normal,
    FontVariant::Italic,
    FontVariant::Bold,
    FontVariant::ItalicBold,
];

pub const FONT_CATALOG: &[FontFamily] = &[
    FontFamily { family: "Nunito", variants: ALL_VARIANTS },
    FontFamily { family: "Roboto", variants: ALL_VARIANTS },
    FontFamily { family: "Playfair Display", variants: ALL_VARIANTS },
    FontFamily { family: "Oswald", variants: &[FontVariant::Normal, FontVariant::Bold] },
    FontFamily { family: "Caveat", variants: &[FontVariant::Normal, FontVariant::Bold] },
    FontFamily { family: "Lobster", variants: &[FontVariant::Normal] },
    FontFamily { family: "Pacifico", variants: &[FontVariant::Normal] },
];

pub fn find_family(family: &str) -> Option<&'static FontFamily> {
    FONT_CATALOG.iter().find(|f| f.family == family)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FontError {
    #[error("Unknown font family: {0}")]
    UnknownFamily(String),

    #[error("Font variant {variant} is not available for {family}")]
    VariantUnavailable { family: String, variant: FontVariant },
}

/// Checks that `family` is in the catalog and offers `variant`.
pub fn validate(family: &str, variant: FontVariant) -> Result<&'static FontFamily, FontError> {
    let font = find_family(family).ok_or_else(|| FontError::UnknownFamily(family.to_owned()))?;
    if !font.supports(variant) {
        return Err(FontError::VariantUnavailable {
            family: family.to_owned(),
            variant,
        });
    }
    Ok(font)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FontKey {
    family: String,
    variant: FontVariant,
}

/// Loads font faces on request and keeps them for the rasterizer.
pub struct FontRegistry {
    database: Option<fontdb::Database>,
    use_system_fonts: bool,
    loaded: HashMap<FontKey, Arc<Font<'static>>>,
    fallback: Option<Arc<Font<'static>>>,
}

impl std::fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRegistry")
            .field("use_system_fonts", &self.use_system_fonts)
            .field("loaded", &self.loaded.len())
            .finish_non_exhaustive()
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        Self {
            database: None,
            use_system_fonts: true,
            loaded: HashMap::new(),
            fallback: None,
        }
    }

    /// Registry that never scans the system, every face resolves to the fallback.
    pub fn without_system_fonts() -> Self {
        Self {
            use_system_fonts: false,
            ..Self::new()
        }
    }

    pub fn is_loaded(&self, family: &str, variant: FontVariant) -> bool {
        self.loaded.contains_key(&FontKey {
            family: family.to_owned(),
            variant,
        })
    }

    /// Makes sure the face for `family`/`variant` is available, then runs `on_loaded`.
    ///
    /// Repeated requests for a loaded face call back immediately. Families or variants
    /// missing from the catalog are rejected without calling back.
    pub fn ensure_font_loaded<F: FnOnce()>(
        &mut self,
        family: &str,
        variant: FontVariant,
        on_loaded: F,
    ) -> Result<(), FontError> {
        validate(family, variant)?;

        let key = FontKey {
            family: family.to_owned(),
            variant,
        };
        if !self.loaded.contains_key(&key) {
            let face = match self.load_system_face(family, variant) {
                Some(face) => {
                    log::info!("🔤 Loaded font {} ({})", family, variant);
                    Some(Arc::new(face))
                }
                None => {
                    log::warn!("Font {} ({}) not found, using fallback face", family, variant);
                    self.fallback()
                }
            };
            match face {
                Some(face) => {
                    self.loaded.insert(key, face);
                }
                None => log::error!("No fallback font available for {}", family),
            }
        }

        on_loaded();
        Ok(())
    }

    /// Face to draw with, the fallback if the requested one was never loaded.
    pub fn font_for(&mut self, family: &str, variant: FontVariant) -> Option<Arc<Font<'static>>> {
        let key = FontKey {
            family: family.to_owned(),
            variant,
        };
        match self.loaded.get(&key) {
            Some(face) => Some(Arc::clone(face)),
            None => self.fallback(),
        }
    }

    fn fallback(&mut self) -> Option<Arc<Font<'static>>> {
        if self.fallback.is_none() {
            let definitions = egui::FontDefinitions::default();
            self.fallback = definitions
                .font_data
                .get(FALLBACK_FACE)
                .and_then(|data| Font::try_from_vec(data.font.to_vec()))
                .map(Arc::new);
        }
        self.fallback.clone()
    }

    fn load_system_face(&mut self, family: &str, variant: FontVariant) -> Option<Font<'static>> {
        if !self.use_system_fonts {
            return None;
        }
        let database = self.database.get_or_insert_with(|| {
            let mut database = fontdb::Database::new();
            database.load_system_fonts();
            log::debug!("Indexed {} system font faces", database.len());
            database
        });

        let families = [fontdb::Family::Name(family)];
        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight(variant.weight()),
            stretch: fontdb::Stretch::Normal,
            style: if variant.is_italic() {
                fontdb::Style::Italic
            } else {
                fontdb::Style::Normal
            },
        };
        let id = database.query(&query)?;
        database
            .with_face_data(id, |data, index| Font::try_from_vec_and_index(data.to_vec(), index))
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_variants() {
        use FontVariant::*;
        assert_eq!(Normal.toggled(StyleToggle::Bold), Bold);
        assert_eq!(Bold.toggled(StyleToggle::Bold), Normal);
        assert_eq!(Italic.toggled(StyleToggle::Bold), ItalicBold);
        assert_eq!(Bold.toggled(StyleToggle::Italic), ItalicBold);
        assert_eq!(ItalicBold.toggled(StyleToggle::Italic), Bold);
        assert_eq!(ItalicBold.toggled(StyleToggle::Bold), Italic);
    }

    #[test]
    fn test_validate_rejects_missing_variant() {
        assert!(validate("Nunito", FontVariant::ItalicBold).is_ok());
        assert_eq!(
            validate("Lobster", FontVariant::Bold),
            Err(FontError::VariantUnavailable {
                family: "Lobster".to_owned(),
                variant: FontVariant::Bold
            })
        );
        assert_eq!(
            validate("Comic", FontVariant::Normal),
            Err(FontError::UnknownFamily("Comic".to_owned()))
        );
    }

    #[test]
    fn test_ensure_loaded_is_idempotent() {
        let mut registry = FontRegistry::without_system_fonts();
        let mut calls = 0;

        registry
            .ensure_font_loaded("Nunito", FontVariant::Normal, || calls += 1)
            .unwrap();
        registry
            .ensure_font_loaded("Nunito", FontVariant::Normal, || calls += 1)
            .unwrap();

        assert_eq!(calls, 2);
        assert!(registry.is_loaded("Nunito", FontVariant::Normal));
    }

    #[test]
    fn test_rejected_variant_does_not_call_back() {
        let mut registry = FontRegistry::without_system_fonts();
        let mut called = false;

        let result = registry.ensure_font_loaded("Pacifico", FontVariant::Italic, || called = true);

        assert!(result.is_err());
        assert!(!called);
        assert!(!registry.is_loaded("Pacifico", FontVariant::Italic));
    }

    #[test]
    fn test_variant_serde_names() {
        let json = serde_json::to_string(&FontVariant::ItalicBold).unwrap();
        assert_eq!(json, "\"italic bold\"");
    }
}
