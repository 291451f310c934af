//! Locale resolution for display names.
//!
//! Every translatable node takes its `NAME` translation for the exact locale
//! code when one exists, and keeps its original display name otherwise. Locale
//! codes are not negotiated (`"en_GB"` never falls back to `"en"`); callers
//! normalize codes beforehand. Only display names change.

use std::sync::Arc;

use crate::spec::{
    SpecCategory, SpecCategoryCombo, SpecCategoryOption, SpecCategoryOptionCombo,
    SpecDataElement, SpecDataSet, SpecSection, SpecTranslation, SpecTranslationTable,
};

/// Entity whose display labels can be rewritten for a locale.
pub trait Localize: Sized {
    /// Return a copy with display names resolved for `locale`.
    fn localize(&self, locale: &str) -> Self;
}

/// Resolve every display label in `entity` for `locale`.
pub fn apply_locale<T: Localize>(entity: &T, locale: &str) -> T {
    entity.localize(locale)
}

fn resolve_name(display_name: &str, translations: &[SpecTranslation], locale: &str) -> String {
    SpecTranslationTable::from_translations(translations).resolve_name(locale, display_name)
}

impl Localize for SpecCategoryOption {
    fn localize(&self, locale: &str) -> Self {
        Self {
            display_name: resolve_name(&self.display_name, &self.translations, locale),
            ..self.clone()
        }
    }
}

impl Localize for SpecCategoryOptionCombo {
    fn localize(&self, locale: &str) -> Self {
        Self {
            display_name: resolve_name(&self.display_name, &self.translations, locale),
            ..self.clone()
        }
    }
}

impl Localize for SpecDataElement {
    fn localize(&self, locale: &str) -> Self {
        Self {
            display_name: resolve_name(&self.display_name, &self.translations, locale),
            ..self.clone()
        }
    }
}

// Category names are never printed; only their options are.
impl Localize for SpecCategory {
    fn localize(&self, locale: &str) -> Self {
        Self {
            options: self
                .options
                .iter()
                .map(|option| option.localize(locale))
                .collect(),
            ..self.clone()
        }
    }
}

impl Localize for SpecCategoryCombo {
    fn localize(&self, locale: &str) -> Self {
        Self {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            categories: self
                .categories
                .iter()
                .map(|category| category.localize(locale))
                .collect(),
            category_option_combos: self
                .category_option_combos
                .iter()
                .map(|coc| coc.localize(locale))
                .collect(),
            data_elements: self
                .data_elements
                .iter()
                .map(|data_element| data_element.localize(locale))
                .collect(),
        }
    }
}

impl Localize for SpecSection {
    fn localize(&self, locale: &str) -> Self {
        Self {
            id: self.id.clone(),
            display_name: resolve_name(&self.display_name, &self.translations, locale),
            description: self.description.clone(),
            category_combos: self
                .category_combos
                .iter()
                .map(|combo| combo.localize(locale))
                .collect(),
            data_elements: self
                .data_elements
                .iter()
                .map(|data_element| data_element.localize(locale))
                .collect(),
            greyed_fields: self.greyed_fields.clone(),
            translations: self.translations.clone(),
        }
    }
}

impl Localize for SpecDataSet {
    fn localize(&self, locale: &str) -> Self {
        let sections = self
            .sections
            .iter()
            .map(|section| Arc::new(section.localize(locale)))
            .collect();
        self.with_section_arcs(sections)
            .with_display_name(resolve_name(&self.display_name, &self.translations, locale))
    }
}
