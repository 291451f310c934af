//! Form entity models, translation table and construction errors.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region Translations

/// Translated property of a metadata entity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EnumTranslationProperty {
    /// `NAME`; the only property used for display-name resolution.
    Name,
    /// `SHORT_NAME`.
    ShortName,
    /// `DESCRIPTION`.
    Description,
    /// `FORM_NAME`.
    FormName,
    /// Any other property, kept verbatim.
    Other(String),
}

impl EnumTranslationProperty {
    /// Metadata wire name of the property.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Name => "NAME",
            Self::ShortName => "SHORT_NAME",
            Self::Description => "DESCRIPTION",
            Self::FormName => "FORM_NAME",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for EnumTranslationProperty {
    fn from(value: String) -> Self {
        match value.as_str() {
            "NAME" => Self::Name,
            "SHORT_NAME" => Self::ShortName,
            "DESCRIPTION" => Self::Description,
            "FORM_NAME" => Self::FormName,
            _ => Self::Other(value),
        }
    }
}

impl From<EnumTranslationProperty> for String {
    fn from(value: EnumTranslationProperty) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for EnumTranslationProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(property, locale, value)` translation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecTranslation {
    /// Translated property.
    pub property: EnumTranslationProperty,
    /// Locale code, compared case-sensitively.
    pub locale: String,
    /// Translated text.
    pub value: String,
}

impl SpecTranslation {
    /// Build a `NAME` translation.
    pub fn name(locale: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: EnumTranslationProperty::Name,
            locale: locale.into(),
            value: value.into(),
        }
    }
}

/// Lookup table keyed by `(locale, property)`.
///
/// When several entries share a key, the first declared one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecTranslationTable {
    dict_values: BTreeMap<(String, EnumTranslationProperty), String>,
}

impl SpecTranslationTable {
    /// Index a flat translation list.
    pub fn from_translations(translations: &[SpecTranslation]) -> Self {
        let mut dict_values = BTreeMap::new();
        for translation in translations {
            dict_values
                .entry((translation.locale.clone(), translation.property.clone()))
                .or_insert_with(|| translation.value.clone());
        }
        Self { dict_values }
    }

    /// Exact lookup; no locale negotiation.
    pub fn lookup(&self, locale: &str, property: &EnumTranslationProperty) -> Option<&str> {
        self.dict_values
            .get(&(locale.to_string(), property.clone()))
            .map(String::as_str)
    }

    /// Resolve a display name, falling back to `display_name` when untranslated.
    pub fn resolve_name(&self, locale: &str, display_name: &str) -> String {
        self.lookup(locale, &EnumTranslationProperty::Name)
            .unwrap_or(display_name)
            .to_string()
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.dict_values.len()
    }

    /// `true` when nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.dict_values.is_empty()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Categories

/// One option of a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCategoryOption {
    pub id: String,
    /// Name as delivered by the metadata source; localization leaves it as is.
    pub name: String,
    pub display_name: String,
    pub translations: Vec<SpecTranslation>,
}

/// A category with its options in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCategory {
    pub id: String,
    pub display_name: String,
    /// Declared option order; determines column order.
    pub options: Vec<SpecCategoryOption>,
    pub translations: Vec<SpecTranslation>,
}

/// One materialized combination of category options (one data column).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCategoryOptionCombo {
    pub id: String,
    /// Name as delivered by the metadata source; localization leaves it as is.
    pub name: String,
    pub display_name: String,
    /// Ids of the options this combo is composed of.
    pub option_ids: Vec<String>,
    pub translations: Vec<SpecTranslation>,
}

/// Data element as shown in a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecDataElement {
    pub id: String,
    /// Form name when available, else the generic name.
    pub display_name: String,
    pub translations: Vec<SpecTranslation>,
    /// Owning category combo, if known.
    pub category_combo_id: Option<String>,
}

/// `(data element, category option combo)` cell that must render as disabled.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpecGreyedField {
    pub data_element_id: String,
    pub category_option_combo_id: String,
}

/// Category combo with the data elements that use it inside one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCategoryCombo {
    pub id: String,
    pub display_name: String,
    /// Declared order; determines which header row each category occupies.
    pub categories: Vec<SpecCategory>,
    /// May be empty for the default combo.
    pub category_option_combos: Vec<SpecCategoryOptionCombo>,
    pub data_elements: Vec<SpecDataElement>,
}

impl SpecCategoryCombo {
    /// `true` when the combo declares no categories (single "Value" column).
    pub fn is_default(&self) -> bool {
        self.categories.is_empty()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DataSetTree

/// Section of a dataset form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSection {
    pub id: String,
    pub display_name: String,
    pub description: Option<String>,
    pub category_combos: Vec<SpecCategoryCombo>,
    /// Denormalized data elements of all combos, in section order.
    pub data_elements: Vec<SpecDataElement>,
    pub greyed_fields: Vec<SpecGreyedField>,
    pub translations: Vec<SpecTranslation>,
}

/// Cover labels printed above the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecHeaders {
    pub health_facility: String,
    pub reporting_period: String,
}

impl Default for SpecHeaders {
    fn default() -> Self {
        Self {
            health_facility: "Health Facility:".to_string(),
            reporting_period: "Reporting Period:".to_string(),
        }
    }
}

/// Dataset form type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnumFormType {
    #[default]
    Default,
    Section,
    /// Never exported; rejected at construction.
    Custom,
    SectionMultiorg,
}

impl EnumFormType {
    /// Parse a metadata form type string, ignoring ASCII case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "DEFAULT" => Some(Self::Default),
            "SECTION" => Some(Self::Section),
            "CUSTOM" => Some(Self::Custom),
            "SECTION_MULTIORG" => Some(Self::SectionMultiorg),
            _ => None,
        }
    }

    /// Metadata wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::Section => "SECTION",
            Self::Custom => "CUSTOM",
            Self::SectionMultiorg => "SECTION_MULTIORG",
        }
    }
}

impl fmt::Display for EnumFormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute value attached to a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecAttributeValue {
    pub name: String,
    pub code: Option<String>,
    pub value: String,
}

/// Validated, immutable dataset tree.
///
/// Only obtainable through [`crate::create_dataset`]; every derived value is
/// produced by a `with_*`/`remove_*` function returning a new dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecDataSet {
    pub(crate) id: String,
    pub(crate) display_name: String,
    pub(crate) form_type: EnumFormType,
    pub(crate) sections: Vec<Arc<SpecSection>>,
    pub(crate) translations: Vec<SpecTranslation>,
    pub(crate) attribute_values: Vec<SpecAttributeValue>,
    pub(crate) headers: Option<SpecHeaders>,
}

impl SpecDataSet {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn form_type(&self) -> EnumFormType {
        self.form_type
    }

    /// Sections in the order supplied by the metadata source.
    pub fn sections(&self) -> impl ExactSizeIterator<Item = &SpecSection> {
        self.sections.iter().map(Arc::as_ref)
    }

    pub fn section(&self, section_id: &str) -> Option<&SpecSection> {
        self.sections().find(|section| section.id == section_id)
    }

    pub fn translations(&self) -> &[SpecTranslation] {
        &self.translations
    }

    pub fn attribute_values(&self) -> &[SpecAttributeValue] {
        &self.attribute_values
    }

    pub fn headers(&self) -> Option<&SpecHeaders> {
        self.headers.as_ref()
    }

    /// Return a copy with another display name.
    pub fn with_display_name(&self, display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..self.clone()
        }
    }

    /// Return a copy with cover headers attached (or cleared).
    pub fn with_headers(&self, headers: Option<SpecHeaders>) -> Self {
        Self {
            headers,
            ..self.clone()
        }
    }

    /// Return a copy holding `sections` instead of the current ones.
    pub fn with_sections(&self, sections: Vec<SpecSection>) -> Self {
        Self {
            sections: sections.into_iter().map(Arc::new).collect(),
            ..self.clone()
        }
    }

    /// Return a copy without the section `section_id`.
    ///
    /// Unknown ids yield an equal dataset, so repeated removal is a no-op.
    /// Remaining sections are shared with `self`.
    pub fn remove_section(&self, section_id: &str) -> Self {
        Self {
            sections: self
                .sections
                .iter()
                .filter(|section| section.id != section_id)
                .cloned()
                .collect(),
            ..self.clone()
        }
    }

    pub(crate) fn with_section_arcs(&self, sections: Vec<Arc<SpecSection>>) -> Self {
        Self {
            sections,
            ..self.clone()
        }
    }
}

/// Validated dataset summary used to list export candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecBasicDataSet {
    pub(crate) id: String,
    pub(crate) display_name: String,
    pub(crate) form_type: EnumFormType,
    pub(crate) attribute_values: Vec<SpecAttributeValue>,
}

impl SpecBasicDataSet {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn form_type(&self) -> EnumFormType {
        self.form_type
    }

    pub fn attribute_values(&self) -> &[SpecAttributeValue] {
        &self.attribute_values
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region BatchAndErrors

/// Dataset construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Custom (HTML) forms cannot be laid out as tally sheets.
    #[error("Dataset {id} uses a custom form; tally-sheet export is not supported.")]
    CustomForm { id: String },
    /// Dataset opted out through its `hideInTallySheet` attribute.
    #[error("Dataset {id} is hidden from tally sheets (attribute `hideInTallySheet`=\"true\").")]
    HiddenInTallySheet { id: String },
    /// Form type string not understood.
    #[error("Dataset {id} has unknown form type {value:?}.")]
    UnknownFormType { id: String, value: String },
}

impl FormError {
    /// Id of the rejected dataset.
    pub fn dataset_id(&self) -> &str {
        match self {
            Self::CustomForm { id }
            | Self::HiddenInTallySheet { id }
            | Self::UnknownFormType { id, .. } => id,
        }
    }
}

/// Result of a batch construction: valid items plus per-record errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFormBatch<T> {
    /// Successfully constructed items, in input order.
    pub items: Vec<T>,
    /// One error per rejected record, in input order.
    pub errors: Vec<FormError>,
}

impl<T> Default for SpecFormBatch<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl<T> FromIterator<Result<T, FormError>> for SpecFormBatch<T> {
    fn from_iter<I: IntoIterator<Item = Result<T, FormError>>>(iter: I) -> Self {
        let mut batch = Self::default();
        for res_item in iter {
            match res_item {
                Ok(item) => batch.items.push(item),
                Err(err) => batch.errors.push(err),
            }
        }
        batch
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
