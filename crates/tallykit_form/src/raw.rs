//! Raw metadata records as delivered by the metadata source (camelCase JSON).
//!
//! All fields default when absent so partial payloads still deserialize;
//! [`crate::create`] turns them into validated entities.

use serde::{Deserialize, Serialize};

use crate::spec::SpecTranslation;

/// `{ "id": ... }` reference.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRef {
    pub id: String,
}

impl RawRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAttribute {
    pub id: Option<String>,
    pub name: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAttributeValue {
    pub attribute: RawAttribute,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCategoryOption {
    pub id: String,
    pub display_name: Option<String>,
    pub name: Option<String>,
    pub translations: Vec<SpecTranslation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCategory {
    pub id: String,
    pub display_name: Option<String>,
    pub name: Option<String>,
    pub category_options: Vec<RawCategoryOption>,
    pub translations: Vec<SpecTranslation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCategoryOptionCombo {
    pub id: String,
    pub display_name: Option<String>,
    pub name: Option<String>,
    pub category_options: Vec<RawRef>,
    pub translations: Vec<SpecTranslation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCategoryCombo {
    pub id: String,
    pub display_name: Option<String>,
    pub name: Option<String>,
    pub categories: Vec<RawCategory>,
    pub category_option_combos: Vec<RawCategoryOptionCombo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDataElement {
    pub id: String,
    pub display_name: Option<String>,
    pub name: Option<String>,
    /// Preferred over the generic names when present.
    pub form_name: Option<String>,
    pub category_combo: Option<RawCategoryCombo>,
    pub translations: Vec<SpecTranslation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawGreyedField {
    pub data_element: RawRef,
    pub category_option_combo: RawRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSection {
    pub id: String,
    pub display_name: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub data_elements: Vec<RawDataElement>,
    pub greyed_fields: Vec<RawGreyedField>,
    pub translations: Vec<SpecTranslation>,
}

/// Dataset-level link of a data element; its combo overrides the element's own.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDataSetElement {
    pub data_element: RawRef,
    pub category_combo: Option<RawCategoryCombo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDataSet {
    pub id: String,
    pub display_name: Option<String>,
    pub name: Option<String>,
    pub form_type: Option<String>,
    pub sections: Vec<RawSection>,
    pub data_set_elements: Vec<RawDataSetElement>,
    pub attribute_values: Vec<RawAttributeValue>,
    pub translations: Vec<SpecTranslation>,
}

/// Listing record; a [`RawDataSet`] payload also deserializes into it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawBasicDataSet {
    pub id: String,
    pub display_name: Option<String>,
    pub name: Option<String>,
    pub form_type: Option<String>,
    pub attribute_values: Vec<RawAttributeValue>,
}

impl From<&RawDataSet> for RawBasicDataSet {
    fn from(record: &RawDataSet) -> Self {
        Self {
            id: record.id.clone(),
            display_name: record.display_name.clone(),
            name: record.name.clone(),
            form_type: record.form_type.clone(),
            attribute_values: record.attribute_values.clone(),
        }
    }
}
