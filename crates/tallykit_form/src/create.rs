//! Validated construction of form entities from raw metadata records.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::conf::{
    C_ATTRIBUTE_HIDE_IN_TALLY_SHEET, C_ATTRIBUTE_VALUE_TRUE, C_ID_CATEGORY_COMBO_DEFAULT,
    C_NAME_CATEGORY_COMBO_DEFAULT,
};
use crate::raw::{
    RawAttributeValue, RawBasicDataSet, RawCategory, RawCategoryCombo, RawCategoryOptionCombo,
    RawDataElement, RawDataSet, RawSection,
};
use crate::spec::{
    EnumFormType, FormError, SpecAttributeValue, SpecBasicDataSet, SpecCategory,
    SpecCategoryCombo, SpecCategoryOption, SpecCategoryOptionCombo, SpecDataElement, SpecDataSet,
    SpecFormBatch, SpecGreyedField, SpecSection,
};
use crate::util::derive_display_name;

////////////////////////////////////////////////////////////////////////////////
// #region DataSetConstruction

/// Validate and convert one full dataset record.
///
/// Fails when the form type is `CUSTOM` or unknown, or when an attribute named
/// `hideInTallySheet` carries `"true"`. Validation runs only here.
pub fn create_dataset(record: &RawDataSet) -> Result<SpecDataSet, FormError> {
    let form_type = parse_form_type(&record.id, record.form_type.as_deref())?;
    let attribute_values = create_attribute_values(&record.attribute_values);
    validate_dataset_rules(&record.id, form_type, &attribute_values)?;

    let dict_combo_overrides: BTreeMap<&str, &RawCategoryCombo> = record
        .data_set_elements
        .iter()
        .filter_map(|dse| {
            dse.category_combo
                .as_ref()
                .map(|combo| (dse.data_element.id.as_str(), combo))
        })
        .collect();

    let sections = record
        .sections
        .iter()
        .map(|section| create_section(section, &dict_combo_overrides))
        .collect::<Vec<_>>();

    debug!(
        dataset = %record.id,
        sections = sections.len(),
        "Constructed dataset"
    );

    Ok(SpecDataSet {
        id: record.id.clone(),
        display_name: derive_display_name(
            &record.id,
            record.display_name.as_deref(),
            record.name.as_deref(),
        ),
        form_type,
        sections: sections.into_iter().map(Into::into).collect(),
        translations: record.translations.clone(),
        attribute_values,
        headers: None,
    })
}

/// Validate and convert one dataset summary record.
pub fn create_basic_dataset(record: &RawBasicDataSet) -> Result<SpecBasicDataSet, FormError> {
    let form_type = parse_form_type(&record.id, record.form_type.as_deref())?;
    let attribute_values = create_attribute_values(&record.attribute_values);
    validate_dataset_rules(&record.id, form_type, &attribute_values)?;

    Ok(SpecBasicDataSet {
        id: record.id.clone(),
        display_name: derive_display_name(
            &record.id,
            record.display_name.as_deref(),
            record.name.as_deref(),
        ),
        form_type,
        attribute_values,
    })
}

/// Construct every record that validates; collect errors for the rest.
pub fn create_datasets(records: &[RawDataSet]) -> SpecFormBatch<SpecDataSet> {
    let batch: SpecFormBatch<SpecDataSet> = records.iter().map(create_dataset).collect();
    log_rejected(&batch.errors);
    batch
}

/// Batch variant of [`create_basic_dataset`].
pub fn create_basic_datasets(records: &[RawBasicDataSet]) -> SpecFormBatch<SpecBasicDataSet> {
    let batch: SpecFormBatch<SpecBasicDataSet> =
        records.iter().map(create_basic_dataset).collect();
    log_rejected(&batch.errors);
    batch
}

fn log_rejected(errors: &[FormError]) {
    for err in errors {
        warn!(dataset = %err.dataset_id(), "Dataset rejected: {err}");
    }
}

fn parse_form_type(id: &str, value: Option<&str>) -> Result<EnumFormType, FormError> {
    let Some(value) = value else {
        return Ok(EnumFormType::Default);
    };
    EnumFormType::parse(value).ok_or_else(|| FormError::UnknownFormType {
        id: id.to_string(),
        value: value.to_string(),
    })
}

fn validate_dataset_rules(
    id: &str,
    form_type: EnumFormType,
    attribute_values: &[SpecAttributeValue],
) -> Result<(), FormError> {
    if form_type == EnumFormType::Custom {
        return Err(FormError::CustomForm { id: id.to_string() });
    }
    let if_hidden = attribute_values.iter().any(|attribute_value| {
        attribute_value.name == C_ATTRIBUTE_HIDE_IN_TALLY_SHEET
            && attribute_value.value == C_ATTRIBUTE_VALUE_TRUE
    });
    if if_hidden {
        return Err(FormError::HiddenInTallySheet { id: id.to_string() });
    }
    Ok(())
}

fn create_attribute_values(records: &[RawAttributeValue]) -> Vec<SpecAttributeValue> {
    records
        .iter()
        .map(|record| SpecAttributeValue {
            name: record
                .attribute
                .name
                .clone()
                .or_else(|| record.attribute.code.clone())
                .unwrap_or_default(),
            code: record.attribute.code.clone(),
            value: record.value.clone(),
        })
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SectionConstruction

/// Group a section's data elements by category combo, first appearance first.
fn create_section(
    record: &RawSection,
    dict_combo_overrides: &BTreeMap<&str, &RawCategoryCombo>,
) -> SpecSection {
    let mut l_combos: Vec<SpecCategoryCombo> = Vec::new();
    let mut dict_combo_pos: BTreeMap<String, usize> = BTreeMap::new();
    let mut l_data_elements = Vec::with_capacity(record.data_elements.len());

    for raw_data_element in &record.data_elements {
        let raw_combo = dict_combo_overrides
            .get(raw_data_element.id.as_str())
            .copied()
            .or(raw_data_element.category_combo.as_ref());
        let c_combo_id = raw_combo
            .map(|combo| combo.id.clone())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| C_ID_CATEGORY_COMBO_DEFAULT.to_string());

        let data_element = create_data_element(raw_data_element, &c_combo_id);
        l_data_elements.push(data_element.clone());

        let n_pos = *dict_combo_pos.entry(c_combo_id.clone()).or_insert_with(|| {
            l_combos.push(match raw_combo {
                Some(combo) => create_category_combo(combo),
                None => create_default_category_combo(),
            });
            l_combos.len() - 1
        });
        l_combos[n_pos].data_elements.push(data_element);
    }

    SpecSection {
        id: record.id.clone(),
        display_name: derive_display_name(
            &record.id,
            record.display_name.as_deref(),
            record.name.as_deref(),
        ),
        description: record
            .description
            .as_ref()
            .map(|description| description.trim().to_string())
            .filter(|description| !description.is_empty()),
        category_combos: l_combos,
        data_elements: l_data_elements,
        greyed_fields: record
            .greyed_fields
            .iter()
            .filter(|field| {
                !field.data_element.id.is_empty() && !field.category_option_combo.id.is_empty()
            })
            .map(|field| SpecGreyedField {
                data_element_id: field.data_element.id.clone(),
                category_option_combo_id: field.category_option_combo.id.clone(),
            })
            .collect(),
        translations: record.translations.clone(),
    }
}

fn create_data_element(record: &RawDataElement, combo_id: &str) -> SpecDataElement {
    let c_form_name = record
        .form_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());
    SpecDataElement {
        id: record.id.clone(),
        display_name: match c_form_name {
            Some(name) => name.to_string(),
            None => derive_display_name(
                &record.id,
                record.display_name.as_deref(),
                record.name.as_deref(),
            ),
        },
        translations: record.translations.clone(),
        category_combo_id: Some(combo_id.to_string()),
    }
}

/// Convert a combo; the source's own `default` combo loses its single
/// placeholder category but keeps its option combos for greyed-field alignment.
fn create_category_combo(record: &RawCategoryCombo) -> SpecCategoryCombo {
    let c_display_name = derive_display_name(
        &record.id,
        record.display_name.as_deref(),
        record.name.as_deref(),
    );
    let if_is_default = c_display_name == C_NAME_CATEGORY_COMBO_DEFAULT;

    SpecCategoryCombo {
        id: record.id.clone(),
        display_name: c_display_name,
        categories: if if_is_default {
            vec![]
        } else {
            record.categories.iter().map(create_category).collect()
        },
        category_option_combos: record
            .category_option_combos
            .iter()
            .map(create_category_option_combo)
            .collect(),
        data_elements: vec![],
    }
}

fn create_default_category_combo() -> SpecCategoryCombo {
    SpecCategoryCombo {
        id: C_ID_CATEGORY_COMBO_DEFAULT.to_string(),
        display_name: C_NAME_CATEGORY_COMBO_DEFAULT.to_string(),
        categories: vec![],
        category_option_combos: vec![],
        data_elements: vec![],
    }
}

fn create_category(record: &RawCategory) -> SpecCategory {
    SpecCategory {
        id: record.id.clone(),
        display_name: derive_display_name(
            &record.id,
            record.display_name.as_deref(),
            record.name.as_deref(),
        ),
        options: record
            .category_options
            .iter()
            .map(|option| {
                let c_name = derive_display_name(
                    &option.id,
                    option.display_name.as_deref(),
                    option.name.as_deref(),
                );
                SpecCategoryOption {
                    id: option.id.clone(),
                    name: c_name.clone(),
                    display_name: c_name,
                    translations: option.translations.clone(),
                }
            })
            .collect(),
        translations: record.translations.clone(),
    }
}

fn create_category_option_combo(record: &RawCategoryOptionCombo) -> SpecCategoryOptionCombo {
    let c_name = derive_display_name(
        &record.id,
        record.display_name.as_deref(),
        record.name.as_deref(),
    );
    SpecCategoryOptionCombo {
        id: record.id.clone(),
        name: c_name.clone(),
        display_name: c_name,
        option_ids: record
            .category_options
            .iter()
            .map(|option| option.id.clone())
            .collect(),
        translations: record.translations.clone(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{RawAttribute, RawDataSetElement, RawGreyedField, RawRef};

    fn make_attribute(name: &str, value: &str) -> RawAttributeValue {
        RawAttributeValue {
            attribute: RawAttribute {
                name: Some(name.to_string()),
                ..Default::default()
            },
            value: value.to_string(),
        }
    }

    fn make_combo(id: &str, name: &str) -> RawCategoryCombo {
        RawCategoryCombo {
            id: id.to_string(),
            display_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn make_data_element(id: &str, combo: Option<RawCategoryCombo>) -> RawDataElement {
        RawDataElement {
            id: id.to_string(),
            display_name: Some(format!("DE {id}")),
            category_combo: combo,
            ..Default::default()
        }
    }

    #[test]
    fn test_create_dataset_rejects_custom_form_naming_the_id() {
        let record = RawDataSet {
            id: "ds_custom".to_string(),
            form_type: Some("CUSTOM".to_string()),
            ..Default::default()
        };

        let err = create_dataset(&record).unwrap_err();
        assert_eq!(
            err,
            FormError::CustomForm {
                id: "ds_custom".to_string()
            }
        );
        assert!(err.to_string().contains("ds_custom"));
    }

    #[test]
    fn test_create_dataset_rejects_hidden_attribute() {
        let record = RawDataSet {
            id: "ds_hidden".to_string(),
            form_type: Some("SECTION".to_string()),
            attribute_values: vec![make_attribute("hideInTallySheet", "true")],
            ..Default::default()
        };

        let err = create_dataset(&record).unwrap_err();
        assert_eq!(err.dataset_id(), "ds_hidden");
        assert!(matches!(err, FormError::HiddenInTallySheet { .. }));
    }

    #[test]
    fn test_create_dataset_accepts_other_attribute_values() {
        let record = RawDataSet {
            id: "ds_ok".to_string(),
            form_type: Some("SECTION".to_string()),
            attribute_values: vec![
                make_attribute("hideInTallySheet", "false"),
                make_attribute("somethingElse", "true"),
            ],
            ..Default::default()
        };

        let dataset = create_dataset(&record).unwrap();
        assert_eq!(dataset.form_type(), EnumFormType::Section);
        assert_eq!(dataset.attribute_values().len(), 2);
        assert_eq!(dataset.display_name(), "ds_ok");
    }

    #[test]
    fn test_create_dataset_rejects_unknown_form_type() {
        let record = RawDataSet {
            id: "ds_x".to_string(),
            form_type: Some("HTML".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            create_dataset(&record),
            Err(FormError::UnknownFormType { .. })
        ));
    }

    #[test]
    fn test_create_section_groups_data_elements_by_combo_in_first_appearance_order() {
        let record = RawSection {
            id: "sec".to_string(),
            data_elements: vec![
                make_data_element("de1", Some(make_combo("cc_age", "Age"))),
                make_data_element("de2", None),
                make_data_element("de3", Some(make_combo("cc_age", "Age"))),
            ],
            greyed_fields: vec![
                RawGreyedField {
                    data_element: RawRef::new("de1"),
                    category_option_combo: RawRef::new("coc1"),
                },
                RawGreyedField::default(),
            ],
            ..Default::default()
        };

        let section = create_section(&record, &BTreeMap::new());
        let l_combo_ids: Vec<&str> = section
            .category_combos
            .iter()
            .map(|combo| combo.id.as_str())
            .collect();
        assert_eq!(l_combo_ids, vec!["cc_age", "default"]);

        let l_age_des: Vec<&str> = section.category_combos[0]
            .data_elements
            .iter()
            .map(|de| de.id.as_str())
            .collect();
        assert_eq!(l_age_des, vec!["de1", "de3"]);
        assert_eq!(section.data_elements.len(), 3);
        assert_eq!(section.greyed_fields.len(), 1);
    }

    #[test]
    fn test_create_dataset_applies_data_set_element_combo_override() {
        let record = RawDataSet {
            id: "ds".to_string(),
            form_type: Some("SECTION".to_string()),
            sections: vec![RawSection {
                id: "sec".to_string(),
                data_elements: vec![make_data_element("de1", Some(make_combo("cc_a", "A")))],
                ..Default::default()
            }],
            data_set_elements: vec![RawDataSetElement {
                data_element: RawRef::new("de1"),
                category_combo: Some(make_combo("cc_b", "B")),
            }],
            ..Default::default()
        };

        let dataset = create_dataset(&record).unwrap();
        let section = dataset.section("sec").unwrap();
        assert_eq!(section.category_combos[0].id, "cc_b");
        assert_eq!(
            section.data_elements[0].category_combo_id.as_deref(),
            Some("cc_b")
        );
    }

    #[test]
    fn test_create_data_element_prefers_form_name() {
        let record = RawDataElement {
            id: "de".to_string(),
            display_name: Some("Generic".to_string()),
            form_name: Some("  Form label ".to_string()),
            ..Default::default()
        };
        assert_eq!(create_data_element(&record, "cc").display_name, "Form label");

        let record_blank_form = RawDataElement {
            form_name: Some("   ".to_string()),
            ..record
        };
        assert_eq!(
            create_data_element(&record_blank_form, "cc").display_name,
            "Generic"
        );
    }

    #[test]
    fn test_source_default_combo_has_no_categories_but_keeps_option_combos() {
        let record = RawCategoryCombo {
            id: "bjDvmb4bfuf".to_string(),
            display_name: Some("default".to_string()),
            name: None,
            categories: vec![RawCategory {
                id: "cat_default".to_string(),
                display_name: Some("default".to_string()),
                ..Default::default()
            }],
            category_option_combos: vec![RawCategoryOptionCombo {
                id: "coc_default".to_string(),
                display_name: Some("default".to_string()),
                ..Default::default()
            }],
        };

        let combo = create_category_combo(&record);
        assert!(combo.is_default());
        assert_eq!(combo.category_option_combos.len(), 1);
    }

    #[test]
    fn test_create_basic_datasets_keeps_going_past_invalid_records() {
        let records = vec![
            RawBasicDataSet {
                id: "a".to_string(),
                form_type: Some("SECTION".to_string()),
                ..Default::default()
            },
            RawBasicDataSet {
                id: "b".to_string(),
                form_type: Some("CUSTOM".to_string()),
                ..Default::default()
            },
            RawBasicDataSet {
                id: "c".to_string(),
                attribute_values: vec![make_attribute("hideInTallySheet", "true")],
                ..Default::default()
            },
            RawBasicDataSet {
                id: "d".to_string(),
                display_name: Some("Dee".to_string()),
                ..Default::default()
            },
        ];

        let batch = create_basic_datasets(&records);
        let l_ids: Vec<&str> = batch.items.iter().map(|item| item.id()).collect();
        assert_eq!(l_ids, vec!["a", "d"]);
        assert_eq!(batch.items[1].display_name(), "Dee");
        let l_err_ids: Vec<&str> = batch.errors.iter().map(|err| err.dataset_id()).collect();
        assert_eq!(l_err_ids, vec!["b", "c"]);
    }
}
