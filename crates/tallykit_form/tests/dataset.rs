//! Dataset construction from metadata JSON, section removal and localization.

use tallykit_form::{
    EnumFormType, FormError, RawDataSet, SpecHeaders, apply_locale, create_dataset,
    create_datasets,
};

const METADATA_JSON: &str = r#"
{
  "id": "ds_opd",
  "displayName": "Outpatient monthly",
  "formType": "SECTION",
  "translations": [
    { "property": "NAME", "locale": "es", "value": "Consulta externa mensual" }
  ],
  "attributeValues": [
    { "attribute": { "id": "attr1", "name": "hideInTallySheet" }, "value": "false" }
  ],
  "sections": [
    {
      "id": "sec_a",
      "displayName": "Morbidity",
      "description": "New cases only",
      "translations": [
        { "property": "NAME", "locale": "es", "value": "Morbilidad" }
      ],
      "dataElements": [
        {
          "id": "de_malaria",
          "displayName": "Malaria",
          "formName": "Malaria (confirmed)",
          "translations": [
            { "property": "NAME", "locale": "es", "value": "Malaria (confirmada)" }
          ],
          "categoryCombo": {
            "id": "cc_sex",
            "displayName": "Sex",
            "categories": [
              {
                "id": "cat_sex",
                "displayName": "Sex",
                "categoryOptions": [
                  { "id": "opt_m", "displayName": "Male" },
                  { "id": "opt_f", "displayName": "Female",
                    "translations": [
                      { "property": "NAME", "locale": "es", "value": "Mujer" }
                    ] }
                ]
              }
            ],
            "categoryOptionCombos": [
              { "id": "coc_m", "displayName": "Male", "categoryOptions": [{ "id": "opt_m" }] },
              { "id": "coc_f", "displayName": "Female", "categoryOptions": [{ "id": "opt_f" }] }
            ]
          }
        }
      ],
      "greyedFields": [
        { "dataElement": { "id": "de_malaria" }, "categoryOptionCombo": { "id": "coc_m" } }
      ]
    },
    {
      "id": "sec_b",
      "displayName": "Stock",
      "dataElements": [
        { "id": "de_stock", "name": "Stock on hand" }
      ]
    }
  ]
}
"#;

fn load_dataset() -> RawDataSet {
    serde_json::from_str(METADATA_JSON).expect("parse metadata fixture")
}

#[test]
fn dataset_from_metadata_json() {
    let dataset = create_dataset(&load_dataset()).expect("valid dataset");

    assert_eq!(dataset.id(), "ds_opd");
    assert_eq!(dataset.form_type(), EnumFormType::Section);
    assert_eq!(dataset.sections().len(), 2);

    let section_a = dataset.section("sec_a").expect("section a");
    assert_eq!(section_a.description.as_deref(), Some("New cases only"));
    assert_eq!(section_a.category_combos.len(), 1);
    let combo = &section_a.category_combos[0];
    assert_eq!(combo.categories[0].options.len(), 2);
    assert_eq!(combo.category_option_combos[1].option_ids, vec!["opt_f"]);
    assert_eq!(combo.data_elements[0].display_name, "Malaria (confirmed)");
    assert_eq!(section_a.greyed_fields[0].category_option_combo_id, "coc_m");

    let section_b = dataset.section("sec_b").expect("section b");
    assert_eq!(section_b.category_combos[0].id, "default");
    assert!(section_b.category_combos[0].is_default());
    assert_eq!(section_b.data_elements[0].display_name, "Stock on hand");
}

#[test]
fn remove_section_is_idempotent() {
    let dataset = create_dataset(&load_dataset()).expect("valid dataset");

    let once = dataset.remove_section("sec_a");
    let twice = once.remove_section("sec_a");

    assert_eq!(once.sections().len(), 1);
    assert_eq!(once, twice);
    assert_eq!(dataset.sections().len(), 2);
    assert_eq!(dataset.remove_section("missing"), dataset);
}

#[test]
fn with_headers_returns_new_dataset() {
    let dataset = create_dataset(&load_dataset()).expect("valid dataset");
    let with_headers = dataset.with_headers(Some(SpecHeaders::default()));

    assert!(dataset.headers().is_none());
    assert_eq!(
        with_headers.headers().map(|headers| headers.health_facility.as_str()),
        Some("Health Facility:")
    );
}

#[test]
fn localized_dataset_changes_only_display_names() {
    let dataset = create_dataset(&load_dataset()).expect("valid dataset");

    let dataset_es = apply_locale(&dataset, "es");
    assert_eq!(dataset_es.display_name(), "Consulta externa mensual");
    let section_es = dataset_es.section("sec_a").expect("section a");
    assert_eq!(section_es.display_name, "Morbilidad");
    let combo_es = &section_es.category_combos[0];
    assert_eq!(combo_es.categories[0].options[0].display_name, "Male");
    assert_eq!(combo_es.categories[0].options[1].display_name, "Mujer");
    assert_eq!(combo_es.data_elements[0].display_name, "Malaria (confirmada)");
    assert_eq!(dataset_es.section("sec_b"), dataset.section("sec_b"));
    assert_eq!(dataset_es.id(), dataset.id());

    assert_eq!(apply_locale(&dataset, "xx"), dataset);
}

#[test]
fn batch_construction_reports_every_rejected_record() {
    let mut custom = load_dataset();
    custom.id = "ds_custom".to_string();
    custom.form_type = Some("CUSTOM".to_string());

    let mut hidden = load_dataset();
    hidden.id = "ds_hidden".to_string();
    hidden.attribute_values[0].value = "true".to_string();

    let batch = create_datasets(&[custom, load_dataset(), hidden]);

    assert_eq!(batch.items.len(), 1);
    assert_eq!(batch.items[0].id(), "ds_opd");
    assert_eq!(
        batch.errors,
        vec![
            FormError::CustomForm {
                id: "ds_custom".to_string()
            },
            FormError::HiddenInTallySheet {
                id: "ds_hidden".to_string()
            },
        ]
    );
}
