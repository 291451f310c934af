//! Category combo → combination table (header band, body rows, greyed marks).

use std::collections::BTreeSet;
use std::iter;

use tallykit_form::{SpecCategoryCombo, SpecCategoryOptionCombo, SpecGreyedField};

use crate::conf::C_SEP_OPTION_COMBO_NAME;
use crate::spec::{LayoutError, SpecCombinationTable, SpecLayoutOptions};
use crate::util::{derive_cartesian_columns, generate_cartesian_product};

/// Build the table of one category combo.
///
/// Header rows follow category declaration order (first category on top) and
/// columns follow option declaration order. Every row starts with the label
/// column. A combo without categories gets a single `Value` column. Greyed
/// fields pointing at data elements or option combos outside this combo are
/// ignored.
///
/// # Errors
/// [`LayoutError::EmptyCategory`] when a category declares no options.
pub fn build_combination_table(
    combo: &SpecCategoryCombo,
    greyed_fields: &[SpecGreyedField],
    options: &SpecLayoutOptions,
) -> Result<SpecCombinationTable, LayoutError> {
    if let Some(category) = combo
        .categories
        .iter()
        .find(|category| category.options.is_empty())
    {
        return Err(LayoutError::EmptyCategory {
            combo_id: combo.id.clone(),
            category_id: category.id.clone(),
        });
    }

    let (header_rows, column_option_combos) = if combo.is_default() {
        let coc_single = match combo.category_option_combos.as_slice() {
            [coc] => Some(coc.id.clone()),
            _ => None,
        };
        (
            vec![vec![None, Some(options.label_value_column.clone())]],
            vec![coc_single],
        )
    } else {
        let l_option_labels: Vec<Vec<String>> = combo
            .categories
            .iter()
            .map(|category| {
                category
                    .options
                    .iter()
                    .map(|option| option.display_name.clone())
                    .collect()
            })
            .collect();
        let l_option_names: Vec<Vec<String>> = combo
            .categories
            .iter()
            .map(|category| category.options.iter().map(|option| option.name.clone()).collect())
            .collect();
        let l_option_ids: Vec<Vec<String>> = combo
            .categories
            .iter()
            .map(|category| category.options.iter().map(|option| option.id.clone()).collect())
            .collect();

        let header_rows: Vec<Vec<Option<String>>> = derive_cartesian_columns(&l_option_labels)
            .into_iter()
            .map(|row| iter::once(None).chain(row.into_iter().map(Some)).collect())
            .collect();
        let column_option_combos = align_option_combos(
            &combo.category_option_combos,
            &generate_cartesian_product(&l_option_ids),
            &generate_cartesian_product(&l_option_names),
        );
        (header_rows, column_option_combos)
    };

    let set_greyed: BTreeSet<(&str, &str)> = greyed_fields
        .iter()
        .map(|field| {
            (
                field.data_element_id.as_str(),
                field.category_option_combo_id.as_str(),
            )
        })
        .collect();

    let body_rows: Vec<Vec<Option<String>>> = combo
        .data_elements
        .iter()
        .map(|data_element| {
            iter::once(Some(data_element.display_name.clone()))
                .chain(column_option_combos.iter().map(|coc_id| {
                    coc_id
                        .as_deref()
                        .filter(|coc_id| set_greyed.contains(&(data_element.id.as_str(), *coc_id)))
                        .map(|_| options.mark_greyed.clone())
                }))
                .collect()
        })
        .collect();

    Ok(SpecCombinationTable {
        header_rows,
        body_rows,
        column_option_combos,
    })
}

/// Align option combos to product columns.
///
/// A combo matches the column whose option ids equal its own (in any order);
/// a combo without option references matches by source name against the
/// column's option source names joined the way the metadata source names
/// combos. Display names never take part, so localized labels keep the same
/// alignment. First match wins per column.
fn align_option_combos(
    category_option_combos: &[SpecCategoryOptionCombo],
    column_option_ids: &[Vec<String>],
    column_option_names: &[Vec<String>],
) -> Vec<Option<String>> {
    column_option_ids
        .iter()
        .zip(column_option_names)
        .map(|(l_ids, l_names)| {
            let set_ids: BTreeSet<&str> = l_ids.iter().map(String::as_str).collect();
            let c_name = l_names.join(C_SEP_OPTION_COMBO_NAME);
            category_option_combos
                .iter()
                .find(|coc| {
                    if coc.option_ids.is_empty() {
                        coc.name == c_name
                    } else {
                        coc.option_ids.len() == set_ids.len()
                            && coc
                                .option_ids
                                .iter()
                                .all(|id| set_ids.contains(id.as_str()))
                    }
                })
                .map(|coc| coc.id.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tallykit_form::{
        SpecCategory, SpecCategoryOption, SpecDataElement, SpecTranslation, apply_locale,
    };

    fn make_category(id: &str, options: &[&str]) -> SpecCategory {
        SpecCategory {
            id: id.to_string(),
            display_name: id.to_string(),
            options: options
                .iter()
                .map(|name| SpecCategoryOption {
                    id: format!("opt_{name}"),
                    name: name.to_string(),
                    display_name: name.to_string(),
                    translations: vec![],
                })
                .collect(),
            translations: vec![],
        }
    }

    fn make_coc(id: &str, option_names: &[&str]) -> SpecCategoryOptionCombo {
        SpecCategoryOptionCombo {
            id: id.to_string(),
            name: option_names.join(", "),
            display_name: option_names.join(", "),
            option_ids: option_names
                .iter()
                .map(|name| format!("opt_{name}"))
                .collect(),
            translations: vec![],
        }
    }

    fn make_data_element(id: &str) -> SpecDataElement {
        SpecDataElement {
            id: id.to_string(),
            display_name: format!("Element {id}"),
            translations: vec![],
            category_combo_id: None,
        }
    }

    fn make_greyed(data_element_id: &str, coc_id: &str) -> SpecGreyedField {
        SpecGreyedField {
            data_element_id: data_element_id.to_string(),
            category_option_combo_id: coc_id.to_string(),
        }
    }

    #[test]
    fn test_build_combination_table_header_rows_follow_declaration_order() {
        let combo = SpecCategoryCombo {
            id: "cc".to_string(),
            display_name: "Sex and age".to_string(),
            categories: vec![
                make_category("sex", &["F", "M"]),
                make_category("age", &["<5", "5+"]),
            ],
            category_option_combos: vec![],
            data_elements: vec![make_data_element("d")],
        };

        let table =
            build_combination_table(&combo, &[], &SpecLayoutOptions::default()).unwrap();

        assert_eq!(
            table.header_rows,
            vec![
                vec![
                    None,
                    Some("F".to_string()),
                    Some("F".to_string()),
                    Some("M".to_string()),
                    Some("M".to_string()),
                ],
                vec![
                    None,
                    Some("<5".to_string()),
                    Some("5+".to_string()),
                    Some("<5".to_string()),
                    Some("5+".to_string()),
                ],
            ]
        );
        assert_eq!(table.n_cols_data(), 4);
        assert_eq!(
            table.body_rows,
            vec![vec![Some("Element d".to_string()), None, None, None, None]]
        );
    }

    #[test]
    fn test_build_combination_table_places_greyed_mark_on_aligned_column() {
        let combo = SpecCategoryCombo {
            id: "cc".to_string(),
            display_name: "Sex".to_string(),
            categories: vec![make_category("sex", &["A", "B"])],
            // Declared out of column order on purpose.
            category_option_combos: vec![make_coc("coc_b", &["B"]), make_coc("coc_a", &["A"])],
            data_elements: vec![make_data_element("d"), make_data_element("e")],
        };
        let greyed_fields = vec![
            make_greyed("d", "coc_b"),
            make_greyed("missing_de", "coc_a"),
            make_greyed("e", "missing_coc"),
        ];

        let table =
            build_combination_table(&combo, &greyed_fields, &SpecLayoutOptions::default())
                .unwrap();

        assert_eq!(table.column_of("coc_a"), Some(0));
        assert_eq!(table.column_of("coc_b"), Some(1));
        assert_eq!(
            table.body_rows[0],
            vec![Some("Element d".to_string()), None, Some("X".to_string())]
        );
        assert_eq!(table.body_rows[1], vec![Some("Element e".to_string()), None, None]);
    }

    #[test]
    fn test_align_option_combos_ignores_option_order_and_falls_back_to_name() {
        let combo = SpecCategoryCombo {
            id: "cc".to_string(),
            display_name: "Sex and age".to_string(),
            categories: vec![
                make_category("sex", &["F", "M"]),
                make_category("age", &["<5", "5+"]),
            ],
            category_option_combos: vec![
                SpecCategoryOptionCombo {
                    option_ids: vec!["opt_5+".to_string(), "opt_M".to_string()],
                    ..make_coc("coc_m_5", &[])
                },
                SpecCategoryOptionCombo {
                    id: "coc_f_u5".to_string(),
                    name: "F, <5".to_string(),
                    display_name: "F, <5".to_string(),
                    option_ids: vec![],
                    translations: vec![],
                },
            ],
            data_elements: vec![],
        };

        let table =
            build_combination_table(&combo, &[], &SpecLayoutOptions::default()).unwrap();
        assert_eq!(
            table.column_option_combos,
            vec![Some("coc_f_u5".to_string()), None, None, Some("coc_m_5".to_string())]
        );
    }

    #[test]
    fn test_name_aligned_greyed_mark_survives_localization() {
        let mut category = make_category("sex", &["Female", "Male"]);
        for (option, c_label) in category.options.iter_mut().zip(["Femme", "Homme"]) {
            option.translations = vec![SpecTranslation::name("fr", c_label)];
        }
        let combo = SpecCategoryCombo {
            id: "cc".to_string(),
            display_name: "Sex".to_string(),
            categories: vec![category],
            category_option_combos: vec![SpecCategoryOptionCombo {
                option_ids: vec![],
                translations: vec![SpecTranslation::name("fr", "Masculin")],
                ..make_coc("coc_m", &["Male"])
            }],
            data_elements: vec![make_data_element("d")],
        };
        let greyed_fields = vec![make_greyed("d", "coc_m")];
        let options = SpecLayoutOptions::default();

        let table = build_combination_table(&combo, &greyed_fields, &options).unwrap();
        let table_fr =
            build_combination_table(&apply_locale(&combo, "fr"), &greyed_fields, &options)
                .unwrap();

        assert_eq!(
            table.body_rows[0],
            vec![Some("Element d".to_string()), None, Some("X".to_string())]
        );
        assert_eq!(table_fr.body_rows, table.body_rows);
        assert_eq!(table_fr.column_option_combos, table.column_option_combos);
        assert_eq!(
            table_fr.header_rows,
            vec![vec![None, Some("Femme".to_string()), Some("Homme".to_string())]]
        );
    }

    #[test]
    fn test_build_combination_table_default_combo_has_value_column() {
        let combo = SpecCategoryCombo {
            id: "default".to_string(),
            display_name: "default".to_string(),
            categories: vec![],
            category_option_combos: vec![make_coc("coc_default", &[])],
            data_elements: vec![make_data_element("d")],
        };

        let table = build_combination_table(
            &combo,
            &[make_greyed("d", "coc_default")],
            &SpecLayoutOptions::default(),
        )
        .unwrap();

        assert_eq!(table.header_rows, vec![vec![None, Some("Value".to_string())]]);
        assert_eq!(
            table.body_rows,
            vec![vec![Some("Element d".to_string()), Some("X".to_string())]]
        );
    }

    #[test]
    fn test_build_combination_table_rejects_empty_category() {
        let combo = SpecCategoryCombo {
            id: "cc".to_string(),
            display_name: "Broken".to_string(),
            categories: vec![make_category("sex", &["F"]), make_category("empty", &[])],
            category_option_combos: vec![],
            data_elements: vec![make_data_element("d")],
        };

        assert_eq!(
            build_combination_table(&combo, &[], &SpecLayoutOptions::default()),
            Err(LayoutError::EmptyCategory {
                combo_id: "cc".to_string(),
                category_id: "empty".to_string(),
            })
        );
    }
}
