//! Dataset → absolute tally-sheet grid.
//!
//! The row cursor is the length of an accumulator threaded through a fold over
//! sections and combos; rows are appended only, never revisited.

use tallykit_form::{SpecCategoryCombo, SpecDataSet, SpecHeaders, SpecSection};
use tracing::{debug, warn};

use crate::cartesian::build_combination_table;
use crate::spec::{
    EnumCellStyle, EnumEmptyCategoryPolicy, SpecBorderRange, SpecCombinationTable, SpecGridCell,
    SpecLayoutOptions, SpecMergeRange, SpecTallyGrid,
};
use crate::util::{derive_text_width, plan_header_merges};

#[derive(Debug, Default)]
struct SpecGridAccumulator {
    rows: Vec<Vec<SpecGridCell>>,
    merges: Vec<SpecMergeRange>,
    borders: Vec<SpecBorderRange>,
}

impl SpecGridAccumulator {
    fn n_row_cursor(&self) -> usize {
        self.rows.len()
    }

    fn push_row(mut self, row: Vec<SpecGridCell>) -> Self {
        self.rows.push(row);
        self
    }

    fn push_blank_rows(mut self, n_rows: usize) -> Self {
        self.rows.extend(std::iter::repeat_n(Vec::new(), n_rows));
        self
    }
}

/// Lay out a whole dataset.
///
/// Order:
/// 1. cover block (health facility, reporting period, dataset title) when
///    requested and the dataset carries headers;
/// 2. per section: title, description when present, optional gap rows, then
///    per combo its header band (merged per row), body rows and one blank row.
///
/// Sections, combos, categories, options and data elements keep their
/// declared order.
pub fn build_tally_grid(dataset: &SpecDataSet, options: &SpecLayoutOptions) -> SpecTallyGrid {
    let acc = match (options.if_include_headers, dataset.headers()) {
        (true, Some(headers)) => {
            append_cover_block(SpecGridAccumulator::default(), dataset, headers)
        }
        _ => SpecGridAccumulator::default(),
    };
    let acc = dataset
        .sections()
        .fold(acc, |acc, section| append_section(acc, section, options));

    let width_label_col = derive_label_column_width(&acc.rows, options.width_label_col_max);
    debug!(
        dataset = %dataset.id(),
        rows = acc.rows.len(),
        merges = acc.merges.len(),
        width_label_col,
        "Built tally grid"
    );

    SpecTallyGrid {
        sheet_title: dataset.display_name().to_string(),
        rows: acc.rows,
        merges: acc.merges,
        borders: acc.borders,
        width_label_col,
    }
}

/// Longest text in column 0, capped at `width_max`.
pub fn derive_label_column_width(rows: &[Vec<SpecGridCell>], width_max: usize) -> usize {
    rows.iter()
        .filter_map(|row| row.first())
        .filter_map(|cell| cell.value.as_deref())
        .map(derive_text_width)
        .max()
        .unwrap_or(0)
        .min(width_max)
}

fn append_cover_block(
    acc: SpecGridAccumulator,
    dataset: &SpecDataSet,
    headers: &SpecHeaders,
) -> SpecGridAccumulator {
    acc.push_row(vec![SpecGridCell::text(
        headers.health_facility.as_str(),
        EnumCellStyle::CoverLabel,
    )])
    .push_row(vec![SpecGridCell::text(
        headers.reporting_period.as_str(),
        EnumCellStyle::CoverLabel,
    )])
    .push_row(vec![SpecGridCell::text(
        dataset.display_name(),
        EnumCellStyle::DataSetTitle,
    )])
}

fn append_section(
    acc: SpecGridAccumulator,
    section: &SpecSection,
    options: &SpecLayoutOptions,
) -> SpecGridAccumulator {
    debug!(
        section = %section.id,
        row = acc.n_row_cursor(),
        combos = section.category_combos.len(),
        "Laying out section"
    );

    let mut acc = acc.push_row(vec![SpecGridCell::text(
        section.display_name.as_str(),
        EnumCellStyle::SectionTitle,
    )]);
    if let Some(description) = &section.description {
        acc = acc.push_row(vec![SpecGridCell::text(
            description.as_str(),
            EnumCellStyle::SectionDescription,
        )]);
    }
    let acc = acc.push_blank_rows(options.n_rows_gap_after_section_title);

    section.category_combos.iter().fold(acc, |acc, combo| {
        append_category_combo(acc, section, combo, options)
    })
}

fn append_category_combo(
    acc: SpecGridAccumulator,
    section: &SpecSection,
    combo: &SpecCategoryCombo,
    options: &SpecLayoutOptions,
) -> SpecGridAccumulator {
    match build_combination_table(combo, &section.greyed_fields, options) {
        Ok(table) => append_combination_table(acc, &table),
        Err(err) => match options.rule_empty_category {
            EnumEmptyCategoryPolicy::Skip => {
                warn!(section = %section.id, "Skipping category combo: {err}");
                acc
            }
            EnumEmptyCategoryPolicy::ZeroWidth => {
                warn!(section = %section.id, "Rendering zero-width category combo: {err}");
                append_combination_table(
                    acc,
                    &SpecCombinationTable::zero_width(combo.categories.len()),
                )
            }
        },
    }
}

fn append_combination_table(
    acc: SpecGridAccumulator,
    table: &SpecCombinationTable,
) -> SpecGridAccumulator {
    let n_row_first = acc.n_row_cursor();
    let n_cols = 1 + table.n_cols_data();

    let mut acc = acc;
    acc.merges
        .extend(plan_header_merges(&table.header_rows, n_row_first));

    let acc = table.header_rows.iter().fold(acc, |acc, row| {
        acc.push_row(
            row.iter()
                .map(|value| SpecGridCell {
                    value: value.clone(),
                    style: Some(EnumCellStyle::Header),
                })
                .collect(),
        )
    });

    let acc = table.body_rows.iter().fold(acc, |acc, row| {
        acc.push_row(
            row.iter()
                .enumerate()
                .map(|(n_idx_col, value)| SpecGridCell {
                    value: value.clone(),
                    style: Some(if n_idx_col > 0 && value.is_some() {
                        EnumCellStyle::Greyed
                    } else {
                        EnumCellStyle::Body
                    }),
                })
                .collect(),
        )
    });

    let mut acc = acc;
    if acc.n_row_cursor() > n_row_first {
        acc.borders.push(SpecBorderRange {
            row_idx_start: n_row_first,
            row_idx_end: acc.n_row_cursor() - 1,
            col_idx_start: 0,
            col_idx_end: n_cols - 1,
        });
    }
    acc.push_blank_rows(1)
}
