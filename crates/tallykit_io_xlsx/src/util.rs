//! Stateless helper utilities used by the XLSX sink.

use std::collections::{BTreeMap, BTreeSet};

use rust_xlsxwriter::{ColNum, RowNum};
use tallykit_layout::{SpecBorderRange, SpecMergeRange};

use crate::conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, N_WIDTH_EXCEL_COL_MAX,
    TUP_EXCEL_ILLEGAL,
};
use crate::spec::{EnumBorderLine, SpecCellBorder, SpecXlsxSinkOptions, XlsxSinkError};

////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    let c_name_capped: String = c_name
        .trim()
        .chars()
        .take(N_LEN_EXCEL_SHEET_NAME_MAX)
        .collect();
    trim_sheet_name_edges(&c_name_capped)
}

/// Strip edge whitespace and apostrophes; Excel rejects names starting or ending with `'`.
fn trim_sheet_name_edges(name: &str) -> String {
    let c_name = name.trim().trim_matches('\'').trim();
    if c_name.is_empty() {
        "Sheet".to_string()
    } else {
        c_name.to_string()
    }
}

/// Pick a name not in `existing`, suffixing `__2`, `__3`, ... within the length cap.
///
/// Excel compares sheet names case-insensitively, so does this.
pub fn derive_unique_sheet_name(name: &str, existing: &BTreeSet<String>) -> String {
    let if_taken = |candidate: &str| existing.contains(&candidate.to_lowercase());
    if !if_taken(name) {
        return name.to_string();
    }

    let mut n_idx = 2usize;
    loop {
        let c_suffix = format!("__{n_idx}");
        let base_name = name
            .chars()
            .take(usize::max(
                1,
                N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(c_suffix.len()),
            ))
            .collect::<String>();
        let candidate = format!("{}{c_suffix}", trim_sheet_name_edges(&base_name));
        if !if_taken(&candidate) {
            return candidate;
        }
        n_idx += 1;
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region MergeAndBorderPlanning

/// Cells covered by a horizontal merge, excluding the anchor.
pub fn derive_horizontal_merge_tracker(merges: &[SpecMergeRange]) -> BTreeSet<(usize, usize)> {
    merges
        .iter()
        .flat_map(|merge| {
            ((merge.col_idx_start + 1)..=merge.col_idx_end)
                .map(move |col_idx| (merge.row_idx, col_idx))
        })
        .collect()
}

/// Per-cell edge borders for every cell inside a border rectangle.
///
/// Edges on the rectangle outline use `border_outer`, all others
/// `border_inner`. Later rectangles win where they overlap.
pub fn plan_border_overlay(
    borders: &[SpecBorderRange],
    border_inner: EnumBorderLine,
    border_outer: EnumBorderLine,
) -> BTreeMap<(usize, usize), SpecCellBorder> {
    let mut dict_plan_border = BTreeMap::new();

    for rect in borders {
        for row_idx in rect.row_idx_start..=rect.row_idx_end {
            for col_idx in rect.col_idx_start..=rect.col_idx_end {
                let derive_edge = |if_outline: bool| {
                    if if_outline {
                        border_outer
                    } else {
                        border_inner
                    }
                };
                dict_plan_border.insert(
                    (row_idx, col_idx),
                    SpecCellBorder {
                        top: derive_edge(row_idx == rect.row_idx_start),
                        bottom: derive_edge(row_idx == rect.row_idx_end),
                        left: derive_edge(col_idx == rect.col_idx_start),
                        right: derive_edge(col_idx == rect.col_idx_end),
                    },
                );
            }
        }
    }

    dict_plan_border
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnWidth

/// Final label column width: hint plus padding, clamped to `[min, 255]`.
pub fn derive_label_col_width_final(width_hint: usize, options: &SpecXlsxSinkOptions) -> usize {
    let n_min = usize::max(1, options.width_label_col_min);
    let n_max = usize::max(n_min, N_WIDTH_EXCEL_COL_MAX);
    usize::min(
        n_max,
        usize::max(n_min, width_hint + options.width_label_col_padding),
    )
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region IndexCasting

pub fn cast_row_num(value: usize) -> Result<RowNum, XlsxSinkError> {
    if value >= N_NROWS_EXCEL_MAX {
        return Err(XlsxSinkError::RowOverflow(value));
    }
    RowNum::try_from(value).map_err(|_| XlsxSinkError::RowOverflow(value))
}

pub fn cast_col_num(value: usize) -> Result<ColNum, XlsxSinkError> {
    if value >= N_NCOLS_EXCEL_MAX {
        return Err(XlsxSinkError::ColumnOverflow(value));
    }
    ColNum::try_from(value).map_err(|_| XlsxSinkError::ColumnOverflow(value))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
