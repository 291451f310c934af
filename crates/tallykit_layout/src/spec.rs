//! Grid, table and option models for tally-sheet layout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conf::{C_LABEL_VALUE_COLUMN, C_MARK_GREYED, N_WIDTH_LABEL_COL_MAX};

////////////////////////////////////////////////////////////////////////////////
// #region CellSpecification

/// Style tag attached to a grid cell; the sink maps each tag to a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumCellStyle {
    /// Health-facility / reporting-period labels of the cover block.
    CoverLabel,
    /// Dataset title of the cover block.
    DataSetTitle,
    /// Section title row.
    SectionTitle,
    /// Section description row.
    SectionDescription,
    /// Category option header band (including the label placeholder).
    Header,
    /// Data element label and collectable data cells.
    Body,
    /// Not-applicable data cell.
    Greyed,
}

/// One grid cell: optional value plus optional style tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecGridCell {
    /// Cell text; `None` for blank.
    pub value: Option<String>,
    /// Style tag; `None` leaves formatting to the sink default.
    pub style: Option<EnumCellStyle>,
}

impl SpecGridCell {
    /// Styled text cell.
    pub fn text(value: impl Into<String>, style: EnumCellStyle) -> Self {
        Self {
            value: Some(value.into()),
            style: Some(style),
        }
    }

    /// Styled blank cell.
    pub fn blank(style: EnumCellStyle) -> Self {
        Self {
            value: None,
            style: Some(style),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region GridSpecification

/// Horizontal merge instruction (absolute grid coordinates, inclusive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecMergeRange {
    /// Row where the merge is applied.
    pub row_idx: usize,
    /// Start column index (inclusive).
    pub col_idx_start: usize,
    /// End column index (inclusive).
    pub col_idx_end: usize,
    /// Merged display text.
    pub text: String,
}

/// Rectangular border decoration around one category-combo table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecBorderRange {
    pub row_idx_start: usize,
    pub row_idx_end: usize,
    pub col_idx_start: usize,
    pub col_idx_end: usize,
}

impl SpecBorderRange {
    /// `true` when `(row_idx, col_idx)` lies inside the rectangle.
    pub fn contains(&self, row_idx: usize, col_idx: usize) -> bool {
        (self.row_idx_start..=self.row_idx_end).contains(&row_idx)
            && (self.col_idx_start..=self.col_idx_end).contains(&col_idx)
    }
}

/// Finished layout of one dataset, ready for a document sink.
///
/// Sinks must keep row/column order and merge spans exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecTallyGrid {
    /// Requested sheet title (dataset display name).
    pub sheet_title: String,
    /// Rows in output order; rows may be ragged, blank rows are empty.
    pub rows: Vec<Vec<SpecGridCell>>,
    /// Header merge spans.
    pub merges: Vec<SpecMergeRange>,
    /// Border rectangles, one per rendered combo.
    pub borders: Vec<SpecBorderRange>,
    /// Width hint for the leading label column, in characters.
    pub width_label_col: usize,
}

impl SpecTallyGrid {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn n_cols(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn cell(&self, row_idx: usize, col_idx: usize) -> Option<&SpecGridCell> {
        self.rows.get(row_idx).and_then(|row| row.get(col_idx))
    }

    /// Cell text, if any.
    pub fn value(&self, row_idx: usize, col_idx: usize) -> Option<&str> {
        self.cell(row_idx, col_idx)
            .and_then(|cell| cell.value.as_deref())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TableSpecification

/// Layout of one category combo, relative to its own top-left corner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecCombinationTable {
    /// One row per category; cell 0 is the label placeholder.
    pub header_rows: Vec<Vec<Option<String>>>,
    /// One row per data element; cell 0 is its label, data cells hold the
    /// greyed mark or nothing.
    pub body_rows: Vec<Vec<Option<String>>>,
    /// Option combo id aligned to each data column, if any.
    pub column_option_combos: Vec<Option<String>>,
}

impl SpecCombinationTable {
    /// Number of data columns (excluding the label column).
    pub fn n_cols_data(&self) -> usize {
        self.column_option_combos.len()
    }

    /// Data column index (0-based, excluding the label column) of an option combo.
    pub fn column_of(&self, category_option_combo_id: &str) -> Option<usize> {
        self.column_option_combos
            .iter()
            .position(|id| id.as_deref() == Some(category_option_combo_id))
    }

    /// Placeholder-only header band used for combos with an empty category.
    pub fn zero_width(n_categories: usize) -> Self {
        Self {
            header_rows: vec![vec![None]; n_categories.max(1)],
            body_rows: vec![],
            column_option_combos: vec![],
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region LayoutOptions

/// What to do with a combo that has a category without options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumEmptyCategoryPolicy {
    /// Leave the combo out of the grid (default).
    #[default]
    Skip,
    /// Render placeholder header rows only: no data columns, no body.
    ZeroWidth,
}

/// Layout driver options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecLayoutOptions {
    /// Emit the cover block when the dataset carries headers.
    pub if_include_headers: bool,
    /// Blank rows between a section's title/description and its first combo.
    ///
    /// Defaults to 0: the header band follows the title directly, and each
    /// combo already ends with one blank separator row. Set to 1 for a
    /// visible gap under the title.
    pub n_rows_gap_after_section_title: usize,
    /// Cap for the label column width hint.
    pub width_label_col_max: usize,
    /// Header label of the single column of a category-less combo.
    pub label_value_column: String,
    /// Text written into greyed cells.
    pub mark_greyed: String,
    /// Empty-category handling.
    pub rule_empty_category: EnumEmptyCategoryPolicy,
}

impl Default for SpecLayoutOptions {
    fn default() -> Self {
        Self {
            if_include_headers: true,
            n_rows_gap_after_section_title: 0,
            width_label_col_max: N_WIDTH_LABEL_COL_MAX,
            label_value_column: C_LABEL_VALUE_COLUMN.to_string(),
            mark_greyed: C_MARK_GREYED.to_string(),
            rule_empty_category: EnumEmptyCategoryPolicy::Skip,
        }
    }
}

/// Builder precondition failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A category without options makes the Cartesian product empty.
    #[error("Category {category_id} of category combo {combo_id} has no options.")]
    EmptyCategory {
        combo_id: String,
        category_id: String,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
