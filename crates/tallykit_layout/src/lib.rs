//! `tallykit_layout` v1:
//! Layout-and-merge engine turning dataset trees into tally-sheet grids.
//!
//! Modules:
//! - `conf`      : constants and default labels
//! - `spec`      : grid/table models, options, errors
//! - `util`      : Cartesian products, merge planning, text width
//! - `cartesian` : category combo → combination table
//! - `layout`    : dataset → absolute grid
pub mod cartesian;
pub mod conf;
pub mod layout;
pub mod spec;
pub mod util;

pub use cartesian::build_combination_table;
pub use conf::{C_LABEL_VALUE_COLUMN, C_MARK_GREYED, N_WIDTH_LABEL_COL_MAX};
pub use layout::{build_tally_grid, derive_label_column_width};
pub use spec::{
    EnumCellStyle, EnumEmptyCategoryPolicy, LayoutError, SpecBorderRange, SpecCombinationTable,
    SpecGridCell, SpecLayoutOptions, SpecMergeRange, SpecTallyGrid,
};
pub use util::{
    derive_cartesian_columns, derive_merge_ranges, derive_text_width, generate_cartesian_product,
    plan_header_merges,
};
