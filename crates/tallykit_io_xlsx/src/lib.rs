//! `tallykit_io_xlsx` v1:
//! XLSX document sink for tally grids.
//!
//! Modules:
//! - `conf`   : Excel limits and default style presets
//! - `spec`   : formats, sink options, reports, errors
//! - `util`   : pure helper functions
//! - `writer` : workbook writer kernel
pub mod conf;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_COLOR_GREYED, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    TUP_EXCEL_ILLEGAL, derive_default_style_formats, derive_default_xlsx_sink_options,
};
pub use spec::{
    EnumAlignHorizontal, EnumAlignVertical, EnumBorderLine, SpecCellBorder, SpecCellFormat,
    SpecXlsxReport, SpecXlsxSinkOptions, XlsxSinkError,
};
pub use util::{
    derive_horizontal_merge_tracker, derive_label_col_width_final, derive_unique_sheet_name,
    plan_border_overlay, sanitize_sheet_name,
};
pub use writer::XlsxWriter;
