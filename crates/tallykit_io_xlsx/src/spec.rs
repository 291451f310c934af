//! Shared XLSX sink models, options and errors.

use std::collections::BTreeMap;

use rust_xlsxwriter::XlsxError;
use tallykit_layout::EnumCellStyle;
use thiserror::Error;

use crate::conf::derive_default_style_formats;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormat

/// Horizontal cell alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumAlignHorizontal {
    Left,
    Center,
    Right,
}

/// Vertical cell alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumAlignVertical {
    Top,
    Center,
    Bottom,
}

/// Line style of one cell edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnumBorderLine {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
    Double,
}

/// Edge lines of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SpecCellBorder {
    pub top: EnumBorderLine,
    pub bottom: EnumBorderLine,
    pub left: EnumBorderLine,
    pub right: EnumBorderLine,
}

/// Cell format; `None` fields leave the workbook default in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<u16>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub text_wrap: Option<bool>,
    pub align: Option<EnumAlignHorizontal>,
    pub valign: Option<EnumAlignVertical>,
    /// Background fill color, `#RRGGBB`.
    pub bg_color: Option<String>,
    pub border: Option<SpecCellBorder>,
}

impl SpecCellFormat {
    /// Overlay `patch` onto `self`; set fields of `patch` win.
    pub fn merge(&self, patch: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: patch.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: patch.font_size.or(self.font_size),
            bold: patch.bold.or(self.bold),
            italic: patch.italic.or(self.italic),
            text_wrap: patch.text_wrap.or(self.text_wrap),
            align: patch.align.or(self.align),
            valign: patch.valign.or(self.valign),
            bg_color: patch.bg_color.clone().or_else(|| self.bg_color.clone()),
            border: patch.border.or(self.border),
        }
    }

    /// Same format with `border` on its edges.
    pub fn with_border(&self, border: &SpecCellBorder) -> SpecCellFormat {
        SpecCellFormat {
            border: Some(*border),
            ..self.clone()
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SinkOptions

/// Writer-wide options: style presets, borders, widths and page setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxSinkOptions {
    /// Format per cell style.
    pub fmts_by_style: BTreeMap<EnumCellStyle, SpecCellFormat>,
    /// Format of cells without a style tag.
    pub fmt_default: SpecCellFormat,
    /// Edge line inside a combo table.
    pub border_inner: EnumBorderLine,
    /// Edge line on the outline of a combo table.
    pub border_outer: EnumBorderLine,
    /// Padding added to the label column width hint.
    pub width_label_col_padding: usize,
    /// Minimum label column width.
    pub width_label_col_min: usize,
    /// Width of every data column.
    pub width_data_col: usize,
    /// Landscape page orientation.
    pub if_landscape: bool,
    /// Fit printed columns to one page wide.
    pub if_fit_to_page_width: bool,
}

impl Default for SpecXlsxSinkOptions {
    fn default() -> Self {
        Self {
            fmts_by_style: derive_default_style_formats(),
            fmt_default: SpecCellFormat::default(),
            border_inner: EnumBorderLine::Thin,
            border_outer: EnumBorderLine::Medium,
            width_label_col_padding: 2,
            width_label_col_min: 8,
            width_data_col: 8,
            if_landscape: true,
            if_fit_to_page_width: true,
        }
    }
}

impl SpecXlsxSinkOptions {
    /// Override the preset of one style, merging onto the current preset.
    pub fn with_style_patch(mut self, style: EnumCellStyle, patch: SpecCellFormat) -> Self {
        let fmt_current = self.fmts_by_style.get(&style).cloned().unwrap_or_default();
        self.fmts_by_style.insert(style, fmt_current.merge(&patch));
        self
    }

    /// Resolve the format of a style tag.
    pub fn derive_style_format(&self, style: Option<EnumCellStyle>) -> SpecCellFormat {
        style
            .and_then(|style| self.fmts_by_style.get(&style))
            .cloned()
            .unwrap_or_else(|| self.fmt_default.clone())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Per-sheet write report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// Actual unique sheet name in workbook.
    pub sheet_name: String,
    /// Rows written.
    pub n_rows: usize,
    /// Columns spanned by the widest row.
    pub n_cols: usize,
    /// Merged ranges written.
    pub n_merges: usize,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Failures of the XLSX sink.
#[derive(Debug, Error)]
pub enum XlsxSinkError {
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("row index overflow: {0}")]
    RowOverflow(usize),
    #[error("column index overflow: {0}")]
    ColumnOverflow(usize),
    #[error("Cannot write after close().")]
    Closed,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
