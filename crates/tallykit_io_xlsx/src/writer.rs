//! XLSX writer kernel that turns tally grids into workbook sheets.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tallykit_layout::{SpecGridCell, SpecTallyGrid};
use tracing::{debug, warn};

use crate::spec::{
    EnumAlignHorizontal, EnumAlignVertical, EnumBorderLine, SpecCellBorder, SpecCellFormat,
    SpecXlsxReport, SpecXlsxSinkOptions, XlsxSinkError,
};
use crate::util::{
    cast_col_num, cast_row_num, derive_horizontal_merge_tracker, derive_label_col_width_final,
    derive_unique_sheet_name, plan_border_overlay, sanitize_sheet_name,
};

/// Stateful workbook writer: one worksheet per grid.
pub struct XlsxWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    options: SpecXlsxSinkOptions,
    set_sheet_names_existing: BTreeSet<String>,
    l_reports: Vec<SpecXlsxReport>,
    if_closed: bool,
}

impl XlsxWriter {
    /// Create writer bound to output path and options.
    ///
    /// The workbook is buffered in memory until [`Self::close`] is called.
    pub fn new(path_file_out: PathBuf, options: SpecXlsxSinkOptions) -> Self {
        Self {
            path_file_out,
            workbook: Workbook::new(),
            options,
            set_sheet_names_existing: BTreeSet::new(),
            l_reports: Vec::new(),
            if_closed: false,
        }
    }

    /// Return output file path as string.
    pub fn file_out(&self) -> String {
        self.path_file_out.to_string_lossy().to_string()
    }

    /// Return immutable snapshot of per-sheet write reports.
    pub fn report(&self) -> Vec<SpecXlsxReport> {
        self.l_reports.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.if_closed
    }

    /// Flush workbook to disk. Idempotent.
    pub fn close(&mut self) -> Result<(), XlsxSinkError> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook.save(&self.path_file_out)?;
        self.if_closed = true;
        debug!(
            path = %self.path_file_out.display(),
            sheets = self.l_reports.len(),
            "Saved workbook"
        );
        Ok(())
    }

    /// Write one grid as a new worksheet.
    ///
    /// Cells keep their grid coordinates. Merge spans carry the anchor cell's
    /// format; covered cells are not written separately.
    pub fn write_grid(&mut self, grid: &SpecTallyGrid) -> Result<(), XlsxSinkError> {
        if self.if_closed {
            return Err(XlsxSinkError::Closed);
        }

        let n_rows = grid.n_rows();
        let n_cols = grid.n_cols();
        if n_rows > 0 {
            cast_row_num(n_rows - 1)?;
        }
        if n_cols > 0 {
            cast_col_num(n_cols - 1)?;
        }

        let mut report = SpecXlsxReport {
            n_rows,
            n_cols,
            n_merges: grid.merges.len(),
            ..Default::default()
        };

        let c_sheet_name_clean = sanitize_sheet_name(&grid.sheet_title, "_");
        if c_sheet_name_clean != grid.sheet_title {
            report.warn(format!(
                "Sheet title {:?} sanitized to {c_sheet_name_clean:?}.",
                grid.sheet_title
            ));
        }
        let sheet_name_unique =
            derive_unique_sheet_name(&c_sheet_name_clean, &self.set_sheet_names_existing);
        if sheet_name_unique != c_sheet_name_clean {
            report.warn(format!(
                "Sheet name {c_sheet_name_clean:?} already used; renamed to {sheet_name_unique:?}."
            ));
        }

        // Pushed only once complete: a failing grid must leave no sheet behind.
        let mut worksheet = Worksheet::new();
        worksheet.set_name(&sheet_name_unique)?;
        if self.options.if_landscape {
            worksheet.set_landscape();
        }
        if self.options.if_fit_to_page_width {
            worksheet.set_print_fit_to_pages(1, 0);
        }

        let mut format_cache = FormatCache::default();
        write_cells(&mut worksheet, grid, &self.options, &mut format_cache)?;

        let n_width_label_col = derive_label_col_width_final(grid.width_label_col, &self.options);
        if n_cols > 0 {
            worksheet.set_column_width(cast_col_num(0)?, n_width_label_col as f64)?;
        }
        for n_idx_col in 1..n_cols {
            worksheet
                .set_column_width(cast_col_num(n_idx_col)?, self.options.width_data_col as f64)?;
        }

        self.workbook.push_worksheet(worksheet);
        self.set_sheet_names_existing
            .insert(sheet_name_unique.to_lowercase());

        for c_warning in &report.warnings {
            warn!(sheet = %sheet_name_unique, "{c_warning}");
        }
        debug!(
            sheet = %sheet_name_unique,
            rows = n_rows,
            cols = n_cols,
            merges = report.n_merges,
            formats = format_cache.len(),
            "Wrote tally sheet"
        );

        report.sheet_name = sheet_name_unique;
        self.l_reports.push(report);
        Ok(())
    }
}

/// One `rust_xlsxwriter` format per distinct cell format.
#[derive(Default)]
struct FormatCache {
    dict_fmt: HashMap<SpecCellFormat, Format>,
}

impl FormatCache {
    fn get(&mut self, spec: &SpecCellFormat) -> &Format {
        self.dict_fmt
            .entry(spec.clone())
            .or_insert_with(|| derive_rust_xlsx_format(spec))
    }

    fn len(&self) -> usize {
        self.dict_fmt.len()
    }
}

fn write_cells(
    worksheet: &mut Worksheet,
    grid: &SpecTallyGrid,
    options: &SpecXlsxSinkOptions,
    format_cache: &mut FormatCache,
) -> Result<(), XlsxSinkError> {
    let set_merge_covered = derive_horizontal_merge_tracker(&grid.merges);
    let dict_plan_border =
        plan_border_overlay(&grid.borders, options.border_inner, options.border_outer);
    let cell_blank = SpecGridCell::default();

    let derive_cell_format = |row_idx: usize, col_idx: usize, cell: &SpecGridCell| {
        let fmt_style = options.derive_style_format(cell.style);
        match dict_plan_border.get(&(row_idx, col_idx)) {
            Some(border) => fmt_style.with_border(border),
            None => fmt_style,
        }
    };

    for (row_idx, row) in grid.rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            if set_merge_covered.contains(&(row_idx, col_idx)) {
                continue;
            }
            let fmt_spec = derive_cell_format(row_idx, col_idx, cell);
            let format = format_cache.get(&fmt_spec);
            match cell.value.as_deref() {
                Some(value) if !value.is_empty() => {
                    worksheet.write_string_with_format(
                        cast_row_num(row_idx)?,
                        cast_col_num(col_idx)?,
                        value,
                        format,
                    )?;
                }
                _ => {
                    if cell.style.is_some() || dict_plan_border.contains_key(&(row_idx, col_idx)) {
                        worksheet.write_blank(
                            cast_row_num(row_idx)?,
                            cast_col_num(col_idx)?,
                            format,
                        )?;
                    }
                }
            }
        }
    }

    // Bordered positions past the end of a ragged row.
    for (row_idx, col_idx) in dict_plan_border.keys().copied() {
        let if_in_row = grid
            .rows
            .get(row_idx)
            .is_some_and(|row| col_idx < row.len());
        if if_in_row || set_merge_covered.contains(&(row_idx, col_idx)) {
            continue;
        }
        let format = format_cache.get(&derive_cell_format(row_idx, col_idx, &cell_blank));
        worksheet.write_blank(cast_row_num(row_idx)?, cast_col_num(col_idx)?, format)?;
    }

    for merge in &grid.merges {
        let cell_anchor = grid
            .cell(merge.row_idx, merge.col_idx_start)
            .unwrap_or(&cell_blank);
        let mut fmt_spec = derive_cell_format(merge.row_idx, merge.col_idx_start, cell_anchor);
        if let Some(border_end) = dict_plan_border.get(&(merge.row_idx, merge.col_idx_end)) {
            fmt_spec
                .border
                .get_or_insert_with(SpecCellBorder::default)
                .right = border_end.right;
        }
        let format = format_cache.get(&fmt_spec);
        worksheet.merge_range(
            cast_row_num(merge.row_idx)?,
            cast_col_num(merge.col_idx_start)?,
            cast_row_num(merge.row_idx)?,
            cast_col_num(merge.col_idx_end)?,
            &merge.text,
            format,
        )?;
    }

    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.as_str());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val);
    }
    if spec.bold == Some(true) {
        format = format.set_bold();
    }
    if spec.italic == Some(true) {
        format = format.set_italic();
    }
    if spec.text_wrap == Some(true) {
        format = format.set_text_wrap();
    }
    if let Some(align) = spec.align {
        format = format.set_align(match align {
            EnumAlignHorizontal::Left => FormatAlign::Left,
            EnumAlignHorizontal::Center => FormatAlign::Center,
            EnumAlignHorizontal::Right => FormatAlign::Right,
        });
    }
    if let Some(valign) = spec.valign {
        format = format.set_align(match valign {
            EnumAlignVertical::Top => FormatAlign::Top,
            EnumAlignVertical::Center => FormatAlign::VerticalCenter,
            EnumAlignVertical::Bottom => FormatAlign::Bottom,
        });
    }
    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(border) = spec.border {
        format = format
            .set_border_top(derive_format_border(border.top))
            .set_border_bottom(derive_format_border(border.bottom))
            .set_border_left(derive_format_border(border.left))
            .set_border_right(derive_format_border(border.right));
    }

    format
}

fn derive_format_border(line: EnumBorderLine) -> FormatBorder {
    match line {
        EnumBorderLine::None => FormatBorder::None,
        EnumBorderLine::Thin => FormatBorder::Thin,
        EnumBorderLine::Medium => FormatBorder::Medium,
        EnumBorderLine::Thick => FormatBorder::Thick,
        EnumBorderLine::Double => FormatBorder::Double,
    }
}
