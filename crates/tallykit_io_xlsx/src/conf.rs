//! XLSX constants and default preset factories.

use std::collections::BTreeMap;

use tallykit_layout::EnumCellStyle;

use crate::spec::{EnumAlignHorizontal, EnumAlignVertical, SpecCellFormat, SpecXlsxSinkOptions};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Excel column width maximum, in character units.
pub const N_WIDTH_EXCEL_COL_MAX: usize = 255;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Fill color of not-applicable cells.
pub const C_COLOR_GREYED: &str = "#BFBFBF";

/// Build default format presets per cell style.
pub fn derive_default_style_formats() -> BTreeMap<EnumCellStyle, SpecCellFormat> {
    let cfg_base_fmt_spec = SpecCellFormat {
        font_name: Some("Calibri".to_string()),
        font_size: Some(11),
        align: Some(EnumAlignHorizontal::Left),
        valign: Some(EnumAlignVertical::Center),
        ..Default::default()
    };

    let mut dict_fmt = BTreeMap::new();
    dict_fmt.insert(
        EnumCellStyle::CoverLabel,
        cfg_base_fmt_spec.merge(&SpecCellFormat {
            bold: Some(true),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumCellStyle::DataSetTitle,
        cfg_base_fmt_spec.merge(&SpecCellFormat {
            bold: Some(true),
            font_size: Some(14),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumCellStyle::SectionTitle,
        cfg_base_fmt_spec.merge(&SpecCellFormat {
            bold: Some(true),
            font_size: Some(12),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumCellStyle::SectionDescription,
        cfg_base_fmt_spec.merge(&SpecCellFormat {
            italic: Some(true),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumCellStyle::Header,
        cfg_base_fmt_spec.merge(&SpecCellFormat {
            bold: Some(true),
            align: Some(EnumAlignHorizontal::Center),
            text_wrap: Some(true),
            ..Default::default()
        }),
    );
    dict_fmt.insert(EnumCellStyle::Body, cfg_base_fmt_spec.clone());
    dict_fmt.insert(
        EnumCellStyle::Greyed,
        cfg_base_fmt_spec.merge(&SpecCellFormat {
            align: Some(EnumAlignHorizontal::Center),
            bg_color: Some(C_COLOR_GREYED.to_string()),
            ..Default::default()
        }),
    );

    dict_fmt
}

/// Build default sink options.
pub fn derive_default_xlsx_sink_options() -> SpecXlsxSinkOptions {
    SpecXlsxSinkOptions::default()
}
