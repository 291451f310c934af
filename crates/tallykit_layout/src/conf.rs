//! Layout constants and default labels.

/// Header label of the single data column of a combo without categories.
pub const C_LABEL_VALUE_COLUMN: &str = "Value";
/// Text written into greyed (not applicable) cells.
pub const C_MARK_GREYED: &str = "X";
/// Upper bound for the label column width hint, in characters.
pub const N_WIDTH_LABEL_COL_MAX: usize = 60;
/// Separator the metadata source uses when naming option combos.
pub const C_SEP_OPTION_COMBO_NAME: &str = ", ";
