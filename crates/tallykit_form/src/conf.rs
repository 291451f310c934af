//! Form constants shared by construction and conversion.

/// Attribute name that excludes a dataset from tally-sheet export.
pub const C_ATTRIBUTE_HIDE_IN_TALLY_SHEET: &str = "hideInTallySheet";
/// Attribute value that activates [`C_ATTRIBUTE_HIDE_IN_TALLY_SHEET`].
pub const C_ATTRIBUTE_VALUE_TRUE: &str = "true";

/// Id given to the implicit combo of data elements without a category combo.
pub const C_ID_CATEGORY_COMBO_DEFAULT: &str = "default";
/// Display name used by the metadata source for its single-value combo.
pub const C_NAME_CATEGORY_COMBO_DEFAULT: &str = "default";
