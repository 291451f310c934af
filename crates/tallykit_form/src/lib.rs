//! `tallykit_form` v1:
//! Form entity model for tally-sheet export.
//!
//! Modules:
//! - `conf`   : attribute names and default-combo constants
//! - `spec`   : immutable entities, translation table, errors
//! - `raw`    : serde records as delivered by the metadata source
//! - `create` : validated construction (single and batch)
//! - `locale` : display-name resolution per locale
//! - `util`   : pure helper functions
pub mod conf;
pub mod create;
pub mod locale;
pub mod raw;
pub mod spec;
pub mod util;

pub use create::{create_basic_dataset, create_basic_datasets, create_dataset, create_datasets};
pub use locale::{Localize, apply_locale};
pub use raw::{
    RawAttribute, RawAttributeValue, RawBasicDataSet, RawCategory, RawCategoryCombo,
    RawCategoryOption, RawCategoryOptionCombo, RawDataElement, RawDataSet, RawDataSetElement,
    RawGreyedField, RawRef, RawSection,
};
pub use spec::{
    EnumFormType, EnumTranslationProperty, FormError, SpecAttributeValue, SpecBasicDataSet,
    SpecCategory, SpecCategoryCombo, SpecCategoryOption, SpecCategoryOptionCombo,
    SpecDataElement, SpecDataSet, SpecFormBatch, SpecGreyedField, SpecHeaders, SpecSection,
    SpecTranslation, SpecTranslationTable,
};
