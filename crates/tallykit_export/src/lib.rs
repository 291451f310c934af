//! `tallykit_export` v1:
//! Thin orchestrator from metadata source to document sink.
//!
//! Modules:
//! - `conf`   : constants
//! - `spec`   : requests, options, errors
//! - `source` : metadata source trait and JSON implementation
//! - `sink`   : document sink trait and XLSX adapter
//! - `report` : export report models
//! - `util`   : pure helper functions
//! - `export` : batch export pipeline
pub mod conf;
pub mod export;
pub mod report;
pub mod sink;
pub mod source;
pub mod spec;
pub mod util;

pub use export::{
    export_datasets, export_datasets_to_xlsx, list_exportable_datasets, prepare_dataset,
};
pub use report::{ReportExport, ReportExportBuilder};
pub use sink::DocumentSink;
pub use source::{JsonMetadataSource, MetadataSource};
pub use spec::{ExportError, SpecExportError, SpecExportOptions, SpecExportRequest};
