//! Export requests, options and top-level error types.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tallykit_form::{FormError, SpecHeaders};
use tallykit_io_xlsx::XlsxSinkError;
use tallykit_layout::SpecLayoutOptions;
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region Requests

/// One dataset to export, with the sections the user left out.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecExportRequest {
    pub dataset_id: String,
    pub sections_excluded: Vec<String>,
}

impl SpecExportRequest {
    pub fn new(dataset_id: impl Into<String>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            sections_excluded: Vec::new(),
        }
    }

    /// Builder-style section exclusion list.
    pub fn with_sections_excluded<I, S>(mut self, section_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sections_excluded = section_ids.into_iter().map(Into::into).collect();
        self
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Input options for `export_datasets`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecExportOptions {
    /// Locale every label is resolved for; `None` keeps source names.
    pub locale: Option<String>,
    /// Cover labels attached to every dataset; `None` disables the cover block.
    pub headers: Option<SpecHeaders>,
    /// Layout driver options.
    pub layout: SpecLayoutOptions,
    /// Maximum worker threads for the grid-building stage.
    pub num_workers_max: Option<usize>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// One rejected dataset with its error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecExportError {
    /// Requested dataset id.
    pub dataset_id: String,
    /// Error message.
    pub exception: String,
}

impl fmt::Display for SpecExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.dataset_id, self.exception)
    }
}

/// Export pipeline failures.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Sink(#[from] XlsxSinkError),
    #[error("Dataset not found in metadata source: {id}")]
    DataSetNotFound { id: String },
    #[error("Failed to parse metadata payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to read metadata file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Metadata source failure: {0}")]
    Source(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use tallykit_layout::EnumEmptyCategoryPolicy;

    #[test]
    fn test_export_options_deserialize_with_defaults() {
        let options: SpecExportOptions = serde_json::from_str(
            r#"{
                "locale": "fr",
                "headers": {
                    "health_facility": "Formation sanitaire :",
                    "reporting_period": "Période :"
                },
                "layout": {"rule_empty_category": "zero_width"},
                "num_workers_max": 2
            }"#,
        )
        .unwrap();

        assert_eq!(options.locale.as_deref(), Some("fr"));
        assert_eq!(
            options.headers.map(|headers| headers.reporting_period),
            Some("Période :".to_string())
        );
        assert_eq!(options.layout.rule_empty_category, EnumEmptyCategoryPolicy::ZeroWidth);
        assert_eq!(options.layout.width_label_col_max, 60);
        assert_eq!(options.num_workers_max, Some(2));

        let options_empty: SpecExportOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options_empty, SpecExportOptions::default());
    }

    #[test]
    fn test_export_request_builder() {
        let request = SpecExportRequest::new("ds_malaria").with_sections_excluded(["sec_a"]);
        assert_eq!(request.dataset_id, "ds_malaria");
        assert_eq!(request.sections_excluded, vec!["sec_a".to_string()]);
    }
}
