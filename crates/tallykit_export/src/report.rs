//! Export report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;

use crate::conf::C_PREFIX_REPORT_EXPORT;
use crate::spec::SpecExportError;

/// Aggregate counters and diagnostics for one `export_datasets` run.
#[derive(Debug, Default, Clone)]
pub struct ReportExport {
    /// Number of requested datasets.
    pub cnt_requested: u64,
    /// Number of datasets written to the sink.
    pub cnt_exported: u64,
    /// Number of datasets rejected before layout.
    pub cnt_rejected: u64,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
    /// Per-dataset failures.
    pub errors: Vec<SpecExportError>,
}

impl ReportExport {
    /// Number of collected hard errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_requested".to_string(), self.cnt_requested);
        dict_counts.insert("cnt_exported".to_string(), self.cnt_exported);
        dict_counts.insert("cnt_rejected".to_string(), self.cnt_rejected);
        dict_counts.insert("cnt_errors".to_string(), self.error_count() as u64);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} requested={} exported={} rejected={} errors={} warnings={}",
            dict_counts["cnt_requested"],
            dict_counts["cnt_exported"],
            dict_counts["cnt_rejected"],
            dict_counts["cnt_errors"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(C_PREFIX_REPORT_EXPORT))
    }
}

/// Mutable accumulator for export statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportExportBuilder {
    cnt_requested: u64,
    cnt_exported: u64,
    cnt_rejected: u64,
    errors: Vec<SpecExportError>,
    warnings: Vec<String>,
}

impl ReportExportBuilder {
    pub fn add_requested(&mut self, value: u64) {
        self.cnt_requested += value;
    }

    pub fn add_exported(&mut self) {
        self.cnt_exported += 1;
    }

    /// Record a dataset rejected before layout.
    pub fn add_rejected(&mut self, dataset_id: impl Into<String>, exception: impl fmt::Display) {
        self.cnt_rejected += 1;
        self.errors.push(SpecExportError {
            dataset_id: dataset_id.into(),
            exception: exception.to_string(),
        });
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportExport {
        ReportExport {
            cnt_requested: self.cnt_requested,
            cnt_exported: self.cnt_exported,
            cnt_rejected: self.cnt_rejected,
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}
