//! Metadata sources supplying raw dataset trees.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tallykit_form::{RawBasicDataSet, RawDataSet};

use crate::spec::ExportError;

/// Read-only provider of dataset metadata; each dataset is fetched once per export.
pub trait MetadataSource {
    /// Full dataset tree by id.
    fn fetch_dataset(&self, dataset_id: &str) -> Result<RawDataSet, ExportError>;

    /// Listing records of every dataset the source knows.
    fn list_datasets(&self) -> Result<Vec<RawBasicDataSet>, ExportError>;
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawMetadataPayload {
    data_sets: Vec<RawDataSet>,
}

/// In-memory source loaded from a `{ "dataSets": [...] }` payload.
#[derive(Debug, Clone, Default)]
pub struct JsonMetadataSource {
    l_datasets: Vec<RawDataSet>,
}

impl JsonMetadataSource {
    pub fn new(l_datasets: Vec<RawDataSet>) -> Self {
        Self { l_datasets }
    }

    pub fn from_json_str(payload: &str) -> Result<Self, ExportError> {
        let payload: RawMetadataPayload = serde_json::from_str(payload)?;
        Ok(Self::new(payload.data_sets))
    }

    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let payload = fs::read_to_string(path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&payload)
    }

    pub fn len(&self) -> usize {
        self.l_datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.l_datasets.is_empty()
    }
}

impl MetadataSource for JsonMetadataSource {
    fn fetch_dataset(&self, dataset_id: &str) -> Result<RawDataSet, ExportError> {
        self.l_datasets
            .iter()
            .find(|record| record.id == dataset_id)
            .cloned()
            .ok_or_else(|| ExportError::DataSetNotFound {
                id: dataset_id.to_string(),
            })
    }

    fn list_datasets(&self) -> Result<Vec<RawBasicDataSet>, ExportError> {
        Ok(self.l_datasets.iter().map(RawBasicDataSet::from).collect())
    }
}
