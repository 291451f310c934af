//! Export orchestration: fetch, validate, prune, localize, lay out, write.

use std::path::PathBuf;

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tallykit_form::{
    SpecBasicDataSet, SpecDataSet, SpecFormBatch, apply_locale, create_basic_datasets,
    create_dataset,
};
use tallykit_io_xlsx::{SpecXlsxSinkOptions, XlsxWriter};
use tallykit_layout::{SpecLayoutOptions, SpecTallyGrid, build_tally_grid};
use tracing::{debug, info, warn};

use crate::report::{ReportExport, ReportExportBuilder};
use crate::sink::DocumentSink;
use crate::source::MetadataSource;
use crate::spec::{ExportError, SpecExportOptions, SpecExportRequest};
use crate::util::calculate_worker_limit;

/// List the datasets that can be exported; rejected ones land in `errors`.
pub fn list_exportable_datasets(
    source: &dyn MetadataSource,
) -> Result<SpecFormBatch<SpecBasicDataSet>, ExportError> {
    let l_records = source.list_datasets()?;
    Ok(create_basic_datasets(&l_records))
}

/// Fetch and prepare one dataset for layout.
///
/// Excluded section ids the dataset does not contain are reported as warnings.
pub fn prepare_dataset(
    source: &dyn MetadataSource,
    request: &SpecExportRequest,
    options: &SpecExportOptions,
    warnings: &mut Vec<String>,
) -> Result<SpecDataSet, ExportError> {
    let record = source.fetch_dataset(&request.dataset_id)?;
    let dataset = create_dataset(&record)?;

    let dataset = request
        .sections_excluded
        .iter()
        .fold(dataset, |dataset, section_id| {
            if dataset.section(section_id).is_none() {
                warnings.push(format!(
                    "Excluded section {section_id} not found in dataset {}.",
                    dataset.id()
                ));
            }
            dataset.remove_section(section_id)
        });

    let dataset = match options.locale.as_deref() {
        Some(locale) => apply_locale(&dataset, locale),
        None => dataset,
    };

    Ok(match &options.headers {
        Some(headers) => dataset.with_headers(Some(headers.clone())),
        None => dataset,
    })
}

/// Export a batch of datasets into `sink`.
///
/// Pipeline:
/// 1. Fetch and prepare each request in order; failures are recorded per
///    dataset and never abort the batch.
/// 2. Build grids (serial or rayon thread pool).
/// 3. Write grids to the sink in request order, then finish the sink.
///
/// # Errors
/// Sink failures abort the export: the document can no longer be trusted.
pub fn export_datasets(
    source: &dyn MetadataSource,
    sink: &mut dyn DocumentSink,
    requests: &[SpecExportRequest],
    options: &SpecExportOptions,
) -> Result<ReportExport, ExportError> {
    let mut builder_report = ReportExportBuilder::default();
    builder_report.add_requested(requests.len() as u64);

    let mut l_warnings = Vec::new();
    let mut l_datasets = Vec::with_capacity(requests.len());
    for request in requests {
        match prepare_dataset(source, request, options, &mut l_warnings) {
            Ok(dataset) => l_datasets.push(dataset),
            Err(err) => {
                warn!(dataset = %request.dataset_id, "Rejected dataset: {err}");
                builder_report.add_rejected(request.dataset_id.clone(), err);
            }
        }
    }
    for c_warning in l_warnings {
        warn!("{c_warning}");
        builder_report.add_warning(c_warning);
    }

    let n_workers_max = calculate_worker_limit(options.num_workers_max);
    let l_grids = build_tally_grids(
        &l_datasets,
        &options.layout,
        n_workers_max,
        &mut builder_report,
    );

    for grid in &l_grids {
        sink.write_grid(grid)?;
        builder_report.add_exported();
    }
    sink.finish()?;

    let report = builder_report.build();
    info!(
        requested = report.cnt_requested,
        exported = report.cnt_exported,
        rejected = report.cnt_rejected,
        warnings = report.warning_count(),
        "Export finished"
    );
    Ok(report)
}

/// [`export_datasets`] into a new XLSX workbook at `path_file_out`.
///
/// Per-sheet sink warnings are appended to the export report.
pub fn export_datasets_to_xlsx(
    source: &dyn MetadataSource,
    path_file_out: PathBuf,
    requests: &[SpecExportRequest],
    options: &SpecExportOptions,
    sink_options: SpecXlsxSinkOptions,
) -> Result<ReportExport, ExportError> {
    let mut writer = XlsxWriter::new(path_file_out, sink_options);
    let mut report = export_datasets(source, &mut writer, requests, options)?;
    report.warnings.extend(
        writer
            .report()
            .into_iter()
            .flat_map(|sheet_report| sheet_report.warnings),
    );
    Ok(report)
}

/// Lay out datasets, keeping input order.
fn build_tally_grids(
    l_datasets: &[SpecDataSet],
    options: &SpecLayoutOptions,
    n_workers_max: usize,
    builder_report: &mut ReportExportBuilder,
) -> Vec<SpecTallyGrid> {
    let build_serial = || {
        l_datasets
            .iter()
            .map(|dataset| build_tally_grid(dataset, options))
            .collect::<Vec<_>>()
    };

    if n_workers_max <= 1 || l_datasets.len() <= 1 {
        return build_serial();
    }

    let thread_pool = ThreadPoolBuilder::new().num_threads(n_workers_max).build();
    let Ok(thread_pool) = thread_pool else {
        builder_report.add_warning(format!(
            "Failed to initialize thread pool (workers={n_workers_max}); \
             fallback to serial layout."
        ));
        return build_serial();
    };

    debug!(
        workers = n_workers_max,
        datasets = l_datasets.len(),
        "Building grids in parallel"
    );
    thread_pool.install(|| {
        l_datasets
            .par_iter()
            .map(|dataset| build_tally_grid(dataset, options))
            .collect::<Vec<_>>()
    })
}
