//! Document sinks accepting finished grids.

use tallykit_io_xlsx::XlsxWriter;
use tallykit_layout::SpecTallyGrid;

use crate::spec::ExportError;

/// Exclusive consumer of tally grids, one call per dataset.
pub trait DocumentSink {
    /// Persist one grid; rows, columns and merge spans must be kept as given.
    fn write_grid(&mut self, grid: &SpecTallyGrid) -> Result<(), ExportError>;

    /// Flush everything written so far.
    fn finish(&mut self) -> Result<(), ExportError>;
}

impl DocumentSink for XlsxWriter {
    fn write_grid(&mut self, grid: &SpecTallyGrid) -> Result<(), ExportError> {
        XlsxWriter::write_grid(self, grid)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ExportError> {
        self.close()?;
        Ok(())
    }
}
