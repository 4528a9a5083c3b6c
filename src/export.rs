// Spreadsheet export: writes the last query result to an .xlsx file, one
// row per deposit under a header row of the service's own field names. The
// target file is replaced whenever there is something to write; an empty
// result set leaves it untouched.

use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::info;

use crate::api::DepositRecord;
use crate::error::ExportError;

/// Where the UI always exports to, relative to the working directory.
pub const DEFAULT_EXPORT_PATH: &str = "resultado_consulta.xlsx";

/// Column headers of the exported sheet: the same names, in the same order,
/// as the fields of the service response.
pub const EXPORT_HEADERS: [&str; 4] = [
    "depositId",
    "companyName",
    "depositName",
    "addressStreet",
];

/// Writes the records to an xlsx workbook at `path`, overwriting any
/// existing file. Refuses to run with an empty record list, in which case
/// no file is created or touched.
pub fn export_deposits(records: &[DepositRecord], path: &Path) -> Result<(), ExportError> {
    if records.is_empty() {
        return Err(ExportError::NoData);
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let header_format = Format::new().set_bold();
    for (col, name) in EXPORT_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header_format)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        // A numeric deposit id stays a number cell; everything else is text.
        match record.deposit_id.as_f64() {
            Some(id) => worksheet.write_number(row, 0, id)?,
            None => worksheet.write_string(row, 0, record.deposit_id_text())?,
        };
        worksheet.write_string(row, 1, &record.company_name)?;
        worksheet.write_string(row, 2, &record.deposit_name)?;
        worksheet.write_string(row, 3, &record.address_street)?;
    }

    workbook.save(path)?;
    info!("exported {} rows to {}", records.len(), path.display());
    Ok(())
}
