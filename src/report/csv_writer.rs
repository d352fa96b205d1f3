use std::path::Path;

use csv::Writer;

use crate::report::{HEADERS, Report, ReportError};

pub fn write(report: &Report, path: &Path) -> Result<(), ReportError> {
    let mut writer = Writer::from_path(path)?;

    writer.write_record(HEADERS)?;

    for row in &report.rows {
        writer.write_record(row)?;
    }

    if let Some(footer) = &report.footer {
        writer.write_record(["", "", "", "", ""])?;
        writer.write_record(footer)?;
    }

    writer.flush()?;

    Ok(())
}
