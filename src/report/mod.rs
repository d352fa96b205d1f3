mod csv_writer;
mod errors;
#[cfg(test)]
mod tests;
mod xlsx_writer;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::engine::ClientStatement;
use crate::types::{ClientId, format_currency, round_for_display};

pub use errors::ReportError;

pub const HEADERS: [&str; 5] = ["Fecha", "Tipo", "Monto", "Forma de Pago", "Saldo"];
pub const INITIAL_BALANCE_LABEL: &str = "Saldo Inicial";

/// One line of the report, in [`HEADERS`] order.
pub type ReportRow = [String; 5];

/// The exported view of a statement: movements oldest first, then the initial balance.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub client_id: ClientId,
    pub rows: Vec<ReportRow>,
    /// `Saldo Inicial` row, written after a blank line.
    pub footer: Option<ReportRow>,
}

impl Report {
    pub fn from_statement(statement: &ClientStatement) -> Self {
        let rows = statement.movements.iter()
            .rev()
            .map(|movement| [
                movement.display_date.clone(),
                movement.category.to_string(),
                format_currency(round_for_display(movement.amount.abs())),
                movement.payment_method_label().to_string(),
                format_currency(round_for_display(movement.running_balance)),
            ])
            .collect();

        let footer = statement.initial_balance.as_ref().map(|balance| [
            INITIAL_BALANCE_LABEL.to_string(),
            String::new(),
            format_currency(round_for_display(balance.amount)),
            String::new(),
            format!("({})", balance.date),
        ]);

        Self {
            client_id: statement.client_id,
            rows,
            footer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Xlsx,
    Csv,
}

impl ReportFormat {
    /// Picks the writer from the file extension. No extension means XLSX.
    pub fn from_path(path: &Path) -> Result<Self, ReportError> {
        match path.extension().and_then(|extension| extension.to_str()) {
            None => Ok(ReportFormat::Xlsx),
            Some(extension) if extension.eq_ignore_ascii_case("xlsx") => Ok(ReportFormat::Xlsx),
            Some(extension) if extension.eq_ignore_ascii_case("csv") => Ok(ReportFormat::Csv),
            Some(extension) => Err(ReportError::UnsupportedFormat(extension.to_string())),
        }
    }
}

pub fn default_file_name(client_id: ClientId) -> String {
    format!("movimientos-cliente-{client_id}.xlsx")
}

/// Writes the report to `path`, or to the default file name inside it when `path` is a directory.
/// Returns where the file ended up.
pub fn export(report: &Report, path: &Path) -> Result<PathBuf, ReportError> {
    let target = if path.is_dir() {
        path.join(default_file_name(report.client_id))
    } else {
        path.to_path_buf()
    };

    match ReportFormat::from_path(&target)? {
        ReportFormat::Xlsx => xlsx_writer::write(report, &target)?,
        ReportFormat::Csv => csv_writer::write(report, &target)?,
    }

    info!("Exported {} movements for client [{}] to {}", report.rows.len(), report.client_id, target.display());

    Ok(target)
}
