use super::{HEADERS, Report, ReportError, ReportFormat, default_file_name, export};

use anyhow::{Result, anyhow};
use calamine::{Data, Reader, open_workbook_auto};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::engine::ClientStatement;
use crate::models::{InitialBalance, RawMovement};

fn create_movement(document_type: &str, document_number: u64, date: &str, total: &str) -> Result<RawMovement> {
    Ok(RawMovement {
        code: document_number,
        counterparty_code: 7,
        document_type_code: 0,
        document_type: document_type.to_string(),
        document_number,
        date: date.to_string(),
        net_amount: Decimal::from_str(total)?,
        due_date: None,
        document_date: None,
        total_amount: Decimal::from_str(total)?,
        comment: None,
        status: 0,
        payment_method: None,
    })
}

fn create_statement(initial_balance: Option<InitialBalance>) -> Result<ClientStatement> {
    let raw = vec![
        create_movement("RB A", 2, "2024-01-15T00:00:00", "1000")?,
        create_movement("FA", 1, "2024-01-10T00:00:00", "1000")?,
    ];

    Ok(ClientStatement::build(7, &raw, initial_balance))
}

fn cell(range: &calamine::Range<Data>, row: u32, column: u32) -> Option<String> {
    match range.get_value((row, column)) {
        Some(Data::String(text)) => Some(text.clone()),
        _ => None,
    }
}

#[test]
fn test_report_rows_are_chronological() -> Result<()> {
    let report = Report::from_statement(&create_statement(None)?);

    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[0], ["10/01/2024", "Factura A", "$ 1.000,00", "", "-$ 1.000,00"].map(String::from));
    assert_eq!(report.rows[1], ["15/01/2024", "Recibo A", "$ 1.000,00", "Transferencia", "$ 0,00"].map(String::from));
    assert!(report.footer.is_none());

    Ok(())
}

#[test]
fn test_report_appends_initial_balance_footer() -> Result<()> {
    let balance = InitialBalance::new(Decimal::from(5000), "2024-01-01");
    let report = Report::from_statement(&create_statement(Some(balance))?);

    assert_eq!(report.rows[0][4], "$ 4.000,00");
    assert_eq!(report.rows[1][4], "$ 5.000,00");
    assert_eq!(report.footer, Some(["Saldo Inicial", "", "$ 5.000,00", "", "(2024-01-01)"].map(String::from)));

    Ok(())
}

#[test]
fn test_report_rounds_residue_to_zero() -> Result<()> {
    let raw = vec![create_movement("RB B", 1, "2024-02-01", "0.5")?];
    let report = Report::from_statement(&ClientStatement::build(3, &raw, None));

    assert_eq!(report.rows[0][2], "$ 0,00");
    assert_eq!(report.rows[0][4], "$ 0,00");

    Ok(())
}

#[test]
fn test_format_follows_extension() -> Result<()> {
    assert_eq!(ReportFormat::from_path(Path::new("out.xlsx"))?, ReportFormat::Xlsx);
    assert_eq!(ReportFormat::from_path(Path::new("out.XLSX"))?, ReportFormat::Xlsx);
    assert_eq!(ReportFormat::from_path(Path::new("out.csv"))?, ReportFormat::Csv);
    assert_eq!(ReportFormat::from_path(Path::new("out"))?, ReportFormat::Xlsx);
    assert!(matches!(ReportFormat::from_path(Path::new("out.pdf")), Err(ReportError::UnsupportedFormat(extension)) if extension == "pdf"));

    Ok(())
}

#[test]
fn test_xlsx_export_writes_sheet_with_header_rows_and_footer() -> Result<()> {
    let directory = tempfile::tempdir()?;
    let path = directory.path().join("statement.xlsx");
    let balance = InitialBalance::new(Decimal::from(5000), "2024-01-01");
    let report = Report::from_statement(&create_statement(Some(balance))?);

    let written = export(&report, &path)?;
    assert_eq!(written, path);

    let mut workbook = open_workbook_auto(&path)?;
    let range = workbook.worksheet_range("Movimientos")?;

    for (column, header) in HEADERS.iter().enumerate() {
        assert_eq!(cell(&range, 0, column as u32).as_deref(), Some(*header));
    }

    assert_eq!(cell(&range, 1, 0).as_deref(), Some("10/01/2024"));
    assert_eq!(cell(&range, 1, 3), None);
    assert_eq!(cell(&range, 2, 3).as_deref(), Some("Transferencia"));
    assert_eq!(cell(&range, 3, 0), None);
    assert_eq!(cell(&range, 4, 0).as_deref(), Some("Saldo Inicial"));
    assert_eq!(cell(&range, 4, 2).as_deref(), Some("$ 5.000,00"));
    assert_eq!(cell(&range, 4, 4).as_deref(), Some("(2024-01-01)"));

    Ok(())
}

#[test]
fn test_export_into_directory_uses_default_file_name() -> Result<()> {
    let directory = tempfile::tempdir()?;
    let report = Report::from_statement(&create_statement(None)?);

    let written = export(&report, directory.path())?;

    assert_eq!(written, directory.path().join(default_file_name(7)));
    assert_eq!(default_file_name(7), "movimientos-cliente-7.xlsx");
    assert!(written.exists());

    Ok(())
}

#[test]
fn test_csv_export_writes_blank_line_before_footer() -> Result<()> {
    let directory = tempfile::tempdir()?;
    let path = directory.path().join("statement.csv");
    let balance = InitialBalance::new(Decimal::from(-250), "2024-01-01");
    let report = Report::from_statement(&create_statement(Some(balance))?);

    export(&report, &path)?;

    let contents = std::fs::read_to_string(&path)?;
    let lines: Vec<_> = contents.lines().collect();

    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "Fecha,Tipo,Monto,Forma de Pago,Saldo");
    assert_eq!(lines[1], "10/01/2024,Factura A,\"$ 1.000,00\",,\"-$ 1.250,00\"");
    assert_eq!(lines[3], ",,,,");
    let footer = lines.get(4).ok_or_else(|| anyhow!("footer missing"))?;
    assert_eq!(*footer, "Saldo Inicial,,\"-$ 250,00\",,(2024-01-01)");

    Ok(())
}
