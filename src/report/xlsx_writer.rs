use std::path::Path;

use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};

use crate::report::{HEADERS, Report, ReportError};

const SHEET_NAME: &str = "Movimientos";
const COLUMN_WIDTHS: [f64; 5] = [12.0, 20.0, 15.0, 15.0, 15.0];
const HEADER_FILL: u32 = 0xE0E0E0;

pub fn write(report: &Report, path: &Path) -> Result<(), ReportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_FILL));
    let footer_format = Format::new().set_italic();

    let worksheet = workbook.add_worksheet().set_name(SHEET_NAME)?;

    for (column, width) in COLUMN_WIDTHS.into_iter().enumerate() {
        worksheet.set_column_width(column as u16, width)?;
    }

    write_row(worksheet, 0, &HEADERS, Some(&header_format))?;

    let mut row = 1;
    for cells in &report.rows {
        write_row(worksheet, row, cells, None)?;
        row += 1;
    }

    // One empty row separates the movements from the initial balance.
    if let Some(footer) = &report.footer {
        write_row(worksheet, row + 1, footer, Some(&footer_format))?;
    }

    workbook.save(path)?;

    Ok(())
}

fn write_row<T: AsRef<str>>(worksheet: &mut Worksheet, row: u32, cells: &[T], format: Option<&Format>) -> Result<(), ReportError> {
    for (column, cell) in cells.iter().enumerate() {
        let column = column as u16;
        let text = cell.as_ref();

        match format {
            Some(format) if text.is_empty() => { worksheet.write_blank(row, column, format)?; }
            Some(format) => { worksheet.write_string_with_format(row, column, text, format)?; }
            None if text.is_empty() => {}
            None => { worksheet.write_string(row, column, text)?; }
        }
    }

    Ok(())
}
