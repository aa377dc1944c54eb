use printpdf::{BuiltinFont, Mm, PdfDocument};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use thiserror::Error;

use crate::data::filter::FilteredView;
use crate::data::model::CellValue;

pub const XLSX_FILE_NAME: &str = "filtro_entregas.xlsx";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PDF_FILE_NAME: &str = "resumo_entregas.pdf";
pub const PDF_MIME: &str = "application/pdf";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to build spreadsheet: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("Failed to build PDF: {0}")]
    Pdf(String),

    #[error("Table does not fit in a worksheet ({0})")]
    SheetLimits(String),
}

// ---------------------------------------------------------------------------
// Spreadsheet export
// ---------------------------------------------------------------------------

/// Serialize a filtered view to `.xlsx` bytes: one header row with the
/// dataset's column order, then the view's rows. No index column.
pub fn view_to_xlsx(view: &FilteredView<'_>) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");
    let datetime_format = Format::new().set_num_format("dd/mm/yyyy hh:mm:ss");
    let sheet = workbook.add_worksheet();

    for (c, name) in view.columns().iter().enumerate() {
        sheet.write_string(0, col_num(c)?, name)?;
    }

    for (r, row) in view.rows().enumerate() {
        let r = u32::try_from(r + 1).map_err(|_| ExportError::SheetLimits(format!("row {r}")))?;
        for (c, cell) in row.iter().enumerate() {
            let c = col_num(c)?;
            match cell {
                CellValue::Text(s) => {
                    sheet.write_string(r, c, s)?;
                }
                CellValue::Integer(i) => {
                    sheet.write_number(r, c, *i as f64)?;
                }
                CellValue::Float(f) => {
                    sheet.write_number(r, c, *f)?;
                }
                CellValue::Bool(b) => {
                    sheet.write_boolean(r, c, *b)?;
                }
                CellValue::Date(d) => {
                    sheet.write_datetime_with_format(r, c, d, &date_format)?;
                }
                CellValue::DateTime(dt) => {
                    sheet.write_datetime_with_format(r, c, dt, &datetime_format)?;
                }
                CellValue::Empty => {}
            }
        }
    }

    let bytes = workbook.save_to_buffer()?;
    log::info!("Exported {} row(s) to xlsx ({} bytes)", view.len(), bytes.len());
    Ok(bytes)
}

fn col_num(c: usize) -> Result<u16, ExportError> {
    u16::try_from(c).map_err(|_| ExportError::SheetLimits(format!("column {c}")))
}

// ---------------------------------------------------------------------------
// PDF export
// ---------------------------------------------------------------------------

const A4_WIDTH: Mm = Mm(210.0);
const A4_HEIGHT: Mm = Mm(297.0);
const FONT_SIZE: f32 = 12.0;
// Layout in PostScript points, origin bottom-left.
const LEFT_PT: i32 = 50;
const TOP_PT: i32 = 800;
const LINE_STEP_PT: i32 = 20;
const BOTTOM_PT: i32 = 40;

fn pt_to_mm(pt: i32) -> Mm {
    Mm(pt as f32 * 25.4 / 72.0)
}

/// Number of report lines that fit on one page.
pub const LINES_PER_PAGE: usize = ((TOP_PT - BOTTOM_PT) / LINE_STEP_PT + 1) as usize;

/// Render the report text to an A4 PDF, one report line per document line,
/// continuing on a fresh page when the bottom margin is reached.
pub fn report_to_pdf(report: &str) -> Result<Vec<u8>, ExportError> {
    let (doc, page, layer) = PdfDocument::new("Resumo de Entregas", A4_WIDTH, A4_HEIGHT, "Resumo");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    let mut current = doc.get_page(page).get_layer(layer);
    let mut pages = 1;
    let mut y = TOP_PT;

    for line in report.split('\n') {
        if y < BOTTOM_PT {
            let (page, layer) = doc.add_page(A4_WIDTH, A4_HEIGHT, "Resumo");
            current = doc.get_page(page).get_layer(layer);
            pages += 1;
            y = TOP_PT;
        }
        if !line.is_empty() {
            let text = winansi_text(line);
            current.use_text(text, FONT_SIZE, pt_to_mm(LEFT_PT), pt_to_mm(y), &font);
        }
        y -= LINE_STEP_PT;
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    log::info!("Exported summary to pdf ({pages} page(s), {} bytes)", bytes.len());
    Ok(bytes)
}

/// Built-in fonts are WinAnsi encoded and characters outside that set are
/// dropped on write, so check marks are drawn as bullets.
fn winansi_text(line: &str) -> String {
    line.chars()
        .map(|c| match c {
            '✔' | '✓' => '•',
            other => other,
        })
        .collect()
}
