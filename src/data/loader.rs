use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use calamine::{Data, DataType, Reader, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::model::{CellValue, Dataset};
use crate::config::ColumnNames;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the delivery spreadsheet.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – first worksheet, first row is the header
/// * `.csv` – header row, comma separated
pub fn load_file(path: &Path, names: &ColumnNames) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (headers, rows) = match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => read_workbook(path)?,
        "csv" => read_csv(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    Ok(build_dataset(headers, rows, names))
}

// ---------------------------------------------------------------------------
// Table cleaning
// ---------------------------------------------------------------------------

/// Turn raw header + rows into a [`Dataset`]:
///
/// * header cells that are blank or start with `Unnamed` drop their column
/// * repeated headers get a `.1`, `.2`, … suffix
/// * rows with no value at all, in any source column, are skipped
/// * the date column is coerced to calendar dates; unparseable cells become empty
pub fn build_dataset(
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
    names: &ColumnNames,
) -> Dataset {
    let kept: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| is_named(h))
        .map(|(i, _)| i)
        .collect();

    let dropped = headers.len() - kept.len();
    if dropped > 0 {
        log::debug!("Dropped {dropped} unnamed column(s)");
    }

    let columns = dedupe_headers(kept.iter().map(|&i| headers[i].clone()));
    let date_col = columns.iter().position(|c| *c == names.date);

    let rows: Vec<Vec<CellValue>> = rows
        .into_iter()
        .filter(|row| row.iter().any(|v| !v.is_empty()))
        .map(|row| {
            let mut cells: Vec<CellValue> = kept
                .iter()
                .map(|&i| row.get(i).cloned().unwrap_or(CellValue::Empty))
                .collect();
            if let Some(col) = date_col {
                cells[col] = coerce_date(&cells[col]);
            }
            cells
        })
        .collect();

    Dataset::new(columns, rows, names)
}

fn is_named(header: &str) -> bool {
    let header = header.trim();
    !header.is_empty() && !header.starts_with("Unnamed")
}

fn dedupe_headers(headers: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    headers
        .map(|h| {
            let count = seen.entry(h.clone()).or_insert(0);
            let name = if *count == 0 { h } else { format!("{h}.{count}") };
            *count += 1;
            name
        })
        .collect()
}

/// Coerce a cell to a calendar date, or [`CellValue::Empty`] when it is not one.
pub fn coerce_date(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Date(d) => CellValue::Date(*d),
        CellValue::DateTime(dt) => CellValue::Date(dt.date()),
        CellValue::Text(s) => parse_date_str(s).map_or(CellValue::Empty, CellValue::Date),
        _ => CellValue::Empty,
    }
}

/// Parse ISO and day-first date / datetime strings; tries FORMATS in order.
fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ];
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

// ---------------------------------------------------------------------------
// Workbook reader
// ---------------------------------------------------------------------------

type RawTable = (Vec<String>, Vec<Vec<CellValue>>);

fn read_workbook(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("opening workbook {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok((Vec::new(), Vec::new()));
    };
    let headers = header_row.iter().map(header_text).collect();
    let body = rows
        .map(|row| row.iter().map(workbook_cell).collect())
        .collect();

    Ok((headers, body))
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

fn workbook_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(dt) if dt.time() == NaiveTime::default() => CellValue::Date(dt.date()),
            Some(dt) => CellValue::DateTime(dt),
            None => CellValue::Empty,
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        // Formula errors (#N/A, #DIV/0!, …) carry no value.
        _ => CellValue::Empty,
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok((headers, rows))
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Empty;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::Text(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_unnamed_and_blank_columns_dropped() {
        let headers = vec![
            "EMPRESA".to_string(),
            "".to_string(),
            "Unnamed: 2".to_string(),
            "PLACAS".to_string(),
        ];
        let rows = vec![vec![text("Areial"), text("x"), text("y"), text("ABC1234")]];
        let ds = build_dataset(headers, rows, &ColumnNames::default());

        assert_eq!(ds.columns, vec!["EMPRESA", "PLACAS"]);
        assert_eq!(ds.rows[0], vec![text("Areial"), text("ABC1234")]);
        assert_eq!(ds.roles.plate, Some(1));
    }

    #[test]
    fn test_header_whitespace_is_significant() {
        let headers = vec![" DATA".to_string(), "EMPRESA ".to_string(), "PLACAS".to_string()];
        let ds = build_dataset(headers, Vec::new(), &ColumnNames::default());

        assert_eq!(ds.columns, vec![" DATA", "EMPRESA ", "PLACAS"]);
        assert_eq!(ds.roles.date, None);
        assert_eq!(ds.roles.company, None);
        assert_eq!(ds.roles.plate, Some(2));
    }

    #[test]
    fn test_duplicate_headers_suffixed() {
        let headers = vec!["OBS".to_string(), "OBS".to_string(), "OBS".to_string()];
        let ds = build_dataset(headers, Vec::new(), &ColumnNames::default());
        assert_eq!(ds.columns, vec!["OBS", "OBS.1", "OBS.2"]);
    }

    #[test]
    fn test_date_column_coerced() {
        let headers = vec!["DATA".to_string(), "OBS".to_string()];
        let rows = vec![
            vec![text("2024-05-03"), text("2024-05-03")],
            vec![text("17/05/2024"), CellValue::Empty],
            vec![text("ontem"), CellValue::Empty],
            vec![CellValue::Integer(45000), CellValue::Empty],
            vec![
                CellValue::DateTime(date(2024, 5, 20).and_hms_opt(14, 30, 0).unwrap()),
                CellValue::Empty,
            ],
        ];
        let ds = build_dataset(headers, rows, &ColumnNames::default());

        let dates: Vec<&CellValue> = ds.rows.iter().map(|r| &r[0]).collect();
        assert_eq!(
            dates,
            vec![
                &CellValue::Date(date(2024, 5, 3)),
                &CellValue::Date(date(2024, 5, 17)),
                &CellValue::Empty,
                &CellValue::Empty,
                &CellValue::Date(date(2024, 5, 20)),
            ]
        );
        // Other columns are left untouched.
        assert_eq!(ds.rows[0][1], text("2024-05-03"));
    }

    #[test]
    fn test_blank_rows_skipped() {
        let headers = vec!["EMPRESA".to_string()];
        let rows = vec![vec![text("A")], vec![CellValue::Empty], vec![], vec![text("B")]];
        let ds = build_dataset(headers, rows, &ColumnNames::default());
        assert_eq!(ds.len(), 2);

        // Content in a dropped column keeps the row.
        let headers = vec!["EMPRESA".to_string(), "".to_string()];
        let rows = vec![
            vec![CellValue::Empty, text("rascunho")],
            vec![text("A"), CellValue::Empty],
        ];
        let ds = build_dataset(headers, rows, &ColumnNames::default());
        assert_eq!(ds.rows, vec![vec![CellValue::Empty], vec![text("A")]]);
    }

    #[test]
    fn test_load_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("entregas.csv");
        std::fs::write(
            &path,
            "DATA,EMPRESA,PLACAS,,QUANT.,V.NF,DT.ENTREGA\n\
             2024-06-01,Areial,ABC1234,,12,1500.50,2024-06-02\n\
             2024-06-03,Pedreira,XYZ9876,,8.5,990,\n",
        )
        .unwrap();

        let ds = load_file(&path, &ColumnNames::default()).unwrap();
        assert_eq!(
            ds.columns,
            vec!["DATA", "EMPRESA", "PLACAS", "QUANT.", "V.NF", "DT.ENTREGA"]
        );
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows[0][0], CellValue::Date(date(2024, 6, 1)));
        assert_eq!(ds.rows[0][3], CellValue::Integer(12));
        assert_eq!(ds.rows[1][3], CellValue::Float(8.5));
        assert_eq!(ds.rows[1][5], CellValue::Empty);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(Path::new("entregas.txt"), &ColumnNames::default()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[test]
    fn test_missing_workbook_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dadss.xlsx");
        assert!(load_file(&path, &ColumnNames::default()).is_err());
    }
}
