use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::config::ColumnNames;

// ---------------------------------------------------------------------------
// CellValue – a single spreadsheet cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as read from the source spreadsheet.
/// Kept `Ord` so unique values can live in a `BTreeSet`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Empty,
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Empty => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
                Date(_) => 5,
                DateTime(_) => 6,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            (DateTime(a), DateTime(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.2}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Empty => Ok(()),
        }
    }
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Numeric view used by the aggregator. Text and dates are not numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Calendar date of the cell, if it holds one.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            CellValue::DateTime(dt) => Some(dt.date()),
            _ => None,
        }
    }

    /// Exact text used for equality filters and dropdown options.
    ///
    /// Unlike `Display`, floats keep their full precision so two distinct
    /// values never collapse into the same option.
    pub fn as_key(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Float(v) => Some(v.to_string()),
            other => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnRoles – where each record attribute lives in the table
// ---------------------------------------------------------------------------

/// Column positions of the known record attributes. `None` means the header
/// is not present in this spreadsheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnRoles {
    pub date: Option<usize>,
    pub company: Option<usize>,
    pub plate: Option<usize>,
    pub client: Option<usize>,
    pub delivered: Option<usize>,
    pub quantity: Option<usize>,
    pub invoice_value: Option<usize>,
}

impl ColumnRoles {
    pub fn resolve(columns: &[String], names: &ColumnNames) -> Self {
        let find = |name: &str| columns.iter().position(|c| c == name);
        Self {
            date: find(&names.date),
            company: find(&names.company),
            plate: find(&names.plate),
            client: find(&names.client),
            delivered: find(&names.delivered),
            quantity: find(&names.quantity),
            invoice_value: find(&names.invoice_value),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded delivery table. Rows are stored in source order and every row
/// has exactly `columns.len()` cells.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    pub roles: ColumnRoles,
    /// For each column the sorted set of non-empty values.
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl Dataset {
    /// Build the dataset, padding or truncating rows to the header width.
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<CellValue>>, names: &ColumnNames) -> Self {
        let width = columns.len();
        for row in &mut rows {
            row.resize(width, CellValue::Empty);
        }

        let mut unique_values: BTreeMap<String, BTreeSet<CellValue>> = BTreeMap::new();
        for (idx, col) in columns.iter().enumerate() {
            let values = rows
                .iter()
                .map(|row| &row[idx])
                .filter(|v| !v.is_empty())
                .cloned()
                .collect();
            unique_values.insert(col.clone(), values);
        }

        let roles = ColumnRoles::resolve(&columns, names);
        Dataset {
            columns,
            rows,
            roles,
            unique_values,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Dropdown options for a role column: sorted, de-duplicated, non-empty.
    pub fn choices(&self, column: Option<usize>) -> Vec<String> {
        let Some(name) = column.and_then(|idx| self.columns.get(idx)) else {
            return Vec::new();
        };
        let mut seen = BTreeSet::new();
        self.unique_values
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(CellValue::as_key)
            .filter(|key| seen.insert(key.clone()))
            .collect()
    }

    /// Earliest and latest date in the date column, if any row has one.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let idx = self.roles.date?;
        let mut dates = self.rows.iter().filter_map(|row| row[idx].as_date());
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }
}
