use chrono::NaiveDate;

use super::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// Delivery completion, derived from the presence of a delivered-date cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeliveryStatus {
    #[default]
    Any,
    Delivered,
    Undelivered,
}

impl DeliveryStatus {
    pub const ALL: [DeliveryStatus; 3] = [
        DeliveryStatus::Any,
        DeliveryStatus::Delivered,
        DeliveryStatus::Undelivered,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DeliveryStatus::Any => "Todas",
            DeliveryStatus::Delivered => "Com entrega",
            DeliveryStatus::Undelivered => "Sem entrega",
        }
    }
}

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// User-selected predicates. `None` / `Any` on a field means no restriction,
/// so `FilterCriteria::default()` is the identity filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub company: Option<String>,
    pub plate: Option<String>,
    pub client: Option<String>,
    pub date_range: Option<DateRange>,
    pub delivery: DeliveryStatus,
}

impl FilterCriteria {
    /// The criteria a page starts with: every choice open, dates spanning
    /// the whole dataset.
    pub fn with_dataset_dates(dataset: &Dataset) -> Self {
        Self {
            date_range: dataset
                .date_bounds()
                .map(|(start, end)| DateRange::new(start, end)),
            ..Self::default()
        }
    }

    /// Whether row `idx` satisfies every active predicate.
    ///
    /// A predicate whose column is missing from the dataset is skipped.
    pub fn matches(&self, dataset: &Dataset, idx: usize) -> bool {
        let row = &dataset.rows[idx];
        let roles = &dataset.roles;

        matches_choice(row, roles.company, self.company.as_deref())
            && matches_choice(row, roles.plate, self.plate.as_deref())
            && matches_choice(row, roles.client, self.client.as_deref())
            && matches_date(row, roles.date, self.date_range.as_ref())
            && matches_delivery(row, roles.delivered, self.delivery)
    }
}

fn matches_choice(row: &[CellValue], column: Option<usize>, wanted: Option<&str>) -> bool {
    match (column, wanted) {
        (Some(col), Some(wanted)) => row[col].as_key().as_deref() == Some(wanted),
        _ => true,
    }
}

fn matches_date(row: &[CellValue], column: Option<usize>, range: Option<&DateRange>) -> bool {
    match (column, range) {
        // A missing date never satisfies an active range.
        (Some(col), Some(range)) => row[col].as_date().is_some_and(|d| range.contains(d)),
        _ => true,
    }
}

fn matches_delivery(row: &[CellValue], column: Option<usize>, status: DeliveryStatus) -> bool {
    let Some(col) = column else {
        return true;
    };
    match status {
        DeliveryStatus::Any => true,
        DeliveryStatus::Delivered => !row[col].is_empty(),
        DeliveryStatus::Undelivered => row[col].is_empty(),
    }
}

// ---------------------------------------------------------------------------
// Applying the criteria
// ---------------------------------------------------------------------------

/// Return indices (ascending) of rows that pass all active filters.
pub fn filtered_indices(dataset: &Dataset, criteria: &FilterCriteria) -> Vec<usize> {
    (0..dataset.len())
        .filter(|&idx| criteria.matches(dataset, idx))
        .collect()
}

/// A borrowed subset of a [`Dataset`], identified by row indices.
#[derive(Debug, Clone, Copy)]
pub struct FilteredView<'a> {
    pub dataset: &'a Dataset,
    pub indices: &'a [usize],
}

impl<'a> FilteredView<'a> {
    pub fn new(dataset: &'a Dataset, indices: &'a [usize]) -> Self {
        Self { dataset, indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn columns(&self) -> &'a [String] {
        &self.dataset.columns
    }

    /// Rows of the view in dataset order.
    pub fn rows(&self) -> impl Iterator<Item = &'a [CellValue]> + 'a {
        let dataset = self.dataset;
        let indices = self.indices;
        indices.iter().map(move |&idx| dataset.rows[idx].as_slice())
    }

    /// Cells of one column across the view; empty when the column is absent.
    pub fn column(&self, column: Option<usize>) -> impl Iterator<Item = &'a CellValue> + 'a {
        let dataset = self.dataset;
        let indices: &'a [usize] = if column.is_some() { self.indices } else { &[] };
        indices
            .iter()
            .filter_map(move |&idx| column.map(|col| &dataset.rows[idx][col]))
    }
}
