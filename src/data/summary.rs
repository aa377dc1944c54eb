use super::filter::FilteredView;

// ---------------------------------------------------------------------------
// SummaryMetrics
// ---------------------------------------------------------------------------

/// Aggregates over a filtered view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryMetrics {
    pub trip_count: usize,
    /// Cubic metres; 0 when the quantity column is absent.
    pub total_quantity: f64,
    /// Invoice total; 0 when the invoice column is absent.
    pub total_invoice_value: f64,
}

impl SummaryMetrics {
    /// Count rows and sum the numeric cells of the quantity and invoice
    /// columns. Empty and non-numeric cells are skipped.
    pub fn compute(view: &FilteredView<'_>) -> Self {
        let roles = view.dataset.roles;
        let sum = |column| view.column(column).filter_map(|cell| cell.as_f64()).sum::<f64>();
        Self {
            trip_count: view.len(),
            total_quantity: sum(roles.quantity),
            total_invoice_value: sum(roles.invoice_value),
        }
    }

    /// Text for the "Total de m³ entregues" card.
    pub fn quantity_card(&self) -> String {
        format_metric(self.total_quantity)
    }

    /// Text for the "Faturamento total" card.
    pub fn invoice_card(&self) -> String {
        format!("R$ {}", format_metric(self.total_invoice_value))
    }

    /// The multi-line report shown under "Resumo Final" and exported to PDF.
    pub fn report(&self) -> String {
        let trips = self.trip_count;
        let quantity = format_thousands(self.total_quantity);
        let value = format_thousands(self.total_invoice_value);
        format!(
            "\n\
             ✔ Viagens filtradas: {trips}\n\
             \n\
             ✔ Total de m³ filtrados: {quantity}\n\
             \n\
             ✔ Faturamento filtrado: R$ {value}\n\
             \n\
             ✔ Total de viagens (novamente): {trips}\n"
        )
    }
}

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

/// Two decimals with "," thousands grouping: `1234567.891` → `1,234,567.89`.
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string().to_lowercase();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_at(fixed.len() - 3);

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value.is_sign_negative() {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push_str(frac_part);
    grouped
}

/// Card format: [`format_thousands`] with every "," replaced by ".",
/// so `1234.5` renders as `1.234.50`.
pub fn format_metric(value: f64) -> String {
    format_thousands(value).replace(',', ".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnNames;
    use crate::data::filter::{FilterCriteria, filtered_indices};
    use crate::data::model::{CellValue, Dataset};

    fn all_of(ds: &Dataset) -> Vec<usize> {
        filtered_indices(ds, &FilterCriteria::default())
    }

    #[test]
    fn test_quantity_sum_skips_missing() {
        let ds = Dataset::new(
            vec!["QUANT.".to_string()],
            vec![
                vec![CellValue::Integer(10)],
                vec![CellValue::Float(20.0)],
                vec![CellValue::Empty],
            ],
            &ColumnNames::default(),
        );
        let idx = all_of(&ds);
        let metrics = SummaryMetrics::compute(&FilteredView::new(&ds, &idx));
        assert_eq!(metrics.trip_count, 3);
        assert_eq!(metrics.total_quantity, 30.0);
    }

    #[test]
    fn test_absent_invoice_column_is_zero() {
        let ds = Dataset::new(
            vec!["EMPRESA".to_string()],
            vec![
                vec![CellValue::Text("A".to_string())],
                vec![CellValue::Text("B".to_string())],
            ],
            &ColumnNames::default(),
        );
        let idx = all_of(&ds);
        let metrics = SummaryMetrics::compute(&FilteredView::new(&ds, &idx));
        assert_eq!(metrics.trip_count, 2);
        assert_eq!(metrics.total_invoice_value, 0.0);
        assert_eq!(metrics.total_quantity, 0.0);
    }

    #[test]
    fn test_empty_view_is_all_zero() {
        let ds = Dataset::new(
            vec!["QUANT.".to_string(), "V.NF".to_string()],
            vec![vec![CellValue::Float(5.0), CellValue::Float(900.0)]],
            &ColumnNames::default(),
        );
        let metrics = SummaryMetrics::compute(&FilteredView::new(&ds, &[]));
        assert_eq!(
            metrics,
            SummaryMetrics {
                trip_count: 0,
                total_quantity: 0.0,
                total_invoice_value: 0.0,
            }
        );
        assert_eq!(metrics.quantity_card(), "0.00");
    }

    #[test]
    fn test_only_view_rows_are_summed() {
        let ds = Dataset::new(
            vec!["EMPRESA".to_string(), "V.NF".to_string()],
            vec![
                vec![CellValue::Text("A".to_string()), CellValue::Float(100.0)],
                vec![CellValue::Text("B".to_string()), CellValue::Float(250.5)],
                vec![CellValue::Text("A".to_string()), CellValue::Text("n/d".to_string())],
            ],
            &ColumnNames::default(),
        );
        let criteria = FilterCriteria {
            company: Some("A".to_string()),
            ..Default::default()
        };
        let idx = filtered_indices(&ds, &criteria);
        let metrics = SummaryMetrics::compute(&FilteredView::new(&ds, &idx));
        assert_eq!(metrics.trip_count, idx.len());
        assert_eq!(metrics.trip_count, 2);
        assert_eq!(metrics.total_invoice_value, 100.0);
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0.00");
        assert_eq!(format_thousands(999.999), "1,000.00");
        assert_eq!(format_thousands(1234.5), "1,234.50");
        assert_eq!(format_thousands(1234567.891), "1,234,567.89");
        assert_eq!(format_thousands(-9876.5), "-9,876.50");
        assert_eq!(format_thousands(123456.0), "123,456.00");
    }

    #[test]
    fn test_cards_swap_separators() {
        let metrics = SummaryMetrics {
            trip_count: 42,
            total_quantity: 1234.5,
            total_invoice_value: 1234567.891,
        };
        assert_eq!(metrics.quantity_card(), "1.234.50");
        assert_eq!(metrics.invoice_card(), "R$ 1.234.567.89");
    }

    #[test]
    fn test_report_text() {
        let metrics = SummaryMetrics {
            trip_count: 3,
            total_quantity: 45.5,
            total_invoice_value: 12500.0,
        };
        let expected = "\n✔ Viagens filtradas: 3\n\n✔ Total de m³ filtrados: 45.50\n\n\
                        ✔ Faturamento filtrado: R$ 12,500.00\n\n\
                        ✔ Total de viagens (novamente): 3\n";
        assert_eq!(metrics.report(), expected);
        assert_eq!(metrics.report().split('\n').count(), 9);
    }
}
